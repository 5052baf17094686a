use anyhow::Result;
use clap::Parser;
use memberkit::api::SearchRequest;
use memberkit::commands;

/// memberkit - membership API client
///
/// Calls the membership API and prints the normalized result envelope as JSON.
/// A failed call prints the error envelope and exits with a non-zero status.
///
/// Examples:
///   memberkit search-info
///   memberkit call GET /signup/check_qq --data '{"qq_id": 10001}'
///   memberkit -H "Cookie: user_id=1; token=..." profile
#[derive(Parser, Debug)]
#[command(author, version = env!("MEMBERKIT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base address (defaults to $API_BASE, then http://localhost:3000/api)
    #[arg(long = "api-base", value_name = "URL", global = true)]
    pub api_base: Option<String>,

    /// Extra request header, e.g. "Cookie: token=..." (repeatable)
    #[arg(long = "header", short = 'H', value_name = "NAME: VALUE", global = true)]
    pub headers: Vec<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a raw request
    Call(CallArgs),

    /// Log in with a QQ number and password
    Login(LoginArgs),

    /// Log out
    Logout,

    /// Show the signed-in member's profile
    Profile,

    /// List colleges available at signup
    Colleges,

    /// Check whether a QQ number is still free
    CheckQq(CheckQqArgs),

    /// Show the member search filter options
    SearchInfo,

    /// Search members
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct CallArgs {
    /// GET, POST, PUT or DELETE
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// Path relative to the API base
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON data: query parameters for GET, body otherwise
    #[arg(long, short = 'd', value_name = "JSON")]
    pub data: Option<String>,

    /// Override the 10s request timeout
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    #[arg(long = "qq", value_name = "QQID")]
    pub qq_id: u64,

    #[arg(long, env = "MEMBERKIT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct CheckQqArgs {
    #[arg(value_name = "QQID")]
    pub qq_id: u64,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    #[arg(long = "college", value_name = "CODE")]
    pub colleges: Vec<String>,

    #[arg(long = "department", value_name = "CODE")]
    pub departments: Vec<String>,

    #[arg(long = "level", value_name = "CODE")]
    pub levels: Vec<String>,

    #[arg(long = "page-size")]
    pub page_size: Option<u32>,

    #[arg(long = "page-index")]
    pub page_index: Option<u32>,
}

impl From<SearchArgs> for SearchRequest {
    fn from(args: SearchArgs) -> Self {
        let non_empty = |v: Vec<String>| if v.is_empty() { None } else { Some(v) };
        SearchRequest {
            global_query: args.query,
            colleges: non_empty(args.colleges),
            departments: non_empty(args.departments),
            levels: non_empty(args.levels),
            page_size: args.page_size,
            page_index: args.page_index,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = commands::build_client(cli.api_base.as_deref(), &cli.headers)?;

    match cli.command {
        Commands::Call(args) => {
            commands::call(
                &client,
                &args.method,
                &args.path,
                args.data.as_deref(),
                args.timeout_ms,
            )
            .await?
        }
        Commands::Login(args) => commands::login(&client, args.qq_id, args.password).await?,
        Commands::Logout => commands::logout(&client).await?,
        Commands::Profile => commands::profile(&client).await?,
        Commands::Colleges => commands::colleges(&client).await?,
        Commands::CheckQq(args) => commands::check_qq(&client, args.qq_id).await?,
        Commands::SearchInfo => commands::search_info(&client).await?,
        Commands::Search(args) => commands::search(&client, args.into()).await?,
    }
    Ok(())
}
