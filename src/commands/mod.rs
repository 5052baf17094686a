//! Command implementations behind the `memberkit` binary.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::api::{self, CheckQqRequest, LoginRequest, SearchRequest};
use crate::http::{ApiClient, ApiResult, ClientConfig, Method, RequestConfig};

/// Builds a client for `api_base` (or `API_BASE` when absent), adding
/// `Name: value` headers to every request.
pub fn build_client(api_base: Option<&str>, headers: &[String]) -> Result<ApiClient> {
    let mut config = match api_base {
        Some(base) => ClientConfig::new(base),
        None => ClientConfig::from_env(),
    };
    for raw in headers {
        let (name, value) = parse_header(raw)?;
        config.default_headers.insert(name, value);
    }
    debug!("Using API base {}", config.base_url);
    ApiClient::new(config)
}

/// Splits a `Name: value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("Invalid header {:?}: expected \"Name: value\"", raw))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Invalid header {:?}: empty name", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Prints the envelope as JSON and turns an error envelope into a failure.
pub fn report<T: Serialize>(result: ApiResult<T>) -> Result<()> {
    match result {
        Ok(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Err(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Err(envelope.into())
        }
    }
}

/// Raw facade call.
#[tracing::instrument(skip(client, data))]
pub async fn call(
    client: &ApiClient,
    method: &str,
    path: &str,
    data: Option<&str>,
    timeout_ms: Option<u64>,
) -> Result<()> {
    let method = method.parse::<Method>()?;
    let data = data
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("Failed to parse --data as JSON")?;

    let mut overrides = RequestConfig::new();
    if let Some(ms) = timeout_ms {
        overrides = overrides.timeout(Duration::from_millis(ms));
    }

    let result = match method {
        Method::Get => client.get::<Value>(path, data, Some(&overrides)).await,
        Method::Post => client.post::<Value>(path, data, Some(&overrides)).await,
        Method::Put => client.put::<Value>(path, data, Some(&overrides)).await,
        Method::Delete => client.delete::<Value>(path, data, Some(&overrides)).await,
    };
    report(result)
}

pub async fn login(client: &ApiClient, qq_id: u64, password: String) -> Result<()> {
    let request = LoginRequest { qq_id, password };
    let result = api::auth::login(client, &request).await;
    if let Ok(envelope) = &result {
        debug!("Signed in as {}", envelope.payload.nickname);
    }
    report(result)
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    report(api::auth::logout(client).await)
}

pub async fn profile(client: &ApiClient) -> Result<()> {
    report(api::profile::get_profile(client).await)
}

pub async fn colleges(client: &ApiClient) -> Result<()> {
    report(api::signup::college_list(client).await)
}

pub async fn check_qq(client: &ApiClient, qq_id: u64) -> Result<()> {
    report(api::signup::check_qq(client, &CheckQqRequest { qq_id }).await)
}

pub async fn search_info(client: &ApiClient) -> Result<()> {
    report(api::member::search_info(client).await)
}

pub async fn search(client: &ApiClient, request: SearchRequest) -> Result<()> {
    report(api::member::search(client, &request).await)
}
