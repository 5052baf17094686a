//! The transport seam beneath the facade.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;

use super::config::ClientConfig;
use super::request::{Method, RequestDescriptor};

/// What the server sent back.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Parsed JSON, or the raw text when the body is not JSON. `None` when empty.
    pub body: Option<Value>,
}

/// Why a transport call did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    Status(TransportResponse),
    /// No response arrived (DNS, refused connection, timeout).
    NoResponse(String),
    /// The request could not be put on the wire.
    InvalidRequest(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Status(response) => {
                write!(f, "Server responded with HTTP {}", response.status)
            }
            TransportError::NoResponse(msg) => write!(f, "No response received: {}", msg),
            TransportError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Performs one HTTP exchange.
///
/// Implementations resolve 2xx responses as `Ok` and everything else as a
/// [`TransportError`], keeping the response when one was received.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a reqwest [`Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client honouring the timeout and credential policy.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("memberkit/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .cookie_store(config.with_credentials)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let headers = header_map(request)?;

        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url)
            .headers(headers)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return Err(TransportError::InvalidRequest(e.to_string()));
            }
            Err(e) => {
                warn!("{} {} failed: {}", request.method, request.url, e);
                return Err(TransportError::NoResponse(e.to_string()));
            }
        };

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("Failed to read response body from {}: {}", request.url, e);
            TransportError::NoResponse(e.to_string())
        })?;

        debug!("{} {} -> {}", request.method, request.url, status);

        let response = TransportResponse {
            status: status.as_u16(),
            body: parse_body(&bytes),
        };

        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status(response))
        }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(request: &RequestDescriptor) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            TransportError::InvalidRequest(format!("Invalid header name {:?}: {}", name, e))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            TransportError::InvalidRequest(format!("Invalid value for header {}: {}", name, e))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestConfig;
    use mockito::Matcher;
    use serde_json::json;

    fn descriptor(
        base: &str,
        method: Method,
        path: &str,
        data: Option<Value>,
        overrides: Option<&RequestConfig>,
    ) -> RequestDescriptor {
        RequestDescriptor::build(&ClientConfig::new(base), method, path, data, overrides).unwrap()
    }

    fn transport() -> ReqwestTransport {
        ReqwestTransport::from_config(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), None);
        assert_eq!(parse_body(br#"{"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(parse_body("注册成功".as_bytes()), Some(json!("注册成功")));
    }

    #[tokio::test]
    async fn test_send_success_with_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/signup/check_qq")
            .match_query(Matcher::UrlEncoded("qq_id".into(), "10001".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"QQID": 10001}"#)
            .create_async()
            .await;

        let req = descriptor(
            &format!("{}/api", server.url()),
            Method::Get,
            "/signup/check_qq",
            Some(json!({"qq_id": 10001})),
            None,
        );
        let response = transport().send(&req).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, Some(json!({"QQID": 10001})));
    }

    #[tokio::test]
    async fn test_send_json_body_and_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/profile/change_password")
            .match_header("content-type", "application/json")
            .match_header("x-trace", "abc")
            .match_body(Matcher::Json(json!({"oldPassword": "a", "newPassword": "b"})))
            .with_status(200)
            .with_body(r#"{"message": "ok"}"#)
            .create_async()
            .await;

        let overrides = RequestConfig::new().header("X-Trace", "abc");
        let req = descriptor(
            &server.url(),
            Method::Put,
            "/profile/change_password",
            Some(json!({"oldPassword": "a", "newPassword": "b"})),
            Some(&overrides),
        );
        transport().send(&req).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_delete_carries_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/member")
            .match_body(Matcher::Json(json!({"id": 7})))
            .with_status(204)
            .create_async()
            .await;

        let req = descriptor(
            &server.url(),
            Method::Delete,
            "/member",
            Some(json!({"id": 7})),
            None,
        );
        let response = transport().send(&req).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 204);
        assert_eq!(response.body, None);
    }

    #[tokio::test]
    async fn test_send_error_status_keeps_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/login")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "密码错误"}"#)
            .create_async()
            .await;

        let req = descriptor(&server.url(), Method::Post, "/login", None, None);
        let err = transport().send(&req).await.unwrap_err();

        assert_eq!(
            err,
            TransportError::Status(TransportResponse {
                status: 403,
                body: Some(json!({"detail": "密码错误"})),
            })
        );
    }

    #[tokio::test]
    async fn test_send_connection_refused_is_no_response() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let req = descriptor(&format!("http://{}", addr), Method::Get, "/profile", None, None);
        let err = transport().send(&req).await.unwrap_err();

        assert!(matches!(err, TransportError::NoResponse(_)));
    }

    #[tokio::test]
    async fn test_send_invalid_header_is_invalid_request() {
        let overrides = RequestConfig::new().header("bad header", "x");
        let req = descriptor(
            "http://127.0.0.1:9",
            Method::Get,
            "/profile",
            None,
            Some(&overrides),
        );
        let err = transport().send(&req).await.unwrap_err();

        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_cookies_are_kept_between_calls() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("POST", "/login")
            .with_status(200)
            .with_header("set-cookie", "token=abc; Path=/")
            .with_body("{}")
            .create_async()
            .await;
        let profile = server
            .mock("GET", "/profile")
            .match_header("cookie", "token=abc")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let transport = transport();
        transport
            .send(&descriptor(&server.url(), Method::Post, "/login", None, None))
            .await
            .unwrap();
        transport
            .send(&descriptor(&server.url(), Method::Get, "/profile", None, None))
            .await
            .unwrap();

        login.assert_async().await;
        profile.assert_async().await;
    }
}
