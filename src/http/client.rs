//! Verb helpers over a [`Transport`] with normalized results.

use anyhow::Result;
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;

use super::config::ClientConfig;
use super::envelope::{ApiResult, ErrorEnvelope, SuccessEnvelope};
use super::request::{Method, RequestConfig, RequestDescriptor};
use super::transport::{ReqwestTransport, Transport, TransportError};

/// HTTP client facade.
///
/// Every call resolves to a [`SuccessEnvelope`] or an [`ErrorEnvelope`];
/// transport errors and raw responses never leak to callers.
pub struct ApiClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: Arc<T>,
}

impl<T: Transport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl ApiClient<ReqwestTransport> {
    /// Creates a client backed by reqwest.
    ///
    /// Fails when the base address is not an absolute `http(s)` URL.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read request; `params` become query parameters.
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<R> {
        self.request(Method::Get, path, params, config).await?.decode()
    }

    /// Create/submit request; `body` becomes the JSON payload.
    pub async fn post<R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<R> {
        self.request(Method::Post, path, body, config).await?.decode()
    }

    /// Update request; `body` becomes the JSON payload.
    pub async fn put<R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<R> {
        self.request(Method::Put, path, body, config).await?.decode()
    }

    /// Removal request; `body` becomes the JSON payload, as for POST.
    pub async fn delete<R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<R> {
        self.request(Method::Delete, path, body, config).await?.decode()
    }

    /// Builds the descriptor a call would send, without sending it.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        data: Option<Value>,
        config: Option<&RequestConfig>,
    ) -> Result<RequestDescriptor, ErrorEnvelope> {
        RequestDescriptor::build(&self.config, method, path, data, config)
    }

    /// Issues a call and normalizes the outcome, leaving the payload untyped.
    #[tracing::instrument(skip(self, data, config))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        data: Option<Value>,
        config: Option<&RequestConfig>,
    ) -> ApiResult<Value> {
        let request = self.build_request(method, path, data, config)?;
        debug!("Request URL: {} {}", request.method, request.url);

        let outcome = self.transport.send(&request).await;
        let result = normalize(outcome);

        if let Err(e) = &result {
            debug!("{} {} failed: {}", request.method, request.url, e);
        }
        result
    }
}

/// Maps a transport outcome onto the envelope contract.
pub fn normalize(
    outcome: std::result::Result<super::transport::TransportResponse, TransportError>,
) -> ApiResult<Value> {
    match outcome {
        Ok(response) => Ok(SuccessEnvelope::from_body(response.status, response.body)),
        Err(TransportError::Status(response)) => Err(ErrorEnvelope::from_response(
            response.status,
            response.body.as_ref(),
        )),
        Err(TransportError::NoResponse(_)) => Err(ErrorEnvelope::network()),
        Err(TransportError::InvalidRequest(msg)) => Err(ErrorEnvelope::invalid_request(msg)),
    }
}

/// Serializes caller data for a facade call.
pub fn encode<S: Serialize + ?Sized>(data: &S) -> Result<Value, ErrorEnvelope> {
    serde_json::to_value(data).map_err(|e| {
        ErrorEnvelope::invalid_request(format!("Failed to serialize request data: {}", e))
    })
}
