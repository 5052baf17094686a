//! HTTP client facade with normalized success and error envelopes.

mod client;
mod config;
mod envelope;
mod request;
mod transport;

pub use client::{ApiClient, encode, normalize};
pub use config::{API_BASE_ENV, ClientConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use envelope::{
    ApiResult, ErrorEnvelope, GENERIC_FAILURE_MESSAGE, INVALID_REQUEST, INVALID_RESPONSE,
    NETWORK_ERROR, NETWORK_ERROR_STATUS, NETWORK_FAILURE_MESSAGE, SuccessEnvelope, UNKNOWN_ERROR,
};
pub use request::{Method, RequestConfig, RequestDescriptor, query_pairs};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};

#[cfg(test)]
pub use transport::MockTransport;
