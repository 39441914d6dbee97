//! Driven port for sending HTTP requests.
//!
//! The request wrapper builds a fully resolved [`TransportRequest`] and hands
//! it to whichever transport is wired in: the reqwest adapter, or the
//! interception shim that answers API calls from the simulated backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::request::{HttpMethod, RequestBody};

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Headers with lower-case names.
    pub headers: BTreeMap<String, String>,
    /// Body.
    pub body: RequestBody,
}

impl TransportRequest {
    /// Header value by lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Raw status and body returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Response with a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }
}

define_port_error! {
    /// Errors raised before a response was received.
    pub enum TransportError {
        /// The connection could not be established.
        Connect { message: String } =>
            "connection failed: {message}",
        /// The request timed out.
        Timeout { message: String } =>
            "request timed out: {message}",
        /// The request could not be built from its description.
        InvalidRequest { message: String } =>
            "request invalid: {message}",
        /// Any other transport failure.
        Transport { message: String } =>
            "transport failed: {message}",
    }
}

/// Port for delivering requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and return its raw response.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
