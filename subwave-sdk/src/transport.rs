//! HTTP transport seam.
//!
//! The client core is written against the [`Transport`] trait so the request
//! shaping, classification and retry logic stay independent of the actual
//! HTTP stack. [`ReqwestTransport`] is the production implementation; tests
//! substitute in-memory fakes through
//! [`SubwaveClient::with_transport`](crate::client::SubwaveClient::with_transport).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url, multipart};

/// A single file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the part, when known.
    pub mime: Option<String>,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Body of an outbound request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON body, serialized before dispatch.
    Json(serde_json::Value),
    /// Multipart form body built from file parts.
    Multipart(Vec<FilePart>),
}

/// A fully shaped request handed to the transport.
///
/// Headers, credentials and the resolved URL are already in place; the
/// transport only moves bytes.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL including query string.
    pub url: Url,
    /// All outbound headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: RequestBody,
    /// Deadline for this attempt.
    pub timeout: Duration,
}

/// A completed HTTP exchange, body fully read.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Response status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
}

/// Faults raised when no response was received at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or was lost mid-flight.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The attempt's deadline elapsed.
    #[error("deadline elapsed")]
    Timeout,

    /// Any other transport-level failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// The HTTP capability the client core is built on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP exchange and read the full response body.
    ///
    /// Implementations must return `Ok` for every received response,
    /// whatever its status; `Err` means no response arrived.
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing `reqwest::Client` (e.g. one configured with a proxy
    /// or custom TLS roots).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => {
                builder.multipart(build_form(parts).map_err(map_reqwest_error)?)
            }
        };

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn build_form(parts: Vec<FilePart>) -> Result<multipart::Form, reqwest::Error> {
    let mut form = multipart::Form::new();
    for part in parts {
        let mut piece = multipart::Part::bytes(part.bytes.to_vec()).file_name(part.file_name);
        if let Some(mime) = part.mime {
            piece = piece.mime_str(&mime)?;
        }
        form = form.part(part.name, piece);
    }
    Ok(form)
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
