//! Classified errors produced by the SDK.
//!
//! Every failure crossing the client boundary is exactly one [`Error`]
//! variant: non-2xx responses are mapped by status code, transport faults by
//! fault kind. Raw `reqwest` errors never escape; the transport layer
//! converts them to [`TransportError`](crate::transport::TransportError)
//! first, and [`Error::from`] finishes the classification.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;

use crate::transport::TransportError;

/// Error code used when the server's error envelope carries none.
const FALLBACK_ERROR_CODE: &str = "unknown_error";

/// Result alias used across the SDK.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the Subwave SDK client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client or a request could not be configured (unusable base URL,
    /// header name or header value).
    #[error("configuration error: {0}")]
    Config(String),

    /// The base URL could not be parsed or joined with an endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The server rejected the credentials (HTTP 401). Never retried.
    #[error("authentication failed")]
    Authentication,

    /// The credentials lack permission for the operation (HTTP 403).
    /// Never retried.
    #[error("access denied")]
    Authorization,

    /// The requested resource does not exist (HTTP 404).
    #[error("resource not found")]
    NotFound,

    /// The server is rate limiting this client (HTTP 429). The SDK does not
    /// retry these; `retry_after` carries the server's `Retry-After` header
    /// in seconds when it sent one.
    #[error("rate limited")]
    RateLimited {
        /// Seconds to wait before retrying, per the server.
        retry_after: Option<u64>,
    },

    /// The request was malformed (HTTP 400). Never retried.
    #[error("validation failed: {message}")]
    Validation {
        /// Human-readable description from the server.
        message: String,
    },

    /// Any other non-2xx response.
    #[error("api error: status {status}, code {code}: {message}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Machine-readable error code from the server envelope.
        code: String,
        /// Human-readable message from the server envelope.
        message: String,
    },

    /// The transport could not complete the request (DNS, TLS, connection
    /// reset, …).
    #[error("network error: {0}")]
    Network(String),

    /// The configured deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// A response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error envelope the server attaches to non-2xx responses:
/// `{ "error": <code>, "message": <human text> }`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
    message: Option<String>,
}

impl Error {
    /// Classify a completed non-2xx response.
    ///
    /// Callers must only pass non-success statuses; 2xx responses never
    /// reach classification.
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Error::Authentication,
            StatusCode::FORBIDDEN => Error::Authorization,
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited {
                retry_after: headers
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse().ok()),
            },
            StatusCode::BAD_REQUEST => {
                let envelope = parse_envelope(body);
                Error::Validation {
                    message: envelope
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
                }
            }
            _ => {
                let envelope = parse_envelope(body);
                let (code, message) = match envelope {
                    Some(e) => (
                        e.error.unwrap_or_else(|| FALLBACK_ERROR_CODE.to_string()),
                        e.message
                            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
                    ),
                    None => (
                        FALLBACK_ERROR_CODE.to_string(),
                        format!("HTTP {}", status.as_u16()),
                    ),
                };
                Error::Api {
                    status,
                    code,
                    message,
                }
            }
        }
    }

    /// Whether the retry executor may attempt this request again.
    ///
    /// Authentication, authorization and validation failures are
    /// caller-actionable; retrying with the same credentials or the same
    /// malformed input cannot succeed. Rate limits are surfaced to the
    /// caller together with `retry_after`. Everything else is treated as
    /// potentially transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::NotFound | Error::Api { .. } | Error::Network(_) | Error::Timeout
        )
    }
}

impl From<TransportError> for Error {
    fn from(fault: TransportError) -> Self {
        match fault {
            TransportError::Timeout => Error::Timeout,
            TransportError::Connect(message) | TransportError::Other(message) => {
                Error::Network(message)
            }
        }
    }
}

fn parse_envelope(body: &[u8]) -> Option<ErrorEnvelope> {
    serde_json::from_slice(body).ok()
}
