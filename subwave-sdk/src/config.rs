//! Client configuration.
//!
//! [`ClientOptions`] is what callers hand to [`SubwaveClient::new`]; every
//! field has a documented default. The client freezes the options into a
//! [`ClientConfig`] at construction time and never mutates it afterwards —
//! changing configuration means constructing a new client. Credentials are
//! the one exception: they live on the client itself so they can be swapped
//! at runtime.
//!
//! [`SubwaveClient::new`]: crate::client::SubwaveClient::new

use std::time::Duration;

use url::Url;

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default number of attempts per request, inclusive of the first try.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base unit for linear retry backoff.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Default `User-Agent` string sent with every request.
pub const DEFAULT_CLIENT_IDENTIFIER: &str =
    concat!("subwave-sdk/", env!("CARGO_PKG_VERSION"));

/// Options accepted at client construction.
///
/// `Default` yields a client with no credentials, a 30 second timeout,
/// 3 attempts per request and a 1 second backoff base.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API key attached as the `X-Api-Key` header on every request.
    pub api_key: Option<String>,
    /// Session token attached as the `subwave_session` cookie on every
    /// request. Ignored at construction when `api_key` is also set.
    pub session_token: Option<String>,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Attempts per request, inclusive of the first try.
    pub max_retries: u32,
    /// Base unit for linear backoff: attempt `n` waits `retry_delay × n`
    /// before attempt `n + 1`.
    pub retry_delay: Duration,
    /// Value of the `User-Agent` header.
    pub client_identifier: String,
    /// Emit request/response `tracing` events at debug level.
    pub verbose: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            session_token: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            client_identifier: DEFAULT_CLIENT_IDENTIFIER.to_string(),
            verbose: false,
        }
    }
}

/// Resolved, immutable client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root URL of the Subwave server (e.g. `https://subwave.example.com`).
    pub base_url: Url,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Attempts per request, inclusive of the first try.
    pub max_retries: u32,
    /// Base unit for linear backoff.
    pub retry_delay: Duration,
    /// Value of the `User-Agent` header.
    pub client_identifier: String,
    /// Emit request/response `tracing` events at debug level.
    pub verbose: bool,
}

impl ClientConfig {
    /// Freeze a set of options against a parsed base URL.
    pub fn resolve(base_url: Url, options: &ClientOptions) -> Self {
        Self {
            base_url,
            timeout: options.timeout,
            max_retries: options.max_retries,
            retry_delay: options.retry_delay,
            client_identifier: options.client_identifier.clone(),
            verbose: options.verbose,
        }
    }
}
