//! The Subwave API client.
//!
//! [`SubwaveClient`] owns the request core every endpoint method goes
//! through: descriptors are resolved against the base URL, default headers
//! and credentials are attached, responses are mapped to classified errors,
//! and transient failures are retried with linear backoff. The typed
//! endpoint groups live in sibling modules (`library`, `subtitles`,
//! `system`) as extra `impl` blocks.

mod library;
mod subtitles;
mod system;

use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientConfig, ClientOptions};
use crate::error::{Error, Result};
use crate::pagination::Page;
use crate::request::RequestDescriptor;
use crate::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};

/// Header carrying the API key (sent as `X-Api-Key`).
pub const API_KEY_HEADER: &str = "x-api-key";

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "subwave_session";

/// Outcome of one item of a bulk call: the item's position in the input
/// sequence plus its individual result.
#[derive(Debug)]
pub struct BulkItem<T> {
    /// Position of this item in the input sequence.
    pub index: usize,
    /// The item's own success or classified failure.
    pub outcome: Result<T>,
}

/// Credential state read once per dispatch.
#[derive(Debug, Clone, Default)]
struct Credentials {
    api_key: Option<String>,
    session_token: Option<String>,
}

/// Typed HTTP client for the Subwave API.
///
/// Cheap to clone; clones share credential state and the underlying
/// transport.
#[derive(Clone)]
pub struct SubwaveClient {
    config: ClientConfig,
    credentials: Arc<RwLock<Credentials>>,
    transport: Arc<dyn Transport>,
}

impl SubwaveClient {
    /// Create a new client for the server at `base_url`.
    ///
    /// * `base_url` – root URL of the Subwave server
    ///   (e.g. `https://subwave.example.com`).
    /// * `options` – credentials, timeouts and retry policy; see
    ///   [`ClientOptions`] for the defaults.
    ///
    /// When both `api_key` and `session_token` are supplied, only the API
    /// key is attached; the session token can still be set later through
    /// [`set_session_token`](Self::set_session_token).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL is empty or malformed.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "invalid base url {base_url}: not an http(s) address"
            )));
        }

        let credentials = if options.api_key.is_some() {
            Credentials {
                api_key: options.api_key.clone(),
                session_token: None,
            }
        } else {
            Credentials {
                api_key: None,
                session_token: options.session_token.clone(),
            }
        };

        Ok(Self {
            config: ClientConfig::resolve(base_url, &options),
            credentials: Arc::new(RwLock::new(credentials)),
            transport: Arc::new(ReqwestTransport::new()),
        })
    }

    /// Replace the default reqwest-backed transport with a custom one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// The resolved client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Set the API key used for subsequent requests. In-flight requests
    /// keep the credentials they were dispatched with.
    pub async fn set_api_key(&self, key: impl Into<String>) {
        let mut credentials = self.credentials.write().await;
        credentials.api_key = Some(key.into());
    }

    /// Set the session token used for subsequent requests.
    pub async fn set_session_token(&self, token: impl Into<String>) {
        let mut credentials = self.credentials.write().await;
        credentials.session_token = Some(token.into());
    }

    /// Remove all credentials; subsequent requests go out unauthenticated.
    pub async fn clear_credentials(&self) {
        let mut credentials = self.credentials.write().await;
        *credentials = Credentials::default();
    }

    /// Execute a descriptor and deserialize the JSON response body.
    pub async fn request<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let response = self.execute(&descriptor).await?;
        serde_json::from_slice(&response.body).map_err(Error::Json)
    }

    /// Execute a descriptor and return the raw response body (file
    /// downloads).
    pub async fn request_bytes(&self, descriptor: RequestDescriptor) -> Result<Bytes> {
        Ok(self.execute(&descriptor).await?.body)
    }

    /// Execute a descriptor, discarding the response body.
    pub async fn request_empty(&self, descriptor: RequestDescriptor) -> Result<()> {
        self.execute(&descriptor).await?;
        Ok(())
    }

    /// Lazily fetch pages of a listing endpoint, starting at `start_page`.
    ///
    /// Yields one [`Page`] per fetch and stops after the first page whose
    /// own counters say no further page exists. A page-fetch error is
    /// yielded and terminates the stream; there is no skip-a-page semantic.
    pub fn pages<T>(
        &self,
        descriptor: RequestDescriptor,
        start_page: u32,
        limit: u32,
    ) -> impl Stream<Item = Result<Page<T>>> + '_
    where
        T: DeserializeOwned + Send,
    {
        stream::try_unfold(
            (descriptor, start_page, false),
            move |(descriptor, page, done)| async move {
                if done {
                    return Ok(None);
                }
                let request = descriptor.clone().query("page", page).query("limit", limit);
                let fetched: Page<T> = self.request(request).await?;
                let done = !fetched.has_next_page();
                Ok(Some((fetched, (descriptor, page + 1, done))))
            },
        )
    }

    /// Execute a sequence of requests one at a time, in input order,
    /// capturing each item's outcome instead of aborting on the first
    /// failure. One bad file in a batch does not kill the batch.
    ///
    /// The stream is lazy and yields exactly one [`BulkItem`] per input
    /// request.
    pub fn bulk<T>(
        &self,
        requests: Vec<RequestDescriptor>,
    ) -> impl Stream<Item = BulkItem<T>> + '_
    where
        T: DeserializeOwned + Send,
    {
        stream::iter(requests.into_iter().enumerate()).then(
            move |(index, descriptor)| async move {
                BulkItem {
                    index,
                    outcome: self.request(descriptor).await,
                }
            },
        )
    }

    /// Run one descriptor through the retry loop.
    ///
    /// Attempts are numbered from 1 up to `max_retries`. Terminal
    /// classifications surface immediately; retryable ones wait
    /// `retry_delay × attempt` and try again. Credentials are re-read on
    /// every attempt.
    async fn execute(&self, descriptor: &RequestDescriptor) -> Result<TransportResponse> {
        let mut attempt: u32 = 1;
        loop {
            let request = self.shape(descriptor).await?;
            if self.config.verbose {
                debug!(method = %request.method, url = %request.url, attempt, "dispatching request");
            }

            let error = match self.transport.execute(request).await {
                Ok(response) if response.status.is_success() => {
                    if self.config.verbose {
                        debug!(
                            status = %response.status,
                            bytes = response.body.len(),
                            "request succeeded"
                        );
                    }
                    return Ok(response);
                }
                Ok(response) => {
                    Error::from_response(response.status, &response.headers, &response.body)
                }
                Err(fault) => Error::from(fault),
            };

            if !error.is_retryable() || attempt >= self.config.max_retries {
                return Err(error);
            }

            let delay = self.config.retry_delay * attempt;
            warn!(error = %error, attempt, ?delay, "request failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Resolve a descriptor into a transport request: absolute URL, default
    /// headers, current credentials and the effective timeout.
    async fn shape(&self, descriptor: &RequestDescriptor) -> Result<TransportRequest> {
        let mut url = self.config.base_url.join(&descriptor.path)?;
        if !descriptor.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                descriptor
                    .query
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&self.config.client_identifier)?);

        let credentials = self.credentials.read().await.clone();
        if let Some(key) = &credentials.api_key {
            headers.insert(HeaderName::from_static(API_KEY_HEADER), header_value(key)?);
        }
        if let Some(token) = &credentials.session_token {
            headers.insert(COOKIE, header_value(&format!("{SESSION_COOKIE}={token}"))?);
        }

        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {name:?}: {e}")))?;
            headers.insert(name, header_value(value)?);
        }

        Ok(TransportRequest {
            method: descriptor.method.clone(),
            url,
            headers,
            body: descriptor.body.clone(),
            timeout: descriptor.timeout.unwrap_or(self.config.timeout),
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Config(format!("invalid header value {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use reqwest::header::RETRY_AFTER;
    use serde_json::Value;

    /// Scripted transport: pops one canned outcome per dispatch and records
    /// every request it saw.
    #[derive(Default)]
    struct FakeTransport {
        script: Mutex<VecDeque<std::result::Result<TransportResponse, TransportError>>>,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl FakeTransport {
        fn push_status(&self, status: u16, body: &str) {
            self.push_response(plain_response(status, body));
        }

        fn push_response(&self, response: TransportResponse) {
            self.script.lock().unwrap().push_back(Ok(response));
        }

        fn push_fault(&self, fault: TransportError) {
            self.script.lock().unwrap().push_back(Err(fault));
        }

        fn attempts(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> TransportRequest {
            self.seen.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("fake transport script exhausted")
        }
    }

    fn plain_response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    fn client(options: ClientOptions) -> (SubwaveClient, Arc<FakeTransport>) {
        let fake = Arc::new(FakeTransport::default());
        let transport: Arc<dyn Transport> = fake.clone();
        let client = SubwaveClient::new("http://subwave.test", options)
            .unwrap()
            .with_transport(transport);
        (client, fake)
    }

    #[test]
    fn test_rejects_malformed_base_url() {
        assert!(matches!(
            SubwaveClient::new("not a url", ClientOptions::default()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SubwaveClient::new("", ClientOptions::default()),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_terminal_statuses_get_one_attempt() {
        for status in [401u16, 403, 400] {
            let (client, fake) = client(ClientOptions::default());
            fake.push_status(status, "{}");

            let result: Result<Value> = client
                .request(RequestDescriptor::get("/api/v1/system/health"))
                .await;

            assert!(result.is_err());
            assert_eq!(fake.attempts(), 1, "status {status} must not be retried");
        }
    }

    #[tokio::test]
    async fn test_rate_limited_single_attempt_with_retry_after() {
        let (client, fake) = client(ClientOptions::default());
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("60"));
        fake.push_response(TransportResponse {
            status: StatusCode::TOO_MANY_REQUESTS,
            headers,
            body: Bytes::new(),
        });

        let result: Result<Value> = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await;

        assert!(matches!(
            result,
            Err(Error::RateLimited {
                retry_after: Some(60)
            })
        ));
        assert_eq!(fake.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_server_error_exhausts_attempts_with_linear_backoff() {
        let (client, fake) = client(ClientOptions::default());
        for _ in 0..3 {
            fake.push_status(500, "");
        }

        let started = tokio::time::Instant::now();
        let result: Result<Value> = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await;

        assert!(matches!(result, Err(Error::Api { .. })));
        assert_eq!(fake.attempts(), 3);
        // 1000 ms after attempt 1, 2000 ms after attempt 2.
        assert_eq!(started.elapsed(), Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let (client, fake) = client(ClientOptions::default());
        fake.push_fault(TransportError::Connect("connection refused".into()));
        fake.push_status(500, "");
        fake.push_status(200, r#"{"ok":true}"#);

        let result: Value = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await
            .unwrap();

        assert_eq!(result["ok"], Value::Bool(true));
        assert_eq!(fake.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fault_is_retried() {
        let (client, fake) = client(ClientOptions::default());
        fake.push_fault(TransportError::Timeout);
        fake.push_status(200, "{}");

        let result: Result<Value> = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await;

        assert!(result.is_ok());
        assert_eq!(fake.attempts(), 2);
    }

    #[tokio::test]
    async fn test_max_retries_zero_still_attempts_once() {
        let options = ClientOptions {
            max_retries: 0,
            ..Default::default()
        };
        let (client, fake) = client(options);
        fake.push_status(500, "");

        let result: Result<Value> = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await;

        assert!(result.is_err());
        assert_eq!(fake.attempts(), 1);
    }

    #[tokio::test]
    async fn test_default_headers_and_query() {
        let (client, fake) = client(ClientOptions {
            api_key: Some("secret".into()),
            ..Default::default()
        });
        fake.push_status(200, "{}");

        let _: Value = client
            .request(
                RequestDescriptor::get("/api/v1/library/media")
                    .query("page", 1)
                    .query("limit", 20),
            )
            .await
            .unwrap();

        let seen = fake.request(0);
        assert_eq!(
            seen.url.as_str(),
            "http://subwave.test/api/v1/library/media?page=1&limit=20"
        );
        assert_eq!(seen.headers.get(API_KEY_HEADER).unwrap(), "secret");
        assert!(
            seen.headers
                .get(USER_AGENT)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("subwave-sdk/")
        );
    }

    #[tokio::test]
    async fn test_api_key_wins_over_session_token_at_construction() {
        let (client, fake) = client(ClientOptions {
            api_key: Some("key".into()),
            session_token: Some("token".into()),
            ..Default::default()
        });
        fake.push_status(200, "{}");

        let _: Value = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await
            .unwrap();

        let seen = fake.request(0);
        assert_eq!(seen.headers.get(API_KEY_HEADER).unwrap(), "key");
        assert!(seen.headers.get(COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_session_token_sent_as_cookie() {
        let (client, fake) = client(ClientOptions {
            session_token: Some("abc123".into()),
            ..Default::default()
        });
        fake.push_status(200, "{}");

        let _: Value = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await
            .unwrap();

        let seen = fake.request(0);
        assert_eq!(
            seen.headers.get(COOKIE).unwrap(),
            "subwave_session=abc123"
        );
    }

    #[tokio::test]
    async fn test_clearing_credentials_equals_never_setting_them() {
        let (client, fake) = client(ClientOptions::default());
        fake.push_status(200, "{}");
        fake.push_status(200, "{}");

        client.set_api_key("X").await;
        client.clear_credentials().await;

        let _: Value = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await
            .unwrap();

        let seen = fake.request(0);
        assert!(seen.headers.get(API_KEY_HEADER).is_none());
        assert!(seen.headers.get(COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_credential_swap_affects_next_dispatch() {
        let (client, fake) = client(ClientOptions {
            api_key: Some("old".into()),
            ..Default::default()
        });
        fake.push_status(200, "{}");
        fake.push_status(200, "{}");

        let _: Value = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await
            .unwrap();
        client.set_api_key("new").await;
        let _: Value = client
            .request(RequestDescriptor::get("/api/v1/system/health"))
            .await
            .unwrap();

        assert_eq!(fake.request(0).headers.get(API_KEY_HEADER).unwrap(), "old");
        assert_eq!(fake.request(1).headers.get(API_KEY_HEADER).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_bulk_isolates_failures_and_preserves_order() {
        let (client, fake) = client(ClientOptions::default());
        fake.push_status(200, r#"{"n":0}"#);
        fake.push_status(400, r#"{"message":"bad subtitle"}"#);
        fake.push_status(200, r#"{"n":2}"#);

        let requests = (0..3)
            .map(|_| RequestDescriptor::get("/api/v1/system/health"))
            .collect();
        let items: Vec<BulkItem<Value>> = client.bulk(requests).collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].index, 0);
        assert_eq!(items[0].outcome.as_ref().unwrap()["n"], 0);
        assert!(matches!(
            items[1].outcome,
            Err(Error::Validation { .. })
        ));
        assert_eq!(items[1].index, 1);
        assert_eq!(items[2].outcome.as_ref().unwrap()["n"], 2);
    }

    #[tokio::test]
    async fn test_pages_walks_until_last_page() {
        let (client, fake) = client(ClientOptions::default());
        fake.push_status(200, r#"{"items":[1,2],"total":3,"page":1,"pageSize":2}"#);
        fake.push_status(200, r#"{"items":[3],"total":3,"page":2,"pageSize":2}"#);

        let pages: Vec<Result<Page<u32>>> = client
            .pages(RequestDescriptor::get("/api/v1/library/media"), 1, 2)
            .collect()
            .await;

        assert_eq!(pages.len(), 2);
        let first = pages[0].as_ref().unwrap();
        let second = pages[1].as_ref().unwrap();
        assert_eq!(first.items, vec![1, 2]);
        assert!(first.has_next_page());
        assert_eq!(second.items, vec![3]);
        assert!(!second.has_next_page());

        assert!(fake.request(0).url.query().unwrap().contains("page=1"));
        assert!(fake.request(1).url.query().unwrap().contains("page=2"));
        assert!(fake.request(1).url.query().unwrap().contains("limit=2"));
    }

    #[tokio::test]
    async fn test_page_fetch_error_terminates_stream() {
        let options = ClientOptions {
            max_retries: 1,
            ..Default::default()
        };
        let (client, fake) = client(options);
        fake.push_status(200, r#"{"items":[1,2],"total":4,"page":1,"pageSize":2}"#);
        fake.push_status(500, "");

        let pages: Vec<Result<Page<u32>>> = client
            .pages(RequestDescriptor::get("/api/v1/library/media"), 1, 2)
            .collect()
            .await;

        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_ok());
        assert!(matches!(pages[1], Err(Error::Api { .. })));
    }
}
