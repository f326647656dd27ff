//! Request descriptors.
//!
//! A [`RequestDescriptor`] is the transient, per-call value describing one
//! API operation: endpoint path, method, query string, body and any
//! per-request overrides. The typed endpoint methods build descriptors and
//! hand them to the client core, which resolves them against the base URL
//! and credentials on every attempt.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::error::Result;
use crate::transport::{FilePart, RequestBody};

/// Description of a single API request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: RequestBody,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestDescriptor {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
            timeout: None,
        }
    }

    /// `GET` request for the given path (relative to the base URL).
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request for the given path.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request for the given path.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH` request for the given path.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` request for the given path.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append every field of a serializable struct as a query parameter.
    ///
    /// `None` fields are skipped; everything else is rendered as a plain
    /// string.
    pub fn query_struct<T: Serialize>(mut self, params: &T) -> Result<Self> {
        if let serde_json::Value::Object(map) = serde_json::to_value(params)? {
            for (key, value) in map {
                let rendered = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                self.query.push((key, rendered));
            }
        }
        Ok(self)
    }

    /// Attach a JSON body.
    ///
    /// Serialization happens here so a failure surfaces before the first
    /// attempt rather than inside the retry loop.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a multipart form body.
    pub fn multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Add a per-request header override.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Override the client-level timeout for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
