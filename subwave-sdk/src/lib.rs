//! Rust SDK for the Subwave subtitle management server.
//!
//! The entry point is [`SubwaveClient`]: construct it with the server's base
//! URL and a [`ClientOptions`], then call the typed endpoint methods grouped
//! under [`client`]. Every call goes through the same request core: default
//! headers and credentials are attached, the response is mapped to a
//! classified [`Error`], and transient failures are retried with linear
//! backoff.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod client;
pub mod config;
pub mod error;
pub mod objects;
pub mod pagination;
pub mod request;
pub mod transport;

pub use client::{BulkItem, SubwaveClient};
pub use config::{ClientConfig, ClientOptions};
pub use error::{Error, Result};
pub use pagination::Page;
pub use request::RequestDescriptor;
pub use transport::{ReqwestTransport, Transport};
