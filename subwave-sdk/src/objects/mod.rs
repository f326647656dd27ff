//! Wire types for the Subwave API.
//!
//! All request/response bodies are JSON with camelCase field names.
//! Timestamps are unix seconds (`i64`); identifiers are UUIDs.

pub mod jobs;
pub mod media;
pub mod settings;
pub mod subtitle;
pub mod system;

pub use jobs::{JobStatus, ScanStatus, TranslationJob};
pub use media::{MediaItem, MediaKind, MediaQuery};
pub use settings::Settings;
pub use subtitle::{SubtitleFile, SubtitleFormat, SubtitleUpload, TranslateRequest};
pub use system::{HealthStatus, VersionInfo};
