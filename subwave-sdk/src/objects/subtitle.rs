//! Subtitle file types and operation payloads.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Subtitle container formats the server can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Srt,
    Ass,
    Ssa,
    Vtt,
}

impl SubtitleFormat {
    /// File extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Ass => "ass",
            SubtitleFormat::Ssa => "ssa",
            SubtitleFormat::Vtt => "vtt",
        }
    }
}

/// A subtitle file known to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleFile {
    pub id: Uuid,
    /// The library entry this subtitle belongs to.
    pub media_id: Uuid,
    /// Subtitle language as a BCP-47 tag.
    pub language: String,
    pub format: SubtitleFormat,
    /// Path on the server, relative to the library root. `None` for
    /// subtitles embedded in the media container.
    pub path: Option<String>,
    /// Whether the subtitle is embedded in the media container rather than
    /// a sidecar file.
    pub embedded: bool,
    /// Unix timestamp of the last modification.
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A subtitle file uploaded from the caller's side (conversion input).
#[derive(Debug, Clone)]
pub struct SubtitleUpload {
    /// File name reported to the server.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

/// Request to translate an existing subtitle into another language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// The subtitle to translate.
    pub subtitle_id: Uuid,
    /// Target language as a BCP-47 tag.
    pub target_language: String,
    /// Translation provider to use; server default when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}
