//! Media library types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Kind of a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Episode,
}

/// One entry of the media library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub title: String,
    pub kind: MediaKind,
    /// Path of the media file on the server, relative to the library root.
    pub path: String,
    /// Audio language of the media, as a BCP-47 tag, when detected.
    pub audio_language: Option<String>,
    /// Number of subtitle files currently attached.
    pub subtitle_count: u32,
    /// Unix timestamp of when the scanner first saw this file.
    pub added_at: i64,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filters for listing library media.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQuery {
    /// 1-based page to fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Case-insensitive title substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Restrict to one media kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    /// Only entries missing a subtitle in this language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_language: Option<String>,
}
