//! Server settings types.

use serde::{Deserialize, Serialize};

/// Server-wide settings as exposed by `GET /api/v1/settings`.
///
/// The same shape is accepted back by `PUT /api/v1/settings`; the server
/// returns the stored result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Default target language for translations, as a BCP-47 tag.
    pub default_target_language: String,
    /// Name of the configured translation provider.
    pub translation_provider: String,
    /// Minutes between automatic library scans; `0` disables the schedule.
    pub scan_interval_minutes: u32,
    /// Whether translated subtitles are written next to the media file.
    pub write_sidecar_files: bool,
    /// Languages the library scanner looks for, as BCP-47 tags.
    pub wanted_languages: Vec<String>,
}
