//! System status types.

use serde::{Deserialize, Serialize};

/// Server health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `true` when all subsystems are operational.
    pub healthy: bool,
    /// Per-subsystem diagnostics (scanner, translator, storage, …).
    pub issues: Vec<String>,
}

/// Server build information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Semantic version of the server.
    pub version: String,
    /// Commit the server was built from.
    pub commit: Option<String>,
}
