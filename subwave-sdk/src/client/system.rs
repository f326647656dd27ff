//! System endpoints: health, version, settings and background jobs.

use futures_util::stream::Stream;
use uuid::Uuid;

use super::SubwaveClient;
use crate::error::Result;
use crate::objects::jobs::TranslationJob;
use crate::objects::settings::Settings;
use crate::objects::system::{HealthStatus, VersionInfo};
use crate::pagination::Page;
use crate::request::RequestDescriptor;

impl SubwaveClient {
    /// `GET /api/v1/system/health` – server health report.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.request(RequestDescriptor::get("/api/v1/system/health"))
            .await
    }

    /// `GET /api/v1/system/version` – server build information.
    pub async fn version(&self) -> Result<VersionInfo> {
        self.request(RequestDescriptor::get("/api/v1/system/version"))
            .await
    }

    /// `GET /api/v1/settings` – current server settings.
    pub async fn get_settings(&self) -> Result<Settings> {
        self.request(RequestDescriptor::get("/api/v1/settings"))
            .await
    }

    /// `PUT /api/v1/settings` – replace the server settings. Returns the
    /// stored result.
    pub async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        let descriptor = RequestDescriptor::put("/api/v1/settings").json(settings)?;
        self.request(descriptor).await
    }

    /// `GET /api/v1/system/jobs` – one page of translation jobs, newest
    /// first.
    pub async fn list_translation_jobs(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Page<TranslationJob>> {
        self.request(
            RequestDescriptor::get("/api/v1/system/jobs")
                .query("page", page)
                .query("limit", limit),
        )
        .await
    }

    /// Lazily walk all pages of `GET /api/v1/system/jobs`.
    pub fn translation_job_pages(
        &self,
        start_page: u32,
        limit: u32,
    ) -> impl Stream<Item = Result<Page<TranslationJob>>> + '_ {
        self.pages(
            RequestDescriptor::get("/api/v1/system/jobs"),
            start_page,
            limit,
        )
    }

    /// `GET /api/v1/system/jobs/{id}` – fetch one translation job.
    pub async fn get_translation_job(&self, id: Uuid) -> Result<TranslationJob> {
        self.request(RequestDescriptor::get(format!("/api/v1/system/jobs/{id}")))
            .await
    }
}
