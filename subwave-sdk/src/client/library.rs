//! Media library endpoints.

use futures_util::stream::Stream;
use uuid::Uuid;

use super::SubwaveClient;
use crate::error::Result;
use crate::objects::jobs::ScanStatus;
use crate::objects::media::{MediaItem, MediaQuery};
use crate::pagination::Page;
use crate::request::RequestDescriptor;

impl SubwaveClient {
    /// `GET /api/v1/library/media` – list library entries matching the
    /// query, one page at a time.
    pub async fn list_media(&self, query: &MediaQuery) -> Result<Page<MediaItem>> {
        let descriptor = RequestDescriptor::get("/api/v1/library/media").query_struct(query)?;
        self.request(descriptor).await
    }

    /// Lazily walk all pages of `GET /api/v1/library/media` for the given
    /// query, starting at `start_page`.
    ///
    /// Filters from `query` apply to every page; its own `page`/`limit`
    /// fields are ignored in favour of the explicit parameters.
    pub fn media_pages(
        &self,
        query: &MediaQuery,
        start_page: u32,
        limit: u32,
    ) -> Result<impl Stream<Item = Result<Page<MediaItem>>> + '_> {
        let filters = MediaQuery {
            page: None,
            limit: None,
            ..query.clone()
        };
        let descriptor = RequestDescriptor::get("/api/v1/library/media").query_struct(&filters)?;
        Ok(self.pages(descriptor, start_page, limit))
    }

    /// `GET /api/v1/library/media/{id}` – fetch one library entry.
    pub async fn get_media(&self, id: Uuid) -> Result<MediaItem> {
        self.request(RequestDescriptor::get(format!("/api/v1/library/media/{id}")))
            .await
    }

    /// `POST /api/v1/library/scan` – start a library scan. Returns the
    /// scanner state; a no-op when a scan is already running.
    pub async fn start_library_scan(&self) -> Result<ScanStatus> {
        self.request(RequestDescriptor::post("/api/v1/library/scan"))
            .await
    }

    /// `GET /api/v1/library/scan` – current scanner state.
    pub async fn library_scan_status(&self) -> Result<ScanStatus> {
        self.request(RequestDescriptor::get("/api/v1/library/scan"))
            .await
    }
}
