//! Subtitle endpoints: listing, download, conversion and translation.

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use uuid::Uuid;

use super::{BulkItem, SubwaveClient};
use crate::error::Result;
use crate::objects::jobs::TranslationJob;
use crate::objects::subtitle::{SubtitleFile, SubtitleFormat, SubtitleUpload, TranslateRequest};
use crate::request::RequestDescriptor;
use crate::transport::FilePart;

impl SubwaveClient {
    /// `GET /api/v1/media/{id}/subtitles` – list the subtitle files attached
    /// to one library entry, sidecar and embedded.
    pub async fn list_subtitles(&self, media_id: Uuid) -> Result<Vec<SubtitleFile>> {
        self.request(RequestDescriptor::get(format!(
            "/api/v1/media/{media_id}/subtitles"
        )))
        .await
    }

    /// `GET /api/v1/subtitles/{id}/download` – fetch the raw contents of a
    /// subtitle file.
    pub async fn download_subtitle(&self, id: Uuid) -> Result<Bytes> {
        self.request_bytes(RequestDescriptor::get(format!(
            "/api/v1/subtitles/{id}/download"
        )))
        .await
    }

    /// `POST /api/v1/subtitles/convert` – upload a subtitle file and get it
    /// back converted to `target` format. The upload travels as a multipart
    /// form; the response body is the converted file.
    pub async fn convert_subtitle(
        &self,
        upload: SubtitleUpload,
        target: SubtitleFormat,
    ) -> Result<Bytes> {
        let part = FilePart {
            name: "file".to_string(),
            file_name: upload.file_name,
            mime: Some("application/octet-stream".to_string()),
            bytes: upload.bytes,
        };
        let descriptor = RequestDescriptor::post("/api/v1/subtitles/convert")
            .query("target", target.extension())
            .multipart(vec![part]);
        self.request_bytes(descriptor).await
    }

    /// `POST /api/v1/subtitles/translate` – queue a translation of an
    /// existing subtitle. Returns the created job; poll it with
    /// [`get_translation_job`](Self::get_translation_job).
    pub async fn translate_subtitle(&self, request: &TranslateRequest) -> Result<TranslationJob> {
        let descriptor = RequestDescriptor::post("/api/v1/subtitles/translate").json(request)?;
        self.request(descriptor).await
    }

    /// Queue one translation per request, sequentially and in input order,
    /// capturing per-item failures instead of aborting the batch.
    ///
    /// Yields exactly one [`BulkItem`] per input; a request whose body
    /// cannot be built surfaces as that item's error.
    pub fn translate_batch(
        &self,
        requests: Vec<TranslateRequest>,
    ) -> impl Stream<Item = BulkItem<TranslationJob>> + '_ {
        stream::iter(requests.into_iter().enumerate()).then(
            move |(index, request)| async move {
                let outcome = match RequestDescriptor::post("/api/v1/subtitles/translate")
                    .json(&request)
                {
                    Ok(descriptor) => self.request(descriptor).await,
                    Err(error) => Err(error),
                };
                BulkItem { index, outcome }
            },
        )
    }
}
