//! Video download endpoint.
//!
//! Per-request pipeline: validate the URL, rebuild job configuration from
//! the environment, allocate a scratch directory, fetch and normalize the
//! video, then stream the file back. The scratch directory travels inside
//! the response body stream so it is removed only after the last byte is
//! sent (or the moment the client goes away).

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::Response;
use axum::Json;
use futures_core::Stream;
use serde::Deserialize;
use tempfile::TempDir;
use tokio_util::io::ReaderStream;
use url::Url;

use rp_av::ToolRegistry;
use rp_core::config::{FetchConfig, ToolsConfig};
use rp_core::Error;

use crate::error::AppError;

/// Prefix for per-job scratch directories.
const SCRATCH_PREFIX: &str = "reelpress-";

static X_CONTENT_TYPE_OPTIONS: HeaderName = HeaderName::from_static("x-content-type-options");

/// Request body for a video download.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DownloadRequest {
    /// Source video URL (http or https).
    pub url: String,
}

/// POST /download
#[utoipa::path(
    post,
    path = "/download",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Video file download", content_type = "video/mp4"),
        (status = 400, description = "Invalid URL or extractor client error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Video is private"),
        (status = 404, description = "Video not found or unavailable"),
        (status = 500, description = "Download or processing failed"),
    ),
    security(("bearer_token" = []))
)]
pub async fn download(Json(payload): Json<DownloadRequest>) -> Result<Response, AppError> {
    let url = parse_request_url(&payload.url)?;
    tracing::info!("Download request: {url}");

    // Job configuration is re-read from the environment for every request.
    let fetch_config = FetchConfig::from_env();
    let tools = ToolRegistry::discover(&ToolsConfig::from_env());

    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .map_err(Error::from)?;

    // On any error from here on, `scratch` drops before the response is
    // produced and the directory is removed synchronously.
    let video_path = rp_fetch::fetch(&fetch_config, &tools, &url, scratch.path()).await?;

    let metadata = tokio::fs::metadata(&video_path)
        .await
        .map_err(|_| Error::processing("download completed but video file not found"))?;

    let filename = video_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video.mp4".into());

    let file = tokio::fs::File::open(&video_path)
        .await
        .map_err(Error::from)?;
    let body = Body::from_stream(ScratchStream {
        inner: ReaderStream::new(file),
        _scratch: scratch,
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, metadata.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(X_CONTENT_TYPE_OPTIONS.clone(), "nosniff")
        .body(body)
        .map_err(|e| Error::Internal(format!("failed to build response: {e}")))?;

    Ok(response)
}

/// Validate and parse the request URL.
fn parse_request_url(raw: &str) -> rp_core::Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::Validation(format!("invalid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Validation(format!(
            "unsupported URL scheme: {}",
            url.scheme()
        )));
    }
    Ok(url)
}

/// File stream that owns the job's scratch directory.
///
/// The [`TempDir`] is removed when the stream is dropped: after the body
/// has been fully sent, or mid-transfer when the client disconnects.
struct ScratchStream {
    inner: ReaderStream<tokio::fs::File>,
    _scratch: TempDir,
}

impl Stream for ScratchStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}
