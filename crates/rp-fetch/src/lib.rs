//! # rp-fetch
//!
//! The download pipeline: drive yt-dlp with per-platform strategy
//! fallback, then hand the downloaded file to the QuickTime normalizer.

pub mod platform;
mod ytdlp;

use std::path::{Path, PathBuf};

use rp_av::{quicktime, ToolRegistry};
use rp_core::config::FetchConfig;
use rp_core::{Error, Result};
use url::Url;

pub use platform::is_twitter_url;

/// Download `url` into `scratch` and normalize it for QuickTime.
///
/// Twitter/X URLs walk the configured strategy variants in order, stopping
/// at the first success; only the final variant's failure is surfaced.
/// Any other URL gets exactly one attempt.
pub async fn fetch(
    config: &FetchConfig,
    tools: &ToolRegistry,
    url: &Url,
    scratch: &Path,
) -> Result<PathBuf> {
    tracing::info!("Starting download: {url}");

    let attempts: Vec<Option<&str>> = if is_twitter_url(url) {
        config
            .twitter_api_order
            .iter()
            .map(|s| Some(s.as_str()))
            .collect()
    } else {
        vec![None]
    };

    let mut last_error = None;
    for api in attempts {
        match attempt(config, tools, url, scratch, api).await {
            Ok(path) => return Ok(path),
            Err(e) => {
                tracing::error!("Download failed (api={}): {e}", api.unwrap_or("default"));
                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| Error::Internal("download failed with unknown error".into())))
}

/// One extraction attempt followed by normalization.
async fn attempt(
    config: &FetchConfig,
    tools: &ToolRegistry,
    url: &Url,
    scratch: &Path,
    api: Option<&str>,
) -> Result<PathBuf> {
    let downloaded = ytdlp::download(config, tools, url, scratch, api).await?;

    let size = tokio::fs::metadata(&downloaded)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    tracing::info!("Downloaded: {} ({size} bytes)", downloaded.display());

    quicktime::normalize(tools, &downloaded, scratch).await
}
