//! Single-shot yt-dlp invocation.
//!
//! Builds the option set for one extraction attempt, runs the tool, and
//! resolves the path it reports into an existing file on disk.

use std::path::{Path, PathBuf};

use rp_av::{ToolCommand, ToolRegistry};
use rp_core::config::FetchConfig;
use rp_core::{Error, Result};
use url::Url;

/// Output template: title capped at 200 bytes; `--restrict-filenames`
/// keeps the character set shell-safe.
const OUTPUT_TEMPLATE: &str = "%(title).200B.%(ext)s";

/// Run one extraction attempt into `scratch`, returning the downloaded
/// file. `twitter_api` selects the extractor strategy variant when the
/// source is Twitter/X.
pub(crate) async fn download(
    config: &FetchConfig,
    tools: &ToolRegistry,
    url: &Url,
    scratch: &Path,
    twitter_api: Option<&str>,
) -> Result<PathBuf> {
    let ytdlp = tools.require("yt-dlp")?;

    let cookies = stage_cookies(config, scratch).await?;
    let ffmpeg_dir = tools
        .lookup("ffmpeg")
        .and_then(|t| t.path.parent().map(Path::to_path_buf));

    let args = build_args(
        config,
        scratch,
        twitter_api,
        ffmpeg_dir.as_deref(),
        cookies.as_deref(),
        url,
    );

    let mut cmd = ToolCommand::new(ytdlp.path.clone());
    // No outer deadline: the extractor bounds itself via --socket-timeout
    // and its retry caps.
    cmd.no_timeout();
    cmd.args(args);

    let output = cmd.execute().await.map_err(|e| match e {
        Error::ToolFailed { stderr_tail, .. } => Error::extraction(stderr_tail),
        other => other,
    })?;

    let reported = output
        .stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| Error::processing("extractor reported no output file"))?;

    let downloaded = resolve_download_path(Path::new(reported));
    if !downloaded.exists() {
        return Err(Error::processing(format!(
            "downloaded file not found: {}",
            downloaded.display()
        )));
    }

    Ok(downloaded)
}

/// Copy the configured cookie file into the scratch directory so the
/// extractor can rewrite it without touching the original.
async fn stage_cookies(config: &FetchConfig, scratch: &Path) -> Result<Option<PathBuf>> {
    let Some(ref source) = config.cookies_file else {
        return Ok(None);
    };
    if !source.exists() {
        tracing::warn!("Cookies file {} does not exist, ignoring", source.display());
        return Ok(None);
    }

    let staged = scratch.join("cookies.txt");
    tokio::fs::copy(source, &staged).await?;
    Ok(Some(staged))
}

/// Assemble the full argument vector for one attempt.
fn build_args(
    config: &FetchConfig,
    scratch: &Path,
    twitter_api: Option<&str>,
    ffmpeg_dir: Option<&Path>,
    cookies: Option<&Path>,
    url: &Url,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--format".into(),
        config.format.clone(),
        "--merge-output-format".into(),
        "mp4".into(),
        "--remux-video".into(),
        "mp4".into(),
        "--output".into(),
        scratch.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned(),
        "--no-playlist".into(),
        "--restrict-filenames".into(),
        "--retries".into(),
        "5".into(),
        "--fragment-retries".into(),
        "5".into(),
        "--file-access-retries".into(),
        "3".into(),
        "--extractor-retries".into(),
        "3".into(),
        "--socket-timeout".into(),
        "30".into(),
        "--concurrent-fragments".into(),
        "4".into(),
        "--quiet".into(),
        "--no-progress".into(),
        "--no-simulate".into(),
        "--print".into(),
        "after_move:filepath".into(),
    ];

    if let Some(dir) = ffmpeg_dir {
        args.push("--ffmpeg-location".into());
        args.push(dir.to_string_lossy().into_owned());
    }

    if let Some(cookies) = cookies {
        args.push("--cookies".into());
        args.push(cookies.to_string_lossy().into_owned());
    }

    if let Some(ua) = config.user_agent.as_deref() {
        args.push("--user-agent".into());
        args.push(ua.into());
    }

    if let Some(api) = twitter_api {
        args.push("--extractor-args".into());
        args.push(format!("twitter:api={api}"));
    }

    args.push(url.as_str().into());
    args
}

/// The extractor may report a pre-merge name. When that file is gone but
/// an `.mp4` sibling exists, the merge step renamed it; use the sibling.
pub(crate) fn resolve_download_path(reported: &Path) -> PathBuf {
    if reported.exists() {
        return reported.to_path_buf();
    }

    if reported
        .extension()
        .is_none_or(|ext| !ext.eq_ignore_ascii_case("mp4"))
    {
        let sibling = reported.with_extension("mp4");
        if sibling.exists() {
            return sibling;
        }
    }

    reported.to_path_buf()
}
