//! QuickTime compatibility policy and MP4 normalization.
//!
//! Apple's QuickTime stack handles a narrow set of codecs and assumes
//! square pixels. Files that already comply are remuxed (stream copy) into
//! a faststart MP4; everything else is re-encoded to H.264/AAC. Both paths
//! put the moov atom up front and tag the `mp42` brand.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rp_core::{Error, Result};

use crate::command::ToolCommand;
use crate::probe::{self, ProbeResult};
use crate::tools::ToolRegistry;

/// Codecs QuickTime plays natively.
const QUICKTIME_CODECS: &[&str] = &["h264", "hevc", "avc1", "hvc1", "aac", "mp4a"];

/// SAR values that mean "already square" or "unknown".
const SQUARE_SAR_VALUES: &[&str] = &["1:1", "N/A", "0:1", ""];

/// Suffix appended to normalized output files.
const OUTPUT_SUFFIX: &str = ".qt.mp4";

/// Transcode/remux budget.
const NORMALIZE_TIMEOUT: Duration = Duration::from_secs(600);

/// Decide whether a file needs re-encoding for QuickTime.
///
/// Returns the reason when a fix is required. Missing codec or SAR is
/// assumed compatible, and a SAR string that does not parse as `num:den`
/// counts as square rather than being rejected.
pub fn needs_quicktime_fix(info: &ProbeResult) -> Option<String> {
    if let Some(codec) = info.codec.as_deref() {
        if !codec.is_empty() && !QUICKTIME_CODECS.contains(&codec.to_lowercase().as_str()) {
            return Some(format!("incompatible codec: {codec}"));
        }
    }

    if let Some(sar) = info.sample_aspect_ratio.as_deref() {
        if !SQUARE_SAR_VALUES.contains(&sar) && is_nonsquare_sar(sar) {
            return Some(format!("non-square SAR: {sar}"));
        }
    }

    None
}

/// Parse `num:den` and report a genuinely non-square ratio.
fn is_nonsquare_sar(sar: &str) -> bool {
    let mut parts = sar.split(':');
    let (Some(num), Some(den), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let (Ok(num), Ok(den)) = (num.parse::<i64>(), den.parse::<i64>()) else {
        return false;
    };
    den > 0 && num != den
}

/// Normalize `input` into a QuickTime-friendly MP4 inside `output_dir`.
///
/// Re-encodes only when the probe says it must; otherwise the streams are
/// copied untouched. A missing ffmpeg is non-fatal: the input path is
/// returned unchanged with a warning.
///
/// # Errors
///
/// Fails when the input is missing or empty, when ffmpeg fails or exceeds
/// its 10-minute budget, or when no output file appears.
pub async fn normalize(tools: &ToolRegistry, input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let meta = tokio::fs::metadata(input)
        .await
        .map_err(|_| Error::processing(format!("invalid input file: {}", input.display())))?;
    if meta.len() == 0 {
        return Err(Error::processing(format!(
            "invalid input file: {}",
            input.display()
        )));
    }

    let Some(ffmpeg) = tools.lookup("ffmpeg") else {
        tracing::warn!("ffmpeg not found, returning original file");
        return Ok(input.to_path_buf());
    };

    let info = probe::probe(tools, input).await;
    let fix_reason = needs_quicktime_fix(&info);

    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
    let output = output_dir.join(format!("{stem}{OUTPUT_SUFFIX}"));

    let mut cmd = ToolCommand::new(ffmpeg.path.clone());
    cmd.timeout(NORMALIZE_TIMEOUT);
    cmd.args(["-y", "-i"]);
    cmd.arg(input.to_string_lossy().as_ref());

    match &fix_reason {
        Some(reason) => {
            tracing::info!("Processing required: {reason}");
            cmd.args(encode_args());
        }
        None => {
            tracing::info!("Remuxing for streaming optimization (no re-encoding)");
            cmd.args(remux_args());
        }
    }

    cmd.args(["-movflags", "+faststart", "-brand", "mp42"]);
    cmd.arg(output.to_string_lossy().as_ref());
    cmd.execute().await?;

    if !output.exists() {
        return Err(Error::processing("video processing produced no output"));
    }

    let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    tracing::info!("Normalized video: {} ({size} bytes)", output.display());
    Ok(output)
}

/// Re-encode to H.264/AAC, squaring pixels and forcing even dimensions.
fn encode_args() -> [&'static str; 12] {
    [
        "-vf",
        "scale='trunc(iw*sar/2)*2:trunc(ih/2)*2',setsar=1",
        "-c:v",
        "libx264",
        "-preset",
        "fast",
        "-crf",
        "23",
        "-c:a",
        "aac",
        "-b:a",
        "128k",
    ]
}

/// Copy all streams untouched into the new container.
fn remux_args() -> [&'static str; 2] {
    ["-c", "copy"]
}
