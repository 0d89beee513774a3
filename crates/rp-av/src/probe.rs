//! Best-effort media probing via ffprobe.
//!
//! Asks ffprobe for the first video stream's codec and aspect-ratio
//! metadata as JSON. Every failure mode (missing tool, non-zero exit,
//! timeout, unparseable output) degrades to an empty [`ProbeResult`];
//! downstream policy treats unknown metadata as compatible.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::command::ToolCommand;
use crate::tools::ToolRegistry;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only snapshot of the first video stream's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// Video codec name (e.g. "h264", "vp9"), if reported.
    pub codec: Option<String>,
    /// Sample aspect ratio as reported (e.g. "1:1", "4:3", "N/A").
    pub sample_aspect_ratio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeStream {
    codec_name: Option<String>,
    sample_aspect_ratio: Option<String>,
}

/// Probe the first video stream of `path`.
pub async fn probe(tools: &ToolRegistry, path: &Path) -> ProbeResult {
    let Some(ffprobe) = tools.lookup("ffprobe") else {
        tracing::warn!("ffprobe not found, skipping video analysis");
        return ProbeResult::default();
    };

    let mut cmd = ToolCommand::new(ffprobe.path.clone());
    cmd.timeout(PROBE_TIMEOUT);
    cmd.args([
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=codec_name,width,height,sample_aspect_ratio,display_aspect_ratio",
        "-of",
        "json",
    ]);
    cmd.arg(path.to_string_lossy().as_ref());

    match cmd.execute().await {
        Ok(output) => parse_probe_output(&output.stdout),
        Err(e) => {
            tracing::warn!("ffprobe failed for {}: {e}", path.display());
            ProbeResult::default()
        }
    }
}

/// Parse ffprobe's JSON, degrading to the empty result on any mismatch.
fn parse_probe_output(stdout: &str) -> ProbeResult {
    match serde_json::from_str::<FfprobeOutput>(stdout) {
        Ok(parsed) => {
            let stream = parsed.streams.into_iter().next().unwrap_or_default();
            ProbeResult {
                codec: stream.codec_name,
                sample_aspect_ratio: stream.sample_aspect_ratio,
            }
        }
        Err(e) => {
            tracing::warn!("ffprobe JSON parse error: {e}");
            ProbeResult::default()
        }
    }
}
