//! External tool detection and management.
//!
//! The [`ToolRegistry`] resolves the locations of the external CLI tools
//! (yt-dlp, ffmpeg, ffprobe) and provides lookup methods for the rest of
//! the pipeline. It is rebuilt per job so tool overrides in the
//! environment take effect without a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rp_core::config::ToolsConfig;
use rp_core::{Error, Result};

/// Known tool names the registry manages.
const KNOWN_TOOLS: &[&str] = &["yt-dlp", "ffmpeg", "ffprobe"];

/// Well-known install location probed when a tool is not on `PATH`.
const FALLBACK_BIN_DIR: &str = "/usr/local/bin";

/// Resolved location of a single external tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of version output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools: an explicit configured path wins when it exists,
    /// then `PATH` via [`which::which`], then the well-known
    /// `/usr/local/bin` location. Tools that are not found are omitted.
    pub fn discover(config: &ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom = match name {
                "yt-dlp" => config.ytdlp_path.as_deref(),
                "ffmpeg" => config.ffmpeg_path.as_deref(),
                "ffprobe" => config.ffprobe_path.as_deref(),
                _ => None,
            };

            if let Some(path) = resolve(name, custom) {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Return the [`ToolConfig`] for the given tool if it was found.
    pub fn lookup(&self, name: &str) -> Option<&ToolConfig> {
        self.tools.get(name)
    }

    /// Return the [`ToolConfig`] for the given tool, or
    /// [`Error::ToolNotFound`] if it was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| Error::ToolNotFound {
            tool: name.to_string(),
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| {
                if let Some(cfg) = self.tools.get(name) {
                    ToolInfo {
                        name: name.to_string(),
                        available: true,
                        version: detect_version(name, &cfg.path),
                        path: Some(cfg.path.clone()),
                    }
                } else {
                    ToolInfo {
                        name: name.to_string(),
                        available: false,
                        version: None,
                        path: None,
                    }
                }
            })
            .collect()
    }
}

/// Resolution order: configured path (when it exists), `PATH`, well-known
/// fallback directory.
fn resolve(name: &str, custom: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = custom {
        if p.exists() {
            return Some(p.to_path_buf());
        }
    }

    if let Ok(p) = which::which(name) {
        return Some(p);
    }

    let fallback = Path::new(FALLBACK_BIN_DIR).join(name);
    fallback.exists().then_some(fallback)
}

/// Run `<tool> --version` (or `-version` for ffmpeg/ffprobe) and return
/// the first line of stdout.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };

    let output = std::process::Command::new(path)
        .arg(version_arg)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
