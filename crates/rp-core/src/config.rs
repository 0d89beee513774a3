//! Environment-sourced application configuration.
//!
//! Everything a job consumes — tokens, extractor options, tool locations —
//! is re-read from the environment when the job starts, so operators can
//! rotate tokens or swap cookie files without a restart. Only the bind
//! address is fixed at startup.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

/// Default format selection: prefer H.264 video + AAC audio in MP4 (native
/// QuickTime support), falling back progressively to best available.
pub const DEFAULT_FORMAT: &str = "bestvideo[vcodec^=avc1]+bestaudio[acodec^=mp4a]/bestvideo[vcodec^=avc1]+bestaudio/bestvideo+bestaudio/best";

const DEFAULT_TWITTER_API_ORDER: &str = "graphql,legacy,syndication";
const DEFAULT_TWITTER_API: &str = "syndication";

/// HTTP server settings, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Accepted API tokens, parsed from `AUTH_TOKENS` (comma-separated).
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub tokens: HashSet<String>,
}

impl AuthConfig {
    /// Read the token set from the environment.
    pub fn from_env() -> Self {
        Self::parse(&env::var("AUTH_TOKENS").unwrap_or_default())
    }

    /// Parse a comma-separated token list; whitespace and empty entries
    /// are dropped.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Self { tokens }
    }

    /// True when no tokens are configured and every request is admitted.
    pub fn is_open(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Extraction settings, re-read from the environment per job.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// yt-dlp format selection expression.
    pub format: String,
    /// Cookie file to copy into the scratch directory before use.
    pub cookies_file: Option<PathBuf>,
    /// Custom request User-Agent.
    pub user_agent: Option<String>,
    /// Twitter extraction strategies, tried in order. Never empty.
    pub twitter_api_order: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.into(),
            cookies_file: None,
            user_agent: None,
            twitter_api_order: split_csv(DEFAULT_TWITTER_API_ORDER),
        }
    }
}

impl FetchConfig {
    /// Read extraction settings from the environment.
    pub fn from_env() -> Self {
        Self {
            format: non_empty_var("YTDLP_FORMAT").unwrap_or_else(|| DEFAULT_FORMAT.into()),
            cookies_file: non_empty_var("YTDLP_COOKIES_FILE").map(PathBuf::from),
            user_agent: non_empty_var("YTDLP_USER_AGENT"),
            twitter_api_order: parse_twitter_order(
                &env::var("YTDLP_TWITTER_API_ORDER")
                    .unwrap_or_else(|_| DEFAULT_TWITTER_API_ORDER.into()),
                &non_empty_var("YTDLP_TWITTER_API")
                    .unwrap_or_else(|| DEFAULT_TWITTER_API.into()),
            ),
        }
    }
}

/// Explicit tool locations; unset tools are found on `PATH` instead.
#[derive(Debug, Clone, Default)]
pub struct ToolsConfig {
    pub ytdlp_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

impl ToolsConfig {
    /// Read tool locations from the environment.
    pub fn from_env() -> Self {
        Self {
            ytdlp_path: non_empty_var("YTDLP_PATH").map(PathBuf::from),
            ffmpeg_path: non_empty_var("FFMPEG_PATH").map(PathBuf::from),
            ffprobe_path: non_empty_var("FFPROBE_PATH").map(PathBuf::from),
        }
    }
}

/// Split the strategy order string, falling back to the single configured
/// variant when the list is empty.
fn parse_twitter_order(raw: &str, fallback: &str) -> Vec<String> {
    let order = split_csv(raw);
    if order.is_empty() {
        vec![fallback.to_string()]
    } else {
        order
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
