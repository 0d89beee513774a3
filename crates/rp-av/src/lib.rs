//! # rp-av
//!
//! External tool plumbing for reelpress. Everything the pipeline needs
//! from the media CLIs goes through this crate:
//!
//! - [`ToolCommand`]: subprocess execution with timeout and captured output
//! - [`ToolRegistry`]: discovery of yt-dlp, ffmpeg and ffprobe
//! - [`probe`]: best-effort stream inspection via ffprobe
//! - [`quicktime`]: compatibility policy and MP4 normalization

pub mod command;
pub mod probe;
pub mod quicktime;
pub mod tools;

pub use command::{ToolCommand, ToolOutput};
pub use probe::ProbeResult;
pub use tools::{ToolInfo, ToolRegistry};
