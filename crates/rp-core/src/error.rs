//! Unified error type for the reelpress application.
//!
//! All crates funnel their failures into [`Error`], which carries enough
//! context for the HTTP layer to derive a status code via
//! [`Error::http_status`].

use std::time::Duration;

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type covering all failure modes in reelpress.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The extraction tool rejected the URL or the source refused the
    /// request. The message is the tool's stderr tail.
    #[error("download error: {message}")]
    Extraction { message: String },

    /// A required external tool is not installed.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool exceeded its execution budget.
    #[error("tool {tool} timed out after {timeout:?}")]
    ToolTimeout { tool: String, timeout: Duration },

    /// An external tool exited with a non-zero code.
    #[error("tool {tool} exited with code {code}: {stderr_tail}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr_tail: String,
    },

    /// Downloading or processing produced an invalid result (missing or
    /// empty files, no output).
    #[error("processing error: {0}")]
    Processing(String),

    /// An I/O operation failed.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::Extraction { message } => classify_extraction(message),
            Error::ToolNotFound { .. }
            | Error::ToolTimeout { .. }
            | Error::ToolFailed { .. }
            | Error::Processing(_)
            | Error::Io { .. }
            | Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::Extraction`].
    pub fn extraction(message: impl Into<String>) -> Self {
        Error::Extraction {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Processing`].
    pub fn processing(message: impl Into<String>) -> Self {
        Error::Processing(message.into())
    }
}

/// Map an extractor failure message onto a client-facing status.
///
/// yt-dlp reports access problems in prose; "Private video" and
/// "Video unavailable" are stable markers. Anything else from the
/// extractor is a plain client error.
fn classify_extraction(message: &str) -> u16 {
    if message.contains("Private video") {
        403
    } else if message.contains("Video unavailable")
        || message.to_lowercase().contains("not available")
    {
        404
    } else {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = Error::Validation("url is required".into());
        assert_eq!(err.to_string(), "validation error: url is required");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn unauthorized_display() {
        let err = Error::Unauthorized("bad token".into());
        assert_eq!(err.to_string(), "unauthorized: bad token");
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn private_video_maps_to_forbidden() {
        let err = Error::extraction("ERROR: Private video. Sign in if you've been granted access");
        assert_eq!(err.http_status(), 403);
    }

    #[test]
    fn unavailable_video_maps_to_not_found() {
        let err = Error::extraction("ERROR: Video unavailable");
        assert_eq!(err.http_status(), 404);

        let err = Error::extraction("ERROR: This content is Not Available in your region");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn other_extraction_error_maps_to_bad_request() {
        let err = Error::extraction("ERROR: Unsupported URL: https://example.com");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn tool_not_found_display() {
        let err = Error::ToolNotFound {
            tool: "ffmpeg".into(),
        };
        assert_eq!(err.to_string(), "tool not found: ffmpeg");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn tool_timeout_display() {
        let err = Error::ToolTimeout {
            tool: "ffprobe".into(),
            timeout: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("timed out"));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn tool_failed_display() {
        let err = Error::ToolFailed {
            tool: "ffmpeg".into(),
            code: 1,
            stderr_tail: "conversion failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "tool ffmpeg exited with code 1: conversion failed"
        );
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn processing_display() {
        let err = Error::processing("no output produced");
        assert_eq!(err.to_string(), "processing error: no output produced");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn result_alias() {
        fn ok_fn() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(ok_fn().unwrap(), 42);
    }
}
