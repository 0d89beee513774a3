//! Shared test harness for integration tests.
//!
//! Boots the real router on a random port and provides generated stub
//! scripts standing in for the external tools. The stubs are wired up
//! through the tool-path environment variables, which the server re-reads
//! on every request.

use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Start the Axum server on a random port and return the bound address.
pub async fn spawn_server() -> SocketAddr {
    let app = rp_server::router::build_router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().expect("failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

/// Generated stand-ins for yt-dlp, ffmpeg and ffprobe.
///
/// Each stub is a small shell script. The ffmpeg stub records its argument
/// vector so tests can assert on the chosen processing path and recover
/// the scratch location; the yt-dlp stubs count their invocations.
#[allow(dead_code)]
pub struct StubTools {
    dir: TempDir,
}

#[allow(dead_code)]
impl StubTools {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create stub dir"),
        }
    }

    /// Where the ffmpeg stub writes its argument vector.
    pub fn ffmpeg_args_file(&self) -> PathBuf {
        self.dir.path().join("ffmpeg-args.txt")
    }

    /// Where the yt-dlp stubs record how many times they ran.
    pub fn ytdlp_calls_file(&self) -> PathBuf {
        self.dir.path().join("ytdlp-calls.txt")
    }

    pub fn ytdlp_call_count(&self) -> usize {
        std::fs::read_to_string(self.ytdlp_calls_file())
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    fn write_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).expect("failed to write stub");
        let mut perms = std::fs::metadata(&path).expect("stub metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("failed to chmod stub");
        path
    }

    /// A yt-dlp stub that "downloads" a small file into the scratch dir
    /// (recovered from the `--output` template) and prints its path.
    pub fn ytdlp_success(&self) -> PathBuf {
        let calls = self.ytdlp_calls_file();
        self.write_script(
            "yt-dlp",
            &format!(
                r#"#!/bin/sh
echo run >> "{calls}"
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "--output" ]; then out="$a"; fi
  prev="$a"
done
dir=$(dirname "$out")
file="$dir/video.mp4"
printf 'fake-video-bytes' > "$file"
echo "$file"
"#,
                calls = calls.display()
            ),
        )
    }

    /// A yt-dlp stub that fails with the given stderr line.
    pub fn ytdlp_failure(&self, stderr: &str) -> PathBuf {
        let calls = self.ytdlp_calls_file();
        self.write_script(
            "yt-dlp",
            &format!(
                r#"#!/bin/sh
echo run >> "{calls}"
echo "{stderr}" >&2
exit 1
"#,
                calls = calls.display()
            ),
        )
    }

    /// A yt-dlp stub that only succeeds for one Twitter API variant.
    pub fn ytdlp_variant(&self, succeed_on: &str) -> PathBuf {
        let calls = self.ytdlp_calls_file();
        self.write_script(
            "yt-dlp",
            &format!(
                r#"#!/bin/sh
echo run >> "{calls}"
out=""
api=""
prev=""
for a in "$@"; do
  if [ "$prev" = "--output" ]; then out="$a"; fi
  if [ "$prev" = "--extractor-args" ]; then api="$a"; fi
  prev="$a"
done
if [ "$api" != "twitter:api={succeed_on}" ]; then
  echo "ERROR: variant failed" >&2
  exit 1
fi
dir=$(dirname "$out")
file="$dir/video.mp4"
printf 'fake-video-bytes' > "$file"
echo "$file"
"#,
                calls = calls.display()
            ),
        )
    }

    /// An ffprobe stub reporting the given codec and SAR for one stream.
    pub fn ffprobe_reporting(&self, codec: &str, sar: &str) -> PathBuf {
        self.write_script(
            "ffprobe",
            &format!(
                r#"#!/bin/sh
cat <<'EOF'
{{"streams": [{{"codec_name": "{codec}", "width": 1280, "height": 720, "sample_aspect_ratio": "{sar}", "display_aspect_ratio": "16:9"}}]}}
EOF
"#
            ),
        )
    }

    /// An ffmpeg stub that copies input to output and records its args.
    pub fn ffmpeg_copy(&self) -> PathBuf {
        let args_file = self.ffmpeg_args_file();
        self.write_script(
            "ffmpeg",
            &format!(
                r#"#!/bin/sh
echo "$@" > "{args_file}"
input=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-i" ]; then input="$a"; fi
  prev="$a"
done
for out; do :; done
cp "$input" "$out"
"#,
                args_file = args_file.display()
            ),
        )
    }

    /// Point the tool-path environment variables at the stub scripts.
    pub fn install(&self, ytdlp: &Path, ffmpeg: &Path, ffprobe: &Path) {
        std::env::set_var("YTDLP_PATH", ytdlp);
        std::env::set_var("FFMPEG_PATH", ffmpeg);
        std::env::set_var("FFPROBE_PATH", ffprobe);
    }
}
