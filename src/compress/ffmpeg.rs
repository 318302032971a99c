//! FFmpeg-backed video compression
//!
//! Shells out to ffprobe for source metadata and to ffmpeg for the
//! re-encode, reading fractional progress from ffmpeg's `-progress`
//! output. The child process runs on the blocking pool so the caller's
//! task is never tied up.

use super::types::{CompressionError, CompressionMethod, CompressionOptions};
use super::{ProgressFn, VideoCompressor};
use async_trait::async_trait;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Compressor driving the system ffmpeg/ffprobe binaries
pub struct FfmpegCompressor {
    output_dir: PathBuf,
}

impl FfmpegCompressor {
    /// Write compressed output into the system temp directory
    pub fn new() -> Self {
        Self {
            output_dir: std::env::temp_dir(),
        }
    }

    /// Write compressed output into a specific directory
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Default for FfmpegCompressor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoCompressor for FfmpegCompressor {
    async fn compress(
        &self,
        source: &Path,
        options: &CompressionOptions,
        on_progress: ProgressFn<'_>,
    ) -> Result<PathBuf, CompressionError> {
        let source = source.to_path_buf();
        let size = std::fs::metadata(&source)?.len();
        if size < options.min_source_bytes() {
            tracing::debug!(?source, size, "source below threshold, skipping re-encode");
            on_progress(1.0);
            return Ok(source);
        }

        let probe_source = source.clone();
        let duration_secs = tokio::task::spawn_blocking(move || probe_duration_secs(&probe_source))
            .await
            .map_err(|e| CompressionError::Task(e.to_string()))??;

        let dest = self.output_dir.join(format!("{}.mp4", Uuid::new_v4()));
        let args = build_encode_args(&source, &dest, options);
        tracing::info!(?source, ?dest, "starting ffmpeg compression: {:?}", args);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::task::spawn_blocking(move || run_ffmpeg(&args, duration_secs, tx));

        while let Some(fraction) = rx.recv().await {
            on_progress(fraction);
        }

        task.await
            .map_err(|e| CompressionError::Task(e.to_string()))??;
        on_progress(1.0);
        tracing::info!(?dest, "compression complete");
        Ok(dest)
    }
}

/// Strip a `file://` scheme prefix if present; uris are otherwise plain
/// local paths.
pub fn local_source(uri: &str) -> &Path {
    Path::new(uri.strip_prefix("file://").unwrap_or(uri))
}

/// Probe the source duration in seconds
fn probe_duration_secs(source: &Path) -> Result<f64, CompressionError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
            source.to_str().unwrap_or(""),
        ])
        .output()
        .map_err(|e| CompressionError::Probe(format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CompressionError::Probe(format!("ffprobe failed: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse()
        .map_err(|_| CompressionError::Probe(format!("unexpected ffprobe output: {}", stdout)))
}

/// Build the ffmpeg argument list for one re-encode
fn build_encode_args(source: &Path, dest: &Path, options: &CompressionOptions) -> Vec<String> {
    let m = options.max_dimension;
    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        source.to_string_lossy().to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
        "-nostats".to_string(),
        // Shrink-only scale, aspect preserved, even dimensions for h264.
        "-vf".to_string(),
        format!("scale=min(iw\\,{m}):min(ih\\,{m}):force_original_aspect_ratio=decrease:force_divisible_by=2"),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
    ];

    match options.method {
        CompressionMethod::Auto => {
            args.extend([
                "-crf".to_string(),
                "23".to_string(),
                "-maxrate".to_string(),
                options.max_bitrate.to_string(),
                "-bufsize".to_string(),
                (options.max_bitrate * 2).to_string(),
            ]);
        }
        CompressionMethod::Manual => {
            args.extend([
                "-b:v".to_string(),
                options.max_bitrate.to_string(),
                "-maxrate".to_string(),
                options.max_bitrate.to_string(),
                "-bufsize".to_string(),
                (options.max_bitrate * 2).to_string(),
            ]);
        }
    }

    args.extend([
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        "128k".to_string(),
    ]);
    args.push(dest.to_string_lossy().to_string());
    args
}

/// Parse one `-progress pipe:1` line into elapsed output seconds
fn parse_progress_line(line: &str) -> Option<f64> {
    let micros: i64 = line.strip_prefix("out_time_us=")?.trim().parse().ok()?;
    if micros < 0 {
        // ffmpeg emits a sentinel before the first frame lands.
        return None;
    }
    Some(micros as f64 / 1_000_000.0)
}

/// Run ffmpeg to completion, streaming progress fractions into `tx`
fn run_ffmpeg(
    args: &[String],
    duration_secs: f64,
    tx: mpsc::UnboundedSender<f32>,
) -> Result<(), CompressionError> {
    let mut process = Command::new("ffmpeg")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CompressionError::Ffmpeg(format!("failed to start ffmpeg: {}", e)))?;

    let stdout = process
        .stdout
        .take()
        .ok_or_else(|| CompressionError::Ffmpeg("failed to capture ffmpeg stdout".to_string()))?;

    for line in BufReader::new(stdout).lines() {
        let line = line?;
        if let Some(elapsed) = parse_progress_line(&line) {
            if duration_secs > 0.0 {
                let fraction = (elapsed / duration_secs).clamp(0.0, 1.0) as f32;
                let _ = tx.send(fraction);
            }
        }
    }

    let status = process
        .wait()
        .map_err(|e| CompressionError::Ffmpeg(format!("failed to wait for ffmpeg: {}", e)))?;

    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut err) = process.stderr.take() {
            let _ = err.read_to_string(&mut stderr);
        }
        return Err(CompressionError::Ffmpeg(format!(
            "ffmpeg exited with {}: {}",
            status,
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_source_strips_file_scheme() {
        assert_eq!(local_source("file:///media/clip.mp4"), Path::new("/media/clip.mp4"));
        assert_eq!(local_source("/media/clip.mp4"), Path::new("/media/clip.mp4"));
    }

    #[test]
    fn test_auto_args_use_crf_with_bitrate_cap() {
        let options = CompressionOptions::default();
        let args = build_encode_args(Path::new("/in.mp4"), Path::new("/out.mp4"), &options);
        let vf = args.iter().find(|a| a.contains("scale=")).unwrap();
        assert!(vf.contains("min(iw\\,720)"));
        assert!(args.contains(&"-crf".to_string()));
        assert!(args.contains(&"4000000".to_string()));
        assert_eq!(args.last().unwrap(), "/out.mp4");
    }

    #[test]
    fn test_manual_args_use_target_bitrate() {
        let options = CompressionOptions {
            method: CompressionMethod::Manual,
            ..CompressionOptions::default()
        };
        let args = build_encode_args(Path::new("/in.mp4"), Path::new("/out.mp4"), &options);
        assert!(args.contains(&"-b:v".to_string()));
        assert!(!args.contains(&"-crf".to_string()));
    }

    #[test]
    fn test_parse_progress_line() {
        assert_eq!(parse_progress_line("out_time_us=2500000"), Some(2.5));
        assert_eq!(parse_progress_line("out_time_us=-9223372036854775808"), None);
        assert_eq!(parse_progress_line("frame=42"), None);
        assert_eq!(parse_progress_line("progress=end"), None);
    }

    #[tokio::test]
    async fn test_sub_threshold_source_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tiny.mp4");
        std::fs::write(&source, b"tiny clip").unwrap();

        let compressor = FfmpegCompressor::with_output_dir(dir.path());
        let out = compressor
            .compress(&source, &CompressionOptions::default(), &|_| {})
            .await
            .unwrap();
        assert_eq!(out, source);
    }
}
