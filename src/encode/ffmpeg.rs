use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};

use crate::encode::sink::{FrameSink, SinkConfig, VideoBlob};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

const STDOUT_CHUNK: usize = 64 * 1024;

/// Output codec and container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// VP9 in WebM.
    #[default]
    Vp9,
    /// VP8 in WebM.
    Vp8,
    /// H.264 in fragmented MP4.
    H264,
}

impl VideoCodec {
    /// MIME type of the produced container.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Vp9 => "video/webm;codecs=vp9",
            Self::Vp8 => "video/webm;codecs=vp8",
            Self::H264 => "video/mp4",
        }
    }

    /// File extension of the produced container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Vp9 | Self::Vp8 => "webm",
            Self::H264 => "mp4",
        }
    }

    /// Container name as shown to users.
    pub fn format_label(self) -> &'static str {
        match self {
            Self::Vp9 | Self::Vp8 => "WebM",
            Self::H264 => "MP4",
        }
    }

    fn output_args(self, bitrate_bps: u64) -> Vec<String> {
        let bitrate = bitrate_bps.to_string();
        let mut args: Vec<String> = Vec::new();
        match self {
            Self::Vp9 | Self::Vp8 => {
                let encoder = if self == Self::Vp9 { "libvpx-vp9" } else { "libvpx" };
                args.extend(
                    [
                        "-c:v",
                        encoder,
                        "-b:v",
                        bitrate.as_str(),
                        "-pix_fmt",
                        "yuv420p",
                        "-deadline",
                        "realtime",
                        "-cpu-used",
                        "8",
                        "-f",
                        "webm",
                    ]
                    .map(String::from),
                );
            }
            Self::H264 => {
                args.extend(
                    [
                        "-c:v",
                        "libx264",
                        "-b:v",
                        bitrate.as_str(),
                        "-pix_fmt",
                        "yuv420p",
                        "-movflags",
                        "frag_keyframe+empty_moov",
                        "-f",
                        "mp4",
                    ]
                    .map(String::from),
                );
            }
        }
        args
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// `ffmpeg` executable; a bare name is looked up on `PATH`.
    pub ffmpeg_path: PathBuf,
    /// Output codec.
    pub codec: VideoCodec,
    /// Target video bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl Default for FfmpegSinkOpts {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            codec: VideoCodec::Vp9,
            bitrate_bps: 5_000_000,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that spawns `ffmpeg`, streams raw frames to stdin and collects the encoded container
/// from stdout.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_reader: Option<JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stdout_reader: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    fn teardown(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(h) = self.stdout_reader.take() {
            let _ = h.join();
        }
        if let Some(h) = self.stderr_drain.take() {
            let _ = h.join();
        }
        self.cfg = None;
        self.last_idx = None;
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(skip(self), fields(codec = ?self.opts.codec))]
    fn begin(&mut self, cfg: SinkConfig) -> SlideshowResult<()> {
        if self.child.is_some() {
            return Err(SlideshowError::encode("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(SlideshowError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SlideshowError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(SlideshowError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }
        if self.opts.bitrate_bps == 0 {
            return Err(SlideshowError::validation("bitrate must be non-zero"));
        }

        let mut cmd = Command::new(&self.opts.ffmpeg_path);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input: raw RGBA8 frames, flattened to opaque in push_frame.
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an"]);
        cmd.args(self.opts.codec.output_args(self.opts.bitrate_bps));
        cmd.arg("pipe:1");

        let mut child = cmd.spawn().map_err(|e| {
            SlideshowError::encode(format!(
                "failed to spawn '{}' (is ffmpeg installed?): {e}",
                self.opts.ffmpeg_path.display()
            ))
        })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(mut stdout), Some(mut stderr)) = (stdin, stdout, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SlideshowError::encode("failed to open ffmpeg pipes (unexpected)"));
        };

        let stdout_reader = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            let mut buf = vec![0u8; STDOUT_CHUNK];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                chunks.push(buf[..n].to_vec());
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(width = cfg.width, height = cfg.height, "ffmpeg started");
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SlideshowResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlideshowError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(SlideshowError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(SlideshowError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(SlideshowError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlideshowError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            SlideshowError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn end(&mut self) -> SlideshowResult<VideoBlob> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SlideshowError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            SlideshowError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let chunks = match self.stdout_reader.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlideshowError::encode("ffmpeg stdout reader thread panicked"))?
                .map_err(|e| SlideshowError::encode(format!("ffmpeg stdout read failed: {e}")))?,
            None => Vec::new(),
        };
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlideshowError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| SlideshowError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;
        self.last_idx = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SlideshowError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        let bytes = assemble_chunks(chunks);
        if bytes.is_empty() {
            return Err(SlideshowError::encode("ffmpeg produced no output"));
        }
        tracing::debug!(bytes = bytes.len(), "ffmpeg finished");
        Ok(VideoBlob {
            mime: self.opts.codec.mime().to_string(),
            extension: self.opts.codec.extension().to_string(),
            bytes,
        })
    }

    fn abort(&mut self) {
        if self.child.is_some() {
            tracing::debug!("aborting ffmpeg");
        }
        self.teardown();
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.teardown();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn assemble_chunks(chunks: Vec<Vec<u8>>) -> Vec<u8> {
    let total = chunks.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for c in chunks.into_iter().filter(|c| !c.is_empty()) {
        out.extend_from_slice(&c);
    }
    out
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> SlideshowResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(SlideshowError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        d[0] = (u16::from(s[0]) + mul_div255_u16(bg_r, inv)).min(255) as u8;
        d[1] = (u16::from(s[1]) + mul_div255_u16(bg_g, inv)).min(255) as u8;
        d[2] = (u16::from(s[2]) + mul_div255_u16(bg_b, inv)).min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Return `true` when `ffmpeg_path -version` runs successfully.
pub fn is_ffmpeg_available(ffmpeg_path: &Path) -> bool {
    Command::new(ffmpeg_path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
