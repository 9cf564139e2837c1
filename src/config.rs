//! Runtime configuration for slideshow generation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::ken_burns::KenBurns;
use crate::assets::decode::MAX_IMAGE_EDGE;
use crate::assets::fonts::FontSources;
use crate::encode::ffmpeg::{FfmpegSinkOpts, VideoCodec};
use crate::foundation::core::{CanvasSize, Fps, Rgba8};
use crate::foundation::error::{SlideshowError, SlideshowResult};

/// Cross-fade between consecutive photos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Total fade time.
    pub duration_ms: u64,
    /// Number of alpha increments; `steps + 1` overlays are drawn.
    pub steps: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            steps: 10,
        }
    }
}

impl TransitionConfig {
    /// Pause after each overlay.
    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.duration_ms) / self.steps.max(1)
    }
}

/// Encoder settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Output codec/container.
    pub codec: VideoCodec,
    /// Target bitrate in bits per second.
    pub bitrate_bps: u64,
    /// `ffmpeg` executable.
    pub ffmpeg_path: PathBuf,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            codec: VideoCodec::Vp9,
            bitrate_bps: 5_000_000,
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

/// Colors and fixed strings painted on the slides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Photo backdrop, gradient start and cross-fade color.
    pub background: Rgba8,
    /// Gradient end on the title and end slides.
    pub gradient_end: Rgba8,
    /// Child name and whale color.
    pub accent: Rgba8,
    /// Caption band behind photo captions.
    pub caption_bar: Rgba8,
    /// Line under the child's name.
    pub subtitle: String,
    /// Product name on the end slide.
    pub branding: String,
    /// Site line on the end slide.
    pub site: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(0x1a, 0x1a, 0x2e),
            gradient_end: Rgba8::rgb(0x16, 0x21, 0x3e),
            accent: Rgba8::rgb(0x4e, 0xcc, 0xa3),
            caption_bar: Rgba8::rgb_alpha(0, 0, 0, 0.6),
            subtitle: "Learning Journey".to_string(),
            branding: "My Classroom".to_string(),
            site: "teacherpotato.xyz".to_string(),
        }
    }
}

/// Everything that shapes a generated slideshow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Output size.
    pub canvas: CanvasSize,
    /// Paint and capture rate.
    pub fps: Fps,
    /// Length of one photo segment.
    pub photo_duration_ms: u64,
    /// Hold time of the title slide.
    pub title_hold_ms: u64,
    /// Hold time of the end slide.
    pub end_hold_ms: u64,
    /// Cross-fade settings.
    pub transition: TransitionConfig,
    /// Zoom applied during photo segments.
    pub ken_burns: KenBurns,
    /// Encoder settings.
    pub encoder: EncoderConfig,
    /// Slide look.
    pub theme: Theme,
    /// Font files; unset faces are discovered from the system.
    pub fonts: FontSources,
    /// Year on the title slide; defaults to the current local year.
    pub title_year: Option<i32>,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize {
                width: 1920,
                height: 1080,
            },
            fps: Fps { num: 30, den: 1 },
            photo_duration_ms: 3000,
            title_hold_ms: 2000,
            end_hold_ms: 2000,
            transition: TransitionConfig::default(),
            ken_burns: KenBurns::default(),
            encoder: EncoderConfig::default(),
            theme: Theme::default(),
            fonts: FontSources::default(),
            title_year: None,
        }
    }
}

impl SlideshowConfig {
    /// Read a JSON config file and validate it. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> SlideshowResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes).map_err(|e| {
            SlideshowError::serde(format!("invalid config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> SlideshowResult<()> {
        let CanvasSize { width, height } = self.canvas;
        if width == 0 || height == 0 {
            return Err(SlideshowError::validation("canvas width/height must be > 0"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(SlideshowError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if width > MAX_IMAGE_EDGE || height > MAX_IMAGE_EDGE {
            return Err(SlideshowError::validation(format!(
                "canvas edges above {MAX_IMAGE_EDGE} px are not supported"
            )));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(SlideshowError::validation("fps num/den must be > 0"));
        }
        if self.photo_duration_ms == 0 {
            return Err(SlideshowError::validation("photo_duration_ms must be > 0"));
        }
        if self.transition.steps == 0 {
            return Err(SlideshowError::validation("transition.steps must be >= 1"));
        }
        if self.encoder.bitrate_bps == 0 {
            return Err(SlideshowError::validation("encoder.bitrate_bps must be > 0"));
        }
        self.ken_burns.validate()
    }

    /// Photo segment length.
    pub fn photo_duration(&self) -> Duration {
        Duration::from_millis(self.photo_duration_ms)
    }

    /// Title slide hold.
    pub fn title_hold(&self) -> Duration {
        Duration::from_millis(self.title_hold_ms)
    }

    /// End slide hold.
    pub fn end_hold(&self) -> Duration {
        Duration::from_millis(self.end_hold_ms)
    }

    /// Year printed on the title slide.
    pub fn year(&self) -> i32 {
        use chrono::Datelike as _;
        self.title_year.unwrap_or_else(|| chrono::Local::now().year())
    }

    /// ffmpeg sink options matching this config; alpha flattens over the theme background.
    pub fn ffmpeg_opts(&self) -> FfmpegSinkOpts {
        FfmpegSinkOpts {
            ffmpeg_path: self.encoder.ffmpeg_path.clone(),
            codec: self.encoder.codec,
            bitrate_bps: self.encoder.bitrate_bps,
            bg_rgba: self.theme.background.to_array(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
