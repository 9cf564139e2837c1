//! Montree slideshow renders a child's portfolio photos into a short video.
//!
//! A run goes through three phases:
//!
//! - Load the child's [`Photo`] list from a [`PhotoSource`]
//! - Preload and decode every image up front
//! - Paint title, Ken Burns photo segments, cross-fades and an end slide onto a [`Surface`]
//!   while a [`Recorder`] captures it into a [`FrameSink`]
//!
//! [`SlideshowGenerator`] drives the whole lifecycle and saves the result through a
//! [`DownloadTarget`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod assets;
pub mod clock;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod photos;
pub mod render;
pub mod session;
pub mod slides;

pub use crate::foundation::core::{CanvasSize, Fps, FrameIndex, Rgba8};
pub use crate::foundation::error::{SlideshowError, SlideshowResult};

pub use crate::animation::ken_burns::KenBurns;
pub use crate::assets::fetch::{HttpImageFetcher, ImageFetcher, MemoryImageFetcher};
pub use crate::assets::fonts::{FontSet, FontSources, TextWeight};
pub use crate::clock::{FrameClock, ManualClock, WallClock};
pub use crate::config::{EncoderConfig, SlideshowConfig, Theme, TransitionConfig};
pub use crate::encode::{
    FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, Recorder, SinkConfig, VideoBlob,
    VideoCodec,
};
pub use crate::photos::model::Photo;
pub use crate::photos::source::{
    HttpPhotoSource, JsonFilePhotoSource, PhotoSource, StaticPhotoSource,
};
pub use crate::render::{FrameRGBA, Surface};
pub use crate::session::{
    CancelToken, DirectoryDownloads, DownloadTarget, GenerationReport, GeneratorState,
    SessionObserver, SlideshowGenerator,
};
pub use crate::slides::plan::SlideshowPlan;
