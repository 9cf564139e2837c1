//! Frame capture and video encoding.

/// `ffmpeg`-based sink (WebM or MP4 via system `ffmpeg`).
pub mod ffmpeg;
/// Tick-driven capture of the surface into a sink.
pub mod recorder;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec, is_ffmpeg_available};
pub use recorder::Recorder;
pub use sink::{FrameSink, InMemorySink, SinkConfig, VideoBlob};
