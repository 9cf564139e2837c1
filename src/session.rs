//! Generation lifecycle: controller, per-run session, cancellation, observers, downloads.

/// Cooperative cancellation.
pub mod cancel;
/// User-facing generator state machine.
pub mod controller;
/// Saving finished videos.
pub mod download;
/// One render-and-record run.
pub mod generation;
/// State, progress and notice callbacks.
pub mod observer;

pub use cancel::CancelToken;
pub use controller::{GenerationReport, GeneratorState, ReadyView, SlideshowGenerator};
pub use download::{DirectoryDownloads, DownloadTarget, slideshow_file_name};
pub use generation::{GenerationSession, RunSummary, SegmentKind, SegmentRecord, SessionState};
pub use observer::{
    Notice, NoticeLevel, NullObserver, ObservedEvent, Progress, RecordingObserver,
    SessionObserver, TracingObserver,
};
