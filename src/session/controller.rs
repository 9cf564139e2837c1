use std::path::PathBuf;
use std::time::Duration;

use crate::assets::fetch::ImageFetcher;
use crate::assets::fonts::FontSet;
use crate::clock::FrameClock;
use crate::config::SlideshowConfig;
use crate::encode::sink::FrameSink;
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::photos::model::Photo;
use crate::photos::source::PhotoSource;
use crate::session::cancel::CancelToken;
use crate::session::download::{DownloadTarget, slideshow_file_name};
use crate::session::generation::{GenerationSession, SegmentRecord};
use crate::session::observer::{Notice, SessionObserver, TracingObserver};
use crate::slides::plan::SlideshowPlan;

/// Photos shown as previews in the ready view.
pub const PREVIEW_LIMIT: usize = 8;

/// What the generated video contains.
pub const INCLUDED_FEATURES: [&str; 5] = [
    "Title slide with name",
    "Ken Burns zoom effect",
    "Photo captions & dates",
    "Smooth transitions",
    "End slide with branding",
];

/// Controller lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "message")]
pub enum GeneratorState {
    /// Not opened yet.
    Idle,
    /// Fetching the photo list.
    LoadingPhotos,
    /// The child has no photos; nothing to generate.
    Empty,
    /// Photos loaded; generation can start.
    Ready,
    /// A generation run is in progress.
    Generating,
    /// The last run finished and was saved.
    Complete,
    /// Loading or generation failed.
    Error(String),
    /// Closed by the user or by cancellation.
    Closed,
}

/// Summary shown before generating.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReadyView {
    /// Photos that will be included.
    pub photo_count: usize,
    /// First few photos, in show order.
    pub previews: Vec<Photo>,
    /// Contents of the video.
    pub features: Vec<&'static str>,
    /// Output format line.
    pub format_note: String,
    /// Nominal running time.
    pub nominal_duration: Duration,
}

impl ReadyView {
    /// `N photos will be included`.
    pub fn count_line(&self) -> String {
        format!("{} photos will be included", self.photo_count)
    }
}

/// Outcome of a successful [`SlideshowGenerator::generate`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GenerationReport {
    /// Name the video was saved under.
    pub file_name: String,
    /// Where it was saved.
    pub saved_to: PathBuf,
    /// MIME type of the saved container.
    pub mime: String,
    /// Photos rendered.
    pub photo_count: usize,
    /// Frames handed to the encoder.
    pub frames_captured: u64,
    /// Segments in paint order.
    pub segments: Vec<SegmentRecord>,
    /// Length of the recording.
    pub recorded: Duration,
}

/// Drives one child's slideshow: load photos once per open, then generate on demand.
pub struct SlideshowGenerator {
    child_id: String,
    child_name: String,
    cfg: SlideshowConfig,
    source: Box<dyn PhotoSource>,
    fetcher: Box<dyn ImageFetcher>,
    fonts: FontSet,
    observer: Box<dyn SessionObserver>,

    state: GeneratorState,
    photos: Vec<Photo>,
}

impl SlideshowGenerator {
    /// Controller for `child_id`, shown as `child_name`. Fonts resolve from `cfg.fonts`; no
    /// usable face is a validation error.
    pub fn new(
        child_id: impl Into<String>,
        child_name: impl Into<String>,
        cfg: SlideshowConfig,
        source: Box<dyn PhotoSource>,
        fetcher: Box<dyn ImageFetcher>,
    ) -> SlideshowResult<Self> {
        cfg.validate()?;
        let fonts = FontSet::resolve(&cfg.fonts)?;
        Ok(Self {
            child_id: child_id.into(),
            child_name: child_name.into(),
            cfg,
            source,
            fetcher,
            fonts,
            observer: Box::new(TracingObserver),
            state: GeneratorState::Idle,
            photos: Vec::new(),
        })
    }

    /// Replace the font set.
    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = fonts;
        self
    }

    /// Replace the observer (defaults to [`TracingObserver`]).
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current state.
    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Photos loaded by the last `open`.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Active configuration.
    pub fn config(&self) -> &SlideshowConfig {
        &self.cfg
    }

    /// Child display name.
    pub fn child_name(&self) -> &str {
        &self.child_name
    }

    fn set_state(&mut self, state: GeneratorState) {
        tracing::debug!(from = ?self.state, to = ?state, "generator transition");
        self.state = state;
        self.observer.state_changed(&self.state);
    }

    /// Load the photo list. Allowed from `Idle`, `Error` and `Closed`.
    #[tracing::instrument(skip(self), fields(child_id = %self.child_id))]
    pub fn open(&mut self) -> SlideshowResult<&GeneratorState> {
        match self.state {
            GeneratorState::Idle | GeneratorState::Error(_) | GeneratorState::Closed => {}
            ref other => {
                return Err(SlideshowError::validation(format!(
                    "cannot open from state {other:?}"
                )));
            }
        }

        self.photos.clear();
        self.set_state(GeneratorState::LoadingPhotos);
        match self.source.fetch_photos(&self.child_id) {
            Ok(photos) if photos.is_empty() => {
                self.observer.notice(&Notice::info("No photos to include"));
                self.set_state(GeneratorState::Empty);
            }
            Ok(photos) => {
                tracing::info!(count = photos.len(), "photos loaded");
                self.photos = photos;
                self.set_state(GeneratorState::Ready);
            }
            Err(e) => {
                tracing::error!(error = %e, "photo list fetch failed");
                self.observer.notice(&Notice::error("Failed to load photos"));
                self.set_state(GeneratorState::Error(e.to_string()));
                return Err(e);
            }
        }
        Ok(&self.state)
    }

    /// Pre-generation summary; `None` unless photos are loaded.
    pub fn ready_view(&self) -> Option<ReadyView> {
        if !matches!(self.state, GeneratorState::Ready | GeneratorState::Complete) {
            return None;
        }
        let codec = self.cfg.encoder.codec;
        Some(ReadyView {
            photo_count: self.photos.len(),
            previews: self.photos.iter().take(PREVIEW_LIMIT).cloned().collect(),
            features: INCLUDED_FEATURES.to_vec(),
            format_note: format!("Video will download as {} format", codec.format_label()),
            nominal_duration: self.plan().total(),
        })
    }

    /// Nominal timeline for the loaded photos.
    pub fn plan(&self) -> SlideshowPlan {
        SlideshowPlan::new(&self.cfg, self.photos.len())
    }

    /// Render, encode and save the slideshow. Allowed from `Ready` and `Complete`.
    ///
    /// Cancellation closes the controller; any other failure moves it to `Error`. Nothing is
    /// saved unless the whole run succeeds.
    #[tracing::instrument(skip_all, fields(child_id = %self.child_id))]
    pub fn generate(
        &mut self,
        sink: &mut dyn FrameSink,
        clock: &mut dyn FrameClock,
        downloads: &dyn DownloadTarget,
        cancel: &CancelToken,
    ) -> SlideshowResult<GenerationReport> {
        if !matches!(self.state, GeneratorState::Ready | GeneratorState::Complete) {
            return Err(SlideshowError::validation(format!(
                "cannot generate from state {:?}",
                self.state
            )));
        }
        self.fonts.require_any()?;
        self.set_state(GeneratorState::Generating);

        let result = self.run_and_save(sink, clock, downloads, cancel);
        match &result {
            Ok(report) => {
                self.observer.notice(&Notice::success("🎬 Video downloaded!"));
                tracing::info!(path = %report.saved_to.display(), "slideshow ready");
                self.set_state(GeneratorState::Complete);
            }
            Err(e) if e.is_cancelled() => {
                self.set_state(GeneratorState::Closed);
            }
            Err(e) => {
                self.observer.notice(&Notice::error("Failed to generate video"));
                self.set_state(GeneratorState::Error(e.to_string()));
            }
        }
        result
    }

    fn run_and_save(
        &self,
        sink: &mut dyn FrameSink,
        clock: &mut dyn FrameClock,
        downloads: &dyn DownloadTarget,
        cancel: &CancelToken,
    ) -> SlideshowResult<GenerationReport> {
        let mut session = GenerationSession::new(
            &self.cfg,
            self.fonts.clone(),
            self.observer.as_ref(),
            cancel.clone(),
        );
        let summary = session.run(
            &self.child_name,
            &self.photos,
            self.fetcher.as_ref(),
            sink,
            clock,
        )?;
        let blob = session
            .take_output()
            .ok_or_else(|| SlideshowError::encode("recording finished without output"))?;
        cancel.check()?;

        let file_name = slideshow_file_name(&self.child_name, &blob.extension);
        let saved_to = downloads.save(&file_name, &blob)?;
        Ok(GenerationReport {
            file_name,
            saved_to,
            mime: blob.mime,
            photo_count: summary.photo_count,
            frames_captured: summary.frames_captured,
            segments: summary.segments,
            recorded: summary.recorded,
        })
    }

    /// Close the controller and forget the loaded photos.
    pub fn close(&mut self) {
        self.photos.clear();
        self.set_state(GeneratorState::Closed);
    }
}

impl std::fmt::Debug for SlideshowGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideshowGenerator")
            .field("child_id", &self.child_id)
            .field("state", &self.state)
            .field("photos", &self.photos.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
