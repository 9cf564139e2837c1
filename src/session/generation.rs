use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::PreparedImage;
use crate::assets::fetch::ImageFetcher;
use crate::assets::fonts::FontSet;
use crate::assets::preload::preload_images;
use crate::clock::FrameClock;
use crate::config::SlideshowConfig;
use crate::encode::recorder::Recorder;
use crate::encode::sink::{FrameSink, SinkConfig, VideoBlob};
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::photos::model::Photo;
use crate::render::cpu::CpuRasterizer;
use crate::render::surface::Surface;
use crate::session::cancel::CancelToken;
use crate::session::observer::{Notice, Progress, SessionObserver};
use crate::slides::SlideContext;
use crate::slides::photo::photo_scene;
use crate::slides::title::{end_scene, title_scene};
use crate::slides::transition::Crossfade;

/// Where a single run is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created, not started.
    Idle,
    /// Fetching and decoding images.
    Loading,
    /// Painting slides while the recorder captures.
    Rendering,
    /// Waiting for the encoder to finish.
    Encoding,
    /// Output is available.
    Complete,
    /// Failed or cancelled.
    Error,
}

/// Which part of the show a segment covers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SegmentKind {
    /// Title slide hold.
    Title,
    /// Ken Burns segment.
    Photo {
        /// Position in the photo list.
        index: usize,
        /// Caption drawn.
        caption: String,
    },
    /// Fade after photo `after`.
    Transition {
        /// Photo faded out.
        after: usize,
    },
    /// End slide hold.
    End,
}

/// Timing of one painted segment, relative to the start of recording.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SegmentRecord {
    /// Segment.
    pub kind: SegmentKind,
    /// First paint.
    pub start: Duration,
    /// When the segment handed over to the next one.
    pub end: Duration,
    /// Paints performed (frames drawn, overlays applied).
    pub frames_drawn: u64,
}

impl SegmentRecord {
    /// Wall length of the segment.
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// What a finished run produced, besides the video itself.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RunSummary {
    /// Photos rendered.
    pub photo_count: usize,
    /// Frames handed to the encoder.
    pub frames_captured: u64,
    /// Segments in paint order.
    pub segments: Vec<SegmentRecord>,
    /// Length of the recording.
    pub recorded: Duration,
}

/// One generate request: preload, paint every slide while recording, encode.
///
/// Owns the surface for the duration of [`GenerationSession::run`]; nothing outlives the session
/// except the output blob.
pub struct GenerationSession<'a> {
    cfg: &'a SlideshowConfig,
    fonts: FontSet,
    observer: &'a dyn SessionObserver,
    cancel: CancelToken,

    state: SessionState,
    progress_percent: u8,
    current_photo_index: usize,
    output: Option<VideoBlob>,
}

impl<'a> GenerationSession<'a> {
    /// New idle session.
    pub fn new(
        cfg: &'a SlideshowConfig,
        fonts: FontSet,
        observer: &'a dyn SessionObserver,
        cancel: CancelToken,
    ) -> Self {
        Self {
            cfg,
            fonts,
            observer,
            cancel,
            state: SessionState::Idle,
            progress_percent: 0,
            current_photo_index: 0,
            output: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last published percent.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Photo being (or last) rendered.
    pub fn current_photo_index(&self) -> usize {
        self.current_photo_index
    }

    /// Move the finished video out. `None` unless the run completed.
    pub fn take_output(&mut self) -> Option<VideoBlob> {
        self.output.take()
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.observer.session_state(state);
    }

    fn publish_progress(&mut self, index: usize, total: usize, done: usize) {
        let mut percent = percent_of(done, total);
        if done < total {
            percent = percent.min(99);
        }
        self.current_photo_index = index;
        self.progress_percent = self.progress_percent.max(percent);
        self.observer.progress(Progress {
            percent: self.progress_percent,
            current_photo_index: index,
            total_photos: total,
        });
    }

    /// Run the whole pipeline for `photos`, in order.
    ///
    /// On failure or cancellation the sink is aborted and no output is kept.
    #[tracing::instrument(skip_all, fields(child = child_name, photos = photos.len()))]
    pub fn run(
        &mut self,
        child_name: &str,
        photos: &[Photo],
        fetcher: &dyn ImageFetcher,
        sink: &mut dyn FrameSink,
        clock: &mut dyn FrameClock,
    ) -> SlideshowResult<RunSummary> {
        let result = self.run_inner(child_name, photos, fetcher, sink, clock);
        match &result {
            Ok(summary) => {
                tracing::info!(
                    frames = summary.frames_captured,
                    recorded_ms = summary.recorded.as_millis() as u64,
                    "slideshow recorded"
                );
                self.set_state(SessionState::Complete);
            }
            Err(e) => {
                if e.is_cancelled() {
                    tracing::info!("generation cancelled");
                } else {
                    tracing::error!(error = %e, "generation failed");
                }
                self.output = None;
                self.set_state(SessionState::Error);
            }
        }
        result
    }

    fn run_inner(
        &mut self,
        child_name: &str,
        photos: &[Photo],
        fetcher: &dyn ImageFetcher,
        sink: &mut dyn FrameSink,
        clock: &mut dyn FrameClock,
    ) -> SlideshowResult<RunSummary> {
        if photos.is_empty() {
            return Err(SlideshowError::validation("no photos to include"));
        }
        self.cfg.validate()?;
        self.fonts.require_any()?;
        self.cancel.check()?;

        self.set_state(SessionState::Loading);
        self.observer.notice(&Notice::info("Loading images..."));
        let images = preload_images(photos, fetcher)?;
        self.cancel.check()?;

        self.set_state(SessionState::Rendering);
        let mut surface = Surface::new(
            self.cfg.canvas,
            Box::new(CpuRasterizer::new(self.fonts.clone())),
        );
        let sink_cfg = SinkConfig {
            width: self.cfg.canvas.width,
            height: self.cfg.canvas.height,
            fps: self.cfg.fps,
        };
        let mut recorder = Recorder::start(sink, sink_cfg, clock.now())?;
        let origin = clock.now();

        let painted = self.paint_show(
            child_name,
            photos,
            &images,
            &mut surface,
            &mut recorder,
            clock,
            origin,
        );
        let segments = match painted {
            Ok(segments) => segments,
            Err(e) => {
                recorder.abort();
                return Err(e);
            }
        };
        if let Err(e) = self.cancel.check() {
            recorder.abort();
            return Err(e);
        }

        self.set_state(SessionState::Encoding);
        let stop_at = clock.now();
        let (blob, frames_captured) = recorder.stop(stop_at, &surface)?;
        self.output = Some(blob);

        Ok(RunSummary {
            photo_count: photos.len(),
            frames_captured,
            segments,
            recorded: stop_at.saturating_sub(origin),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_show(
        &mut self,
        child_name: &str,
        photos: &[Photo],
        images: &[Arc<PreparedImage>],
        surface: &mut Surface,
        recorder: &mut Recorder<'_>,
        clock: &mut dyn FrameClock,
        origin: Duration,
    ) -> SlideshowResult<Vec<SegmentRecord>> {
        let cfg = self.cfg;
        let ctx = SlideContext::from_config(cfg);
        let fade = Crossfade::new(&cfg.transition, cfg.theme.background);
        let interval = cfg.fps.frame_interval();
        let total = photos.len();
        let since = |now: Duration| now.saturating_sub(origin);
        let mut segments = Vec::with_capacity(total * 2 + 2);

        // title
        let start = since(clock.now());
        self.paint(surface, recorder, clock, &title_scene(&ctx, child_name, cfg.year()))?;
        self.hold(cfg.title_hold(), surface, recorder, clock, interval)?;
        segments.push(SegmentRecord {
            kind: SegmentKind::Title,
            start,
            end: since(clock.now()),
            frames_drawn: 1,
        });

        for (i, (photo, image)) in photos.iter().zip(images).enumerate() {
            self.publish_progress(i, total, i);

            let caption = photo.caption();
            let date_line = photo.date_line();
            let duration = cfg.photo_duration();
            let seg_start = clock.now();
            let mut frames_drawn = 0u64;
            loop {
                self.cancel.check()?;
                let elapsed = clock.now().saturating_sub(seg_start);
                if elapsed >= duration {
                    break;
                }
                let t = elapsed.as_secs_f64() / duration.as_secs_f64();
                self.paint(
                    surface,
                    recorder,
                    clock,
                    &photo_scene(&ctx, image, caption, &date_line, t),
                )?;
                frames_drawn += 1;
                clock.sleep(interval);
            }
            segments.push(SegmentRecord {
                kind: SegmentKind::Photo {
                    index: i,
                    caption: caption.to_string(),
                },
                start: since(seg_start),
                end: since(clock.now()),
                frames_drawn,
            });
            self.publish_progress(i, total, i + 1);

            if i + 1 < total {
                let start = since(clock.now());
                let mut overlays = 0u64;
                for color in fade.overlays() {
                    self.cancel.check()?;
                    recorder.capture_before(clock.now(), surface)?;
                    surface.overlay(color);
                    overlays += 1;
                    clock.sleep(fade.pause());
                }
                segments.push(SegmentRecord {
                    kind: SegmentKind::Transition { after: i },
                    start,
                    end: since(clock.now()),
                    frames_drawn: overlays,
                });
            }
        }

        // end
        let start = since(clock.now());
        self.paint(surface, recorder, clock, &end_scene(&ctx))?;
        self.hold(cfg.end_hold(), surface, recorder, clock, interval)?;
        segments.push(SegmentRecord {
            kind: SegmentKind::End,
            start,
            end: since(clock.now()),
            frames_drawn: 1,
        });

        Ok(segments)
    }

    fn paint(
        &self,
        surface: &mut Surface,
        recorder: &mut Recorder<'_>,
        clock: &mut dyn FrameClock,
        scene: &crate::render::scene::Scene,
    ) -> SlideshowResult<()> {
        self.cancel.check()?;
        recorder.capture_before(clock.now(), surface)?;
        surface.draw(scene)
    }

    /// Keep the current picture up for `d`, waking every frame interval to feed the recorder
    /// and notice cancellation.
    fn hold(
        &self,
        d: Duration,
        surface: &Surface,
        recorder: &mut Recorder<'_>,
        clock: &mut dyn FrameClock,
        interval: Duration,
    ) -> SlideshowResult<()> {
        let until = clock.now() + d;
        loop {
            self.cancel.check()?;
            let now = clock.now();
            if now >= until {
                return Ok(());
            }
            recorder.capture_before(now, surface)?;
            clock.sleep((until - now).min(interval));
        }
    }
}

/// `round(100 * done / total)`, clamped to 100.
pub(crate) fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let p = ((done as f64 / total as f64) * 100.0).round();
    p.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/session/generation.rs"]
mod tests;
