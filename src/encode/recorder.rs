use std::time::Duration;

use crate::encode::sink::{FrameSink, SinkConfig, VideoBlob};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::SlideshowResult;
use crate::render::surface::Surface;

/// Samples the surface at a fixed capture rate and feeds the samples to a [`FrameSink`].
///
/// Tick `k` falls at `origin + k / fps`. Each tick carries whatever the surface held at that
/// instant, so the painter calls [`Recorder::capture_before`] right before every paint and the
/// recorder never looks at anything but pixels.
pub struct Recorder<'s> {
    sink: &'s mut dyn FrameSink,
    fps: Fps,
    origin: Duration,
    next_tick: u64,
}

impl<'s> Recorder<'s> {
    /// Begin the sink and anchor tick 0 at `now`.
    #[tracing::instrument(skip(sink), fields(width = cfg.width, height = cfg.height))]
    pub fn start(
        sink: &'s mut dyn FrameSink,
        cfg: SinkConfig,
        now: Duration,
    ) -> SlideshowResult<Self> {
        sink.begin(cfg)?;
        Ok(Self {
            sink,
            fps: cfg.fps,
            origin: now,
            next_tick: 0,
        })
    }

    /// Frames handed to the sink so far.
    pub fn frames_captured(&self) -> u64 {
        self.next_tick
    }

    /// Emit every tick that falls strictly before `now`, using the current surface.
    ///
    /// Returns how many frames were pushed.
    pub fn capture_before(&mut self, now: Duration, surface: &Surface) -> SlideshowResult<u64> {
        let due = self.fps.ticks_before(now.saturating_sub(self.origin));
        let start = self.next_tick;
        while self.next_tick < due {
            self.sink
                .push_frame(FrameIndex(self.next_tick), surface.frame())?;
            self.next_tick += 1;
        }
        Ok(self.next_tick - start)
    }

    /// Capture the remaining ticks up to `now`, then finish the sink.
    ///
    /// At least one frame is always emitted. Returns once the encoded blob is complete, together
    /// with the total number of frames captured.
    #[tracing::instrument(skip_all, fields(frames))]
    pub fn stop(mut self, now: Duration, surface: &Surface) -> SlideshowResult<(VideoBlob, u64)> {
        let result = self.capture_before(now, surface).and_then(|_| {
            if self.next_tick == 0 {
                self.sink.push_frame(FrameIndex(0), surface.frame())?;
                self.next_tick = 1;
            }
            tracing::Span::current().record("frames", self.next_tick);
            let blob = self.sink.end()?;
            Ok((blob, self.next_tick))
        });
        if result.is_err() {
            self.sink.abort();
        }
        result
    }

    /// Tear down the sink without output.
    pub fn abort(self) {
        self.sink.abort();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/recorder.rs"]
mod tests;
