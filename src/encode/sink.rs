use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when recording starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Capture rate.
    pub fps: Fps,
}

/// Finished recording, ready to be saved.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoBlob {
    /// MIME type, e.g. `video/webm`.
    pub mime: String,
    /// File extension without the dot, e.g. `webm`.
    pub extension: String,
    /// Encoded container bytes.
    pub bytes: Vec<u8>,
}

impl VideoBlob {
    /// Size of the encoded payload.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when nothing was produced.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for VideoBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoBlob")
            .field("mime", &self.mime)
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Sink contract for consuming captured frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order between
/// one `begin` and either `end` or `abort`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SlideshowResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SlideshowResult<()>;
    /// Finish the stream and hand back the encoded result. Returns only once encoding is done.
    fn end(&mut self) -> SlideshowResult<VideoBlob>;
    /// Tear down without producing output. Must be safe to call in any state.
    fn abort(&mut self);
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    fn begin(&mut self, cfg: SinkConfig) -> SlideshowResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SlideshowResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> SlideshowResult<VideoBlob> {
        (**self).end()
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// In-memory sink for tests and debugging. `end` yields the raw RGBA frames concatenated.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` completed.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// `true` once `abort` was called on a started recording.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SlideshowResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SlideshowResult<()> {
        if self.cfg.is_none() {
            return Err(SlideshowError::encode("in-memory sink not started"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(SlideshowError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SlideshowResult<VideoBlob> {
        if self.cfg.take().is_none() {
            return Err(SlideshowError::encode("in-memory sink not started"));
        }
        self.ended = true;
        let bytes = self
            .frames
            .iter()
            .flat_map(|(_, f)| f.data.iter().copied())
            .collect();
        Ok(VideoBlob {
            mime: "video/x-raw-rgba".to_string(),
            extension: "rgba".to_string(),
            bytes,
        })
    }

    fn abort(&mut self) {
        if self.cfg.take().is_some() {
            self.aborted = true;
        }
        self.frames.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
