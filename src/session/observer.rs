use std::sync::{Arc, Mutex};

use crate::session::controller::GeneratorState;
use crate::session::generation::SessionState;

/// Severity of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Neutral status.
    Info,
    /// Something finished well.
    Success,
    /// Something failed.
    Error,
}

/// Short plain-language message for the user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Info notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Render progress through the photo list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Progress {
    /// 0..=100, non-decreasing within one run.
    pub percent: u8,
    /// Photo being rendered (zero-based).
    pub current_photo_index: usize,
    /// Photos in the run.
    pub total_photos: usize,
}

impl Progress {
    /// `Photo X of N`, one-based.
    pub fn label(&self) -> String {
        format!(
            "Photo {} of {}",
            (self.current_photo_index + 1).min(self.total_photos.max(1)),
            self.total_photos
        )
    }
}

/// Receives lifecycle events. Every method defaults to doing nothing.
pub trait SessionObserver {
    /// Controller state changed.
    fn state_changed(&self, _state: &GeneratorState) {}
    /// Session state changed.
    fn session_state(&self, _state: SessionState) {}
    /// Progress update.
    fn progress(&self, _progress: Progress) {}
    /// User-facing notice.
    fn notice(&self, _notice: &Notice) {}
}

impl<T: SessionObserver + ?Sized> SessionObserver for Arc<T> {
    fn state_changed(&self, state: &GeneratorState) {
        (**self).state_changed(state)
    }

    fn session_state(&self, state: SessionState) {
        (**self).session_state(state)
    }

    fn progress(&self, progress: Progress) {
        (**self).progress(progress)
    }

    fn notice(&self, notice: &Notice) {
        (**self).notice(notice)
    }
}

/// Ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn state_changed(&self, state: &GeneratorState) {
        tracing::debug!(?state, "generator state");
    }

    fn session_state(&self, state: SessionState) {
        tracing::debug!(?state, "session state");
    }

    fn progress(&self, progress: Progress) {
        tracing::info!(
            percent = progress.percent,
            "{}",
            progress.label()
        );
    }

    fn notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::error!("{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{}", notice.message),
        }
    }
}

/// One observed event, as kept by [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservedEvent {
    /// Controller state.
    State(GeneratorState),
    /// Session state.
    Session(SessionState),
    /// Progress update.
    Progress(Progress),
    /// Notice.
    Notice(Notice),
}

/// Keeps every event in order; useful in tests and for replaying a run.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Progress updates so far.
    pub fn progress_updates(&self) -> Vec<Progress> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Notices so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SessionObserver for RecordingObserver {
    fn state_changed(&self, state: &GeneratorState) {
        self.push(ObservedEvent::State(state.clone()));
    }

    fn session_state(&self, state: SessionState) {
        self.push(ObservedEvent::Session(state));
    }

    fn progress(&self, progress: Progress) {
        self.push(ObservedEvent::Progress(progress));
    }

    fn notice(&self, notice: &Notice) {
        self.push(ObservedEvent::Notice(notice.clone()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/observer.rs"]
mod tests;
