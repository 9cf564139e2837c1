use std::time::Duration;

use crate::config::TransitionConfig;
use crate::foundation::core::Rgba8;

/// Fade-to-backdrop between two photos.
///
/// `steps + 1` translucent overlays of the backdrop color are stacked on the last photo frame,
/// with alpha `k / steps` for `k = 0..=steps`, each followed by [`Crossfade::pause`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossfade {
    color: Rgba8,
    steps: u32,
    pause: Duration,
}

impl Crossfade {
    /// Fade towards `color` using `cfg`.
    pub fn new(cfg: &TransitionConfig, color: Rgba8) -> Self {
        let steps = cfg.steps.max(1);
        Self {
            color,
            steps,
            pause: cfg.step_pause(),
        }
    }

    /// Overlay colors in paint order.
    pub fn overlays(&self) -> impl Iterator<Item = Rgba8> + '_ {
        (0..=self.steps).map(move |k| self.color.with_alpha(k as f32 / self.steps as f32))
    }

    /// Number of overlays.
    pub fn overlay_count(&self) -> u32 {
        self.steps + 1
    }

    /// Wait after each overlay.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Nominal length of the whole fade.
    pub fn duration(&self) -> Duration {
        self.pause * self.overlay_count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slides/transition.rs"]
mod tests;
