use std::sync::Arc;
use std::time::Duration;

use crate::assets::decode::PreparedImage;
use crate::config::SlideshowConfig;
use crate::foundation::error::{SlideshowError, SlideshowResult};
use crate::photos::model::Photo;
use crate::render::surface::Surface;
use crate::slides::SlideContext;
use crate::slides::photo::photo_scene;
use crate::slides::title::{end_scene, title_scene};
use crate::slides::transition::Crossfade;

/// What is on screen during one part of the show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Stage {
    /// Opening slide.
    Title,
    /// Ken Burns segment of photo `index`.
    Photo {
        /// Position in the photo list.
        index: usize,
    },
    /// Fade out of photo `after`.
    Transition {
        /// Photo being faded out.
        after: usize,
    },
    /// Closing slide.
    End,
}

/// One stage with its nominal placement on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlanEntry {
    /// Stage.
    pub stage: Stage,
    /// Nominal start.
    pub start: Duration,
    /// Nominal length.
    pub duration: Duration,
}

impl PlanEntry {
    /// Nominal end.
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }
}

/// Result of [`SlideshowPlan::locate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Located {
    /// Entry position in [`SlideshowPlan::entries`].
    pub entry: usize,
    /// Stage shown.
    pub stage: Stage,
    /// Fraction of the stage elapsed, in `[0, 1]`.
    pub progress: f64,
}

/// Nominal timeline: title, photos with fades between them, end.
///
/// Real runs drift from it by render time; it is used for previews and duration estimates.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlideshowPlan {
    entries: Vec<PlanEntry>,
}

impl SlideshowPlan {
    /// Lay out `photo_count` photos with `cfg` timings.
    pub fn new(cfg: &SlideshowConfig, photo_count: usize) -> Self {
        let fade = Crossfade::new(&cfg.transition, cfg.theme.background).duration();
        let mut entries = Vec::with_capacity(photo_count * 2 + 2);
        let mut at = Duration::ZERO;
        let mut push = |stage: Stage, duration: Duration| {
            entries.push(PlanEntry {
                stage,
                start: at,
                duration,
            });
            at += duration;
        };

        push(Stage::Title, cfg.title_hold());
        for index in 0..photo_count {
            push(Stage::Photo { index }, cfg.photo_duration());
            if index + 1 < photo_count {
                push(Stage::Transition { after: index }, fade);
            }
        }
        push(Stage::End, cfg.end_hold());
        Self { entries }
    }

    /// Entries in timeline order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Nominal total length.
    pub fn total(&self) -> Duration {
        self.entries.last().map(PlanEntry::end).unwrap_or_default()
    }

    /// Stage shown at `at`. Positions past the end land on the end slide.
    pub fn locate(&self, at: Duration) -> Located {
        let found = self
            .entries
            .iter()
            .enumerate()
            .find(|(_, e)| at < e.end())
            .or_else(|| self.entries.iter().enumerate().last());
        let Some((entry, e)) = found else {
            return Located {
                entry: 0,
                stage: Stage::End,
                progress: 1.0,
            };
        };
        let progress = if e.duration.is_zero() {
            1.0
        } else {
            (at.saturating_sub(e.start).as_secs_f64() / e.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        Located {
            entry,
            stage: e.stage,
            progress,
        }
    }
}

/// Material a still needs besides layout.
#[derive(Clone, Copy, Debug)]
pub struct StillContent<'a> {
    /// Name on the title slide.
    pub child_name: &'a str,
    /// Year on the title slide.
    pub year: i32,
    /// Photos in show order.
    pub photos: &'a [Photo],
    /// Decoded images, parallel to `photos`.
    pub images: &'a [Arc<PreparedImage>],
}

/// Paint what the show displays at `located` onto `surface`.
pub fn paint_still(
    surface: &mut Surface,
    ctx: &SlideContext<'_>,
    fade: &Crossfade,
    content: &StillContent<'_>,
    located: &Located,
) -> SlideshowResult<()> {
    match located.stage {
        Stage::Title => surface.draw(&title_scene(ctx, content.child_name, content.year)),
        Stage::End => surface.draw(&end_scene(ctx)),
        Stage::Photo { index } => {
            let (photo, image) = photo_at(content, index)?;
            surface.draw(&photo_scene(
                ctx,
                image,
                photo.caption(),
                &photo.date_line(),
                located.progress.min(1.0),
            ))
        }
        Stage::Transition { after } => {
            let (photo, image) = photo_at(content, after)?;
            surface.draw(&photo_scene(
                ctx,
                image,
                photo.caption(),
                &photo.date_line(),
                1.0,
            ))?;
            let count = fade.overlay_count() as usize;
            let shown = ((located.progress * count as f64).floor() as usize + 1).min(count);
            for color in fade.overlays().take(shown) {
                surface.overlay(color);
            }
            Ok(())
        }
    }
}

fn photo_at<'c>(
    content: &StillContent<'c>,
    index: usize,
) -> SlideshowResult<(&'c Photo, &'c Arc<PreparedImage>)> {
    match (content.photos.get(index), content.images.get(index)) {
        (Some(p), Some(i)) => Ok((p, i)),
        _ => Err(SlideshowError::validation(format!(
            "timeline references photo {index} but only {} are loaded",
            content.images.len().min(content.photos.len())
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slides/plan.rs"]
mod tests;
