use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::foundation::error::{SlideshowError, SlideshowResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Index of a captured frame in the output stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator (must be > 0).
    pub den: u32,
}

impl Fps {
    /// Build a validated rate.
    pub fn new(num: u32, den: u32) -> SlideshowResult<Self> {
        if den == 0 {
            return Err(SlideshowError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlideshowError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number rate, e.g. `Fps::integer(30)`.
    pub fn integer(num: u32) -> SlideshowResult<Self> {
        Self::new(num, 1)
    }

    /// Rate as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame, truncated to whole nanoseconds.
    pub fn frame_interval(self) -> Duration {
        self.tick_time(1)
    }

    /// Exact timestamp of tick `k` (`k * den / num` seconds), truncated to nanoseconds.
    pub fn tick_time(self, k: u64) -> Duration {
        let nanos = u128::from(k) * 1_000_000_000u128 * u128::from(self.den) / u128::from(self.num);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Number of ticks whose timestamp is strictly before `t`.
    pub fn ticks_before(self, t: Duration) -> u64 {
        if t.is_zero() {
            return 0;
        }
        // ceil(t * num / (den * 1e9))
        let num = t.as_nanos() * u128::from(self.num);
        let den = u128::from(self.den) * 1_000_000_000u128;
        u64::try_from(num.div_ceil(den)).unwrap_or(u64::MAX)
    }
}

/// Output surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Width as `f64` for geometry.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64` for geometry.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Full-surface rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.w(), self.h())
    }

    /// Layout scale relative to a 1080 px tall reference surface.
    pub fn ui_scale(self) -> f64 {
        self.h() / 1080.0
    }
}

/// Straight-alpha RGBA8 color.
///
/// Serialized as a CSS-like string: `#rrggbb`, `#rrggbbaa`, or `rgba(r, g, b, a)` with `a` in
/// `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (straight).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGB plus a `0.0..=1.0` alpha.
    pub fn rgb_alpha(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: unit_to_u8(alpha),
        }
    }

    /// Same color with a different `0.0..=1.0` alpha.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: unit_to_u8(alpha),
            ..self
        }
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    /// Straight RGBA8 bytes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Rgba8 {
    type Err = SlideshowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let byte = |i: usize| -> SlideshowResult<u8> {
                hex.get(i..i + 2)
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| SlideshowError::validation(format!("invalid hex color '{s}'")))
            };
            return match hex.len() {
                6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
                8 => Ok(Self {
                    r: byte(0)?,
                    g: byte(2)?,
                    b: byte(4)?,
                    a: byte(6)?,
                }),
                _ => Err(SlideshowError::validation(format!(
                    "hex color '{s}' must have 6 or 8 digits"
                ))),
            };
        }

        let inner = s
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| SlideshowError::validation(format!("unrecognized color '{s}'")))?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [r, g, b, a] = parts.as_slice() else {
            return Err(SlideshowError::validation(format!(
                "rgba color '{s}' must have four components"
            )));
        };
        let channel = |v: &str| -> SlideshowResult<u8> {
            v.parse::<u8>()
                .map_err(|_| SlideshowError::validation(format!("invalid channel '{v}' in '{s}'")))
        };
        let alpha: f32 = a
            .parse()
            .map_err(|_| SlideshowError::validation(format!("invalid alpha '{a}' in '{s}'")))?;
        if !alpha.is_finite() {
            return Err(SlideshowError::validation(format!(
                "alpha in '{s}' must be finite"
            )));
        }
        Ok(Self::rgb_alpha(channel(r)?, channel(g)?, channel(b)?, alpha))
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = SlideshowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
