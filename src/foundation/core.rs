use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::{clamp01, lerp};

pub use glam::DVec3;
pub use kurbo::{Affine, BezPath, Point, Rect};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const BANNER: Canvas = Canvas {
        width: 1200,
        height: 300,
    };

    pub fn new(width: u32, height: u32) -> BannerResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Pixmaps are addressed with u16 extents, so both sides must fit.
    pub fn validate(self) -> BannerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BannerError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(BannerError::validation(format!(
                "canvas {}x{} exceeds the 65535px limit",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn scaled(self, scale: u32) -> BannerResult<Self> {
        if scale == 0 {
            return Err(BannerError::validation("scale must be >= 1"));
        }
        Canvas::new(
            self.width.saturating_mul(scale),
            self.height.saturating_mul(scale),
        )
    }

    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Rgba8, t: f64) -> Rgba8 {
        let t = clamp01(t);
        let mix = |a: u8, b: u8| -> u8 { lerp(f64::from(a), f64::from(b), t).round() as u8 };
        Rgba8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Multiply rgb by `k` (clamped), keeping alpha.
    pub fn shade(self, k: f64) -> Rgba8 {
        let s = |c: u8| -> u8 { (f64::from(c) * k).round().clamp(0.0, 255.0) as u8 };
        Rgba8 {
            r: s(self.r),
            g: s(self.g),
            b: s(self.b),
            a: self.a,
        }
    }

    pub fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
