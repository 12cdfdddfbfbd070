use std::path::PathBuf;

use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames leaving [`crate::render::CpuRenderer`] are opaque, so premultiplied and straight alpha
/// coincide. The flag is kept explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn new(width: u32, height: u32, data: Vec<u8>, premultiplied: bool) -> BannerResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(BannerError::render(format!(
                "frame data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA at `(x, y)`; out-of-range coordinates are clamped to the edge.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1)) as usize;
        let y = y.min(self.height.saturating_sub(1)) as usize;
        let i = (y * self.width as usize + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Geometric detail level. Previews trade ring smoothness for speed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Preview,
    #[default]
    Final,
}

impl Quality {
    pub fn ring_segments(self) -> usize {
        match self {
            Quality::Preview => 72,
            Quality::Final => 140,
        }
    }

    pub fn vein_count(self) -> usize {
        match self {
            Quality::Preview => 3,
            Quality::Final => 6,
        }
    }
}

/// Renderer configuration.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Output canvas before supersampling.
    pub canvas: Canvas,
    /// Integer supersampling factor. Frames are produced at `canvas * scale`.
    pub scale: u32,
    pub quality: Quality,
    /// Explicit font file. Falls back to `BANNERKIT_FONT`, then system fonts.
    pub font: Option<PathBuf>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::BANNER,
            scale: 1,
            quality: Quality::Final,
            font: None,
        }
    }
}

impl RenderOpts {
    /// Size of the frames the renderer actually rasterizes.
    pub fn render_canvas(&self) -> BannerResult<Canvas> {
        self.canvas.validate()?;
        self.canvas.scaled(self.scale)
    }
}
