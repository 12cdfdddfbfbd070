use std::path::{Path, PathBuf};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{BannerError, BannerResult};

/// Environment variable naming a fallback font file.
pub const FONT_ENV: &str = "BANNERKIT_FONT";

/// Tried in order when neither an explicit path nor [`FONT_ENV`] is set.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Nameplate texture space. The plate quad maps this rectangle onto its projected corners.
pub const PLATE_TEX_W: f64 = 2048.0;
pub const PLATE_TEX_H: f64 = 512.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Font bytes plus the handle vello_cpu draws glyphs with.
#[derive(Clone)]
pub struct LoadedFont {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("path", &self.path)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl LoadedFont {
    pub fn read(path: &Path) -> BannerResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            BannerError::render(format!("read font '{}': {e}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(BannerError::render(format!(
                "font '{}' is empty",
                path.display()
            )));
        }
        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            data,
        })
    }
}

/// Pick a font: the explicit path, then [`FONT_ENV`], then well-known system locations.
///
/// An explicit path that cannot be read is an error. Everything else degrades to `Ok(None)`.
pub fn load_font(explicit: Option<&Path>) -> BannerResult<Option<LoadedFont>> {
    if let Some(p) = explicit {
        return LoadedFont::read(p).map(Some);
    }

    if let Some(p) = std::env::var_os(FONT_ENV).filter(|v| !v.is_empty()) {
        let p = PathBuf::from(p);
        match LoadedFont::read(&p) {
            Ok(font) => return Ok(Some(font)),
            Err(e) => tracing::warn!(path = %p.display(), error = %e, "ignoring {FONT_ENV}"),
        }
    }

    for candidate in SYSTEM_FONTS {
        let p = Path::new(candidate);
        if p.is_file()
            && let Ok(font) = LoadedFont::read(p)
        {
            return Ok(Some(font));
        }
    }
    Ok(None)
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family: None,
        }
    }

    /// Register `font_bytes` and make it the family used by later layouts.
    pub fn register(&mut self, font_bytes: &[u8]) -> BannerResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| BannerError::render("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BannerError::render("registered font family has no name"))?
            .to_string();
        self.family = Some(name);
        Ok(())
    }

    /// Shape one unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> BannerResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BannerError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family = self
            .family
            .clone()
            .ok_or_else(|| BannerError::render("no font registered"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// A shaped line placed in texture space with its baseline at `baseline`.
pub struct PlacedText {
    pub layout: parley::Layout<TextBrushRgba8>,
    pub x: f64,
    pub baseline: f64,
    pub opacity: f32,
    /// Pixel offset of a black drop shadow, if any.
    pub shadow: Option<(f64, f64)>,
}

impl PlacedText {
    fn place(
        layout: parley::Layout<TextBrushRgba8>,
        x: f64,
        baseline: f64,
        opacity: f32,
    ) -> Self {
        Self {
            layout,
            x,
            baseline,
            opacity,
            shadow: None,
        }
    }

    /// Offset from layout space to texture space.
    pub fn origin(&self) -> (f64, f64) {
        let first_baseline = self
            .layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        (self.x, self.baseline - first_baseline)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }
}

/// Title, subtitle and tagline laid out on the nameplate texture.
pub struct NameplateText {
    pub labels: (String, String, String),
    pub lines: Vec<PlacedText>,
}

impl NameplateText {
    pub fn build(
        engine: &mut TextLayoutEngine,
        title: &str,
        subtitle: &str,
        tagline: &str,
        ink: Rgba8,
        gold: Rgba8,
    ) -> BannerResult<Self> {
        let mut lines = Vec::new();
        if !title.is_empty() {
            let mut t = PlacedText::place(engine.layout_line(title, 110.0, ink.into())?, 128.0, 244.0, 1.0);
            t.shadow = Some((6.0, 6.0));
            lines.push(t);
        }
        if !subtitle.is_empty() {
            lines.push(PlacedText::place(
                engine.layout_line(subtitle, 48.0, ink.into())?,
                132.0,
                330.0,
                0.78,
            ));
        }
        if !tagline.is_empty() {
            let mut t =
                PlacedText::place(engine.layout_line(tagline, 38.0, gold.into())?, 1550.0, 440.0, 0.55);
            // Right-aligned against the plate edge when it would overflow.
            let overflow = t.x + t.width() - (PLATE_TEX_W - 64.0);
            if overflow > 0.0 {
                t.x = (t.x - overflow).max(132.0);
            }
            lines.push(t);
        }
        Ok(Self {
            labels: (title.to_string(), subtitle.to_string(), tagline.to_string()),
            lines,
        })
    }

    pub fn matches(&self, title: &str, subtitle: &str, tagline: &str) -> bool {
        self.labels.0 == title && self.labels.1 == subtitle && self.labels.2 == tagline
    }
}

/// Fill every glyph run of `layout`, translated by `origin`, with the run brush or `paint`.
pub fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
    paint: Option<Rgba8>,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            let color = paint.unwrap_or(Rgba8 {
                r: brush.r,
                g: brush.g,
                b: brush.b,
                a: brush.a,
            });
            ctx.set_paint(color.to_cpu());

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
