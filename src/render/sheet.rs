use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};
use crate::params::SceneParams;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuRenderer;

/// Pixels between sheet tiles, in output pixels.
pub const SHEET_GUTTER: u32 = 8;

/// Lanczos3 resize of an opaque frame to `target`. Returns a copy when sizes already match.
pub fn downscale(frame: &FrameRGBA, target: Canvas) -> BannerResult<FrameRGBA> {
    target.validate()?;
    if frame.width == target.width && frame.height == target.height {
        return Ok(frame.clone());
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| BannerError::render("frame buffer does not match its dimensions"))?;
    let resized = image::imageops::resize(
        &img,
        target.width,
        target.height,
        image::imageops::FilterType::Lanczos3,
    );
    FrameRGBA::new(
        target.width,
        target.height,
        resized.into_raw(),
        frame.premultiplied,
    )
}

/// Render one still per time and tile them into a grid `columns` wide.
///
/// Tiles are downscaled to the renderer's output canvas. The gutter is filled with the darkest
/// background stop of the preset.
#[tracing::instrument(level = "debug", skip(renderer, params, times))]
pub fn render_sheet(
    renderer: &mut CpuRenderer,
    params: &SceneParams,
    times: &[f64],
    columns: u32,
) -> BannerResult<FrameRGBA> {
    if times.is_empty() {
        return Err(BannerError::validation("sheet needs at least one time"));
    }
    if columns == 0 {
        return Err(BannerError::validation("sheet columns must be >= 1"));
    }
    let tile = renderer.opts().canvas;
    let n = times.len() as u32;
    let cols = columns.min(n);
    let rows = n.div_ceil(cols);
    let sheet = Canvas::new(
        cols * tile.width + (cols + 1) * SHEET_GUTTER,
        rows * tile.height + (rows + 1) * SHEET_GUTTER,
    )?;

    let gutter = params.preset.palette().bg[0];
    let mut data = Vec::with_capacity(sheet.pixel_count() * 4);
    for _ in 0..sheet.pixel_count() {
        data.extend_from_slice(&[gutter.r, gutter.g, gutter.b, 255]);
    }

    let stride = sheet.width as usize * 4;
    for (i, &t) in times.iter().enumerate() {
        let frame = downscale(&renderer.render(params, t)?, tile)?;
        let (col, row) = (i as u32 % cols, i as u32 / cols);
        let x0 = (SHEET_GUTTER + col * (tile.width + SHEET_GUTTER)) as usize;
        let y0 = (SHEET_GUTTER + row * (tile.height + SHEET_GUTTER)) as usize;
        let row_bytes = tile.width as usize * 4;
        for (y, src) in frame.data.chunks_exact(row_bytes).enumerate() {
            let start = (y0 + y) * stride + x0 * 4;
            data[start..start + row_bytes].copy_from_slice(src);
        }
    }
    tracing::debug!(tiles = n, cols, rows, "sheet assembled");
    FrameRGBA::new(sheet.width, sheet.height, data, true)
}
