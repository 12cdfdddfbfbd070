use std::path::Path;

use anyhow::Context as _;

use crate::encode::process::ensure_parent_dir;
use crate::foundation::error::BannerResult;
use crate::render::backend::FrameRGBA;

/// Write `frame` as an RGBA PNG, converting premultiplied data to straight alpha first.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> BannerResult<()> {
    ensure_parent_dir(path)?;
    let data = if frame.premultiplied {
        unpremultiply(&frame.data)
    } else {
        frame.data.clone()
    };
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), width = frame.width, height = frame.height, "png written");
    Ok(())
}

fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}
