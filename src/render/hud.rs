//! Screen-space overlay drawn after the scene: tracking reticle, sweeping scanline, corner
//! brackets and a label chip.

use kurbo::{BezPath, Circle, Rect, Shape};

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::math::fract;
use crate::render::cpu::{bezpath_to_cpu, rect_to_cpu};
use crate::render::text::{LoadedFont, TextBrushRgba8, fill_layout};

/// Everything the overlay needs for one frame.
pub struct HudFrame<'a> {
    pub canvas: Canvas,
    /// Supersampling factor; overlay sizes are specified in output pixels.
    pub scale: f64,
    pub color: Rgba8,
    pub opacity: f64,
    pub scan_speed: f64,
    pub t: f64,
    /// Screen position the reticle tracks, usually the projected core.
    pub target: Option<Point>,
    pub chip: Option<(&'a LoadedFont, &'a parley::Layout<TextBrushRgba8>)>,
}

/// Full top-to-bottom sweeps per loop. Rounded to a whole number so the sweep closes the loop.
pub fn scan_cycles(scan_speed: f64) -> f64 {
    scan_speed.round().max(1.0)
}

/// Vertical position of the scanline in pixels.
pub fn scanline_y(canvas: Canvas, t: f64, scan_speed: f64) -> f64 {
    fract(t * scan_cycles(scan_speed)) * f64::from(canvas.height)
}

/// Ring plus four ticks around `center`.
pub fn reticle_path(center: Point, radius: f64) -> BezPath {
    let mut path = Circle::new(center, radius).to_path(0.1);
    let gap = radius * 0.45;
    let reach = radius * 1.6;
    for (dx, dy) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
        path.move_to((center.x + dx * gap, center.y + dy * gap));
        path.line_to((center.x + dx * reach, center.y + dy * reach));
    }
    path
}

/// L-shaped brackets inset from each canvas corner.
pub fn corner_brackets(canvas: Canvas, inset: f64, arm: f64) -> BezPath {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let mut path = BezPath::new();
    for (x, y, sx, sy) in [
        (inset, inset, 1.0, 1.0),
        (w - inset, inset, -1.0, 1.0),
        (inset, h - inset, 1.0, -1.0),
        (w - inset, h - inset, -1.0, -1.0),
    ] {
        path.move_to((x + sx * arm, y));
        path.line_to((x, y));
        path.line_to((x, y + sy * arm));
    }
    path
}

pub fn draw_hud(ctx: &mut vello_cpu::RenderContext, hud: &HudFrame<'_>) {
    if hud.opacity <= 0.0 {
        return;
    }
    let s = hud.scale;
    let w = f64::from(hud.canvas.width);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.push_opacity_layer(hud.opacity.clamp(0.0, 1.0) as f32);

    let y = scanline_y(hud.canvas, hud.t, hud.scan_speed);
    ctx.set_paint(hud.color.with_alpha(40).to_cpu());
    ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, y - 6.0 * s, w, y + 6.0 * s)));
    ctx.set_paint(hud.color.with_alpha(150).to_cpu());
    ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, y - 0.75 * s, w, y + 0.75 * s)));

    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.5 * s));
    ctx.set_paint(hud.color.with_alpha(200).to_cpu());
    ctx.stroke_path(&bezpath_to_cpu(&corner_brackets(hud.canvas, 14.0 * s, 22.0 * s)));

    if let Some(target) = hud.target {
        ctx.set_paint(hud.color.with_alpha(220).to_cpu());
        ctx.stroke_path(&bezpath_to_cpu(&reticle_path(target, 26.0 * s)));
    }

    if let Some((font, layout)) = hud.chip {
        let pad = 8.0 * s;
        let text_w = f64::from(layout.width());
        let text_h = f64::from(layout.height());
        let x1 = w - 24.0 * s;
        let x0 = x1 - text_w - 2.0 * pad;
        let y0 = 22.0 * s;
        let y1 = y0 + text_h + pad;
        ctx.set_paint(Rgba8::rgb(0, 0, 0).with_alpha(120).to_cpu());
        ctx.fill_rect(&rect_to_cpu(Rect::new(x0, y0, x1, y1)));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0 * s));
        ctx.set_paint(hud.color.with_alpha(200).to_cpu());
        ctx.stroke_rect(&rect_to_cpu(Rect::new(x0, y0, x1, y1)));
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x0 + pad, y0 + pad * 0.5)));
        fill_layout(ctx, &font.data, layout, Some(hud.color));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    ctx.pop_layer();
}
