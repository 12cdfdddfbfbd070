use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use kurbo::{BezPath, Rect};

use crate::foundation::core::{Affine, Canvas, Point, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::{clamp01, smoothstep};
use crate::params::{Palette, SceneParams};
use crate::render::backend::{FrameRGBA, RenderOpts};
use crate::render::composite::over_in_place;
use crate::render::hud::{HudFrame, draw_hud};
use crate::render::light::{Lighting, fog};
use crate::render::text::{
    LoadedFont, NameplateText, PLATE_TEX_H, PLATE_TEX_W, TextBrushRgba8, TextLayoutEngine,
    fill_layout, load_font,
};
use crate::scene::animate::{
    FrameState, HALO_TUBE, PEDESTAL_CENTER, PEDESTAL_SIZE, PlatePose, frame_state,
};
use crate::scene::camera::Projector;
use crate::scene::geometry::{Face, circle, cuboid, laurel_leaves, octahedron};

const LAUREL_LEAVES: usize = 22;

/// Software renderer for the banner scene.
///
/// Scene geometry is projected per frame and painted back to front with `vello_cpu`. The
/// procedural background is computed per pixel and the scene layer is composited over it.
pub struct CpuRenderer {
    opts: RenderOpts,
    canvas: Canvas,
    lighting: Lighting,
    font: Option<LoadedFont>,
    engine: TextLayoutEngine,
    plate_text: Option<NameplateText>,
    chip: Option<(String, parley::Layout<TextBrushRgba8>)>,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("opts", &self.opts)
            .field("canvas", &self.canvas)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

/// One paintable element with its view depth.
struct Prim {
    depth: f64,
    kind: PrimKind,
}

enum PrimKind {
    Fill { path: BezPath, color: Rgba8 },
    Stroke { path: BezPath, color: Rgba8, width: f64 },
    Plate(PlatePose),
}

impl CpuRenderer {
    pub fn new(opts: RenderOpts) -> BannerResult<Self> {
        let canvas = opts.render_canvas()?;
        let font = load_font(opts.font.as_deref())?;
        let mut engine = TextLayoutEngine::new();
        match &font {
            Some(f) => {
                engine.register(&f.bytes)?;
                tracing::debug!(font = %f.path.display(), "using font");
            }
            None => tracing::warn!("no usable font found; nameplate text will be skipped"),
        }
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(canvas.width as u16, canvas.height as u16),
            opts,
            canvas,
            lighting: Lighting::studio(),
            font,
            engine,
            plate_text: None,
            chip: None,
        })
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Size of the frames returned by [`CpuRenderer::render`].
    pub fn render_canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render the scene at normalized time `t` at the supersampled size.
    pub fn render(&mut self, params: &SceneParams, t: f64) -> BannerResult<FrameRGBA> {
        if !t.is_finite() {
            return Err(BannerError::validation("frame time must be finite"));
        }
        params.validate()?;
        let palette = params.preset.palette();
        let state = frame_state(params, t);
        let proj = state.camera.projector(self.canvas);

        self.refresh_text(params, &palette)?;

        let mut prims = self.scene_prims(&state, &proj, &palette);
        prims.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let (w, h) = (self.canvas.width as u16, self.canvas.height as u16);
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for prim in &prims {
            self.draw_prim(&mut ctx, prim, &proj, &palette);
        }

        let scale = f64::from(self.opts.scale);
        let target = proj
            .project(DVec3::new(params.core.x, params.core.y, params.core.z))
            .map(|p| p.point());
        let hud = HudFrame {
            canvas: self.canvas,
            scale,
            color: palette.hud,
            opacity: params.hud.opacity,
            scan_speed: params.hud.scan_speed,
            t,
            target,
            chip: match (&self.font, &self.chip) {
                (Some(font), Some((_, layout))) => Some((font, layout)),
                _ => None,
            },
        };
        draw_hud(&mut ctx, &hud);

        clear_pixmap(&mut self.pixmap);
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        let mut data = background(self.canvas, &palette, t);
        over_in_place(&mut data, self.pixmap.data_as_u8_slice())?;
        FrameRGBA::new(self.canvas.width, self.canvas.height, data, true)
    }

    /// Re-shape the nameplate and chip only when their labels change.
    fn refresh_text(&mut self, params: &SceneParams, palette: &Palette) -> BannerResult<()> {
        if self.font.is_none() {
            return Ok(());
        }
        let l = &params.labels;
        let stale = self
            .plate_text
            .as_ref()
            .is_none_or(|p| !p.matches(&l.title, &l.subtitle, &l.tagline));
        if stale {
            self.plate_text = Some(NameplateText::build(
                &mut self.engine,
                &l.title,
                &l.subtitle,
                &l.tagline,
                palette.ink,
                palette.gold,
            )?);
        }

        let chip_label = format!("{} // LOOP", params.preset.name().to_uppercase());
        if self.chip.as_ref().is_none_or(|(s, _)| *s != chip_label) {
            let size = 11.0 * self.opts.scale as f32;
            let layout = self
                .engine
                .layout_line(&chip_label, size, palette.hud.into())?;
            self.chip = Some((chip_label, layout));
        }
        Ok(())
    }

    fn scene_prims(&self, state: &FrameState, proj: &Projector, palette: &Palette) -> Vec<Prim> {
        let mut prims = Vec::new();
        let eye = proj.eye();
        let fog_color = palette.bg[0];

        let push_face = |prims: &mut Vec<Prim>, face: &Face, base: Rgba8, two_sided: bool| {
            if !two_sided && face.normal.dot(eye - face.centroid()) <= 0.0 {
                return;
            }
            let Some(pts) = proj.project_all(&face.verts) else {
                return;
            };
            let depth = pts.iter().map(|p| p.depth).sum::<f64>() / pts.len() as f64;
            let color = fog(self.lighting.shade(base, face.normal, two_sided), fog_color, depth);
            prims.push(Prim {
                depth,
                kind: PrimKind::Fill {
                    path: polygon(pts.iter().map(|p| p.point())),
                    color,
                },
            });
        };

        // Pedestal, trim and veins.
        let yaw = DQuat::from_rotation_y(state.pedestal_yaw);
        for face in cuboid(PEDESTAL_SIZE) {
            push_face(&mut prims, &face.transformed(yaw, PEDESTAL_CENTER), palette.marble, false);
        }
        self.pedestal_details(&mut prims, yaw, proj, palette);

        // Halo ring as stroked segments so it keeps its tube width under perspective.
        let halo = &state.halo;
        let ring: Vec<DVec3> = circle(halo.radius, self.opts.quality.ring_segments())
            .into_iter()
            .map(|p| halo.rotation * p + halo.center)
            .collect();
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let (Some(pa), Some(pb)) = (proj.project(a), proj.project(b)) else {
                continue;
            };
            let mid = (a + b) * 0.5;
            let radial = (mid - halo.center).try_normalize().unwrap_or(DVec3::Y);
            let depth = (pa.depth + pb.depth) * 0.5;
            let color = fog(self.lighting.shade(palette.gold, radial, true), fog_color, depth);
            let mut path = BezPath::new();
            path.move_to(pa.point());
            path.line_to(pb.point());
            prims.push(Prim {
                depth,
                kind: PrimKind::Stroke {
                    path,
                    color,
                    width: proj.pixels_at(2.0 * HALO_TUBE, depth).max(1.0),
                },
            });
        }
        for leaf in laurel_leaves(LAUREL_LEAVES, halo.radius, 0.32, 0.14, 0.35) {
            let leaf = leaf.transformed(halo.rotation, halo.center);
            push_face(&mut prims, &leaf, palette.gold_hi, true);
        }

        // Floating core.
        if state.core.size > 0.0 {
            for face in octahedron(state.core.size) {
                let face = face.transformed(state.core.rotation, state.core.center);
                push_face(&mut prims, &face, palette.accent, false);
            }
        }

        // Nameplate, only while it faces the camera.
        let plate = state.plate;
        if self.plate_text.is_some()
            && plate.normal.dot(eye - plate.center) > 0.0
            && let Some(c) = proj.project(plate.center)
        {
            prims.push(Prim {
                depth: c.depth,
                kind: PrimKind::Plate(plate),
            });
        }

        prims
    }

    fn pedestal_details(&self, prims: &mut Vec<Prim>, yaw: DQuat, proj: &Projector, palette: &Palette) {
        let h = PEDESTAL_SIZE * 0.5;
        let front_normal = yaw * DVec3::Z;
        let front_center = yaw * DVec3::new(0.0, 0.0, h.z) + PEDESTAL_CENTER;
        if front_normal.dot(proj.eye() - front_center) <= 0.0 {
            return;
        }
        let Some(face) = proj.project(front_center) else {
            return;
        };
        let on_front = |x: f64, y: f64| yaw * DVec3::new(x, y, h.z + 1e-3) + PEDESTAL_CENTER;

        let veins = self.opts.quality.vein_count();
        for i in 0..veins {
            let y0 = -h.y + 2.0 * h.y * (i as f64 + 0.5) / veins as f64;
            let phase = i as f64 * 2.1;
            let pts: Vec<DVec3> = (0..=16)
                .map(|k| {
                    let x = -h.x + 2.0 * h.x * f64::from(k) / 16.0;
                    let y = (y0 + 0.12 * (x * 1.3 + phase).sin() + 0.05 * (x * 3.7 + phase).sin())
                        .clamp(-h.y * 0.9, h.y * 0.9);
                    on_front(x, y)
                })
                .collect();
            let Some(sp) = proj.project_all(&pts) else {
                continue;
            };
            prims.push(Prim {
                depth: face.depth - 1e-3,
                kind: PrimKind::Stroke {
                    path: polyline(sp.iter().map(|p| p.point())),
                    color: fog(palette.vein.with_alpha(140), palette.bg[0], face.depth),
                    width: proj.pixels_at(0.012, face.depth).max(0.5),
                },
            });
        }

        for y in [h.y - 0.08, -h.y + 0.08] {
            let (Some(a), Some(b)) = (proj.project(on_front(-h.x, y)), proj.project(on_front(h.x, y)))
            else {
                continue;
            };
            let mut path = BezPath::new();
            path.move_to(a.point());
            path.line_to(b.point());
            prims.push(Prim {
                depth: face.depth - 2e-3,
                kind: PrimKind::Stroke {
                    path,
                    color: fog(palette.gold, palette.bg[0], face.depth),
                    width: proj.pixels_at(0.035, face.depth).max(1.0),
                },
            });
        }
    }

    fn draw_prim(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        prim: &Prim,
        proj: &Projector,
        palette: &Palette,
    ) {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match &prim.kind {
            PrimKind::Fill { path, color } => {
                ctx.set_paint(color.to_cpu());
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            PrimKind::Stroke { path, color, width } => {
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(*width).with_caps(vello_cpu::kurbo::Cap::Round),
                );
                ctx.set_paint(color.to_cpu());
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            PrimKind::Plate(plate) => self.draw_plate(ctx, plate, proj, palette),
        }
    }

    /// Extruded text: a darkened copy at the plate's back face, then the front face.
    fn draw_plate(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        plate: &PlatePose,
        proj: &Projector,
        palette: &Palette,
    ) {
        let (Some(font), Some(text)) = (&self.font, &self.plate_text) else {
            return;
        };
        let Some(front) = plate_affine(proj, plate.corners(0.0)) else {
            return;
        };
        let back = if plate.depth > 0.0 {
            plate_affine(proj, plate.corners(plate.depth))
        } else {
            None
        };
        let side = palette.gold.shade(0.35);

        for line in &text.lines {
            let (ox, oy) = line.origin();
            let local = Affine::translate((ox, oy));

            if let Some(back) = back {
                ctx.set_transform(affine_to_cpu(back * local));
                fill_layout(ctx, &font.data, &line.layout, Some(side.with_alpha((line.opacity * 255.0) as u8)));
            }

            if let Some((dx, dy)) = line.shadow {
                ctx.set_transform(affine_to_cpu(front * Affine::translate((ox + dx, oy + dy))));
                fill_layout(ctx, &font.data, &line.layout, Some(Rgba8::rgb(0, 0, 0).with_alpha(89)));
            }
            ctx.set_transform(affine_to_cpu(front * local));
            if line.opacity < 1.0 {
                ctx.push_opacity_layer(line.opacity);
            }
            fill_layout(ctx, &font.data, &line.layout, None);
            if line.opacity < 1.0 {
                ctx.pop_layer();
            }
        }
    }
}

/// Map nameplate texture space onto the projected plate corners.
///
/// The quad is small relative to its distance, so an affine fit through three corners stands in
/// for the full perspective mapping.
fn plate_affine(proj: &Projector, [tl, tr, bl]: [DVec3; 3]) -> Option<Affine> {
    let tl = proj.project(tl)?;
    let tr = proj.project(tr)?;
    let bl = proj.project(bl)?;
    Some(Affine::new([
        (tr.x - tl.x) / PLATE_TEX_W,
        (tr.y - tl.y) / PLATE_TEX_W,
        (bl.x - tl.x) / PLATE_TEX_H,
        (bl.y - tl.y) / PLATE_TEX_H,
        tl.x,
        tl.y,
    ]))
}

/// Diagonal three-stop gradient with slow shimmer bands and an edge vignette, as opaque RGBA8.
pub fn background(canvas: Canvas, palette: &Palette, t: f64) -> Vec<u8> {
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let [c0, c1, c2] = palette.bg;
    let mut out = Vec::with_capacity(canvas.pixel_count() * 4);
    for y in 0..canvas.height {
        let v = (f64::from(y) + 0.5) / h;
        for x in 0..canvas.width {
            let u = (f64::from(x) + 0.5) / w;
            let g = clamp01(u * 0.75 + v * 0.25);
            let base = if g < 0.5 {
                c0.lerp(c1, g * 2.0)
            } else {
                c1.lerp(c2, (g - 0.5) * 2.0)
            };
            let band = 0.5 + 0.5 * ((u * 3.0 - v * 0.8 - t) * TAU).sin();
            let shimmer = band.powi(6) * 0.06;
            let edge = u.min(1.0 - u) * 4.0;
            let vignette = 0.78 + 0.22 * smoothstep(0.0, 1.0, edge.min(v.min(1.0 - v) * 3.0));
            let c = base.lerp(palette.accent, shimmer).shade(vignette);
            out.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
    out
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn polygon(pts: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = polyline(pts);
    path.close_path();
    path
}

fn polyline(pts: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in pts.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
