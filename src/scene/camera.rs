use glam::{DMat4, DVec3, DVec4};

use crate::foundation::core::{Canvas, Point};

/// Perspective camera looking from `eye` at `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn forward(&self) -> DVec3 {
        (self.target - self.eye)
            .try_normalize()
            .unwrap_or(DVec3::NEG_Z)
    }

    /// Bake view and projection for a fixed output canvas.
    pub fn projector(&self, canvas: Canvas) -> Projector {
        let aspect = canvas.aspect();
        let proj = DMat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far);
        let view = DMat4::look_at_rh(self.eye, self.target, self.up);
        let focal_px = f64::from(canvas.height) / (2.0 * (self.fov_y_deg.to_radians() * 0.5).tan());
        Projector {
            view_proj: proj * view,
            eye: self.eye,
            near: self.near,
            width: f64::from(canvas.width),
            height: f64::from(canvas.height),
            focal_px,
        }
    }
}

/// A projected point in pixel space. `depth` is the view-space distance along the camera axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl ScreenPoint {
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projector {
    view_proj: DMat4,
    eye: DVec3,
    near: f64,
    width: f64,
    height: f64,
    focal_px: f64,
}

impl Projector {
    /// `None` when the point lies behind the near plane.
    pub fn project(&self, p: DVec3) -> Option<ScreenPoint> {
        let clip: DVec4 = self.view_proj * p.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * self.width,
            y: (1.0 - ndc.y) * 0.5 * self.height,
            depth: clip.w,
        })
    }

    /// Project every point or none of them.
    pub fn project_all(&self, pts: &[DVec3]) -> Option<Vec<ScreenPoint>> {
        pts.iter().map(|&p| self.project(p)).collect()
    }

    /// Screen-space length in pixels of a world length seen at `depth`.
    pub fn pixels_at(&self, world_len: f64, depth: f64) -> f64 {
        if depth <= 0.0 {
            return 0.0;
        }
        world_len * self.focal_px / depth
    }

    pub fn eye(&self) -> DVec3 {
        self.eye
    }
}
