//! Local-space meshes for the banner scene. Everything here is static; poses come from
//! [`crate::scene::animate`].

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

/// A planar convex face with an outward normal.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub verts: Vec<DVec3>,
    pub normal: DVec3,
}

impl Face {
    pub fn new(verts: Vec<DVec3>) -> Self {
        let normal = face_normal(&verts);
        Self { verts, normal }
    }

    pub fn centroid(&self) -> DVec3 {
        let n = self.verts.len().max(1) as f64;
        self.verts.iter().copied().sum::<DVec3>() / n
    }

    pub fn transformed(&self, rot: DQuat, offset: DVec3) -> Face {
        Face {
            verts: self.verts.iter().map(|&v| rot * v + offset).collect(),
            normal: rot * self.normal,
        }
    }
}

fn face_normal(verts: &[DVec3]) -> DVec3 {
    if verts.len() < 3 {
        return DVec3::Z;
    }
    (verts[1] - verts[0])
        .cross(verts[2] - verts[0])
        .try_normalize()
        .unwrap_or(DVec3::Z)
}

/// Closed circle of `segments` points in the local XY plane.
pub fn circle(radius: f64, segments: usize) -> Vec<DVec3> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let a = i as f64 / segments as f64 * TAU;
            DVec3::new(a.cos() * radius, a.sin() * radius, 0.0)
        })
        .collect()
}

/// Axis-aligned box centered on the origin, faces wound counter-clockwise seen from outside.
pub fn cuboid(size: DVec3) -> Vec<Face> {
    let h = size * 0.5;
    let c = |x: f64, y: f64, z: f64| DVec3::new(x * h.x, y * h.y, z * h.z);
    vec![
        Face::new(vec![c(-1., -1., 1.), c(1., -1., 1.), c(1., 1., 1.), c(-1., 1., 1.)]),
        Face::new(vec![c(1., -1., -1.), c(-1., -1., -1.), c(-1., 1., -1.), c(1., 1., -1.)]),
        Face::new(vec![c(-1., 1., 1.), c(1., 1., 1.), c(1., 1., -1.), c(-1., 1., -1.)]),
        Face::new(vec![c(-1., -1., -1.), c(1., -1., -1.), c(1., -1., 1.), c(-1., -1., 1.)]),
        Face::new(vec![c(1., -1., 1.), c(1., -1., -1.), c(1., 1., -1.), c(1., 1., 1.)]),
        Face::new(vec![c(-1., -1., -1.), c(-1., -1., 1.), c(-1., 1., 1.), c(-1., 1., -1.)]),
    ]
}

/// Regular octahedron with vertex radius `r`.
pub fn octahedron(r: f64) -> Vec<Face> {
    let px = DVec3::X * r;
    let nx = -px;
    let py = DVec3::Y * r;
    let ny = -py;
    let pz = DVec3::Z * r;
    let nz = -pz;
    vec![
        Face::new(vec![px, py, pz]),
        Face::new(vec![py, nx, pz]),
        Face::new(vec![nx, ny, pz]),
        Face::new(vec![ny, px, pz]),
        Face::new(vec![py, px, nz]),
        Face::new(vec![nx, py, nz]),
        Face::new(vec![ny, nx, nz]),
        Face::new(vec![px, ny, nz]),
    ]
}

/// Laurel leaves around a ring of `radius` in the local XY plane.
///
/// Each leaf is a kite pointing along the ring tangent, tipped out of plane by `tilt`.
pub fn laurel_leaves(count: usize, radius: f64, length: f64, width: f64, tilt: f64) -> Vec<Face> {
    (0..count)
        .map(|i| {
            let a = i as f64 / count as f64 * TAU;
            let base = DVec3::new(a.cos() * radius, a.sin() * radius, 0.0);
            let tangent = DVec3::new(-a.sin(), a.cos(), 0.0);
            let radial = DVec3::new(a.cos(), a.sin(), 0.0);
            let side = DQuat::from_axis_angle(tangent, tilt) * radial;
            let tip = base + tangent * length * 0.5;
            let tail = base - tangent * length * 0.5;
            Face::new(vec![
                tail,
                base + side * width * 0.5,
                tip,
                base - side * width * 0.5,
            ])
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/geometry.rs"]
mod tests;
