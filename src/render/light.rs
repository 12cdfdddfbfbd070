use glam::DVec3;

use crate::foundation::core::Rgba8;
use crate::foundation::math::smoothstep;

struct DirLight {
    dir: DVec3,
    intensity: f64,
    tint: [f64; 3],
}

/// Key/fill/rim directional lights plus an ambient term, evaluated per face (Lambert).
pub struct Lighting {
    lights: [DirLight; 3],
    ambient: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::studio()
    }
}

fn tint(c: Rgba8) -> [f64; 3] {
    [
        f64::from(c.r) / 255.0,
        f64::from(c.g) / 255.0,
        f64::from(c.b) / 255.0,
    ]
}

impl Lighting {
    /// Warm key from the upper front right, mint fill from the left, blue rim from behind.
    pub fn studio() -> Self {
        // Intensities are in physical units; divide by pi for Lambert radiance.
        let k = std::f64::consts::FRAC_1_PI;
        Self {
            lights: [
                DirLight {
                    dir: DVec3::new(3.0, 4.0, 4.0).normalize(),
                    intensity: 2.3 * k,
                    tint: [1.0, 1.0, 1.0],
                },
                DirLight {
                    dir: DVec3::new(-4.0, 1.0, 2.0).normalize(),
                    intensity: 0.55 * k,
                    tint: tint(Rgba8::rgb(0xa7, 0xf3, 0xd0)),
                },
                DirLight {
                    dir: DVec3::new(-1.0, 3.0, -4.0).normalize(),
                    intensity: 0.85 * k,
                    tint: tint(Rgba8::rgb(0x93, 0xc5, 0xfd)),
                },
            ],
            ambient: 0.22,
        }
    }

    /// Shade `base` for a surface with unit `normal`. `two_sided` lights back faces as front.
    pub fn shade(&self, base: Rgba8, normal: DVec3, two_sided: bool) -> Rgba8 {
        let mut gain = [self.ambient; 3];
        for l in &self.lights {
            let mut d = normal.dot(l.dir);
            if two_sided {
                d = d.abs();
            }
            let d = d.max(0.0) * l.intensity;
            for (g, t) in gain.iter_mut().zip(l.tint) {
                *g += d * t;
            }
        }
        let ch = |c: u8, g: f64| -> u8 { (f64::from(c) * g).round().clamp(0.0, 255.0) as u8 };
        Rgba8 {
            r: ch(base.r, gain[0]),
            g: ch(base.g, gain[1]),
            b: ch(base.b, gain[2]),
            a: base.a,
        }
    }
}

/// Linear depth fog toward `fog_color` between 8 and 18 world units.
pub fn fog(color: Rgba8, fog_color: Rgba8, depth: f64) -> Rgba8 {
    let f = smoothstep(8.0, 18.0, depth);
    if f <= 0.0 {
        return color;
    }
    color.lerp(fog_color.with_alpha(color.a), f)
}
