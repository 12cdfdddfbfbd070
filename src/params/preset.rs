use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8;
use crate::foundation::error::BannerError;
use crate::params::model::{
    CamParams, CoreParams, HaloParams, HudParams, Labels, SceneParams, TextParams,
};

/// Named visual style. Each preset is a complete default [`SceneParams`] plus a palette.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Marble, laurel and gold.
    #[default]
    Greco,
    /// Olive tones with a strong tactical HUD.
    Military,
    /// Greco scene with the tactical overlay.
    Hybrid,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Greco, Preset::Military, Preset::Hybrid];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Greco => "greco",
            Preset::Military => "military",
            Preset::Hybrid => "hybrid",
        }
    }

    pub fn defaults(self) -> SceneParams {
        let (cam, halo, text, core, hud) = match self {
            Preset::Greco => (
                CamParams {
                    r: 6.0,
                    sweep: 0.62,
                    lift: 0.58,
                    bob: 0.06,
                    roll: 0.012,
                    fov: 38.0,
                },
                HaloParams {
                    x: -0.38,
                    y: 0.20,
                    rx: 1.00,
                    ry: 0.20,
                    spin: 0.09,
                    wobble: 0.018,
                },
                TextParams {
                    pull: 1.45,
                    lift: 0.12,
                    face_bias: 0.05,
                    size: 0.50,
                    depth: 0.105,
                },
                CoreParams {
                    x: 3.2,
                    y: 0.86,
                    z: -2.6,
                    size: 0.56,
                },
                HudParams {
                    opacity: 0.45,
                    scan_speed: 1.0,
                },
            ),
            Preset::Military => (
                CamParams {
                    r: 6.1,
                    sweep: 0.58,
                    lift: 0.56,
                    bob: 0.06,
                    roll: 0.012,
                    fov: 38.0,
                },
                HaloParams {
                    x: -0.34,
                    y: 0.19,
                    rx: 1.05,
                    ry: 0.12,
                    spin: 0.12,
                    wobble: 0.018,
                },
                TextParams {
                    pull: 1.50,
                    lift: 0.12,
                    face_bias: 0.06,
                    size: 0.48,
                    depth: 0.110,
                },
                CoreParams {
                    x: 3.6,
                    y: 0.98,
                    z: -3.1,
                    size: 0.50,
                },
                HudParams {
                    opacity: 0.75,
                    scan_speed: 1.0,
                },
            ),
            Preset::Hybrid => (
                CamParams {
                    r: 6.2,
                    sweep: 0.62,
                    lift: 0.58,
                    bob: 0.06,
                    roll: 0.012,
                    fov: 38.0,
                },
                HaloParams {
                    x: -0.34,
                    y: 0.19,
                    rx: 1.02,
                    ry: 0.16,
                    spin: 0.10,
                    wobble: 0.018,
                },
                TextParams {
                    pull: 1.52,
                    lift: 0.12,
                    face_bias: 0.05,
                    size: 0.49,
                    depth: 0.108,
                },
                CoreParams {
                    x: 3.5,
                    y: 0.95,
                    z: -3.0,
                    size: 0.52,
                },
                HudParams {
                    opacity: 0.60,
                    scan_speed: 1.0,
                },
            ),
        };

        SceneParams {
            preset: self,
            cam,
            halo,
            text,
            core,
            hud,
            labels: Labels::default(),
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Preset::Greco => Palette {
                bg: [
                    Rgba8::rgb(8, 11, 20),
                    Rgba8::rgb(13, 36, 48),
                    Rgba8::rgb(26, 18, 48),
                ],
                gold: Rgba8::rgb(214, 184, 107),
                gold_hi: Rgba8::rgb(245, 226, 168),
                marble: Rgba8::rgb(220, 222, 227),
                vein: Rgba8::rgb(77, 84, 97),
                accent: Rgba8::rgb(6, 182, 212),
                hud: Rgba8::rgb(125, 211, 252),
                ink: Rgba8::rgb(255, 255, 255),
            },
            Preset::Military => Palette {
                bg: [
                    Rgba8::rgb(7, 11, 8),
                    Rgba8::rgb(20, 32, 26),
                    Rgba8::rgb(28, 31, 20),
                ],
                gold: Rgba8::rgb(168, 162, 106),
                gold_hi: Rgba8::rgb(217, 211, 160),
                marble: Rgba8::rgb(185, 188, 176),
                vein: Rgba8::rgb(59, 66, 54),
                accent: Rgba8::rgb(34, 197, 94),
                hud: Rgba8::rgb(46, 230, 123),
                ink: Rgba8::rgb(236, 240, 226),
            },
            Preset::Hybrid => Palette {
                bg: [
                    Rgba8::rgb(7, 10, 18),
                    Rgba8::rgb(13, 36, 46),
                    Rgba8::rgb(26, 18, 46),
                ],
                gold: Rgba8::rgb(214, 184, 107),
                gold_hi: Rgba8::rgb(245, 226, 168),
                marble: Rgba8::rgb(216, 219, 224),
                vein: Rgba8::rgb(77, 84, 97),
                accent: Rgba8::rgb(34, 197, 94),
                hud: Rgba8::rgb(46, 230, 123),
                ink: Rgba8::rgb(255, 255, 255),
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BannerError::params(format!("unknown preset '{s}'")))
    }
}

/// Colors a preset paints with. Not part of the serialized params.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Background gradient stops, top to bottom.
    pub bg: [Rgba8; 3],
    pub gold: Rgba8,
    pub gold_hi: Rgba8,
    pub marble: Rgba8,
    pub vein: Rgba8,
    pub accent: Rgba8,
    pub hud: Rgba8,
    pub ink: Rgba8,
}
