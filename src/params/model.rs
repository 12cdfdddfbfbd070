use crate::foundation::error::{BannerError, BannerResult};
use crate::params::preset::Preset;

/// Flat scene configuration consumed by the renderer.
///
/// JSON keys are camelCase (`faceBias`, `scanSpeed`). Every section is optional when
/// deserializing; missing sections take the greco defaults, but the usual entry point is
/// [`crate::params::resolve`], which starts from the requested preset instead.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub preset: Preset,
    pub cam: CamParams,
    pub halo: HaloParams,
    pub text: TextParams,
    pub core: CoreParams,
    pub hud: HudParams,
    pub labels: Labels,
}

/// Camera orbit. Angles are radians, `fov` is vertical degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CamParams {
    pub r: f64,
    pub sweep: f64,
    pub lift: f64,
    pub bob: f64,
    pub roll: f64,
    pub fov: f64,
}

/// Halo ring placement. `rx`/`ry` tilt the ring plane; `spin` is the swing amplitude in turns.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HaloParams {
    pub x: f64,
    pub y: f64,
    pub rx: f64,
    pub ry: f64,
    pub spin: f64,
    pub wobble: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextParams {
    pub pull: f64,
    pub lift: f64,
    pub face_bias: f64,
    pub size: f64,
    pub depth: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoreParams {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HudParams {
    pub opacity: f64,
    /// Scanline sweeps per loop, rounded to a whole number of at least one.
    pub scan_speed: f64,
}

/// Nameplate strings. Empty strings are not drawn.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub subtitle: String,
    pub tagline: String,
}

impl Default for SceneParams {
    fn default() -> Self {
        Preset::Greco.defaults()
    }
}

impl Default for CamParams {
    fn default() -> Self {
        Preset::Greco.defaults().cam
    }
}

impl Default for HaloParams {
    fn default() -> Self {
        Preset::Greco.defaults().halo
    }
}

impl Default for TextParams {
    fn default() -> Self {
        Preset::Greco.defaults().text
    }
}

impl Default for CoreParams {
    fn default() -> Self {
        Preset::Greco.defaults().core
    }
}

impl Default for HudParams {
    fn default() -> Self {
        Preset::Greco.defaults().hud
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "bannerkit".to_string(),
            subtitle: "animated profile banner".to_string(),
            tagline: String::new(),
        }
    }
}

impl SceneParams {
    /// Range checks the renderer relies on. Numbers must be finite; radii and sizes positive.
    pub fn validate(&self) -> BannerResult<()> {
        let fields = [
            ("cam.r", self.cam.r),
            ("cam.sweep", self.cam.sweep),
            ("cam.lift", self.cam.lift),
            ("cam.bob", self.cam.bob),
            ("cam.roll", self.cam.roll),
            ("cam.fov", self.cam.fov),
            ("halo.x", self.halo.x),
            ("halo.y", self.halo.y),
            ("halo.rx", self.halo.rx),
            ("halo.ry", self.halo.ry),
            ("halo.spin", self.halo.spin),
            ("halo.wobble", self.halo.wobble),
            ("text.pull", self.text.pull),
            ("text.lift", self.text.lift),
            ("text.faceBias", self.text.face_bias),
            ("text.size", self.text.size),
            ("text.depth", self.text.depth),
            ("core.x", self.core.x),
            ("core.y", self.core.y),
            ("core.z", self.core.z),
            ("core.size", self.core.size),
            ("hud.opacity", self.hud.opacity),
            ("hud.scanSpeed", self.hud.scan_speed),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(BannerError::params(format!("{name} must be finite")));
        }

        if self.cam.r <= 0.5 {
            return Err(BannerError::params("cam.r must be > 0.5"));
        }
        if !(5.0..=150.0).contains(&self.cam.fov) {
            return Err(BannerError::params("cam.fov must be within [5, 150] degrees"));
        }
        if self.text.size <= 0.0 {
            return Err(BannerError::params("text.size must be > 0"));
        }
        if self.text.depth < 0.0 {
            return Err(BannerError::params("text.depth must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.text.face_bias) {
            return Err(BannerError::params("text.faceBias must be within [0, 1]"));
        }
        if self.core.size < 0.0 {
            return Err(BannerError::params("core.size must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.hud.opacity) {
            return Err(BannerError::params("hud.opacity must be within [0, 1]"));
        }
        Ok(())
    }

    /// Pretty JSON with a trailing newline, the on-disk form of persisted params.
    pub fn to_pretty_json(&self) -> BannerResult<String> {
        let mut s = serde_json::to_string_pretty(self)?;
        s.push('\n');
        Ok(s)
    }
}
