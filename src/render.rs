//! CPU rasterization of banner frames.

pub mod backend;
pub mod composite;
pub mod cpu;
pub mod hud;
pub mod light;
pub mod sheet;
pub mod text;

pub use backend::{FrameRGBA, Quality, RenderOpts};
pub use cpu::CpuRenderer;
pub use sheet::{downscale, render_sheet};
pub use text::{FONT_ENV, LoadedFont, load_font};
