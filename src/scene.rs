//! Closed-form scene animation: camera orbit, halo, nameplate and core poses per frame.

pub mod animate;
pub mod camera;
pub mod geometry;

pub use animate::{ANCHOR, FrameState, frame_count, frame_state, sample_times};
pub use camera::{Camera, Projector, ScreenPoint};
