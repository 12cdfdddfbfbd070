//! Frame sinks and the external `ffmpeg` process they drive.

/// Palette-optimized looping GIF output through `ffmpeg`.
pub mod gif;
/// PNG stills.
pub mod png;
/// Subprocess helpers with a hard timeout.
pub mod process;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use gif::{GifSink, GifSinkOpts, gif_filter_graph};
pub use png::write_png;
pub use process::{
    DEFAULT_FFMPEG_TIMEOUT, Watchdog, ensure_parent_dir, is_ffmpeg_on_path, wait_with_timeout,
};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
