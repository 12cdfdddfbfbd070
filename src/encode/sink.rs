use crate::foundation::error::BannerResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Width of the frames that will be pushed.
    pub width: u32,
    /// Height of the frames that will be pushed.
    pub height: u32,
    /// Playback frames per second.
    pub fps: u32,
}

/// Sink contract for consuming rendered frames in loop order.
///
/// Ordering contract: `push_frame` is called with strictly increasing frame indices.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BannerResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> BannerResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BannerResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u32, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u32, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BannerResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> BannerResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BannerResult<()> {
        self.finished = true;
        Ok(())
    }
}
