use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::png::write_png;
use crate::encode::process::{DEFAULT_FFMPEG_TIMEOUT, ensure_parent_dir};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};
use crate::params::SceneParams;
use crate::render::backend::{Quality, RenderOpts};
use crate::render::cpu::CpuRenderer;
use crate::render::sheet::{downscale, render_sheet};
use crate::scene::animate::{frame_count, sample_times};

/// Default still time: early in the loop where the nameplate reads well.
pub const DEFAULT_STILL_T: f64 = 0.22;

/// What a [`RenderJob`] produces.
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    /// One PNG at normalized time `t`.
    Still { t: f64 },
    /// PNG grid of stills, one per time, `columns` wide.
    Sheet { times: Vec<f64>, columns: u32 },
    /// Looping palette-optimized GIF.
    Gif,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Still { .. } => "still",
            Mode::Sheet { .. } => "sheet",
            Mode::Gif => "gif",
        }
    }
}

/// One invocation of the banner pipeline.
#[derive(Clone, Debug)]
pub struct RenderJob {
    pub mode: Mode,
    pub out: PathBuf,
    pub canvas: Canvas,
    pub scale: u32,
    pub fps: u32,
    pub seconds: f64,
    pub params: SceneParams,
    pub quality: Quality,
    pub timeout: Duration,
    /// Also write `<out stem>.params.json` beside the output.
    pub save_params: bool,
    pub font: Option<PathBuf>,
}

impl RenderJob {
    pub fn new(mode: Mode, out: impl Into<PathBuf>, params: SceneParams) -> Self {
        Self {
            mode,
            out: out.into(),
            canvas: Canvas::BANNER,
            scale: 2,
            fps: 24,
            seconds: 3.0,
            params,
            quality: Quality::Final,
            timeout: DEFAULT_FFMPEG_TIMEOUT,
            save_params: false,
            font: None,
        }
    }

    fn render_opts(&self) -> RenderOpts {
        RenderOpts {
            canvas: self.canvas,
            scale: self.scale,
            quality: self.quality,
            font: self.font.clone(),
        }
    }
}

/// What a finished job wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    pub out: PathBuf,
    pub frames: u32,
    pub params_path: Option<PathBuf>,
}

/// Run a job to completion. Frames are rendered one after another on the calling thread.
#[tracing::instrument(skip(job), fields(mode = job.mode.name(), out = %job.out.display()))]
pub fn run(job: &RenderJob) -> BannerResult<RenderReport> {
    job.params.validate()?;
    let mut renderer = CpuRenderer::new(job.render_opts())?;

    let frames = match &job.mode {
        Mode::Still { t } => {
            let frame = downscale(&renderer.render(&job.params, *t)?, job.canvas)?;
            write_png(&frame, &job.out)?;
            1
        }
        Mode::Sheet { times, columns } => {
            let sheet = render_sheet(&mut renderer, &job.params, times, *columns)?;
            write_png(&sheet, &job.out)?;
            times.len() as u32
        }
        Mode::Gif => {
            let bg = job.params.preset.palette().bg[0];
            let mut sink = GifSink::new(
                GifSinkOpts {
                    bg_rgba: [bg.r, bg.g, bg.b, 255],
                    ..GifSinkOpts::new(&job.out, job.canvas)
                }
                .with_timeout(job.timeout),
            );
            encode_loop(&mut renderer, &job.params, job.fps, job.seconds, &mut sink)?
        }
    };

    let params_path = if job.save_params {
        Some(save_params(&job.params, &job.out)?)
    } else {
        None
    };

    tracing::info!(frames, "render finished");
    Ok(RenderReport {
        out: job.out.clone(),
        frames,
        params_path,
    })
}

/// Render every sample of one loop into `sink`. Returns the number of frames pushed.
pub fn encode_loop(
    renderer: &mut CpuRenderer,
    params: &SceneParams,
    fps: u32,
    seconds: f64,
    sink: &mut dyn FrameSink,
) -> BannerResult<u32> {
    if fps == 0 {
        return Err(BannerError::validation("fps must be >= 1"));
    }
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(BannerError::validation("seconds must be finite and > 0"));
    }
    let frames = frame_count(fps, seconds);
    let size = renderer.render_canvas();
    sink.begin(SinkConfig {
        width: size.width,
        height: size.height,
        fps,
    })?;

    for (i, t) in sample_times(frames).enumerate() {
        let frame = renderer.render(params, t)?;
        sink.push_frame(i as u32, &frame)?;
        if (i + 1) % 12 == 0 {
            tracing::debug!(done = i + 1, total = frames, "frames rendered");
        }
    }
    sink.end()?;
    Ok(frames)
}

/// `<dir>/<stem>.params.json` for an output at `out`.
pub fn params_path_for(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "banner".to_string());
    out.with_file_name(format!("{stem}.params.json"))
}

/// Persist `params` as pretty JSON beside `out`.
pub fn save_params(params: &SceneParams, out: &Path) -> BannerResult<PathBuf> {
    let path = params_path_for(out);
    ensure_parent_dir(&path)?;
    std::fs::write(&path, params.to_pretty_json()?)?;
    tracing::info!(path = %path.display(), "params saved");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
