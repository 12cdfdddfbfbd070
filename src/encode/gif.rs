use std::io::Write as _;
use std::path::PathBuf;
use std::process::{ChildStdin, Command, Stdio};
use std::time::Duration;

use crate::encode::process::{
    DEFAULT_FFMPEG_TIMEOUT, Drain, Watchdog, drain, ensure_parent_dir, is_ffmpeg_on_path,
    join_drain,
};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};
use crate::render::backend::FrameRGBA;
use crate::render::composite::flatten_premul_over_bg;

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF path.
    pub out_path: PathBuf,
    /// Final GIF size. Incoming frames may be larger and are Lanczos-scaled by `ffmpeg`.
    pub out_canvas: Canvas,
    /// Background used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Hard limit on the lifetime of the `ffmpeg` process, from spawn to exit. Zero disables it.
    pub timeout: Duration,
}

impl GifSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>, out_canvas: Canvas) -> Self {
        Self {
            out_path: out_path.into(),
            out_canvas,
            bg_rgba: [0, 0, 0, 255],
            timeout: DEFAULT_FFMPEG_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Two-pass palette filter: build a palette from frame differences, then dither with it.
pub fn gif_filter_graph(fps: u32, out: Canvas) -> String {
    format!(
        "fps={fps},scale={w}:{h}:flags=lanczos,split[s0][s1];[s0]palettegen=stats_mode=diff[p];[s1][p]paletteuse=dither=bayer:bayer_scale=4",
        w = out.width,
        h = out.height,
    )
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
pub struct GifSink {
    opts: GifSinkOpts,

    child: Option<Watchdog>,
    stdin: Option<ChildStdin>,
    stderr_drain: Drain,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<u32>,
    frames_written: u32,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-vf",
            &gif_filter_graph(cfg.fps, self.opts.out_canvas),
            "-loop",
            "0",
        ]);
        cmd.arg(&self.opts.out_path);
        cmd
    }

    /// Kill a still-running encoder. Used when a frame fails mid-stream.
    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(child) = self.child.take() {
            child.kill();
        }
        self.stderr_drain = None;
        self.cfg = None;
    }

    /// Spawn `cmd` as the encoder under a [`Watchdog`] and wire up its pipes.
    pub(crate) fn spawn_encoder(&mut self, mut cmd: Command, cfg: SinkConfig) -> BannerResult<()> {
        let mut child = cmd.spawn().map_err(|e| {
            BannerError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BannerError::encode("failed to open ffmpeg stdin"))?;
        let stderr_drain = drain(child.stderr.take());

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps,
            "ffmpeg gif encoder started"
        );

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.child = Some(Watchdog::spawn(child, "ffmpeg", self.opts.timeout));
        self.stdin = Some(stdin);
        self.stderr_drain = stderr_drain;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }
}

impl Drop for GifSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> BannerResult<()> {
        if cfg.fps == 0 {
            return Err(BannerError::validation("fps must be non-zero"));
        }
        Canvas::new(cfg.width, cfg.height)?;
        self.opts.out_canvas.validate()?;
        if self.child.is_some() {
            return Err(BannerError::encode("gif sink already started"));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !is_ffmpeg_on_path() {
            return Err(BannerError::encode(
                "ffmpeg is required for GIF encoding, but was not found on PATH",
            ));
        }

        let cmd = self.command(&cfg);
        self.spawn_encoder(cmd, cfg)
    }

    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> BannerResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BannerError::encode("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(BannerError::encode(
                "gif sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(BannerError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;
        } else {
            if frame.data.len() != self.scratch.len() {
                return Err(BannerError::validation(
                    "frame.data size mismatch with width*height*4",
                ));
            }
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(BannerError::encode("gif sink is already finalized"));
        };
        if let Err(e) = stdin.write_all(&self.scratch) {
            // A watchdog kill surfaces here as a broken pipe.
            let timeout = self
                .child
                .as_ref()
                .filter(|c| c.timed_out())
                .map(Watchdog::timeout_error);
            self.abort();
            return Err(timeout.unwrap_or_else(|| {
                BannerError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
            }));
        }
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> BannerResult<()> {
        drop(self.stdin.take());
        let child = self
            .child
            .take()
            .ok_or_else(|| BannerError::encode("gif sink not started"))?;
        self.cfg = None;

        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => {
                self.stderr_drain = None;
                return Err(e);
            }
        };
        let stderr_bytes = join_drain(self.stderr_drain.take(), "ffmpeg")?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(BannerError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = self.frames_written,
            "gif written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
