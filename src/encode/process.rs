use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::foundation::error::{BannerError, BannerResult};

/// Upper bound for one `ffmpeg` encode when the caller does not set one.
pub const DEFAULT_FFMPEG_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Wait for `child` to exit, killing and reaping it once `timeout` elapses.
///
/// A zero timeout waits forever.
pub fn wait_with_timeout(
    child: &mut Child,
    program: &str,
    timeout: Duration,
) -> BannerResult<ExitStatus> {
    if timeout.is_zero() {
        return Ok(child.wait()?);
    }
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        let now = Instant::now();
        if now >= deadline {
            tracing::warn!(program, timeout_ms = timeout.as_millis() as u64, "killing child after timeout");
            // The child may exit between try_wait and kill; reaping covers both cases.
            let _ = child.kill();
            let _ = child.wait();
            return Err(BannerError::timeout(program, timeout));
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

enum Outcome {
    Exited(ExitStatus),
    TimedOut,
    Cancelled,
}

/// A child process owned by a supervising thread that kills it once `timeout` has elapsed
/// since spawn.
///
/// The deadline covers the whole lifetime of the child, including time the caller spends
/// blocked writing to its stdin: killing the child closes the pipe and unblocks the writer.
/// A zero timeout never fires.
pub struct Watchdog {
    program: String,
    timeout: Duration,
    timed_out: Arc<AtomicBool>,
    cancel: mpsc::Sender<()>,
    handle: Option<JoinHandle<std::io::Result<Outcome>>>,
}

impl Watchdog {
    pub fn spawn(mut child: Child, program: &str, timeout: Duration) -> Self {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let timed_out = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&timed_out);
        let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);
        let name = program.to_string();

        let handle = std::thread::spawn(move || -> std::io::Result<Outcome> {
            loop {
                if let Some(status) = child.try_wait()? {
                    return Ok(Outcome::Exited(status));
                }
                let wait = match deadline {
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            tracing::warn!(program = %name, timeout_ms = timeout.as_millis() as u64, "killing child after timeout");
                            flag.store(true, Ordering::SeqCst);
                            let _ = child.kill();
                            let _ = child.wait();
                            return Ok(Outcome::TimedOut);
                        }
                        POLL_INTERVAL.min(deadline - now)
                    }
                    None => POLL_INTERVAL,
                };
                match cancelled.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Ok(Outcome::Cancelled);
                    }
                }
            }
        });

        Self {
            program: program.to_string(),
            timeout,
            timed_out,
            cancel,
            handle: Some(handle),
        }
    }

    /// Whether the deadline has fired and the child was killed.
    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::SeqCst)
    }

    pub fn timeout_error(&self) -> BannerError {
        BannerError::timeout(self.program.clone(), self.timeout)
    }

    /// Block until the child exits or the deadline kills it.
    pub fn wait(mut self) -> BannerResult<ExitStatus> {
        match self.join()? {
            Outcome::Exited(status) => Ok(status),
            Outcome::TimedOut => Err(self.timeout_error()),
            Outcome::Cancelled => Err(BannerError::encode(format!("{} was cancelled", self.program))),
        }
    }

    /// Kill the child now and reap it.
    pub fn kill(mut self) {
        let _ = self.cancel.send(());
        let _ = self.join();
    }

    fn join(&mut self) -> BannerResult<Outcome> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| BannerError::encode(format!("{} watchdog already joined", self.program)))?;
        handle
            .join()
            .map_err(|_| BannerError::encode(format!("{} watchdog thread panicked", self.program)))?
            .map_err(BannerError::from)
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.cancel.send(());
            let _ = self.join();
        }
    }
}

/// Captured result of [`run_with_timeout`].
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawn `cmd` with piped output, wait with [`wait_with_timeout`] and collect both streams.
pub fn run_with_timeout(
    cmd: &mut Command,
    program: &str,
    timeout: Duration,
) -> BannerResult<CapturedOutput> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let status = wait_with_timeout(&mut child, program, timeout)?;
    Ok(CapturedOutput {
        status,
        stdout: join_drain(stdout, program)?,
        stderr: join_drain(stderr, program)?,
    })
}

pub(crate) type Drain = Option<JoinHandle<std::io::Result<Vec<u8>>>>;

/// Read a child pipe to the end on its own thread so the child never blocks on a full pipe.
pub(crate) fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut r| {
        std::thread::spawn(move || {
            let mut bytes = Vec::new();
            r.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
    })
}

pub(crate) fn join_drain(handle: Drain, program: &str) -> BannerResult<Vec<u8>> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| BannerError::encode(format!("{program} output drain thread panicked")))?
            .map_err(|e| BannerError::encode(format!("{program} output read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> BannerResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    run_with_timeout(
        Command::new("ffmpeg").arg("-version"),
        "ffmpeg",
        Duration::from_secs(10),
    )
    .map(|out| out.status.success())
    .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/process.rs"]
mod tests;
