use anyhow::{bail, Context, Result};
use crossbeam_channel::Sender;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use surface_augment::host::{IntentAction, SurfaceOutput};
use surface_augment::{log_debug, Component};
use surface_augment::recording::{CompletionNotifier, MediaPlayer};

const POLL_SLICE: Duration = Duration::from_millis(10);

#[derive(Clone)]
struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Stands in for the media subsystem: "plays" a file for a fixed time, then
/// reports completion from its own thread.
pub(crate) struct SimulatedPlayer {
    length: Duration,
    surface: Sender<SurfaceOutput>,
    active: Option<CancelToken>,
}

impl SimulatedPlayer {
    pub(crate) fn new(length: Duration, surface: Sender<SurfaceOutput>) -> Self {
        Self {
            length,
            surface,
            active: None,
        }
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn start(&mut self, path: &Path, on_complete: CompletionNotifier) -> Result<()> {
        let meta = fs::metadata(path).with_context(|| format!("cannot stat {}", path.display()))?;
        if meta.len() == 0 {
            bail!("{} is empty", path.display());
        }
        self.release();
        let token = CancelToken::new();
        let worker_token = token.clone();
        let length = self.length;
        thread::spawn(move || {
            let started = Instant::now();
            while started.elapsed() < length {
                if worker_token.is_cancelled() {
                    return;
                }
                thread::sleep(POLL_SLICE.min(length.saturating_sub(started.elapsed())));
            }
            if !worker_token.is_cancelled() {
                on_complete.notify();
            }
        });
        self.active = Some(token);
        let _ = self.surface.send(SurfaceOutput::Playback {
            action: IntentAction::Start,
            path: Some(path.to_path_buf()),
        });
        log_debug(
            Component::Replay,
            &format!("playback started: {}", path.display()),
        );
        Ok(())
    }

    fn release(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
            let _ = self.surface.send(SurfaceOutput::Playback {
                action: IntentAction::Stop,
                path: None,
            });
        }
    }
}
