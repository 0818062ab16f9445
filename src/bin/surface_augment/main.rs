//! Replays a JSON event script through one overlay context.
//!
//! # Architecture
//!
//! - Script thread: parses stdin or a file into core events, honouring `wait` lines
//! - Control thread (main): owns the context and runs the event loop
//! - Writer thread: prints each output request as a JSON line
//! - Playback threads: simulated media completions, posted back as events

mod config;
mod player;
mod script;
mod writer;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;
use std::fs::File;
use std::io::{self, BufReader};
use std::panic;
use std::sync::OnceLock;
use std::time::Duration;
use surface_augment::config::Preferences;
use surface_augment::dismiss::{StaticStacks, TaskStackSource};
use surface_augment::host::{install_all, FnPoint, InstrumentationPoint, SurfaceOutput};
use surface_augment::memory::{MemoryInfoSource, SystemMemory};
use surface_augment::recording::{FsProbe, IntentBackend};
use surface_augment::{
    init_logging, init_tracing, log_debug, log_file_path, log_panic, log_warn, run_event_loop,
    Component,
    OverlayContext, OverlayDeps,
};

use crate::config::ReplayConfig;
use crate::player::SimulatedPlayer;
use crate::script::spawn_script_thread;
use crate::writer::spawn_writer_thread;

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

const TASK_STACKS_POINT: &str = "task-stacks";

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log_panic(info);
            previous(info);
        }));
    });
}

/// Instrumentation point that runs `check`, unless the replay was told to refuse it.
fn attach(
    name: &str,
    config: &ReplayConfig,
    mut check: impl FnMut() -> Result<()>,
) -> FnPoint<impl FnMut() -> Result<()>> {
    let refused = config.fail_points.iter().any(|point| point == name);
    FnPoint::new(name, move || {
        if refused {
            return Err(anyhow!("attach refused by host"));
        }
        check()
    })
}

fn main() -> Result<()> {
    let mut config = ReplayConfig::parse();
    config.app.validate()?;
    init_logging(&config.app);
    let trace = init_tracing(&config.app);
    install_panic_hook();
    log_debug(
        Component::Replay,
        &format!(
            "replay started; log {}, trace {}",
            log_file_path().display(),
            trace.map_or_else(|| "off".to_string(), |path| path.display().to_string())
        ),
    );

    let reader: Box<dyn io::BufRead + Send> = if config.reads_stdin() {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&config.script)
            .with_context(|| format!("failed to open script {}", config.script.display()))?;
        Box::new(BufReader::new(file))
    };

    let (out_tx, out_rx) = unbounded::<SurfaceOutput>();
    let writer_handle = spawn_writer_thread(out_rx);

    let memory = SystemMemory::new();
    let stack_counts = config.stacks.clone();
    let report = {
        let mut points: Vec<Box<dyn InstrumentationPoint + '_>> = vec![
            Box::new(attach("overlay-surface", &config, || Ok(()))),
            Box::new(attach(TASK_STACKS_POINT, &config, || {
                if stack_counts.is_empty() {
                    return Err(anyhow!("no task stacks to attach to"));
                }
                Ok(())
            })),
            Box::new(attach("memory-source", &config, || memory.read().map(|_| ()))),
            Box::new(attach("recording-status", &config, || Ok(()))),
            Box::new(attach("battery-percentage", &config, || Ok(()))),
        ];
        install_all(&mut points)
    };
    for err in &report.failed {
        let _ = out_tx.send(SurfaceOutput::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    let tasks: Box<dyn TaskStackSource> =
        if report.attached.iter().any(|name| name == TASK_STACKS_POINT) {
            Box::new(StaticStacks::with_counts(&config.stacks))
        } else {
            Box::new(StaticStacks::default())
        };

    let (event_tx, event_rx) = unbounded();
    let deps = OverlayDeps {
        surface: Box::new(out_tx.clone()),
        tasks,
        memory: Box::new(memory),
        backend: Box::new(IntentBackend::new(out_tx.clone())),
        player: Box::new(SimulatedPlayer::new(
            Duration::from_millis(config.playback_ms),
            out_tx.clone(),
        )),
        files: Box::new(FsProbe),
    };
    drop(out_tx);

    let mut ctx = OverlayContext::new(Preferences::from_config(&config.app), deps, event_tx.clone());
    let _script = spawn_script_thread(reader, event_tx);
    run_event_loop(&mut ctx, &event_rx);
    drop(ctx);

    if writer_handle.join().is_err() {
        log_warn(Component::Replay, "writer thread panicked");
    }
    log_debug(Component::Replay, "replay finished");
    Ok(())
}
