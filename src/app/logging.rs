//! Component-tagged debug log and crash reports.
//!
//! Every line goes to `tracing` with a `component` field. When logging is
//! enabled it is also appended to a capped file in the temp dir, so a replay
//! can be inspected without a trace subscriber.

use crate::config::AppConfig;
use crate::host::panic_message;
use serde::Serialize;
use std::{
    env, fs,
    io::{self, Write},
    panic,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

const DEBUG_LOG_CAP: u64 = 5 * 1024 * 1024;
const CRASH_LOG_CAP: u64 = 256 * 1024;

static ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: OnceLock<Mutex<Option<CappedLog>>> = OnceLock::new();

/// The part of the runtime a log line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Config,
    Layout,
    Memory,
    Recording,
    Charge,
    Dismiss,
    Host,
    Runtime,
    Replay,
}

impl Component {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Layout => "layout",
            Self::Memory => "memory",
            Self::Recording => "recording",
            Self::Charge => "charge",
            Self::Dismiss => "dismiss",
            Self::Host => "host",
            Self::Runtime => "runtime",
            Self::Replay => "replay",
        }
    }
}

#[derive(Clone, Copy)]
enum Level {
    Debug,
    Warn,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Warn => "WARN",
        }
    }
}

pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("surface_augment.log")
}

/// Crash reports, one JSON object per panic.
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("surface_augment_crash.log")
}

/// Append-only file that starts over once the next line would push it past `cap`.
struct CappedLog {
    path: PathBuf,
    cap: u64,
    file: fs::File,
    len: u64,
}

impl CappedLog {
    fn open(path: PathBuf, cap: u64) -> io::Result<Self> {
        let len = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let mut log = Self {
            path,
            cap,
            file,
            len,
        };
        if log.len > log.cap {
            log.restart()?;
        }
        Ok(log)
    }

    fn restart(&mut self) -> io::Result<()> {
        self.file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.len = 0;
        Ok(())
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        let bytes = line.len() as u64;
        if self.len.saturating_add(bytes) > self.cap {
            self.restart()?;
        }
        self.file.write_all(line.as_bytes())?;
        self.len = self.len.saturating_add(bytes);
        Ok(())
    }
}

fn debug_log() -> &'static Mutex<Option<CappedLog>> {
    DEBUG_LOG.get_or_init(|| Mutex::new(None))
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn configure(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    let mut slot = debug_log()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = if enabled {
        CappedLog::open(log_file_path(), DEBUG_LOG_CAP).ok()
    } else {
        None
    };
}

/// Turn the file sinks on or off from `--logs` / `--no-logs`.
pub fn init_logging(config: &AppConfig) {
    configure(config.logging_enabled());
}

pub fn log_debug(component: Component, msg: &str) {
    tracing::debug!(target: "surface_augment", component = component.as_str(), "{msg}");
    append_line(Level::Debug, component, msg);
}

/// Failures that were absorbed. Shows up at warn level in the trace stream.
pub fn log_warn(component: Component, msg: &str) {
    tracing::warn!(target: "surface_augment", component = component.as_str(), "{msg}");
    append_line(Level::Warn, component, msg);
}

fn append_line(level: Level, component: Component, msg: &str) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format_line(unix_millis(), level, component, msg);
    let mut slot = debug_log()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(log) = slot.as_mut() {
        let _ = log.append(&line);
    }
}

fn format_line(at_ms: u128, level: Level, component: Component, msg: &str) -> String {
    format!(
        "{at_ms} {:<5} {:<9} {msg}\n",
        level.as_str(),
        component.as_str()
    )
}

#[derive(Serialize)]
struct CrashRecord<'a> {
    at_ms: u128,
    thread: &'a str,
    location: String,
    message: String,
    version: &'static str,
}

/// Record a panic in the crash log. Called from the binary's panic hook.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let current = thread::current();
    let record = CrashRecord {
        at_ms: unix_millis(),
        thread: current.name().unwrap_or("unnamed"),
        location: info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string()),
        message: panic_message(info.payload()),
        version: env!("CARGO_PKG_VERSION"),
    };
    let Ok(mut line) = serde_json::to_string(&record) else {
        return;
    };
    line.push('\n');
    if let Ok(mut log) = CappedLog::open(crash_log_path(), CRASH_LOG_CAP) {
        let _ = log.append(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "surface_augment_{name}_{}.log",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn capped_log_starts_over_past_the_cap() {
        let path = scratch("cap");
        let mut log = CappedLog::open(path.clone(), 16).unwrap();
        log.append("0123456789\n").unwrap();
        log.append("abcdefghij\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdefghij\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn oversized_existing_log_is_emptied_on_open() {
        let path = scratch("oversized");
        fs::write(&path, "x".repeat(64)).unwrap();
        let mut log = CappedLog::open(path.clone(), 32).unwrap();
        log.append("fresh\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn lines_carry_level_and_component() {
        let line = format_line(1_700, Level::Warn, Component::Recording, "stop failed");
        assert_eq!(line, "1700 WARN  recording stop failed\n");
        let line = format_line(5, Level::Debug, Component::Host, "attached");
        assert_eq!(line, "5 DEBUG host      attached\n");
    }

    #[test]
    fn disabled_logging_drops_the_file_sink() {
        configure(false);
        log_debug(Component::Runtime, "ignored");
        let slot = debug_log().lock().unwrap_or_else(|e| e.into_inner());
        assert!(slot.is_none());
    }
}
