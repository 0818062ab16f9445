//! JSON trace stream. Each `log_debug`/`log_warn` call becomes one flat object
//! with its `component` field next to the message.

use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;

pub const TRACE_LOG_ENV: &str = "SURFACE_AUGMENT_TRACE_LOG";

static TRACE_SINK: OnceLock<Option<PathBuf>> = OnceLock::new();

pub fn trace_log_path() -> PathBuf {
    env::var_os(TRACE_LOG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("surface_augment_trace.jsonl"))
}

/// Install the global subscriber when logging is on. Returns the trace file,
/// or `None` when tracing is off or another subscriber already owns the process.
pub fn init_tracing(config: &AppConfig) -> Option<PathBuf> {
    if !config.logging_enabled() {
        return None;
    }
    TRACE_SINK
        .get_or_init(|| install_json_subscriber(trace_log_path()))
        .clone()
}

fn install_json_subscriber(path: PathBuf) -> Option<PathBuf> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    let subscriber = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_timer(UtcTime::rfc_3339())
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok()?;
    Some(path)
}
