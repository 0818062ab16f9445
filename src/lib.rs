pub mod app;
pub mod charge;
pub mod config;
pub mod dismiss;
pub mod error;
pub mod host;
pub mod layout;
pub mod memory;
pub mod recording;
pub mod runtime;
pub mod scheduler;
mod telemetry;

pub use app::{
    crash_log_path, init_logging, log_debug, log_file_path, log_panic, log_warn, Component,
};
pub use error::CoreError;
pub use runtime::{run_event_loop, CoreEvent, OverlayContext, OverlayDeps};
pub use telemetry::{init_tracing, trace_log_path};
