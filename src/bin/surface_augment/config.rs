use clap::Parser;
use std::path::PathBuf;
use surface_augment::config::AppConfig;

/// Replay options layered over the shared preferences.
#[derive(Debug, Parser, Clone)]
#[command(about = "Surface augment event replay", author, version)]
pub(crate) struct ReplayConfig {
    #[command(flatten)]
    pub(crate) app: AppConfig,

    /// Newline-delimited JSON event script ("-" reads stdin)
    #[arg(long, default_value = "-")]
    pub(crate) script: PathBuf,

    /// Task count per simulated stack, front to back
    #[arg(long, value_delimiter = ',', default_values_t = [3usize, 2])]
    pub(crate) stacks: Vec<usize>,

    /// Simulated playback length before completion is reported (milliseconds)
    #[arg(long = "playback-ms", default_value_t = 250)]
    pub(crate) playback_ms: u64,

    /// Make the named instrumentation point fail to attach (repeatable)
    #[arg(long = "fail-point", value_name = "NAME")]
    pub(crate) fail_points: Vec<String>,
}

impl ReplayConfig {
    pub(crate) fn reads_stdin(&self) -> bool {
        self.script.as_os_str() == "-"
    }
}
