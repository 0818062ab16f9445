use super::MemorySnapshot;
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Where memory figures come from. Implementations must not cache.
pub trait MemoryInfoSource: Send {
    fn read(&self) -> Result<MemorySnapshot>;
}

fn meminfo_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"(?m)^(?P<key>[A-Za-z_()]+):\s+(?P<value>\d+)(?:\s+kB)?\s*$")
            .expect("static meminfo pattern")
    })
}

/// Parse `/proc/meminfo` text. `MemTotal`, `MemFree` and `Cached` are required.
pub fn parse_meminfo(text: &str) -> Result<MemorySnapshot> {
    let mut total = None;
    let mut free = None;
    let mut cached = None;
    for caps in meminfo_line().captures_iter(text) {
        let kib: u64 = caps["value"]
            .parse()
            .with_context(|| format!("bad meminfo value for {}", &caps["key"]))?;
        let bytes = kib.saturating_mul(1024);
        match &caps["key"] {
            "MemTotal" => total = Some(bytes),
            "MemFree" => free = Some(bytes),
            "Cached" => cached = Some(bytes),
            _ => {}
        }
    }
    Ok(MemorySnapshot {
        total_bytes: total.ok_or_else(|| anyhow!("meminfo missing MemTotal"))?,
        free_bytes: free.ok_or_else(|| anyhow!("meminfo missing MemFree"))?,
        cached_bytes: cached.ok_or_else(|| anyhow!("meminfo missing Cached"))?,
        reserved_bytes: 0,
    })
}

/// Reads a meminfo-formatted file on every call.
pub struct ProcMeminfo {
    path: PathBuf,
    reserved_bytes: u64,
}

impl ProcMeminfo {
    pub fn new() -> Self {
        Self::with_path("/proc/meminfo")
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reserved_bytes: 0,
        }
    }

    pub fn with_reserved_bytes(mut self, reserved_bytes: u64) -> Self {
        self.reserved_bytes = reserved_bytes;
        self
    }
}

impl Default for ProcMeminfo {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInfoSource for ProcMeminfo {
    fn read(&self) -> Result<MemorySnapshot> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut snapshot = parse_meminfo(&text)?;
        snapshot.reserved_bytes = self.reserved_bytes;
        Ok(snapshot)
    }
}

/// `/proc/meminfo` first, `sysinfo(2)` when procfs is unavailable.
#[derive(Default)]
pub struct SystemMemory {
    proc: ProcMeminfo,
}

impl SystemMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInfoSource for SystemMemory {
    fn read(&self) -> Result<MemorySnapshot> {
        match self.proc.read() {
            Ok(snapshot) => Ok(snapshot),
            Err(proc_err) => {
                crate::log_debug(
                    crate::Component::Memory,
                    &format!("meminfo unavailable ({proc_err:#}); trying sysinfo"),
                );
                read_sysinfo().with_context(|| format!("meminfo failed: {proc_err:#}"))
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn read_sysinfo() -> Result<MemorySnapshot> {
    // SAFETY: `sysinfo` only writes into the zeroed struct we pass it.
    let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::sysinfo(&mut info) };
    if rc != 0 {
        return Err(anyhow!(
            "sysinfo failed: {}",
            std::io::Error::last_os_error()
        ));
    }
    let unit = u64::from(info.mem_unit.max(1));
    Ok(MemorySnapshot {
        total_bytes: (info.totalram as u64).saturating_mul(unit),
        free_bytes: (info.freeram as u64).saturating_mul(unit),
        cached_bytes: (info.bufferram as u64).saturating_mul(unit),
        reserved_bytes: 0,
    })
}

#[cfg(not(target_os = "linux"))]
fn read_sysinfo() -> Result<MemorySnapshot> {
    Err(anyhow!("sysinfo is only available on linux"))
}
