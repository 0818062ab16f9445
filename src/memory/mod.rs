//! Device memory sampling for the resource bar.
//!
//! Sampling is driven by the runtime on specific triggers (host shown with the
//! bar enabled, an item dismissed). Nothing here schedules its own refresh and
//! nothing is cached between samples.

mod format;
mod source;

pub use format::format_short_size;
pub use source::{parse_meminfo, MemoryInfoSource, ProcMeminfo, SystemMemory};

use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub cached_bytes: u64,
    /// Memory the host keeps back from apps; subtracted from what counts as available.
    pub reserved_bytes: u64,
}

impl MemorySnapshot {
    /// Memory that could be handed to a new foreground process.
    pub fn available_bytes(&self) -> u64 {
        self.free_bytes
            .saturating_add(self.cached_bytes)
            .saturating_sub(self.reserved_bytes)
            .min(self.total_bytes)
    }

    pub fn used_bytes(&self) -> u64 {
        self.total_bytes - self.available_bytes()
    }

    /// Fraction of memory in use, always within `[0, 1]`.
    pub fn used_ratio(&self) -> f32 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let ratio = self.used_bytes() as f64 / self.total_bytes as f64;
        ratio.clamp(0.0, 1.0) as f32
    }
}

/// One sample, ready for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSample {
    pub snapshot: MemorySnapshot,
    pub used_ratio: f32,
    pub formatted_used: String,
    pub formatted_free: String,
}

impl ResourceSample {
    pub fn from_snapshot(snapshot: MemorySnapshot) -> Self {
        Self {
            used_ratio: snapshot.used_ratio(),
            formatted_used: format_short_size(snapshot.used_bytes()),
            formatted_free: format_short_size(snapshot.available_bytes()),
            snapshot,
        }
    }
}

/// Stateless sampler over a memory source.
pub struct ResourceMonitor {
    source: Box<dyn MemoryInfoSource>,
}

impl ResourceMonitor {
    pub fn new(source: Box<dyn MemoryInfoSource>) -> Self {
        Self { source }
    }

    /// Read a fresh snapshot. Safe to call redundantly.
    pub fn sample(&self) -> Result<ResourceSample> {
        let snapshot = self.source.read()?;
        Ok(ResourceSample::from_snapshot(snapshot))
    }
}
