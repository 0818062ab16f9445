use super::{HostSurface, SurfaceOutput};
use std::sync::{Arc, Mutex};

/// Surface that keeps every output for later inspection.
#[derive(Clone, Default)]
pub(crate) struct CapturedSurface {
    outputs: Arc<Mutex<Vec<SurfaceOutput>>>,
}

impl CapturedSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take(&self) -> Vec<SurfaceOutput> {
        std::mem::take(&mut *self.outputs.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl HostSurface for CapturedSurface {
    fn emit(&mut self, output: SurfaceOutput) {
        self.outputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(output);
    }
}
