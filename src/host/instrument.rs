//! Installation of the hooks that feed events into the core.
//!
//! Each point is isolated: an error or panic while attaching one is logged and
//! the rest still install.

use crate::error::CoreError;
use crate::{log_debug, log_warn, Component};
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};

pub trait InstrumentationPoint {
    fn name(&self) -> &str;
    fn attach(&mut self) -> Result<()>;
}

/// Instrumentation point backed by a closure.
pub struct FnPoint<F> {
    name: String,
    attach: F,
}

impl<F> FnPoint<F>
where
    F: FnMut() -> Result<()>,
{
    pub fn new(name: impl Into<String>, attach: F) -> Self {
        Self {
            name: name.into(),
            attach,
        }
    }
}

impl<F> InstrumentationPoint for FnPoint<F>
where
    F: FnMut() -> Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&mut self) -> Result<()> {
        (self.attach)()
    }
}

#[derive(Debug, Default)]
pub struct InstallReport {
    pub attached: Vec<String>,
    pub failed: Vec<CoreError>,
}

impl InstallReport {
    pub fn all_attached(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn install_all(points: &mut [Box<dyn InstrumentationPoint + '_>]) -> InstallReport {
    let mut report = InstallReport::default();
    for point in points.iter_mut() {
        let name = point.name().to_string();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| point.attach()));
        let reason = match outcome {
            Ok(Ok(())) => {
                log_debug(Component::Host, &format!("instrumentation attached: {name}"));
                report.attached.push(name);
                continue;
            }
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => panic_message(payload.as_ref()),
        };
        let err = CoreError::InstrumentationAttach {
            point: name,
            reason,
        };
        log_warn(Component::Host, &err.to_string());
        report.failed.push(err);
    }
    report
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panicked: {text}")
    } else {
        "panicked".to_string()
    }
}
