//! The control thread: one context object, one serialized event queue.

mod context;
mod event;
mod event_loop;

pub use context::{OverlayContext, OverlayDeps};
pub use event::{ClickTarget, CoreEvent, EventSender};
pub use event_loop::run_event_loop;
