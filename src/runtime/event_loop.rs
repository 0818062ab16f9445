use super::context::OverlayContext;
use super::event::CoreEvent;
use crate::{log_debug, Component};
use crossbeam_channel::{after, never, select, Receiver};
use std::time::Instant;

/// Drain `rx` on the calling thread until the context is destroyed or every
/// sender is gone. Armed timers are fired from here, in deadline order with
/// the queued events.
pub fn run_event_loop(ctx: &mut OverlayContext, rx: &Receiver<CoreEvent>) {
    let mut running = true;
    while running && !ctx.is_destroyed() {
        let now = Instant::now();
        for fired in ctx.due_timers(now) {
            ctx.dispatch(fired, now);
        }
        let timer = match ctx.next_deadline() {
            Some(deadline) => after(deadline.saturating_duration_since(Instant::now())),
            None => never(),
        };
        select! {
            recv(rx) -> event => match event {
                Ok(event) => ctx.dispatch(event, Instant::now()),
                Err(_) => running = false,
            },
            recv(timer) -> _ => {}
        }
    }
    log_debug(Component::Runtime, "event loop stopped");
}
