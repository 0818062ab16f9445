use super::event::{ClickTarget, CoreEvent, EventSender};
use crate::charge::ChargeIndicator;
use crate::config::Preferences;
use crate::dismiss::{dismiss_all, TaskStackSource};
use crate::error::CoreError;
use crate::host::{
    panic_message, ClearAllButton, Clickable, HostSurface, OverlayElement, QuickRecordTile,
    SurfaceOutput, Updatable,
};
use crate::layout::{compute_layout, LayoutInputs, LayoutOutput};
use crate::{log_debug, log_warn, Component};
use crate::memory::{MemoryInfoSource, ResourceMonitor};
use crate::recording::{
    FileProbe, MediaPlayer, RecordingBackend, RecordingController, RecordingEvent, RecordingPorts,
};
use crate::scheduler::{earliest, TimerId};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Collaborators an overlay context drives. The context owns them until teardown.
pub struct OverlayDeps {
    pub surface: Box<dyn HostSurface>,
    pub tasks: Box<dyn TaskStackSource>,
    pub memory: Box<dyn MemoryInfoSource>,
    pub backend: Box<dyn RecordingBackend>,
    pub player: Box<dyn MediaPlayer>,
    pub files: Box<dyn FileProbe>,
}

/// All state for one host-surface attachment.
pub struct OverlayContext {
    prefs: Preferences,
    shown: bool,
    has_tasks: bool,
    clear_button_visible: bool,
    resource_bar_visible: bool,
    navigation_clear_all: bool,
    last_layout: Option<LayoutOutput>,
    destroyed: bool,
    monitor: ResourceMonitor,
    recorder: RecordingController,
    charge: ChargeIndicator,
    surface: Box<dyn HostSurface>,
    tasks: Box<dyn TaskStackSource>,
    backend: Box<dyn RecordingBackend>,
    player: Box<dyn MediaPlayer>,
    files: Box<dyn FileProbe>,
}

impl OverlayContext {
    /// `events` must feed the queue this context is dispatched from.
    pub fn new(prefs: Preferences, deps: OverlayDeps, events: EventSender) -> Self {
        let recorder =
            RecordingController::new(prefs.recording_quality, prefs.auto_stop_delay(), events);
        let mut charge =
            ChargeIndicator::new(prefs.charging_style, prefs.percent_color, prefs.charging_color);
        let mut surface = deps.surface;
        charge.set_percent_sign(&prefs.percent_sign, Instant::now(), surface.as_mut());
        Self {
            prefs,
            shown: false,
            has_tasks: true,
            clear_button_visible: false,
            resource_bar_visible: false,
            navigation_clear_all: false,
            last_layout: None,
            destroyed: false,
            monitor: ResourceMonitor::new(deps.memory),
            recorder,
            charge,
            surface,
            tasks: deps.tasks,
            backend: deps.backend,
            player: deps.player,
            files: deps.files,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn recorder(&self) -> &RecordingController {
        &self.recorder
    }

    pub fn charge(&self) -> &ChargeIndicator {
        &self.charge
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn last_layout(&self) -> Option<&LayoutOutput> {
        self.last_layout.as_ref()
    }

    /// Apply one event. Panics are caught here and reported; the context stays usable.
    pub fn dispatch(&mut self, event: CoreEvent, now: Instant) {
        if self.destroyed {
            log_debug(Component::Runtime, &format!("event after teardown ignored: {event:?}"));
            return;
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.apply(event, now)));
        if let Err(payload) = result {
            let message = panic_message(payload.as_ref());
            log_warn(Component::Runtime, &format!("event handler failed: {message}"));
            self.surface.emit(SurfaceOutput::Error {
                kind: "UnexpectedPanic",
                message,
            });
        }
    }

    /// Earliest armed timer across all components.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([
            self.recorder.auto_stop_timer().due(),
            self.charge.frame_timer().due(),
        ])
    }

    /// Fire events for every timer whose deadline has passed at `now`.
    pub fn due_timers(&self, now: Instant) -> Vec<CoreEvent> {
        [
            (TimerId::AutoStop, self.recorder.auto_stop_timer().expired(now)),
            (TimerId::ChargeFrame, self.charge.frame_timer().expired(now)),
        ]
        .into_iter()
        .filter_map(|(timer, generation)| {
            generation.map(|generation| CoreEvent::TimerFired { timer, generation })
        })
        .collect()
    }

    fn apply(&mut self, event: CoreEvent, now: Instant) {
        match event {
            CoreEvent::Shown { has_tasks } => self.on_shown(has_tasks),
            CoreEvent::Hidden => self.on_hidden(),
            CoreEvent::Destroyed => self.teardown(),
            CoreEvent::ConfigChanged(change) => {
                let applied = self.prefs.apply(&change);
                for err in applied.errors {
                    self.report(err);
                }
                if applied.layout {
                    self.refresh_visibility();
                    self.relayout(false);
                }
                if applied.recording {
                    self.recorder.set_quality(self.prefs.recording_quality);
                    self.recorder
                        .set_auto_stop_delay(self.prefs.auto_stop_delay());
                }
                if applied.charge {
                    self.sync_charge_preferences(now);
                }
            }
            CoreEvent::DisplayChanged {
                orientation,
                phone_ui,
            } => {
                self.prefs.orientation = orientation;
                self.prefs.phone_ui = phone_ui;
                self.relayout(false);
            }
            CoreEvent::Battery(data) => self.charge.on_battery(data, now, self.surface.as_mut()),
            CoreEvent::IconProfile(profile) => {
                self.charge
                    .on_icon_profile(profile, now, self.surface.as_mut())
            }
            CoreEvent::PercentColor { color } => {
                self.charge
                    .set_base_color(color, now, self.surface.as_mut())
            }
            CoreEvent::RecordingStatus(status) => {
                self.recording(RecordingEvent::Status(status), now)
            }
            CoreEvent::ShortPress => self.recording(RecordingEvent::ShortPress, now),
            CoreEvent::LongPress => self.recording(RecordingEvent::LongPress, now),
            CoreEvent::PlaybackCompleted { playback } => {
                self.recording(RecordingEvent::PlaybackCompleted { playback }, now)
            }
            CoreEvent::DismissAll => self.dismiss_all(),
            CoreEvent::ItemDismissed => self.sample_resources(),
            CoreEvent::Click { target, long } => {
                let follow_up = match target {
                    ClickTarget::ClearButton => click(&ClearAllButton, long),
                    ClickTarget::RecordTile => {
                        click(&QuickRecordTile::new(self.recorder.state()), long)
                    }
                };
                if let Some(event) = follow_up {
                    self.apply(event, now);
                }
            }
            CoreEvent::TimerFired { timer, generation } => match timer {
                TimerId::AutoStop => {
                    self.recording(RecordingEvent::AutoStopFired { generation }, now)
                }
                TimerId::ChargeFrame => {
                    self.charge
                        .on_frame(generation, now, self.surface.as_mut())
                }
            },
        }
    }

    fn on_shown(&mut self, has_tasks: bool) {
        self.shown = true;
        self.has_tasks = has_tasks;
        self.refresh_visibility();
        self.relayout(true);
        self.sample_resources();
    }

    fn on_hidden(&mut self) {
        self.shown = false;
        self.set_navigation_clear_all(false);
    }

    fn refresh_visibility(&mut self) {
        if !self.shown {
            return;
        }
        self.clear_button_visible = self.prefs.clear_button.is_positional() && self.has_tasks;
        self.resource_bar_visible = self.prefs.resource_bar.is_positional();
        let merged = self.prefs.clear_button == crate::layout::AnchorGravity::Merged;
        self.set_navigation_clear_all(merged && self.has_tasks);
    }

    fn set_navigation_clear_all(&mut self, enabled: bool) {
        if self.navigation_clear_all == enabled {
            return;
        }
        self.navigation_clear_all = enabled;
        self.surface
            .emit(SurfaceOutput::NavigationClearAll { enabled });
    }

    /// Recompute placements and publish the ones that changed.
    fn relayout(&mut self, force: bool) {
        let inputs = LayoutInputs {
            clear_button: self.prefs.clear_button,
            resource_bar: self.prefs.resource_bar,
            orientation: self.prefs.orientation,
            handedness: self.prefs.handedness,
            clear_button_visible: self.clear_button_visible,
            resource_bar_visible: self.resource_bar_visible,
            phone_ui: self.prefs.phone_ui,
            density: self.prefs.density,
            metrics: self.prefs.layout_metrics(),
        };
        let layout = compute_layout(&inputs);
        let previous = if force { None } else { self.last_layout };
        if previous != Some(layout) {
            log_debug(Component::Layout, &format!("placements {layout:?}"));
        }
        if previous.map(|p| p.clear_button) != Some(layout.clear_button) {
            self.surface.emit(SurfaceOutput::Overlay {
                element: OverlayElement::ClearButton,
                placement: layout.clear_button,
            });
        }
        if previous.map(|p| p.resource_bar) != Some(layout.resource_bar) {
            self.surface.emit(SurfaceOutput::Overlay {
                element: OverlayElement::ResourceBar,
                placement: layout.resource_bar,
            });
        }
        self.last_layout = Some(layout);
    }

    fn sample_resources(&mut self) {
        if !self.shown || !self.resource_bar_visible {
            return;
        }
        match self.monitor.sample() {
            Ok(sample) => self.surface.emit(SurfaceOutput::resource_usage(&sample)),
            Err(err) => {
                log_warn(Component::Memory, &format!("sample failed: {err:#}"));
            }
        }
    }

    fn dismiss_all(&mut self) {
        let report = dismiss_all(self.tasks.as_mut());
        for view in report.dismissed {
            self.surface.emit(SurfaceOutput::DismissTask {
                stack: view.stack,
                task: view.task,
            });
        }
        self.sample_resources();
    }

    fn recording(&mut self, event: RecordingEvent, now: Instant) {
        let before = self.recorder.state();
        let mut ports = RecordingPorts {
            backend: self.backend.as_mut(),
            player: self.player.as_mut(),
            files: self.files.as_ref(),
        };
        let error = self.recorder.handle(event, &mut ports, now);
        if let Some(err) = error {
            self.report(err);
        }
        let after = self.recorder.state();
        if after != before {
            QuickRecordTile::new(after).refresh(self.surface.as_mut());
        }
    }

    fn sync_charge_preferences(&mut self, now: Instant) {
        let surface = self.surface.as_mut();
        if self.charge.style() != self.prefs.charging_style {
            self.charge
                .set_style(self.prefs.charging_style, now, surface);
        }
        if self.charge.charge_color() != self.prefs.charging_color {
            self.charge
                .set_charge_color(self.prefs.charging_color, now, surface);
        }
        self.charge
            .set_percent_sign(&self.prefs.percent_sign, now, surface);
    }

    fn report(&mut self, err: CoreError) {
        log_warn(err.component(), &format!("{}: {err}", err.kind()));
        self.surface.emit(SurfaceOutput::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    /// Cancel timers, stop the pulse and release the player. Later events are ignored.
    fn teardown(&mut self) {
        let mut ports = RecordingPorts {
            backend: self.backend.as_mut(),
            player: self.player.as_mut(),
            files: self.files.as_ref(),
        };
        self.recorder.teardown(&mut ports);
        self.charge.teardown(self.surface.as_mut());
        self.set_navigation_clear_all(false);
        self.shown = false;
        self.last_layout = None;
        self.destroyed = true;
        log_debug(Component::Runtime, "overlay context destroyed");
    }
}

fn click(overlay: &dyn Clickable, long: bool) -> Option<CoreEvent> {
    if long {
        overlay.on_long_click()
    } else {
        overlay.on_click()
    }
}
