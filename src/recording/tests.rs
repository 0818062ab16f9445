use super::*;
use crate::runtime::CoreEvent;
use anyhow::anyhow;
use crossbeam_channel::{unbounded, Receiver};
use std::collections::HashSet;

#[derive(Default)]
struct FakeBackend {
    starts: Vec<RecordingQuality>,
    stops: usize,
    fail_start: bool,
}

impl RecordingBackend for FakeBackend {
    fn start_recording(&mut self, quality: RecordingQuality) -> anyhow::Result<()> {
        if self.fail_start {
            return Err(anyhow!("service unavailable"));
        }
        self.starts.push(quality);
        Ok(())
    }

    fn stop_recording(&mut self) -> anyhow::Result<()> {
        self.stops += 1;
        Ok(())
    }
}

#[derive(Default)]
struct FakePlayer {
    started: Vec<PathBuf>,
    releases: usize,
    fail_open: bool,
    notifier: Option<CompletionNotifier>,
}

impl MediaPlayer for FakePlayer {
    fn start(&mut self, path: &Path, on_complete: CompletionNotifier) -> anyhow::Result<()> {
        if self.fail_open {
            return Err(anyhow!("corrupt header"));
        }
        self.started.push(path.to_path_buf());
        self.notifier = Some(on_complete);
        Ok(())
    }

    fn release(&mut self) {
        self.releases += 1;
        self.notifier = None;
    }
}

#[derive(Default)]
struct FakeFiles {
    present: HashSet<PathBuf>,
}

impl FileProbe for FakeFiles {
    fn exists(&self, path: &Path) -> bool {
        self.present.contains(path)
    }
}

const REC: &str = "/rec.3gp";

struct Harness {
    controller: RecordingController,
    backend: FakeBackend,
    player: FakePlayer,
    files: FakeFiles,
    rx: Receiver<CoreEvent>,
    now: Instant,
}

impl Harness {
    fn new(auto_stop_hours: u64) -> Self {
        let (tx, rx) = unbounded();
        Self {
            controller: RecordingController::new(
                RecordingQuality::Medium,
                Duration::from_millis(auto_stop_hours * MILLIS_PER_HOUR),
                tx,
            ),
            backend: FakeBackend::default(),
            player: FakePlayer::default(),
            files: FakeFiles::default(),
            rx,
            now: Instant::now(),
        }
    }

    fn send(&mut self, event: RecordingEvent) -> Option<CoreError> {
        let mut ports = RecordingPorts {
            backend: &mut self.backend,
            player: &mut self.player,
            files: &self.files,
        };
        self.controller.handle(event, &mut ports, self.now)
    }

    fn status(&mut self, status: RecordingStatus) -> Option<CoreError> {
        self.send(RecordingEvent::Status(status))
    }

    fn started(&mut self, path: &str) {
        self.files.present.insert(PathBuf::from(path));
        self.status(RecordingStatus::Started {
            filename: Some(PathBuf::from(path)),
        });
    }

    fn state(&self) -> RecordingState {
        self.controller.state()
    }

    /// Drive a fresh harness into `target` through legal events only.
    fn in_state(target: RecordingState) -> Self {
        let mut h = Self::new(1);
        match target {
            RecordingState::Idle => {}
            RecordingState::Recording => {
                h.send(RecordingEvent::LongPress);
                h.started(REC);
            }
            RecordingState::JustRecorded => {
                h.started(REC);
                h.status(RecordingStatus::Stopped);
            }
            RecordingState::NoRecording => {
                h.send(RecordingEvent::ShortPress);
            }
            RecordingState::Playing => {
                h.started(REC);
                h.status(RecordingStatus::Stopped);
                h.send(RecordingEvent::ShortPress);
            }
        }
        assert_eq!(h.state(), target);
        h
    }
}

const ALL_STATES: [RecordingState; 5] = [
    RecordingState::Idle,
    RecordingState::Recording,
    RecordingState::JustRecorded,
    RecordingState::NoRecording,
    RecordingState::Playing,
];

fn all_events(h: &Harness) -> Vec<RecordingEvent> {
    vec![
        RecordingEvent::ShortPress,
        RecordingEvent::LongPress,
        RecordingEvent::Status(RecordingStatus::Idle),
        RecordingEvent::Status(RecordingStatus::Started {
            filename: Some(PathBuf::from(REC)),
        }),
        RecordingEvent::Status(RecordingStatus::Stopped),
        RecordingEvent::Status(RecordingStatus::Error {
            message: Some("boom".to_string()),
        }),
        RecordingEvent::AutoStopFired {
            generation: h.controller.auto_stop_timer().generation().unwrap_or(0),
        },
        RecordingEvent::PlaybackCompleted {
            playback: h.controller.active_playback(),
        },
    ]
}

#[test]
fn starts_idle() {
    let h = Harness::new(1);
    assert_eq!(h.state(), RecordingState::Idle);
    assert!(h.controller.file_path().is_none());
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn short_press_without_recording_reports_no_recording() {
    let mut h = Harness::new(1);
    assert!(h.send(RecordingEvent::ShortPress).is_none());
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert!(h.player.started.is_empty());
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.state(), RecordingState::NoRecording);
}

#[test]
fn long_press_schedules_auto_stop_and_started_reschedules_it() {
    let mut h = Harness::new(1);
    h.send(RecordingEvent::LongPress);
    assert_eq!(h.state(), RecordingState::Recording);
    assert_eq!(h.backend.starts, vec![RecordingQuality::Medium]);
    let timer = h.controller.auto_stop_timer();
    assert_eq!(timer.delay(), Some(Duration::from_millis(3_600_000)));
    let first_generation = timer.generation();

    h.started(REC);
    assert_eq!(h.controller.file_path(), Some(Path::new(REC)));
    let timer = h.controller.auto_stop_timer();
    assert_eq!(timer.delay(), Some(Duration::from_millis(3_600_000)));
    assert_ne!(timer.generation(), first_generation);
    assert_eq!(timer.scheduled_total(), 2);
    assert!(h.controller.started_at().is_some());
}

#[test]
fn zero_auto_stop_delay_never_arms_the_timer() {
    let mut h = Harness::new(0);
    h.send(RecordingEvent::LongPress);
    h.started(REC);
    assert_eq!(h.state(), RecordingState::Recording);
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn presses_while_recording() {
    let mut h = Harness::in_state(RecordingState::Recording);
    h.send(RecordingEvent::LongPress);
    assert_eq!(h.backend.starts.len(), 1);
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.backend.stops, 1);
    assert_eq!(h.state(), RecordingState::Recording);
}

#[test]
fn short_press_while_recording_with_deleted_file_drops_to_no_recording() {
    let mut h = Harness::in_state(RecordingState::Recording);
    h.files.present.clear();
    assert!(h.send(RecordingEvent::ShortPress).is_none());
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert_eq!(h.backend.stops, 0);
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn short_press_while_recording_without_file_drops_to_no_recording() {
    let mut h = Harness::new(1);
    h.send(RecordingEvent::LongPress);
    assert_eq!(h.state(), RecordingState::Recording);
    assert!(h.controller.file_path().is_none());
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert_eq!(h.backend.stops, 0);
}

#[test]
fn long_press_while_recording_with_deleted_file_starts_again() {
    let mut h = Harness::in_state(RecordingState::Recording);
    h.files.present.clear();
    h.send(RecordingEvent::LongPress);
    assert_eq!(h.state(), RecordingState::Recording);
    assert_eq!(h.backend.starts.len(), 2);
}

#[test]
fn stopped_twice_is_idempotent() {
    let mut h = Harness::in_state(RecordingState::Recording);
    let scheduled = h.controller.auto_stop_timer().scheduled_total();
    let cancelled = h.controller.auto_stop_timer().cancelled_total();
    h.status(RecordingStatus::Stopped);
    h.status(RecordingStatus::Stopped);
    assert_eq!(h.state(), RecordingState::JustRecorded);
    let timer = h.controller.auto_stop_timer();
    assert!(!timer.is_armed());
    assert_eq!(timer.cancelled_total(), cancelled + 1);
    assert_eq!(timer.scheduled_total(), scheduled);
}

#[test]
fn playback_round_trip_through_completion_notifier() {
    let mut h = Harness::in_state(RecordingState::JustRecorded);
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.state(), RecordingState::Playing);
    assert_eq!(h.player.started, vec![PathBuf::from(REC)]);

    h.player.notifier.as_ref().expect("notifier").notify();
    let event = h.rx.try_recv().expect("completion queued");
    let CoreEvent::PlaybackCompleted { playback } = event else {
        panic!("unexpected event {event:?}");
    };
    h.send(RecordingEvent::PlaybackCompleted { playback });
    assert_eq!(h.state(), RecordingState::Idle);
    assert_eq!(h.player.releases, 1);
}

#[test]
fn short_press_while_playing_stops_playback() {
    let mut h = Harness::in_state(RecordingState::Playing);
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.state(), RecordingState::Idle);
    assert_eq!(h.player.releases, 1);
    assert!(h.controller.active_playback().is_none());
}

#[test]
fn stale_completion_is_ignored() {
    let mut h = Harness::in_state(RecordingState::Playing);
    let current = h.controller.active_playback().expect("playing");
    h.send(RecordingEvent::PlaybackCompleted {
        playback: Some(current + 7),
    });
    assert_eq!(h.state(), RecordingState::Playing);
}

#[test]
fn playback_open_failure_leaves_state_unchanged() {
    let mut h = Harness::in_state(RecordingState::JustRecorded);
    h.player.fail_open = true;
    let err = h.send(RecordingEvent::ShortPress).expect("open error");
    assert_eq!(err.kind(), "PlaybackOpenError");
    assert_eq!(h.state(), RecordingState::JustRecorded);
    assert!(h.controller.active_playback().is_none());
}

#[test]
fn backend_error_moves_to_no_recording() {
    let mut h = Harness::in_state(RecordingState::Recording);
    let err = h
        .status(RecordingStatus::Error {
            message: Some("mic busy".to_string()),
        })
        .expect("backend error");
    assert_eq!(
        err,
        CoreError::RecordingBackend {
            message: "mic busy".to_string()
        }
    );
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn idle_status_cancels_auto_stop() {
    let mut h = Harness::in_state(RecordingState::Recording);
    h.status(RecordingStatus::Idle);
    assert_eq!(h.state(), RecordingState::Idle);
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn failed_start_request_keeps_state() {
    let mut h = Harness::new(1);
    h.backend.fail_start = true;
    let err = h.send(RecordingEvent::LongPress).expect("dispatch error");
    assert_eq!(err.kind(), "RecordingBackendError");
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn auto_stop_fire_requests_stop_once() {
    let mut h = Harness::in_state(RecordingState::Recording);
    let generation = h
        .controller
        .auto_stop_timer()
        .generation()
        .expect("armed");
    h.send(RecordingEvent::AutoStopFired { generation });
    assert_eq!(h.backend.stops, 1);
    assert_eq!(h.state(), RecordingState::Recording);
    h.send(RecordingEvent::AutoStopFired { generation });
    assert_eq!(h.backend.stops, 1);
}

#[test]
fn auto_stop_fire_outside_recording_is_a_no_op() {
    for state in ALL_STATES {
        if state == RecordingState::Recording {
            continue;
        }
        let mut h = Harness::in_state(state);
        h.send(RecordingEvent::AutoStopFired { generation: 1 });
        assert_eq!(h.state(), state);
        assert_eq!(h.backend.stops, 0);
    }
}

#[test]
fn stale_auto_stop_generation_is_ignored() {
    let mut h = Harness::new(1);
    h.send(RecordingEvent::LongPress);
    let stale = h.controller.auto_stop_timer().generation().expect("armed");
    h.started(REC);
    h.send(RecordingEvent::AutoStopFired { generation: stale });
    assert_eq!(h.backend.stops, 0);
    assert!(h.controller.auto_stop_timer().is_armed());
}

#[test]
fn deleted_recording_is_detected_on_press() {
    let mut h = Harness::in_state(RecordingState::JustRecorded);
    h.files.present.clear();
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert!(h.player.started.is_empty());

    h.send(RecordingEvent::LongPress);
    assert_eq!(h.state(), RecordingState::Recording);
}

#[test]
fn deleted_recording_while_playing_releases_player() {
    let mut h = Harness::in_state(RecordingState::Playing);
    h.files.present.clear();
    h.send(RecordingEvent::ShortPress);
    assert_eq!(h.state(), RecordingState::NoRecording);
    assert_eq!(h.player.releases, 1);
}

#[test]
fn started_while_playing_keeps_recording_and_playback_exclusive() {
    let mut h = Harness::in_state(RecordingState::Playing);
    h.started("/rec2.3gp");
    assert_eq!(h.state(), RecordingState::Recording);
    assert_eq!(h.player.releases, 1);
    assert!(h.controller.active_playback().is_none());
}

#[test]
fn long_press_while_playing_is_ignored() {
    let mut h = Harness::in_state(RecordingState::Playing);
    h.send(RecordingEvent::LongPress);
    assert_eq!(h.state(), RecordingState::Playing);
    assert!(h.backend.starts.is_empty());
}

#[test]
fn every_state_event_pair_is_defined() {
    for state in ALL_STATES {
        let seeded = Harness::in_state(state);
        for index in 0..all_events(&seeded).len() {
            let mut h = Harness::in_state(state);
            let event = all_events(&h).swap_remove(index);
            h.send(event);
            assert!(ALL_STATES.contains(&h.state()));
            if h.state() != RecordingState::Playing {
                assert!(h.controller.active_playback().is_none());
            }
            if h.state() != RecordingState::Recording {
                assert!(!h.controller.auto_stop_timer().is_armed());
            }
        }
    }
}

#[test]
fn teardown_releases_everything() {
    let mut h = Harness::in_state(RecordingState::Playing);
    let mut ports = RecordingPorts {
        backend: &mut h.backend,
        player: &mut h.player,
        files: &h.files,
    };
    h.controller.teardown(&mut ports);
    assert_eq!(h.player.releases, 1);
    assert!(!h.controller.auto_stop_timer().is_armed());
}

#[test]
fn labels_cover_every_state() {
    let labels: HashSet<_> = ALL_STATES.iter().map(|s| s.label()).collect();
    assert_eq!(labels.len(), ALL_STATES.len());
}
