use crossbeam_channel::Receiver;
use std::io::{self, Write};
use std::thread;
use surface_augment::host::SurfaceOutput;
use surface_augment::{log_warn, Component};

/// Serialize every output request as one JSON line on stdout. Ends once all
/// senders are dropped.
pub(crate) fn spawn_writer_thread(rx: Receiver<SurfaceOutput>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for output in rx {
            let line = match serde_json::to_string(&output) {
                Ok(line) => line,
                Err(err) => {
                    log_warn(Component::Replay, &format!("output encode failed: {err}"));
                    continue;
                }
            };
            if writeln!(out, "{line}").and_then(|()| out.flush()).is_err() {
                break;
            }
        }
    })
}
