use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use serde::Deserialize;
use std::io::BufRead;
use std::thread;
use std::time::Duration;
use surface_augment::{log_warn, Component, CoreEvent};

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Pacing {
    Wait { ms: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptLine {
    Pacing(Pacing),
    Event(CoreEvent),
}

#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    Wait(Duration),
    Send(CoreEvent),
    Skip,
}

pub(crate) fn parse_line(line: &str) -> Result<Step> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Step::Skip);
    }
    let parsed: ScriptLine =
        serde_json::from_str(trimmed).with_context(|| format!("invalid script line: {trimmed}"))?;
    Ok(match parsed {
        ScriptLine::Pacing(Pacing::Wait { ms }) => Step::Wait(Duration::from_millis(ms)),
        ScriptLine::Event(event) => Step::Send(event),
    })
}

/// Feed script events to the control thread. A `destroyed` event is always
/// delivered last, whether the script names it or simply ends.
pub(crate) fn spawn_script_thread<R>(reader: R, tx: Sender<CoreEvent>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for (index, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log_warn(Component::Replay, &format!("script read failed: {err}"));
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Step::Skip) => {}
                Ok(Step::Wait(delay)) => thread::sleep(delay),
                Ok(Step::Send(event)) => {
                    let last = event == CoreEvent::Destroyed;
                    if tx.send(event).is_err() || last {
                        return;
                    }
                }
                Err(err) => {
                    eprintln!("line {}: {err:#}", index + 1);
                    log_warn(Component::Replay, &format!("line {}: {err:#}", index + 1));
                }
            }
        }
        let _ = tx.send(CoreEvent::Destroyed);
    })
}
