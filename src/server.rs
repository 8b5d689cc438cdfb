use crate::overlay::Overlay;
use crate::preferences::Preferences;
use crate::types::{EditorEvent, OverlayOutput};
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

/// Run the stdio protocol until the host closes stdin.
///
/// A reader thread forwards stdin lines over a channel; this loop
/// blocks on the channel with a timeout derived from the overlay's
/// debounce deadline, so a pending repaint fires on time even while no
/// events arrive. On EOF any unfired repaint is discarded.
pub fn run(prefs: &Preferences) -> Result<()> {
    let catalog = prefs.catalog()?;
    let mut overlay = Overlay::new(
        prefs.percentage,
        catalog,
        Duration::from_millis(prefs.debounce_ms),
    );
    log::info!(
        "serving editor protocol on stdin (gate {}%, debounce {}ms)",
        prefs.percentage,
        prefs.debounce_ms
    );

    let lines = spawn_reader();
    let mut out = io::stdout().lock();

    loop {
        let now = Instant::now();
        if let Some(output) = overlay.fire_due(now) {
            emit(&mut out, &output)?;
        }

        let received = match overlay.until_deadline(Instant::now()) {
            Some(wait) => match lines.recv_timeout(wait) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match lines.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };
        // A timeout just means the deadline is due; loop around to fire it.
        let Some(line) = received else { continue };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: EditorEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                log::warn!("skipping malformed input line: {err}");
                continue;
            }
        };
        log::debug!("event: {event:?}");
        for output in overlay.handle(event, Instant::now()) {
            emit(&mut out, &output)?;
        }
    }

    log::info!("stdin closed, shutting down");
    Ok(())
}

/// Forward stdin lines over a channel. Dropping the sender on EOF or a
/// read error closes the channel and ends the main loop.
fn spawn_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::warn!("stdin read error: {err}");
                    break;
                }
            }
        }
    });
    rx
}

fn emit(out: &mut impl Write, output: &OverlayOutput) -> Result<()> {
    let json = serde_json::to_string(output).context("serializing output")?;
    writeln!(out, "{json}").context("writing output")?;
    out.flush().context("flushing output")
}
