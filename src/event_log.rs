//! Structured, line-oriented event log consumed by offline visualization.
//!
//! Each record is one line: `<timestamp>| NODE <id>: <command> <args>`. Log
//! I/O failures are non-fatal: emission may be silently suppressed without
//! affecting protocol state, per the error handling design.
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

/// One of the four event commands a node can emit.
#[derive(Debug, Clone)]
pub enum Event {
    CreateBlock { block_id: u64, parents: Vec<u64> },
    ReceiveBlock { block_id: u64, parents: Vec<u64> },
    AcceptBlock { block_id: u64 },
    CreateConflict { block_a: u64, block_b: u64 },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::CreateBlock { block_id, parents } => {
                write!(f, "Create-Block {} {}", block_id, format_parents(parents))
            }
            Event::ReceiveBlock { block_id, parents } => {
                write!(f, "Receive-Block {} {}", block_id, format_parents(parents))
            }
            Event::AcceptBlock { block_id } => write!(f, "Accept-Block {}", block_id),
            Event::CreateConflict { block_a, block_b } => {
                write!(f, "Create-Conflict {} {}", block_a, block_b)
            }
        }
    }
}

fn format_parents(parents: &[u64]) -> String {
    let inner = parents.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ");
    format!("[{}]", inner)
}

/// An append-only sink for a single simulation run. Construction picks a
/// fresh numeric suffix within a shared directory using an
/// exponential-then-binary-search probe, so independent sweep processes do
/// not clobber each other's log files (rare collisions are acceptable, per
/// the resource model).
pub struct EventLog {
    file: Option<File>,
}

impl EventLog {
    /// Opens (or silently fails to open) a log file under `dir` with the
    /// given filename `prefix`. On any I/O error, logging is disabled for
    /// the rest of the run rather than aborting the simulation.
    pub fn open(dir: impl AsRef<Path>, prefix: &str) -> Self {
        let dir = dir.as_ref();
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("could not create log directory {:?}: {}", dir, e);
            return EventLog { file: None };
        }
        let id = find_free_id(dir, prefix);
        let path = dir.join(format!("{}-{}.log", prefix, id));
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                debug!("opened event log at {:?}", path);
                EventLog { file: Some(file) }
            }
            Err(e) => {
                warn!("failed to open event log {:?}: {}", path, e);
                EventLog { file: None }
            }
        }
    }

    /// A log sink that discards everything, used by tests and by callers
    /// that only care about in-memory protocol state.
    pub fn discard() -> Self {
        EventLog { file: None }
    }

    pub fn record(&mut self, node_id: usize, event: Event) {
        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return,
        };
        let ts = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_micros()).unwrap_or(0);
        let line = format!("{}| NODE {}: {}\n", ts, node_id, event);
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("event log write failed, suppressing further writes: {}", e);
            self.file = None;
        }
    }
}

/// Doubles `hi` while `<prefix>-<hi>.log` exists, then binary-searches the
/// boundary between existing and free ids — matching the exponential /
/// binary-search probe the original tool used to avoid collisions between
/// concurrently running sweep processes.
fn find_free_id(dir: &Path, prefix: &str) -> u64 {
    let exists = |n: u64| -> bool { path_for(dir, prefix, n).exists() };

    let mut lo = 0u64;
    let mut hi = 1u64;
    while exists(hi) {
        hi *= 2;
    }
    while lo + 1 < hi {
        let mid = (lo + hi) >> 1;
        if exists(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

fn path_for(dir: &Path, prefix: &str, n: u64) -> PathBuf {
    dir.join(format!("{}-{}.log", prefix, n))
}
