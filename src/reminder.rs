//! Due-time reminder scheduling.
//!
//! `ReminderScheduler` is the pure polling core: each `tick` scans incomplete
//! active tasks and classifies them as overdue (due time already passed) or
//! upcoming (due within the configured threshold). Each task is reported at
//! most once per population. The scheduler never forgets on its own; the
//! edit, complete, delete and archive paths call `invalidate` so a changed
//! task becomes eligible again under its new data.
//!
//! `spawn` wraps the core in a background thread with its own store handle on
//! the same database file, delivering batches over an mpsc channel.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fields::Status;
use crate::store::TaskStore;
use crate::task::Task;

/// A non-empty batch of tasks that just crossed a reminder boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderEvent {
    Overdue(Vec<Task>),
    Upcoming(Vec<Task>),
}

/// Polling core. Holds the already-notified id sets; no timing of its own.
#[derive(Debug)]
pub struct ReminderScheduler {
    notified_overdue: HashSet<i64>,
    notified_upcoming: HashSet<i64>,
    upcoming_threshold: Duration,
}

impl ReminderScheduler {
    pub fn new(upcoming_threshold_mins: i64) -> Self {
        ReminderScheduler {
            notified_overdue: HashSet::new(),
            notified_upcoming: HashSet::new(),
            upcoming_threshold: Duration::minutes(upcoming_threshold_mins),
        }
    }

    /// Scan for newly overdue and newly upcoming tasks.
    ///
    /// Returns at most two events, each carrying only tasks not yet reported
    /// for that population. The notified sets are append-only here; they
    /// shrink only through `invalidate` and `reset`, so a narrower threshold
    /// never un-notifies an already-reported task.
    pub fn tick(&mut self, store: &TaskStore, now: NaiveDateTime) -> Result<Vec<ReminderEvent>> {
        let mut new_overdue = Vec::new();
        for task in store.overdue_incomplete(now)? {
            let Some(id) = task.id else { continue };
            if self.notified_overdue.insert(id) {
                new_overdue.push(task);
            }
        }

        // Upcoming means due at or after now, within the threshold. Disjoint
        // from overdue by construction.
        let mut new_upcoming = Vec::new();
        for task in store.all_active()? {
            if task.status != Status::Incomplete || task.due_time < now {
                continue;
            }
            let Some(id) = task.id else { continue };
            if task.due_time - now <= self.upcoming_threshold && self.notified_upcoming.insert(id) {
                new_upcoming.push(task);
            }
        }

        let mut events = Vec::new();
        if !new_overdue.is_empty() {
            events.push(ReminderEvent::Overdue(new_overdue));
        }
        if !new_upcoming.is_empty() {
            events.push(ReminderEvent::Upcoming(new_upcoming));
        }
        Ok(events)
    }

    /// Drop one task from both notified sets, making it eligible again.
    pub fn invalidate(&mut self, id: i64) {
        self.notified_overdue.remove(&id);
        self.notified_upcoming.remove(&id);
    }

    /// Clear all notified state.
    pub fn reset(&mut self) {
        self.notified_overdue.clear();
        self.notified_upcoming.clear();
    }

    pub fn set_upcoming_threshold(&mut self, mins: i64) {
        self.upcoming_threshold = Duration::minutes(mins);
    }
}

/// Control messages for the background worker.
enum Control {
    Invalidate(i64),
    SetThreshold(i64),
    SetInterval(u64),
    Stop,
}

/// Handle to a running reminder worker. Dropping it stops the thread.
pub struct ReminderHandle {
    control: Sender<Control>,
    thread: Option<JoinHandle<()>>,
}

impl ReminderHandle {
    pub fn invalidate(&self, id: i64) {
        let _ = self.control.send(Control::Invalidate(id));
    }

    pub fn set_upcoming_threshold(&self, mins: i64) {
        let _ = self.control.send(Control::SetThreshold(mins));
    }

    pub fn set_check_interval(&self, secs: u64) {
        let _ = self.control.send(Control::SetInterval(secs));
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.control.send(Control::Stop);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start a reminder worker polling `db_path` on its own connection.
///
/// The first scan runs immediately; later scans run every check interval.
/// Events are delivered over `events`; a closed receiver stops the worker.
pub fn spawn(db_path: PathBuf, config: &Config, events: Sender<ReminderEvent>) -> ReminderHandle {
    let (control_tx, control_rx) = mpsc::channel();
    let interval = config.check_interval_secs;
    let threshold = config.upcoming_threshold_mins;

    let thread = thread::Builder::new()
        .name("reminder".into())
        .spawn(move || worker_loop(db_path, interval, threshold, control_rx, events))
        .expect("spawn reminder thread");

    ReminderHandle { control: control_tx, thread: Some(thread) }
}

fn worker_loop(
    db_path: PathBuf,
    mut interval_secs: u64,
    threshold_mins: i64,
    control: Receiver<Control>,
    events: Sender<ReminderEvent>,
) {
    let store = match TaskStore::open(&db_path) {
        Ok(s) => s,
        Err(err) => {
            warn!(%err, path = %db_path.display(), "reminder worker could not open store");
            return;
        }
    };
    let mut scheduler = ReminderScheduler::new(threshold_mins);

    loop {
        let now = Local::now().naive_local();
        match scheduler.tick(&store, now) {
            Ok(batch) => {
                for event in batch {
                    if events.send(event).is_err() {
                        debug!("reminder receiver dropped, stopping worker");
                        return;
                    }
                }
            }
            Err(err) => warn!(%err, "reminder scan failed"),
        }

        // Sleep on the control channel so commands interrupt the wait.
        let deadline = std::time::Instant::now() + StdDuration::from_secs(interval_secs);
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            match control.recv_timeout(remaining) {
                Ok(Control::Invalidate(id)) => scheduler.invalidate(id),
                Ok(Control::SetThreshold(mins)) => scheduler.set_upcoming_threshold(mins),
                Ok(Control::SetInterval(secs)) => interval_secs = secs.max(1),
                Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => break,
            }
        }
    }
}
