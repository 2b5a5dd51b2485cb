//! Deferred work scheduled by commands.
//!
//! Dispatch is synchronous. A command that wants to produce output later
//! (after a delay, say) defers a task here and returns immediately; the host
//! drives the queue with [`TaskQueue::run_due`] from its frame or event loop.
//! The queue never blocks and never spawns threads.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use quay_types::sink::MessageSink;
use quay_types::status::{Failure, Outcome, ResultStatus};

/// Work run once its due time has passed.
pub type Task = Box<dyn FnOnce(&mut dyn MessageSink)>;

/// Handle to a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

struct Pending {
    id: TaskId,
    due: Instant,
    label: String,
    task: Task,
}

/// Queue of deferred tasks, ordered by due time then by scheduling order.
#[derive(Default)]
pub struct TaskQueue {
    next_id: u64,
    pending: Vec<Pending>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay` from now.
    pub fn defer<F>(&mut self, label: &str, delay: Duration, task: F) -> TaskId
    where
        F: FnOnce(&mut dyn MessageSink) + 'static,
    {
        self.defer_at(label, Instant::now() + delay, task)
    }

    /// Schedule `task` to run once `due` has passed.
    pub fn defer_at<F>(&mut self, label: &str, due: Instant, task: F) -> TaskId
    where
        F: FnOnce(&mut dyn MessageSink) + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        log::debug!("Deferred task {id:?} ({label})");
        self.pending.push(Pending {
            id,
            due,
            label: label.to_string(),
            task: Box::new(task),
        });
        id
    }

    /// Drop a pending task. Fails with `ValueDoesNotExist` if it already ran
    /// or was never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> Outcome<()> {
        match self.pending.iter().position(|p| p.id == id) {
            Some(i) => {
                let p = self.pending.remove(i);
                log::debug!("Canceled task {id:?} ({})", p.label);
                Ok(())
            },
            None => Err(Failure::new(ResultStatus::ValueDoesNotExist)),
        }
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Labels of waiting tasks, in scheduling order.
    pub fn labels(&self) -> Vec<&str> {
        self.pending.iter().map(|p| p.label.as_str()).collect()
    }

    /// Most recently scheduled task still waiting.
    pub fn last_id(&self) -> Option<TaskId> {
        self.pending.iter().map(|p| p.id).max()
    }

    /// Earliest due time, for hosts that want to sleep until then.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Run every task due at `now`, earliest first. A panicking task is
    /// reported as an exception and does not stop the others. Returns the
    /// number of tasks run.
    pub fn run_due(&mut self, now: Instant, sink: &mut dyn MessageSink) -> usize {
        let (mut due, waiting): (Vec<Pending>, Vec<Pending>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| p.due <= now);
        self.pending = waiting;
        due.sort_by_key(|p| (p.due, p.id));

        let n = due.len();
        for p in due {
            let label = p.label;
            let task = p.task;
            if catch_unwind(AssertUnwindSafe(|| task(&mut *sink))).is_err() {
                log::warn!("Deferred task '{label}' panicked");
                sink.add_exception(&format!("deferred task '{label}' panicked"));
            }
        }
        n
    }
}
