//! Periodic task scheduler.
//!
//! A cooperative, non-preemptive timer table polled once per control-loop
//! iteration.  Each task fires once after its initial delay and then every
//! period.  When a task comes due the scheduler notifies a
//! [`SchedulerDelegate`]; what a firing *means* (sample sensors, publish)
//! lives entirely on the delegate side.
//!
//! ```text
//!   main loop ──▶ Scheduler::tick(now_ms) ──▶ SchedulerDelegate::on_task_fired
//!                    │
//!                    └─ tasks kept sorted by next-fire time; the due ones
//!                       are a prefix of the table
//! ```
//!
//! ## Timing policy
//!
//! Next-fire is advanced from the *nominal* fire time, not from the tick
//! that observed it, so late ticks do not accumulate drift.  A task fires
//! at most once per tick: if a tick arrives more than a full period late,
//! the missed slots are coalesced and next-fire jumps to the first nominal
//! slot strictly after `now`.

use crate::app::ports::SchedulerDelegate;
use crate::error::ScheduleError;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// Maximum number of periodic tasks per scheduler (stack-allocated).
pub const MAX_TASKS: usize = 8;

/// Opaque handle returned by [`Scheduler::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u8);

/// A periodic task entry.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    id: TaskId,
    /// Human-readable label (e.g., "telemetry").
    label: &'static str,
    initial_delay_ms: u64,
    period_ms: u64,
    /// Nominal time of the next firing.
    next_fire_ms: u64,
    fire_count: u64,
}

impl ScheduledTask {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn initial_delay_ms(&self) -> u64 {
        self.initial_delay_ms
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn next_fire_ms(&self) -> u64 {
        self.next_fire_ms
    }

    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    /// Advance past a firing observed at `now_ms`.
    fn reschedule(&mut self, now_ms: u64) {
        self.fire_count += 1;
        self.next_fire_ms = self.next_fire_ms.saturating_add(self.period_ms);
        if self.next_fire_ms <= now_ms {
            let missed = (now_ms - self.next_fire_ms) / self.period_ms + 1;
            debug!(
                "Scheduler: '{}' ran {}ms late, coalescing {} slot(s)",
                self.label,
                now_ms - self.next_fire_ms.saturating_sub(self.period_ms),
                missed
            );
            self.next_fire_ms = self
                .next_fire_ms
                .saturating_add(missed.saturating_mul(self.period_ms));
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// The scheduler engine.
///
/// Owns its task table outright; tasks live for the lifetime of the
/// scheduler and cannot be cancelled.  Independent schedulers may share a
/// tick source; they are ordered only by which one the caller ticks first.
pub struct Scheduler {
    /// Sorted by `(next_fire_ms, id)`.
    tasks: heapless::Vec<ScheduledTask, MAX_TASKS>,
    next_id: u8,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: heapless::Vec::new(),
            next_id: 0,
        }
    }

    /// Register a task created at `now_ms`.
    ///
    /// The task first fires on the first tick at or after
    /// `now_ms + initial_delay_ms`, then every `period_ms`.
    pub fn add(
        &mut self,
        label: &'static str,
        initial_delay_ms: u64,
        period_ms: u64,
        now_ms: u64,
    ) -> Result<TaskId, ScheduleError> {
        if period_ms == 0 {
            return Err(ScheduleError::ZeroPeriod);
        }
        let id = TaskId(self.next_id);
        self.tasks
            .push(ScheduledTask {
                id,
                label,
                initial_delay_ms,
                period_ms,
                next_fire_ms: now_ms.saturating_add(initial_delay_ms),
                fire_count: 0,
            })
            .map_err(|_| ScheduleError::Full)?;
        self.next_id += 1;
        self.sort();
        info!(
            "Scheduler: added '{}' (first in {}ms, every {}ms)",
            label, initial_delay_ms, period_ms
        );
        Ok(id)
    }

    /// Tick the scheduler.  Call once per control-loop iteration.
    ///
    /// Every task due at `now_ms` fires exactly once, in order of nominal
    /// fire time (ties broken by registration order).  Each callback runs to
    /// completion before the next; a slow one delays the rest.
    ///
    /// Returns the number of tasks fired.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) -> usize {
        let due = self
            .tasks
            .iter()
            .take_while(|t| t.next_fire_ms <= now_ms)
            .count();
        if due == 0 {
            return 0;
        }

        for task in self.tasks.iter_mut().take(due) {
            debug!(
                "Scheduler: '{}' fired at {}ms (#{})",
                task.label,
                now_ms,
                task.fire_count + 1
            );
            delegate.on_task_fired(task.id, task.label);
            task.reschedule(now_ms);
        }
        self.sort();
        due
    }

    /// Milliseconds until the earliest task is due (0 if overdue), or
    /// `None` with no tasks.
    pub fn time_until_next(&self, now_ms: u64) -> Option<u64> {
        self.tasks
            .first()
            .map(|t| t.next_fire_ms.saturating_sub(now_ms))
    }

    pub fn task(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in firing order.
    pub fn tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn sort(&mut self) {
        self.tasks.sort_unstable_by_key(|t| (t.next_fire_ms, t.id));
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
