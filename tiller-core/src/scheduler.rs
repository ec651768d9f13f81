//! Cooperative round-robin task scheduler
//!
//! A fixed table of `(task, period)` pairs is walked on every loop pass.
//! A task with period 0 runs unconditionally each pass; a periodic task
//! runs when at least its period has elapsed since its last run. The
//! elapsed check is binary: missed periods are not compensated with
//! catch-up runs. Tasks always fire in table-declaration order within a
//! pass.
//!
//! Tasks receive an explicit context struct instead of reaching for
//! globals, so the whole system can be driven in a unit test.

use heapless::Vec;

use crate::traits::MillisTimer;

/// A task entry: a plain function over the shared context plus its period
#[derive(Debug)]
pub struct TaskDef<C> {
    /// Task body; must return promptly (run-to-completion, no blocking)
    pub run: fn(&mut C),
    /// Period in milliseconds; 0 runs on every pass
    pub period_ms: u64,
}

impl<C> TaskDef<C> {
    /// A task that runs on every scheduler pass
    pub fn always(run: fn(&mut C)) -> Self {
        Self { run, period_ms: 0 }
    }

    /// A task that runs once at least `period_ms` has elapsed
    pub fn every_ms(period_ms: u64, run: fn(&mut C)) -> Self {
        Self { run, period_ms }
    }
}

// fn pointers are Copy regardless of C, so derive bounds would be wrong here
impl<C> Clone for TaskDef<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for TaskDef<C> {}

#[derive(Debug)]
struct TaskSlot<C> {
    def: TaskDef<C>,
    last_run_ms: u64,
}

/// Errors that can occur while bringing the scheduler up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError<E> {
    /// The millisecond timer could not be started
    Timer(E),
    /// More tasks than the table capacity `N`
    TooManyTasks,
}

/// The cooperative scheduler: task table plus its tick source
#[derive(Debug)]
pub struct Scheduler<T: MillisTimer, C, const N: usize> {
    timer: T,
    tasks: Vec<TaskSlot<C>, N>,
}

impl<T: MillisTimer, C, const N: usize> Scheduler<T, C, N> {
    /// Store the task table and start the millisecond timer.
    ///
    /// A timer failure is a boot-time precondition violation; the caller
    /// is expected to treat it as fatal.
    pub fn new(mut timer: T, defs: &[TaskDef<C>]) -> Result<Self, SchedulerError<T::Error>> {
        if defs.len() > N {
            return Err(SchedulerError::TooManyTasks);
        }

        timer.start().map_err(SchedulerError::Timer)?;

        let mut tasks = Vec::new();
        for def in defs {
            let _ = tasks.push(TaskSlot {
                def: *def,
                last_run_ms: 0,
            });
        }

        Ok(Self { timer, tasks })
    }

    /// Run one pass over the task table.
    ///
    /// Call repeatedly from the main loop with no blocking work in
    /// between. The tick is snapshotted once per pass so every due check
    /// in the pass sees the same instant.
    pub fn iteration(&mut self, ctx: &mut C) {
        let now = self.timer.now_ms();

        for slot in self.tasks.iter_mut() {
            if slot.def.period_ms == 0 {
                (slot.def.run)(ctx);
            } else if now.wrapping_sub(slot.last_run_ms) >= slot.def.period_ms {
                (slot.def.run)(ctx);
                slot.last_run_ms = now;
            }
        }
    }
}
