//! Periodic scheduling collaborators for driving the automaton.
//!
//! The engine never spins its own loop. `start()` registers a repeating
//! period with a [`Scheduler`] and holds the returned handle; the host loop
//! calls [`Automaton::pump`](super::Automaton::pump), which asks the
//! scheduler how many periods have elapsed and runs that many ticks.
//! Cancellation is synchronous: once `cancel` returns, `due_ticks` for that
//! handle reports zero forever, so no tick can be delivered after `stop()`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Opaque token identifying one live repeating schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

/// Periodic callback source.
///
/// Implementations only track elapsed periods; the engine itself invokes
/// `tick` for every due period, keeping the whole design single-threaded.
pub trait Scheduler {
    /// Register a repeating schedule with the given period.
    fn schedule(&mut self, period: Duration) -> ScheduleHandle;

    /// Cancel a schedule. Unknown or already-cancelled handles are ignored.
    fn cancel(&mut self, handle: ScheduleHandle);

    /// Number of periods elapsed for `handle` since the last poll.
    /// Returns 0 for cancelled or unknown handles.
    fn due_ticks(&mut self, handle: ScheduleHandle) -> u32;
}

/// Shared-ownership schedulers, so a caller can keep a handle on the
/// scheduler it hands to the engine (tests drive a [`ManualScheduler`]
/// this way).
impl<S: Scheduler> Scheduler for Rc<RefCell<S>> {
    fn schedule(&mut self, period: Duration) -> ScheduleHandle {
        self.borrow_mut().schedule(period)
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.borrow_mut().cancel(handle)
    }

    fn due_ticks(&mut self, handle: ScheduleHandle) -> u32 {
        self.borrow_mut().due_ticks(handle)
    }
}

/// Upper bound on ticks reported from a single poll. After a long stall the
/// backlog past this is dropped instead of replayed, so a suspended host
/// does not fast-forward the simulation on resume.
const MAX_CATCHUP: u32 = 32;

struct IntervalSlot {
    handle: ScheduleHandle,
    period: Duration,
    next_due: Instant,
}

/// Wall-clock scheduler backed by [`Instant`].
#[derive(Default)]
pub struct IntervalScheduler {
    next_id: u64,
    slots: Vec<IntervalSlot>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule(&mut self, period: Duration) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_id);
        self.next_id += 1;
        // A zero period would spin in due_ticks.
        let period = period.max(Duration::from_micros(1));
        self.slots.push(IntervalSlot {
            handle,
            period,
            next_due: Instant::now() + period,
        });
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.slots.retain(|slot| slot.handle != handle);
    }

    fn due_ticks(&mut self, handle: ScheduleHandle) -> u32 {
        let Some(slot) = self.slots.iter_mut().find(|slot| slot.handle == handle) else {
            return 0;
        };
        let now = Instant::now();
        let mut due = 0;
        while now >= slot.next_due && due < MAX_CATCHUP {
            slot.next_due += slot.period;
            due += 1;
        }
        if due == MAX_CATCHUP {
            slot.next_due = now + slot.period;
        }
        due
    }
}

/// Deterministic scheduler for tests and host loops that measure time
/// themselves: periods elapse only when [`fire`](ManualScheduler::fire)
/// is called.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    slots: Vec<(ScheduleHandle, u32)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `periods` elapsed on every live schedule.
    pub fn fire(&mut self, periods: u32) {
        for (_, pending) in &mut self.slots {
            *pending += periods;
        }
    }

    /// True while at least one schedule is live.
    pub fn has_schedules(&self) -> bool {
        !self.slots.is_empty()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, _period: Duration) -> ScheduleHandle {
        let handle = ScheduleHandle(self.next_id);
        self.next_id += 1;
        self.slots.push((handle, 0));
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.slots.retain(|(h, _)| *h != handle);
    }

    fn due_ticks(&mut self, handle: ScheduleHandle) -> u32 {
        match self.slots.iter_mut().find(|(h, _)| *h == handle) {
            Some((_, pending)) => std::mem::take(pending),
            None => 0,
        }
    }
}
