//! Timer scheduling on the simulation clock
//!
//! Timers never run on their own; `advance` is called from the tick, so a
//! timer can only fire between simulation steps. Each timer carries an event
//! value that is handed back when it fires.

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    handle: TimerHandle,
    event: E,
    interval: f32,
    remaining: f32,
    periodic: bool,
}

/// Periodic and one-shot timers keyed by handle
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    timers: Vec<Timer<E>>,
    next_handle: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_handle: 1,
        }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire after `interval` seconds, repeating if `periodic`.
    /// Returns `None` for an interval that is not a finite positive number.
    pub fn schedule(&mut self, event: E, interval: f32, periodic: bool) -> Option<TimerHandle> {
        if !(interval.is_finite() && interval > 0.0) {
            log::warn!("Refusing to schedule timer with interval {interval}");
            return None;
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            event,
            interval,
            remaining: interval,
            periodic,
        });
        Some(handle)
    }

    /// Invalidate a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Advance the clock by `dt` and collect the events that fired, in
    /// scheduling order. A periodic timer fires once per elapsed interval.
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        let mut fired = Vec::new();

        for timer in &mut self.timers {
            timer.remaining -= dt;
            while timer.remaining <= 0.0 {
                fired.push(timer.event.clone());
                if !timer.periodic {
                    break;
                }
                timer.remaining += timer.interval;
            }
        }

        // One-shots are spent once they fire
        self.timers.retain(|t| t.periodic || t.remaining > 0.0);

        fired
    }
}
