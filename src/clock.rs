//! Monotonic time sources

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time in seconds, shared by everything driven from one host loop.
pub trait Clock {
    /// Current time in seconds.
    fn now(&self) -> f32;
}

/// Host-advanced clock.
///
/// Clones share the same time, so the host keeps one handle and hands
/// another to the accumulator.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at the given time instead of zero.
    pub fn starting_at(seconds: f32) -> Self {
        Self {
            now: Rc::new(Cell::new(seconds)),
        }
    }

    /// Advance time by `dt` seconds. Negative deltas are ignored.
    pub fn advance(&self, dt: f32) {
        if dt > 0.0 {
            self.now.set(self.now.get() + dt);
        }
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, seconds: f32) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f32 {
        self.now.get()
    }
}

/// Wall-clock seconds since construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f32 {
        self.origin.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let host = ManualClock::new();
        let handle = host.clone();

        host.advance(1.5);
        assert_eq!(handle.now(), 1.5);

        host.set(4.0);
        assert_eq!(handle.now(), 4.0);
    }

    #[test]
    fn test_manual_clock_monotonic() {
        let clock = ManualClock::starting_at(10.0);
        clock.advance(-1.0);
        clock.set(5.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
