//! Refresh ticks for a terminal, which has no vsync of its own.

use std::time::{Duration, Instant};

use morphwave_field::{RefreshSource, TickHandle};

/// Offers ticks on a fixed grid of `refresh_hz` repaints per second.
#[derive(Debug)]
pub struct TerminalRefresh {
    origin: Instant,
    period: Duration,
    next_id: u64,
    pending: Option<TickHandle>,
    next_due: Duration,
}

impl TerminalRefresh {
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            origin: Instant::now(),
            period: Duration::from_secs(1) / refresh_hz.max(1),
            next_id: 0,
            pending: None,
            next_due: Duration::ZERO,
        }
    }

    /// Monotonic time since this source was created.
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// How long until the pending tick is due. `None` when nothing is pending.
    pub fn time_until_due(&self, now: Duration) -> Option<Duration> {
        self.pending.map(|_| self.next_due.saturating_sub(now))
    }

    /// Hand out the pending tick if its repaint time has come, along with
    /// the grid slot it belongs to. Like a display's vsync time, the slot
    /// ignores how late the loop woke up.
    pub fn fire_due(&mut self, now: Duration) -> Option<(TickHandle, Duration)> {
        if now < self.next_due {
            return None;
        }
        let handle = self.pending.take()?;
        let mut slot = self.next_due;
        self.next_due += self.period;
        if self.next_due <= now {
            slot = now;
            self.next_due = now + self.period;
        }
        Some((handle, slot))
    }
}

impl RefreshSource for TerminalRefresh {
    fn request_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
