//! Frame pacing on top of a host refresh callback.
//!
//! The host delivers ticks through a [`RefreshSource`]; [`FrameScheduler`]
//! decides which of them become rendered frames.

use std::time::Duration;

use tracing::{debug, trace};

/// Default frame rate the scheduler paces towards.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Identifies one outstanding tick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// "Call me once before the next repaint."
pub trait RefreshSource {
    /// Request one tick. The host later delivers it with this handle.
    fn request_tick(&mut self) -> TickHandle;

    /// Withdraw an outstanding request so it never fires.
    fn cancel_tick(&mut self, handle: TickHandle);
}

/// What the scheduler made of a delivered tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A frame is due. Carries seconds since the first tick.
    Accepted { elapsed_secs: f64 },
    /// Too soon after the last frame; the next tick is already requested.
    Throttled,
    /// Not the pending tick, or the scheduler is not running.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    TornDown,
}

/// Throttles host ticks down to a target frame rate.
///
/// Pacing works on timestamps, not tick counts: a tick is accepted only once
/// a full frame interval has passed since the last accepted tick, so two
/// frames are never closer together than the interval.
#[derive(Debug)]
pub struct FrameScheduler {
    frame_interval: Duration,
    phase: Phase,
    pending: Option<TickHandle>,
    first_tick: Option<Duration>,
    last_accepted: Option<Duration>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS)
    }
}

impl FrameScheduler {
    /// Create a scheduler pacing to `target_fps` (at least 1).
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_interval: Duration::from_secs(1) / target_fps.max(1),
            phase: Phase::Idle,
            pending: None,
            first_tick: None,
            last_accepted: None,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Handle of the tick currently requested from the host.
    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Request the first tick. Does nothing if already running or torn down.
    pub fn start<S: RefreshSource + ?Sized>(&mut self, source: &mut S) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.pending = Some(source.request_tick());
        debug!(interval = ?self.frame_interval, "frame scheduler started");
    }

    /// Process a tick delivered by the host at `timestamp`.
    ///
    /// `timestamp` is the host's monotonic time. The next tick is requested
    /// before deciding whether this one renders.
    pub fn on_tick<S: RefreshSource + ?Sized>(
        &mut self,
        handle: TickHandle,
        timestamp: Duration,
        source: &mut S,
    ) -> TickOutcome {
        if self.phase != Phase::Running || self.pending != Some(handle) {
            return TickOutcome::Ignored;
        }
        self.pending = Some(source.request_tick());

        let first = *self.first_tick.get_or_insert(timestamp);
        let elapsed = timestamp.saturating_sub(first);

        if let Some(last) = self.last_accepted {
            let since = timestamp.saturating_sub(last);
            if since < self.frame_interval {
                trace!(?timestamp, ?since, "tick throttled");
                return TickOutcome::Throttled;
            }
        }
        self.last_accepted = Some(timestamp);

        TickOutcome::Accepted {
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    /// Cancel the pending tick. No later tick is accepted.
    pub fn teardown<S: RefreshSource + ?Sized>(&mut self, source: &mut S) {
        if let Some(handle) = self.pending.take() {
            source.cancel_tick(handle);
        }
        if self.phase != Phase::TornDown {
            debug!("frame scheduler torn down");
        }
        self.phase = Phase::TornDown;
    }
}

/// Monotonic animation time in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    elapsed_secs: f64,
}

impl AnimationClock {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Move the clock to `elapsed_secs`. Earlier or non-finite values are
    /// ignored so the clock never runs backwards.
    pub fn advance_to(&mut self, elapsed_secs: f64) {
        if elapsed_secs.is_finite() && elapsed_secs > self.elapsed_secs {
            self.elapsed_secs = elapsed_secs;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Refresh source driven by the test instead of a display.
    #[derive(Debug, Default)]
    pub struct SimulatedRefresh {
        next_id: u64,
        pending: Option<TickHandle>,
        pub requested: usize,
        pub cancelled: usize,
    }

    impl SimulatedRefresh {
        /// Take the outstanding request, as a display would on repaint.
        pub fn fire(&mut self) -> Option<TickHandle> {
            self.pending.take()
        }
    }

    impl RefreshSource for SimulatedRefresh {
        fn request_tick(&mut self) -> TickHandle {
            self.next_id += 1;
            self.requested += 1;
            let handle = TickHandle::new(self.next_id);
            self.pending = Some(handle);
            handle
        }

        fn cancel_tick(&mut self, handle: TickHandle) {
            if self.pending == Some(handle) {
                self.pending = None;
                self.cancelled += 1;
            }
        }
    }

    /// Display period for `hz`, rounded up to whole nanoseconds.
    pub fn refresh_period(hz: u64) -> Duration {
        Duration::from_nanos(1_000_000_000u64.div_ceil(hz))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{SimulatedRefresh, refresh_period};
    use super::*;

    /// Timestamps of the ticks accepted while a `display_hz` host runs for
    /// `seconds`.
    fn accepted_ticks(display_hz: u64, target_fps: u32, seconds: u64) -> Vec<Duration> {
        let mut source = SimulatedRefresh::default();
        let mut scheduler = FrameScheduler::new(target_fps);
        scheduler.start(&mut source);

        let period = refresh_period(display_hz);
        let mut accepted = Vec::new();
        for i in 0..display_hz * seconds {
            let handle = source.fire().expect("scheduler keeps a tick pending");
            let timestamp = period * i as u32;
            let outcome = scheduler.on_tick(handle, timestamp, &mut source);
            if matches!(outcome, TickOutcome::Accepted { .. }) {
                accepted.push(timestamp);
            }
        }
        accepted
    }

    fn accepted_over(display_hz: u64, target_fps: u32, seconds: u64) -> usize {
        accepted_ticks(display_hz, target_fps, seconds).len()
    }

    #[test]
    fn test_throttles_240hz_to_60() {
        let accepted = accepted_over(240, 60, 1);
        assert!((59..=61).contains(&accepted), "accepted {accepted}");
    }

    #[test]
    fn test_throttles_120hz_to_60() {
        assert_eq!(accepted_over(120, 60, 1), 60);
    }

    #[test]
    fn test_144hz_accepts_every_third_tick() {
        // Two 144 Hz periods fall short of 1/60 s, three do not.
        assert_eq!(accepted_over(144, 60, 1), 48);
    }

    #[test]
    fn test_accepted_ticks_are_a_full_interval_apart() {
        let interval = FrameScheduler::new(60).frame_interval();
        for hz in [75, 100, 144, 165, 240] {
            let accepted = accepted_ticks(hz, 60, 1);
            assert!(accepted.len() > 1);
            for pair in accepted.windows(2) {
                let gap = pair[1] - pair[0];
                assert!(gap >= interval, "{hz} Hz: gap {gap:?} < {interval:?}");
            }
        }
    }

    #[test]
    fn test_slow_display_renders_every_tick() {
        assert_eq!(accepted_over(30, 60, 1), 30);
    }

    #[test]
    fn test_first_tick_starts_clock() {
        let mut source = SimulatedRefresh::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut source);

        let handle = source.fire().unwrap();
        let outcome = scheduler.on_tick(handle, Duration::from_secs(5), &mut source);
        assert_eq!(outcome, TickOutcome::Accepted { elapsed_secs: 0.0 });

        let handle = source.fire().unwrap();
        let outcome = scheduler.on_tick(handle, Duration::from_millis(5500), &mut source);
        assert_eq!(outcome, TickOutcome::Accepted { elapsed_secs: 0.5 });
    }

    #[test]
    fn test_throttled_tick_keeps_scheduling() {
        let mut source = SimulatedRefresh::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut source);

        let handle = source.fire().unwrap();
        scheduler.on_tick(handle, Duration::ZERO, &mut source);
        let handle = source.fire().unwrap();
        let outcome = scheduler.on_tick(handle, Duration::from_millis(1), &mut source);
        assert_eq!(outcome, TickOutcome::Throttled);
        assert!(scheduler.pending().is_some());
        assert_eq!(source.requested, 3);
    }

    #[test]
    fn test_teardown_cancels_pending_tick() {
        let mut source = SimulatedRefresh::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut source);
        let stale = scheduler.pending().unwrap();

        scheduler.teardown(&mut source);
        assert_eq!(source.cancelled, 1);
        assert!(source.fire().is_none());
        assert!(!scheduler.is_running());

        // Even a tick the host delivers anyway is ignored and not re-requested.
        let outcome = scheduler.on_tick(stale, Duration::from_secs(1), &mut source);
        assert_eq!(outcome, TickOutcome::Ignored);
        assert_eq!(source.requested, 1);

        scheduler.start(&mut source);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut source = SimulatedRefresh::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut source);
        let outcome = scheduler.on_tick(TickHandle::new(99), Duration::ZERO, &mut source);
        assert_eq!(outcome, TickOutcome::Ignored);
    }

    #[test]
    fn test_schedulers_pace_independently() {
        let mut source_a = SimulatedRefresh::default();
        let mut source_b = SimulatedRefresh::default();
        let mut a = FrameScheduler::new(60);
        let mut b = FrameScheduler::new(60);
        a.start(&mut source_a);
        b.start(&mut source_b);

        let h = source_a.fire().unwrap();
        assert!(matches!(
            a.on_tick(h, Duration::ZERO, &mut source_a),
            TickOutcome::Accepted { .. }
        ));
        // A frame on `a` does not throttle `b` at the same instant.
        let h = source_b.fire().unwrap();
        assert!(matches!(
            b.on_tick(h, Duration::ZERO, &mut source_b),
            TickOutcome::Accepted { .. }
        ));
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut clock = AnimationClock::default();
        clock.advance_to(2.0);
        clock.advance_to(1.0);
        clock.advance_to(f64::NAN);
        assert_eq!(clock.elapsed_secs(), 2.0);
    }
}
