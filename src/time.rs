//! Fixed-timestep game clock and the tick scheduler built on it.
//!
//! The host calls `TickScheduler::pump()` whenever it gets control (an
//! animation frame, a timer callback, a loop iteration). `GameTime` turns
//! the wall-clock time that passed into a whole number of ticks, and each
//! tick is applied to the store as its own transition. Elapsed time is
//! never dropped, so a long pause yields that many ticks on the next pump.

use std::cell::Cell;
use std::rc::Rc;

use crate::game::save::KeyValueStore;
use crate::game::GameStore;

pub struct GameTime {
    /// Milliseconds per tick (1000ms = one tick per second)
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// Create a new GameTime with the given tick length in milliseconds.
    pub fn new(ms_per_tick: f64) -> Self {
        Self {
            ms_per_tick,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    pub fn ms_per_tick(&self) -> f64 {
        self.ms_per_tick
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of discrete ticks that became due.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clocks can step backwards; treat that as no time passing.
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Forget the baseline and any partial tick.
    pub fn rebase(&mut self, now_ms: f64) {
        self.accumulator = 0.0;
        self.last_timestamp = Some(now_ms);
    }
}

/// Source of wall-clock time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Manually advanced clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Monotonic process clock.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// `performance.now()` in the browser.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct PerformanceClock;

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

/// Shared switch that stops a scheduler from outside its owner.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    running: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Drives production ticks into a `GameStore` at a fixed cadence.
pub struct TickScheduler<C: Clock> {
    clock: C,
    time: GameTime,
    handle: StopHandle,
}

impl<C: Clock> TickScheduler<C> {
    /// A stopped scheduler; call `start()` to begin delivering ticks.
    ///
    /// # Panics
    ///
    /// Panics if `ms_per_tick` is not a positive finite number.
    pub fn new(clock: C, ms_per_tick: f64) -> Self {
        assert!(
            ms_per_tick.is_finite() && ms_per_tick > 0.0,
            "tick interval must be positive, got {ms_per_tick}"
        );
        Self {
            clock,
            time: GameTime::new(ms_per_tick),
            handle: StopHandle::default(),
        }
    }

    /// Begin (or resume) ticking from the current time. Time spent stopped
    /// produces no ticks.
    pub fn start(&mut self) {
        self.time.rebase(self.clock.now_ms());
        self.handle.running.set(true);
        log::debug!("tick scheduler started ({}ms/tick)", self.time.ms_per_tick());
    }

    /// Stop delivering ticks. Ticks already due but not yet applied are
    /// dropped.
    pub fn stop(&mut self) {
        self.handle.stop();
        log::debug!("tick scheduler stopped after {} ticks", self.time.total_ticks);
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Total ticks that became due while running.
    pub fn total_ticks(&self) -> u64 {
        self.time.total_ticks
    }

    /// Apply every tick that is due, one transition each, in order.
    /// Returns how many ticks were applied.
    pub fn pump<S: KeyValueStore>(&mut self, store: &mut GameStore<S>) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let due = self.time.update(self.clock.now_ms());
        let mut applied = 0;
        for _ in 0..due {
            if !self.is_running() {
                break;
            }
            store.tick();
            applied += 1;
        }
        applied
    }

    /// Deliver exactly one tick now, regardless of the clock.
    /// Returns false when stopped.
    pub fn fire<S: KeyValueStore>(&mut self, store: &mut GameStore<S>) -> bool {
        if !self.is_running() {
            return false;
        }
        store.tick();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::game::save::MemoryStore;

    fn store() -> GameStore<MemoryStore> {
        GameStore::hydrate(&EngineConfig::default(), MemoryStore::new())
    }

    #[test]
    fn first_frame_returns_zero_ticks() {
        let mut gt = GameTime::new(1000.0);
        assert_eq!(gt.update(0.0), 0);
    }

    #[test]
    fn one_tick_per_second() {
        let mut gt = GameTime::new(1000.0);
        gt.update(0.0); // first frame
        assert_eq!(gt.update(1000.0), 1);
        assert_eq!(gt.total_ticks, 1);
    }

    #[test]
    fn multiple_ticks_accumulated() {
        let mut gt = GameTime::new(1000.0);
        gt.update(0.0);
        assert_eq!(gt.update(3500.0), 3); // 3 ticks + 500ms remainder
        assert_eq!(gt.total_ticks, 3);
    }

    #[test]
    fn remainder_carried_over() {
        let mut gt = GameTime::new(1000.0);
        gt.update(0.0);
        gt.update(1500.0); // 1 tick, 500ms remainder
        assert_eq!(gt.total_ticks, 1);
        assert_eq!(gt.update(2000.0), 1); // 500ms remainder + 500ms delta
        assert_eq!(gt.total_ticks, 2);
    }

    #[test]
    fn long_gap_is_not_clamped() {
        let mut gt = GameTime::new(1000.0);
        gt.update(0.0);
        // Tab backgrounded for a minute: every second still counts.
        assert_eq!(gt.update(60_000.0), 60);
    }

    #[test]
    fn backwards_clock_yields_nothing() {
        let mut gt = GameTime::new(1000.0);
        gt.update(5000.0);
        assert_eq!(gt.update(4000.0), 0);
        assert_eq!(gt.update(5000.0), 1);
    }

    #[test]
    fn sub_tick_frames_accumulate() {
        let mut gt = GameTime::new(100.0);
        gt.update(0.0);
        for t in [16.0, 32.0, 48.0, 64.0, 80.0, 96.0] {
            assert_eq!(gt.update(t), 0);
        }
        assert_eq!(gt.update(112.0), 1); // 112ms → 1 tick, 12ms remainder
        assert_eq!(gt.total_ticks, 1);
    }

    #[test]
    fn steady_60fps() {
        let mut gt = GameTime::new(1000.0);
        gt.update(0.0);
        let mut total = 0u32;
        // 600 frames at ~16.67ms each = 10 seconds
        for i in 1..=600 {
            total += gt.update(i as f64 * 16.667);
        }
        assert!((9..=11).contains(&total), "expected ~10 ticks, got {}", total);
    }

    #[test]
    fn stopped_scheduler_delivers_nothing() {
        let clock = ManualClock::new();
        let mut scheduler = TickScheduler::new(clock.clone(), 1000.0);
        let mut store = store();
        clock.advance(5000.0);
        assert_eq!(scheduler.pump(&mut store), 0);
        assert!(!scheduler.fire(&mut store));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn pump_applies_each_due_tick() {
        let clock = ManualClock::new();
        let mut scheduler = TickScheduler::new(clock.clone(), 1000.0);
        let mut store = store();
        scheduler.start();
        clock.advance(3000.0);
        assert_eq!(scheduler.pump(&mut store), 3);
        assert_eq!(scheduler.total_ticks(), 3);
        assert_eq!(store.revision(), 3);
        assert!((store.state().resources.energy - 10.3).abs() < 0.001);
    }

    #[test]
    #[should_panic(expected = "tick interval must be positive")]
    fn zero_interval_is_rejected() {
        TickScheduler::new(ManualClock::new(), 0.0);
    }

    #[test]
    #[should_panic(expected = "tick interval must be positive")]
    fn nan_interval_is_rejected() {
        TickScheduler::new(ManualClock::new(), f64::NAN);
    }

    #[test]
    fn stop_discards_pending_time() {
        let clock = ManualClock::new();
        let mut scheduler = TickScheduler::new(clock.clone(), 1000.0);
        let mut store = store();
        scheduler.start();
        clock.advance(1500.0);
        assert_eq!(scheduler.pump(&mut store), 1);
        scheduler.stop();
        clock.advance(10_000.0);
        assert_eq!(scheduler.pump(&mut store), 0);

        // Restart: the stopped interval and the old remainder are gone.
        scheduler.start();
        clock.advance(999.0);
        assert_eq!(scheduler.pump(&mut store), 0);
        clock.advance(1.0);
        assert_eq!(scheduler.pump(&mut store), 1);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn stop_handle_stops_from_outside() {
        let clock = ManualClock::new();
        let mut scheduler = TickScheduler::new(clock.clone(), 1000.0);
        let handle = scheduler.stop_handle();
        let mut store = store();
        scheduler.start();
        assert!(scheduler.fire(&mut store));
        handle.stop();
        assert!(!scheduler.is_running());
        clock.advance(2000.0);
        assert_eq!(scheduler.pump(&mut store), 0);
        assert_eq!(store.revision(), 1);
    }
}
