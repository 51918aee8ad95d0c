//! Adaptive fixed-timestep clock for the game simulation.
//!
//! The [`SimulationClock`] converts host frame callbacks into discrete game
//! ticks. Each callback:
//!
//! 1. Measures the wall time elapsed since the last consumed tick boundary.
//! 2. Runs `floor(elapsed / frame_duration)` steps. Each step fires
//!    [`TickListener::on_before_game_tick`] with the current tick index,
//!    advances the index, then fires [`TickListener::on_game_tick`].
//! 3. Keeps the fractional remainder for the next callback.
//! 4. Adapts the speed factor if the host fell behind (see below).
//! 5. Fires [`TickListener::each_game_second`] once per elapsed wall second.
//! 6. Requests the next host frame.
//!
//! # Pacing heuristics
//!
//! In normal mode, a callback that owes more than one step slows the clock
//! to `max(min_speed_factor, 1 / steps)` so a stall (a backgrounded window,
//! a slow frame) does not turn into a burst of catch-up work every frame.
//! The next callback that owes exactly one step restores speed factor 1.
//!
//! In benchmark mode the clock instead tracks missed and stable ticks and
//! nudges the speed factor down by `slowdown_factor` or back up by
//! `speedup_factor`. All thresholds live in [`ClockConfig`].
//!
//! # Pausing
//!
//! [`suspend`](SimulationClock::suspend) and
//! [`resume`](SimulationClock::resume) take a [`PauseSignal`]. Focus or
//! visibility loss sends [`PauseSignal::AUTOMATIC`]; a later automatic resume
//! only continues a pause that was itself automatic, so a player's own pause
//! is never undone by the window regaining focus.
//!
//! # Example
//!
//! ```
//! use burrow_engine::prelude::*;
//!
//! let mut clock = SimulationClock::new(ManualHost::new(), ClockConfig::default());
//! clock.resume(PauseSignal::USER);
//!
//! clock.host_mut().advance(60.0);
//! let report = clock.poll(&mut ()).unwrap();
//! assert_eq!(report.steps, 1);
//! assert_eq!(clock.tick_index(), 1);
//!
//! // Window lost focus: pause automatically, then resume when it returns.
//! clock.suspend(PauseSignal::AUTOMATIC);
//! assert!(clock.is_auto_paused());
//! clock.resume(PauseSignal::AUTOMATIC);
//! assert!(clock.is_running());
//! ```

use tracing::debug;

use crate::config::ClockConfig;
use crate::host::{FrameHost, FrameToken, PolledHost};
use crate::ConfigError;

// ---------------------------------------------------------------------------
// TickIndex
// ---------------------------------------------------------------------------

/// Index of a game tick.
pub type TickIndex = u32;

/// Highest tick index. The next increment wraps to 0.
pub const MAX_TICK_INDEX: TickIndex = i32::MAX as TickIndex;

/// The tick after `tick`, wrapping to 0 past [`MAX_TICK_INDEX`].
#[inline]
pub fn next_tick_index(tick: TickIndex) -> TickIndex {
    if tick >= MAX_TICK_INDEX {
        0
    } else {
        tick + 1
    }
}

/// `counter + amount`, wrapping at the same ceiling as tick indices.
#[inline]
fn wrapping_counter_add(counter: u32, amount: u64) -> u32 {
    let modulus = u64::from(MAX_TICK_INDEX) + 1;
    ((u64::from(counter) + amount % modulus) % modulus) as u32
}

// ---------------------------------------------------------------------------
// TickListener
// ---------------------------------------------------------------------------

/// Hooks fired by the clock. All methods default to no-ops.
///
/// Rendering, HUD, audio and the command log subscribe through this trait
/// instead of driving the clock themselves.
pub trait TickListener {
    /// Fired before the tick runs, with the index of the tick about to run.
    fn on_before_game_tick(&mut self, _tick: TickIndex) {}

    /// Fired after the tick index has advanced.
    fn on_game_tick(&mut self) {}

    /// Fired once per elapsed wall-clock second while running.
    fn each_game_second(&mut self) {}
}

impl TickListener for () {}

impl<L: TickListener + ?Sized> TickListener for &mut L {
    fn on_before_game_tick(&mut self, tick: TickIndex) {
        (**self).on_before_game_tick(tick);
    }

    fn on_game_tick(&mut self) {
        (**self).on_game_tick();
    }

    fn each_game_second(&mut self) {
        (**self).each_game_second();
    }
}

// ---------------------------------------------------------------------------
// PauseSignal
// ---------------------------------------------------------------------------

/// Who asked for a pause or a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PauseSignal {
    /// `true` for focus/visibility changes, `false` for the player.
    pub automatic: bool,
}

impl PauseSignal {
    /// An explicit player request.
    pub const USER: PauseSignal = PauseSignal { automatic: false };
    /// A focus or visibility change reported by the host.
    pub const AUTOMATIC: PauseSignal = PauseSignal { automatic: true };
}

// ---------------------------------------------------------------------------
// StepReport
// ---------------------------------------------------------------------------

/// What a single host callback did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Ticks stepped in this callback.
    pub steps: u64,
    /// `each_game_second` hooks fired in this callback.
    pub game_seconds: u32,
    /// Speed factor after the pacing heuristics ran.
    pub speed_factor: f64,
}

// ---------------------------------------------------------------------------
// SimulationClock
// ---------------------------------------------------------------------------

/// Produces game ticks at a target rate from host frame callbacks.
///
/// The clock never raises errors: invalid speed factors and redundant
/// pause/resume calls are ignored.
pub struct SimulationClock<H: FrameHost> {
    /// The host providing time and frame callbacks.
    host: H,
    /// Frame duration and heuristic thresholds.
    config: ClockConfig,
    /// Index of the next tick to run.
    tick_index: TickIndex,
    /// Virtual-to-real time multiplier.
    speed_factor: f64,
    /// `base_frame_ms / speed_factor`.
    frame_duration_ms: f64,
    /// Whether frames are being requested.
    running: bool,
    /// The frame callback we are waiting for.
    pending_frame: Option<FrameToken>,
    /// Wall time of the last consumed tick boundary (residual kept).
    last_time_ms: f64,
    /// Wall time of the last callback, for game-second accounting.
    last_callback_ms: f64,
    /// Wall time accumulated towards the next game second.
    second_accumulator_ms: f64,
    /// The current pause was requested automatically.
    auto_paused: bool,
    /// The speed factor was lowered by the catch-up heuristic.
    slowed_by_catch_up: bool,
    /// Benchmark heuristic instead of catch-up.
    benchmark: bool,
    /// Benchmark mode: ticks owed beyond one per callback.
    missed_ticks: u32,
    /// Benchmark mode: callbacks that owed exactly one tick.
    stable_ticks: u32,
}

impl<H: FrameHost> SimulationClock<H> {
    /// Create a stopped clock at tick 0 with speed factor 1.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not validate.
    pub fn new(host: H, config: ClockConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("invalid clock config: {e}");
        }
        Self::build(host, config)
    }

    /// Create a stopped clock, returning an error for an invalid config.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`ClockConfig::validate`].
    pub fn try_new(host: H, config: ClockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(host, config))
    }

    fn build(host: H, config: ClockConfig) -> Self {
        let now = host.now_ms();
        Self {
            frame_duration_ms: config.base_frame_ms,
            benchmark: config.benchmark,
            host,
            config,
            tick_index: 0,
            speed_factor: 1.0,
            running: false,
            pending_frame: None,
            last_time_ms: now,
            last_callback_ms: now,
            second_accumulator_ms: 0.0,
            auto_paused: false,
            slowed_by_catch_up: false,
            missed_ticks: 0,
            stable_ticks: 0,
        }
    }

    // -- running state --------------------------------------------------------

    /// Start, or continue, requesting frames.
    ///
    /// No-op if already running. An automatic resume only continues a pause
    /// that was automatic.
    pub fn resume(&mut self, signal: PauseSignal) {
        if self.running {
            debug!("resume ignored: clock already running");
            return;
        }
        if signal.automatic && !self.auto_paused {
            debug!("automatic resume ignored: clock was paused by the player");
            return;
        }

        let now = self.host.now_ms();
        self.last_time_ms = now;
        self.last_callback_ms = now;
        self.auto_paused = false;
        self.running = true;
        self.pending_frame = Some(self.host.request_frame());
        debug!(tick = self.tick_index, automatic = signal.automatic, "clock resumed");
    }

    /// Stop requesting frames and cancel the pending one. Idempotent.
    pub fn suspend(&mut self, signal: PauseSignal) {
        if !self.running {
            // A player pause on top of an automatic one takes ownership, so
            // regaining focus will not resume it.
            if !signal.automatic {
                self.auto_paused = false;
            }
            debug!("suspend ignored: clock already stopped");
            return;
        }

        if let Some(token) = self.pending_frame.take() {
            self.host.cancel_frame(token);
        }
        self.running = false;
        self.auto_paused = signal.automatic;
        debug!(tick = self.tick_index, automatic = signal.automatic, "clock suspended");
    }

    /// Player pause/unpause.
    pub fn toggle(&mut self) {
        if self.running {
            self.suspend(PauseSignal::USER);
        } else {
            self.resume(PauseSignal::USER);
        }
    }

    // -- speed ----------------------------------------------------------------

    /// Change the speed factor.
    ///
    /// Non-positive and non-finite values are ignored. If the clock is
    /// running it is restarted so the new pacing starts from now instead of
    /// replaying the time already elapsed at the old pace.
    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        if !(speed_factor > 0.0 && speed_factor.is_finite()) {
            debug!(speed_factor, "speed factor rejected");
            return;
        }
        if speed_factor == self.speed_factor {
            return;
        }

        self.apply_speed_factor(speed_factor);
        self.slowed_by_catch_up = false;

        if self.running {
            self.suspend(PauseSignal::USER);
            self.resume(PauseSignal::USER);
        }
    }

    /// Switch the benchmark heuristic on or off. Resets its counters.
    pub fn set_benchmark(&mut self, enabled: bool) {
        self.benchmark = enabled;
        self.missed_ticks = 0;
        self.stable_ticks = 0;
        self.slowed_by_catch_up = false;
    }

    fn apply_speed_factor(&mut self, speed_factor: f64) {
        self.speed_factor = speed_factor;
        self.frame_duration_ms = self.config.base_frame_ms / speed_factor;
    }

    // -- stepping -------------------------------------------------------------

    /// Handle one host frame callback.
    ///
    /// Ignored while stopped. Otherwise runs every step that is due, fires
    /// the game-second hook for each elapsed wall second, and requests the
    /// next frame.
    pub fn on_host_callback<L: TickListener + ?Sized>(
        &mut self,
        now_ms: f64,
        listener: &mut L,
    ) -> StepReport {
        let mut report = StepReport {
            steps: 0,
            game_seconds: 0,
            speed_factor: self.speed_factor,
        };
        if !self.running {
            return report;
        }
        self.pending_frame = None;

        let elapsed = now_ms - self.last_time_ms;
        let steps = if elapsed >= self.frame_duration_ms {
            (elapsed / self.frame_duration_ms).floor() as u64
        } else {
            0
        };
        for _ in 0..steps {
            listener.on_before_game_tick(self.tick_index);
            self.tick_index = next_tick_index(self.tick_index);
            listener.on_game_tick();
        }
        self.last_time_ms += steps as f64 * self.frame_duration_ms;
        report.steps = steps;

        // Benchmark bookkeeping runs on every callback, including those that
        // owe nothing.
        if self.benchmark {
            self.adapt_benchmark(steps);
        } else {
            self.adapt_catch_up(steps);
        }

        let since_callback = now_ms - self.last_callback_ms;
        if since_callback > 0.0 {
            self.second_accumulator_ms += since_callback;
            self.last_callback_ms = now_ms;
        }
        while self.second_accumulator_ms >= self.config.game_second_ms {
            self.second_accumulator_ms -= self.config.game_second_ms;
            listener.each_game_second();
            report.game_seconds += 1;
        }

        self.pending_frame = Some(self.host.request_frame());
        report.speed_factor = self.speed_factor;
        report
    }

    fn adapt_catch_up(&mut self, steps: u64) {
        if steps > 1 {
            let slowed = (1.0 / steps as f64).max(self.config.min_speed_factor);
            debug!(steps, speed_factor = slowed, "host fell behind, slowing down");
            self.apply_speed_factor(slowed);
            self.slowed_by_catch_up = true;
        } else if steps == 1 && self.slowed_by_catch_up {
            debug!("host caught up, restoring speed factor 1");
            self.apply_speed_factor(1.0);
            self.slowed_by_catch_up = false;
        }
    }

    fn adapt_benchmark(&mut self, steps: u64) {
        if steps > 1 {
            self.missed_ticks = wrapping_counter_add(self.missed_ticks, steps - 1);
        } else {
            self.missed_ticks = self.missed_ticks.saturating_sub(1);
        }
        if steps == 1 {
            self.stable_ticks = wrapping_counter_add(self.stable_ticks, 1);
        }

        if self.missed_ticks > self.config.missed_ticks_threshold {
            let slowed = (self.speed_factor * self.config.slowdown_factor)
                .max(self.config.min_speed_factor);
            debug!(missed = self.missed_ticks, speed_factor = slowed, "benchmark slowing down");
            self.apply_speed_factor(slowed);
            self.missed_ticks = 0;
        }

        if self.stable_ticks > self.config.stable_ticks_threshold && self.speed_factor < 1.0 {
            let faster = (self.speed_factor * self.config.speedup_factor).min(1.0);
            debug!(stable = self.stable_ticks, speed_factor = faster, "benchmark speeding up");
            self.apply_speed_factor(faster);
            self.stable_ticks = 0;
        }
    }

    // -- accessors ------------------------------------------------------------

    /// Index of the next tick to run.
    pub fn tick_index(&self) -> TickIndex {
        self.tick_index
    }

    /// Jump to a tick (level start, restoring a saved game). Values past the
    /// ceiling wrap.
    pub fn set_tick_index(&mut self, tick: TickIndex) {
        self.tick_index = wrapping_counter_add(0, u64::from(tick));
    }

    /// Game time in seconds: ticks times the base frame duration, independent
    /// of the speed factor.
    pub fn game_time_secs(&self) -> f64 {
        f64::from(self.tick_index) * self.config.base_frame_ms / 1000.0
    }

    /// Current speed factor.
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Current wall-clock duration of one tick, in milliseconds.
    pub fn frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms
    }

    /// Whether frames are being requested.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the clock is stopped by an automatic pause.
    pub fn is_auto_paused(&self) -> bool {
        !self.running && self.auto_paused
    }

    /// Whether the speed factor is currently lowered by the catch-up heuristic.
    pub fn is_slowed_by_catch_up(&self) -> bool {
        self.slowed_by_catch_up
    }

    /// Whether the benchmark heuristic is active.
    pub fn is_benchmark(&self) -> bool {
        self.benchmark
    }

    /// The configuration this clock was built with.
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Read-only access to the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host (advancing a [`ManualHost`](crate::host::ManualHost), etc.).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: PolledHost> SimulationClock<H> {
    /// Deliver the pending host frame, if any, at the host's current time.
    ///
    /// Returns `None` when no frame was pending (the clock is stopped).
    pub fn poll<L: TickListener + ?Sized>(&mut self, listener: &mut L) -> Option<StepReport> {
        self.host.take_frame()?;
        let now = self.host.now_ms();
        Some(self.on_host_callback(now, listener))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
