//! The host's repaint primitive, as seen by the clock.
//!
//! A [`FrameHost`] tells the time and schedules one frame callback at a time,
//! the way a browser's animation-frame API or a native vsync loop does. The
//! host owns the actual event loop: when a requested frame is due it calls
//! [`SimulationClock::on_host_callback`](crate::clock::SimulationClock::on_host_callback).
//!
//! Two hosts ship with the engine:
//!
//! - [`ManualHost`]: time only moves when told to. Used by tests, headless
//!   verification runs and anything else that must be reproducible.
//! - [`InstantHost`]: real monotonic time from [`std::time::Instant`], for
//!   native loops that poll the clock once per rendered frame.
//!
//! Both implement [`PolledHost`], which lets the owner of the loop ask whether
//! the frame the clock requested is ready to be delivered.

use std::time::Instant;

// ---------------------------------------------------------------------------
// FrameToken
// ---------------------------------------------------------------------------

/// Handle to a requested frame callback, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    /// Construct a token from a host-specific raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-specific raw id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Time source and frame scheduler of the hosting environment.
pub trait FrameHost {
    /// Current time on a monotonic clock, in milliseconds.
    fn now_ms(&self) -> f64;

    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a previously requested callback. Unknown or already delivered
    /// tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// A host whose frames are pulled by the loop owner instead of pushed.
pub trait PolledHost: FrameHost {
    /// Take the pending frame if one is due, marking it delivered.
    fn take_frame(&mut self) -> Option<FrameToken>;
}

// ---------------------------------------------------------------------------
// ManualHost
// ---------------------------------------------------------------------------

/// Deterministic host: time is advanced explicitly.
///
/// A requested frame is due as soon as it is requested, so every
/// [`take_frame`](PolledHost::take_frame) after a request delivers it.
#[derive(Debug, Clone, Default)]
pub struct ManualHost {
    now_ms: f64,
    next_token: u64,
    pending: Option<FrameToken>,
    requests: u64,
    cancels: u64,
}

impl ManualHost {
    /// A host whose clock reads 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose clock reads `now_ms`.
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    /// Move time forward by `delta_ms`.
    pub fn advance(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms;
    }

    /// Jump to an absolute time. Going backwards is allowed, to test clock
    /// skew handling.
    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// The frame currently waiting for delivery.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    /// How many frames have been requested so far.
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// How many pending frames have been cancelled so far.
    pub fn cancel_count(&self) -> u64 {
        self.cancels
    }
}

impl FrameHost for ManualHost {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.requests += 1;
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancels += 1;
        }
    }
}

impl PolledHost for ManualHost {
    fn take_frame(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }
}

// ---------------------------------------------------------------------------
// InstantHost
// ---------------------------------------------------------------------------

/// Real-time host backed by [`Instant`].
///
/// The loop owner is expected to pace itself (vsync, sleep); every poll
/// delivers the pending frame.
#[derive(Debug, Clone)]
pub struct InstantHost {
    origin: Instant,
    next_token: u64,
    pending: Option<FrameToken>,
}

impl InstantHost {
    /// A host whose clock reads 0 ms now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            next_token: 0,
            pending: None,
        }
    }
}

impl Default for InstantHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHost for InstantHost {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}

impl PolledHost for InstantHost {
    fn take_frame(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
