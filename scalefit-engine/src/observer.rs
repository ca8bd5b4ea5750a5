//! Change observer: debounced re-fitting on viewport and orientation
//! signals.
//!
//! Cooperative, single-threaded design: the host forwards its resize and
//! orientation events through [`ObserverHandle::signal`] and pumps the
//! handle from its own event loop with the current time. No timer
//! thread, no async runtime required; deadlines are explicit `Instant`s,
//! which keeps the state machine deterministic under test.
//!
//! Debounce is a single-slot state machine per handle:
//!
//! ```text
//!  Idle ──signal──▸ Pending(deadline) ──pump at/after deadline──▸ Idle
//!                      ▲      │
//!                      └──────┘  further signals replace the deadline
//! ```
//!
//! Only the trailing edge fires: a burst of signals inside the debounce
//! window collapses to one orchestrator pass, run against the viewport
//! carried by the latest signal. Orientation signals add a settle delay
//! on top of the base debounce, since hosts report stale dimensions for
//! a brief window after rotation.

use std::time::{Duration, Instant};

use scalefit_core::{OrientationPreference, ReferenceDesign, Viewport};

use crate::orchestrator::{self, ApplyError, FitPolicyResolver, LayoutUpdate, TargetRegion};

// ── Configuration ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverConfig {
    /// Quiet period after the last signal before a pass runs.
    pub debounce_ms: u64,
    /// Extra delay applied after an orientation-change signal.
    pub orientation_settle_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            orientation_settle_ms: 100,
        }
    }
}

/// External signal classes forwarded by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    /// Viewport or container size changed.
    Resize,
    /// Device orientation changed; dimensions may still be settling.
    OrientationChange,
}

// ── Handle ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum DebounceState {
    Idle,
    Pending { deadline: Instant },
}

/// Lifecycle token for one observed region.
///
/// Owns its debounce slot, the latest sampled viewport, and the update
/// callback exclusively; nothing is shared across handles. Release is
/// idempotent and cancels any pending deadline synchronously, after
/// which no further callback invocation can happen.
pub struct ObserverHandle {
    config: ObserverConfig,
    state: DebounceState,
    viewport: Viewport,
    on_update: Box<dyn FnMut(&LayoutUpdate)>,
    released: bool,
}

impl ObserverHandle {
    /// Start observing. The initial invocation is scheduled immediately:
    /// the first [`pump`](Self::pump) at or after `now` runs a pass
    /// against `initial_viewport` without waiting out a debounce window.
    pub fn observe(
        initial_viewport: Viewport,
        on_update: impl FnMut(&LayoutUpdate) + 'static,
        config: ObserverConfig,
        now: Instant,
    ) -> Self {
        Self {
            config,
            state: DebounceState::Pending { deadline: now },
            viewport: initial_viewport,
            on_update: Box::new(on_update),
            released: false,
        }
    }

    /// Forward one external signal with the viewport sampled at the
    /// event. Resets the single deadline slot; only the trailing edge
    /// of a burst will fire.
    pub fn signal(&mut self, kind: SignalKind, viewport: Viewport, now: Instant) {
        if self.released {
            return;
        }
        let delay = match kind {
            SignalKind::Resize => Duration::from_millis(self.config.debounce_ms),
            SignalKind::OrientationChange => {
                Duration::from_millis(self.config.debounce_ms + self.config.orientation_settle_ms)
            }
        };
        self.viewport = viewport;
        let deadline = now + delay;
        if let DebounceState::Pending { deadline: old } = self.state {
            log::trace!("observer: coalescing signal, deadline {old:?} -> {deadline:?}");
        }
        self.state = DebounceState::Pending { deadline };
    }

    /// Deadline of the pending pass, if any. Hosts with their own timer
    /// can use this to schedule the next pump instead of polling.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Pending { deadline } if !self.released => Some(deadline),
            _ => None,
        }
    }

    /// Run the pending pass if its deadline has been reached.
    ///
    /// Returns `Ok(true)` when a pass ran and the callback was invoked,
    /// `Ok(false)` when nothing was due. A failed solve propagates and
    /// leaves the slot idle; the next signal schedules a fresh pass.
    pub fn pump(
        &mut self,
        now: Instant,
        region: &mut dyn TargetRegion,
        design: &ReferenceDesign,
        preference: OrientationPreference,
        resolver: &dyn FitPolicyResolver,
    ) -> Result<bool, ApplyError> {
        if self.released {
            return Ok(false);
        }
        let DebounceState::Pending { deadline } = self.state else {
            return Ok(false);
        };
        if now < deadline {
            return Ok(false);
        }

        self.state = DebounceState::Idle;
        let update = orchestrator::apply(region, self.viewport, design, preference, resolver)?;
        log::debug!(
            "observer: pass fired at scale {:.3} with {} elements",
            update.fit.scale,
            update.elements.len()
        );
        (self.on_update)(&update);
        Ok(true)
    }

    /// Detach from all signals and cancel any pending pass. Safe to call
    /// repeatedly and after the region is gone; no callback will be
    /// invoked once this returns.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.state = DebounceState::Idle;
        log::debug!("observer: released");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

// ===================================================================
// Tests
// ===================================================================
