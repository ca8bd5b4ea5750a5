//! Text fitter: bounded wrap/shrink search over a host measurement surface.
//!
//! The engine never shapes or measures text itself. The host exposes a
//! synchronous request/observe cycle through [`MeasureSurface`]: apply a
//! candidate font size and wrap mode, then report the re-measured content
//! extents. The fitter drives that cycle with a deterministic search:
//!
//! 1. word-wrap at the original size (if allowed and the content can wrap),
//! 2. proportional single-line shrink by a fixed multiplicative step,
//! 3. hybrid re-wrap at the reduced size.
//!
//! The search is bounded by `max_iterations` and by the policy's size
//! floor, so it terminates even against a misbehaving host. A content box
//! that still overflows at the end is reported as `fits: false`, which is
//! a valid best-effort outcome, not an error.

use scalefit_core::{FitMethod, FitPolicy, PolicyError, TextFitOutcome};
use thiserror::Error;

// ── Host measurement capability ─────────────────────────────────────

/// Whitespace handling requested from the host for a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    /// Single line; content width grows without limit.
    NoWrap,
    /// Break at whitespace within the box width.
    Wrap,
}

/// Content extents reported by the host after the most recent candidate
/// was applied. Content dimensions are scroll extents; box dimensions
/// are the fixed layout box the content must fit into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub content_width: f32,
    pub content_height: f32,
    pub box_width: f32,
    pub box_height: f32,
}

impl Measurement {
    /// Content contained on both axes.
    pub fn fits(&self) -> bool {
        self.content_width <= self.box_width && self.content_height <= self.box_height
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The host cannot measure right now, e.g. the element is detached.
    #[error("element cannot be measured")]
    Unavailable,
}

/// The synchronous mutate-then-measure cycle a host rendering surface
/// must provide for each fittable element.
pub trait MeasureSurface {
    /// Apply a candidate font size and wrap mode. Effects are observable
    /// through the next [`measure`](Self::measure) call.
    fn apply_candidate(&mut self, font_size: f32, wrap: WrapMode) -> Result<(), MeasureError>;

    /// Report content and box extents for the most recent candidate.
    fn measure(&mut self) -> Result<Measurement, MeasureError>;
}

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitterError {
    #[error("invalid fit policy: {0}")]
    InvalidPolicy(#[from] PolicyError),
    /// No measurement at all could be taken for the element.
    #[error("measurement unavailable")]
    MeasurementUnavailable,
}

// ── Fitting search ──────────────────────────────────────────────────

/// Tracks the last state that was successfully applied and measured, so
/// a mid-search measurement failure can still report honestly.
struct SearchState {
    method: FitMethod,
    size: f32,
    measured: Measurement,
    iterations: u32,
}

impl SearchState {
    fn outcome(&self, original_size: f32) -> TextFitOutcome {
        TextFitOutcome {
            method: self.method,
            final_font_size: self.size,
            reduction_fraction: (original_size - self.size) / original_size,
            fits: self.measured.fits(),
            iterations: self.iterations,
        }
    }
}

fn step(
    surface: &mut dyn MeasureSurface,
    size: f32,
    wrap: WrapMode,
) -> Result<Measurement, MeasureError> {
    surface.apply_candidate(size, wrap)?;
    surface.measure()
}

/// Run the fitting search for one element.
///
/// `content` is the element's text (used only to decide wrappability),
/// `original_size` its authored font size in pixels. The search never
/// increases the size, never goes below `policy.floor(original_size)`,
/// and takes the same iteration count for identical inputs.
///
/// A measurement failure on the very first cycle is returned as
/// [`FitterError::MeasurementUnavailable`]; one later in the search
/// halts immediately and reports the last successfully measured state.
pub fn fit(
    surface: &mut dyn MeasureSurface,
    content: &str,
    original_size: f32,
    policy: &FitPolicy,
) -> Result<TextFitOutcome, FitterError> {
    policy.validate()?;

    let floor = policy.floor(original_size);

    // Baseline: original size, single line.
    let baseline = step(surface, original_size, WrapMode::NoWrap)
        .map_err(|_| FitterError::MeasurementUnavailable)?;

    let mut state = SearchState {
        method: FitMethod::Unchanged,
        size: original_size,
        measured: baseline,
        iterations: 0,
    };

    // Already fits, or no room to shrink: nothing to search.
    if baseline.fits() || original_size <= floor {
        log::trace!(
            "fit: unchanged at {original_size}px (fits={})",
            baseline.fits()
        );
        return Ok(state.outcome(original_size));
    }

    let wrappable = policy.prefer_word_wrap && content.contains(char::is_whitespace);

    // Step 1: wrapping alone, at the original size.
    if wrappable {
        match step(surface, original_size, WrapMode::Wrap) {
            Ok(m) if m.fits() => {
                state.method = FitMethod::WordWrap;
                state.measured = m;
                log::debug!("fit: word wrap sufficed at {original_size}px");
                return Ok(state.outcome(original_size));
            }
            Ok(_) => {
                // Overflows even wrapped; fall through to reduction.
            }
            Err(MeasureError::Unavailable) => return Ok(state.outcome(original_size)),
        }

        // Back to a single line for the reduction loop.
        match step(surface, original_size, WrapMode::NoWrap) {
            Ok(m) => state.measured = m,
            Err(MeasureError::Unavailable) => return Ok(state.outcome(original_size)),
        }
    }

    // Step 2: proportional reduction, single line.
    state.method = FitMethod::FontReduction;
    while state.measured.content_width > state.measured.box_width
        && state.size > floor
        && state.iterations < policy.max_iterations
    {
        let next = (state.size * (1.0 - policy.step_fraction)).max(floor);
        state.iterations += 1;
        match step(surface, next, WrapMode::NoWrap) {
            Ok(m) => {
                state.size = next;
                state.measured = m;
            }
            Err(MeasureError::Unavailable) => {
                log::warn!("fit: measurement lost after {} iterations", state.iterations);
                state.iterations -= 1;
                return Ok(state.outcome(original_size));
            }
        }
    }

    // Step 3: still overflowing on a single line; re-enable wrapping at
    // the reduced size when the policy allows it.
    if !state.measured.fits() && wrappable {
        match step(surface, state.size, WrapMode::Wrap) {
            Ok(m) => {
                state.method = FitMethod::Hybrid;
                state.measured = m;
            }
            Err(MeasureError::Unavailable) => return Ok(state.outcome(original_size)),
        }
    }

    log::debug!(
        "fit: {:?} {}px -> {}px in {} iterations (fits={})",
        state.method,
        original_size,
        state.size,
        state.iterations,
        state.measured.fits()
    );
    Ok(state.outcome(original_size))
}

// ── Character-grid surface ──────────────────────────────────────────

/// Deterministic [`MeasureSurface`] over a monospace character model.
///
/// Approximates each glyph as `font_size × CHAR_ASPECT` wide and each
/// line as `font_size × LINE_FACTOR` tall, with greedy word wrapping.
/// Used for headless estimation, benchmarks, and tests; a real host
/// replaces this with actual rendered extents.
#[derive(Clone, Debug)]
pub struct CharGridSurface {
    words: Vec<usize>,
    total_chars: usize,
    box_width: f32,
    box_height: f32,
    font_size: f32,
    wrap: WrapMode,
    detach_after: Option<u32>,
    measures: u32,
}

impl CharGridSurface {
    pub const CHAR_ASPECT: f32 = 0.6;
    pub const LINE_FACTOR: f32 = 1.2;

    pub fn new(content: &str, box_width: f32, box_height: f32) -> Self {
        Self {
            words: content.split_whitespace().map(str::len).collect(),
            total_chars: content.chars().count(),
            box_width,
            box_height,
            font_size: 0.0,
            wrap: WrapMode::NoWrap,
            detach_after: None,
            measures: 0,
        }
    }

    /// Report `Unavailable` from every call after the n-th successful
    /// measurement. `detach_after(0)` fails immediately.
    pub fn detach_after(mut self, measures: u32) -> Self {
        self.detach_after = Some(measures);
        self
    }

    fn line_count(&self, capacity: usize) -> (usize, usize) {
        // Greedy wrap; returns (lines, longest line in chars). A word
        // longer than the capacity still occupies one overlong line.
        let mut lines = 0;
        let mut longest = 0;
        let mut current = 0;
        for &len in &self.words {
            let needed = if current == 0 { len } else { current + 1 + len };
            if current > 0 && needed > capacity {
                lines += 1;
                longest = longest.max(current);
                current = len;
            } else {
                current = needed;
            }
        }
        if current > 0 || self.words.is_empty() {
            lines += 1;
            longest = longest.max(current);
        }
        (lines, longest)
    }
}

impl MeasureSurface for CharGridSurface {
    fn apply_candidate(&mut self, font_size: f32, wrap: WrapMode) -> Result<(), MeasureError> {
        if self.detach_after == Some(0) && self.measures == 0 {
            return Err(MeasureError::Unavailable);
        }
        self.font_size = font_size;
        self.wrap = wrap;
        Ok(())
    }

    fn measure(&mut self) -> Result<Measurement, MeasureError> {
        if let Some(limit) = self.detach_after {
            if self.measures >= limit {
                return Err(MeasureError::Unavailable);
            }
        }
        self.measures += 1;

        let char_w = self.font_size * Self::CHAR_ASPECT;
        let (content_width, content_height) = match self.wrap {
            WrapMode::NoWrap => (
                self.total_chars as f32 * char_w,
                self.font_size * Self::LINE_FACTOR,
            ),
            WrapMode::Wrap => {
                let capacity = (self.box_width / char_w).floor() as usize;
                let (lines, longest) = self.line_count(capacity.max(1));
                (
                    longest as f32 * char_w,
                    lines as f32 * self.font_size * Self::LINE_FACTOR,
                )
            }
        };

        Ok(Measurement {
            content_width,
            content_height,
            box_width: self.box_width,
            box_height: self.box_height,
        })
    }
}

// ===================================================================
// Tests
// ===================================================================
