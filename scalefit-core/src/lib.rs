//! Shared data model for the scalefit engine.
//!
//! Plain value types exchanged between the engine crate and its host:
//! viewport/design geometry, fit results, scale-value descriptions, and
//! per-element text-fitting policy and outcomes. Everything here is
//! serde-serializable; templates are authored documents and the caller
//! owns persistence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Geometry ────────────────────────────────────────────────────────

/// Current size of the rendering surface, sampled on every observed
/// change event. Supplied per call; never stored by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// A viewport is usable only with strictly positive, finite dimensions.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The fixed authoring resolution a template was designed for
/// (e.g. 1920×1080). Created once at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDesign {
    pub width: f32,
    pub height: f32,
}

impl ReferenceDesign {
    /// Standard 1080p landscape reference.
    pub const FULL_HD: ReferenceDesign = ReferenceDesign {
        width: 1920.0,
        height: 1080.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for ReferenceDesign {
    fn default() -> Self {
        Self::FULL_HD
    }
}

// ── Orientation ─────────────────────────────────────────────────────

/// Caller preference for how the reference rectangle is oriented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationPreference {
    Landscape,
    Portrait,
    /// Derive from the viewport's own aspect ratio.
    Auto,
}

impl Default for OrientationPreference {
    fn default() -> Self {
        Self::Auto
    }
}

/// Resolved orientation of a fitted rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

// ── Fit result ──────────────────────────────────────────────────────

/// Output of the dimension solver: the letterbox-fitted rectangle, its
/// uniform scale relative to the reference design, and the offsets that
/// center it in the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Fitted rectangle width in viewport pixels.
    pub width: f32,
    /// Fitted rectangle height in viewport pixels.
    pub height: f32,
    /// Uniform scale factor relative to the (orientation-appropriate)
    /// reference rectangle.
    pub scale: f32,
    pub orientation: Orientation,
    /// Letterbox/pillarbox centering offsets; never negative.
    pub offset_x: f32,
    pub offset_y: f32,
}

// ── Scale values ────────────────────────────────────────────────────

/// A (floor, viewport-relative preferred, ceiling) value description.
/// Never resolves outside `[min, max]` regardless of viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClampTriple {
    pub min: f32,
    pub preferred: f32,
    pub max: f32,
}

impl ClampTriple {
    pub fn new(min: f32, preferred: f32, max: f32) -> Self {
        Self { min, preferred, max }
    }

    /// Realized pixel value: the preferred value clamped into the band.
    pub fn resolve(&self) -> f32 {
        self.preferred.clamp(self.min, self.max)
    }
}

/// Definition of one named typographic tier. The realized size for
/// multiplier `m` is `clamp(min_px·m, viewport_factor·m·vw, max_px·m)`
/// where `vw` is 1% of the fitted rectangle width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleStep {
    pub viewport_factor: f32,
    pub min_px: f32,
    pub max_px: f32,
}

impl ScaleStep {
    pub const fn new(viewport_factor: f32, min_px: f32, max_px: f32) -> Self {
        Self {
            viewport_factor,
            min_px,
            max_px,
        }
    }
}

// ── Text fitting ────────────────────────────────────────────────────

/// Per-element configuration governing how aggressively text may shrink
/// or wrap. Read-only to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitPolicy {
    /// Largest allowed reduction as a fraction of the original size,
    /// in `(0, 1]`. The hard pixel floor always wins over this.
    pub max_reduction_fraction: f32,
    /// Hard lower bound on font size in pixels.
    pub min_font_size_px: f32,
    /// Try word-wrapping before shrinking, and re-wrap as a fallback.
    pub prefer_word_wrap: bool,
    /// Multiplicative shrink per iteration, in `(0, 1)`.
    pub step_fraction: f32,
    /// Hard bound on reduction-loop iterations.
    pub max_iterations: u32,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            max_reduction_fraction: 0.30,
            min_font_size_px: 12.0,
            prefer_word_wrap: true,
            step_fraction: 0.02,
            max_iterations: 50,
        }
    }
}

impl FitPolicy {
    /// Check the numeric ranges required for the fitting loop to
    /// terminate and stay meaningful.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(self.step_fraction > 0.0 && self.step_fraction < 1.0) {
            return Err(PolicyError::StepFraction(self.step_fraction));
        }
        if !(self.min_font_size_px > 0.0) {
            return Err(PolicyError::MinFontSize(self.min_font_size_px));
        }
        if !(self.max_reduction_fraction > 0.0 && self.max_reduction_fraction <= 1.0) {
            return Err(PolicyError::MaxReduction(self.max_reduction_fraction));
        }
        Ok(())
    }

    /// Effective size floor for a given original size: the pixel floor
    /// always wins over the fractional cap.
    pub fn floor(&self, original_size: f32) -> f32 {
        self.min_font_size_px
            .max(original_size * (1.0 - self.max_reduction_fraction))
    }
}

/// Out-of-range [`FitPolicy`] field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("step_fraction must be in (0, 1), got {0}")]
    StepFraction(f32),
    #[error("min_font_size_px must be positive, got {0}")]
    MinFontSize(f32),
    #[error("max_reduction_fraction must be in (0, 1], got {0}")]
    MaxReduction(f32),
}

/// Per-element `textFit` mode. `Auto` and `Shrink` run the fitting
/// search; the rest are handled by static style rules in the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFitMode {
    Auto,
    Shrink,
    Wrap,
    Ellipsis,
    None,
}

impl Default for TextFitMode {
    fn default() -> Self {
        Self::Auto
    }
}

/// Which strategy ultimately produced the fitted state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitMethod {
    /// Content already fit (or the size was already at the floor).
    Unchanged,
    /// Wrapping alone was enough; no size change.
    WordWrap,
    /// Proportional shrink, single line.
    FontReduction,
    /// Shrink followed by a re-wrap at the reduced size.
    Hybrid,
}

/// Terminal state of one text-fitting run. `fits: false` is a valid
/// best-effort outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextFitOutcome {
    pub method: FitMethod,
    pub final_font_size: f32,
    /// `(original - final) / original`, in `[0, max_reduction_fraction]`.
    pub reduction_fraction: f32,
    /// Whether the content box contains the content on both axes after
    /// the final measurement.
    pub fits: bool,
    /// Reduction-loop iterations taken.
    pub iterations: u32,
}

// ===================================================================
// Tests
// ===================================================================
