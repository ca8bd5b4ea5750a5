//! # scalefit-engine — layout fitting for fixed-design display templates
//!
//! Renders-agnostic core for keeping data-driven display templates
//! (timing boards, scoreboards, signage) legible on viewports of
//! unknown, changing size. A template is authored once at a reference
//! resolution; this engine letterbox-fits it to the actual surface and
//! deterministically wraps/shrinks each text region so content never
//! overflows its box.
//!
//! ## Data flow
//!
//! ```text
//!  resize / orientation signals
//!            │
//!            ▼
//!     ObserverHandle (debounce, trailing edge)
//!            │
//!            ▼
//!     orchestrator::apply
//!       ├─ solver::solve ─────────▸ FitResult (scale + offsets)
//!       ├─ ScaleProperties ───────▸ named clamp bands on the region
//!       └─ fitter::fit per child ─▸ TextFitOutcome per element
//!            │
//!            ▼
//!     LayoutUpdate ──▸ caller callback
//! ```
//!
//! ## Modules
//!
//! - [`solver`] — letterbox fit of the reference design into a viewport
//! - [`scale`] — typographic and spacing clamp bands derived per fit
//! - [`fitter`] — bounded wrap/shrink search over a host measurement
//!   surface
//! - [`orchestrator`] — one best-effort pass over a region and its
//!   fittable children
//! - [`observer`] — cooperative debounce state machine driving re-fits
//! - [`convert`] — migration of absolute-pixel values to scale tiers
//!
//! The engine performs no text shaping and owns no rendering surface;
//! hosts plug in through [`fitter::MeasureSurface`] and
//! [`orchestrator::TargetRegion`].

pub mod convert;
pub mod fitter;
pub mod observer;
pub mod orchestrator;
pub mod scale;
pub mod solver;

// Re-exports for convenience
pub use fitter::{CharGridSurface, FitterError, MeasureError, MeasureSurface, Measurement, WrapMode};
pub use observer::{ObserverConfig, ObserverHandle, SignalKind};
pub use orchestrator::{
    ApplyError, ElementFitConfig, ElementOutcome, FitPolicyResolver, JsonConfigResolver,
    LayoutUpdate, RegionTransform, TargetRegion, TextChild, UniformResolver,
};
pub use scale::{ScaleProperties, BASE_SPACING, TYPE_SCALE};
pub use scalefit_core::{
    ClampTriple, FitMethod, FitPolicy, FitResult, Orientation, OrientationPreference, PolicyError,
    ReferenceDesign, ScaleStep, TextFitMode, TextFitOutcome, Viewport,
};
pub use solver::{resolve_orientation, solve, SolveError};
