//! Scaling orchestrator: one pass over a target region.
//!
//! Ties the solver, the scale-property derivation, and the text fitter
//! together for a single region update:
//!
//! ```text
//!  viewport ──▸ solver ──▸ FitResult ──▸ transform + scale properties
//!                                              │
//!                                     per fittable child
//!                                              │
//!                            policy resolver ──▸ text fitter
//! ```
//!
//! The fan-out over children is best-effort: a child whose surface is
//! gone or whose fit fails is recorded and logged, and never blocks its
//! siblings.

use rustc_hash::FxHashMap;
use scalefit_core::{
    FitPolicy, FitResult, OrientationPreference, ReferenceDesign, TextFitMode, TextFitOutcome,
    Viewport,
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::fitter::{self, FitterError, MeasureSurface};
use crate::scale::ScaleProperties;
use crate::solver::{self, SolveError};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApplyError {
    #[error("dimension solve failed: {0}")]
    Solve(#[from] SolveError),
}

// ── Host region surface ─────────────────────────────────────────────

/// Visual transform written onto the region: translate by the centering
/// offsets, then scale, anchored at the top-left corner so unscaled
/// child coordinates remain valid design-space coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionTransform {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl RegionTransform {
    pub fn from_fit(fit: &FitResult) -> Self {
        Self {
            offset_x: fit.offset_x,
            offset_y: fit.offset_y,
            scale: fit.scale,
        }
    }
}

/// A fittable text child as enumerated by the host.
#[derive(Clone, Debug)]
pub struct TextChild {
    pub id: Uuid,
    pub content: String,
    /// Authored font size in pixels.
    pub font_size: f32,
}

/// The style surface of one target region, provided by the host.
pub trait TargetRegion {
    /// Write the region's visual transform.
    fn set_transform(&mut self, transform: RegionTransform);

    /// Write one derived scale value into a named style slot
    /// (CSS custom property or equivalent).
    fn set_scale_property(&mut self, name: &str, value: scalefit_core::ClampTriple);

    /// Enumerate the fittable text children within the region.
    fn fittable_children(&self) -> Vec<TextChild>;

    /// Borrow the measurement surface for one child. `None` when the
    /// child has been detached since enumeration.
    fn measure_surface(&mut self, id: Uuid) -> Option<&mut dyn MeasureSurface>;
}

// ── Per-element policy resolution ───────────────────────────────────

/// Per-element fit configuration, as recognized at the host boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementFitConfig {
    pub mode: TextFitMode,
    pub min_font_size_px: f32,
    pub max_reduction_percent: f32,
}

impl Default for ElementFitConfig {
    fn default() -> Self {
        Self {
            mode: TextFitMode::Auto,
            min_font_size_px: 12.0,
            max_reduction_percent: 30.0,
        }
    }
}

impl ElementFitConfig {
    /// Convert to the fitter's policy. `auto` prefers word wrap,
    /// `shrink` goes straight to font reduction.
    pub fn to_policy(&self) -> FitPolicy {
        FitPolicy {
            max_reduction_fraction: self.max_reduction_percent / 100.0,
            min_font_size_px: self.min_font_size_px,
            prefer_word_wrap: self.mode == TextFitMode::Auto,
            ..FitPolicy::default()
        }
    }
}

/// Per-element policy lookup. Replaces attribute scraping: the
/// orchestrator asks for the configuration instead of reading it off
/// markup.
pub trait FitPolicyResolver {
    fn resolve(&self, id: Uuid) -> ElementFitConfig;
}

/// Every element gets the same configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformResolver(pub ElementFitConfig);

impl FitPolicyResolver for UniformResolver {
    fn resolve(&self, _id: Uuid) -> ElementFitConfig {
        self.0
    }
}

/// Resolver over per-element JSON configuration maps, with the keys
/// `textFit`, `minFontSizePixels` and `maxReductionPercent`. Unknown or
/// missing keys fall back to the defaults.
#[derive(Clone, Debug, Default)]
pub struct JsonConfigResolver {
    configs: FxHashMap<Uuid, Value>,
}

impl JsonConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Uuid, config: Value) {
        self.configs.insert(id, config);
    }

    fn parse(value: &Value) -> ElementFitConfig {
        let mut config = ElementFitConfig::default();
        if let Some(mode) = value.get("textFit").and_then(Value::as_str) {
            match mode {
                "auto" => config.mode = TextFitMode::Auto,
                "shrink" => config.mode = TextFitMode::Shrink,
                "wrap" => config.mode = TextFitMode::Wrap,
                "ellipsis" => config.mode = TextFitMode::Ellipsis,
                "none" => config.mode = TextFitMode::None,
                other => log::warn!("unknown textFit mode '{other}', using auto"),
            }
        }
        if let Some(px) = value.get("minFontSizePixels").and_then(Value::as_f64) {
            config.min_font_size_px = px as f32;
        }
        if let Some(pct) = value.get("maxReductionPercent").and_then(Value::as_f64) {
            config.max_reduction_percent = pct as f32;
        }
        config
    }
}

impl FitPolicyResolver for JsonConfigResolver {
    fn resolve(&self, id: Uuid) -> ElementFitConfig {
        self.configs
            .get(&id)
            .map(Self::parse)
            .unwrap_or_default()
    }
}

// ── Apply ───────────────────────────────────────────────────────────

/// What happened to one fittable child during an apply pass.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementOutcome {
    /// The fitting search ran to a terminal state.
    Fitted(TextFitOutcome),
    /// The mode bypasses the search; static style rules handle it.
    Static(TextFitMode),
    /// The child could not be fitted at all.
    Failed(FitterError),
}

/// Result bundle of one apply pass over a region.
#[derive(Clone, Debug)]
pub struct LayoutUpdate {
    pub fit: FitResult,
    pub properties: ScaleProperties,
    pub elements: FxHashMap<Uuid, ElementOutcome>,
}

impl LayoutUpdate {
    /// Count of children whose content did not fit after best effort.
    pub fn overflow_count(&self) -> usize {
        self.elements
            .values()
            .filter(|o| matches!(o, ElementOutcome::Fitted(f) if !f.fits))
            .count()
    }
}

/// Run one full scaling pass over `region`.
///
/// Solves the fit, writes the transform and the derived scale
/// properties, then runs the text fitter over every fittable child with
/// its individually resolved policy. Only a failed solve aborts the
/// pass; per-child failures are recorded in the returned bundle.
pub fn apply(
    region: &mut dyn TargetRegion,
    viewport: Viewport,
    design: &ReferenceDesign,
    preference: OrientationPreference,
    resolver: &dyn FitPolicyResolver,
) -> Result<LayoutUpdate, ApplyError> {
    let fit = solver::solve(viewport, design, preference)?;

    region.set_transform(RegionTransform::from_fit(&fit));

    let properties = ScaleProperties::from_fit(&fit);
    for (name, value) in properties.iter() {
        region.set_scale_property(name, *value);
    }

    let children = region.fittable_children();
    let mut elements =
        FxHashMap::with_capacity_and_hasher(children.len(), Default::default());

    for child in children {
        let config = resolver.resolve(child.id);
        let outcome = match config.mode {
            TextFitMode::Wrap | TextFitMode::Ellipsis | TextFitMode::None => {
                ElementOutcome::Static(config.mode)
            }
            TextFitMode::Auto | TextFitMode::Shrink => match region.measure_surface(child.id) {
                Some(surface) => {
                    match fitter::fit(surface, &child.content, child.font_size, &config.to_policy())
                    {
                        Ok(outcome) => ElementOutcome::Fitted(outcome),
                        Err(e) => {
                            log::warn!("element {} fit failed: {e}", child.id);
                            ElementOutcome::Failed(e)
                        }
                    }
                }
                None => {
                    log::warn!("element {} detached before fitting", child.id);
                    ElementOutcome::Failed(FitterError::MeasurementUnavailable)
                }
            },
        };
        elements.insert(child.id, outcome);
    }

    log::debug!(
        "apply: scale {:.3}, {} children, {} overflowing",
        fit.scale,
        elements.len(),
        elements
            .values()
            .filter(|o| matches!(o, ElementOutcome::Fitted(f) if !f.fits))
            .count()
    );

    Ok(LayoutUpdate {
        fit,
        properties,
        elements,
    })
}

// ===================================================================
// Tests
// ===================================================================
