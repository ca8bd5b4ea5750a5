//! Scale-property derivation.
//!
//! Turns a solved [`FitResult`] into the named responsive values a host
//! writes onto its style surface: a typographic ladder (`--type-xs` …
//! `--type-xxl`) and a spacing ladder (`--space-1` … `--space-10`).
//! Each value is a [`ClampTriple`]: floor, viewport-relative preferred
//! value, ceiling. Pure arithmetic; deterministic for identical inputs.

use rustc_hash::FxHashMap;
use scalefit_core::{ClampTriple, FitResult, ScaleStep};

/// Typographic tier names, smallest to largest.
pub const TIER_NAMES: [&str; 6] = ["xs", "sm", "md", "lg", "xl", "xxl"];

/// Default typographic ladder: (viewport factor, pixel floor, pixel
/// ceiling) per tier. One factor unit is 1% of the fitted width.
pub const TYPE_SCALE: [(&str, ScaleStep); 6] = [
    ("xs", ScaleStep::new(0.8, 10.0, 16.0)),
    ("sm", ScaleStep::new(1.0, 12.0, 20.0)),
    ("md", ScaleStep::new(1.4, 14.0, 28.0)),
    ("lg", ScaleStep::new(1.9, 18.0, 40.0)),
    ("xl", ScaleStep::new(2.6, 24.0, 56.0)),
    ("xxl", ScaleStep::new(3.5, 32.0, 80.0)),
];

/// Default spacing unit in design pixels.
pub const BASE_SPACING: f32 = 8.0;

/// Number of spacing ladder steps.
pub const SPACING_STEPS: u32 = 10;

/// Named responsive values derived from one fit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScaleProperties {
    values: FxHashMap<String, ClampTriple>,
}

impl ScaleProperties {
    /// Derive the full property set for a fit, using the default
    /// typographic ladder and a multiplier of 1.
    pub fn from_fit(fit: &FitResult) -> Self {
        Self::derive(fit, &TYPE_SCALE, 1.0)
    }

    /// Derive typographic and spacing values for `fit`.
    ///
    /// Typographic tier: `clamp(min·m, factor·m·vw, max·m)` with `vw` =
    /// 1% of the fitted width. Spacing step i: `clamp(base·i·0.5,
    /// base·i·scale, base·i·1.5)`, anchored to the fitted rectangle's
    /// vmin scale, which for a uniform letterbox fit equals `fit.scale`.
    pub fn derive(fit: &FitResult, steps: &[(&str, ScaleStep)], multiplier: f32) -> Self {
        let mut values =
            FxHashMap::with_capacity_and_hasher(steps.len() + SPACING_STEPS as usize, Default::default());

        let vw = fit.width / 100.0;
        for (name, step) in steps {
            values.insert(
                format!("--type-{name}"),
                ClampTriple::new(
                    step.min_px * multiplier,
                    step.viewport_factor * multiplier * vw,
                    step.max_px * multiplier,
                ),
            );
        }

        for i in 1..=SPACING_STEPS {
            let base = BASE_SPACING * i as f32;
            values.insert(
                format!("--space-{i}"),
                ClampTriple::new(base * 0.5, base * fit.scale, base * 1.5),
            );
        }

        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ClampTriple> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClampTriple)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scalefit_core::Orientation;

    fn fit_with(width: f32, height: f32, scale: f32) -> FitResult {
        FitResult {
            width,
            height,
            scale,
            orientation: Orientation::Landscape,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    #[test]
    fn test_full_ladder_present() {
        let props = ScaleProperties::from_fit(&fit_with(1920.0, 1080.0, 1.0));
        for tier in TIER_NAMES {
            assert!(props.get(&format!("--type-{tier}")).is_some(), "{tier}");
        }
        for i in 1..=SPACING_STEPS {
            assert!(props.get(&format!("--space-{i}")).is_some(), "step {i}");
        }
        assert_eq!(props.len(), 16);
    }

    #[test]
    fn test_reference_width_resolves_preferred() {
        // At the reference width, 1 factor unit = 19.2 px, so md (1.4)
        // prefers 26.88 px, inside its [14, 28] band.
        let props = ScaleProperties::from_fit(&fit_with(1920.0, 1080.0, 1.0));
        let md = props.get("--type-md").unwrap();
        assert!((md.resolve() - 26.88).abs() < 1e-3);
    }

    #[test]
    fn test_resolved_never_outside_band_degenerate_scales() {
        for fit in [
            fit_with(0.0, 0.0, 0.0),
            fit_with(192_000.0, 108_000.0, 100.0),
            fit_with(1.0, 1.0, 0.001),
        ] {
            let props = ScaleProperties::from_fit(&fit);
            for (name, step) in &TYPE_SCALE {
                let triple = props.get(&format!("--type-{name}")).unwrap();
                let value = triple.resolve();
                assert!(value >= step.min_px, "{name} at scale {}", fit.scale);
                assert!(value <= step.max_px, "{name} at scale {}", fit.scale);
            }
        }
    }

    #[test]
    fn test_multiplier_scales_band_and_preferred() {
        let fit = fit_with(1920.0, 1080.0, 1.0);
        let single = ScaleProperties::derive(&fit, &TYPE_SCALE, 1.0);
        let double = ScaleProperties::derive(&fit, &TYPE_SCALE, 2.0);
        let a = single.get("--type-lg").unwrap();
        let b = double.get("--type-lg").unwrap();
        assert!((b.min - 2.0 * a.min).abs() < 1e-4);
        assert!((b.preferred - 2.0 * a.preferred).abs() < 1e-4);
        assert!((b.max - 2.0 * a.max).abs() < 1e-4);
    }

    #[test]
    fn test_spacing_tracks_scale_within_band() {
        // Unity scale: preferred equals the design-space value.
        let props = ScaleProperties::from_fit(&fit_with(1920.0, 1080.0, 1.0));
        let s3 = props.get("--space-3").unwrap();
        assert!((s3.resolve() - 24.0).abs() < 1e-4);

        // Half scale: clamped at the 0.5x floor exactly.
        let props = ScaleProperties::from_fit(&fit_with(960.0, 540.0, 0.5));
        let s3 = props.get("--space-3").unwrap();
        assert!((s3.resolve() - 12.0).abs() < 1e-4);

        // Huge scale: clamped at the 1.5x ceiling.
        let props = ScaleProperties::from_fit(&fit_with(19_200.0, 10_800.0, 10.0));
        let s3 = props.get("--space-3").unwrap();
        assert!((s3.resolve() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_derive_deterministic() {
        let fit = fit_with(1280.0, 720.0, 0.6667);
        let a = ScaleProperties::from_fit(&fit);
        let b = ScaleProperties::from_fit(&fit);
        assert_eq!(a, b);
    }
}
