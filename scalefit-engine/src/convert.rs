//! Style-value conversion for migrating absolute-pixel content.
//!
//! Templates authored before responsive scaling carry raw pixel sizes.
//! These one-shot, stateless helpers map such a value onto the nearest
//! discrete typographic tier, or onto a computed clamp band when no
//! tier is a good match.

use scalefit_core::ClampTriple;

/// Width the factor of [`to_responsive_value`] is expressed against.
const FACTOR_REFERENCE_WIDTH: f32 = 1920.0;

/// Tier thresholds: a pixel value at or below the bound maps to the
/// tier; anything above the last bound is `xxl`.
const TIER_BOUNDS: [(f32, &str); 5] = [
    (16.0, "xs"),
    (24.0, "sm"),
    (32.0, "md"),
    (44.0, "lg"),
    (64.0, "xl"),
];

/// Map an absolute pixel size onto the nearest typographic tier name.
pub fn to_scale_step(pixel_value: f32) -> &'static str {
    for (bound, name) in TIER_BOUNDS {
        if pixel_value <= bound {
            return name;
        }
    }
    "xxl"
}

/// Express an absolute pixel size as a clamp band for values with no
/// good discrete tier match: ±25% around the authored value, preferred
/// value restated as a viewport factor of a 1920-wide reference.
pub fn to_responsive_value(pixel_value: f32) -> ClampTriple {
    let factor = pixel_value / FACTOR_REFERENCE_WIDTH * 100.0;
    ClampTriple::new(
        pixel_value * 0.75,
        factor * (FACTOR_REFERENCE_WIDTH / 100.0),
        pixel_value * 1.25,
    )
}

// ===================================================================
// Tests
// ===================================================================
