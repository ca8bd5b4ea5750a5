//! Dimension solver: letterbox fit of a reference design into a viewport.
//!
//! Pure function of its arguments. Given the current viewport, the fixed
//! reference design, and an orientation preference, computes the largest
//! rectangle with the (orientation-appropriate) reference aspect ratio
//! that fits entirely inside the viewport, plus the uniform scale factor
//! and the offsets that center it.

use scalefit_core::{FitResult, Orientation, OrientationPreference, ReferenceDesign, Viewport};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("invalid viewport: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

/// Resolve the effective orientation for a viewport.
///
/// `Auto` derives from the viewport's own aspect ratio; a square
/// viewport resolves to landscape.
pub fn resolve_orientation(viewport: Viewport, preference: OrientationPreference) -> Orientation {
    match preference {
        OrientationPreference::Landscape => Orientation::Landscape,
        OrientationPreference::Portrait => Orientation::Portrait,
        OrientationPreference::Auto => {
            if viewport.aspect_ratio() > 1.0 {
                Orientation::Landscape
            } else if viewport.aspect_ratio() < 1.0 {
                Orientation::Portrait
            } else {
                Orientation::Landscape
            }
        }
    }
}

/// Compute the best-fit rectangle for `design` inside `viewport`.
///
/// The reference rectangle is rotated 90° when the effective orientation
/// is portrait. Fitting never crops: the wider of the two aspect ratios
/// decides which viewport axis is filled, and the other axis is derived
/// from the target aspect. Offsets center the fitted rectangle and are
/// always non-negative.
pub fn solve(
    viewport: Viewport,
    design: &ReferenceDesign,
    preference: OrientationPreference,
) -> Result<FitResult, SolveError> {
    if !viewport.is_valid() {
        return Err(SolveError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let orientation = resolve_orientation(viewport, preference);

    // Reference dimensions in the effective orientation.
    let (target_w, target_h) = match orientation {
        Orientation::Landscape => (design.width, design.height),
        Orientation::Portrait => (design.height, design.width),
    };
    let target_aspect = target_w / target_h;

    // Letterbox fit: fill the axis the viewport is relatively tighter on.
    // Ties (exactly equal aspect) fall into the full-height branch and
    // produce a zero-offset exact fit.
    let (fitted_w, fitted_h) = if viewport.aspect_ratio() >= target_aspect {
        let h = viewport.height;
        (h * target_aspect, h)
    } else {
        let w = viewport.width;
        (w, w / target_aspect)
    };

    // Uniform by construction: fitted_w / target_w == fitted_h / target_h.
    let scale = fitted_w / target_w;

    Ok(FitResult {
        width: fitted_w,
        height: fitted_h,
        scale,
        orientation,
        offset_x: (viewport.width - fitted_w) / 2.0,
        offset_y: (viewport.height - fitted_h) / 2.0,
    })
}

// ===================================================================
// Tests
// ===================================================================
