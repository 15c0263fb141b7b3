//! Scene bounds and the fit-to-view scale.

use crate::geometry::Aabb2;
use crate::Surface;

/// Bounds used when the scene has no surfaces, before padding.
pub const FALLBACK_BOUNDS: Aabb2 = Aabb2::new(-2.0, 2.0, -2.0, 2.0);

/// Padding applied on every side, as a fraction of the axis extent.
pub const BOUNDS_PADDING: f32 = 0.15;

/// Axis extents below this are treated as a zero-size room.
pub const MIN_EXTENT: f32 = 1e-3;

/// Accumulate the unpadded plan bounds of every surface's endpoints.
///
/// Returns [`FALLBACK_BOUNDS`] for an empty slice.
#[must_use]
pub fn raw_bounds(surfaces: &[Surface]) -> Aabb2 {
    if surfaces.is_empty() {
        return FALLBACK_BOUNDS;
    }

    let mut bounds = Aabb2::empty();
    for surface in surfaces {
        let (start, end) = surface.plan_endpoints();
        bounds.include(start);
        bounds.include(end);
    }
    bounds
}

/// Padded plan bounds used to fit the drawing into the viewport.
///
/// A collapsed axis (every endpoint on one line or point) is widened to
/// the fallback extent around its center before padding, so the result
/// always has a positive area.
#[must_use]
pub fn compute_bounds(surfaces: &[Surface]) -> Aabb2 {
    let mut bounds = raw_bounds(surfaces);
    let center = bounds.center();
    let fallback_half_x = FALLBACK_BOUNDS.width() * 0.5;
    let fallback_half_z = FALLBACK_BOUNDS.height() * 0.5;

    if bounds.width() < MIN_EXTENT {
        bounds.min_x = center.x - fallback_half_x;
        bounds.max_x = center.x + fallback_half_x;
    }
    if bounds.height() < MIN_EXTENT {
        bounds.min_z = center.y - fallback_half_z;
        bounds.max_z = center.y + fallback_half_z;
    }

    bounds.padded(BOUNDS_PADDING)
}

/// Scale that fits `bounds` into `fraction` of a `width` x `height` viewport,
/// preserving aspect ratio.
///
/// Returns `None` for a zero-size or non-finite viewport, or when the
/// result would not be a positive finite number.
#[must_use]
pub fn fit_scale(bounds: &Aabb2, width: f32, height: f32, fraction: f32) -> Option<f32> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(height) || !valid(fraction) {
        return None;
    }

    let candidates = [
        (width * fraction, bounds.width()),
        (height * fraction, bounds.height()),
    ];
    let scale = candidates
        .iter()
        .filter(|(_, extent)| valid(*extent))
        .map(|(available, extent)| available / extent)
        .fold(f32::INFINITY, f32::min);

    valid(scale).then_some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene_uses_fallback() {
        assert_eq!(raw_bounds(&[]), Aabb2::new(-2.0, 2.0, -2.0, 2.0));

        let padded = compute_bounds(&[]);
        assert!((padded.min_x - -2.6).abs() < 1e-5);
        assert!((padded.max_x - 2.6).abs() < 1e-5);
        assert!((padded.min_z - -2.6).abs() < 1e-5);
        assert!((padded.max_z - 2.6).abs() < 1e-5);
    }

    #[test]
    fn test_bounds_cover_rotated_walls() {
        let surfaces = vec![
            Surface::wall(0.0, -2.0, 4.0, 0.0).expect("wall"),
            Surface::wall(2.0, 0.0, 4.0, std::f32::consts::FRAC_PI_2).expect("wall"),
        ];
        let bounds = raw_bounds(&surfaces);
        assert!((bounds.min_x - -2.0).abs() < 1e-5);
        assert!((bounds.max_x - 2.0).abs() < 1e-5);
        assert!((bounds.min_z - -2.0).abs() < 1e-5);
        assert!((bounds.max_z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_single_wall_widens_collapsed_axis() {
        let surfaces = vec![Surface::wall(1.0, 3.0, 4.0, 0.0).expect("wall")];
        let bounds = compute_bounds(&surfaces);
        assert!((bounds.width() - 4.0 * 1.3).abs() < 1e-4);
        assert!((bounds.height() - 4.0 * 1.3).abs() < 1e-4);
        assert!((bounds.center().y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_scale_uses_smaller_candidate() {
        let bounds = Aabb2::new(0.0, 10.0, 0.0, 5.0);
        // width: 800 * 0.75 / 10 = 60, height: 600 * 0.75 / 5 = 90
        let scale = fit_scale(&bounds, 800.0, 600.0, 0.75).expect("scale");
        assert!((scale - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_fit_scale_zero_viewport() {
        let bounds = Aabb2::new(0.0, 10.0, 0.0, 5.0);
        assert!(fit_scale(&bounds, 0.0, 600.0, 0.75).is_none());
        assert!(fit_scale(&bounds, 800.0, f32::NAN, 0.75).is_none());
    }
}
