//! Moment-of-inertia helpers for the primitive shapes.
//! Values are about the body origin, matching how every machine positions its shapes
//! relative to a body-centered frame.

use bevy::math::Vec2;

/// Solid or hollow circle: `inner` is 0 for a solid disc.
pub fn moment_for_circle(mass: f32, inner: f32, outer: f32, offset: Vec2) -> f32 {
    mass * (0.5 * (inner * inner + outer * outer) + offset.length_squared())
}

/// Solid box centered on the body origin.
pub fn moment_for_box(mass: f32, width: f32, height: f32) -> f32 {
    mass * (width * width + height * height) / 12.0
}

/// Rounded segment from `a` to `b` with the given radius.
pub fn moment_for_segment(mass: f32, a: Vec2, b: Vec2, radius: f32) -> f32 {
    let offset = a.lerp(b, 0.5);
    // Rounded caps extend the effective length.
    let length = b.distance(a) + 2.0 * radius;
    mass * ((length * length + 4.0 * radius * radius) / 12.0 + offset.length_squared())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_disc_is_half_mr2() {
        let m = moment_for_circle(10.0, 0.0, 15.0, Vec2::ZERO);
        assert!((m - 0.5 * 10.0 * 225.0).abs() < 1e-3);
    }

    #[test]
    fn box_moment_symmetric_in_dimensions() {
        assert_eq!(moment_for_box(2.0, 40.0, 10.0), moment_for_box(2.0, 10.0, 40.0));
        assert!((moment_for_box(12.0, 1.0, 1.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn off_center_segment_is_heavier_than_centered() {
        let centered = moment_for_segment(10.0, Vec2::new(-75.0, 0.0), Vec2::new(75.0, 0.0), 5.0);
        let shifted = moment_for_segment(10.0, Vec2::ZERO, Vec2::new(-150.0, 0.0), 5.0);
        assert!(shifted > centered);
        // Parallel axis term: m * 75^2
        assert!((shifted - centered - 10.0 * 75.0 * 75.0).abs() < 1.0);
    }
}
