//! Values a transform can move between

use glam::{Vec2, Vec3};

/// Trait for types that support linear interpolation between two states
pub trait Interpolate: Clone + 'static {
    /// Value `t` of the way from `start` to `end`. `t` is eased progress and
    /// may leave `0.0..=1.0` for overshooting curves.
    fn interpolate(start: &Self, end: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(start: &Self, end: &Self, t: f64) -> Self {
        start + (end - start) * t
    }
}

impl Interpolate for f32 {
    fn interpolate(start: &Self, end: &Self, t: f64) -> Self {
        start + (end - start) * t as f32
    }
}

impl Interpolate for Vec2 {
    fn interpolate(start: &Self, end: &Self, t: f64) -> Self {
        start.lerp(*end, t as f32)
    }
}

impl Interpolate for Vec3 {
    fn interpolate(start: &Self, end: &Self, t: f64) -> Self {
        start.lerp(*end, t as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        assert_eq!(f64::interpolate(&3.0, &7.0, 0.0), 3.0);
        assert_eq!(f64::interpolate(&3.0, &7.0, 1.0), 7.0);
        assert_eq!(f32::interpolate(&1.0, &0.0, 0.5), 0.5);
        assert_eq!(
            Vec2::interpolate(&Vec2::ZERO, &Vec2::new(10.0, -4.0), 0.5),
            Vec2::new(5.0, -2.0)
        );
        assert_eq!(
            Vec3::interpolate(&Vec3::ZERO, &Vec3::new(2.0, 4.0, -8.0), 0.25),
            Vec3::new(0.5, 1.0, -2.0)
        );
    }
}
