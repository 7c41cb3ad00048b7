//! Small math helpers layered on top of `glam`.

use glam::Vec2;

/// Linear blend used by interpolation: `current * alpha + previous * (1 - alpha)`.
pub fn blend(current: f32, previous: f32, alpha: f32) -> f32 {
    current * alpha + previous * (1.0 - alpha)
}

/// Component-wise [`blend`] for vectors.
pub fn blend_vec2(current: Vec2, previous: Vec2, alpha: f32) -> Vec2 {
    Vec2::new(
        blend(current.x, previous.x, alpha),
        blend(current.y, previous.y, alpha),
    )
}

/// Rotates `point` by `angle` radians around the origin.
pub fn rotate(point: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(point)
}
