//! Default simulation parameters and the serde-backed settings block.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsResult;

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, -9.8];

/// Default fixed timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Velocity constraint iterations forwarded to the backend each step.
pub const DEFAULT_VELOCITY_ITERATIONS: i32 = 8;

/// Position constraint iterations forwarded to the backend each step.
pub const DEFAULT_POSITION_ITERATIONS: i32 = 3;

/// Longest frame the accumulator accepts; longer hitches are clamped.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Free-list capacity of the collision event pool.
pub const COLLISION_POOL_CAPACITY: usize = 8;

/// Simulation parameters owned by [`crate::PhysicsManager`].
///
/// All fields are plain values; nothing is validated beyond the type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
    pub time_step: f32,
    pub velocity_iterations: i32,
    pub position_iterations: i32,
    pub simulate: bool,
    pub render_debug_lines: bool,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(DEFAULT_GRAVITY),
            time_step: DEFAULT_TIME_STEP,
            velocity_iterations: DEFAULT_VELOCITY_ITERATIONS,
            position_iterations: DEFAULT_POSITION_ITERATIONS,
            simulate: true,
            render_debug_lines: false,
        }
    }
}

impl PhysicsSettings {
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Parses settings from JSON; missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> PhysicsResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            PhysicsSettings::from_json_str(r#"{ "time_step": 0.02, "gravity": [0.0, -20.0] }"#)
                .unwrap();
        assert_eq!(settings.time_step, 0.02);
        assert_eq!(settings.gravity, Vec2::new(0.0, -20.0));
        assert_eq!(settings.velocity_iterations, DEFAULT_VELOCITY_ITERATIONS);
        assert_eq!(settings.position_iterations, DEFAULT_POSITION_ITERATIONS);
        assert!(settings.simulate);
        assert!(!settings.render_debug_lines);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = PhysicsSettings::from_json_str("{ time_step: }").unwrap_err();
        assert!(matches!(err, crate::error::PhysicsError::Config(_)));
    }
}
