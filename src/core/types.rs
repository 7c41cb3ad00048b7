use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Entity transform as the scene sees it.
///
/// `position` is the lower-left corner of the entity, `size` its extent and
/// `rotation` is expressed in degrees. Physics bodies are modelled from their
/// centroid, so conversions offset by half the size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub size: Vec2,
    pub origin: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            size: Vec2::ONE,
            origin: Vec2::ZERO,
        }
    }
}

impl Transform {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Centre of the entity, where its physics body lives.
    pub fn center(&self) -> Vec2 {
        self.position + self.half_size()
    }
}

/// Friction, restitution and density applied to fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsMaterial {
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.0,
            density: 1.0,
        }
    }
}

impl PhysicsMaterial {
    pub fn new(friction: f32, restitution: f32, density: f32) -> Self {
        Self {
            friction,
            restitution,
            density,
        }
    }

    pub fn rubber() -> Self {
        Self::new(1.0, 0.8, 1.4)
    }

    pub fn metal() -> Self {
        Self::new(0.5, 0.3, 7.8)
    }

    pub fn ice() -> Self {
        Self::new(0.03, 0.05, 0.9)
    }
}

/// Simulation category of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BodyType {
    /// Zero mass, zero velocity, moved only by hand.
    Static,
    /// Zero mass, velocity set by the user.
    Kinematic,
    /// Positive mass, moved by forces and the solver.
    #[default]
    Dynamic,
}
