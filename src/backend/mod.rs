//! Boundary to the rigid-body engine.
//!
//! The integration layer only talks to physics through [`PhysicsBackend`].
//! [`SimpleWorld`] is the reference implementation shipped with the crate.

pub mod simple;

pub use simple::SimpleWorld;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    collision::{contact::ContactEvent, shapes::ShapeDescriptor},
    core::{collider::CollisionFilter, types::BodyType},
    error::PhysicsResult,
    utils::allocator::{BodyHandle, EntityId, FixtureHandle},
};

/// Everything needed to create a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    pub body_type: BodyType,
    /// Centroid position in world units.
    pub position: Vec2,
    /// Angle in radians.
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    pub bullet: bool,
    pub active: bool,
    /// Entity that owns the body, used to route contacts back into the scene.
    pub user_data: Option<EntityId>,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            fixed_rotation: false,
            bullet: false,
            active: true,
            user_data: None,
        }
    }
}

/// Everything needed to attach a fixture to a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureDef {
    pub shape: ShapeDescriptor,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
    pub is_sensor: bool,
    pub filter: CollisionFilter,
    pub user_data: Option<u64>,
}

impl FixtureDef {
    pub fn new(shape: ShapeDescriptor) -> Self {
        Self {
            shape,
            friction: 0.2,
            restitution: 0.0,
            density: 0.0,
            is_sensor: false,
            filter: CollisionFilter::default(),
            user_data: None,
        }
    }
}

/// Pose of a body: centroid position and angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyTransform {
    pub position: Vec2,
    pub angle: f32,
}

/// One fixture as the debug overlay sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugShape {
    pub body: BodyHandle,
    pub body_type: BodyType,
    pub transform: BodyTransform,
    pub shape: ShapeDescriptor,
    pub is_sensor: bool,
    pub active: bool,
}

/// Rigid-body engine used by [`crate::PhysicsManager`].
///
/// Stale handles are tolerated: queries return `None`/`false` and mutations
/// are ignored.
pub trait PhysicsBackend: Send {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Returns `false` when the body did not exist.
    fn destroy_body(&mut self, body: BodyHandle) -> bool;

    fn contains_body(&self, body: BodyHandle) -> bool;

    fn body_count(&self) -> usize;

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef)
        -> PhysicsResult<FixtureHandle>;

    fn destroy_fixture(&mut self, fixture: FixtureHandle) -> bool;

    fn contains_fixture(&self, fixture: FixtureHandle) -> bool;

    /// Number of fixtures attached to `body`; zero for unknown bodies.
    fn fixture_count(&self, body: BodyHandle) -> usize;

    fn fixture_body(&self, fixture: FixtureHandle) -> Option<BodyHandle>;

    fn fixture_is_sensor(&self, fixture: FixtureHandle) -> bool;

    fn body_user_data(&self, body: BodyHandle) -> Option<EntityId>;

    fn set_body_user_data(&mut self, body: BodyHandle, entity: Option<EntityId>);

    fn body_transform(&self, body: BodyHandle) -> Option<BodyTransform>;

    fn set_body_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32);

    fn is_body_active(&self, body: BodyHandle) -> bool;

    fn set_body_active(&mut self, body: BodyHandle, active: bool);

    fn body_type(&self, body: BodyHandle) -> Option<BodyType>;

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn angular_velocity(&self, body: BodyHandle) -> Option<f32>;

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32);

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    fn gravity(&self) -> Vec2;

    fn set_gravity(&mut self, gravity: Vec2);

    /// Advances the simulation by exactly `dt` seconds.
    fn step(&mut self, dt: f32, velocity_iterations: i32, position_iterations: i32);

    /// Contact begin/end signals produced since the last drain, in emission order.
    fn drain_contact_events(&mut self) -> Vec<ContactEvent>;

    fn debug_shapes(&self) -> Vec<DebugShape>;

    /// Releases every body and fixture; the backend is not used afterwards.
    fn dispose(&mut self);
}
