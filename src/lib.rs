//! Scene Physics 2D – rigid-body integration for entity/component scenes.
//!
//! A [`PhysicsManager`] steps a [`PhysicsBackend`] at a fixed rate, writes
//! simulated poses back into entity transforms and turns contact begin/end
//! signals into [`PhysicsBehaviour`] callbacks on both entities involved.
//! [`SimpleWorld`] is the bundled backend.

pub mod backend;
pub mod collision;
pub mod config;
pub mod core;
pub mod debug;
pub mod error;
pub mod factory;
pub mod scene;
pub mod utils;
pub mod world;

pub use glam::{Mat4, Vec2};

pub use backend::{BodyDef, BodyTransform, DebugShape, FixtureDef, PhysicsBackend, SimpleWorld};
pub use collision::{
    contact::{ContactEvent, ContactPhase},
    event::{Collision, CollisionPool},
    shapes::ShapeDescriptor,
};
pub use config::PhysicsSettings;
pub use crate::core::{
    behaviour::{PhysicsBehaviour, PhysicsContext},
    collider::{Collider, ColliderShape, CollisionFilter},
    rigidbody::RigidBody,
    types::{BodyType, PhysicsMaterial, Transform},
};
pub use debug::{DebugLine, DebugRenderer, LineBatchRenderer};
pub use error::{PhysicsError, PhysicsResult};
pub use scene::{Component, ComponentId, Entity, Scene};
pub use utils::{
    allocator::{BodyHandle, EntityId, FixtureHandle},
    profiling::FrameStats,
};
pub use world::PhysicsManager;
