//! Error types surfaced by the physics integration layer.

use crate::{
    scene::ComponentId,
    utils::allocator::{BodyHandle, EntityId},
};

pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// An entity may carry at most one rigid body.
    #[error("entity {0:?} already has a rigid body attached")]
    DuplicateRigidBody(EntityId),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    #[error("entity {entity:?} has no component {component:?}")]
    UnknownComponent {
        entity: EntityId,
        component: ComponentId,
    },

    #[error("body {0:?} does not exist in the physics world")]
    UnknownBody(BodyHandle),

    #[error("invalid physics settings: {0}")]
    Config(#[from] serde_json::Error),
}
