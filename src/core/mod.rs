//! Scene-side physics components and the values they share.

pub mod behaviour;
pub mod collider;
pub mod rigidbody;
pub mod types;

pub use behaviour::{PhysicsBehaviour, PhysicsContext};
pub use collider::{Collider, ColliderShape, CollisionFilter};
pub use rigidbody::RigidBody;
pub use types::{BodyType, PhysicsMaterial, Transform};
