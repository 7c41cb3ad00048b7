//! Shape descriptors, contact signals and the collision events built from them.

pub mod contact;
pub mod event;
pub mod shapes;

pub use contact::{ContactEvent, ContactPhase};
pub use event::{Collision, CollisionPool};
pub use shapes::{Aabb, ShapeDescriptor, ShapeUtil};
