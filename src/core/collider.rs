use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::types::PhysicsMaterial;
use crate::{
    backend::FixtureDef,
    collision::shapes::ShapeDescriptor,
    error::{PhysicsError, PhysicsResult},
    utils::allocator::FixtureHandle,
};

/// Enumeration of supported collider geometries, in body space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Oriented box. `None` extents cover the whole entity.
    Box {
        half_extents: Option<Vec2>,
        center: Vec2,
        /// Radians.
        angle: f32,
    },
    /// Circle. `None` radius uses half the entity width.
    Circle { radius: Option<f32>, center: Vec2 },
    /// Convex polygon, counter-clockwise.
    Polygon { vertices: Vec<Vec2> },
}

impl ColliderShape {
    /// Resolves the shape against the owning entity's size.
    pub fn descriptor(&self, entity_size: Vec2) -> ShapeDescriptor {
        match self {
            ColliderShape::Box {
                half_extents,
                center,
                angle,
            } => ShapeDescriptor::oriented_box(
                half_extents.unwrap_or(entity_size * 0.5),
                *center,
                *angle,
            ),
            ColliderShape::Circle { radius, center } => ShapeDescriptor::Circle {
                radius: radius.unwrap_or(entity_size.x * 0.5),
                center: *center,
            },
            ColliderShape::Polygon { vertices } => ShapeDescriptor::Polygon {
                vertices: vertices.clone(),
            },
        }
    }
}

/// Collision filtering bits, Box2D style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category_bits: u16,
    pub mask_bits: u16,
    /// Same non-zero group: positive always collides, negative never does.
    pub group_index: i16,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category_bits: 0x0001,
            mask_bits: 0xFFFF,
            group_index: 0,
        }
    }
}

impl CollisionFilter {
    pub fn should_collide(&self, other: &CollisionFilter) -> bool {
        if self.group_index == other.group_index && self.group_index != 0 {
            return self.group_index > 0;
        }
        (self.mask_bits & other.category_bits) != 0 && (other.mask_bits & self.category_bits) != 0
    }
}

/// Collider component. Produces a fixture definition on demand.
///
/// The fixture itself belongs to the rigid body; the collider only keeps a
/// link to it for lookup and removal.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub is_sensor: bool,
    pub filter: CollisionFilter,
    /// Overrides the rigid body's material when set.
    pub material: Option<PhysicsMaterial>,
    pub user_data: Option<u64>,
    fixture: Option<FixtureHandle>,
}

impl Default for Collider {
    fn default() -> Self {
        Self::boxed()
    }
}

impl Collider {
    /// Box covering the whole entity.
    pub fn boxed() -> Self {
        Self::from_shape(ColliderShape::Box {
            half_extents: None,
            center: Vec2::ZERO,
            angle: 0.0,
        })
    }

    pub fn cuboid(half_extents: Vec2, center: Vec2, angle: f32) -> Self {
        Self::from_shape(ColliderShape::Box {
            half_extents: Some(half_extents),
            center,
            angle,
        })
    }

    /// Circle inscribed in the entity width.
    pub fn circle() -> Self {
        Self::from_shape(ColliderShape::Circle {
            radius: None,
            center: Vec2::ZERO,
        })
    }

    pub fn ball(radius: f32, center: Vec2) -> Self {
        Self::from_shape(ColliderShape::Circle {
            radius: Some(radius),
            center,
        })
    }

    pub fn polygon(vertices: Vec<Vec2>) -> PhysicsResult<Self> {
        if vertices.is_empty() {
            return Err(PhysicsError::InvalidShape(
                "polygon collider requires vertices".to_string(),
            ));
        }
        Ok(Self::from_shape(ColliderShape::Polygon { vertices }))
    }

    fn from_shape(shape: ColliderShape) -> Self {
        Self {
            shape,
            is_sensor: false,
            filter: CollisionFilter::default(),
            material: None,
            user_data: None,
            fixture: None,
        }
    }

    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn with_filter(mut self, category_bits: u16, mask_bits: u16, group_index: i16) -> Self {
        self.filter = CollisionFilter {
            category_bits,
            mask_bits,
            group_index,
        };
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_user_data(mut self, user_data: u64) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// The live fixture created from this collider, if any.
    pub fn fixture(&self) -> Option<FixtureHandle> {
        self.fixture
    }

    /// Builds the fixture definition; `fallback` is the rigid body's material.
    pub fn fixture_def(&self, entity_size: Vec2, fallback: &PhysicsMaterial) -> FixtureDef {
        let material = self.material.unwrap_or(*fallback);
        FixtureDef {
            shape: self.shape.descriptor(entity_size),
            friction: material.friction,
            restitution: material.restitution,
            density: material.density,
            is_sensor: self.is_sensor,
            filter: self.filter,
            user_data: self.user_data,
        }
    }

    pub(crate) fn link_fixture(&mut self, fixture: FixtureHandle) {
        self.fixture = Some(fixture);
    }

    pub(crate) fn unlink_fixture(&mut self) -> Option<FixtureHandle> {
        self.fixture.take()
    }
}
