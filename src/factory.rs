//! Helpers for bodies no entity owns: walls, edges and props.
//!
//! Bodies built here carry no entity user data, so contacts against them
//! reach only the entity side with `other == None`. They are not tracked by
//! any rigid body; destroy them with [`PhysicsManager::destroy_physics_body`].

use glam::Vec2;

use crate::{
    backend::{BodyDef, FixtureDef},
    collision::shapes::ShapeDescriptor,
    core::types::{BodyType, PhysicsMaterial, Transform},
    error::PhysicsResult,
    utils::allocator::BodyHandle,
    world::PhysicsManager,
};

pub const BOTTOM_BOUNDARY: usize = 0;
pub const RIGHT_BOUNDARY: usize = 1;
pub const TOP_BOUNDARY: usize = 2;
pub const LEFT_BOUNDARY: usize = 3;

fn create_single_fixture_body(
    physics: &mut PhysicsManager,
    def: BodyDef,
    fixture: FixtureDef,
) -> PhysicsResult<BodyHandle> {
    let world = physics.world_mut();
    let body = world.create_body(&def);
    if let Err(err) = world.create_fixture(body, &fixture) {
        world.destroy_body(body);
        return Err(err);
    }
    Ok(body)
}

fn material_fixture(shape: ShapeDescriptor, material: &PhysicsMaterial) -> FixtureDef {
    FixtureDef {
        friction: material.friction,
        restitution: material.restitution,
        density: material.density,
        ..FixtureDef::new(shape)
    }
}

/// Box of `size` whose lower-left corner sits at `position`; `rotation` in degrees.
pub fn create_box_body(
    physics: &mut PhysicsManager,
    size: Vec2,
    position: Vec2,
    body_type: BodyType,
    material: &PhysicsMaterial,
    rotation: f32,
) -> PhysicsResult<BodyHandle> {
    let half = size * 0.5;
    let def = BodyDef {
        body_type,
        position: position + half,
        angle: rotation.to_radians(),
        ..BodyDef::default()
    };
    let shape = ShapeDescriptor::oriented_box(half, Vec2::ZERO, 0.0);
    create_single_fixture_body(physics, def, material_fixture(shape, material))
}

/// Circle whose bounding square has its lower-left corner at `position`.
pub fn create_round_body(
    physics: &mut PhysicsManager,
    radius: f32,
    position: Vec2,
    body_type: BodyType,
    material: &PhysicsMaterial,
    rotation: f32,
) -> PhysicsResult<BodyHandle> {
    let def = BodyDef {
        body_type,
        position: position + Vec2::splat(radius),
        angle: rotation.to_radians(),
        ..BodyDef::default()
    };
    let shape = ShapeDescriptor::Circle {
        radius,
        center: Vec2::ZERO,
    };
    create_single_fixture_body(physics, def, material_fixture(shape, material))
}

/// Static box covering `transform`'s extent and rotation.
pub fn box_body_for(
    physics: &mut PhysicsManager,
    transform: &Transform,
    material: &PhysicsMaterial,
) -> PhysicsResult<BodyHandle> {
    create_box_body(
        physics,
        transform.size,
        transform.position,
        BodyType::Static,
        material,
        transform.rotation,
    )
}

/// Static circle inscribed in `transform`'s width.
pub fn round_body_for(
    physics: &mut PhysicsManager,
    transform: &Transform,
    material: &PhysicsMaterial,
) -> PhysicsResult<BodyHandle> {
    create_round_body(
        physics,
        transform.size.x * 0.5,
        transform.position,
        BodyType::Static,
        material,
        transform.rotation,
    )
}

/// Static, massless and non-bouncing box; `position` is its lower-left corner.
pub fn create_wall(
    physics: &mut PhysicsManager,
    size: Vec2,
    position: Vec2,
    friction: f32,
) -> PhysicsResult<BodyHandle> {
    let material = PhysicsMaterial::new(friction, 0.0, 0.0);
    create_box_body(physics, size, position, BodyType::Static, &material, 0.0)
}

/// Static edge from `start` to `end`, both relative to `position`.
pub fn create_edge(
    physics: &mut PhysicsManager,
    position: Vec2,
    start: Vec2,
    end: Vec2,
    friction: f32,
) -> PhysicsResult<BodyHandle> {
    let def = BodyDef {
        body_type: BodyType::Static,
        position,
        ..BodyDef::default()
    };
    let fixture = FixtureDef {
        friction,
        ..FixtureDef::new(ShapeDescriptor::Edge { start, end })
    };
    create_single_fixture_body(physics, def, fixture)
}

/// Four static edges enclosing `(0, 0)..(width, height)`.
///
/// Indexed by [`BOTTOM_BOUNDARY`], [`RIGHT_BOUNDARY`], [`TOP_BOUNDARY`] and [`LEFT_BOUNDARY`].
pub fn create_boundary_box(
    physics: &mut PhysicsManager,
    width: f32,
    height: f32,
    friction: f32,
) -> PhysicsResult<[BodyHandle; 4]> {
    let horizontal = Vec2::new(width, 0.0);
    let vertical = Vec2::new(0.0, height);

    let mut walls = [BodyHandle::default(); 4];
    walls[BOTTOM_BOUNDARY] = create_edge(physics, Vec2::ZERO, Vec2::ZERO, horizontal, friction)?;
    walls[RIGHT_BOUNDARY] = create_edge(physics, horizontal, Vec2::ZERO, vertical, friction)?;
    walls[TOP_BOUNDARY] = create_edge(physics, vertical, Vec2::ZERO, horizontal, friction)?;
    walls[LEFT_BOUNDARY] = create_edge(physics, Vec2::ZERO, Vec2::ZERO, vertical, friction)?;
    Ok(walls)
}

/// Queues one wall of a boundary box for destruction.
///
/// Returns `false` for an index outside the box or a wall already queued.
pub fn remove_boundary_wall(
    physics: &mut PhysicsManager,
    walls: &[BodyHandle; 4],
    index: usize,
) -> bool {
    match walls.get(index) {
        Some(wall) => physics.destroy_physics_body(*wall),
        None => false,
    }
}
