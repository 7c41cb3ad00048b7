//! Fan-out of fixed updates, interpolation and contact callbacks over a scene.

use super::garbage::BodyGarbage;
use crate::{
    backend::PhysicsBackend,
    collision::{
        contact::{ContactEvent, ContactPhase},
        event::{Collision, CollisionPool},
    },
    core::{
        behaviour::{PhysicsBehaviour, PhysicsContext},
        rigidbody::RigidBody,
    },
    scene::{Component, Entity, Scene},
    utils::allocator::{EntityId, FixtureHandle},
};

/// Runs `fixed_update` on every enabled rigid body and behaviour, scene order then
/// component order.
pub(crate) fn fixed_update(
    scene: &mut Scene,
    world: &mut dyn PhysicsBackend,
    garbage: &mut BodyGarbage,
    time_step: f32,
) {
    scene.for_each_entity_mut(|entity| {
        for index in 0..entity.components.len() {
            if !entity.components[index].enabled {
                continue;
            }
            if matches!(entity.components[index].component, Component::RigidBody(_)) {
                if let Some(mut parts) = entity.rigid_body_parts() {
                    parts.rigid_body.fixed_update(
                        parts.entity,
                        parts.transform,
                        &mut parts.colliders,
                        world,
                    );
                }
            } else {
                notify(entity, index, world, garbage, |behaviour, ctx| {
                    behaviour.fixed_update(ctx, time_step)
                });
            }
        }
    });
}

/// Blends every rigid body's entity transform towards its body pose, enabled or not.
pub(crate) fn interpolate(scene: &mut Scene, world: &dyn PhysicsBackend, alpha: f32) {
    scene.for_each_entity_mut(|entity| {
        if let Some(parts) = entity.rigid_body_parts() {
            parts.rigid_body.interpolate(alpha, parts.transform, world);
        }
    });
}

/// Translates contact events into behaviour callbacks on both sides.
///
/// Returns how many events reached at least one entity.
pub(crate) fn dispatch_contacts(
    scene: &mut Scene,
    world: &mut dyn PhysicsBackend,
    garbage: &mut BodyGarbage,
    pool: &mut CollisionPool,
    events: Vec<ContactEvent>,
) -> usize {
    let mut dispatched = 0;
    for event in events {
        let entity_a = owner_of(scene, world, event.fixture_a);
        let entity_b = owner_of(scene, world, event.fixture_b);
        if entity_a.is_none() && entity_b.is_none() {
            continue;
        }

        let view_a = Collision::new(
            entity_b,
            event.fixture_a,
            event.fixture_b,
            world.fixture_is_sensor(event.fixture_a),
        );
        let view_b = Collision::new(
            entity_a,
            event.fixture_b,
            event.fixture_a,
            world.fixture_is_sensor(event.fixture_b),
        );

        pool.with_pair(view_a, view_b, |a, b| {
            if let Some(entity) = entity_a {
                notify_contact(scene, world, garbage, entity, event.phase, a);
            }
            if let Some(entity) = entity_b {
                notify_contact(scene, world, garbage, entity, event.phase, b);
            }
        });
        dispatched += 1;
    }
    dispatched
}

fn owner_of(
    scene: &Scene,
    world: &dyn PhysicsBackend,
    fixture: FixtureHandle,
) -> Option<EntityId> {
    world
        .fixture_body(fixture)
        .and_then(|body| world.body_user_data(body))
        .filter(|entity| scene.contains(*entity))
}

fn notify_contact(
    scene: &mut Scene,
    world: &mut dyn PhysicsBackend,
    garbage: &mut BodyGarbage,
    entity: EntityId,
    phase: ContactPhase,
    collision: &Collision,
) {
    let Some(entity) = scene.entity_mut(entity) else {
        return;
    };
    for index in 0..entity.components.len() {
        notify(entity, index, world, garbage, |behaviour, ctx| {
            match (phase, collision.is_sensor()) {
                (ContactPhase::Begin, true) => behaviour.on_sensor_enter(ctx, collision),
                (ContactPhase::Begin, false) => behaviour.on_collision_enter(ctx, collision),
                (ContactPhase::End, true) => behaviour.on_sensor_exit(ctx, collision),
                (ContactPhase::End, false) => behaviour.on_collision_exit(ctx, collision),
            }
        });
    }
}

/// Calls `f` on the behaviour at `index` if it is one and it is enabled.
fn notify(
    entity: &mut Entity,
    index: usize,
    world: &mut dyn PhysicsBackend,
    garbage: &mut BodyGarbage,
    f: impl FnOnce(&mut dyn PhysicsBehaviour, &mut PhysicsContext<'_>),
) {
    let id = entity.id();
    let body = entity.rigid_body().and_then(RigidBody::body);
    let transform = &mut entity.transform;
    let Some(slot) = entity.components.get_mut(index) else {
        return;
    };
    if !slot.enabled {
        return;
    }
    let Component::Behaviour(behaviour) = &mut slot.component else {
        return;
    };

    let mut ctx = PhysicsContext::new(id, transform, body, world, garbage);
    f(&mut **behaviour, &mut ctx);
}
