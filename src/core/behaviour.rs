use glam::Vec2;

use super::types::Transform;
use crate::{
    backend::PhysicsBackend,
    collision::event::Collision,
    utils::allocator::{BodyHandle, EntityId},
    world::garbage::BodyGarbage,
};

/// Callbacks a component receives from the physics manager.
///
/// Every method defaults to a no-op so implementors only override what they need.
/// Disabled components receive nothing.
pub trait PhysicsBehaviour: Send {
    /// Called once per fixed step, after the step's contacts were dispatched.
    fn fixed_update(&mut self, _ctx: &mut PhysicsContext<'_>, _time_step: f32) {}

    fn on_collision_enter(&mut self, _ctx: &mut PhysicsContext<'_>, _collision: &Collision) {}

    fn on_collision_exit(&mut self, _ctx: &mut PhysicsContext<'_>, _collision: &Collision) {}

    fn on_sensor_enter(&mut self, _ctx: &mut PhysicsContext<'_>, _collision: &Collision) {}

    fn on_sensor_exit(&mut self, _ctx: &mut PhysicsContext<'_>, _collision: &Collision) {}
}

/// View of the owning entity and the physics world during a callback.
pub struct PhysicsContext<'a> {
    entity: EntityId,
    transform: &'a mut Transform,
    body: Option<BodyHandle>,
    world: &'a mut dyn PhysicsBackend,
    garbage: &'a mut BodyGarbage,
}

impl<'a> PhysicsContext<'a> {
    pub(crate) fn new(
        entity: EntityId,
        transform: &'a mut Transform,
        body: Option<BodyHandle>,
        world: &'a mut dyn PhysicsBackend,
        garbage: &'a mut BodyGarbage,
    ) -> Self {
        Self {
            entity,
            transform,
            body,
            world,
            garbage,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn transform(&self) -> &Transform {
        self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        self.transform
    }

    /// Body of the entity's rigid body, if it has one.
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn world(&self) -> &dyn PhysicsBackend {
        &*self.world
    }

    pub fn linear_velocity(&self) -> Option<Vec2> {
        self.body.and_then(|body| self.world.linear_velocity(body))
    }

    pub fn set_linear_velocity(&mut self, velocity: Vec2) {
        if let Some(body) = self.body {
            self.world.set_linear_velocity(body, velocity);
        }
    }

    pub fn angular_velocity(&self) -> Option<f32> {
        self.body.and_then(|body| self.world.angular_velocity(body))
    }

    pub fn set_angular_velocity(&mut self, velocity: f32) {
        if let Some(body) = self.body {
            self.world.set_angular_velocity(body, velocity);
        }
    }

    pub fn apply_linear_impulse(&mut self, impulse: Vec2) {
        if let Some(body) = self.body {
            self.world.apply_linear_impulse(body, impulse);
        }
    }

    /// Queues `body` for destruction after the current frame's stepping.
    ///
    /// The body stays valid until the garbage pass; queuing twice is harmless.
    pub fn destroy_physics_body(&mut self, body: BodyHandle) {
        self.garbage.queue(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BodyDef, SimpleWorld};
    use crate::core::types::BodyType;

    #[test]
    fn helpers_target_the_entity_body() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut garbage = BodyGarbage::default();
        let mut transform = Transform::default();
        let body = world.create_body(&BodyDef {
            body_type: BodyType::Dynamic,
            ..BodyDef::default()
        });

        let mut ctx = PhysicsContext::new(
            EntityId::new(3, 0),
            &mut transform,
            Some(body),
            &mut world,
            &mut garbage,
        );
        ctx.set_linear_velocity(Vec2::new(1.0, 2.0));
        ctx.destroy_physics_body(body);
        ctx.destroy_physics_body(body);

        assert_eq!(ctx.linear_velocity(), Some(Vec2::new(1.0, 2.0)));
        assert!(ctx.world().contains_body(body));
        assert_eq!(garbage.len(), 1);
    }

    #[test]
    fn helpers_without_body_do_nothing() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut garbage = BodyGarbage::default();
        let mut transform = Transform::default();
        let mut ctx = PhysicsContext::new(
            EntityId::new(0, 0),
            &mut transform,
            None,
            &mut world,
            &mut garbage,
        );

        ctx.apply_linear_impulse(Vec2::X);
        assert_eq!(ctx.linear_velocity(), None);
        assert_eq!(ctx.body(), None);
    }
}
