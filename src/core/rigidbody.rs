use glam::Vec2;
use log::{debug, warn};

use super::{
    collider::Collider,
    types::{BodyType, PhysicsMaterial, Transform},
};
use crate::{
    backend::{BodyDef, PhysicsBackend},
    scene::ComponentId,
    utils::{
        allocator::{BodyHandle, EntityId},
        math::{blend, blend_vec2},
    },
    world::garbage::BodyGarbage,
};

/// Component binding an entity to exactly one physics body.
///
/// The body is created when the component is attached and queued for
/// deferred destruction when it is detached. Every collider on the entity
/// becomes one fixture on the body.
#[derive(Debug, Clone)]
pub struct RigidBody {
    body_type: BodyType,
    material: PhysicsMaterial,
    colliders: Vec<ComponentId>,
    interpolate: bool,
    body: Option<BodyHandle>,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub fixed_rotation: bool,
    pub bullet: bool,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
}

impl RigidBody {
    pub fn new(body_type: BodyType) -> Self {
        Self::with_material(body_type, PhysicsMaterial::default())
    }

    pub fn with_material(body_type: BodyType, material: PhysicsMaterial) -> Self {
        Self {
            body_type,
            material,
            colliders: Vec::new(),
            interpolate: true,
            body: None,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            fixed_rotation: false,
            bullet: false,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
        }
    }

    pub fn dynamic() -> Self {
        Self::new(BodyType::Dynamic)
    }

    pub fn fixed() -> Self {
        Self::new(BodyType::Static)
    }

    pub fn kinematic() -> Self {
        Self::new(BodyType::Kinematic)
    }

    /// Initial velocity handed to the body when it is created.
    pub fn initial_velocity(mut self, linear: Vec2, angular: f32) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn material(&self) -> &PhysicsMaterial {
        &self.material
    }

    /// Handle of the underlying body, once created.
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Tracked collider components, in attachment order.
    pub fn colliders(&self) -> &[ComponentId] {
        &self.colliders
    }

    pub fn is_interpolate(&self) -> bool {
        self.interpolate
    }

    pub fn set_interpolate(&mut self, interpolate: bool) {
        self.interpolate = interpolate;
    }

    /// Returns the body, creating it first if this component is attached but has none.
    pub fn body_or_create(
        &mut self,
        entity: EntityId,
        transform: &mut Transform,
        colliders: &mut [(ComponentId, &mut Collider)],
        world: &mut dyn PhysicsBackend,
    ) -> BodyHandle {
        match self.body {
            Some(body) => body,
            None => self.create_body(entity, transform, colliders, world),
        }
    }

    /// Attaches the component: tracks every collider present and creates the body eagerly.
    pub(crate) fn attach(
        &mut self,
        entity: EntityId,
        transform: &mut Transform,
        colliders: &mut [(ComponentId, &mut Collider)],
        world: &mut dyn PhysicsBackend,
    ) -> BodyHandle {
        self.body = None;
        self.colliders = colliders.iter().map(|(id, _)| *id).collect();
        self.create_body(entity, transform, colliders, world)
    }

    /// Queues the body for destruction and forgets every collider.
    pub(crate) fn detach<'c>(
        &mut self,
        colliders: impl IntoIterator<Item = &'c mut Collider>,
        garbage: &mut BodyGarbage,
    ) {
        if let Some(body) = self.body.take() {
            garbage.queue(body);
        }
        for collider in colliders {
            collider.unlink_fixture();
        }
        self.colliders.clear();
    }

    pub(crate) fn collider_added(
        &mut self,
        id: ComponentId,
        collider: &mut Collider,
        entity_size: Vec2,
        world: &mut dyn PhysicsBackend,
    ) {
        if self.colliders.contains(&id) {
            return;
        }
        self.colliders.push(id);

        if let Some(body) = self.body {
            self.create_fixture(body, collider, entity_size, world);
        }
    }

    /// Destroys only the fixture of `collider`; the body stays alive.
    pub(crate) fn collider_removed(
        &mut self,
        id: ComponentId,
        collider: &mut Collider,
        world: &mut dyn PhysicsBackend,
    ) {
        let Some(position) = self.colliders.iter().position(|tracked| *tracked == id) else {
            return;
        };
        self.colliders.remove(position);

        let fixture = collider.unlink_fixture();
        if let (Some(_), Some(fixture)) = (self.body, fixture) {
            world.destroy_fixture(fixture);
        }
    }

    /// Writes the simulated pose back into the entity transform.
    pub(crate) fn fixed_update(
        &mut self,
        entity: EntityId,
        transform: &mut Transform,
        colliders: &mut [(ComponentId, &mut Collider)],
        world: &mut dyn PhysicsBackend,
    ) {
        if self.body.is_none() {
            debug!("rigid body of {entity:?} lost its body, recreating");
            self.create_body(entity, transform, colliders, world);
        }

        let Some(pose) = self.body.and_then(|body| world.body_transform(body)) else {
            return;
        };
        transform.position = pose.position - transform.half_size();
        transform.rotation = pose.angle.to_degrees();
    }

    /// Blends the body pose with the current transform by `alpha`.
    pub fn interpolate(&self, alpha: f32, transform: &mut Transform, world: &dyn PhysicsBackend) {
        if !self.interpolate {
            return;
        }
        let Some(body) = self.body else {
            return;
        };
        if !world.is_body_active(body) {
            return;
        }
        let Some(pose) = world.body_transform(body) else {
            return;
        };

        let body_position = pose.position - transform.half_size();
        transform.position = blend_vec2(body_position, transform.position, alpha);
        transform.rotation = blend(pose.angle.to_degrees(), transform.rotation, alpha);
    }

    fn create_body(
        &mut self,
        entity: EntityId,
        transform: &mut Transform,
        colliders: &mut [(ComponentId, &mut Collider)],
        world: &mut dyn PhysicsBackend,
    ) -> BodyHandle {
        // Bodies are simulated around their centroid.
        transform.origin = transform.half_size();

        let def = BodyDef {
            body_type: self.body_type,
            position: transform.center(),
            angle: transform.rotation.to_radians(),
            linear_velocity: self.linear_velocity,
            angular_velocity: self.angular_velocity,
            linear_damping: self.linear_damping,
            angular_damping: self.angular_damping,
            gravity_scale: self.gravity_scale,
            fixed_rotation: self.fixed_rotation,
            bullet: self.bullet,
            active: true,
            user_data: Some(entity),
        };
        let body = world.create_body(&def);
        self.body = Some(body);

        for (id, collider) in colliders.iter_mut() {
            if self.colliders.contains(id) {
                self.create_fixture(body, collider, transform.size, world);
            }
        }
        debug!(
            "created {:?} body {:?} for {:?} with {} fixtures",
            self.body_type,
            body,
            entity,
            world.fixture_count(body)
        );
        body
    }

    fn create_fixture(
        &self,
        body: BodyHandle,
        collider: &mut Collider,
        entity_size: Vec2,
        world: &mut dyn PhysicsBackend,
    ) {
        let def = collider.fixture_def(entity_size, &self.material);
        match world.create_fixture(body, &def) {
            Ok(fixture) => collider.link_fixture(fixture),
            Err(err) => warn!("collider skipped, fixture creation failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimpleWorld;
    use approx::assert_relative_eq;

    fn attached(
        body: &mut RigidBody,
        transform: &mut Transform,
        colliders: &mut [(ComponentId, &mut Collider)],
        world: &mut SimpleWorld,
    ) -> BodyHandle {
        body.attach(EntityId::new(0, 0), transform, colliders, world)
    }

    #[test]
    fn attach_places_body_at_entity_center() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut transform =
            Transform::new(Vec2::new(3.0, 3.0), Vec2::new(2.0, 1.0)).with_rotation(90.0);
        let mut collider = Collider::boxed();
        let mut colliders = [(ComponentId(1), &mut collider)];
        let mut rigid_body = RigidBody::dynamic();

        let body = attached(&mut rigid_body, &mut transform, &mut colliders, &mut world);

        let pose = world.body_transform(body).unwrap();
        assert_eq!(pose.position, Vec2::new(4.0, 3.5));
        assert_relative_eq!(pose.angle, std::f32::consts::FRAC_PI_2);
        assert_eq!(transform.origin, Vec2::new(1.0, 0.5));
        assert_eq!(world.body_user_data(body), Some(EntityId::new(0, 0)));
        assert_eq!(world.fixture_count(body), 1);
        assert!(collider.fixture().is_some());
    }

    #[test]
    fn fixed_update_writes_lower_left_and_degrees() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut transform = Transform::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let mut rigid_body = RigidBody::dynamic();
        let body = attached(&mut rigid_body, &mut transform, &mut [], &mut world);

        world.set_body_transform(body, Vec2::new(5.0, 6.0), std::f32::consts::PI);
        rigid_body.fixed_update(EntityId::new(0, 0), &mut transform, &mut [], &mut world);

        assert_eq!(transform.position, Vec2::new(4.0, 5.0));
        assert_relative_eq!(transform.rotation, 180.0);
    }

    #[test]
    fn fixed_update_recreates_missing_body() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut transform = Transform::default();
        let mut rigid_body = RigidBody::dynamic();

        rigid_body.fixed_update(EntityId::new(0, 0), &mut transform, &mut [], &mut world);

        assert!(rigid_body.body().is_some());
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn interpolate_blends_body_and_previous_transform() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut transform = Transform::new(Vec2::ZERO, Vec2::ONE);
        let mut rigid_body = RigidBody::dynamic();
        let body = attached(&mut rigid_body, &mut transform, &mut [], &mut world);

        world.set_body_transform(body, Vec2::new(4.5, 0.5), 0.0);
        transform.rotation = 40.0;
        rigid_body.interpolate(0.25, &mut transform, &world);

        assert_relative_eq!(transform.position.x, 1.0);
        assert_relative_eq!(transform.position.y, 0.0);
        assert_relative_eq!(transform.rotation, 30.0);
    }

    #[test]
    fn interpolate_is_noop_when_disabled_or_inactive() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut transform = Transform::new(Vec2::ZERO, Vec2::ONE);
        let mut rigid_body = RigidBody::dynamic();
        let body = attached(&mut rigid_body, &mut transform, &mut [], &mut world);
        world.set_body_transform(body, Vec2::new(10.5, 10.5), 0.0);

        rigid_body.set_interpolate(false);
        rigid_body.interpolate(0.5, &mut transform, &world);
        assert_eq!(transform.position, Vec2::ZERO);

        rigid_body.set_interpolate(true);
        world.set_body_active(body, false);
        rigid_body.interpolate(0.5, &mut transform, &world);
        assert_eq!(transform.position, Vec2::ZERO);
    }

    #[test]
    fn body_or_create_reuses_existing_body() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut transform = Transform::default();
        let mut rigid_body = RigidBody::kinematic();
        let entity = EntityId::new(1, 0);

        let created = rigid_body.body_or_create(entity, &mut transform, &mut [], &mut world);
        let reused = rigid_body.body_or_create(entity, &mut transform, &mut [], &mut world);

        assert_eq!(created, reused);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.body_type(created), Some(BodyType::Kinematic));
    }

    #[test]
    fn detach_queues_body_instead_of_destroying() {
        let mut world = SimpleWorld::new(Vec2::ZERO);
        let mut garbage = BodyGarbage::default();
        let mut transform = Transform::default();
        let mut collider = Collider::boxed();
        let mut rigid_body = RigidBody::dynamic();
        let body = {
            let mut colliders = [(ComponentId(7), &mut collider)];
            attached(&mut rigid_body, &mut transform, &mut colliders, &mut world)
        };

        rigid_body.detach([&mut collider], &mut garbage);

        assert!(world.contains_body(body));
        assert!(garbage.contains(body));
        assert!(rigid_body.body().is_none());
        assert!(rigid_body.colliders().is_empty());
        assert!(collider.fixture().is_none());
    }
}
