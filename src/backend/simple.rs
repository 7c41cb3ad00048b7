use std::collections::BTreeSet;

use glam::Vec2;

use super::{BodyDef, BodyTransform, DebugShape, FixtureDef, PhysicsBackend};
use crate::{
    collision::{
        contact::ContactEvent,
        shapes::{ShapeUtil, WorldShape},
    },
    config::DEFAULT_GRAVITY,
    core::{collider::CollisionFilter, types::BodyType},
    error::{PhysicsError, PhysicsResult},
    utils::{
        allocator::{Arena, BodyHandle, EntityId, FixtureHandle},
        logging::ScopedTimer,
    },
};

struct SimBody {
    def: BodyDef,
    fixtures: Vec<FixtureHandle>,
    inverse_mass: f32,
}

impl SimBody {
    fn is_dynamic(&self) -> bool {
        self.def.body_type == BodyType::Dynamic
    }

    fn recompute_mass(&mut self, fixtures: &Arena<SimFixture>) {
        if !self.is_dynamic() {
            self.inverse_mass = 0.0;
            return;
        }
        let mass: f32 = self
            .fixtures
            .iter()
            .filter_map(|handle| fixtures.get(handle.0))
            .map(|fixture| fixture.def.density * ShapeUtil::area(&fixture.def.shape))
            .sum();
        // Dynamic bodies without mass behave as if they weighed one unit.
        self.inverse_mass = if mass > f32::EPSILON { 1.0 / mass } else { 1.0 };
    }
}

struct SimFixture {
    body: BodyHandle,
    def: FixtureDef,
}

/// Reference backend: integrates velocities, detects overlaps, emits contact events.
///
/// Overlaps are detected with exact circle tests and bounding boxes for every
/// other shape. Contacts are reported but never resolved; there is no solver,
/// so iteration counts are accepted and ignored.
pub struct SimpleWorld {
    bodies: Arena<SimBody>,
    fixtures: Arena<SimFixture>,
    gravity: Vec2,
    touching: BTreeSet<(FixtureHandle, FixtureHandle)>,
    events: Vec<ContactEvent>,
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new(Vec2::from_array(DEFAULT_GRAVITY))
    }
}

impl SimpleWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: Arena::new(),
            fixtures: Arena::new(),
            gravity,
            touching: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Number of fixture pairs currently touching.
    pub fn touching_pairs(&self) -> usize {
        self.touching.len()
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for (_, body) in self.bodies.iter_mut() {
            let def = &mut body.def;
            if !def.active || def.body_type == BodyType::Static {
                continue;
            }

            if def.body_type == BodyType::Dynamic {
                def.linear_velocity += gravity * def.gravity_scale * dt;
                def.linear_velocity *= 1.0 / (1.0 + dt * def.linear_damping);
                def.angular_velocity *= 1.0 / (1.0 + dt * def.angular_damping);
            }

            def.position += def.linear_velocity * dt;
            if def.fixed_rotation {
                def.angular_velocity = 0.0;
            } else {
                def.angle += def.angular_velocity * dt;
            }
        }
    }

    fn update_contacts(&mut self) {
        let placed: Vec<(FixtureHandle, BodyHandle, bool, CollisionFilter, WorldShape)> = self
            .fixtures
            .iter()
            .filter_map(|(id, fixture)| {
                let body = self.bodies.get(fixture.body.0)?;
                if !body.def.active {
                    return None;
                }
                Some((
                    FixtureHandle(id),
                    fixture.body,
                    body.is_dynamic(),
                    fixture.def.filter,
                    ShapeUtil::to_world(&fixture.def.shape, body.def.position, body.def.angle),
                ))
            })
            .collect();

        let mut current = BTreeSet::new();
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                if a.1 == b.1 || !(a.2 || b.2) {
                    continue;
                }
                if !a.3.should_collide(&b.3) {
                    continue;
                }
                if a.4.overlaps(&b.4) {
                    current.insert(ordered_pair(a.0, b.0));
                }
            }
        }

        for pair in self.touching.difference(&current) {
            self.events.push(ContactEvent::end(pair.0, pair.1));
        }
        for pair in current.difference(&self.touching) {
            self.events.push(ContactEvent::begin(pair.0, pair.1));
        }
        self.touching = current;
    }

    fn forget_contacts_of(&mut self, fixture: FixtureHandle) {
        self.touching
            .retain(|(a, b)| *a != fixture && *b != fixture);
    }
}

fn ordered_pair(a: FixtureHandle, b: FixtureHandle) -> (FixtureHandle, FixtureHandle) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PhysicsBackend for SimpleWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let id = self.bodies.insert(SimBody {
            def: def.clone(),
            fixtures: Vec::new(),
            inverse_mass: 0.0,
        });
        if let Some(body) = self.bodies.get_mut(id) {
            body.recompute_mass(&self.fixtures);
        }
        BodyHandle(id)
    }

    fn destroy_body(&mut self, body: BodyHandle) -> bool {
        let Some(removed) = self.bodies.remove(body.0) else {
            return false;
        };
        // Pairs involving the body are dropped silently; no end events are emitted.
        for fixture in removed.fixtures {
            self.fixtures.remove(fixture.0);
            self.forget_contacts_of(fixture);
        }
        true
    }

    fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains(body.0)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn create_fixture(
        &mut self,
        body: BodyHandle,
        def: &FixtureDef,
    ) -> PhysicsResult<FixtureHandle> {
        def.shape.validate()?;
        if !self.bodies.contains(body.0) {
            return Err(PhysicsError::UnknownBody(body));
        }

        let fixture = FixtureHandle(self.fixtures.insert(SimFixture {
            body,
            def: def.clone(),
        }));
        if let Some(sim) = self.bodies.get_mut(body.0) {
            sim.fixtures.push(fixture);
            sim.recompute_mass(&self.fixtures);
        }
        Ok(fixture)
    }

    fn destroy_fixture(&mut self, fixture: FixtureHandle) -> bool {
        let Some(removed) = self.fixtures.remove(fixture.0) else {
            return false;
        };
        if let Some(body) = self.bodies.get_mut(removed.body.0) {
            body.fixtures.retain(|f| *f != fixture);
            body.recompute_mass(&self.fixtures);
        }
        self.forget_contacts_of(fixture);
        true
    }

    fn contains_fixture(&self, fixture: FixtureHandle) -> bool {
        self.fixtures.contains(fixture.0)
    }

    fn fixture_count(&self, body: BodyHandle) -> usize {
        self.bodies
            .get(body.0)
            .map(|body| body.fixtures.len())
            .unwrap_or(0)
    }

    fn fixture_body(&self, fixture: FixtureHandle) -> Option<BodyHandle> {
        self.fixtures.get(fixture.0).map(|fixture| fixture.body)
    }

    fn fixture_is_sensor(&self, fixture: FixtureHandle) -> bool {
        self.fixtures
            .get(fixture.0)
            .map(|fixture| fixture.def.is_sensor)
            .unwrap_or(false)
    }

    fn body_user_data(&self, body: BodyHandle) -> Option<EntityId> {
        self.bodies.get(body.0).and_then(|body| body.def.user_data)
    }

    fn set_body_user_data(&mut self, body: BodyHandle, entity: Option<EntityId>) {
        if let Some(body) = self.bodies.get_mut(body.0) {
            body.def.user_data = entity;
        }
    }

    fn body_transform(&self, body: BodyHandle) -> Option<BodyTransform> {
        self.bodies.get(body.0).map(|body| BodyTransform {
            position: body.def.position,
            angle: body.def.angle,
        })
    }

    fn set_body_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        if let Some(body) = self.bodies.get_mut(body.0) {
            body.def.position = position;
            body.def.angle = angle;
        }
    }

    fn is_body_active(&self, body: BodyHandle) -> bool {
        self.bodies
            .get(body.0)
            .map(|body| body.def.active)
            .unwrap_or(false)
    }

    fn set_body_active(&mut self, body: BodyHandle, active: bool) {
        if let Some(body) = self.bodies.get_mut(body.0) {
            body.def.active = active;
        }
    }

    fn body_type(&self, body: BodyHandle) -> Option<BodyType> {
        self.bodies.get(body.0).map(|body| body.def.body_type)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0).map(|body| body.def.linear_velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(body.0) {
            if body.def.body_type != BodyType::Static {
                body.def.linear_velocity = velocity;
            }
        }
    }

    fn angular_velocity(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(body.0).map(|body| body.def.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32) {
        if let Some(body) = self.bodies.get_mut(body.0) {
            if body.def.body_type != BodyType::Static {
                body.def.angular_velocity = velocity;
            }
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(body.0) {
            if body.is_dynamic() {
                body.def.linear_velocity += impulse * body.inverse_mass;
            }
        }
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn step(&mut self, dt: f32, _velocity_iterations: i32, _position_iterations: i32) {
        {
            let _timer = ScopedTimer::new("simple_world::integrate");
            self.integrate(dt);
        }
        let _timer = ScopedTimer::new("simple_world::contacts");
        self.update_contacts();
    }

    fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    fn debug_shapes(&self) -> Vec<DebugShape> {
        self.fixtures
            .iter()
            .filter_map(|(_, fixture)| {
                let body = self.bodies.get(fixture.body.0)?;
                Some(DebugShape {
                    body: fixture.body,
                    body_type: body.def.body_type,
                    transform: BodyTransform {
                        position: body.def.position,
                        angle: body.def.angle,
                    },
                    shape: fixture.def.shape.clone(),
                    is_sensor: fixture.def.is_sensor,
                    active: body.def.active,
                })
            })
            .collect()
    }

    fn dispose(&mut self) {
        self.fixtures.clear();
        self.bodies.clear();
        self.touching.clear();
        self.events.clear();
    }
}
