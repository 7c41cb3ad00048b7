#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use scene_physics2d::{
    Collider, Collision, EntityId, PhysicsBehaviour, PhysicsContext, PhysicsManager,
    PhysicsSettings, RigidBody, Scene, Transform, Vec2,
};

pub const TIME_STEP: f32 = 0.125;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    FixedUpdate,
    CollisionEnter(Option<EntityId>),
    CollisionExit(Option<EntityId>),
    SensorEnter(Option<EntityId>),
    SensorExit(Option<EntityId>),
}

impl Call {
    pub fn is_contact(&self) -> bool {
        !matches!(self, Call::FixedUpdate)
    }
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Behaviour appending every callback it receives to a shared log.
pub struct Recorder {
    calls: CallLog,
}

impl Recorder {
    pub fn new() -> (Self, CallLog) {
        let calls = CallLog::default();
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl PhysicsBehaviour for Recorder {
    fn fixed_update(&mut self, _ctx: &mut PhysicsContext<'_>, _time_step: f32) {
        self.calls.lock().push(Call::FixedUpdate);
    }

    fn on_collision_enter(&mut self, _ctx: &mut PhysicsContext<'_>, collision: &Collision) {
        self.calls.lock().push(Call::CollisionEnter(collision.other()));
    }

    fn on_collision_exit(&mut self, _ctx: &mut PhysicsContext<'_>, collision: &Collision) {
        self.calls.lock().push(Call::CollisionExit(collision.other()));
    }

    fn on_sensor_enter(&mut self, _ctx: &mut PhysicsContext<'_>, collision: &Collision) {
        self.calls.lock().push(Call::SensorEnter(collision.other()));
    }

    fn on_sensor_exit(&mut self, _ctx: &mut PhysicsContext<'_>, collision: &Collision) {
        self.calls.lock().push(Call::SensorExit(collision.other()));
    }
}

pub fn contacts(log: &CallLog) -> Vec<Call> {
    log.lock().iter().copied().filter(Call::is_contact).collect()
}

/// Manager without gravity stepping at [`TIME_STEP`].
pub fn manager() -> PhysicsManager {
    PhysicsManager::with_settings(PhysicsSettings {
        gravity: Vec2::ZERO,
        time_step: TIME_STEP,
        ..PhysicsSettings::default()
    })
}

/// Unit box entity at `position` with a full-size collider and a rigid body.
pub fn spawn_body(
    scene: &mut Scene,
    physics: &mut PhysicsManager,
    name: &str,
    position: Vec2,
    collider: Collider,
    rigid_body: RigidBody,
) -> EntityId {
    let entity = scene.spawn(name, Transform::new(position, Vec2::ONE));
    scene.add_component(entity, collider, physics).unwrap();
    scene.add_component(entity, rigid_body, physics).unwrap();
    entity
}

/// Dynamic unit box at the origin moving right at 4 units/s, and a static
/// sensor box at x = 2. Begin fires on step 3 and end on step 6.
pub fn mover_and_sensor(scene: &mut Scene, physics: &mut PhysicsManager) -> (EntityId, EntityId) {
    let mover = spawn_body(
        scene,
        physics,
        "mover",
        Vec2::ZERO,
        Collider::boxed(),
        RigidBody::dynamic().initial_velocity(Vec2::new(4.0, 0.0), 0.0),
    );
    let sensor = spawn_body(
        scene,
        physics,
        "sensor",
        Vec2::new(2.0, 0.0),
        Collider::boxed().sensor(true),
        RigidBody::fixed(),
    );
    (mover, sensor)
}
