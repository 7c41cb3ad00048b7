mod common;

use std::sync::Arc;

use common::{contacts, manager, mover_and_sensor, spawn_body, Call, Recorder};
use parking_lot::Mutex;
use scene_physics2d::{
    factory::{create_boundary_box, TOP_BOUNDARY},
    Collider, Collision, Component, EntityId, FixtureHandle, PhysicsBehaviour, PhysicsContext,
    RigidBody, Scene, Vec2,
};

#[test]
fn sensor_and_collision_sides_are_dispatched_symmetrically() {
    let mut physics = manager();
    let mut scene = Scene::new();
    let (mover, sensor) = mover_and_sensor(&mut scene, &mut physics);
    let (mover_recorder, mover_log) = Recorder::new();
    let (sensor_recorder, sensor_log) = Recorder::new();
    scene
        .add_component(mover, Component::behaviour(mover_recorder), &mut physics)
        .unwrap();
    scene
        .add_component(sensor, Component::behaviour(sensor_recorder), &mut physics)
        .unwrap();

    for _ in 0..2 {
        physics.update(&mut scene, 0.0);
    }
    assert!(contacts(&mover_log).is_empty());

    let stats = physics.update(&mut scene, 0.0);
    assert_eq!(stats.contacts_dispatched, 1);
    assert_eq!(contacts(&mover_log), vec![Call::CollisionEnter(Some(sensor))]);
    assert_eq!(contacts(&sensor_log), vec![Call::SensorEnter(Some(mover))]);

    for _ in 0..5 {
        physics.update(&mut scene, 0.0);
    }
    assert_eq!(
        contacts(&mover_log),
        vec![
            Call::CollisionEnter(Some(sensor)),
            Call::CollisionExit(Some(sensor))
        ]
    );
    assert_eq!(
        contacts(&sensor_log),
        vec![Call::SensorEnter(Some(mover)), Call::SensorExit(Some(mover))]
    );
}

#[test]
fn contacts_arrive_before_the_step_fixed_update() {
    let mut physics = manager();
    let mut scene = Scene::new();
    let (mover, _) = mover_and_sensor(&mut scene, &mut physics);
    let (recorder, log) = Recorder::new();
    scene
        .add_component(mover, Component::behaviour(recorder), &mut physics)
        .unwrap();

    for _ in 0..3 {
        physics.update(&mut scene, 0.0);
    }

    let calls = log.lock().clone();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[2], Call::CollisionEnter(_)));
    assert_eq!(calls[3], Call::FixedUpdate);
}

#[test]
fn disabled_behaviours_receive_nothing() {
    let mut physics = manager();
    let mut scene = Scene::new();
    let (mover, _) = mover_and_sensor(&mut scene, &mut physics);
    let (recorder, log) = Recorder::new();
    let id = scene
        .add_component(mover, Component::behaviour(recorder), &mut physics)
        .unwrap();
    scene.set_component_enabled(mover, id, false).unwrap();

    for _ in 0..8 {
        physics.update(&mut scene, 0.0);
    }
    assert!(log.lock().is_empty());
}

#[test]
fn boundary_contact_reaches_only_the_entity() {
    let mut physics = manager();
    let mut scene = Scene::new();
    let walls = create_boundary_box(&mut physics, 10.0, 10.0, 0.2).unwrap();
    let ball = spawn_body(
        &mut scene,
        &mut physics,
        "ball",
        Vec2::new(4.5, 8.75),
        Collider::boxed(),
        RigidBody::dynamic().initial_velocity(Vec2::new(0.0, 4.0), 0.0),
    );
    let (recorder, log) = Recorder::new();
    scene
        .add_component(ball, Component::behaviour(recorder), &mut physics)
        .unwrap();

    let stats = physics.update(&mut scene, 0.0);

    assert_eq!(stats.contacts_dispatched, 1);
    assert_eq!(contacts(&log), vec![Call::CollisionEnter(None)]);
    assert_eq!(physics.world().body_user_data(walls[TOP_BOUNDARY]), None);
}

#[test]
fn contacts_between_unowned_bodies_are_ignored() {
    let mut physics = manager();
    let mut scene = Scene::new();
    create_boundary_box(&mut physics, 10.0, 10.0, 0.2).unwrap();
    scene_physics2d::factory::create_box_body(
        &mut physics,
        Vec2::ONE,
        Vec2::new(-0.5, 4.0),
        scene_physics2d::BodyType::Dynamic,
        &Default::default(),
        0.0,
    )
    .unwrap();

    let stats = physics.update(&mut scene, 0.0);
    assert_eq!(stats.contacts_dispatched, 0);
}

/// Records the pooled event each side receives on contact begin.
struct SeenEvents(Arc<Mutex<Vec<(EntityId, Collision)>>>);

impl PhysicsBehaviour for SeenEvents {
    fn on_collision_enter(&mut self, ctx: &mut PhysicsContext<'_>, collision: &Collision) {
        self.0.lock().push((ctx.entity(), *collision));
    }

    fn on_sensor_enter(&mut self, ctx: &mut PhysicsContext<'_>, collision: &Collision) {
        self.0.lock().push((ctx.entity(), *collision));
    }
}

fn fixture_of(scene: &Scene, entity: EntityId) -> FixtureHandle {
    scene
        .entity(entity)
        .and_then(|target| target.colliders().find_map(|(_, collider)| collider.fixture()))
        .unwrap()
}

#[test]
fn each_side_gets_its_own_pooled_event() {
    let mut physics = manager();
    let mut scene = Scene::new();
    let (mover, sensor) = mover_and_sensor(&mut scene, &mut physics);
    let seen = Arc::new(Mutex::new(Vec::new()));
    for entity in [mover, sensor] {
        scene
            .add_component(
                entity,
                Component::behaviour(SeenEvents(Arc::clone(&seen))),
                &mut physics,
            )
            .unwrap();
    }

    for _ in 0..8 {
        physics.update(&mut scene, 0.0);
        assert_eq!(physics.collision_pool().in_flight(), 0);
    }

    let mover_fixture = fixture_of(&scene, mover);
    let sensor_fixture = fixture_of(&scene, sensor);
    let seen = seen.lock();
    assert_eq!(seen.len(), 2);

    let received_by = |entity: EntityId| {
        seen.iter()
            .find(|(receiver, _)| *receiver == entity)
            .map(|(_, collision)| *collision)
            .unwrap()
    };

    let from_mover = received_by(mover);
    assert_eq!(from_mover.other(), Some(sensor));
    assert_eq!(from_mover.fixture(), mover_fixture);
    assert_eq!(from_mover.other_fixture(), sensor_fixture);
    assert!(!from_mover.is_sensor());

    let from_sensor = received_by(sensor);
    assert_eq!(from_sensor.other(), Some(mover));
    assert_eq!(from_sensor.fixture(), sensor_fixture);
    assert_eq!(from_sensor.other_fixture(), mover_fixture);
    assert!(from_sensor.is_sensor());
}
