mod common;

use std::sync::Arc;
use std::thread;

use common::{manager, mover_and_sensor, Recorder};
use parking_lot::Mutex;
use scene_physics2d::{Component, PhysicsManager, Scene};

#[test]
fn manager_and_scene_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<PhysicsManager>();
    assert_send::<Scene>();
}

#[test]
fn simulation_can_move_to_a_worker_thread() {
    let mut physics = manager();
    let mut scene = Scene::new();
    let (mover, _) = mover_and_sensor(&mut scene, &mut physics);
    let (recorder, log) = Recorder::new();
    scene
        .add_component(mover, Component::behaviour(recorder), &mut physics)
        .unwrap();

    let handle = thread::spawn(move || {
        for _ in 0..4 {
            physics.update(&mut scene, 0.0);
        }
        scene.transform(mover).copied()
    });

    let transform = handle.join().unwrap().unwrap();
    assert_eq!(transform.position.x, 2.0);
    assert_eq!(log.lock().len(), 5);
}

#[test]
fn shared_simulation_behind_a_mutex() {
    let mut physics = manager();
    let mut scene = Scene::new();
    mover_and_sensor(&mut scene, &mut physics);
    let shared = Arc::new(Mutex::new((physics, scene)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut guard = shared.lock();
                let (physics, scene) = &mut *guard;
                physics.update(scene, 0.0).steps
            })
        })
        .collect();

    let steps: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(steps, 4);
}
