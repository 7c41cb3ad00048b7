mod dispatch;
pub mod garbage;

use std::time::Instant;

use glam::{Mat4, Vec2};
use log::{debug, warn};

use crate::{
    backend::{PhysicsBackend, SimpleWorld},
    collision::event::CollisionPool,
    config::{PhysicsSettings, MAX_FRAME_TIME},
    debug::DebugRenderer,
    scene::Scene,
    utils::{
        allocator::BodyHandle,
        logging::warn_if_frame_clamped,
        profiling::{FrameStats, PhaseTimer},
    },
};
use garbage::BodyGarbage;

/// Drives the physics backend for one scene.
///
/// Each frame runs one unconditional fixed step, then catches up on the time
/// accumulated beyond it, interpolating transforms inside the catch-up loop.
/// Contact callbacks for a step are dispatched right after that step and
/// before its fixed-update fan-out. Bodies queued for destruction are only
/// destroyed once all stepping of the frame is over.
pub struct PhysicsManager {
    backend: Box<dyn PhysicsBackend>,
    settings: PhysicsSettings,
    accumulator: f64,
    clock: Instant,
    garbage: BodyGarbage,
    pool: CollisionPool,
    debug_renderer: Option<Box<dyn DebugRenderer>>,
    last_frame: FrameStats,
}

impl Default for PhysicsManager {
    fn default() -> Self {
        Self::with_settings(PhysicsSettings::default())
    }
}

impl PhysicsManager {
    pub fn new(gravity: Vec2) -> Self {
        Self::with_settings(PhysicsSettings::with_gravity(gravity))
    }

    pub fn with_settings(settings: PhysicsSettings) -> Self {
        Self::with_backend(Box::new(SimpleWorld::new(settings.gravity)), settings)
    }

    /// Uses a custom backend; its gravity is overwritten with the settings' gravity.
    pub fn with_backend(mut backend: Box<dyn PhysicsBackend>, settings: PhysicsSettings) -> Self {
        backend.set_gravity(settings.gravity);
        Self {
            backend,
            settings,
            accumulator: 0.0,
            clock: Instant::now(),
            garbage: BodyGarbage::default(),
            pool: CollisionPool::default(),
            debug_renderer: None,
            last_frame: FrameStats::default(),
        }
    }

    /// Advances the simulation by a frame of `delta` seconds.
    pub fn update(&mut self, scene: &mut Scene, delta: f32) -> FrameStats {
        self.clock = Instant::now();
        self.advance(scene, f64::from(delta))
    }

    /// Like [`update`](Self::update), with the delta measured since the previous call.
    pub fn update_from_clock(&mut self, scene: &mut Scene) -> FrameStats {
        let now = Instant::now();
        let delta = now.duration_since(self.clock).as_secs_f64();
        self.clock = now;
        self.advance(scene, delta)
    }

    fn advance(&mut self, scene: &mut Scene, delta: f64) -> FrameStats {
        let frame_start = Instant::now();
        let mut stats = FrameStats::default();

        if self.settings.simulate {
            self.accumulator += sanitize_frame_time(delta);

            self.fixed_step(scene, &mut stats);

            let time_step = f64::from(self.settings.time_step);
            if time_step > 0.0 {
                while self.accumulator >= time_step {
                    self.fixed_step(scene, &mut stats);
                    self.accumulator -= time_step;
                    stats.catch_up_steps += 1;

                    let alpha = (self.accumulator / time_step) as f32;
                    dispatch::interpolate(scene, self.backend.as_ref(), alpha);
                    stats.interpolation_alpha = Some(alpha);
                }
            } else {
                warn!("time step {time_step} is not positive, skipping catch-up steps");
            }
        }

        stats.bodies_destroyed = self.collect_garbage(&mut stats);
        stats.total_frame_time = frame_start.elapsed();
        stats.report();
        self.last_frame = stats;
        stats
    }

    /// Steps the backend once, dispatches the step's contacts, then fans out fixed updates.
    fn fixed_step(&mut self, scene: &mut Scene, stats: &mut FrameStats) {
        let Self {
            backend,
            settings,
            garbage,
            pool,
            ..
        } = self;

        {
            let _timer = PhaseTimer::new(&mut stats.step_time);
            backend.step(
                settings.time_step,
                settings.velocity_iterations,
                settings.position_iterations,
            );
        }
        stats.steps += 1;

        let _timer = PhaseTimer::new(&mut stats.dispatch_time);
        let events = backend.drain_contact_events();
        stats.contacts_dispatched +=
            dispatch::dispatch_contacts(scene, &mut **backend, garbage, pool, events);
        dispatch::fixed_update(scene, &mut **backend, garbage, settings.time_step);
    }

    fn collect_garbage(&mut self, stats: &mut FrameStats) -> usize {
        let _timer = PhaseTimer::new(&mut stats.garbage_time);
        let mut destroyed = 0;
        for body in self.garbage.drain() {
            if self.backend.destroy_body(body) {
                destroyed += 1;
            }
        }
        if destroyed > 0 {
            debug!("garbage pass destroyed {destroyed} bodies");
        }
        destroyed
    }

    /// Queues `body` for destruction at the end of the current or next frame.
    ///
    /// Returns `false` if the body was already queued.
    pub fn destroy_physics_body(&mut self, body: BodyHandle) -> bool {
        self.garbage.queue(body)
    }

    /// Bodies waiting for the garbage pass, in queue order.
    pub fn pending_destruction(&self) -> &[BodyHandle] {
        self.garbage.as_slice()
    }

    /// Draws the backend's shapes through the installed renderer when debug lines are on.
    pub fn post_render(&mut self, camera_combined: &Mat4) {
        if !self.settings.render_debug_lines {
            return;
        }
        if let Some(renderer) = self.debug_renderer.as_mut() {
            renderer.render(&self.backend.debug_shapes(), camera_combined);
        }
    }

    /// Installs a debug renderer, returning the previous one.
    pub fn set_debug_renderer(
        &mut self,
        renderer: impl DebugRenderer + 'static,
    ) -> Option<Box<dyn DebugRenderer>> {
        self.debug_renderer.replace(Box::new(renderer))
    }

    pub fn take_debug_renderer(&mut self) -> Option<Box<dyn DebugRenderer>> {
        self.debug_renderer.take()
    }

    pub fn world(&self) -> &dyn PhysicsBackend {
        self.backend.as_ref()
    }

    /// Direct backend access. Bodies owned by rigid bodies must be destroyed
    /// through [`destroy_physics_body`](Self::destroy_physics_body), not here.
    pub fn world_mut(&mut self) -> &mut dyn PhysicsBackend {
        self.backend.as_mut()
    }

    pub(crate) fn garbage_mut(&mut self) -> &mut BodyGarbage {
        &mut self.garbage
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn collision_pool(&self) -> &CollisionPool {
        &self.pool
    }

    /// Statistics of the most recent update.
    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }

    pub fn time_step(&self) -> f32 {
        self.settings.time_step
    }

    pub fn set_time_step(&mut self, time_step: f32) {
        self.settings.time_step = time_step;
    }

    pub fn gravity(&self) -> Vec2 {
        self.backend.gravity()
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.settings.gravity = gravity;
        self.backend.set_gravity(gravity);
    }

    pub fn velocity_iterations(&self) -> i32 {
        self.settings.velocity_iterations
    }

    pub fn set_velocity_iterations(&mut self, iterations: i32) {
        self.settings.velocity_iterations = iterations;
    }

    pub fn position_iterations(&self) -> i32 {
        self.settings.position_iterations
    }

    pub fn set_position_iterations(&mut self, iterations: i32) {
        self.settings.position_iterations = iterations;
    }

    pub fn is_simulating(&self) -> bool {
        self.settings.simulate
    }

    pub fn set_simulate(&mut self, simulate: bool) {
        self.settings.simulate = simulate;
    }

    pub fn renders_debug_lines(&self) -> bool {
        self.settings.render_debug_lines
    }

    pub fn set_render_debug_lines(&mut self, render: bool) {
        self.settings.render_debug_lines = render;
    }
}

/// Clamps a frame delta into `[0, MAX_FRAME_TIME]`; non-finite deltas count as 0.
fn sanitize_frame_time(delta: f64) -> f64 {
    if !delta.is_finite() {
        warn!("ignoring non-finite frame time {delta}");
        return 0.0;
    }
    warn_if_frame_clamped(delta, MAX_FRAME_TIME);
    delta.clamp(0.0, MAX_FRAME_TIME)
}

impl Drop for PhysicsManager {
    fn drop(&mut self) {
        if let Some(mut renderer) = self.debug_renderer.take() {
            renderer.dispose();
        }
        self.backend.dispose();
        debug!("physics manager disposed");
    }
}
