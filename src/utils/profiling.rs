use std::time::{Duration, Instant};

/// Per-frame bookkeeping returned by [`crate::PhysicsManager::update`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Total fixed steps taken this frame, including the unconditional one.
    pub steps: u32,
    /// Steps taken by the catch-up loop.
    pub catch_up_steps: u32,
    /// Contact begin/end events translated into callbacks.
    pub contacts_dispatched: usize,
    /// Bodies removed by the garbage pass.
    pub bodies_destroyed: usize,
    /// Alpha used by the last interpolation pass, if one ran.
    pub interpolation_alpha: Option<f32>,

    pub step_time: Duration,
    pub dispatch_time: Duration,
    pub garbage_time: Duration,
    pub total_frame_time: Duration,
}

impl FrameStats {
    pub fn report(&self) {
        let total_us = self.total_frame_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "physics frame: steps {} (catch-up {}), contacts {}, destroyed {}, total {:.2} ms",
            self.steps,
            self.catch_up_steps,
            self.contacts_dispatched,
            self.bodies_destroyed,
            self.total_frame_time.as_secs_f32() * 1000.0
        );
        log::debug!(
            "  step {:.1}% | dispatch {:.1}% | garbage {:.1}%",
            (self.step_time.as_micros() as f32 / total_us) * 100.0,
            (self.dispatch_time.as_micros() as f32 / total_us) * 100.0,
            (self.garbage_time.as_micros() as f32 / total_us) * 100.0
        );
    }
}

/// Adds the elapsed time of a scope onto a duration slot.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_timer_accumulates_into_its_slot() {
        let mut stats = FrameStats::default();
        {
            let _timer = PhaseTimer::new(&mut stats.step_time);
            std::thread::sleep(Duration::from_millis(1));
        }
        let first = stats.step_time;
        assert!(first >= Duration::from_millis(1));

        {
            let _timer = PhaseTimer::new(&mut stats.step_time);
        }
        assert!(stats.step_time >= first);
        assert_eq!(stats.dispatch_time, Duration::ZERO);
    }
}
