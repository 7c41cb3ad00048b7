use log::{Level, log_enabled, warn};
use std::time::Instant;

/// Scoped timer that traces how long a physics phase took.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Warns when a frame was long enough to be clamped by the stepping loop.
pub fn warn_if_frame_clamped(frame_time: f64, max_frame_time: f64) {
    if frame_time > max_frame_time {
        warn!(
            "Frame time {:.2} ms clamped to {:.2} ms",
            frame_time * 1000.0,
            max_frame_time * 1000.0
        );
    }
}
