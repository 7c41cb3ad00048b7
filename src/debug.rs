//! Debug overlay: turns backend shapes into projected line segments.

use std::sync::Arc;

use glam::{Mat4, Vec2};
use parking_lot::Mutex;

use crate::{
    backend::DebugShape,
    collision::shapes::{ShapeDescriptor, ShapeUtil},
    core::types::BodyType,
};

/// Receives the world's shapes once per rendered frame.
pub trait DebugRenderer: Send {
    fn render(&mut self, shapes: &[DebugShape], camera_combined: &Mat4);

    /// Called once when the owning manager is dropped.
    fn dispose(&mut self) {}
}

/// One projected segment of the overlay, in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: [f32; 4],
}

const INACTIVE_COLOR: [f32; 4] = [0.5, 0.5, 0.3, 1.0];
const STATIC_COLOR: [f32; 4] = [0.5, 0.9, 0.5, 1.0];
const KINEMATIC_COLOR: [f32; 4] = [0.5, 0.5, 0.9, 1.0];
const DYNAMIC_COLOR: [f32; 4] = [0.9, 0.7, 0.7, 1.0];
const SENSOR_COLOR: [f32; 4] = [0.9, 0.9, 0.3, 1.0];

fn shape_color(shape: &DebugShape) -> [f32; 4] {
    if !shape.active {
        INACTIVE_COLOR
    } else if shape.is_sensor {
        SENSOR_COLOR
    } else {
        match shape.body_type {
            BodyType::Static => STATIC_COLOR,
            BodyType::Kinematic => KINEMATIC_COLOR,
            BodyType::Dynamic => DYNAMIC_COLOR,
        }
    }
}

/// Collects overlay lines into a buffer shared with whoever draws them.
pub struct LineBatchRenderer {
    lines: Arc<Mutex<Vec<DebugLine>>>,
    circle_segments: usize,
    disposed: bool,
}

impl Default for LineBatchRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBatchRenderer {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            circle_segments: 16,
            disposed: false,
        }
    }

    pub fn with_circle_segments(mut self, segments: usize) -> Self {
        self.circle_segments = segments.max(3);
        self
    }

    /// Shared handle to the last frame's lines.
    pub fn lines(&self) -> Arc<Mutex<Vec<DebugLine>>> {
        Arc::clone(&self.lines)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl DebugRenderer for LineBatchRenderer {
    fn render(&mut self, shapes: &[DebugShape], camera_combined: &Mat4) {
        let project = |point: Vec2| camera_combined.project_point3(point.extend(0.0)).truncate();

        let mut lines = self.lines.lock();
        lines.clear();
        for shape in shapes {
            let color = shape_color(shape);
            let outline = ShapeUtil::outline(
                &shape.shape,
                shape.transform.position,
                shape.transform.angle,
                self.circle_segments,
            );
            let closed = !matches!(shape.shape, ShapeDescriptor::Edge { .. });
            let count = if closed { outline.len() } else { outline.len().saturating_sub(1) };

            lines.extend((0..count).map(|i| DebugLine {
                start: project(outline[i]),
                end: project(outline[(i + 1) % outline.len()]),
                color,
            }));
        }
    }

    fn dispose(&mut self) {
        self.lines.lock().clear();
        self.disposed = true;
    }
}
