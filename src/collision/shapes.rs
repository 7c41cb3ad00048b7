use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PhysicsError, PhysicsResult},
    utils::math::rotate,
};

/// Largest vertex count a polygon fixture may carry.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Geometry handed to the backend when a fixture is created, in body space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeDescriptor {
    Circle { radius: f32, center: Vec2 },
    Polygon { vertices: Vec<Vec2> },
    Edge { start: Vec2, end: Vec2 },
}

impl ShapeDescriptor {
    /// Oriented box centred on `center`, rotated by `angle` radians.
    pub fn oriented_box(half_extents: Vec2, center: Vec2, angle: f32) -> Self {
        let corners = [
            Vec2::new(-half_extents.x, -half_extents.y),
            Vec2::new(half_extents.x, -half_extents.y),
            Vec2::new(half_extents.x, half_extents.y),
            Vec2::new(-half_extents.x, half_extents.y),
        ];
        ShapeDescriptor::Polygon {
            vertices: corners
                .iter()
                .map(|corner| center + rotate(*corner, angle))
                .collect(),
        }
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        match self {
            ShapeDescriptor::Circle { radius, .. } => {
                if *radius <= 0.0 || !radius.is_finite() {
                    return Err(PhysicsError::InvalidShape(format!(
                        "circle radius must be positive, got {radius}"
                    )));
                }
            }
            ShapeDescriptor::Polygon { vertices } => {
                if vertices.len() < 3 || vertices.len() > MAX_POLYGON_VERTICES {
                    return Err(PhysicsError::InvalidShape(format!(
                        "polygon needs 3..={MAX_POLYGON_VERTICES} vertices, got {}",
                        vertices.len()
                    )));
                }
                if ShapeUtil::polygon_area(vertices).abs() <= f32::EPSILON {
                    return Err(PhysicsError::InvalidShape(
                        "polygon is degenerate".to_string(),
                    ));
                }
            }
            ShapeDescriptor::Edge { start, end } => {
                if start.distance_squared(*end) <= f32::EPSILON {
                    return Err(PhysicsError::InvalidShape(
                        "edge endpoints coincide".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Shape placed in world space, ready for overlap tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f32 },
    Bounds(Aabb),
}

impl WorldShape {
    pub fn overlaps(&self, other: &WorldShape) -> bool {
        match (self, other) {
            (
                WorldShape::Circle {
                    center: a,
                    radius: ra,
                },
                WorldShape::Circle {
                    center: b,
                    radius: rb,
                },
            ) => a.distance_squared(*b) < (ra + rb) * (ra + rb),
            (WorldShape::Circle { center, radius }, WorldShape::Bounds(aabb))
            | (WorldShape::Bounds(aabb), WorldShape::Circle { center, radius }) => {
                aabb.closest_point(*center).distance_squared(*center) < radius * radius
            }
            (WorldShape::Bounds(a), WorldShape::Bounds(b)) => a.overlaps(b),
        }
    }
}

/// Helper utilities for areas, outlines and world placement of shapes.
pub struct ShapeUtil;

impl ShapeUtil {
    pub fn area(shape: &ShapeDescriptor) -> f32 {
        match shape {
            ShapeDescriptor::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            ShapeDescriptor::Polygon { vertices } => Self::polygon_area(vertices).abs(),
            ShapeDescriptor::Edge { .. } => 0.0,
        }
    }

    /// Signed shoelace area.
    pub fn polygon_area(vertices: &[Vec2]) -> f32 {
        let n = vertices.len();
        if n < 3 {
            return 0.0;
        }
        0.5 * (0..n)
            .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
            .sum::<f32>()
    }

    /// Places `shape` at a body pose (`position` in world units, `angle` in radians).
    pub fn to_world(shape: &ShapeDescriptor, position: Vec2, angle: f32) -> WorldShape {
        match shape {
            ShapeDescriptor::Circle { radius, center } => WorldShape::Circle {
                center: position + rotate(*center, angle),
                radius: *radius,
            },
            _ => {
                let outline = Self::outline(shape, position, angle, 0);
                let aabb = Aabb::from_points(outline).unwrap_or(Aabb {
                    min: position,
                    max: position,
                });
                WorldShape::Bounds(aabb)
            }
        }
    }

    /// World-space outline; circles are approximated with `circle_segments` points.
    pub fn outline(
        shape: &ShapeDescriptor,
        position: Vec2,
        angle: f32,
        circle_segments: usize,
    ) -> Vec<Vec2> {
        match shape {
            ShapeDescriptor::Circle { radius, center } => {
                let world_center = position + rotate(*center, angle);
                let segments = circle_segments.max(3);
                (0..segments)
                    .map(|i| {
                        let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
                        world_center + Vec2::from_angle(theta) * *radius
                    })
                    .collect()
            }
            ShapeDescriptor::Polygon { vertices } => vertices
                .iter()
                .map(|v| position + rotate(*v, angle))
                .collect(),
            ShapeDescriptor::Edge { start, end } => vec![
                position + rotate(*start, angle),
                position + rotate(*end, angle),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oriented_box_has_expected_area() {
        let shape = ShapeDescriptor::oriented_box(Vec2::new(1.0, 0.5), Vec2::ZERO, 0.3);
        assert!((ShapeUtil::area(&shape) - 2.0).abs() < 1e-5);
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn polygon_vertex_limits_are_enforced() {
        let two = ShapeDescriptor::Polygon {
            vertices: vec![Vec2::ZERO, Vec2::X],
        };
        assert!(matches!(two.validate(), Err(PhysicsError::InvalidShape(_))));

        let nine = ShapeDescriptor::Polygon {
            vertices: (0..9)
                .map(|i| Vec2::from_angle(i as f32 * 0.6))
                .collect(),
        };
        assert!(nine.validate().is_err());
    }

    #[test]
    fn touching_bounds_do_not_overlap() {
        let a = WorldShape::Bounds(Aabb {
            min: Vec2::ZERO,
            max: Vec2::ONE,
        });
        let b = WorldShape::Bounds(Aabb {
            min: Vec2::new(1.0, 0.0),
            max: Vec2::new(2.0, 1.0),
        });
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn circle_against_bounds_uses_closest_point() {
        let bounds = WorldShape::Bounds(Aabb {
            min: Vec2::ZERO,
            max: Vec2::ONE,
        });
        let near = WorldShape::Circle {
            center: Vec2::new(1.4, 0.5),
            radius: 0.5,
        };
        let corner = WorldShape::Circle {
            center: Vec2::new(1.4, 1.4),
            radius: 0.5,
        };
        assert!(near.overlaps(&bounds));
        assert!(!corner.overlaps(&bounds));
    }
}
