//! Utility helpers: generational allocation, logging, profiling and math.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;

pub use allocator::{Arena, BodyHandle, EntityId, FixtureHandle, GenerationalId};
pub use profiling::FrameStats;
