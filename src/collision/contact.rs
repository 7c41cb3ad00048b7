use serde::{Deserialize, Serialize};

use crate::utils::allocator::FixtureHandle;

/// Whether a contact pair started or stopped touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactPhase {
    Begin,
    End,
}

/// Low-level contact signal emitted by a backend during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub fixture_a: FixtureHandle,
    pub fixture_b: FixtureHandle,
}

impl ContactEvent {
    pub fn begin(fixture_a: FixtureHandle, fixture_b: FixtureHandle) -> Self {
        Self {
            phase: ContactPhase::Begin,
            fixture_a,
            fixture_b,
        }
    }

    pub fn end(fixture_a: FixtureHandle, fixture_b: FixtureHandle) -> Self {
        Self {
            phase: ContactPhase::End,
            fixture_a,
            fixture_b,
        }
    }
}
