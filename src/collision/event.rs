//! Collision events handed to behaviours, served from a small scoped pool.

use crate::{
    config::COLLISION_POOL_CAPACITY,
    utils::allocator::{EntityId, FixtureHandle},
};

/// One endpoint of a contact, seen from the entity receiving the callback.
///
/// Only valid for the duration of the callback that receives it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collision {
    other: Option<EntityId>,
    fixture: FixtureHandle,
    other_fixture: FixtureHandle,
    is_sensor: bool,
}

impl Collision {
    pub fn new(
        other: Option<EntityId>,
        fixture: FixtureHandle,
        other_fixture: FixtureHandle,
        is_sensor: bool,
    ) -> Self {
        Self {
            other,
            fixture,
            other_fixture,
            is_sensor,
        }
    }

    /// The entity on the other side; `None` for bodies no entity owns (walls, boundaries).
    pub fn other(&self) -> Option<EntityId> {
        self.other
    }

    /// This side's fixture.
    pub fn fixture(&self) -> FixtureHandle {
        self.fixture
    }

    pub fn other_fixture(&self) -> FixtureHandle {
        self.other_fixture
    }

    /// Whether this side's fixture is a sensor.
    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }
}

/// Arena of reusable collision slots.
///
/// Events are only reachable inside [`CollisionPool::with_pair`]; both slots go
/// back to the free list when the closure returns or unwinds.
pub struct CollisionPool {
    slots: Vec<Collision>,
    free: Vec<usize>,
    in_flight: usize,
}

impl Default for CollisionPool {
    fn default() -> Self {
        Self::new(COLLISION_POOL_CAPACITY)
    }
}

impl CollisionPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Collision::default(); capacity],
            free: (0..capacity).rev().collect(),
            in_flight: 0,
        }
    }

    /// Number of events currently handed out.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of slots ever allocated.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Acquires two events, runs `f` with them and releases both afterwards.
    pub fn with_pair<R>(
        &mut self,
        a: Collision,
        b: Collision,
        f: impl FnOnce(&Collision, &Collision) -> R,
    ) -> R {
        let a = self.obtain(a);
        let b = self.obtain(b);
        let guard = PairGuard { pool: self, a, b };
        let result = f(&guard.pool.slots[guard.a], &guard.pool.slots[guard.b]);
        drop(guard);
        result
    }

    fn obtain(&mut self, value: Collision) -> usize {
        self.in_flight += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = value;
                index
            }
            None => {
                log::trace!("collision pool grew to {} slots", self.slots.len() + 1);
                self.slots.push(value);
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, index: usize) {
        self.slots[index] = Collision::default();
        self.in_flight -= 1;
        self.free.push(index);
    }
}

struct PairGuard<'p> {
    pool: &'p mut CollisionPool,
    a: usize,
    b: usize,
}

impl Drop for PairGuard<'_> {
    fn drop(&mut self) {
        self.pool.release(self.b);
        self.pool.release(self.a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collision(index: usize, sensor: bool) -> Collision {
        Collision::new(
            Some(EntityId::new(index, 0)),
            FixtureHandle::new(index, 0),
            FixtureHandle::new(index + 1, 0),
            sensor,
        )
    }

    #[test]
    fn pair_is_released_after_dispatch() {
        let mut pool = CollisionPool::new(2);
        let seen = pool.with_pair(collision(1, false), collision(2, true), |a, b| {
            (a.other(), b.is_sensor())
        });
        assert_eq!(seen, (Some(EntityId::new(1, 0)), true));
        assert_eq!(pool.in_flight(), 0);
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn slots_are_reused_between_dispatches() {
        let mut pool = CollisionPool::new(2);
        for i in 0..10 {
            pool.with_pair(collision(i, false), collision(i + 100, false), |a, b| {
                assert_eq!(a.fixture(), FixtureHandle::new(i, 0));
                assert_eq!(b.fixture(), FixtureHandle::new(i + 100, 0));
            });
        }
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn overlapping_pairs_never_share_slots() {
        let mut pool = CollisionPool::new(2);
        let mut outer = Vec::new();
        pool.with_pair(collision(1, false), collision(2, false), |a, b| {
            outer.push(*a);
            outer.push(*b);
        });
        // A second acquisition while nothing is released must grow, not alias.
        let a = pool.obtain(collision(3, false));
        let b = pool.obtain(collision(4, false));
        let c = pool.obtain(collision(5, false));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(pool.in_flight(), 3);
        assert_eq!(pool.allocated(), 3);
        assert_eq!(outer[0].other(), Some(EntityId::new(1, 0)));
    }
}
