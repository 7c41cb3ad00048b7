use crate::utils::allocator::BodyHandle;

/// Bodies waiting for the post-step garbage pass.
///
/// Queuing is idempotent so a body can be requested for destruction from
/// several callbacks in the same frame.
#[derive(Debug, Default, Clone)]
pub struct BodyGarbage {
    queued: Vec<BodyHandle>,
}

impl BodyGarbage {
    /// Returns `false` when the body was already queued.
    pub fn queue(&mut self, body: BodyHandle) -> bool {
        if self.queued.contains(&body) {
            return false;
        }
        self.queued.push(body);
        true
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.queued.contains(&body)
    }

    pub fn as_slice(&self) -> &[BodyHandle] {
        &self.queued
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub(crate) fn drain(&mut self) -> Vec<BodyHandle> {
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_idempotent_and_ordered() {
        let mut garbage = BodyGarbage::default();
        let a = BodyHandle::new(0, 0);
        let b = BodyHandle::new(1, 0);

        assert!(garbage.queue(a));
        assert!(garbage.queue(b));
        assert!(!garbage.queue(a));
        assert_eq!(garbage.as_slice(), &[a, b]);

        assert_eq!(garbage.drain(), vec![a, b]);
        assert!(garbage.is_empty());
    }
}
