// 🔢 Identifier Allocator - monotonic ids shared by every entity kind
//
// One allocator is built at startup and handed (Arc) to whoever needs ids.
// After CSV bootstrap it is raised past every loaded id so fresh ids never
// collide with persisted ones.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{ClinicError, Result};

/// Identifier of a doctor, patient or appointment.
pub type RecordId = u32;

#[derive(Debug, Default)]
pub struct IdAllocator {
    counter: AtomicU32,
}

impl IdAllocator {
    /// New allocator; the first generated id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator whose next id is `last + 1`.
    pub fn starting_after(last: RecordId) -> Self {
        IdAllocator {
            counter: AtomicU32::new(last),
        }
    }

    /// Issue the next id (previous + 1).
    ///
    /// Fails once `RecordId::MAX` has been issued or seeded; the counter
    /// never wraps, so ids are never handed out twice.
    pub fn generate_id(&self) -> Result<RecordId> {
        self.counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|last| last + 1)
            .map_err(|last| {
                ClinicError::invalid(format!("identifier space exhausted after {}", last))
            })
    }

    /// Raise the counter to at least `min`. Never lowers it; `0` is ignored.
    pub fn ensure_at_least(&self, min: RecordId) {
        if min == 0 {
            return;
        }
        self.counter.fetch_max(min, Ordering::SeqCst);
    }

    /// Last id issued or seeded.
    pub fn current(&self) -> RecordId {
        self.counter.load(Ordering::SeqCst)
    }
}
