use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Rebuild bookkeeping, owned by the grid it describes.
#[derive(Default)]
pub struct RenderStats {
    updates: AtomicUsize,
    in_flight: AtomicU32,
}

impl RenderStats {
    /// Total chunk rebuilds committed since startup.
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::Acquire)
    }

    /// Rebuilds claimed but not yet committed by the render thread.
    pub fn in_flight(&self) -> u32 {
        self.in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn note_begin(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn note_finish(&self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        self.updates.fetch_add(1, Ordering::AcqRel);
    }
}
