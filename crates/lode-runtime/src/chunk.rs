use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use lode_geom::{Aabb, Vec3};
use lode_level::{CHUNK_SIZE, ChunkCoord};
use lode_mesh::ChunkMeshCpu;

const CLEAN: u8 = 0;
const DIRTY: u8 = 1;
const REBUILDING: u8 = 2;

/// Observable lifecycle state of a chunk's mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkStatus {
    /// Mesh matches the level contents.
    Clean,
    /// Level changed under this chunk; a rebuild is owed.
    Dirty,
    /// A worker owns the rebuild. At most one at a time.
    Rebuilding,
}

/// One 16x16x16 cell of the chunk grid.
///
/// Status transitions are lock-free: `mark_dirty` may be called from any
/// thread (level edits, light updates), `try_begin_rebuild` from the worker,
/// and `end_rebuild` from the render thread after the mesh is committed.
/// The `redirty` flag records edits that land while a rebuild is running so
/// the stale mesh is rebuilt again rather than kept.
pub struct Chunk {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    status: AtomicU8,
    redirty: AtomicBool,
    pending: Mutex<Option<ChunkMeshCpu>>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        let (bx, by, bz) = coord.base();
        let min = Vec3::new(bx as f32, by as f32, bz as f32);
        let size = CHUNK_SIZE as f32;
        Self {
            coord,
            bbox: Aabb::new(min, min + Vec3::new(size, size, size)),
            status: AtomicU8::new(CLEAN),
            redirty: AtomicBool::new(false),
            pending: Mutex::new(None),
        }
    }

    pub fn status(&self) -> ChunkStatus {
        match self.status.load(Ordering::Acquire) {
            DIRTY => ChunkStatus::Dirty,
            REBUILDING => ChunkStatus::Rebuilding,
            _ => ChunkStatus::Clean,
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.status.load(Ordering::Acquire) == DIRTY
    }

    /// Flags this chunk for rebuild. Idempotent; safe from any thread.
    ///
    /// If a rebuild is in progress the request is parked in `redirty` and
    /// honored when the rebuild ends. A request that races with the very end
    /// of a rebuild may leave `redirty` set after the status is already
    /// resolved, costing at most one redundant rebuild.
    pub fn mark_dirty(&self) {
        loop {
            match self.status.compare_exchange(
                CLEAN,
                DIRTY,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) | Err(DIRTY) => return,
                Err(_) => {
                    self.redirty.store(true, Ordering::Release);
                    if self.status.load(Ordering::Acquire) == REBUILDING {
                        return;
                    }
                    // Rebuild ended between the exchange and the flag store.
                }
            }
        }
    }

    /// Claims the rebuild. Returns true for exactly one caller per dirty
    /// cycle; never true again until `end_rebuild` runs.
    pub fn try_begin_rebuild(&self) -> bool {
        self.status
            .compare_exchange(DIRTY, REBUILDING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Closes the rebuild cycle. Edits that arrived during the rebuild
    /// flip the chunk straight back to dirty.
    pub fn end_rebuild(&self) {
        if self.redirty.swap(false, Ordering::AcqRel) {
            self.status.store(DIRTY, Ordering::Release);
        } else {
            let _ = self.status.compare_exchange(
                REBUILDING,
                CLEAN,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
    }

    /// Parks a finished CPU mesh for the render thread to commit.
    pub fn store_mesh(&self, mesh: ChunkMeshCpu) {
        let mut slot = match self.pending.lock() {
            Ok(s) => s,
            Err(p) => p.into_inner(),
        };
        *slot = Some(mesh);
    }

    /// Claims the parked mesh, if any.
    pub fn take_mesh(&self) -> Option<ChunkMeshCpu> {
        let mut slot = match self.pending.lock() {
            Ok(s) => s,
            Err(p) => p.into_inner(),
        };
        slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> Chunk {
        Chunk::new(ChunkCoord::new(0, 0, 0))
    }

    #[test]
    fn starts_clean() {
        let c = chunk();
        assert_eq!(c.status(), ChunkStatus::Clean);
        assert!(!c.try_begin_rebuild());
    }

    #[test]
    fn dirty_begin_end_cycle() {
        let c = chunk();
        c.mark_dirty();
        assert!(c.is_dirty());
        assert!(c.try_begin_rebuild());
        assert_eq!(c.status(), ChunkStatus::Rebuilding);
        assert!(!c.try_begin_rebuild());
        c.end_rebuild();
        assert_eq!(c.status(), ChunkStatus::Clean);
    }

    #[test]
    fn mark_dirty_is_idempotent() {
        let c = chunk();
        c.mark_dirty();
        c.mark_dirty();
        assert!(c.try_begin_rebuild());
        assert!(!c.try_begin_rebuild());
    }

    #[test]
    fn edit_during_rebuild_redirties() {
        let c = chunk();
        c.mark_dirty();
        assert!(c.try_begin_rebuild());
        c.mark_dirty();
        c.end_rebuild();
        assert_eq!(c.status(), ChunkStatus::Dirty);
        assert!(c.try_begin_rebuild());
        c.end_rebuild();
        assert_eq!(c.status(), ChunkStatus::Clean);
    }

    #[test]
    fn mesh_slot_roundtrip() {
        let c = chunk();
        assert!(c.take_mesh().is_none());
        let reg = lode_blocks::TileRegistry::builtin();
        let level = lode_level::Level::new(16, 16, 16);
        c.store_mesh(lode_mesh::build_chunk_mesh(&level, &reg, c.coord));
        assert!(c.take_mesh().is_some());
        assert!(c.take_mesh().is_none());
    }
}
