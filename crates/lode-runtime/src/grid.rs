use std::sync::Arc;

use lode_level::{CHUNK_SIZE, ChunkCoord, Level, LevelListener};

use crate::chunk::Chunk;
use crate::stats::RenderStats;

/// The fixed grid of chunks covering the level, plus rebuild bookkeeping.
///
/// Registered as a level listener: every change event is widened by one
/// block on each axis before mapping to chunks, so a tile on a chunk border
/// also re-dirties the neighbor whose faces it occludes.
pub struct ChunkGrid {
    pub chunks_x: usize,
    pub chunks_y: usize,
    pub chunks_z: usize,
    chunks: Vec<Arc<Chunk>>,
    stats: RenderStats,
}

impl ChunkGrid {
    /// Lays out chunks over a level of the given tile dimensions. Partial
    /// chunks at the far edges are rounded up and read out-of-range tiles
    /// as air.
    pub fn new(level: &Level) -> Self {
        let chunks_x = level.width.div_ceil(CHUNK_SIZE);
        let chunks_y = level.height.div_ceil(CHUNK_SIZE);
        let chunks_z = level.length.div_ceil(CHUNK_SIZE);
        let mut chunks = Vec::with_capacity(chunks_x * chunks_y * chunks_z);
        for cx in 0..chunks_x {
            for cy in 0..chunks_y {
                for cz in 0..chunks_z {
                    chunks.push(Arc::new(Chunk::new(ChunkCoord::new(
                        cx as i32, cy as i32, cz as i32,
                    ))));
                }
            }
        }
        log::info!(
            "chunk grid {}x{}x{} ({} chunks)",
            chunks_x,
            chunks_y,
            chunks_z,
            chunks.len()
        );
        Self {
            chunks_x,
            chunks_y,
            chunks_z,
            chunks,
            stats: RenderStats::default(),
        }
    }

    #[inline]
    fn index(&self, cx: usize, cy: usize, cz: usize) -> usize {
        (cx * self.chunks_y + cy) * self.chunks_z + cz
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk_at(&self, cx: i32, cy: i32, cz: i32) -> Option<&Arc<Chunk>> {
        if cx < 0 || cy < 0 || cz < 0 {
            return None;
        }
        let (cx, cy, cz) = (cx as usize, cy as usize, cz as usize);
        if cx >= self.chunks_x || cy >= self.chunks_y || cz >= self.chunks_z {
            return None;
        }
        Some(&self.chunks[self.index(cx, cy, cz)])
    }

    /// Iterates chunks in the worker's scan order.
    pub fn chunks(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        self.chunks.iter()
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Dirties every chunk overlapping the tile-space box
    /// `(x0, y0, z0)..=(x1, y1, z1)`. Coordinates may lie outside the level;
    /// the chunk range is clamped to the grid.
    pub fn set_dirty_area(&self, x0: i32, y0: i32, z0: i32, x1: i32, y1: i32, z1: i32) {
        let size = CHUNK_SIZE as i32;
        let cx0 = (x0.div_euclid(size)).max(0);
        let cy0 = (y0.div_euclid(size)).max(0);
        let cz0 = (z0.div_euclid(size)).max(0);
        let cx1 = (x1.div_euclid(size)).min(self.chunks_x as i32 - 1);
        let cy1 = (y1.div_euclid(size)).min(self.chunks_y as i32 - 1);
        let cz1 = (z1.div_euclid(size)).min(self.chunks_z as i32 - 1);
        for cx in cx0..=cx1 {
            for cy in cy0..=cy1 {
                for cz in cz0..=cz1 {
                    self.chunks[self.index(cx as usize, cy as usize, cz as usize)].mark_dirty();
                }
            }
        }
    }

    /// Claims the rebuild of `chunk` for the calling worker.
    pub fn begin_rebuild(&self, chunk: &Chunk) -> bool {
        if chunk.try_begin_rebuild() {
            self.stats.note_begin();
            true
        } else {
            false
        }
    }

    /// Closes a rebuild after the render thread committed (or discarded)
    /// the chunk's mesh.
    pub fn finish_rebuild(&self, chunk: &Chunk) {
        chunk.end_rebuild();
        self.stats.note_finish();
    }
}

impl LevelListener for ChunkGrid {
    fn everything_changed(&self) {
        for chunk in &self.chunks {
            chunk.mark_dirty();
        }
    }

    fn light_level_changed(&self, x: i32, z: i32, min_y: i32, max_y: i32) {
        self.set_dirty_area(x - 1, min_y, z - 1, x + 1, max_y, z + 1);
    }

    fn tile_changed(&self, x: i32, y: i32, z: i32) {
        self.set_dirty_area(x - 1, y - 1, z - 1, x + 1, y + 1, z + 1);
    }
}
