//! The level: a fixed-size tile grid, solidity/light queries, and change
//! events consumed by the renderer's dirty tracker.
#![forbid(unsafe_code)]

mod worldgen;

pub use worldgen::{GenMode, generate};

use std::sync::RwLock;
use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use lode_blocks::types::AIR;
use lode_blocks::{TileId, TileRegistry};

/// Edge length of one cubic chunk, in tiles.
pub const CHUNK_SIZE: usize = 16;

/// Integer chunk-grid coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// World-space coordinate of this chunk's minimum corner.
    #[inline]
    pub fn base(self) -> (i32, i32, i32) {
        (
            self.cx * CHUNK_SIZE as i32,
            self.cy * CHUNK_SIZE as i32,
            self.cz * CHUNK_SIZE as i32,
        )
    }
}

/// Receiver for world change events. Implementations must tolerate calls
/// from whichever thread mutates the level.
pub trait LevelListener: Send + Sync {
    /// The whole level changed (bulk load / regenerate).
    fn everything_changed(&self);
    /// The light depth of column `(x, z)` moved; `min_y..=max_y` spans the
    /// affected cells.
    fn light_level_changed(&self, x: i32, z: i32, min_y: i32, max_y: i32);
    /// A single tile changed.
    fn tile_changed(&self, x: i32, y: i32, z: i32);
}

/// The world grid. Cells are relaxed atomics: the rebuild thread reads them
/// while the main thread writes, without fencing. A rebuild that observes a
/// half-applied edit produces a stale mesh that the accompanying change
/// event re-dirties, so the next pass corrects it.
pub struct Level {
    pub width: usize,
    pub height: usize,
    pub length: usize,
    tiles: Vec<AtomicU8>,
    /// Per-(x,z) column: 1 + y of the highest occluding tile, 0 if none.
    light_depths: Vec<AtomicI32>,
    listeners: RwLock<Vec<std::sync::Arc<dyn LevelListener>>>,
}

impl Level {
    pub fn new(width: usize, height: usize, length: usize) -> Self {
        let tiles = (0..width * height * length).map(|_| AtomicU8::new(AIR)).collect();
        let light_depths = (0..width * length).map(|_| AtomicI32::new(0)).collect();
        Self {
            width,
            height,
            length,
            tiles,
            light_depths,
            listeners: RwLock::new(Vec::new()),
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.length + z) * self.width + x
    }

    #[inline]
    pub fn is_in_range(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.length
    }

    /// The tile at `(x, y, z)`, or air when out of range.
    #[inline]
    pub fn get_tile(&self, x: i32, y: i32, z: i32) -> TileId {
        if !self.is_in_range(x, y, z) {
            return AIR;
        }
        self.tiles[self.idx(x as usize, y as usize, z as usize)].load(Ordering::Relaxed)
    }

    pub fn is_solid_tile(&self, reg: &TileRegistry, x: i32, y: i32, z: i32) -> bool {
        reg.is_solid(self.get_tile(x, y, z))
    }

    /// Whether the cell receives direct sky light. Out-of-range cells are lit.
    #[inline]
    pub fn is_lit(&self, x: i32, y: i32, z: i32) -> bool {
        if !self.is_in_range(x, y, z) {
            return true;
        }
        let depth = self.light_depths[z as usize * self.width + x as usize].load(Ordering::Relaxed);
        y >= depth
    }

    /// Sets a tile and fires `tile_changed` (and `light_level_changed` when
    /// the column's light depth moves). Returns false when out of range or
    /// unchanged.
    pub fn set_tile(&self, reg: &TileRegistry, x: i32, y: i32, z: i32, id: TileId) -> bool {
        if !self.is_in_range(x, y, z) {
            return false;
        }
        let cell = &self.tiles[self.idx(x as usize, y as usize, z as usize)];
        if cell.swap(id, Ordering::Relaxed) == id {
            return false;
        }
        self.update_light_column(reg, x as usize, z as usize, true);
        self.for_each_listener(|l| l.tile_changed(x, y, z));
        true
    }

    /// Writes a tile without firing events; used by bulk generation. Callers
    /// must follow up with [`Level::recalc_light`] and
    /// [`Level::notify_everything_changed`].
    pub fn set_tile_silent(&self, x: i32, y: i32, z: i32, id: TileId) {
        if self.is_in_range(x, y, z) {
            self.tiles[self.idx(x as usize, y as usize, z as usize)].store(id, Ordering::Relaxed);
        }
    }

    /// Recomputes every column's light depth without firing events.
    pub fn recalc_light(&self, reg: &TileRegistry) {
        for z in 0..self.length {
            for x in 0..self.width {
                self.update_light_column(reg, x, z, false);
            }
        }
    }

    fn update_light_column(&self, reg: &TileRegistry, x: usize, z: usize, notify: bool) {
        let mut depth = 0i32;
        for y in (0..self.height).rev() {
            let id = self.tiles[self.idx(x, y, z)].load(Ordering::Relaxed);
            if reg.is_occluding(id) {
                depth = y as i32 + 1;
                break;
            }
        }
        let old = self.light_depths[z * self.width + x].swap(depth, Ordering::Relaxed);
        if notify && old != depth {
            let (min_y, max_y) = (old.min(depth), old.max(depth));
            self.for_each_listener(|l| l.light_level_changed(x as i32, z as i32, min_y, max_y));
        }
    }

    pub fn add_listener(&self, listener: std::sync::Arc<dyn LevelListener>) {
        if let Ok(mut guard) = self.listeners.write() {
            guard.push(listener);
        }
    }

    pub fn notify_everything_changed(&self) {
        self.for_each_listener(|l| l.everything_changed());
    }

    fn for_each_listener(&self, f: impl Fn(&dyn LevelListener)) {
        if let Ok(guard) = self.listeners.read() {
            for l in guard.iter() {
                f(l.as_ref());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn reg() -> TileRegistry {
        TileRegistry::builtin()
    }

    #[derive(Default)]
    struct CountingListener {
        tiles: AtomicUsize,
        lights: AtomicUsize,
        everything: AtomicUsize,
    }

    impl LevelListener for CountingListener {
        fn everything_changed(&self) {
            self.everything.fetch_add(1, Ordering::SeqCst);
        }
        fn light_level_changed(&self, _x: i32, _z: i32, _min_y: i32, _max_y: i32) {
            self.lights.fetch_add(1, Ordering::SeqCst);
        }
        fn tile_changed(&self, _x: i32, _y: i32, _z: i32) {
            self.tiles.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn out_of_range_reads_as_air() {
        let level = Level::new(16, 16, 16);
        assert_eq!(level.get_tile(-1, 0, 0), AIR);
        assert_eq!(level.get_tile(0, 16, 0), AIR);
    }

    #[test]
    fn set_tile_fires_change_event_once() {
        let reg = reg();
        let level = Level::new(16, 16, 16);
        let listener = Arc::new(CountingListener::default());
        level.add_listener(listener.clone());

        let rock = reg.id_by_name("rock").unwrap();
        assert!(level.set_tile(&reg, 1, 2, 3, rock));
        assert_eq!(listener.tiles.load(Ordering::SeqCst), 1);
        // Same value again: no event.
        assert!(!level.set_tile(&reg, 1, 2, 3, rock));
        assert_eq!(listener.tiles.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn light_depth_tracks_highest_occluder() {
        let reg = reg();
        let level = Level::new(16, 16, 16);
        let rock = reg.id_by_name("rock").unwrap();

        assert!(level.is_lit(4, 0, 4));
        level.set_tile(&reg, 4, 7, 4, rock);
        assert!(!level.is_lit(4, 0, 4));
        assert!(!level.is_lit(4, 7, 4));
        assert!(level.is_lit(4, 8, 4));

        level.set_tile(&reg, 4, 7, 4, AIR);
        assert!(level.is_lit(4, 0, 4));
    }

    #[test]
    fn leaves_do_not_block_light() {
        let reg = reg();
        let level = Level::new(16, 16, 16);
        let leaves = reg.id_by_name("leaves").unwrap();
        level.set_tile(&reg, 2, 9, 2, leaves);
        assert!(level.is_lit(2, 0, 2));
    }

    #[test]
    fn light_event_spans_old_and_new_depth() {
        let reg = reg();
        let level = Level::new(16, 16, 16);
        let listener = Arc::new(CountingListener::default());
        level.add_listener(listener.clone());
        let rock = reg.id_by_name("rock").unwrap();

        level.set_tile(&reg, 0, 10, 0, rock);
        assert_eq!(listener.lights.load(Ordering::SeqCst), 1);
        // Placing below the occluder leaves the depth alone.
        level.set_tile(&reg, 0, 2, 0, rock);
        assert_eq!(listener.lights.load(Ordering::SeqCst), 1);
    }
}
