use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use lode_blocks::TileRegistry;
use lode_level::Level;
use lode_mesh::build_chunk_mesh;

use crate::chunk::Chunk;
use crate::grid::ChunkGrid;

/// Rebuilds claimed but not yet committed. Keeps the worker from running
/// ahead of the render thread's per-frame upload budget.
pub const MAX_REBUILDS_IN_FLIGHT: u32 = 2;

/// Single-lock queue of chunks whose CPU mesh is ready for GPU commit.
/// The worker pushes, the render thread drains once per frame.
pub struct Handoff {
    ready: Mutex<Vec<Arc<Chunk>>>,
}

impl Handoff {
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, chunk: Arc<Chunk>) {
        let mut ready = match self.ready.lock() {
            Ok(r) => r,
            Err(p) => p.into_inner(),
        };
        ready.push(chunk);
    }

    /// Takes everything queued so far.
    pub fn drain(&self) -> Vec<Arc<Chunk>> {
        let mut ready = match self.ready.lock() {
            Ok(r) => r,
            Err(p) => p.into_inner(),
        };
        std::mem::take(&mut *ready)
    }
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new()
    }
}

/// One sweep over the grid in scan order: claim dirty chunks up to the
/// in-flight cap, build their meshes, and queue them on the handoff.
/// Returns the number of chunks built.
pub fn scan_pass(
    level: &Level,
    reg: &TileRegistry,
    grid: &ChunkGrid,
    handoff: &Handoff,
) -> usize {
    let mut built = 0;
    for chunk in grid.chunks() {
        if grid.stats().in_flight() >= MAX_REBUILDS_IN_FLIGHT {
            break;
        }
        if !grid.begin_rebuild(chunk) {
            continue;
        }
        let started = std::time::Instant::now();
        chunk.store_mesh(build_chunk_mesh(level, reg, chunk.coord));
        log::debug!("rebuilt {:?} in {:?}", chunk.coord, started.elapsed());
        handoff.push(Arc::clone(chunk));
        built += 1;
    }
    built
}

/// Background worker that turns dirty chunks into CPU meshes.
///
/// The worker polls the grid; when a full pass claims nothing it yields
/// the timeslice and scans again. `stop` (also run on drop) signals the
/// worker and joins it.
pub struct RebuildScheduler {
    handoff: Arc<Handoff>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl RebuildScheduler {
    pub fn spawn(
        level: Arc<Level>,
        reg: Arc<TileRegistry>,
        grid: Arc<ChunkGrid>,
    ) -> io::Result<Self> {
        let handoff = Arc::new(Handoff::new());
        let stop = Arc::new(AtomicBool::new(false));
        let worker = {
            let handoff = Arc::clone(&handoff);
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("lode-rebuild".into())
                .spawn(move || {
                    log::info!("rebuild worker up");
                    while !stop.load(Ordering::Acquire) {
                        if scan_pass(&level, &reg, &grid, &handoff) == 0 {
                            thread::yield_now();
                        }
                    }
                    log::info!("rebuild worker down");
                })?
        };
        Ok(Self {
            handoff,
            stop,
            worker: Some(worker),
        })
    }

    pub fn handoff(&self) -> &Arc<Handoff> {
        &self.handoff
    }

    /// Signals the worker and waits for it to exit. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("rebuild worker panicked");
            }
        }
    }
}

impl Drop for RebuildScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
