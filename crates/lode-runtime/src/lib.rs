//! Chunk lifecycle: dirty tracking, the background rebuild worker, and the
//! handoff queue that carries finished CPU meshes to the render thread.
#![forbid(unsafe_code)]

mod chunk;
mod grid;
mod scheduler;
mod stats;

pub use chunk::{Chunk, ChunkStatus};
pub use grid::ChunkGrid;
pub use scheduler::{Handoff, MAX_REBUILDS_IN_FLIGHT, RebuildScheduler, scan_pass};
pub use stats::RenderStats;
