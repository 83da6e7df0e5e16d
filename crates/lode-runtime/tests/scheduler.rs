use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lode_blocks::TileRegistry;
use lode_level::{Level, LevelListener};
use lode_runtime::{ChunkGrid, ChunkStatus, Handoff, MAX_REBUILDS_IN_FLIGHT, RebuildScheduler, scan_pass};

const DEADLINE: Duration = Duration::from_secs(10);

fn wait_until(mut done: impl FnMut() -> bool) {
    let start = Instant::now();
    while !done() {
        assert!(start.elapsed() < DEADLINE, "timed out");
        thread::yield_now();
    }
}

fn setup(w: usize, h: usize, l: usize) -> (Arc<Level>, Arc<TileRegistry>, Arc<ChunkGrid>) {
    let level = Arc::new(Level::new(w, h, l));
    let reg = Arc::new(TileRegistry::builtin());
    let grid = Arc::new(ChunkGrid::new(&level));
    let rock = reg.id_by_name("rock").unwrap();
    for x in 0..w as i32 {
        for z in 0..l as i32 {
            level.set_tile_silent(x, 0, z, rock);
        }
    }
    (level, reg, grid)
}

#[test]
fn scan_pass_respects_the_in_flight_cap() {
    let (level, reg, grid) = setup(48, 16, 16);
    let handoff = Handoff::new();
    grid.everything_changed();

    let built = scan_pass(&level, &reg, &grid, &handoff);
    assert_eq!(built as u32, MAX_REBUILDS_IN_FLIGHT);
    assert_eq!(grid.stats().in_flight(), MAX_REBUILDS_IN_FLIGHT);

    // Saturated: another pass claims nothing.
    assert_eq!(scan_pass(&level, &reg, &grid, &handoff), 0);

    // Committing the queued meshes frees the budget.
    for chunk in handoff.drain() {
        assert!(chunk.take_mesh().is_some());
        grid.finish_rebuild(&chunk);
    }
    assert_eq!(grid.stats().in_flight(), 0);
    assert_eq!(scan_pass(&level, &reg, &grid, &handoff), 1);
}

#[test]
fn scan_pass_skips_clean_chunks() {
    let (level, reg, grid) = setup(16, 16, 16);
    let handoff = Handoff::new();
    assert_eq!(scan_pass(&level, &reg, &grid, &handoff), 0);
    assert_eq!(grid.stats().updates(), 0);
    assert!(handoff.drain().is_empty());
}

#[test]
fn worker_rebuilds_every_dirty_chunk() {
    let (level, reg, grid) = setup(32, 16, 32);
    level.add_listener(Arc::clone(&grid) as _);
    level.notify_everything_changed();

    let mut sched = RebuildScheduler::spawn(
        Arc::clone(&level),
        Arc::clone(&reg),
        Arc::clone(&grid),
    )
    .unwrap();

    let total = grid.len();
    wait_until(|| {
        assert!(grid.stats().in_flight() <= MAX_REBUILDS_IN_FLIGHT);
        for chunk in sched.handoff().drain() {
            let mesh = chunk.take_mesh().unwrap();
            assert_eq!(mesh.coord, chunk.coord);
            grid.finish_rebuild(&chunk);
        }
        grid.stats().updates() == total
    });
    sched.stop();

    assert!(grid.chunks().all(|c| c.status() == ChunkStatus::Clean));
    assert_eq!(grid.stats().in_flight(), 0);
}

#[test]
fn edit_during_run_triggers_another_rebuild() {
    let (level, reg, grid) = setup(16, 16, 16);
    level.add_listener(Arc::clone(&grid) as _);
    level.notify_everything_changed();

    let mut sched = RebuildScheduler::spawn(
        Arc::clone(&level),
        Arc::clone(&reg),
        Arc::clone(&grid),
    )
    .unwrap();

    wait_until(|| {
        for chunk in sched.handoff().drain() {
            chunk.take_mesh();
            grid.finish_rebuild(&chunk);
        }
        grid.stats().updates() == grid.len()
    });

    let before = grid.stats().updates();
    let rock = reg.id_by_name("rock").unwrap();
    level.set_tile(&reg, 8, 8, 8, rock);

    wait_until(|| {
        for chunk in sched.handoff().drain() {
            chunk.take_mesh();
            grid.finish_rebuild(&chunk);
        }
        grid.stats().updates() > before
    });
    sched.stop();
}

#[test]
fn untouched_grid_is_never_rebuilt() {
    let (level, reg, grid) = setup(16, 16, 16);
    // No listener wiring, no change events: chunks stay clean.
    let mut sched = RebuildScheduler::spawn(
        Arc::clone(&level),
        Arc::clone(&reg),
        Arc::clone(&grid),
    )
    .unwrap();
    thread::sleep(Duration::from_millis(50));
    sched.stop();

    assert_eq!(grid.stats().updates(), 0);
    assert!(sched.handoff().drain().is_empty());
    assert!(grid.chunks().all(|c| c.status() == ChunkStatus::Clean));
}
