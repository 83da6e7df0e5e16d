mod camera;
mod raycast;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use raylib::prelude::*;

use lode_blocks::{AIR, TileId, TileRegistry};
use lode_level::{GenMode, Level, LevelListener, generate};
use lode_render_raylib::{LevelRenderer, camera_frustum};
use lode_runtime::ChunkGrid;

use crate::camera::FlyCamera;
use crate::raycast::raycast;

const REACH: f32 = 8.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

#[derive(Parser, Debug)]
#[command(name = "lode", about = "Voxel level viewer with background chunk rebuilds")]
struct Args {
    /// Level width in tiles
    #[arg(long, default_value_t = 256)]
    width: usize,
    /// Level height in tiles
    #[arg(long, default_value_t = 64)]
    height: usize,
    /// Level length in tiles
    #[arg(long, default_value_t = 256)]
    length: usize,
    /// Terrain seed
    #[arg(long, default_value_t = 1)]
    seed: i32,
    /// Generate a flat slab instead of noise terrain
    #[arg(long)]
    flat: bool,
    /// Asset directory (tiles.toml, terrain atlas)
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let tiles_path = args.assets.join("voxels/tiles.toml");
    let reg = if tiles_path.exists() {
        TileRegistry::load_from_path(&tiles_path)?
    } else {
        log::warn!("{}: not found, using built-in tiles", tiles_path.display());
        TileRegistry::builtin()
    };
    let reg = Arc::new(reg);

    let level = Arc::new(Level::new(args.width, args.height, args.length));
    let mode = if args.flat {
        GenMode::Flat
    } else {
        GenMode::Normal { seed: args.seed }
    };
    generate(&level, &reg, mode);

    let grid = Arc::new(ChunkGrid::new(&level));
    level.add_listener(Arc::clone(&grid) as Arc<dyn LevelListener>);

    let (mut rl, thread) = raylib::init().size(1280, 720).title("lode").build();
    rl.set_target_fps(60);
    rl.disable_cursor();

    let mut renderer = LevelRenderer::new(
        &mut rl,
        &thread,
        Arc::clone(&level),
        Arc::clone(&reg),
        Arc::clone(&grid),
        &args.assets.join("textures/terrain.png"),
    )?;

    // Chunks start clean; one bulk event kicks off the initial build.
    level.notify_everything_changed();

    let mut cam = FlyCamera::new(Vector3::new(
        args.width as f32 * 0.5,
        args.height as f32 + 4.0,
        args.length as f32 * 0.5,
    ));
    let palette: Vec<TileId> = ["rock", "dirt", "grass", "planks", "leaves"]
        .iter()
        .filter_map(|n| reg.id_by_name(n))
        .collect();
    let mut held: usize = 0;

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        cam.update(&mut rl, dt);

        for (i, key) in [
            KeyboardKey::KEY_ONE,
            KeyboardKey::KEY_TWO,
            KeyboardKey::KEY_THREE,
            KeyboardKey::KEY_FOUR,
            KeyboardKey::KEY_FIVE,
        ]
        .into_iter()
        .enumerate()
        {
            if i < palette.len() && rl.is_key_pressed(key) {
                held = i;
            }
        }

        if cam.captured {
            let break_tile = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
            let place_tile = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_RIGHT);
            if break_tile || place_tile {
                let hit = raycast(cam.position, cam.forward(), REACH, |x, y, z| {
                    level.is_solid_tile(&reg, x, y, z)
                });
                if let Some(hit) = hit {
                    if break_tile {
                        let (x, y, z) = hit.tile;
                        level.set_tile(&reg, x, y, z, AIR);
                    } else if let Some(&id) = palette.get(held) {
                        let (x, y, z) = hit.prev;
                        level.set_tile(&reg, x, y, z, id);
                    }
                }
            }
        }

        renderer.finalize_rebuilds(&mut rl, &thread);

        let camera = cam.to_camera3d();
        let aspect = rl.get_screen_width() as f32 / rl.get_screen_height().max(1) as f32;
        let frustum = camera_frustum(&camera, aspect, NEAR, FAR);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::new(120, 167, 255, 255));
        {
            let mut d3 = d.begin_mode3D(camera);
            renderer.draw(&mut d3, &frustum);
        }
        d.draw_text(
            &format!(
                "updates {}  in-flight {}  chunks {}/{}",
                renderer.updates(),
                renderer.in_flight(),
                renderer.rendered_chunks(),
                grid.len(),
            ),
            12,
            12,
            20,
            Color::WHITE,
        );
        d.draw_fps(12, 40);
    }

    renderer.stop();
    Ok(())
}
