use fastnoise_lite::{FastNoiseLite, NoiseType};
use log::info;

use crate::Level;
use lode_blocks::TileRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    /// Rolling noise terrain.
    Normal { seed: i32 },
    /// A flat slab filling the lower half of the world.
    Flat,
}

/// Fills the level with terrain. Writes silently and recomputes light
/// depths; the caller decides when to fire `everything_changed` (typically
/// after listeners are registered).
pub fn generate(level: &Level, reg: &TileRegistry, mode: GenMode) {
    let rock = reg.id_by_name("rock").unwrap_or(1);
    let dirt = reg.id_by_name("dirt").unwrap_or(rock);
    let grass = reg.id_by_name("grass").unwrap_or(dirt);

    let mut noise = None;
    if let GenMode::Normal { seed } = mode {
        let mut n = FastNoiseLite::with_seed(seed);
        n.set_noise_type(Some(NoiseType::OpenSimplex2));
        n.set_frequency(Some(0.02));
        noise = Some(n);
    }

    let base = (level.height / 2) as i32;
    let amp = (level.height as f32) * 0.25;
    for z in 0..level.length as i32 {
        for x in 0..level.width as i32 {
            let surface = match &noise {
                Some(n) => {
                    let v = n.get_noise_2d(x as f32, z as f32);
                    (base + (v * amp) as i32).clamp(1, level.height as i32 - 1)
                }
                None => base,
            };
            for y in 0..surface {
                let id = if y < surface - 3 {
                    rock
                } else if y < surface - 1 {
                    dirt
                } else {
                    grass
                };
                level.set_tile_silent(x, y, z, id);
            }
        }
    }
    level.recalc_light(reg);
    info!(
        "generated {}x{}x{} level ({:?})",
        level.width, level.height, level.length, mode
    );
}
