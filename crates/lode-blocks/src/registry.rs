use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::{TileDef, TilesConfig};
use crate::types::{AIR, BoundaryPolicy, FaceTextures, RenderLayer, TileId, TileType};

/// Immutable table of tile capabilities, indexed by [`TileId`].
/// Slot 0 (air) is always empty.
#[derive(Debug, Clone, Default)]
pub struct TileRegistry {
    tiles: Vec<Option<TileType>>,
    by_name: HashMap<String, TileId>,
}

impl TileRegistry {
    /// Registry with the built-in tile set, mirroring `assets/voxels/tiles.toml`.
    pub fn builtin() -> Self {
        let opaque = |id: TileId, name: &str, textures: FaceTextures| TileType {
            id,
            name: name.to_string(),
            solid: true,
            occludes: true,
            layer: RenderLayer::Opaque,
            boundary: BoundaryPolicy::Air,
            textures,
        };
        let mut reg = TileRegistry::default();
        reg.tiles.push(None);
        for ty in [
            opaque(1, "rock", FaceTextures::uniform(1)),
            opaque(
                2,
                "grass",
                FaceTextures {
                    top: 0,
                    bottom: 2,
                    side: 3,
                },
            ),
            opaque(3, "dirt", FaceTextures::uniform(2)),
            opaque(4, "planks", FaceTextures::uniform(4)),
            TileType {
                id: 5,
                name: "leaves".to_string(),
                solid: true,
                occludes: false,
                layer: RenderLayer::Translucent,
                boundary: BoundaryPolicy::Clip,
                textures: FaceTextures::uniform(5),
            },
        ] {
            reg.by_name.insert(ty.name.clone(), ty.id);
            reg.tiles.push(Some(ty));
        }
        reg
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TilesConfig = toml::from_str(text)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: TilesConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = TileRegistry {
            tiles: vec![None],
            by_name: HashMap::new(),
        };
        let mut next_id: u16 = 1;
        for def in cfg.tiles {
            let id = match def.id {
                Some(0) => return Err(format!("tile {:?}: id 0 is reserved for air", def.name).into()),
                Some(id) => id,
                None => {
                    while (next_id as usize) < reg.tiles.len()
                        && reg.tiles[next_id as usize].is_some()
                    {
                        next_id += 1;
                    }
                    if next_id > TileId::MAX as u16 {
                        return Err(format!("tile {:?}: no free ids left", def.name).into());
                    }
                    next_id as TileId
                }
            };
            if reg.tiles.len() <= id as usize {
                reg.tiles.resize(id as usize + 1, None);
            }
            if reg.tiles[id as usize].is_some() {
                return Err(format!("tile {:?}: duplicate id {}", def.name, id).into());
            }
            let ty = Self::resolve(id, def)?;
            reg.by_name.insert(ty.name.clone(), id);
            reg.tiles[id as usize] = Some(ty);
        }
        Ok(reg)
    }

    fn resolve(id: TileId, def: TileDef) -> Result<TileType, Box<dyn Error>> {
        let solid = def.solid.unwrap_or(true);
        let layer = match def.layer.as_deref() {
            None | Some("opaque") => RenderLayer::Opaque,
            Some("translucent") => RenderLayer::Translucent,
            Some(other) => {
                return Err(format!("tile {:?}: unknown layer {:?}", def.name, other).into());
            }
        };
        let boundary = match def.boundary.as_deref() {
            None | Some("air") => BoundaryPolicy::Air,
            Some("clip") => BoundaryPolicy::Clip,
            Some(other) => {
                return Err(format!("tile {:?}: unknown boundary {:?}", def.name, other).into());
            }
        };
        // Occlusion defaults to solidity, but translucent tiles never occlude.
        let occludes = def
            .occludes
            .unwrap_or(solid && layer == RenderLayer::Opaque);
        let all = def.texture.unwrap_or(0);
        let textures = FaceTextures {
            top: def.texture_top.unwrap_or(all),
            bottom: def.texture_bottom.unwrap_or(all),
            side: def.texture_side.unwrap_or(all),
        };
        Ok(TileType {
            id,
            name: def.name,
            solid,
            occludes,
            layer,
            boundary,
            textures,
        })
    }

    /// The tile type for `id`, or `None` for air and unregistered ids.
    #[inline]
    pub fn get(&self, id: TileId) -> Option<&TileType> {
        if id == AIR {
            return None;
        }
        self.tiles.get(id as usize).and_then(|t| t.as_ref())
    }

    pub fn id_by_name(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn is_solid(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|t| t.solid)
    }

    #[inline]
    pub fn is_occluding(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|t| t.occludes)
    }

    /// Registered (non-air) ids, useful for pickers and tests.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles
            .iter()
            .filter_map(|t| t.as_ref().map(|ty| ty.id))
    }
}
