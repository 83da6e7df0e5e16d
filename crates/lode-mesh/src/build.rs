use lode_blocks::{Face, RenderLayer, TileRegistry, TileType};
use lode_geom::{Aabb, Vec3};
use lode_level::{CHUNK_SIZE, ChunkCoord, Level};

use crate::mesh_build::MeshBuild;
use crate::visibility::visible_faces;

/// Directional shade factors, classic top-bright / bottom-dark.
#[inline]
fn face_shade(face: Face) -> f32 {
    match face {
        Face::PosY => 1.0,
        Face::NegY => 0.5,
        Face::PosX | Face::NegX => 0.6,
        Face::PosZ | Face::NegZ => 0.8,
    }
}

/// Brightness multiplier for cells outside direct sky light.
const SHADOW_SHADE: f32 = 0.6;

/// CPU-side mesh for one chunk, one buffer per render layer. Produced off
/// the render thread and committed to the GPU by the renderer.
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub layers: [MeshBuild; RenderLayer::COUNT],
}

impl ChunkMeshCpu {
    pub fn layer(&self, layer: RenderLayer) -> &MeshBuild {
        &self.layers[layer.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|mb| mb.is_empty())
    }

    /// Total exposed faces across both layers.
    pub fn face_count(&self) -> usize {
        self.layers.iter().map(|mb| mb.quad_count()).sum()
    }
}

/// Emits the exposed faces of one tile into `mb`, shaded by sky light
/// sampled from the cell each face looks into.
pub fn build_tile(
    mb: &mut MeshBuild,
    level: &Level,
    reg: &TileRegistry,
    ty: &TileType,
    x: i32,
    y: i32,
    z: i32,
) {
    let faces = visible_faces(level, reg, x, y, z);
    mb.reserve_quads(faces.len());
    for face in faces.iter() {
        let (dx, dy, dz) = face.delta();
        let lit = level.is_lit(x + dx, y + dy, z + dz);
        let mut shade = face_shade(face);
        if !lit {
            shade *= SHADOW_SHADE;
        }
        let c = (shade * 255.0) as u8;
        mb.add_unit_face(face, x, y, z, ty.textures.for_face(face), [c, c, c, 255]);
    }
}

/// Walks the chunk's 16x16x16 volume and assembles one mesh per render
/// layer. Reads the level without synchronization; a concurrent edit yields
/// a stale mesh that the edit's own change event re-dirties.
pub fn build_chunk_mesh(level: &Level, reg: &TileRegistry, coord: ChunkCoord) -> ChunkMeshCpu {
    let (bx, by, bz) = coord.base();
    let size = CHUNK_SIZE as i32;
    let mut layers: [MeshBuild; RenderLayer::COUNT] = Default::default();

    for x in bx..bx + size {
        for y in by..by + size {
            for z in bz..bz + size {
                let Some(ty) = reg.get(level.get_tile(x, y, z)) else {
                    continue;
                };
                build_tile(&mut layers[ty.layer.index()], level, reg, ty, x, y, z);
            }
        }
    }

    let min = Vec3::new(bx as f32, by as f32, bz as f32);
    let max = min + Vec3::new(size as f32, size as f32, size as f32);
    ChunkMeshCpu {
        coord,
        bbox: Aabb::new(min, max),
        layers,
    }
}
