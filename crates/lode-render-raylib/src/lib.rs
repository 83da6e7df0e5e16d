//! GPU side of the pipeline: raylib conversions, chunk mesh upload, texture
//! loading, and the level renderer that commits and draws rebuilt chunks.
// Mesh upload goes through the raylib FFI and needs unsafe.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use raylib::prelude::*;

use lode_blocks::{RenderLayer, TileRegistry};
use lode_geom::Frustum;
use lode_level::{ChunkCoord, Level};
use lode_mesh::ChunkMeshCpu;
use lode_runtime::{ChunkGrid, RebuildScheduler};

pub mod conv {
    use lode_geom::Vec3;

    pub fn vec3_from_rl(v: raylib::prelude::Vector3) -> Vec3 {
        Vec3 {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Builds a world-space frustum from the camera, for chunk culling.
pub fn camera_frustum(camera: &Camera3D, aspect: f32, near: f32, far: f32) -> Frustum {
    use lode_geom::Mat4;
    let eye = conv::vec3_from_rl(camera.position);
    let target = conv::vec3_from_rl(camera.target);
    let up = conv::vec3_from_rl(camera.up);
    let view = Mat4::look_at(eye, target, up);
    let proj = Mat4::perspective(camera.fovy.to_radians(), aspect, near, far);
    Frustum::from_view_proj(&proj.mul(view))
}

pub struct TextureCache {
    map: HashMap<String, raylib::core::texture::Texture2D>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get_ref(&self, key: &str) -> Option<&raylib::core::texture::Texture2D> {
        self.map.get(key)
    }

    /// Loads the texture at `path`, falling back to a generated magenta
    /// checkerboard when the file is missing or unreadable.
    pub fn load_or_fallback(
        &mut self,
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        path: &Path,
    ) -> Option<&raylib::core::texture::Texture2D> {
        let key = path.to_string_lossy().to_string();
        if !self.map.contains_key(&key) {
            let tex = match rl.load_texture(thread, &key) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::warn!("texture {key}: {e}; using checkerboard");
                    let img = raylib::core::texture::Image::gen_image_checked(
                        256,
                        256,
                        16,
                        16,
                        Color::MAGENTA,
                        Color::BLACK,
                    );
                    rl.load_texture_from_image(thread, &img).ok()
                }
            }?;
            tex.set_texture_filter(
                thread,
                raylib::consts::TextureFilter::TEXTURE_FILTER_POINT,
            );
            tex.set_texture_wrap(thread, raylib::consts::TextureWrap::TEXTURE_WRAP_REPEAT);
            self.map.insert(key.clone(), tex);
        }
        self.map.get(&key)
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ChunkPart {
    pub layer: RenderLayer,
    pub model: raylib::core::models::Model,
    pub v_count: usize,
}

pub struct ChunkRender {
    pub coord: ChunkCoord,
    pub bbox: lode_geom::Aabb,
    pub parts: Vec<ChunkPart>,
}

/// Uploads one chunk's CPU mesh to the GPU, one model per render layer.
/// Meshes over the 16-bit index budget are split on quad boundaries.
pub fn upload_chunk_mesh(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    cpu: ChunkMeshCpu,
    atlas: &raylib::core::texture::Texture2D,
) -> Option<ChunkRender> {
    let mut parts: Vec<ChunkPart> = Vec::new();
    for layer in RenderLayer::ALL {
        let mb = cpu.layer(layer);
        let total_verts = mb.vertex_count();
        if total_verts == 0 {
            continue;
        }
        let max_verts: usize = 65000;
        let total_quads = total_verts / 4;
        let max_quads = max_verts / 4;
        let mut q = 0usize;
        while q < total_quads {
            let take_q = (total_quads - q).min(max_quads);
            let v_start = q * 4;
            let v_count = take_q * 4;
            let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
            raw.vertexCount = v_count as i32;
            raw.triangleCount = (take_q * 2) as i32;
            unsafe {
                let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
                let tbytes = (v_count * 2 * std::mem::size_of::<f32>()) as u32;
                let cbytes = (v_count * 4 * std::mem::size_of::<u8>()) as u32;
                let ibytes = (take_q * 6 * std::mem::size_of::<u16>()) as u32;
                raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
                raw.normals = raylib::ffi::MemAlloc(vbytes) as *mut f32;
                raw.texcoords = raylib::ffi::MemAlloc(tbytes) as *mut f32;
                raw.colors = raylib::ffi::MemAlloc(cbytes) as *mut u8;
                raw.indices = raylib::ffi::MemAlloc(ibytes) as *mut u16;
                std::ptr::copy_nonoverlapping(
                    mb.pos[v_start * 3..].as_ptr(),
                    raw.vertices,
                    v_count * 3,
                );
                std::ptr::copy_nonoverlapping(
                    mb.norm[v_start * 3..].as_ptr(),
                    raw.normals,
                    v_count * 3,
                );
                std::ptr::copy_nonoverlapping(
                    mb.uv[v_start * 2..].as_ptr(),
                    raw.texcoords,
                    v_count * 2,
                );
                std::ptr::copy_nonoverlapping(
                    mb.col[v_start * 4..].as_ptr(),
                    raw.colors,
                    v_count * 4,
                );
                // Indices restart from zero within each split.
                let mut write = 0usize;
                for i in 0..take_q {
                    let base = (i * 4) as u16;
                    let tri = [base, base + 1, base + 2, base, base + 2, base + 3];
                    std::ptr::copy_nonoverlapping(tri.as_ptr(), raw.indices.add(write), 6);
                    write += 6;
                }
            }
            let mut mesh = unsafe { raylib::core::models::Mesh::from_raw(raw) };
            unsafe {
                mesh.upload(false);
            }
            let mut model = rl
                .load_model_from_mesh(thread, unsafe { mesh.make_weak() })
                .ok()?;
            if let Some(mat) = model.materials_mut().get_mut(0) {
                mat.set_material_texture(
                    raylib::consts::MaterialMapIndex::MATERIAL_MAP_ALBEDO,
                    atlas,
                );
            }
            parts.push(ChunkPart {
                layer,
                model,
                v_count,
            });
            q += take_q;
        }
    }
    Some(ChunkRender {
        coord: cpu.coord,
        bbox: cpu.bbox,
        parts,
    })
}

/// Owns the GPU side of the level: per-chunk models, the terrain atlas,
/// and the background rebuild scheduler.
pub struct LevelRenderer {
    grid: Arc<ChunkGrid>,
    scheduler: RebuildScheduler,
    renders: HashMap<ChunkCoord, ChunkRender>,
    textures: TextureCache,
    atlas_key: String,
}

impl LevelRenderer {
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        level: Arc<Level>,
        reg: Arc<TileRegistry>,
        grid: Arc<ChunkGrid>,
        atlas_path: &Path,
    ) -> std::io::Result<Self> {
        let mut textures = TextureCache::new();
        if textures.load_or_fallback(rl, thread, atlas_path).is_none() {
            log::error!("terrain atlas unavailable; chunks will not be textured");
        }
        let scheduler = RebuildScheduler::spawn(level, reg, Arc::clone(&grid))?;
        Ok(Self {
            grid,
            scheduler,
            renders: HashMap::new(),
            textures,
            atlas_key: atlas_path.to_string_lossy().to_string(),
        })
    }

    pub fn updates(&self) -> usize {
        self.grid.stats().updates()
    }

    pub fn in_flight(&self) -> u32 {
        self.grid.stats().in_flight()
    }

    /// Commits finished rebuilds: drains the handoff queue once and swaps
    /// in the new models. Runs on the render thread, once per frame.
    pub fn finalize_rebuilds(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        for chunk in self.scheduler.handoff().drain() {
            if let Some(cpu) = chunk.take_mesh() {
                let coord = cpu.coord;
                if cpu.is_empty() {
                    self.renders.remove(&coord);
                } else if let Some(atlas) = self.textures.get_ref(&self.atlas_key) {
                    match upload_chunk_mesh(rl, thread, cpu, atlas) {
                        Some(cr) => {
                            self.renders.insert(coord, cr);
                        }
                        None => log::error!("chunk {coord:?}: mesh upload failed"),
                    }
                }
            }
            self.grid.finish_rebuild(&chunk);
        }
    }

    /// Draws frustum-visible chunks, opaque layer first, then translucent.
    /// Culling only affects what is drawn; rebuild scheduling ignores it.
    pub fn draw(&self, d: &mut impl RaylibDraw3D, frustum: &Frustum) {
        let visible: Vec<&ChunkRender> = self
            .renders
            .values()
            .filter(|cr| frustum.intersects_aabb(&cr.bbox))
            .collect();
        for layer in RenderLayer::ALL {
            for cr in &visible {
                for part in cr.parts.iter().filter(|p| p.layer == layer) {
                    d.draw_model(&part.model, Vector3::zero(), 1.0, Color::WHITE);
                }
            }
        }
    }

    /// Count of chunks holding a GPU model.
    pub fn rendered_chunks(&self) -> usize {
        self.renders.len()
    }

    /// Stops the rebuild worker. Also runs on drop.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }
}
