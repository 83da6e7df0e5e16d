//! CPU meshing: face visibility, quad emission, and per-chunk mesh assembly.
#![forbid(unsafe_code)]

mod build;
mod mesh_build;
mod visibility;

pub use build::{ChunkMeshCpu, build_chunk_mesh, build_tile};
pub use mesh_build::{ATLAS_COLS, MeshBuild};
pub use visibility::visible_faces;
