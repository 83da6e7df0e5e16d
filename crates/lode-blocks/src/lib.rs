//! Tile types, capabilities, and the data-driven registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::TileRegistry;
pub use types::{AIR, BoundaryPolicy, Face, FaceSet, FaceTextures, RenderLayer, TileId, TileType};
