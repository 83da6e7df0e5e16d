use serde::Deserialize;

/// Top-level shape of `tiles.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TilesConfig {
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

/// One `[[tiles]]` entry. Everything except `name` is optional and falls
/// back to the solid-opaque-cube defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TileDef {
    pub name: String,
    /// Explicit id; omitted ids are assigned the next free slot (never 0).
    pub id: Option<u8>,
    pub solid: Option<bool>,
    pub occludes: Option<bool>,
    /// "opaque" (default) or "translucent".
    pub layer: Option<String>,
    /// "air" (default) or "clip".
    pub boundary: Option<String>,
    /// Atlas index for all faces; overridden per-face below.
    pub texture: Option<u16>,
    pub texture_top: Option<u16>,
    pub texture_bottom: Option<u16>,
    pub texture_side: Option<u16>,
}
