use lode_blocks::{BoundaryPolicy, Face, FaceSet, TileRegistry};
use lode_level::Level;

/// Which faces of the tile at `(x, y, z)` are exposed and need geometry.
///
/// A face is kept when its neighbor does not occlude it; out-of-range
/// neighbors follow the tile type's boundary policy. Pure read of level
/// state, safe to call concurrently from multiple chunk rebuilds.
pub fn visible_faces(level: &Level, reg: &TileRegistry, x: i32, y: i32, z: i32) -> FaceSet {
    let Some(ty) = reg.get(level.get_tile(x, y, z)) else {
        return FaceSet::EMPTY;
    };
    let mut faces = FaceSet::EMPTY;
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        let (nx, ny, nz) = (x + dx, y + dy, z + dz);
        let keep = if level.is_in_range(nx, ny, nz) {
            !reg.is_occluding(level.get_tile(nx, ny, nz))
        } else {
            matches!(ty.boundary, BoundaryPolicy::Air)
        };
        if keep {
            faces.insert(face);
        }
    }
    faces
}
