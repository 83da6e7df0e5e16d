use lode_blocks::Face;

/// Columns (and rows) in the square terrain atlas texture.
pub const ATLAS_COLS: u16 = 16;

/// Accumulation buffers for one mesh: interleaved positions/normals/UVs and
/// per-vertex colors. Every four vertices form one quad (two triangles);
/// index buffers are generated at upload time, per split, so a dense chunk
/// is never constrained by a 16-bit index range here. Cleared and refilled
/// on every rebuild; capacity is retained across rebuilds.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.col.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.quad_count() * 2
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertex_count() / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Appends one face of the unit cube whose minimum corner is
    /// `(x, y, z)`, textured from atlas cell `tex` and tinted `rgba`.
    /// Vertices wind counter-clockwise seen from outside the cube.
    pub fn add_unit_face(&mut self, face: Face, x: i32, y: i32, z: i32, tex: u16, rgba: [u8; 4]) {
        let (x0, y0, z0) = (x as f32, y as f32, z as f32);
        let (x1, y1, z1) = (x0 + 1.0, y0 + 1.0, z0 + 1.0);

        let cell = 1.0 / ATLAS_COLS as f32;
        let u0 = (tex % ATLAS_COLS) as f32 * cell;
        let v0 = (tex / ATLAS_COLS) as f32 * cell;
        let (u1, v1) = (u0 + cell, v0 + cell);

        // Corner order fixes the outward normal; UVs keep side textures
        // upright (v grows downward in image space).
        let (corners, uvs, normal): ([[f32; 3]; 4], [[f32; 2]; 4], [f32; 3]) = match face {
            Face::PosY => (
                [[x0, y1, z0], [x0, y1, z1], [x1, y1, z1], [x1, y1, z0]],
                [[u0, v0], [u0, v1], [u1, v1], [u1, v0]],
                [0.0, 1.0, 0.0],
            ),
            Face::NegY => (
                [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]],
                [[u0, v0], [u1, v0], [u1, v1], [u0, v1]],
                [0.0, -1.0, 0.0],
            ),
            Face::PosX => (
                [[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]],
                [[u0, v1], [u0, v0], [u1, v0], [u1, v1]],
                [1.0, 0.0, 0.0],
            ),
            Face::NegX => (
                [[x0, y0, z1], [x0, y1, z1], [x0, y1, z0], [x0, y0, z0]],
                [[u0, v1], [u0, v0], [u1, v0], [u1, v1]],
                [-1.0, 0.0, 0.0],
            ),
            Face::PosZ => (
                [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]],
                [[u0, v1], [u1, v1], [u1, v0], [u0, v0]],
                [0.0, 0.0, 1.0],
            ),
            Face::NegZ => (
                [[x1, y0, z0], [x0, y0, z0], [x0, y1, z0], [x1, y1, z0]],
                [[u0, v1], [u1, v1], [u1, v0], [u0, v0]],
                [0.0, 0.0, -1.0],
            ),
        };

        for i in 0..4 {
            self.pos.extend_from_slice(&corners[i]);
            self.norm.extend_from_slice(&normal);
            self.uv.extend_from_slice(&uvs[i]);
            self.col.extend_from_slice(&rgba);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_face_is_one_quad() {
        let mut mb = MeshBuild::default();
        mb.add_unit_face(Face::PosY, 0, 0, 0, 0, [255; 4]);
        assert_eq!(mb.vertex_count(), 4);
        assert_eq!(mb.triangle_count(), 2);
        assert_eq!(mb.quad_count(), 1);
        assert!(!mb.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut mb = MeshBuild::default();
        mb.add_unit_face(Face::NegZ, 1, 2, 3, 4, [255; 4]);
        let cap = mb.pos.capacity();
        mb.clear_keep_capacity();
        assert!(mb.is_empty());
        assert_eq!(mb.pos.capacity(), cap);
    }

    #[test]
    fn winding_matches_outward_normal() {
        for face in Face::ALL {
            let mut mb = MeshBuild::default();
            mb.add_unit_face(face, 0, 0, 0, 0, [255; 4]);
            let v = |i: usize| {
                lode_geom::Vec3::new(mb.pos[i * 3], mb.pos[i * 3 + 1], mb.pos[i * 3 + 2])
            };
            let cross = (v(1) - v(0)).cross(v(2) - v(0));
            let n = lode_geom::Vec3::new(mb.norm[0], mb.norm[1], mb.norm[2]);
            assert!(cross.dot(n) > 0.0, "face {face:?} winds the wrong way");
            let (dx, dy, dz) = face.delta();
            assert_eq!(n, lode_geom::Vec3::new(dx as f32, dy as f32, dz as f32));
        }
    }

    #[test]
    fn atlas_uvs_stay_inside_cell() {
        let mut mb = MeshBuild::default();
        let tex = 19; // row 1, column 3
        mb.add_unit_face(Face::PosX, 0, 0, 0, tex, [255; 4]);
        let cell = 1.0 / ATLAS_COLS as f32;
        let u0 = 3.0 * cell;
        let v0 = cell;
        for i in 0..4 {
            let (u, v) = (mb.uv[i * 2], mb.uv[i * 2 + 1]);
            assert!(u >= u0 && u <= u0 + cell);
            assert!(v >= v0 && v <= v0 + cell);
        }
    }
}
