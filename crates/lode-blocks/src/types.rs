/// One byte per world cell; `0` is always air.
pub type TileId = u8;

/// The air/empty cell id. Air has no [`TileType`] entry in the registry.
pub const AIR: TileId = 0;

/// One of the six axis-aligned cube faces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }
}

/// A set of faces packed into the low six bits of a byte.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FaceSet(u8);

impl FaceSet {
    pub const EMPTY: FaceSet = FaceSet(0);
    pub const ALL: FaceSet = FaceSet(0b11_1111);

    #[inline]
    pub fn insert(&mut self, face: Face) {
        self.0 |= 1 << face.index();
    }

    #[inline]
    pub fn remove(&mut self, face: Face) {
        self.0 &= !(1 << face.index());
    }

    #[inline]
    pub fn contains(self, face: Face) -> bool {
        self.0 & (1 << face.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Face> for FaceSet {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut set = FaceSet::EMPTY;
        for f in iter {
            set.insert(f);
        }
        set
    }
}

/// Which draw pass a tile's geometry belongs to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum RenderLayer {
    #[default]
    Opaque = 0,
    Translucent = 1,
}

impl RenderLayer {
    pub const COUNT: usize = 2;
    pub const ALL: [RenderLayer; 2] = [RenderLayer::Opaque, RenderLayer::Translucent];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// How face visibility treats a neighbor coordinate outside the world.
///
/// `Air` keeps the face (out-of-range reads as empty); `Clip` culls it, so
/// the type never shows geometry along the world boundary (foliage).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum BoundaryPolicy {
    #[default]
    Air,
    Clip,
}

/// Per-face indices into the terrain atlas.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FaceTextures {
    pub top: u16,
    pub bottom: u16,
    pub side: u16,
}

impl FaceTextures {
    pub const fn uniform(index: u16) -> Self {
        Self {
            top: index,
            bottom: index,
            side: index,
        }
    }

    #[inline]
    pub fn for_face(self, face: Face) -> u16 {
        match face {
            Face::PosY => self.top,
            Face::NegY => self.bottom,
            _ => self.side,
        }
    }
}

/// Resolved capabilities for one tile type, queried by the mesher and level.
#[derive(Clone, Debug)]
pub struct TileType {
    pub id: TileId,
    pub name: String,
    /// Collision / "is a block here" queries.
    pub solid: bool,
    /// Whether this tile hides the touching face of its neighbors (and
    /// blocks the light column). Solid translucent tiles leave it false.
    pub occludes: bool,
    pub layer: RenderLayer,
    pub boundary: BoundaryPolicy,
    pub textures: FaceTextures,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_set_round_trips_single_faces() {
        for face in Face::ALL {
            let mut set = FaceSet::EMPTY;
            set.insert(face);
            assert!(set.contains(face));
            assert_eq!(set.len(), 1);
            assert_eq!(set.bits(), 1 << face.index());
            set.remove(face);
            assert!(set.is_empty());
        }
    }

    #[test]
    fn face_set_iter_matches_contains() {
        let set: FaceSet = [Face::PosY, Face::NegX, Face::NegZ].into_iter().collect();
        let collected: Vec<Face> = set.iter().collect();
        assert_eq!(collected, vec![Face::PosY, Face::NegX, Face::NegZ]);
    }

    #[test]
    fn deltas_are_unit_steps() {
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            assert_eq!(dx.abs() + dy.abs() + dz.abs(), 1);
        }
    }
}
