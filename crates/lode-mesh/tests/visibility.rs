use lode_blocks::{Face, FaceSet, TileRegistry};
use lode_level::Level;
use lode_mesh::visible_faces;
use proptest::prelude::*;

fn reg() -> TileRegistry {
    TileRegistry::builtin()
}

fn lone_block_level(reg: &TileRegistry) -> Level {
    let level = Level::new(16, 16, 16);
    let rock = reg.id_by_name("rock").unwrap();
    level.set_tile(reg, 8, 8, 8, rock);
    level
}

#[test]
fn air_has_no_faces() {
    let reg = reg();
    let level = Level::new(16, 16, 16);
    assert_eq!(visible_faces(&level, &reg, 3, 3, 3), FaceSet::EMPTY);
}

#[test]
fn lone_block_shows_all_six_faces() {
    let reg = reg();
    let level = lone_block_level(&reg);
    assert_eq!(visible_faces(&level, &reg, 8, 8, 8), FaceSet::ALL);
}

#[test]
fn default_policy_keeps_faces_at_world_edge() {
    let reg = reg();
    let level = Level::new(16, 16, 16);
    let rock = reg.id_by_name("rock").unwrap();
    level.set_tile(&reg, 0, 0, 0, rock);
    assert_eq!(visible_faces(&level, &reg, 0, 0, 0), FaceSet::ALL);
}

#[test]
fn clip_policy_culls_faces_at_world_edge() {
    let reg = reg();
    let level = Level::new(16, 16, 16);
    let leaves = reg.id_by_name("leaves").unwrap();
    level.set_tile(&reg, 0, 8, 8, leaves);
    let faces = visible_faces(&level, &reg, 0, 8, 8);
    assert!(!faces.contains(Face::NegX));
    assert_eq!(faces.len(), 5);
}

#[test]
fn leaves_do_not_hide_neighbor_faces() {
    let reg = reg();
    let level = lone_block_level(&reg);
    let leaves = reg.id_by_name("leaves").unwrap();
    level.set_tile(&reg, 9, 8, 8, leaves);
    // Rock still shows its +X face against non-occluding leaves.
    assert_eq!(visible_faces(&level, &reg, 8, 8, 8), FaceSet::ALL);
}

proptest! {
    // Flipping a single neighbor's solidity flips exactly the matching bit.
    #[test]
    fn neighbor_flips_exactly_one_bit(face_ix in 0usize..6) {
        let reg = reg();
        let level = lone_block_level(&reg);
        let rock = reg.id_by_name("rock").unwrap();
        let face = Face::ALL[face_ix];
        let (dx, dy, dz) = face.delta();

        let before = visible_faces(&level, &reg, 8, 8, 8);
        level.set_tile(&reg, 8 + dx, 8 + dy, 8 + dz, rock);
        let after = visible_faces(&level, &reg, 8, 8, 8);

        prop_assert_eq!(before.bits() ^ after.bits(), 1 << face.index());
        prop_assert!(!after.contains(face));
    }
}
