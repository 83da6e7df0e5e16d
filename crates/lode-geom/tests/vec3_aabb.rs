use lode_geom::{Aabb, Vec3};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn cross_is_orthogonal_to_both(a in vec3(), b in vec3()) {
        let c = a.cross(b);
        // Tolerance scales with the magnitudes involved.
        let tol = 1e-2 * (1.0 + a.length() * b.length());
        prop_assert!(c.dot(a).abs() <= tol);
        prop_assert!(c.dot(b).abs() <= tol);
    }

    #[test]
    fn normalized_has_unit_length(v in vec3()) {
        prop_assume!(v.length() > 1e-3);
        let n = v.normalized();
        prop_assert!((n.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn aabb_contains_its_center(a in vec3(), b in vec3()) {
        let min = Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        let bb = Aabb::new(min, max);
        prop_assert!(bb.contains_point(bb.center()));
    }
}

#[test]
fn dot_of_axes_is_zero() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    assert_eq!(x.dot(Vec3::UP), 0.0);
    assert_eq!(x.cross(Vec3::UP), Vec3::new(0.0, 0.0, 1.0));
}
