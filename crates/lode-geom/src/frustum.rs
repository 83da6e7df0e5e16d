use crate::{Aabb, Mat4, Vec3};

/// A plane `normal . p + distance = 0`; the normal points into the
/// positive half-space (the inside of the frustum).
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    fn from_coefficients(x: f32, y: f32, z: f32, w: f32) -> Plane {
        let normal = Vec3::new(x, y, z);
        let len = normal.length();
        if len > 0.0 {
            Plane {
                normal: normal / len,
                distance: w / len,
            }
        } else {
            Plane {
                normal: Vec3::UP,
                distance: 0.0,
            }
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.distance
    }
}

/// View frustum as six planes (left, right, bottom, top, near, far),
/// extracted from a view-projection matrix with the Gribb-Hartmann method.
#[derive(Clone, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn from_view_proj(vp: &Mat4) -> Frustum {
        let r0 = vp.row(0);
        let r1 = vp.row(1);
        let r2 = vp.row(2);
        let r3 = vp.row(3);
        let add = |a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)| {
            Plane::from_coefficients(a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3)
        };
        let sub = |a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)| {
            Plane::from_coefficients(a.0 - b.0, a.1 - b.1, a.2 - b.2, a.3 - b.3)
        };
        Frustum {
            planes: [
                add(r3, r0), // left
                sub(r3, r0), // right
                add(r3, r1), // bottom
                sub(r3, r1), // top
                add(r3, r2), // near
                sub(r3, r2), // far
            ],
        }
    }

    /// True when the box is fully or partially inside the frustum.
    ///
    /// Tests the positive vertex (the box corner furthest along each plane
    /// normal); if that corner is behind any plane the whole box is out.
    pub fn intersects_aabb(&self, bb: &Aabb) -> bool {
        for plane in &self.planes {
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { bb.max.x } else { bb.min.x },
                if plane.normal.y >= 0.0 { bb.max.y } else { bb.min.y },
                if plane.normal.z >= 0.0 { bb.max.z } else { bb.min.z },
            );
            if plane.signed_distance(p) < 0.0 {
                return false;
            }
        }
        true
    }

    #[inline]
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes.iter().all(|pl| pl.signed_distance(p) >= 0.0)
    }
}
