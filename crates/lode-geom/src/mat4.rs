use crate::Vec3;

/// Column-major 4x4 matrix. Element `(row, col)` lives at `self.0[col * 4 + row]`.
///
/// Only what the renderer needs: perspective/look-at construction and
/// multiplication, so a view-projection matrix can be handed to
/// [`crate::Frustum::from_view_proj`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Right-handed perspective projection with a `[-1, 1]` clip depth range.
    pub fn perspective(fovy_rad: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fovy_rad * 0.5).tan();
        let mut m = [0.0f32; 16];
        m[0] = f / aspect;
        m[5] = f;
        m[10] = (far + near) / (near - far);
        m[11] = -1.0;
        m[14] = (2.0 * far * near) / (near - far);
        Mat4(m)
    }

    /// Right-handed view matrix looking from `eye` toward `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let fwd = (target - eye).normalized();
        let right = fwd.cross(up).normalized();
        let cam_up = right.cross(fwd);
        Mat4([
            right.x,
            cam_up.x,
            -fwd.x,
            0.0,
            right.y,
            cam_up.y,
            -fwd.y,
            0.0,
            right.z,
            cam_up.z,
            -fwd.z,
            0.0,
            -right.dot(eye),
            -cam_up.dot(eye),
            fwd.dot(eye),
            1.0,
        ])
    }

    /// Matrix product `self * rhs` (apply `rhs` first).
    pub fn mul(self, rhs: Mat4) -> Mat4 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += a[k * 4 + row] * b[col * 4 + k];
                }
                out[col * 4 + row] = acc;
            }
        }
        Mat4(out)
    }

    /// Row `i` of the matrix as `(x, y, z, w)`; used by frustum extraction.
    #[inline]
    pub fn row(&self, i: usize) -> (f32, f32, f32, f32) {
        (self.0[i], self.0[4 + i], self.0[8 + i], self.0[12 + i])
    }
}
