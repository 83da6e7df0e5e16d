use raylib::prelude::Vector3;

/// First solid tile along a ray, plus the air cell in front of the hit
/// face (where a placed tile goes).
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub tile: (i32, i32, i32),
    pub prev: (i32, i32, i32),
    pub normal: (i32, i32, i32),
}

const MAX_STEPS: usize = 512;

/// Amanatides-Woo voxel traversal from `origin` along `dir`.
pub fn raycast<F>(origin: Vector3, dir: Vector3, max_dist: f32, mut is_solid: F) -> Option<RayHit>
where
    F: FnMut(i32, i32, i32) -> bool,
{
    let len = dir.length();
    if len < 1e-6 {
        return None;
    }
    let d = [dir.x / len, dir.y / len, dir.z / len];
    let o = [origin.x, origin.y, origin.z];

    let mut v = [0i32; 3];
    let mut step = [0i32; 3];
    let mut t_max = [f32::MAX; 3];
    let mut t_delta = [f32::MAX; 3];
    for i in 0..3 {
        v[i] = o[i].floor() as i32;
        if d[i].abs() < 1e-8 {
            continue;
        }
        step[i] = if d[i] > 0.0 { 1 } else { -1 };
        t_delta[i] = 1.0 / d[i].abs();
        let frac = o[i] - o[i].floor();
        t_max[i] = if step[i] > 0 { 1.0 - frac } else { frac } * t_delta[i];
    }

    let mut prev = v;
    let mut t = 0.0f32;
    for _ in 0..MAX_STEPS {
        if t > max_dist {
            break;
        }
        if is_solid(v[0], v[1], v[2]) {
            let mut normal = [0i32; 3];
            for i in 0..3 {
                normal[i] = prev[i] - v[i];
            }
            return Some(RayHit {
                tile: (v[0], v[1], v[2]),
                prev: (prev[0], prev[1], prev[2]),
                normal: (normal[0], normal[1], normal[2]),
            });
        }
        prev = v;
        // Advance along the axis with the nearest crossing.
        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        v[axis] += step[axis];
        t = t_max[axis];
        t_max[axis] += t_delta[axis];
    }
    None
}
