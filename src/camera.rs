use raylib::prelude::*;

/// Free-flying debug camera: mouse look, WASD plus Space/Ctrl for vertical.
pub struct FlyCamera {
    pub position: Vector3,
    pub yaw: f32,   // degrees
    pub pitch: f32, // degrees
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    pub captured: bool,
}

impl FlyCamera {
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            yaw: -90.0,
            pitch: -25.0,
            move_speed: 10.0,
            mouse_sensitivity: 0.1,
            captured: true,
        }
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D::perspective(
            self.position,
            self.position + self.forward(),
            Vector3::up(),
            70.0,
        )
    }

    pub fn forward(&self) -> Vector3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalized()
    }

    pub fn right(&self) -> Vector3 {
        self.forward().cross(Vector3::up()).normalized()
    }

    pub fn update(&mut self, rl: &mut RaylibHandle, dt: f32) {
        if rl.is_key_pressed(KeyboardKey::KEY_TAB) {
            self.captured = !self.captured;
            if self.captured {
                rl.disable_cursor();
            } else {
                rl.enable_cursor();
            }
        }

        if self.captured {
            let md = rl.get_mouse_delta();
            self.yaw += md.x * self.mouse_sensitivity;
            self.pitch = (self.pitch - md.y * self.mouse_sensitivity).clamp(-89.9, 89.9);
        }

        let mut wish = Vector3::zero();
        let f = self.forward();
        let r = self.right();
        if rl.is_key_down(KeyboardKey::KEY_W) {
            wish += f;
        }
        if rl.is_key_down(KeyboardKey::KEY_S) {
            wish -= f;
        }
        if rl.is_key_down(KeyboardKey::KEY_D) {
            wish += r;
        }
        if rl.is_key_down(KeyboardKey::KEY_A) {
            wish -= r;
        }
        if rl.is_key_down(KeyboardKey::KEY_SPACE) {
            wish += Vector3::up();
        }
        if rl.is_key_down(KeyboardKey::KEY_LEFT_CONTROL) {
            wish -= Vector3::up();
        }
        if wish.length() > 0.0 {
            let speed = if rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT) {
                self.move_speed * 3.0
            } else {
                self.move_speed
            };
            self.position += wish.normalized() * speed * dt;
        }
    }
}
