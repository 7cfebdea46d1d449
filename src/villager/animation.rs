/// Max tilt in degrees before the sway reverses.
const SWAY_LIMIT: f32 = 8.0;
/// Tilt change per tick while walking.
const SWAY_STEP: f32 = 2.0;

/// Walking sway. The renderer rotates the sprite by `angle` degrees.
#[derive(Debug, Clone, Copy)]
pub struct Sway {
    pub angle: f32,
    dir: f32,
}

impl Sway {
    pub fn step(&mut self) {
        self.angle += self.dir * SWAY_STEP;
        if self.angle.abs() > SWAY_LIMIT {
            self.dir = -self.dir;
        }
    }

    pub fn settle(&mut self) {
        self.angle = 0.0;
    }
}

impl Default for Sway {
    fn default() -> Self {
        Self {
            angle: 0.0,
            dir: 1.0,
        }
    }
}
