use glam::Vec2;

use crate::render::instance::ParticleInstance;

/// Maximum concurrent particles.
const MAX_PARTICLES: usize = 2048;
/// Heart lifetime in ticks.
const HEART_LIFETIME: u32 = 360;
/// Downward acceleration per tick.
const GRAVITY: f32 = 0.1;

/// A single heart floating away from a couple.
#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: Vec2,
    vel: Vec2,
    life: u32,
    max_life: u32,
}

/// Short-lived visual feedback. Nothing in the simulation reads it back.
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(256),
        }
    }

    /// Spawn `count` hearts at `pos`, each with a small random upward kick.
    pub fn burst_hearts(&mut self, pos: Vec2, count: usize, rng: &mut fastrand::Rng) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(rng.f32() * 0.4 - 0.2, -0.3 + rng.f32() * 0.2),
                life: HEART_LIFETIME,
                max_life: HEART_LIFETIME,
            });
        }
    }

    /// Move, age and drop dead particles. One call per tick.
    pub fn update(&mut self) {
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += p.vel;
            p.vel.y += GRAVITY;
            p.life = p.life.saturating_sub(1);

            if p.life == 0 {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Append particle instances to the render buffer.
    pub fn build_instances(&self, buf: &mut Vec<ParticleInstance>) {
        for p in &self.particles {
            buf.push(ParticleInstance {
                position: p.pos,
                remaining_life: p.life,
                alpha: p.life as f32 / p.max_life as f32,
            });
        }
    }

    /// Number of active particles.
    pub fn count(&self) -> usize {
        self.particles.len()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hearts_fall_and_expire() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut ps = ParticleSystem::new();
        ps.burst_hearts(Vec2::new(10.0, 10.0), 15, &mut rng);
        assert_eq!(ps.count(), 15);

        for _ in 0..10 {
            ps.update();
        }
        let mut buf = Vec::new();
        ps.build_instances(&mut buf);
        assert!(buf.iter().all(|p| p.alpha < 1.0 && p.alpha > 0.9));

        for _ in 0..HEART_LIFETIME {
            ps.update();
        }
        assert_eq!(ps.count(), 0);
    }
}
