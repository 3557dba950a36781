//! Ambient dust particles around the previewed object.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const PARTICLE_COUNT: usize = 60;

/// Vertical band the particles wrap around in.
const WRAP_Y: f32 = 3.0;

/// Per-frame drift amplitude at the stock frame rate.
const DRIFT_AMPLITUDE: f32 = 0.0002;

/// Time scale of the drift phase.
const DRIFT_TIME_SCALE: f32 = 0.1;

/// One dust mote.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec3,
    /// Billboard radius in object units.
    pub size: f32,
}

/// Deterministic cloud of slowly drifting dust motes.
///
/// Motes rise and sink on offset sine phases and wrap vertically, so the
/// cloud never empties out. Placement is seeded, not entropy-driven, so
/// identical runs render identical clouds.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    elapsed: f32,
}

impl ParticleField {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                position: Vec3::new(
                    rng.random_range(-4.0..4.0),
                    rng.random_range(-WRAP_Y..WRAP_Y),
                    rng.random_range(-4.0..4.0),
                ),
                size: rng.random::<f32>() * 0.025 + 0.008,
            })
            .collect();
        Self {
            particles,
            elapsed: 0.0,
        }
    }

    /// One frame of stock drift (fixed amplitude per frame).
    pub fn step(&mut self, dt: f32) {
        self.drift(dt, DRIFT_AMPLITUDE);
    }

    /// One frame of drift scaled to the elapsed frame time, matching the
    /// stock motion at 60 Hz.
    pub fn step_scaled(&mut self, dt: f32) {
        self.drift(dt, DRIFT_AMPLITUDE * dt * 60.0);
    }

    fn drift(&mut self, dt: f32, amplitude: f32) {
        self.elapsed += dt;
        let phase_base = self.elapsed * DRIFT_TIME_SCALE;
        for (index, particle) in self.particles.iter_mut().enumerate() {
            let phase = phase_base + (index * 3) as f32;
            particle.position.y += phase.sin() * amplitude;
            if particle.position.y > WRAP_Y {
                particle.position.y = -WRAP_Y;
            } else if particle.position.y < -WRAP_Y {
                particle.position.y = WRAP_Y;
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_has_expected_count_and_bounds() {
        let field = ParticleField::new(7);
        assert_eq!(field.particles().len(), PARTICLE_COUNT);
        for (i, p) in field.particles().iter().enumerate() {
            assert!(p.position.x.abs() <= 4.0, "particle {i} x {}", p.position.x);
            assert!(p.position.z.abs() <= 4.0, "particle {i} z {}", p.position.z);
            assert!(p.position.y.abs() <= WRAP_Y, "particle {i} y {}", p.position.y);
            assert!(
                p.size >= 0.008 && p.size <= 0.033,
                "particle {i} size {}",
                p.size
            );
        }
    }

    #[test]
    fn test_same_seed_produces_same_cloud() {
        let a = ParticleField::new(42);
        let b = ParticleField::new(42);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.size, pb.size);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ParticleField::new(1);
        let b = ParticleField::new(2);
        let moved = a
            .particles()
            .iter()
            .zip(b.particles())
            .filter(|(pa, pb)| (pa.position - pb.position).length() > 0.01)
            .count();
        assert!(moved > PARTICLE_COUNT / 2, "only {moved} particles differ");
    }

    #[test]
    fn test_drift_moves_only_vertically() {
        let mut field = ParticleField::new(3);
        let before: Vec<Vec3> = field.particles().iter().map(|p| p.position).collect();
        for _ in 0..120 {
            field.step(1.0 / 60.0);
        }
        let mut any_moved = false;
        for (p, b) in field.particles().iter().zip(&before) {
            assert_eq!(p.position.x, b.x);
            assert_eq!(p.position.z, b.z);
            if p.position.y != b.y {
                any_moved = true;
            }
        }
        assert!(any_moved);
    }

    #[test]
    fn test_long_run_stays_inside_the_band() {
        let mut field = ParticleField::new(9);
        for _ in 0..10_000 {
            field.step(1.0 / 60.0);
        }
        for p in field.particles() {
            assert!(p.position.y.abs() <= WRAP_Y + 1e-3, "escaped: {}", p.position.y);
        }
    }

    #[test]
    fn test_scaled_step_matches_stock_at_reference_rate() {
        let mut stock = ParticleField::new(11);
        let mut scaled = ParticleField::new(11);
        stock.step(1.0 / 60.0);
        scaled.step_scaled(1.0 / 60.0);
        for (a, b) in stock.particles().iter().zip(scaled.particles()) {
            assert!((a.position.y - b.position.y).abs() < 1e-6);
        }
    }
}
