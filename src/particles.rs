use rand::Rng;
use std::collections::VecDeque;
use std::f64::consts::TAU;

/// Particles spawned per collision.
const BURST_SIZE: usize = 10;
/// Multiplicative velocity damping applied every tick.
const DAMPING: f64 = 0.92;
/// Alpha lost every tick; a particle lives 1.0 / ALPHA_FADE ticks.
const ALPHA_FADE: f64 = 0.04;
const MIN_SPEED: f64 = 2.0;
const MAX_SPEED: f64 = 4.0;
const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 5.0;

/// One short-lived bounce-effect particle.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub alpha: f64,
    pub radius: f64,
}

/// Pool of bounce-effect particles, spawned in bursts at collision points.
///
/// Particles are kept in spawn order and expired ones are removed from the
/// front only. Bursts fade at a uniform rate, so the front of the queue is
/// always the oldest burst; anything that faded behind a live particle just
/// waits its turn.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a burst of particles at `(x, y)` with randomized direction,
    /// speed and size.
    pub fn spawn_burst<R: Rng>(&mut self, x: f64, y: f64, rng: &mut R) {
        for _ in 0..BURST_SIZE {
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(MIN_SPEED..MAX_SPEED);
            self.particles.push_back(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                alpha: 1.0,
                radius: rng.gen_range(MIN_RADIUS..MAX_RADIUS),
            });
        }
    }

    /// Advance every particle one tick, then prune expired particles from
    /// the front of the queue.
    pub fn tick(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vx *= DAMPING;
            p.vy *= DAMPING;
            p.alpha -= ALPHA_FADE;
        }

        while self
            .particles
            .front()
            .is_some_and(|p| p.alpha <= 0.0)
        {
            self.particles.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles, oldest first, for rendering.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
