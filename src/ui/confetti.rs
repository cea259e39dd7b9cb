/// Celebration confetti burst
///
/// Fire-and-forget: the session decides when a burst happens, this
/// module only picks one of ten preset configurations, simulates the
/// particles on every tick and draws them on a transparent canvas over
/// the card. A burst ends when its last particle has decayed; the main
/// loop then drops it.

use iced::widget::canvas::{self, Path};
use iced::{Color, Point, Rectangle, Renderer, Theme, Vector};
use rand::Rng;
use std::time::Instant;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: 1.0,
    }
}

/// One preset burst shape
struct BurstConfig {
    particle_count: usize,
    /// Cone width in degrees
    spread: f32,
    /// Launch direction in degrees, 90 = straight up
    angle: f32,
    /// Normalized origin within the canvas
    origin: (f32, f32),
    colors: &'static [Color],
    /// Downward pull in px/s²
    gravity: f32,
    /// Per-second velocity retention
    decay: f32,
    /// Particle size multiplier
    scalar: f32,
    /// Particle lifetime in seconds
    ttl: f32,
}

const BURSTS: [BurstConfig; 10] = [
    // Forest green, from below
    BurstConfig {
        particle_count: 100,
        spread: 70.0,
        angle: 90.0,
        origin: (0.5, 0.6),
        colors: &[rgb(0x4a, 0xde, 0x80), rgb(0x22, 0xc5, 0x5e), rgb(0x16, 0xa3, 0x4a), rgb(0x15, 0x80, 0x3d)],
        gravity: 640.0,
        decay: 0.90,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Rainbow burst, from the top
    BurstConfig {
        particle_count: 150,
        spread: 60.0,
        angle: 90.0,
        origin: (0.5, 0.2),
        colors: &[
            rgb(0xff, 0x00, 0x00), rgb(0xff, 0x7f, 0x00), rgb(0xff, 0xff, 0x00),
            rgb(0x00, 0xff, 0x00), rgb(0x00, 0x00, 0xff), rgb(0x4b, 0x00, 0x82),
            rgb(0x94, 0x00, 0xd3),
        ],
        gravity: 800.0,
        decay: 0.92,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Ocean blues, from the left
    BurstConfig {
        particle_count: 120,
        spread: 55.0,
        angle: 45.0,
        origin: (0.0, 0.5),
        colors: &[rgb(0x0e, 0xa5, 0xe9), rgb(0x02, 0x84, 0xc7), rgb(0x03, 0x69, 0xa1), rgb(0x07, 0x59, 0x85), rgb(0x0c, 0x4a, 0x6e)],
        gravity: 560.0,
        decay: 0.88,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Sunset oranges and reds, from the right
    BurstConfig {
        particle_count: 130,
        spread: 65.0,
        angle: 135.0,
        origin: (1.0, 0.5),
        colors: &[rgb(0xf9, 0x73, 0x16), rgb(0xea, 0x58, 0x0c), rgb(0xdc, 0x26, 0x26), rgb(0xef, 0x44, 0x44), rgb(0xf5, 0x9e, 0x0b)],
        gravity: 600.0,
        decay: 0.91,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Violets, outward from the center
    BurstConfig {
        particle_count: 200,
        spread: 80.0,
        angle: 90.0,
        origin: (0.5, 0.5),
        colors: &[rgb(0xa8, 0x55, 0xf7), rgb(0x93, 0x33, 0xea), rgb(0x7c, 0x3a, 0xed), rgb(0x6d, 0x28, 0xd9), rgb(0x8b, 0x5c, 0xf6)],
        gravity: 480.0,
        decay: 0.85,
        scalar: 1.2,
        ttl: 1.8,
    },
    // Gold celebration, diagonal from below
    BurstConfig {
        particle_count: 110,
        spread: 50.0,
        angle: 75.0,
        origin: (0.5, 0.8),
        colors: &[rgb(0xfb, 0xbf, 0x24), rgb(0xf5, 0x9e, 0x0b), rgb(0xd9, 0x77, 0x06), rgb(0xfa, 0xcc, 0x15), rgb(0xea, 0xb3, 0x08)],
        gravity: 720.0,
        decay: 0.93,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Fireworks, wide from the center
    BurstConfig {
        particle_count: 180,
        spread: 90.0,
        angle: 90.0,
        origin: (0.5, 0.5),
        colors: &[rgb(0xec, 0x48, 0x99), rgb(0xf4, 0x3f, 0x5e), rgb(0xf9, 0x73, 0x16), rgb(0xea, 0xb3, 0x08), rgb(0x22, 0xc5, 0x5e), rgb(0x3b, 0x82, 0xf6)],
        gravity: 400.0,
        decay: 0.87,
        scalar: 1.3,
        ttl: 2.2,
    },
    // Green-blue side burst, left
    BurstConfig {
        particle_count: 140,
        spread: 45.0,
        angle: 30.0,
        origin: (0.1, 0.4),
        colors: &[rgb(0x10, 0xb9, 0x81), rgb(0x05, 0x96, 0x69), rgb(0x0d, 0x94, 0x88), rgb(0x14, 0xb8, 0xa6), rgb(0x06, 0xb6, 0xd4)],
        gravity: 520.0,
        decay: 0.89,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Red-pink side burst, right
    BurstConfig {
        particle_count: 140,
        spread: 45.0,
        angle: 150.0,
        origin: (0.9, 0.4),
        colors: &[rgb(0xf4, 0x3f, 0x5e), rgb(0xe1, 0x1d, 0x48), rgb(0xbe, 0x12, 0x3c), rgb(0xec, 0x48, 0x99), rgb(0xdb, 0x27, 0x77)],
        gravity: 520.0,
        decay: 0.89,
        scalar: 1.0,
        ttl: 1.6,
    },
    // Everything at once
    BurstConfig {
        particle_count: 250,
        spread: 100.0,
        angle: 90.0,
        origin: (0.5, 0.5),
        colors: &[rgb(0x8b, 0x5c, 0xf6), rgb(0xec, 0x48, 0x99), rgb(0xf5, 0x9e, 0x0b), rgb(0x10, 0xb9, 0x81), rgb(0x3b, 0x82, 0xf6), rgb(0xef, 0x44, 0x44)],
        gravity: 320.0,
        decay: 0.86,
        scalar: 1.5,
        ttl: 2.5,
    },
];

#[derive(Debug, Clone, Copy)]
struct Particle {
    /// Offset from the burst origin, in px
    offset: Vector,
    /// px/s
    velocity: Vector,
    color: Color,
    radius: f32,
    /// Remaining lifetime fraction, 1 → 0
    life: f32,
}

/// A live confetti burst
#[derive(Debug)]
pub struct ConfettiBurst {
    particles: Vec<Particle>,
    /// Normalized origin within the canvas
    origin: (f32, f32),
    gravity: f32,
    decay: f32,
    ttl: f32,
    last_tick: Instant,
}

impl ConfettiBurst {
    /// Spawn a burst with one of the preset configurations.
    pub fn spawn(rng: &mut impl Rng, now: Instant) -> Self {
        let config = &BURSTS[rng.gen_range(0..BURSTS.len())];

        let particles = (0..config.particle_count)
            .map(|_| {
                let half = config.spread / 2.0;
                let angle = (config.angle + rng.gen_range(-half..=half)).to_radians();
                let speed = rng.gen_range(250.0..=650.0) * config.scalar;

                Particle {
                    offset: Vector::new(0.0, 0.0),
                    // Screen y grows downward, so launch angles flip sign
                    velocity: Vector::new(angle.cos() * speed, -angle.sin() * speed),
                    color: config.colors[rng.gen_range(0..config.colors.len())],
                    radius: rng.gen_range(2.5..=4.5) * config.scalar,
                    life: 1.0,
                }
            })
            .collect();

        ConfettiBurst {
            particles,
            origin: config.origin,
            gravity: config.gravity,
            decay: config.decay,
            ttl: config.ttl,
            last_tick: now,
        }
    }

    /// Advance the simulation to `now` and drop dead particles.
    pub fn tick(&mut self, now: Instant) {
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        if dt <= 0.0 {
            return;
        }

        let drag = self.decay.powf(dt);
        for p in &mut self.particles {
            p.velocity.x *= drag;
            p.velocity.y = p.velocity.y * drag + self.gravity * dt;
            p.offset = p.offset + p.velocity * dt;
            p.life -= dt / self.ttl;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }
}

impl<Message> canvas::Program<Message> for ConfettiBurst {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let origin = Point::new(
            bounds.width * self.origin.0,
            bounds.height * self.origin.1,
        );

        for p in &self.particles {
            let dot = Path::circle(origin + p.offset, p.radius);
            frame.fill(&dot, Color { a: p.life.min(1.0), ..p.color });
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn test_burst_decays_to_finished() {
        let mut rng = StdRng::seed_from_u64(1);
        let t0 = Instant::now();
        let mut burst = ConfettiBurst::spawn(&mut rng, t0);

        assert!(!burst.is_finished());

        // Longest preset lifetime is 2.5 s; tick well past it
        for i in 1..=40 {
            burst.tick(t0 + Duration::from_millis(i * 100));
        }
        assert!(burst.is_finished());
    }

    #[test]
    fn test_gravity_pulls_particles_down() {
        let mut rng = StdRng::seed_from_u64(2);
        let t0 = Instant::now();
        let mut burst = ConfettiBurst::spawn(&mut rng, t0);

        for i in 1..=10 {
            burst.tick(t0 + Duration::from_millis(i * 100));
        }

        // After a second, everything should be falling
        assert!(burst.particles.iter().all(|p| p.velocity.y > 0.0));
    }
}
