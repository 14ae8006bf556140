// zta-core/src/tasks/starfield.rs
//
// The decorative star background: a fixed population of slow-moving
// particles wrapping at the viewport edges. Purely presentational; shares
// no state with the rest of the system and its only lifecycle concern is
// cancellation on shutdown.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// Matches the original background: 200 stars drifting at up to half a
/// pixel per frame.
pub const NUM_PARTICLES: usize = 200;
const MAX_SPEED: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Particle {
    fn spawn(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        Self {
            x: rng.random_range(0.0..width),
            y: rng.random_range(0.0..height),
            speed_x: rng.random_range(-MAX_SPEED / 2.0..MAX_SPEED / 2.0),
            speed_y: rng.random_range(-MAX_SPEED / 2.0..MAX_SPEED / 2.0),
            size: rng.random_range(1.0..3.0),
            opacity: rng.random_range(0.5..1.0),
        }
    }
}

pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(width: f32, height: f32, count: usize, rng: &mut impl Rng) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(width, height, rng))
            .collect();
        Self {
            width,
            height,
            particles,
        }
    }

    /// Advances one frame, wrapping positions at the bounds.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y;

            if p.x > self.width {
                p.x = 0.0;
            }
            if p.x < 0.0 {
                p.x = self.width;
            }
            if p.y > self.height {
                p.y = 0.0;
            }
            if p.y < 0.0 {
                p.y = self.height;
            }
        }
    }

    /// Restarts the particle set at the new viewport size.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut impl Rng) {
        self.width = width;
        self.height = height;
        let count = self.particles.len();
        self.particles = (0..count)
            .map(|_| Particle::spawn(width, height, rng))
            .collect();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Drives the field at a fixed frame interval until shutdown. The field
/// is shared only with whatever renders it; nothing else in the system
/// reads or writes it.
pub fn spawn_starfield_task(
    field: Arc<Mutex<ParticleField>>,
    frame_interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut frames: u64 = 0;
        loop {
            tokio::select! {
                _ = sleep(frame_interval) => {
                    field.lock().await.step();
                    frames += 1;
                    if frames % 600 == 0 {
                        debug!("starfield at frame {frames}");
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
