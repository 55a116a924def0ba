//! Particles spawned by the envelope gate, drifting left across the lane.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::geometry::{torus_triangles, Vertex};
use crate::params::{palette, RenderConfig};
use crate::spawner::SpawnEvent;

/// Live particles plus the shared torus mesh they are drawn with
pub struct ParticleSystem {
    particles: Vec<SpawnEvent>,
    torus: Vec<Vec3>,
    drift_time_s: f32,
    squish_amount: f32,
}

impl ParticleSystem {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            particles: Vec::new(),
            torus: torus_triangles(
                config.torus_inner_radius_px,
                config.torus_outer_radius_px,
                config.torus_segments,
            ),
            drift_time_s: config.drift_time_s,
            squish_amount: config.squish_amount,
        }
    }

    pub fn spawn(&mut self, event: SpawnEvent) {
        self.particles.push(event);
    }

    pub fn particles(&self) -> &[SpawnEvent] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Move every particle left by `window_width / drift_time` px/s, age it,
    /// and drop the ones that have left the window. y never changes after
    /// spawn.
    pub fn update(&mut self, dt_s: f32, window_width: f32) {
        let speed = window_width / self.drift_time_s;
        for particle in &mut self.particles {
            particle.position.x -= speed * dt_s;
            particle.age_s += dt_s;
        }
        self.particles.retain(|p| p.position.x >= 0.0);
    }

    /// Non-uniform scale oscillating once per second
    pub fn squish(&self, age_s: f32) -> (f32, f32) {
        let squish = self.squish_amount * (TAU * age_s).sin();
        (1.0 + squish, 1.0 - squish)
    }

    /// Append one squished torus per particle
    pub fn push_meshes(&self, out: &mut Vec<Vertex>) {
        out.reserve(self.torus.len() * self.particles.len());
        for particle in &self.particles {
            let (sx, sy) = self.squish(particle.age_s);
            let scale = Vec3::new(sx, sy, 1.0);
            let offset = particle.position.extend(0.0);
            for &p in &self.torus {
                out.push(Vertex::new(p * scale + offset, palette::PARTICLE));
            }
        }
    }
}
