//! Visualizer state: the frame loop's side of the pipeline and the scene it
//! draws.

use crate::audio::{RecordingState, SampleBuffer};
use crate::controls::Command;
use crate::geometry::Vertex;
use crate::keycap::{push_recording_indicator, KeycapLayout};
use crate::params::{EnvelopeConfig, RenderConfig, SpawnConfig};
use crate::particles::ParticleSystem;
use crate::spawner::{EnvelopeSpawner, FrameReport};

/// Geometry for one frame
#[derive(Debug, Default)]
pub struct Scene {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
}

impl Scene {
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.lines.clear();
    }
}

/// Whether the frame loop should keep running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Everything the frame loop owns: sample window handle, spawner, particles
/// and display toggles
pub struct Visualizer {
    buffer: SampleBuffer,
    spawner: EnvelopeSpawner,
    particles: ParticleSystem,
    render_config: RenderConfig,
    show_envelope: bool,
}

impl Visualizer {
    pub fn new(
        buffer: SampleBuffer,
        envelope_config: &EnvelopeConfig,
        spawn_config: &SpawnConfig,
        render_config: &RenderConfig,
    ) -> Self {
        Self {
            buffer,
            spawner: EnvelopeSpawner::new(envelope_config, spawn_config),
            particles: ParticleSystem::new(render_config),
            render_config: render_config.clone(),
            show_envelope: render_config.show_envelope,
        }
    }

    pub fn spawner(&self) -> &EnvelopeSpawner {
        &self.spawner
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn show_envelope(&self) -> bool {
        self.show_envelope
    }

    pub fn recording_state(&self) -> RecordingState {
        self.buffer.recording_state()
    }

    /// Advance one frame: analyse the window, maybe spawn, move particles
    pub fn frame(&mut self, dt_s: f32, window_width: f32, window_height: f32) -> FrameReport {
        let layout = KeycapLayout::new(window_width, window_height, &self.render_config);
        let report = self.spawner.update(&self.buffer, dt_s, &layout);

        if let Some(event) = report.spawn {
            log::debug!(
                "Spawn at ({:.0}, {:.0}), peak {:.3}",
                event.position.x,
                event.position.y,
                report.peak.value
            );
            self.particles.spawn(event);
        }
        // A new particle moves and ages in the frame it spawns
        self.particles.update(dt_s, window_width);

        report
    }

    /// Build the geometry for the current state into `scene`
    pub fn build_scene(&self, window_width: f32, window_height: f32, scene: &mut Scene) {
        scene.clear();
        let layout = KeycapLayout::new(window_width, window_height, &self.render_config);

        layout.push_faces(&mut scene.triangles);
        push_recording_indicator(
            window_width,
            self.recording_state() == RecordingState::Recording,
            &mut scene.triangles,
        );
        self.particles.push_meshes(&mut scene.triangles);

        if self.show_envelope {
            layout.push_envelope_trace(self.spawner.envelope(), &mut scene.lines);
        }
    }

    /// Apply a keyboard command
    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::ToggleRecording => match self.buffer.toggle_recording() {
                RecordingState::Recording => log::info!("Recording started (window cleared)"),
                RecordingState::Idle => log::info!("Recording stopped (audio is discarded)"),
            },
            Command::ToggleEnvelopeLine => {
                self.show_envelope = !self.show_envelope;
                log::info!(
                    "Envelope line display: {}",
                    if self.show_envelope { "ON" } else { "OFF" }
                );
            }
            Command::RaiseThreshold => {
                let threshold = self.spawner.gate_mut().raise_threshold();
                log::info!("Amplitude threshold increased to {:.2}", threshold);
            }
            Command::LowerThreshold => {
                let threshold = self.spawner.gate_mut().lower_threshold();
                log::info!("Amplitude threshold decreased to {:.2}", threshold);
            }
            Command::ShortenInterval => {
                let interval = self.spawner.gate_mut().shorten_interval();
                log::info!("Spawn interval decreased to {:.2} seconds", interval);
            }
            Command::LengthenInterval => {
                let interval = self.spawner.gate_mut().lengthen_interval();
                log::info!("Spawn interval increased to {:.2} seconds", interval);
            }
            Command::Quit => return Flow::Exit,
        }
        Flow::Continue
    }
}
