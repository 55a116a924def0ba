//! Bloodlane - a keycap lane that bleeds to the beat
//!
//! Live audio drives a peak envelope; whenever the window peak crosses the
//! threshold a cell spawns at the right edge of the keycap and drifts left.

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use bloodlane::analysis::OfflineRun;
use bloodlane::audio::{wav, AudioSystem};
use bloodlane::cli::Args;
use bloodlane::controls::{Command, KEY_HELP};
use bloodlane::params::{EnvelopeConfig, RenderConfig};
use bloodlane::rendering::RenderSystem;
use bloodlane::visualizer::{Flow, Scene, Visualizer};
use bloodlane::BloodlaneError;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    scene: Scene,

    // Pipeline
    visualizer: Visualizer,
    _audio: AudioSystem,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    last_frame: Instant,

    /// Fatal error raised inside the event loop
    error: Option<BloodlaneError>,
}

impl App {
    fn new(visualizer: Visualizer, audio: AudioSystem, render_config: RenderConfig) -> Self {
        Self {
            window: None,
            render_system: None,
            scene: Scene::default(),
            visualizer,
            _audio: audio,
            render_config,
            last_frame: Instant::now(),
            error: None,
        }
    }

    /// Advance the pipeline and draw a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt_s = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let (width, height) = render_system.size();
        let (width, height) = (width as f32, height as f32);

        self.visualizer.frame(dt_s, width, height);
        self.visualizer.build_scene(width, height, &mut self.scene);

        match render_system.render(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                let (w, h) = render_system.size();
                render_system.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.error = Some(BloodlaneError::Gpu("out of memory".to_string()));
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let mut window_attributes = Window::default_attributes()
            .with_title("Bloodlane")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        if self.render_config.fullscreen {
            window_attributes = window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(BloodlaneError::Gpu(format!("failed to create window: {}", e)));
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => {
                self.render_system = Some(render_system);
                self.window = Some(window);
                self.last_frame = Instant::now();
                log::info!("Bloodlane is running. Keys:\n{}", KEY_HELP);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(command) = Command::from_key(key) {
                    if self.visualizer.apply(command) == Flow::Exit {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

/// Run the pipeline over a WAV file without a window and print the spawns
fn run_analysis(args: &Args, path: &Path) -> anyhow::Result<()> {
    let clip = wav::read_mono(path).with_context(|| format!("reading {}", path.display()))?;

    let run = OfflineRun {
        envelope: EnvelopeConfig {
            sample_rate_hz: clip.sample_rate_hz,
            ..args.envelope_config()?
        },
        spawn: args.spawn_config()?,
        render: args.render_config(),
        fps: args.fps,
    };
    if !(run.fps > 0.0) {
        anyhow::bail!("--fps must be > 0, got {}", run.fps);
    }

    let records = run.run(&clip.samples);

    println!("frame    time_s   peak    env_now   x       y");
    for record in &records {
        println!(
            "{:<8} {:<8.3} {:<7.3} {:<9.3} {:<7.1} {:.1}",
            record.frame,
            record.time_s,
            record.peak,
            record.envelope_now,
            record.position.x,
            record.position.y
        );
    }
    println!(
        "\n{} spawn(s) over {:.2}s (threshold {}, interval {}s)",
        records.len(),
        clip.duration_secs(),
        run.spawn.threshold,
        run.spawn.interval_s
    );

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(path) = &args.analyze {
        return run_analysis(&args, path);
    }

    let source = args.audio_source()?;
    let render_config = args.render_config();
    let spawn_config = args.spawn_config()?;

    let audio = AudioSystem::start(&source, &args.envelope_config()?)
        .with_context(|| format!("starting audio source {:?}", source))?;

    let visualizer = Visualizer::new(
        audio.buffer().clone(),
        audio.config(),
        &spawn_config,
        &render_config,
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(visualizer, audio, render_config);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.error.take() {
        return Err(e.into());
    }
    Ok(())
}
