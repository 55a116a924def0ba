//! Window, keycap and particle rendering configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Borderless fullscreen on the primary monitor
    pub fullscreen: bool,

    /// Keycap bar height (pixels)
    pub keycap_height_px: f32,

    /// Keycap bevel depth (pixels)
    pub keycap_depth_px: f32,

    /// Fraction of the keycap height used by the envelope trace
    pub waveform_fraction: f32,

    /// Time for a particle to cross the full window width (seconds)
    /// 5.0 = the particle drift matches the 5s sample window
    pub drift_time_s: f32,

    /// Amplitude of the particle squish oscillation (fraction of size)
    pub squish_amount: f32,

    /// Particle torus tube radius (pixels)
    pub torus_inner_radius_px: f32,

    /// Particle torus ring radius (pixels)
    pub torus_outer_radius_px: f32,

    /// Torus subdivisions, both around the tube and around the ring
    pub torus_segments: u32,

    /// Show the envelope trace across the keycap
    pub show_envelope: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fullscreen: false,
            keycap_height_px: 60.0,
            keycap_depth_px: 18.0,
            waveform_fraction: 0.8,
            drift_time_s: 5.0,
            squish_amount: 0.2,
            torus_inner_radius_px: 2.0,
            torus_outer_radius_px: 4.0,
            torus_segments: 16,
            show_envelope: true,
        }
    }
}

/// Colour palette (linear RGB)
pub mod palette {
    /// Window clear colour (#200000)
    pub const BACKGROUND: [f32; 3] = [0.125, 0.0, 0.0];
    /// Keycap top face and top edge (#800000)
    pub const KEYCAP_TOP: [f32; 3] = [0.5, 0.0, 0.0];
    /// Keycap front and left faces (#400000)
    pub const KEYCAP_SIDE: [f32; 3] = [0.25, 0.0, 0.0];
    /// Keycap right face, in shadow (#200000)
    pub const KEYCAP_SHADOW: [f32; 3] = [0.125, 0.0, 0.0];
    pub const ENVELOPE_LINE: [f32; 3] = [1.0, 1.0, 1.0];
    pub const PARTICLE: [f32; 3] = [1.0, 0.0, 0.0];
    pub const INDICATOR_IDLE: [f32; 3] = [0.25, 0.0, 0.0];
    pub const INDICATOR_RECORDING: [f32; 3] = [0.8, 0.05, 0.05];
}
