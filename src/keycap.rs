//! Keycap lane layout and geometry.

use glam::{Vec2, Vec3};

use crate::geometry::{push_disc, push_polyline, push_quad, Vertex};
use crate::params::{palette, RenderConfig};

/// Maximum number of points used to draw the envelope trace. Longer
/// envelopes are reduced by taking the loudest value in each column.
pub const MAX_TRACE_POINTS: usize = 2048;

/// Placement of the keycap bar for a given window size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeycapLayout {
    /// Left edge (pixels)
    pub x: f32,
    /// Top edge (pixels)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Bevel depth (pixels)
    pub depth: f32,
    /// Vertical span of the envelope trace (pixels)
    pub waveform_height: f32,
}

impl KeycapLayout {
    /// Full-width bar centred vertically in the window
    pub fn new(window_width: f32, window_height: f32, config: &RenderConfig) -> Self {
        let height = config.keycap_height_px;
        Self {
            x: 0.0,
            y: (window_height - height) / 2.0,
            width: window_width,
            height,
            depth: config.keycap_depth_px,
            waveform_height: height * config.waveform_fraction,
        }
    }

    /// Screen y of an envelope value: 0 sits on the bottom edge, larger
    /// values rise towards the top
    pub fn envelope_to_y(&self, envelope: f32) -> f32 {
        self.y + self.height - envelope * self.waveform_height
    }

    /// Where new particles enter (right edge of the bar)
    pub fn spawn_x(&self) -> f32 {
        self.x + self.width
    }

    /// Append the bevelled bar as coloured triangles.
    ///
    /// Bevel faces go first and the top face last, so it covers them without
    /// a depth buffer.
    pub fn push_faces(&self, out: &mut Vec<Vertex>) {
        let (x, y, w, h, d) = (self.x, self.y, self.width, self.height, self.depth);
        let v = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

        // Front
        push_quad(
            out,
            [v(x, y, 0.0), v(x + w, y, 0.0), v(x + w - d, y - d, -d), v(x - d, y - d, -d)],
            palette::KEYCAP_SIDE,
        );
        // Right (shadow)
        push_quad(
            out,
            [
                v(x + w, y, 0.0),
                v(x + w, y + h, 0.0),
                v(x + w - d, y + h - d, -d),
                v(x + w - d, y - d, -d),
            ],
            palette::KEYCAP_SHADOW,
        );
        // Top edge
        push_quad(
            out,
            [
                v(x, y + h, 0.0),
                v(x + w, y + h, 0.0),
                v(x + w - d, y + h - d, -d),
                v(x - d, y + h - d, -d),
            ],
            palette::KEYCAP_TOP,
        );
        // Left
        push_quad(
            out,
            [v(x, y, 0.0), v(x, y + h, 0.0), v(x - d, y + h - d, -d), v(x - d, y - d, -d)],
            palette::KEYCAP_SIDE,
        );
        // Top face
        push_quad(
            out,
            [v(x, y, 0.0), v(x + w, y, 0.0), v(x + w, y + h, 0.0), v(x, y + h, 0.0)],
            palette::KEYCAP_TOP,
        );
    }

    /// Append the envelope trace spanning the bar as a line list
    pub fn push_envelope_trace(&self, envelope: &[f32], out: &mut Vec<Vertex>) {
        let columns = reduce_columns(envelope, MAX_TRACE_POINTS);
        if columns.len() < 2 {
            return;
        }

        let last = (columns.len() - 1) as f32;
        let points: Vec<Vec3> = columns
            .iter()
            .enumerate()
            .map(|(i, &env)| {
                Vec3::new(
                    self.x + (i as f32 / last) * self.width,
                    self.envelope_to_y(env),
                    1.0,
                )
            })
            .collect();

        push_polyline(out, &points, palette::ENVELOPE_LINE);
    }
}

/// Recording indicator: a disc centred at the top of the window, lit while
/// samples are being captured
pub fn push_recording_indicator(window_width: f32, recording: bool, out: &mut Vec<Vertex>) {
    let color = if recording {
        palette::INDICATOR_RECORDING
    } else {
        palette::INDICATOR_IDLE
    };
    push_disc(out, Vec2::new(window_width / 2.0, 50.0), 20.0, 30, color);
}

/// Reduce `values` to at most `max_points` by keeping the maximum of each
/// equal-width bucket
fn reduce_columns(values: &[f32], max_points: usize) -> Vec<f32> {
    if values.len() <= max_points {
        return values.to_vec();
    }
    (0..max_points)
        .map(|i| {
            let start = i * values.len() / max_points;
            let end = ((i + 1) * values.len() / max_points).max(start + 1);
            values[start..end].iter().copied().fold(0.0, f32::max)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> KeycapLayout {
        KeycapLayout::new(1000.0, 600.0, &RenderConfig::default())
    }

    #[test]
    fn test_layout_is_centred() {
        let layout = layout();

        assert_eq!(layout.y, 270.0);
        assert_eq!(layout.height, 60.0);
        assert_eq!(layout.waveform_height, 48.0);
        assert_eq!(layout.spawn_x(), 1000.0);
    }

    #[test]
    fn test_envelope_to_y_rises_with_level() {
        let layout = layout();

        assert_eq!(layout.envelope_to_y(0.0), 330.0);
        assert_eq!(layout.envelope_to_y(1.0), 282.0);
        assert!(layout.envelope_to_y(0.5) < layout.envelope_to_y(0.1));
    }

    #[test]
    fn test_faces_emit_five_quads() {
        let mut out = Vec::new();
        layout().push_faces(&mut out);

        assert_eq!(out.len(), 5 * 6);
        // Top face is drawn last
        assert_eq!(out.last().map(|v| v.color), Some(palette::KEYCAP_TOP));
    }

    #[test]
    fn test_trace_needs_two_points() {
        let mut out = Vec::new();
        layout().push_envelope_trace(&[0.5], &mut out);
        assert!(out.is_empty());

        layout().push_envelope_trace(&[0.0, 0.5, 1.0], &mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].position[0], 0.0);
        assert_eq!(out[3].position[0], 1000.0);
    }

    #[test]
    fn test_reduce_columns_keeps_peaks() {
        let mut values = vec![0.0; 10_000];
        values[5_123] = 0.9;

        let columns = reduce_columns(&values, 100);

        assert_eq!(columns.len(), 100);
        assert_eq!(columns.iter().copied().fold(0.0, f32::max), 0.9);
    }
}
