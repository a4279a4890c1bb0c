//! Visual configuration for field rendering.
//!
//! Everything here is fixed at construction time; the field exposes no
//! runtime reconfiguration surface.

use glam::Vec3;

use crate::field::DEFAULT_PARTICLE_COUNT;

/// Construction-time rendering options.
#[derive(Debug, Clone, Copy)]
pub struct VisualConfig {
    /// Number of particles in the field.
    pub particle_count: u32,
    /// Accent hue shared by dots and connection lines (RGB, 0.0-1.0).
    pub accent: Vec3,
    /// Surface clear color (RGB, 0.0-1.0).
    pub background: Vec3,
    /// Stroke width of connection lines in pixels.
    pub line_width: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            // rgb(0, 240, 255), the original's cyan.
            accent: Vec3::new(0.0, 240.0 / 255.0, 1.0),
            background: Vec3::new(0.02, 0.02, 0.05),
            line_width: 1.0,
        }
    }
}

impl VisualConfig {
    /// Set the particle count.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the accent color.
    pub fn with_accent(mut self, accent: Vec3) -> Self {
        self.accent = accent;
        self
    }
}
