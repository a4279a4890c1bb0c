//! The particle value record.

use glam::Vec2;

/// A single drifting particle.
///
/// All attributes are drawn once at spawn time and stay fixed for the
/// particle's lifetime. There is no acceleration; one velocity step is
/// applied per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position in surface pixels.
    pub position: Vec2,
    /// Per-frame displacement in surface pixels.
    pub velocity: Vec2,
    /// Dot radius in pixels.
    pub radius: f32,
    /// Fill alpha of the dot.
    pub opacity: f32,
}
