//! The particle field: simulation state and the per-frame update.
//!
//! [`ParticleField`] owns a fixed-size set of particles, advances them by one
//! velocity step per frame, wraps them at the surface edges, and computes the
//! proximity connections that the renderer draws as fading lines. It has no
//! GPU or window dependency, which keeps every behavioral property unit
//! testable.
//!
//! The connection pass is pairwise over all particles, O(N^2) per frame. At
//! the default count of 50 that is 1225 pair checks, far below anything worth
//! optimizing; raising the count into the thousands would need a spatial grid
//! first.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::particle::Particle;

/// Default number of particles in a field.
pub const DEFAULT_PARTICLE_COUNT: u32 = 50;

/// Distance below which two particles are joined by a line, in pixels.
pub const CONNECT_RADIUS: f32 = 150.0;

/// Line alpha as the pair distance approaches zero. Fades linearly to zero
/// at [`CONNECT_RADIUS`].
pub const CONNECT_ALPHA: f32 = 0.1;

/// A line segment between two nearby particles, valid for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Position of the first endpoint.
    pub a: Vec2,
    /// Position of the second endpoint.
    pub b: Vec2,
    /// Stroke alpha, `CONNECT_ALPHA * (1 - d / CONNECT_RADIUS)`.
    pub alpha: f32,
}

/// A fixed-size set of drifting particles confined to a surface.
///
/// The particle count is set at construction and never changes. A resize
/// discards the whole set and respawns it at the new extents; particles are
/// not migrated across a resize.
pub struct ParticleField {
    width: u32,
    height: u32,
    count: u32,
    particles: Vec<Particle>,
    rng: SmallRng,
}

impl ParticleField {
    /// Create a field of `count` particles on a `width` x `height` surface,
    /// seeded from entropy.
    pub fn new(width: u32, height: u32, count: u32) -> Self {
        Self::with_rng(width, height, count, SmallRng::from_entropy())
    }

    /// Create a field with a caller-provided RNG, for deterministic spawns.
    pub fn with_rng(width: u32, height: u32, count: u32, rng: SmallRng) -> Self {
        let mut field = Self {
            width,
            height,
            count,
            particles: Vec::with_capacity(count as usize),
            rng,
        };
        field.regenerate();
        field
    }

    /// Surface width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The current particle set.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Upper bound on connections for a field of `count` particles.
    ///
    /// Used by the renderer to size its line buffer once, up front.
    pub const fn max_connections(count: u32) -> u32 {
        count * count.saturating_sub(1) / 2
    }

    fn spawn(&mut self) -> Particle {
        // Multiplying by the extent instead of sampling a range keeps a
        // zero-size surface degenerate but safe: everything lands at 0.
        Particle {
            position: Vec2::new(
                self.rng.gen::<f32>() * self.width as f32,
                self.rng.gen::<f32>() * self.height as f32,
            ),
            velocity: Vec2::new(
                (self.rng.gen::<f32>() - 0.5) * 0.5,
                (self.rng.gen::<f32>() - 0.5) * 0.5,
            ),
            radius: self.rng.gen::<f32>() * 2.0 + 1.0,
            opacity: self.rng.gen::<f32>() * 0.5 + 0.2,
        }
    }

    fn regenerate(&mut self) {
        self.particles.clear();
        for _ in 0..self.count {
            let p = self.spawn();
            self.particles.push(p);
        }
    }

    /// Advance the simulation by one frame: one velocity step per particle,
    /// then wrap each axis independently.
    ///
    /// The wrap is the original's exact jump-to-boundary policy: a coordinate
    /// below 0 is set to the surface extent, one above the extent is set to 0.
    /// Not a modulo wrap; the single-frame jump lands on the boundary exactly.
    pub fn advance(&mut self) {
        let w = self.width as f32;
        let h = self.height as f32;

        for p in &mut self.particles {
            p.position += p.velocity;

            if p.position.x < 0.0 {
                p.position.x = w;
            } else if p.position.x > w {
                p.position.x = 0.0;
            }
            if p.position.y < 0.0 {
                p.position.y = h;
            } else if p.position.y > h {
                p.position.y = 0.0;
            }
        }
    }

    /// Collect this frame's connections into `out`, clearing it first.
    ///
    /// Each unordered pair is considered exactly once. A pair is connected
    /// iff its distance is strictly below [`CONNECT_RADIUS`]; the alpha fades
    /// linearly from [`CONNECT_ALPHA`] at distance zero to 0 at the radius.
    pub fn connections(&self, out: &mut Vec<Connection>) {
        out.clear();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dist = a.position.distance(b.position);
                if dist < CONNECT_RADIUS {
                    out.push(Connection {
                        a: a.position,
                        b: b.position,
                        alpha: CONNECT_ALPHA * (1.0 - dist / CONNECT_RADIUS),
                    });
                }
            }
        }
    }

    /// Adopt new surface extents and respawn the whole particle set.
    ///
    /// The old particles are discarded, not repositioned. Rescaling them
    /// proportionally would avoid the visible pop but changes the rendered
    /// behavior; the full reset is kept deliberately.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.regenerate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(width: u32, height: u32, count: u32) -> ParticleField {
        ParticleField::with_rng(width, height, count, SmallRng::seed_from_u64(0x5eed))
    }

    #[test]
    fn test_count_fixed_across_frames() {
        let mut field = seeded(800, 600, 50);
        for _ in 0..100 {
            field.advance();
        }
        assert_eq!(field.particles().len(), 50);
    }

    #[test]
    fn test_count_fixed_across_resize() {
        let mut field = seeded(800, 600, 50);
        field.resize(400, 300);
        assert_eq!(field.particles().len(), 50);
        field.resize(1920, 1080);
        assert_eq!(field.particles().len(), 50);
    }

    #[test]
    fn test_spawn_attributes_in_range() {
        let field = seeded(800, 600, 200);
        for p in field.particles() {
            assert!(p.position.x >= 0.0 && p.position.x < 800.0);
            assert!(p.position.y >= 0.0 && p.position.y < 600.0);
            assert!(p.velocity.x >= -0.25 && p.velocity.x < 0.25);
            assert!(p.velocity.y >= -0.25 && p.velocity.y < 0.25);
            assert!(p.radius >= 1.0 && p.radius < 3.0);
            assert!(p.opacity >= 0.2 && p.opacity < 0.7);
        }
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let mut field = seeded(320, 240, 50);
        for _ in 0..10_000 {
            field.advance();
        }
        for p in field.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= 320.0);
            assert!(p.position.y >= 0.0 && p.position.y <= 240.0);
        }
    }

    #[test]
    fn test_wrap_left_edge_jumps_to_width() {
        let mut field = seeded(1000, 1000, 1);
        field.particles[0].position = Vec2::new(0.0, 500.0);
        field.particles[0].velocity = Vec2::new(-0.001, 0.0);
        field.advance();
        // Jump to the exact boundary, not a modulo wrap.
        assert_eq!(field.particles[0].position.x, 1000.0);
    }

    #[test]
    fn test_wrap_right_edge_jumps_to_zero() {
        let mut field = seeded(1000, 1000, 1);
        field.particles[0].position = Vec2::new(999.7, 50.0);
        field.particles[0].velocity = Vec2::new(0.5, 0.0);
        field.advance();
        assert_eq!(field.particles[0].position.x, 0.0);
        assert_eq!(field.particles[0].position.y, 50.0);
    }

    #[test]
    fn test_two_still_particles_keep_one_connection() {
        let mut field = seeded(1000, 1000, 2);
        field.particles[0].position = Vec2::new(0.0, 0.0);
        field.particles[0].velocity = Vec2::ZERO;
        field.particles[1].position = Vec2::new(10.0, 0.0);
        field.particles[1].velocity = Vec2::ZERO;

        let mut out = Vec::new();
        for _ in 0..5 {
            field.advance();
            field.connections(&mut out);
            assert_eq!(out.len(), 1);
            let expected = CONNECT_ALPHA * (1.0 - 10.0 / CONNECT_RADIUS);
            assert!((out[0].alpha - expected).abs() < 1e-6);
        }
        assert_eq!(field.particles[0].position, Vec2::new(0.0, 0.0));
        assert_eq!(field.particles[1].position, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_each_pair_considered_once() {
        let mut field = seeded(1000, 1000, 3);
        for (i, pos) in [(0.0, 0.0), (50.0, 0.0), (0.0, 50.0)].iter().enumerate() {
            field.particles[i].position = Vec2::new(pos.0, pos.1);
            field.particles[i].velocity = Vec2::ZERO;
        }
        let mut out = Vec::new();
        field.connections(&mut out);
        // Three particles, all mutually in range: exactly 3 pairs.
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_connection_alpha_is_order_independent() {
        let mut field = seeded(1000, 1000, 2);
        field.particles[0].position = Vec2::new(30.0, 40.0);
        field.particles[1].position = Vec2::new(90.0, 120.0);

        let mut forward = Vec::new();
        field.connections(&mut forward);

        field.particles.swap(0, 1);
        let mut reversed = Vec::new();
        field.connections(&mut reversed);

        assert_eq!(forward.len(), 1);
        assert_eq!(reversed.len(), 1);
        assert_eq!(forward[0].alpha, reversed[0].alpha);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut field = seeded(1000, 1000, 2);
        field.particles[0].position = Vec2::new(0.0, 0.0);
        field.particles[1].position = Vec2::new(CONNECT_RADIUS, 0.0);

        let mut out = Vec::new();
        field.connections(&mut out);
        assert!(out.is_empty(), "no connection at exactly the radius");

        field.particles[1].position.x = 149.0;
        field.connections(&mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_alpha_fades_with_distance() {
        let mut field = seeded(1000, 1000, 2);
        let mut out = Vec::new();
        let mut last = f32::INFINITY;
        for d in [0.0, 10.0, 75.0, 149.0] {
            field.particles[0].position = Vec2::new(0.0, 0.0);
            field.particles[1].position = Vec2::new(d, 0.0);
            field.connections(&mut out);
            assert_eq!(out.len(), 1);
            assert!(out[0].alpha <= CONNECT_ALPHA);
            assert!(out[0].alpha < last);
            last = out[0].alpha;
        }
        // At distance zero the alpha is the full peak.
        field.particles[1].position = Vec2::new(0.0, 0.0);
        field.connections(&mut out);
        assert_eq!(out[0].alpha, CONNECT_ALPHA);
    }

    #[test]
    fn test_resize_replaces_particles_and_extents() {
        let mut field = seeded(800, 600, 50);
        let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();

        field.resize(400, 300);

        assert_eq!(field.width(), 400);
        assert_eq!(field.height(), 300);
        let after: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
        assert_ne!(before, after, "resize must respawn, not keep, the set");
        for p in field.particles() {
            assert!(p.position.x >= 0.0 && p.position.x < 400.0);
            assert!(p.position.y >= 0.0 && p.position.y < 300.0);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = seeded(800, 600, 50);
        let b = seeded(800, 600, 50);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_zero_size_surface_collapses_to_origin() {
        let mut field = seeded(0, 0, 10);
        for _ in 0..10 {
            field.advance();
        }
        for p in field.particles() {
            assert_eq!(p.position, Vec2::ZERO);
        }
    }

    #[test]
    fn test_max_connections_bound() {
        assert_eq!(ParticleField::max_connections(0), 0);
        assert_eq!(ParticleField::max_connections(1), 0);
        assert_eq!(ParticleField::max_connections(2), 1);
        assert_eq!(ParticleField::max_connections(50), 1225);
    }
}
