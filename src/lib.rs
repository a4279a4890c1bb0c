//! # Constellation
//!
//! A drifting particle-network background: a fixed set of particles floats
//! across the window, wrapping at the edges, and every pair closer than a
//! threshold is joined by a line whose alpha fades with distance.
//!
//! The simulation ([`ParticleField`]) is plain CPU code with no GPU or window
//! dependency; [`App`] wires it to a winit window and a wgpu renderer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use constellation::{App, VisualConfig};
//!
//! fn main() {
//!     if let Err(e) = App::new(VisualConfig::default()).run() {
//!         eprintln!("Error: {}", e);
//!     }
//! }
//! ```
//!
//! The field can also be driven headlessly, one frame per call:
//!
//! ```
//! use constellation::ParticleField;
//!
//! let mut field = ParticleField::new(1920, 1080, 50);
//! let mut lines = Vec::new();
//! field.advance();
//! field.connections(&mut lines);
//! ```

pub mod error;
pub mod field;
mod gpu;
pub mod particle;
pub mod time;
pub mod visuals;
mod window;

pub use error::{GpuError, RunError};
pub use field::{
    Connection, ParticleField, CONNECT_ALPHA, CONNECT_RADIUS, DEFAULT_PARTICLE_COUNT,
};
pub use glam::Vec2;
pub use particle::Particle;
pub use time::Time;
pub use visuals::VisualConfig;
pub use window::App;
