//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One update per rendering frame, per-frame speeds
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::rects_overlap;
pub use state::{Bullet, BulletKind, Enemy, GamePhase, GameState, Particle, Player};
pub use tick::{FrameInput, spawn_formation, tick};
