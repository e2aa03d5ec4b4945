//! Neon Invaders - a Space-Invaders style portfolio mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, per-frame tick, collisions)
//! - `engine`: Session lifecycle and the game-active observer hook
//! - `render`: Canvas 2D rendering (wasm only)
//! - `highscores`: Local-storage leaderboard

pub mod engine;
pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;

pub use engine::{Engine, GameActiveListener};
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Logical drawing surface; all coordinates live in this space.
    pub const SURFACE_WIDTH: f32 = 800.0;
    pub const SURFACE_HEIGHT: f32 = 600.0;
    pub const BACKGROUND_COLOR: &str = "#0a0a0a";

    /// Player ship
    pub const PLAYER_SIZE: Vec2 = Vec2::new(50.0, 30.0);
    /// Horizontal center of the playfield for a ship of PLAYER_SIZE
    pub const PLAYER_START_X: f32 = 375.0;
    /// The ship never leaves this row
    pub const PLAYER_Y: f32 = 500.0;
    /// Pixels per frame while a direction key is held
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_COLOR: &str = "#00ff88";
    pub const START_LIVES: u8 = 3;

    /// Enemy formation
    pub const ENEMY_SIZE: Vec2 = Vec2::new(40.0, 30.0);
    pub const FORMATION_COLS: usize = 8;
    pub const FORMATION_BASE_ROWS: u32 = 4;
    pub const FORMATION_SPACING: f32 = 60.0;
    pub const FORMATION_ORIGIN: Vec2 = Vec2::new(100.0, 50.0);
    pub const ENEMY_BASE_SPEED: f32 = 0.5;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.1;
    /// Vertical step the whole formation takes when it touches an edge
    pub const ENEMY_DROP_STEP: f32 = 20.0;
    /// Per-frame chance that one enemy fires, multiplied by level
    pub const ENEMY_FIRE_CHANCE: f32 = 0.01;

    /// Bullets
    pub const BULLET_SIZE: Vec2 = Vec2::new(4.0, 10.0);
    /// Pixels per frame, upward
    pub const PLAYER_BULLET_SPEED: f32 = 8.0;
    /// Pixels per frame, downward
    pub const ENEMY_BULLET_SPEED: f32 = 3.0;
    /// Minimum wall-clock gap between player shots
    pub const FIRE_COOLDOWN_MS: f64 = 300.0;
    pub const PLAYER_BULLET_COLOR: &str = "#00ff88";
    pub const ENEMY_BULLET_COLOR: &str = "#ff0080";

    /// Particles
    pub const EXPLOSION_PARTICLES: usize = 15;
    pub const PARTICLE_DECAY: f32 = 0.95;
    pub const PARTICLE_MIN_OPACITY: f32 = 0.01;
    pub const PARTICLE_SIZE: f32 = 3.0;
    pub const PLAYER_HIT_COLOR: &str = "#ff0000";

    /// Score per enemy, multiplied by level
    pub const POINTS_PER_KILL: u32 = 10;
}
