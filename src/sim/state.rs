//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session started yet (or explicitly reset)
    Idle,
    /// Frame updates are being applied
    Running,
    /// Session frozen; counters and collections untouched
    Paused,
    /// Session ended in a loss; only reset leaves this phase
    Over,
}

/// The player's ship. Horizontal motion only; y is fixed at PLAYER_Y.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub pos: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_Y),
        }
    }
}

impl Player {
    /// Where player bullets leave the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + PLAYER_SIZE.x / 2.0 - BULLET_SIZE.x / 2.0,
            self.pos.y,
        )
    }
}

/// One formation member. The horizontal direction is shared by the whole
/// formation and lives on `GameState`, not here.
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub pos: Vec2,
    pub speed: f32,
    pub color: &'static str,
}

impl Enemy {
    pub fn center(&self) -> Vec2 {
        self.pos + ENEMY_SIZE / 2.0
    }
}

/// Who fired a bullet. The kind owns its directional speed; there is no
/// sign-of-speed trick anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Enemy,
}

impl BulletKind {
    /// Signed vertical velocity in pixels per frame (up is negative)
    pub fn velocity_y(self) -> f32 {
        match self {
            BulletKind::Player => -PLAYER_BULLET_SPEED,
            BulletKind::Enemy => ENEMY_BULLET_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub kind: BulletKind,
}

/// A short-lived explosion fragment. Not gameplay-affecting.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    /// Launch direction in radians
    pub angle: f32,
    /// Pixels per frame along `angle`
    pub speed: f32,
    /// 1.0 at spawn, multiplied by PARTICLE_DECAY each frame
    pub opacity: f32,
    pub color: &'static str,
}

/// Complete session state. Deterministic for a given seed and input stream.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Accumulated only, never decremented
    pub score: u32,
    /// Floors at 0; reaching 0 ends the session
    pub lives: u8,
    /// Starts at 1, bumps when the formation empties
    pub level: u32,
    pub phase: GamePhase,
    /// Shared formation direction, +1 right / -1 left
    pub enemy_direction: f32,
    /// Wall-clock timestamp (ms) of the last player shot
    pub last_shot_ms: f64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
}

impl GameState {
    /// Fresh session counters with empty collections. The caller decides
    /// when to spawn the first formation and flip the phase.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: START_LIVES,
            level: 1,
            phase: GamePhase::Idle,
            enemy_direction: 1.0,
            last_shot_ms: 0.0,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_matches_session_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.player.pos.x, PLAYER_START_X);
    }

    #[test]
    fn bullet_kind_owns_its_direction() {
        assert!(BulletKind::Player.velocity_y() < 0.0);
        assert!(BulletKind::Enemy.velocity_y() > 0.0);
    }

    #[test]
    fn same_seed_same_stream() {
        use rand::Rng;
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        for _ in 0..16 {
            assert_eq!(a.rng.random::<u32>(), b.rng.random::<u32>());
        }
    }
}
