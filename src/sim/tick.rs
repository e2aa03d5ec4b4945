//! Per-frame simulation update
//!
//! One call per rendering frame while the session runs. Speeds are in
//! pixels per frame; the only wall-clock element is the fire cooldown.

use glam::Vec2;
use rand::Rng;

use super::collision::rects_overlap;
use super::state::{Bullet, BulletKind, Enemy, GamePhase, GameState, Particle};
use crate::consts::*;

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Held direction keys
    pub left: bool,
    pub right: bool,
    /// Edge-triggered fire; set on keydown, cleared after the frame
    pub fire: bool,
    /// Wall-clock time in milliseconds, used only for the fire cooldown
    pub now_ms: f64,
}

/// Advance the session by one frame. No-op outside the Running phase; a
/// terminal transition mid-frame still lets the rest of the frame finish.
pub fn tick(state: &mut GameState, input: &FrameInput) {
    if state.phase != GamePhase::Running {
        return;
    }

    update_player(state, input);
    if input.fire {
        try_fire(state, input.now_ms);
    }
    update_enemies(state);
    update_bullets(state);
    update_particles(state);

    // Formation cleared: next, denser wave
    if state.enemies.is_empty() && state.phase == GamePhase::Running {
        state.level += 1;
        spawn_formation(state);
    }
}

/// Populate the enemy grid for the current level: `4 + level/2` rows of 8,
/// tier colors by row, speed scaled by level.
pub fn spawn_formation(state: &mut GameState) {
    let rows = FORMATION_BASE_ROWS + state.level / 2;
    let speed = ENEMY_BASE_SPEED + state.level as f32 * ENEMY_SPEED_PER_LEVEL;

    for row in 0..rows {
        for col in 0..FORMATION_COLS {
            state.enemies.push(Enemy {
                pos: FORMATION_ORIGIN
                    + Vec2::new(
                        col as f32 * FORMATION_SPACING,
                        row as f32 * FORMATION_SPACING,
                    ),
                speed,
                color: row_tier_color(row),
            });
        }
    }
}

fn row_tier_color(row: u32) -> &'static str {
    match row {
        0 => "#ff0080",
        1 => "#ff8800",
        _ => "#00ff88",
    }
}

fn update_player(state: &mut GameState, input: &FrameInput) {
    if input.left {
        state.player.pos.x -= PLAYER_SPEED;
    }
    if input.right {
        state.player.pos.x += PLAYER_SPEED;
    }
    state.player.pos.x = state.player.pos.x.clamp(0.0, SURFACE_WIDTH - PLAYER_SIZE.x);
}

fn try_fire(state: &mut GameState, now_ms: f64) {
    if now_ms - state.last_shot_ms < FIRE_COOLDOWN_MS {
        return;
    }
    state.bullets.push(Bullet {
        pos: state.player.muzzle(),
        kind: BulletKind::Player,
    });
    state.last_shot_ms = now_ms;
}

fn update_enemies(state: &mut GameState) {
    let mut hit_edge = false;
    let mut reached_ship = false;

    for enemy in &mut state.enemies {
        enemy.pos.x += state.enemy_direction * enemy.speed;
        if enemy.pos.x <= 0.0 || enemy.pos.x >= SURFACE_WIDTH - ENEMY_SIZE.x {
            hit_edge = true;
        }
        if enemy.pos.y + ENEMY_SIZE.y >= state.player.pos.y {
            reached_ship = true;
        }
    }

    // The formation crossed the ship's row; the loss takes effect now,
    // the rest of the frame still completes.
    if reached_ship {
        state.phase = GamePhase::Over;
    }

    // Formation-wide reaction: one sign flip and a 20-unit drop together,
    // in the frame the edge was detected.
    if hit_edge {
        state.enemy_direction = -state.enemy_direction;
        for enemy in &mut state.enemies {
            enemy.pos.y += ENEMY_DROP_STEP;
        }
    }

    // Random return fire, evaluated once per frame
    if !state.enemies.is_empty()
        && state.rng.random::<f32>() < ENEMY_FIRE_CHANCE * state.level as f32
    {
        let shooter_idx = state.rng.random_range(0..state.enemies.len());
        let shooter = state.enemies[shooter_idx];
        state.bullets.push(Bullet {
            pos: Vec2::new(
                shooter.pos.x + ENEMY_SIZE.x / 2.0 - BULLET_SIZE.x / 2.0,
                shooter.pos.y + ENEMY_SIZE.y,
            ),
            kind: BulletKind::Enemy,
        });
    }
}

fn update_bullets(state: &mut GameState) {
    // Reverse-index walk so removal doesn't skip the next bullet
    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;

        let kind = state.bullets[i].kind;
        state.bullets[i].pos.y += kind.velocity_y();

        let pos = state.bullets[i].pos;
        if pos.y < 0.0 || pos.y > SURFACE_HEIGHT {
            state.bullets.remove(i);
            continue;
        }

        match kind {
            BulletKind::Player => {
                let hit = state
                    .enemies
                    .iter()
                    .position(|e| rects_overlap(pos, BULLET_SIZE, e.pos, ENEMY_SIZE));
                if let Some(j) = hit {
                    let center = state.enemies[j].center();
                    let color = state.enemies[j].color;
                    state.enemies.remove(j);
                    state.bullets.remove(i);
                    state.score += POINTS_PER_KILL * state.level;
                    spawn_explosion(state, center, color);
                }
            }
            BulletKind::Enemy => {
                if rects_overlap(pos, BULLET_SIZE, state.player.pos, PLAYER_SIZE) {
                    state.bullets.remove(i);
                    state.lives = state.lives.saturating_sub(1);
                    let center = state.player.pos + PLAYER_SIZE / 2.0;
                    spawn_explosion(state, center, PLAYER_HIT_COLOR);
                    if state.lives == 0 {
                        state.phase = GamePhase::Over;
                    }
                }
            }
        }
    }
}

fn spawn_explosion(state: &mut GameState, center: Vec2, color: &'static str) {
    for _ in 0..EXPLOSION_PARTICLES {
        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let speed = state.rng.random::<f32>() * 3.0 + 1.0;
        state.particles.push(Particle {
            pos: center,
            angle,
            speed,
            opacity: 1.0,
            color,
        });
    }
}

fn update_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos.x += particle.speed * particle.angle.cos();
        particle.pos.y += particle.speed * particle.angle.sin();
        particle.opacity *= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.opacity >= PARTICLE_MIN_OPACITY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        spawn_formation(&mut state);
        state.phase = GamePhase::Running;
        state
    }

    fn player_bullets(state: &GameState) -> usize {
        state
            .bullets
            .iter()
            .filter(|b| b.kind == BulletKind::Player)
            .count()
    }

    #[test]
    fn level_one_formation_is_4x8_with_tier_colors() {
        let state = running_state(1);
        assert_eq!(state.enemies.len(), 32);
        assert_eq!(state.enemies[0].color, "#ff0080");
        assert_eq!(state.enemies[8].color, "#ff8800");
        assert_eq!(state.enemies[16].color, "#00ff88");
        assert_eq!(state.enemies[31].color, "#00ff88");
        for enemy in &state.enemies {
            assert!((enemy.speed - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn player_clamps_at_both_bounds() {
        let mut state = running_state(2);

        let left = FrameInput {
            left: true,
            ..FrameInput::default()
        };
        for _ in 0..300 {
            update_player(&mut state, &left);
            assert!(state.player.pos.x >= 0.0);
        }
        assert_eq!(state.player.pos.x, 0.0);

        let right = FrameInput {
            right: true,
            ..FrameInput::default()
        };
        for _ in 0..300 {
            update_player(&mut state, &right);
            assert!(state.player.pos.x <= SURFACE_WIDTH - PLAYER_SIZE.x);
        }
        assert_eq!(state.player.pos.x, SURFACE_WIDTH - PLAYER_SIZE.x);
    }

    #[test]
    fn edge_contact_flips_direction_once_and_drops_20() {
        let mut state = running_state(3);
        state.enemies.clear();
        // Two enemies crossing the right bound in the same frame must still
        // produce a single flip and a single drop
        for x in [750.0, 755.0] {
            state.enemies.push(Enemy {
                pos: Vec2::new(x, 100.0),
                speed: 15.0,
                color: "#00ff88",
            });
        }
        state.enemy_direction = 1.0;

        update_enemies(&mut state);

        assert_eq!(state.enemy_direction, -1.0);
        for enemy in &state.enemies {
            assert_eq!(enemy.pos.y, 120.0);
        }
    }

    #[test]
    fn player_bullet_kill_awards_ten_times_level() {
        let mut state = running_state(4);
        state.enemies.clear();
        state.level = 3;
        state.enemies.push(Enemy {
            pos: Vec2::new(200.0, 200.0),
            speed: 0.0,
            color: "#ff8800",
        });
        // Bullet one step above the enemy so this frame's motion lands inside
        state.bullets.push(Bullet {
            pos: Vec2::new(210.0, 215.0 + PLAYER_BULLET_SPEED),
            kind: BulletKind::Player,
        });

        update_bullets(&mut state);

        assert_eq!(state.score, 30);
        assert!(state.enemies.is_empty());
        assert_eq!(player_bullets(&state), 0);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(state.particles.iter().all(|p| p.color == "#ff8800"));
    }

    #[test]
    fn enemy_bullet_hit_decrements_lives() {
        let mut state = running_state(5);
        state.bullets.push(Bullet {
            pos: state.player.pos + Vec2::new(10.0, 5.0 - ENEMY_BULLET_SPEED),
            kind: BulletKind::Enemy,
        });

        update_bullets(&mut state);

        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(state.particles.iter().all(|p| p.color == PLAYER_HIT_COLOR));
    }

    #[test]
    fn last_life_ends_session_in_same_update() {
        let mut state = running_state(6);
        state.lives = 1;
        state.bullets.push(Bullet {
            pos: state.player.pos + Vec2::new(10.0, 5.0 - ENEMY_BULLET_SPEED),
            kind: BulletKind::Enemy,
        });

        update_bullets(&mut state);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn particles_die_on_the_90th_decay_frame() {
        // 0.95^89 ≈ 0.0104 survives the cutoff, 0.95^90 ≈ 0.0099 does not
        let mut state = running_state(7);
        spawn_explosion(&mut state, Vec2::new(400.0, 300.0), "#ff0080");

        for _ in 0..89 {
            update_particles(&mut state);
        }
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);

        update_particles(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn clearing_the_formation_levels_up_and_respawns_denser() {
        let mut state = running_state(8);
        state.enemies.clear();

        tick(&mut state, &FrameInput::default());

        assert_eq!(state.level, 2);
        // 4 + 2/2 = 5 rows of 8
        assert_eq!(state.enemies.len(), 40);
    }

    #[test]
    fn fire_cooldown_is_wall_clock() {
        let mut state = running_state(9);

        let fire_at = |state: &mut GameState, now_ms: f64| {
            tick(
                state,
                &FrameInput {
                    fire: true,
                    now_ms,
                    ..FrameInput::default()
                },
            );
        };

        fire_at(&mut state, 1000.0);
        assert_eq!(player_bullets(&state), 1);

        // 100 ms later: suppressed
        fire_at(&mut state, 1100.0);
        assert_eq!(player_bullets(&state), 1);

        // 350 ms after the first shot: allowed
        fire_at(&mut state, 1350.0);
        assert_eq!(player_bullets(&state), 2);
    }

    #[test]
    fn formation_reaching_ship_row_ends_session() {
        let mut state = running_state(10);
        state.enemies[0].pos.y = PLAYER_Y - ENEMY_SIZE.y;

        tick(&mut state, &FrameInput::default());

        assert!(state.is_over());
        assert!(!state.is_running());
    }

    #[test]
    fn paused_session_never_mutates() {
        let mut state = running_state(11);
        state.phase = GamePhase::Paused;
        let before_score = state.score;
        let before_enemies: Vec<f32> = state.enemies.iter().map(|e| e.pos.x).collect();

        tick(
            &mut state,
            &FrameInput {
                left: true,
                fire: true,
                now_ms: 5000.0,
                ..FrameInput::default()
            },
        );

        assert_eq!(state.score, before_score);
        assert!(state.bullets.is_empty());
        let after_enemies: Vec<f32> = state.enemies.iter().map(|e| e.pos.x).collect();
        assert_eq!(before_enemies, after_enemies);
    }

    proptest! {
        #[test]
        fn invariants_hold_under_arbitrary_input(
            seed in any::<u64>(),
            frames in proptest::collection::vec(any::<(bool, bool, bool)>(), 1..300),
        ) {
            let mut state = running_state(seed);
            let mut last_score = state.score;
            let mut last_lives = state.lives;

            for (i, (left, right, fire)) in frames.into_iter().enumerate() {
                let input = FrameInput {
                    left,
                    right,
                    fire,
                    now_ms: i as f64 * 16.7,
                };
                tick(&mut state, &input);

                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= SURFACE_WIDTH - PLAYER_SIZE.x);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.lives <= last_lives);
                last_score = state.score;
                last_lives = state.lives;
            }
        }
    }
}
