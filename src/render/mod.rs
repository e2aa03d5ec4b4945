//! Canvas 2D rendering
//!
//! Draws a frame straight from `GameState`; holds the 2D context and
//! nothing else. All coordinates are in the 800×600 logical space.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::{BulletKind, GameState};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Take over the canvas and pin it to the logical resolution.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(SURFACE_WIDTH as u32);
        canvas.set_height(SURFACE_HEIGHT as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { ctx })
    }

    /// Clear, then draw player, enemies, bullets, particles, in that order.
    pub fn draw(&self, state: &GameState) {
        self.ctx.set_fill_style_str(BACKGROUND_COLOR);
        self.ctx
            .fill_rect(0.0, 0.0, SURFACE_WIDTH as f64, SURFACE_HEIGHT as f64);

        self.draw_player(state);
        self.draw_enemies(state);
        self.draw_bullets(state);
        self.draw_particles(state);
    }

    fn draw_player(&self, state: &GameState) {
        let p = state.player.pos;
        self.ctx.set_fill_style_str(PLAYER_COLOR);
        self.rect(p.x, p.y, PLAYER_SIZE.x, PLAYER_SIZE.y);
        // Cockpit and wing strip
        self.rect(p.x + 20.0, p.y - 10.0, 10.0, 10.0);
        self.rect(p.x + 10.0, p.y + 10.0, 30.0, 10.0);
    }

    fn draw_enemies(&self, state: &GameState) {
        for enemy in &state.enemies {
            let e = enemy.pos;
            self.ctx.set_fill_style_str(enemy.color);
            self.rect(e.x, e.y, ENEMY_SIZE.x, ENEMY_SIZE.y);
            // Bug-like legs and eyes
            self.rect(e.x - 5.0, e.y + 5.0, 5.0, 20.0);
            self.rect(e.x + ENEMY_SIZE.x, e.y + 5.0, 5.0, 20.0);
            self.rect(e.x + 10.0, e.y + 10.0, 5.0, 5.0);
            self.rect(e.x + 25.0, e.y + 10.0, 5.0, 5.0);
        }
    }

    fn draw_bullets(&self, state: &GameState) {
        for bullet in &state.bullets {
            let color = match bullet.kind {
                BulletKind::Player => PLAYER_BULLET_COLOR,
                BulletKind::Enemy => ENEMY_BULLET_COLOR,
            };
            self.ctx.set_fill_style_str(color);
            self.rect(bullet.pos.x, bullet.pos.y, BULLET_SIZE.x, BULLET_SIZE.y);

            // Second pass with a shadow for the glow
            self.ctx.set_shadow_blur(10.0);
            self.ctx.set_shadow_color(color);
            self.rect(bullet.pos.x, bullet.pos.y, BULLET_SIZE.x, BULLET_SIZE.y);
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn draw_particles(&self, state: &GameState) {
        for particle in &state.particles {
            self.ctx.set_global_alpha(particle.opacity as f64);
            self.ctx.set_fill_style_str(particle.color);
            self.rect(particle.pos.x, particle.pos.y, PARTICLE_SIZE, PARTICLE_SIZE);
        }
        self.ctx.set_global_alpha(1.0);
    }

    #[inline]
    fn rect(&self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }
}
