//! Session lifecycle and the game-active observer
//!
//! The engine owns one `GameState` and drives it through the lifecycle
//! operations. The only outward coupling is `GameActiveListener`: a one-way
//! notification the host page uses to arm/disarm its hidden key-sequence
//! listener. The engine never reads anything back.

use std::rc::Rc;

use crate::consts::PLAYER_START_X;
use crate::sim::{self, FrameInput, GamePhase, GameState};

/// Receiver for the external active flag. Notified on start, pause, resume,
/// stop, and on every terminal condition.
pub trait GameActiveListener {
    fn set_game_active(&self, active: bool);
}

pub struct Engine {
    pub state: GameState,
    listener: Option<Rc<dyn GameActiveListener>>,
}

impl Engine {
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(seed),
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: Rc<dyn GameActiveListener>) {
        self.listener = Some(listener);
    }

    /// Begin a fresh session: counters and collections reset, initial
    /// formation spawned, active flag armed. The ship keeps its position
    /// across starts; only `reset` re-centers it. Safe to call while a
    /// session is running, but the caller owns the frame scheduling and
    /// must withdraw any pending frame callback before re-arming.
    pub fn start(&mut self, seed: u64) {
        let ship_x = self.state.player.pos.x;
        self.state = GameState::new(seed);
        self.state.player.pos.x = ship_x;
        sim::spawn_formation(&mut self.state);
        self.state.phase = GamePhase::Running;
        log::info!("session started (seed {seed})");
        self.notify(true);
    }

    /// Freeze the session without touching counters or collections.
    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Paused;
            log::info!("session paused");
            self.notify(false);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Running;
            log::info!("session resumed");
            self.notify(true);
        }
    }

    /// Terminal variant of pause, used at teardown. Counters survive; the
    /// active flag is always dropped.
    pub fn stop(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Paused;
        }
        self.notify(false);
    }

    /// Stop, then restore session defaults: score 0, lives 3, level 1,
    /// empty collections, ship re-centered. Does not restart the loop.
    pub fn reset(&mut self) {
        self.stop();
        let seed = self.state.seed;
        self.state = GameState::new(seed);
        debug_assert_eq!(self.state.player.pos.x, PLAYER_START_X);
    }

    /// Run one simulation frame. A tick that crosses into the terminal
    /// phase drops the active flag exactly once.
    pub fn frame(&mut self, input: &FrameInput) {
        let was_over = self.state.is_over();
        sim::tick(&mut self.state, input);
        if self.state.is_over() && !was_over {
            log::info!(
                "game over at level {} with score {}",
                self.state.level,
                self.state.score
            );
            self.notify(false);
        }
    }

    fn notify(&self, active: bool) {
        if let Some(listener) = &self.listener {
            listener.set_game_active(active);
        }
    }
}
