use web_time::{Duration, Instant};

use crate::types::Player;

/// Per-player thinking time. The running turn is charged on `end_turn`.
#[derive(Debug, Clone, Copy)]
pub struct PlayerClock {
    spent: [Duration; 2],
    turn_started: Instant,
}

impl PlayerClock {
    pub fn new() -> Self {
        Self {
            spent: [Duration::ZERO; 2],
            turn_started: Instant::now(),
        }
    }

    /// Zeroes both players and restarts the turn timer.
    pub fn start(&mut self) {
        self.spent = [Duration::ZERO; 2];
        self.turn_started = Instant::now();
    }

    /// Charges the time since the turn started to `player`.
    pub fn end_turn(&mut self, player: Player) {
        let now = Instant::now();
        self.spent[player.index()] += now.saturating_duration_since(self.turn_started);
        self.turn_started = now;
    }

    /// Accumulated time for `player`, plus the running turn when `player` is
    /// to move and the clock is live.
    pub fn elapsed(&self, player: Player, to_move: Player, running: bool) -> Duration {
        let mut total = self.spent[player.index()];
        if running && player == to_move {
            total += self.turn_started.elapsed();
        }
        total
    }
}

impl Default for PlayerClock {
    fn default() -> Self {
        Self::new()
    }
}
