use log::debug;

use crate::ai::search::{SearchConfig, Searcher};
use crate::board::GameState;
use crate::clock::PlayerClock;
use crate::error::GameError;
use crate::types::{GameResult, GameSnapshot, MoveList, Player, Position};

/// Seat controlled by the host's input handling.
pub const HUMAN_PLAYER: Player = Player::Dark;
/// Seat controlled by the move selector.
pub const AI_PLAYER: Player = Player::Light;

pub trait MoveSelector: Send + Sync {
    fn select_move(&self, state: &GameState) -> Option<Position>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&self, state: &GameState) -> Option<Position> {
        state.legal_moves().first().copied()
    }
}

/// The authoritative game a host drives: one human seat, one automated seat
/// and the players' clocks.
pub struct GameInstance {
    state: GameState,
    clock: PlayerClock,
    pub is_pass: bool,
    pub flipped: Vec<u8>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    /// Creates an instance with no game in progress; call [`GameInstance::start`].
    pub fn new(selector: Box<dyn MoveSelector>) -> Self {
        Self {
            state: GameState::empty(),
            clock: PlayerClock::new(),
            is_pass: false,
            flipped: Vec::new(),
            selector,
        }
    }

    pub fn with_search_config(config: SearchConfig) -> Self {
        Self::new(Box::new(Searcher::new(config)))
    }

    /// Clears the board and ends any game in progress.
    pub fn init(&mut self) {
        self.state = GameState::empty();
        self.clock.start();
        self.is_pass = false;
        self.flipped.clear();
    }

    /// Starting position, dark to move, clocks zeroed.
    pub fn start(&mut self) {
        self.state = GameState::new();
        self.clock.start();
        self.is_pass = false;
        self.flipped.clear();
        debug!("game started");
    }

    pub fn set_selector(&mut self, selector: Box<dyn MoveSelector>) {
        self.selector = selector;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn place(&mut self, pos: Position) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if self.current_player() != HUMAN_PLAYER {
            return Err(GameError::NotYourTurn("the player"));
        }
        if !pos.is_valid() {
            return Err(GameError::InvalidPosition(pos));
        }

        self.apply_move(pos)
    }

    pub fn do_ai_move(&mut self) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if self.current_player() != AI_PLAYER {
            return Err(GameError::NotYourTurn("the AI"));
        }
        if self.state.legal_moves().is_empty() {
            return Err(GameError::NoLegalMoves);
        }

        let selected = self
            .selector
            .select_move(&self.state)
            .ok_or(GameError::NoSelection)?;

        if !selected.is_valid() {
            return Err(GameError::InvalidPosition(selected));
        }

        self.apply_move(selected)
    }

    pub fn legal_moves(&self) -> MoveList {
        self.state.legal_moves()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let running = !self.is_game_over();
        let to_move = self.current_player();
        GameSnapshot {
            board: self.state.board().to_array().to_vec(),
            current_player: to_move.to_u8(),
            dark_count: self.state.score(Player::Dark),
            light_count: self.state.score(Player::Light),
            is_game_over: self.is_game_over(),
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
            dark_time_ms: self.clock.elapsed(Player::Dark, to_move, running).as_millis() as u64,
            light_time_ms: self.clock.elapsed(Player::Light, to_move, running).as_millis() as u64,
        }
    }

    pub fn result(&self) -> GameResult {
        let dark_count = self.state.score(Player::Dark);
        let light_count = self.state.score(Player::Light);
        GameResult {
            winner: if dark_count > light_count {
                Player::Dark.to_u8()
            } else if light_count > dark_count {
                Player::Light.to_u8()
            } else {
                0
            },
            dark_count,
            light_count,
        }
    }

    fn apply_move(&mut self, pos: Position) -> Result<(), GameError> {
        if !self.state.legal_moves().contains(&pos) {
            return Err(GameError::IllegalMove(pos));
        }

        let mover = self.current_player();
        let flips = self.state.apply_move(pos);
        self.clock.end_turn(mover);

        self.flipped = bitmask_to_indices(flips);
        self.is_pass = !self.is_game_over() && self.current_player() == mover;

        debug!(
            "{mover:?} played {pos:?}, flipped {}{}",
            self.flipped.len(),
            if self.is_game_over() { ", game over" } else { "" }
        );

        Ok(())
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
        self.is_pass = false;
        self.flipped.clear();
    }
}

impl Default for GameInstance {
    fn default() -> Self {
        Self::with_search_config(SearchConfig::default())
    }
}

fn bitmask_to_indices(mask: u64) -> Vec<u8> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        let idx = bits.trailing_zeros() as u8;
        out.push(idx);
        bits &= bits - 1;
    }

    out
}
