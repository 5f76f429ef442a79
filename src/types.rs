use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    #[default]
    Empty,
    Dark,
    Light,
}

impl Piece {
    /// Wire encoding used by snapshots: 0=empty, 1=dark, 2=light.
    pub fn to_u8(self) -> u8 {
        match self {
            Piece::Empty => 0,
            Piece::Dark => 1,
            Piece::Light => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Dark,
    Light,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }

    /// The piece this player places.
    pub fn piece(self) -> Piece {
        match self {
            Player::Dark => Piece::Dark,
            Player::Light => Piece::Light,
        }
    }

    pub fn to_u8(self) -> u8 {
        self.piece().to_u8()
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::Dark => 0,
            Player::Light => 1,
        }
    }
}

/// A board coordinate. Off-board values are representable so that rays can
/// walk past the edge; use [`Position::is_valid`] before touching a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub col: i8,
    pub row: i8,
}

impl Position {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// True iff both coordinates lie in `[0, BOARD_SIZE)`.
    pub fn is_valid(self) -> bool {
        (0..BOARD_SIZE as i8).contains(&self.col) && (0..BOARD_SIZE as i8).contains(&self.row)
    }

    /// Row-major square index (0..=63). Only meaningful for valid positions.
    pub fn index(self) -> usize {
        debug_assert!(self.is_valid(), "position off board: {self:?}");
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            col: (index % BOARD_SIZE) as i8,
            row: (index / BOARD_SIZE) as i8,
        }
    }

    pub(crate) fn step(self, (dc, dr): (i8, i8)) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

/// Legal moves in row-major scan order.
pub type MoveList = Vec<Position>;

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Row-major cells, 0=empty, 1=dark, 2=light.
    pub board: Vec<u8>,
    pub current_player: u8,
    pub dark_count: u8,
    pub light_count: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the last move left the opponent without a reply, so the
    ///   same player moves again.
    /// - `false` otherwise.
    pub is_pass: bool,
    /// Square indices (0..=63) captured by the last move.
    pub flipped: Vec<u8>,
    pub dark_time_ms: u64,
    pub light_time_ms: u64,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// 0 on a draw, otherwise the winner's player code.
    pub winner: u8,
    pub dark_count: u8,
    pub light_count: u8,
}
