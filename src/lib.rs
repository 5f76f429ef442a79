use wasm_bindgen::prelude::*;

pub mod ai;
pub mod api;
pub mod board;
pub mod clock;
pub mod error;
pub mod game;
pub mod types;

pub use ai::search::{SearchConfig, Searcher};
pub use board::{Board, GameState, is_position_valid};
pub use error::GameError;
pub use game::GameInstance;
pub use types::{MoveList, Piece, Player, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
