//! `wasm-bindgen` entry points. One game lives behind a process-wide lock; all
//! rules are delegated to [`GameInstance`].

use std::sync::Mutex;

use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use crate::ai::search::SearchConfig;
use crate::error::GameError;
use crate::game::GameInstance;
use crate::types::{GameResult, GameSnapshot, MoveList, Position};

static GAME: Lazy<Mutex<GameInstance>> = Lazy::new(|| Mutex::new(GameInstance::default()));

fn with_game<T>(f: impl FnOnce(&mut GameInstance) -> T) -> Result<T, GameError> {
    let mut game = GAME.lock().map_err(|_| GameError::StatePoisoned)?;
    Ok(f(&mut game))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn game_err(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// `undefined`/`null` select the defaults; objects may omit fields.
fn read_config(config: JsValue) -> Result<SearchConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        Ok(SearchConfig::default())
    } else {
        Ok(serde_wasm_bindgen::from_value(config)?)
    }
}

fn init_snapshot() -> Result<GameSnapshot, GameError> {
    with_game(|game| {
        game.init();
        game.snapshot()
    })
}

fn start_snapshot(config: SearchConfig) -> Result<GameSnapshot, GameError> {
    with_game(|game| {
        *game = GameInstance::with_search_config(config);
        game.start();
        game.snapshot()
    })
}

fn place_snapshot(pos: Position) -> Result<GameSnapshot, GameError> {
    with_game(|game| game.place(pos).map(|()| game.snapshot()))?
}

fn ai_move_snapshot() -> Result<GameSnapshot, GameError> {
    with_game(|game| game.do_ai_move().map(|()| game.snapshot()))?
}

fn legal_moves() -> Result<MoveList, GameError> {
    with_game(|game| game.legal_moves())
}

fn current_snapshot() -> Result<GameSnapshot, GameError> {
    with_game(|game| game.snapshot())
}

fn current_result() -> Result<GameResult, GameError> {
    with_game(|game| game.result())
}

/// Clears the board; no game in progress afterwards.
#[wasm_bindgen]
pub fn init_game() -> Result<JsValue, JsValue> {
    to_js(&init_snapshot().map_err(game_err)?)
}

/// Starts a new game. `config` may be `undefined` or a partial
/// `{ max_depth, node_budget }` object.
#[wasm_bindgen]
pub fn start_game(config: JsValue) -> Result<JsValue, JsValue> {
    let config = read_config(config)?;
    to_js(&start_snapshot(config).map_err(game_err)?)
}

#[wasm_bindgen]
pub fn get_state() -> Result<JsValue, JsValue> {
    to_js(&current_snapshot().map_err(game_err)?)
}

#[wasm_bindgen]
pub fn get_legal_moves() -> Result<JsValue, JsValue> {
    to_js(&legal_moves().map_err(game_err)?)
}

/// Human move at `(col, row)`.
#[wasm_bindgen]
pub fn place(col: i8, row: i8) -> Result<JsValue, JsValue> {
    to_js(&place_snapshot(Position::new(col, row)).map_err(game_err)?)
}

/// Lets the search engine play the automated seat. Blocks until it is done.
#[wasm_bindgen]
pub fn do_ai_move() -> Result<JsValue, JsValue> {
    to_js(&ai_move_snapshot().map_err(game_err)?)
}

#[wasm_bindgen]
pub fn get_result() -> Result<JsValue, JsValue> {
    to_js(&current_result().map_err(game_err)?)
}
