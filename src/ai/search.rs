use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::GameState;
use crate::error::GameError;
use crate::game::MoveSelector;
use crate::types::{Player, Position};

pub const DEFAULT_MAX_DEPTH: u8 = 7;
pub const DEFAULT_NODE_BUDGET: u64 = 1_000_000;
const MIN_SCORE: i32 = i32::MIN;
const MAX_SCORE: i32 = i32::MAX;

/// Search limits. Missing fields fall back to the defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below each root move.
    pub max_depth: u8,
    /// Internal nodes expanded across one whole search before every further
    /// node degrades to a static evaluation.
    pub node_budget: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }
}

/// Node accounting shared by every branch of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchContext {
    nodes: u64,
    budget: u64,
}

impl SearchContext {
    pub fn new(budget: u64) -> Self {
        Self { nodes: 0, budget }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn exhausted(&self) -> bool {
        self.nodes >= self.budget
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Position,
    /// Piece differential for the side that moved, at the searched horizon.
    pub value: i32,
    pub nodes: u64,
}

/// Fixed-depth minimax with alpha-beta pruning and a global node budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Searches the best move for the side to move in `state`.
    /// Fails with [`GameError::NoLegalMoves`] when there is nothing to choose.
    pub fn search(&self, state: &GameState) -> Result<SearchOutcome, GameError> {
        let moves = state.legal_moves();
        let Some(&first) = moves.first() else {
            return Err(GameError::NoLegalMoves);
        };

        let perspective = state.current_player();
        let mut ctx = SearchContext::new(self.config.node_budget);
        let mut best_move = first;
        let mut best_value = MIN_SCORE;

        for mv in moves {
            let mut next = *state;
            next.apply_move(mv);
            let value = minimax(&next, self.config.max_depth, perspective, MIN_SCORE, MAX_SCORE, &mut ctx);
            trace!("root move {mv:?}: value {value}");

            // Strict comparison keeps the first move in scan order on ties.
            if value > best_value {
                best_value = value;
                best_move = mv;
            }
        }

        debug!(
            "search for {perspective:?}: best {best_move:?} value {best_value} nodes {}{}",
            ctx.nodes(),
            if ctx.exhausted() { " (budget exhausted)" } else { "" }
        );

        Ok(SearchOutcome {
            best_move,
            value: best_value,
            nodes: ctx.nodes(),
        })
    }

    pub fn select_best_move(&self, state: &GameState) -> Result<Position, GameError> {
        self.search(state).map(|outcome| outcome.best_move)
    }
}

impl MoveSelector for Searcher {
    fn select_move(&self, state: &GameState) -> Option<Position> {
        self.select_best_move(state).ok()
    }
}

/// Minimax value of `state` for `perspective`, searched `depth` plies deep.
///
/// Nodes where `perspective` is to move maximize, the others minimize. A side
/// without moves passes at the same depth. Once `ctx` runs out of budget every
/// remaining node returns its static evaluation.
pub fn minimax(
    state: &GameState,
    depth: u8,
    perspective: Player,
    mut alpha: i32,
    mut beta: i32,
    ctx: &mut SearchContext,
) -> i32 {
    if ctx.exhausted() || depth == 0 || state.is_terminal() {
        return static_evaluation(state, perspective);
    }

    let moves = state.legal_moves();
    if moves.is_empty() {
        let mut passed = *state;
        passed.pass_turn();
        if !passed.has_legal_move(passed.current_player()) {
            return static_evaluation(state, perspective);
        }
        return minimax(&passed, depth, perspective, alpha, beta, ctx);
    }

    ctx.nodes += 1;
    let maximizing = state.current_player() == perspective;

    if maximizing {
        let mut best = MIN_SCORE;
        for mv in moves {
            let mut next = *state;
            next.apply_move(mv);
            best = best.max(minimax(&next, depth - 1, perspective, alpha, beta, ctx));
            alpha = alpha.max(best);
            if beta <= alpha || ctx.exhausted() {
                break;
            }
        }
        best
    } else {
        let mut best = MAX_SCORE;
        for mv in moves {
            let mut next = *state;
            next.apply_move(mv);
            best = best.min(minimax(&next, depth - 1, perspective, alpha, beta, ctx));
            beta = beta.min(best);
            if beta <= alpha || ctx.exhausted() {
                break;
            }
        }
        best
    }
}

/// Piece-count differential from `player`'s point of view.
pub fn static_evaluation(state: &GameState, player: Player) -> i32 {
    state.score_differential(player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::types::{NUM_SQUARES, Piece};

    fn pos(col: i8, row: i8) -> Position {
        Position::new(col, row)
    }

    fn searcher(max_depth: u8) -> Searcher {
        Searcher::new(SearchConfig {
            max_depth,
            node_budget: DEFAULT_NODE_BUDGET,
        })
    }

    /// Minimax without pruning or budget, same pass and perspective rules.
    fn plain_minimax(state: &GameState, depth: u8, perspective: Player) -> i32 {
        if depth == 0 || state.is_terminal() {
            return static_evaluation(state, perspective);
        }
        let moves = state.legal_moves();
        if moves.is_empty() {
            let mut passed = *state;
            passed.pass_turn();
            if !passed.has_legal_move(passed.current_player()) {
                return static_evaluation(state, perspective);
            }
            return plain_minimax(&passed, depth, perspective);
        }
        let values = moves.into_iter().map(|mv| {
            let mut next = *state;
            next.apply_move(mv);
            plain_minimax(&next, depth - 1, perspective)
        });
        if state.current_player() == perspective {
            values.max().unwrap_or(MIN_SCORE)
        } else {
            values.min().unwrap_or(MAX_SCORE)
        }
    }

    /// Positions reached by a fixed playout, sampled at several plies.
    fn sample_positions() -> Vec<GameState> {
        let mut samples = vec![GameState::new()];
        let mut state = GameState::new();
        for ply in 0..NUM_SQUARES {
            if state.is_terminal() {
                break;
            }
            let moves = state.legal_moves();
            state.apply_move(moves[(ply * 5 + 1) % moves.len()]);
            if [6, 15, 30, 50].contains(&ply) {
                samples.push(state);
            }
        }
        samples
    }

    fn blocked_dark_fixture() -> GameState {
        let mut board = Board::empty();
        for idx in 0..NUM_SQUARES {
            board.set(Position::from_index(idx), Piece::Light);
        }
        board.set(pos(0, 0), Piece::Empty);
        board.set(pos(1, 0), Piece::Dark);
        GameState::from_board(board, Player::Dark)
    }

    #[test]
    fn static_evaluation_is_piece_differential() {
        let mut state = GameState::new();
        assert_eq!(static_evaluation(&state, Player::Dark), 0);

        state.apply_move(pos(3, 2));

        assert_eq!(static_evaluation(&state, Player::Dark), 3);
        assert_eq!(static_evaluation(&state, Player::Light), -3);
    }

    #[test]
    fn search_tie_breaks_to_first_move_in_scan_order() {
        // The four opening moves are symmetric, so they all score the same.
        let best = searcher(1).select_best_move(&GameState::new()).unwrap();
        assert_eq!(best, pos(3, 2));
    }

    #[test]
    fn depth_one_prefers_larger_capture() {
        let mut board = Board::empty();
        board.set(pos(1, 0), Piece::Light);
        board.set(pos(2, 0), Piece::Dark);
        board.set(pos(1, 6), Piece::Light);
        board.set(pos(2, 6), Piece::Light);
        board.set(pos(3, 6), Piece::Dark);
        let state = GameState::from_board(board, Player::Dark);
        assert_eq!(state.legal_moves(), vec![pos(0, 0), pos(0, 6)]);

        let outcome = searcher(1).search(&state).unwrap();

        // (0,0) lets light answer at (4,6) for -1; after (0,6) light's only
        // reply (3,0) leaves dark two ahead.
        assert_eq!(outcome.best_move, pos(0, 6));
        assert_eq!(outcome.value, 2);
    }

    #[test]
    fn depth_one_searches_one_reply_below_each_root_move() {
        let search = Searcher::new(SearchConfig {
            max_depth: 1,
            node_budget: u64::MAX,
        });

        let outcome = search.search(&GameState::new()).unwrap();

        // Each opening move is expanded once; every light reply flips one piece back.
        assert_eq!(outcome.nodes, 4);
        assert_eq!(outcome.value, 0);
    }

    #[test]
    fn selected_move_is_always_legal() {
        for state in sample_positions() {
            if state.is_terminal() {
                continue;
            }
            let best = searcher(3).select_best_move(&state).unwrap();
            assert!(state.legal_moves().contains(&best));
        }
    }

    #[test]
    fn search_leaves_caller_state_untouched() {
        let mut state = GameState::new();
        state.apply_move(pos(2, 3));
        let before = state;

        let _ = searcher(3).search(&state).unwrap();

        assert_eq!(state, before);
    }

    #[test]
    fn search_without_legal_moves_is_an_error() {
        let state = GameState::from_board(Board::empty(), Player::Dark);
        assert_eq!(
            searcher(3).select_best_move(&state),
            Err(GameError::NoLegalMoves)
        );
    }

    #[test]
    fn alpha_beta_matches_plain_minimax() {
        for (i, state) in sample_positions().into_iter().enumerate() {
            let max_depth = if i == 0 { 4 } else { 3 };
            for depth in 1..=max_depth {
                for perspective in [Player::Dark, Player::Light] {
                    let mut ctx = SearchContext::new(u64::MAX);
                    let pruned =
                        minimax(&state, depth, perspective, MIN_SCORE, MAX_SCORE, &mut ctx);
                    let plain = plain_minimax(&state, depth, perspective);
                    assert_eq!(
                        pruned, plain,
                        "sample {i}, depth {depth}, perspective {perspective:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn node_budget_of_one_stops_after_root() {
        let state = GameState::new();
        let mut ctx = SearchContext::new(1);

        let value = minimax(&state, DEFAULT_MAX_DEPTH, Player::Dark, MIN_SCORE, MAX_SCORE, &mut ctx);

        // Root expanded once, first child evaluated statically, rest skipped.
        assert_eq!(ctx.nodes(), 1);
        assert_eq!(value, 3);
    }

    #[test]
    fn zero_budget_returns_static_evaluation() {
        let mut state = GameState::new();
        state.apply_move(pos(3, 2));
        let mut ctx = SearchContext::new(0);

        let value = minimax(&state, DEFAULT_MAX_DEPTH, Player::Light, MIN_SCORE, MAX_SCORE, &mut ctx);

        assert_eq!(ctx.nodes(), 0);
        assert_eq!(value, -3);
    }

    #[test]
    fn budget_is_shared_across_root_moves() {
        let search = Searcher::new(SearchConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            node_budget: 5,
        });
        let state = GameState::new();

        let outcome = search.search(&state).unwrap();

        assert!(outcome.nodes <= 5);
        assert!(state.legal_moves().contains(&outcome.best_move));
    }

    #[test]
    fn blocked_side_passes_instead_of_stopping() {
        let state = blocked_dark_fixture();
        assert!(state.legal_moves().is_empty());
        assert!(!state.is_terminal());

        let mut ctx = SearchContext::new(u64::MAX);
        let value = minimax(&state, 1, Player::Dark, MIN_SCORE, MAX_SCORE, &mut ctx);

        // Light replies at (0,0) and takes the last dark piece.
        assert_eq!(value, -64);
        assert_eq!(ctx.nodes(), 1);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.node_budget, DEFAULT_NODE_BUDGET);
        assert_eq!(Searcher::default().config(), SearchConfig::default());
    }
}
