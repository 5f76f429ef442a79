use crate::types::{BOARD_SIZE, MoveList, NUM_SQUARES, Piece, Player, Position};

/// Ray directions as `(dcol, drow)`: N, S, E, W and the four diagonals.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (-1, -1),
    (1, 1),
    (-1, 1),
];

/// True iff both coordinates are within board bounds.
pub fn is_position_valid(pos: Position) -> bool {
    pos.is_valid()
}

/// 8x8 grid of cells stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Piece; NUM_SQUARES],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [Piece::Empty; NUM_SQUARES],
        }
    }

    /// Creates the starting board:
    /// d4=light, e4=dark, d5=dark, e5=light.
    pub fn starting() -> Self {
        let mid = (BOARD_SIZE / 2) as i8;
        let mut board = Self::empty();
        board.set(Position::new(mid - 1, mid - 1), Piece::Light);
        board.set(Position::new(mid, mid - 1), Piece::Dark);
        board.set(Position::new(mid, mid), Piece::Light);
        board.set(Position::new(mid - 1, mid), Piece::Dark);
        board
    }

    /// Caller must pass a valid position.
    pub fn get(&self, pos: Position) -> Piece {
        self.cells[pos.index()]
    }

    /// Caller must pass a valid position.
    pub fn set(&mut self, pos: Position, piece: Piece) {
        self.cells[pos.index()] = piece;
    }

    pub fn count(&self, piece: Piece) -> u8 {
        self.cells.iter().filter(|&&cell| cell == piece).count() as u8
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Piece::Empty)
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=dark, 2=light.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        self.cells.map(Piece::to_u8)
    }

    /// Whether `player` placing at `pos` would capture along at least one ray.
    fn captures_any(&self, pos: Position, player: Player) -> bool {
        if self.get(pos) != Piece::Empty {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&dir| self.ray_flips(pos, dir, player) != 0)
    }

    /// Pieces captured by `player` placing at `pos`, as a square-index mask.
    fn collect_flips(&self, pos: Position, player: Player) -> u64 {
        DIRECTIONS
            .iter()
            .fold(0u64, |flips, &dir| flips | self.ray_flips(pos, dir, player))
    }

    /// Walks one ray from `pos`. Returns the opponent run if it is closed by
    /// one of `player`'s pieces, otherwise 0.
    fn ray_flips(&self, pos: Position, dir: (i8, i8), player: Player) -> u64 {
        let me = player.piece();
        let opp = player.opponent().piece();

        let mut cursor = pos.step(dir);
        let mut line = 0u64;

        while cursor.is_valid() {
            let cell = self.get(cursor);
            if cell == opp {
                line |= 1u64 << cursor.index();
            } else if cell == me {
                return line;
            } else {
                return 0;
            }
            cursor = cursor.step(dir);
        }

        0
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

/// Board, side to move and the terminal flag. Plain value type: copies share
/// nothing, so simulated lines never touch the caller's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    terminal: bool,
}

impl GameState {
    /// Starting position, dark to move.
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            current_player: Player::Dark,
            terminal: false,
        }
    }

    /// Empty board with no game in progress.
    pub fn empty() -> Self {
        Self {
            board: Board::empty(),
            current_player: Player::Dark,
            terminal: true,
        }
    }

    /// Arbitrary position with `player` to move. The terminal flag is derived
    /// from the board.
    pub fn from_board(board: Board, player: Player) -> Self {
        let mut state = Self {
            board,
            current_player: player,
            terminal: false,
        };
        state.terminal = state.both_blocked();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn piece_at(&self, pos: Position) -> Piece {
        self.board.get(pos)
    }

    /// Raw cell write. The terminal flag is re-derived from the new board.
    pub fn set_piece(&mut self, pos: Position, piece: Piece) {
        self.board.set(pos, piece);
        self.terminal = self.both_blocked();
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        self.legal_moves_for(self.current_player)
    }

    pub fn legal_moves_for(&self, player: Player) -> MoveList {
        (0..NUM_SQUARES)
            .map(Position::from_index)
            .filter(|&pos| self.board.captures_any(pos, player))
            .collect()
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        (0..NUM_SQUARES)
            .map(Position::from_index)
            .any(|pos| self.board.captures_any(pos, player))
    }

    /// Places the mover's piece at `pos`, flips captured pieces and hands the
    /// turn over. If the opponent cannot reply the mover keeps the turn; if
    /// neither side can move the state becomes terminal.
    ///
    /// `pos` must come from [`GameState::legal_moves`]; legality is not
    /// rechecked. Returns the captured squares as an index mask.
    pub fn apply_move(&mut self, pos: Position) -> u64 {
        let mover = self.current_player;
        let flips = self.board.collect_flips(pos, mover);
        debug_assert!(flips != 0, "apply_move called with non-capturing {pos:?}");

        self.board.set(pos, mover.piece());
        let mut bits = flips;
        while bits != 0 {
            let idx = bits.trailing_zeros() as usize;
            self.board.set(Position::from_index(idx), mover.piece());
            bits &= bits - 1;
        }

        self.current_player = mover.opponent();
        if !self.has_legal_move(self.current_player) {
            self.current_player = mover;
            if !self.has_legal_move(mover) {
                self.terminal = true;
            }
        }

        flips
    }

    /// Hands the move to the opponent without placing a piece.
    pub fn pass_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Board full, or neither side has a legal move.
    pub fn is_terminal(&self) -> bool {
        self.terminal || self.board.is_full()
    }

    /// Number of `player`'s pieces on the board.
    pub fn score(&self, player: Player) -> u8 {
        self.board.count(player.piece())
    }

    /// `player`'s pieces minus the opponent's.
    pub fn score_differential(&self, player: Player) -> i32 {
        self.score(player) as i32 - self.score(player.opponent()) as i32
    }

    fn both_blocked(&self) -> bool {
        !self.has_legal_move(Player::Dark) && !self.has_legal_move(Player::Light)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
