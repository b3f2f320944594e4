use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Board size constant
pub const BOARD_SIZE: usize = 8;

/// Number of men each side starts with
pub const PIECES_PER_SIDE: usize = 8;

/// The four diagonal directions, as (row, col) deltas
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Row delta of a quiet man step: Light plays up the board, Dark down
    pub fn forward(&self) -> i32 {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }

    /// Row on which a man of this color is crowned
    pub fn promotion_row(&self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => BOARD_SIZE - 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Light => write!(f, "Light"),
            Color::Dark => write!(f, "Dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub rank: Rank,
}

impl Piece {
    pub fn man(color: Color) -> Self {
        Piece {
            color,
            rank: Rank::Man,
        }
    }

    pub fn king(color: Color) -> Self {
        Piece {
            color,
            rank: Rank::King,
        }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Self {
        Square { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Offset by a (row, col) delta; None when the result leaves the board
    fn offset(&self, dr: i32, dc: i32) -> Option<Square> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col) {
            Some(Square::new(row as usize, col as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("square {0} is outside the board")]
    OutOfBounds(Square),
    #[error("no piece at {0}")]
    NoPiece(Square),
    #[error("piece at {0} does not belong to the side to move")]
    WrongOwner(Square),
    #[error("move {0} is not legal")]
    IllegalMove(Move),
    #[error("game already over")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Win(Color),
    /// The named side has no move available; its opponent wins
    Stalemate(Color),
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Ongoing => None,
            Outcome::Win(color) => Some(*color),
            Outcome::Stalemate(stuck) => Some(stuck.opponent()),
        }
    }

    pub fn is_over(&self) -> bool {
        *self != Outcome::Ongoing
    }
}

/// What a single applied move did, for callers that mirror the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Square>,
    pub promoted: bool,
    /// The same piece must capture again before the turn passes
    pub chain_continues: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    light_count: usize,
    dark_count: usize,
}

impl Board {
    fn empty() -> Self {
        Board {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
            light_count: 0,
            dark_count: 0,
        }
    }

    pub fn get(&self, square: Square) -> Result<Option<Piece>, GameError> {
        if square.in_bounds() {
            Ok(self.grid[square.row][square.col])
        } else {
            Err(GameError::OutOfBounds(square))
        }
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Result<(), GameError> {
        if square.in_bounds() {
            self.put(square, piece);
            Ok(())
        } else {
            Err(GameError::OutOfBounds(square))
        }
    }

    pub fn count(&self, color: Color) -> usize {
        match color {
            Color::Light => self.light_count,
            Color::Dark => self.dark_count,
        }
    }

    /// Unchecked read; callers pass squares already known to be on the board
    fn at(&self, square: Square) -> Option<Piece> {
        self.grid[square.row][square.col]
    }

    /// Unchecked write; keeps the per-color live counts in step
    fn put(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(old) = self.grid[square.row][square.col] {
            match old.color {
                Color::Light => self.light_count -= 1,
                Color::Dark => self.dark_count -= 1,
            }
        }
        if let Some(new) = piece {
            match new.color {
                Color::Light => self.light_count += 1,
                Color::Dark => self.dark_count += 1,
            }
        }
        self.grid[square.row][square.col] = piece;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    turn: Color,
    /// Set while a man's capture chain is in progress; gates kings and
    /// quiet moves until the turn passes
    turn_has_moved: bool,
    outcome: Outcome,
    move_count: usize,
}

impl GameState {
    /// Create a new game with the standard setup: eight men per side on
    /// the dark squares of the two back rows, Light to move
    pub fn new() -> Self {
        let mut state = GameState {
            board: Board::empty(),
            turn: Color::Light,
            turn_has_moved: false,
            outcome: Outcome::Ongoing,
            move_count: 0,
        };
        state.place_starting_men();
        state
    }

    fn place_starting_men(&mut self) {
        for row in 0..2 {
            for col in 0..BOARD_SIZE {
                if (row + col) % 2 == 1 {
                    self.board
                        .put(Square::new(row, col), Some(Piece::man(Color::Dark)));
                }
            }
        }
        for row in BOARD_SIZE - 2..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if (row + col) % 2 == 1 {
                    self.board
                        .put(Square::new(row, col), Some(Piece::man(Color::Light)));
                }
            }
        }
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn turn_has_moved(&self) -> bool {
        self.turn_has_moved
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn count(&self, color: Color) -> usize {
        self.board.count(color)
    }

    pub fn piece_at(&self, square: Square) -> Result<Option<Piece>, GameError> {
        self.board.get(square)
    }

    /// Every square the piece on `origin` may move to this turn.
    ///
    /// Capture is mandatory side-wide: while any piece of the side to
    /// move can capture, pieces without a capture get an empty set. A
    /// king also gets an empty set once its side has already acted this
    /// turn.
    pub fn legal_destinations(&self, origin: Square) -> Result<HashSet<Square>, GameError> {
        let piece = match self.board.get(origin)? {
            Some(piece) => piece,
            None => return Err(GameError::NoPiece(origin)),
        };
        if piece.color != self.turn {
            return Err(GameError::WrongOwner(origin));
        }
        if self.is_game_over() {
            return Ok(HashSet::new());
        }
        if piece.is_king() && self.turn_has_moved {
            return Ok(HashSet::new());
        }

        let forced = self.capture_origins();
        if !forced.is_empty() {
            if !forced.contains(&origin) {
                return Ok(HashSet::new());
            }
            return Ok(match piece.rank {
                Rank::Man => {
                    man_capture_landings(&self.board, piece.color, origin, &HashSet::new())
                }
                Rank::King => king_capture_landings(&self.board, piece.color, origin),
            });
        }

        if self.turn_has_moved {
            return Ok(HashSet::new());
        }
        Ok(self.quiet_destinations(origin, piece))
    }

    /// All legal moves for the side to move, under the same forced-capture
    /// precedence as `legal_destinations`
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let origin = Square::new(row, col);
                if !matches!(self.board.at(origin), Some(piece) if piece.color == self.turn) {
                    continue;
                }
                if let Ok(destinations) = self.legal_destinations(origin) {
                    moves.extend(destinations.into_iter().map(|to| Move::new(origin, to)));
                }
            }
        }
        moves
    }

    /// Squares of the side to move holding a piece with at least one capture
    fn capture_origins(&self) -> HashSet<Square> {
        let mut origins = HashSet::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let square = Square::new(row, col);
                let piece = match self.board.at(square) {
                    Some(piece) => piece,
                    None => continue,
                };
                if piece.color != self.turn {
                    continue;
                }
                // A king that has spent its single move cannot be forced
                if piece.is_king() && self.turn_has_moved {
                    continue;
                }
                if has_capture(&self.board, piece, square) {
                    origins.insert(square);
                }
            }
        }
        origins
    }

    fn quiet_destinations(&self, from: Square, piece: Piece) -> HashSet<Square> {
        let mut destinations = HashSet::new();
        match piece.rank {
            Rank::King => {
                for &(dr, dc) in &DIAGONALS {
                    let mut cursor = from;
                    while let Some(next) = cursor.offset(dr, dc) {
                        if self.board.at(next).is_some() {
                            break;
                        }
                        destinations.insert(next);
                        cursor = next;
                    }
                }
            }
            Rank::Man => {
                // Quiet steps are forward only; captures are not
                for dc in [-1, 1] {
                    if let Some(next) = from.offset(piece.color.forward(), dc) {
                        if self.board.at(next).is_none() {
                            destinations.insert(next);
                        }
                    }
                }
            }
        }
        destinations
    }

    /// Execute one move and report what changed.
    ///
    /// A capture removes the first occupied square on the line walked
    /// from origin to destination. A man that captures and can capture
    /// again keeps the turn; the report's `chain_continues` tells the
    /// caller to move the same piece again. Promotion and king moves
    /// always end the turn.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveReport, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if !mv.to.in_bounds() {
            return Err(GameError::OutOfBounds(mv.to));
        }
        let destinations = self.legal_destinations(mv.from)?;
        if !destinations.contains(&mv.to) {
            return Err(GameError::IllegalMove(mv));
        }
        let mut piece = match self.board.at(mv.from) {
            Some(piece) => piece,
            None => return Err(GameError::NoPiece(mv.from)),
        };
        let was_king = piece.is_king();

        let mut captured = None;
        if mv.from.row.abs_diff(mv.to.row) >= 2 || mv.from.col.abs_diff(mv.to.col) >= 2 {
            let dr = if mv.to.row > mv.from.row { 1 } else { -1 };
            let dc = if mv.to.col > mv.from.col { 1 } else { -1 };
            let mut cursor = mv.from;
            while cursor != mv.to {
                cursor = match cursor.offset(dr, dc) {
                    Some(next) => next,
                    None => break,
                };
                if self.board.at(cursor).is_some() {
                    self.board.put(cursor, None);
                    captured = Some(cursor);
                    break;
                }
            }
        }

        let mut promoted = false;
        if !was_king && mv.to.row == piece.color.promotion_row() {
            piece = Piece::king(piece.color);
            promoted = true;
        }
        self.board.put(mv.from, None);
        self.board.put(mv.to, Some(piece));
        self.move_count += 1;

        // Promotion ends the turn outright, even mid-chain; a king's
        // single move ends it too. Only a capturing man may continue.
        let mut chain_continues = false;
        if promoted || was_king || captured.is_none() {
            self.end_turn();
        } else if man_has_capture(&self.board, piece.color, mv.to) {
            self.turn_has_moved = true;
            chain_continues = true;
        } else {
            self.end_turn();
        }

        Ok(MoveReport {
            from: mv.from,
            to: mv.to,
            captured,
            promoted,
            chain_continues,
        })
    }

    fn end_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.turn_has_moved = false;
        self.outcome = self.evaluate();
    }

    /// Terminal-state check for the side to move: elimination first,
    /// then existence of any capture or quiet move
    fn evaluate(&self) -> Outcome {
        if self.board.count(Color::Light) == 0 {
            return Outcome::Win(Color::Dark);
        }
        if self.board.count(Color::Dark) == 0 {
            return Outcome::Win(Color::Light);
        }

        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let square = Square::new(row, col);
                let piece = match self.board.at(square) {
                    Some(piece) => piece,
                    None => continue,
                };
                if piece.color != self.turn {
                    continue;
                }
                if has_capture(&self.board, piece, square) {
                    return Outcome::Ongoing;
                }
                if !self.quiet_destinations(square, piece).is_empty() {
                    return Outcome::Ongoing;
                }
            }
        }
        Outcome::Stalemate(self.turn)
    }

    /// Get a string representation of the board
    pub fn display_board(&self) -> String {
        let mut result = String::new();
        result.push_str("   ");
        for col in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", col));
        }
        result.push('\n');

        for row in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", row));
            for col in 0..BOARD_SIZE {
                let c = match self.board.at(Square::new(row, col)) {
                    Some(Piece {
                        color: Color::Light,
                        rank: Rank::Man,
                    }) => 'l',
                    Some(Piece {
                        color: Color::Light,
                        rank: Rank::King,
                    }) => 'L',
                    Some(Piece {
                        color: Color::Dark,
                        rank: Rank::Man,
                    }) => 'd',
                    Some(Piece {
                        color: Color::Dark,
                        rank: Rank::King,
                    }) => 'D',
                    None => '.',
                };
                result.push_str(&format!(" {} ", c));
            }
            result.push('\n');
        }

        result
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn has_capture(board: &Board, piece: Piece, from: Square) -> bool {
    match piece.rank {
        Rank::Man => man_has_capture(board, piece.color, from),
        Rank::King => king_has_capture(board, piece.color, from),
    }
}

/// Whether a man on `from` has at least one jump available. One level is
/// enough: any deeper chain starts with a first jump.
fn man_has_capture(board: &Board, color: Color, from: Square) -> bool {
    for &(dr, dc) in &DIAGONALS {
        let (Some(mid), Some(landing)) = (from.offset(dr, dc), from.offset(2 * dr, 2 * dc)) else {
            continue;
        };
        if board.at(landing).is_none()
            && matches!(board.at(mid), Some(target) if target.color != color)
        {
            return true;
        }
    }
    false
}

/// Landing squares of maximal capture chains for a man on `from`.
///
/// Men jump in all four diagonal directions; forward-only applies to
/// quiet steps. A landing with a further jump available is not offered
/// itself, only the chain's endpoints are. `eaten` holds the squares
/// already jumped earlier in this chain, which cannot be jumped again.
fn man_capture_landings(
    board: &Board,
    color: Color,
    from: Square,
    eaten: &HashSet<Square>,
) -> HashSet<Square> {
    let mut landings = HashSet::new();
    for &(dr, dc) in &DIAGONALS {
        let (Some(mid), Some(landing)) = (from.offset(dr, dc), from.offset(2 * dr, 2 * dc)) else {
            continue;
        };
        if eaten.contains(&mid) {
            continue;
        }
        let target = match board.at(mid) {
            Some(target) => target,
            None => continue,
        };
        if target.color == color || board.at(landing).is_some() {
            continue;
        }

        let mut chain_eaten = eaten.clone();
        chain_eaten.insert(mid);
        let continuations = man_capture_landings(board, color, landing, &chain_eaten);
        if continuations.is_empty() {
            landings.insert(landing);
        } else {
            landings.extend(continuations);
        }
    }
    landings
}

fn king_has_capture(board: &Board, color: Color, from: Square) -> bool {
    for &(dr, dc) in &DIAGONALS {
        let mut cursor = from;
        while let Some(next) = cursor.offset(dr, dc) {
            match board.at(next) {
                None => cursor = next,
                Some(target) => {
                    if target.color != color {
                        if let Some(beyond) = next.offset(dr, dc) {
                            if board.at(beyond).is_none() {
                                return true;
                            }
                        }
                    }
                    break;
                }
            }
        }
    }
    false
}

/// Capture landings for a king on `from`: per direction, the first piece
/// met is taken if it is an opponent with an empty square just beyond,
/// and the king lands on that square. Kings never chain jumps.
fn king_capture_landings(board: &Board, color: Color, from: Square) -> HashSet<Square> {
    let mut landings = HashSet::new();
    for &(dr, dc) in &DIAGONALS {
        let mut cursor = from;
        while let Some(next) = cursor.offset(dr, dc) {
            match board.at(next) {
                None => cursor = next,
                Some(target) => {
                    if target.color != color {
                        if let Some(beyond) = next.offset(dr, dc) {
                            if board.at(beyond).is_none() {
                                landings.insert(beyond);
                            }
                        }
                    }
                    break;
                }
            }
        }
    }
    landings
}
