use crate::game::{Color, GameState, Move, Rank, Square, BOARD_SIZE};
use rand::seq::SliceRandom;
use std::time::Duration;

/// Trait that all bots must implement
pub trait Bot: Send {
    /// Get the name of the bot
    fn name(&self) -> &str;

    /// Get the next move for the current game state.
    ///
    /// While a capture chain is in progress, `resume` names the square
    /// the chaining piece stands on; the returned move must start there.
    /// The bot has a time limit to respond.
    fn get_move(
        &mut self,
        state: &GameState,
        resume: Option<Square>,
        time_limit: Duration,
    ) -> Option<Move>;

    /// Notified when the game starts
    fn game_start(&mut self, _color: Color) {}

    /// Notified when a move is made (by either player)
    fn notify_move(&mut self, _mv: Move) {}

    /// Notified when the game ends
    fn game_end(&mut self) {}
}

/// The moves a bot may pick from: the whole side's legal moves, or the
/// continuations of the chaining piece when one is mid-capture
pub fn candidate_moves(state: &GameState, resume: Option<Square>) -> Vec<Move> {
    match resume {
        Some(from) => state
            .legal_destinations(from)
            .map(|destinations| {
                destinations
                    .into_iter()
                    .map(|to| Move::new(from, to))
                    .collect()
            })
            .unwrap_or_default(),
        None => state.legal_moves(),
    }
}

/// A simple random bot for testing
pub struct RandomBot {
    name: String,
}

impl RandomBot {
    pub fn new(name: String) -> Self {
        RandomBot { name }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(
        &mut self,
        state: &GameState,
        resume: Option<Square>,
        _time_limit: Duration,
    ) -> Option<Move> {
        let moves = candidate_moves(state, resume);
        moves.choose(&mut rand::thread_rng()).copied()
    }
}

/// A simple greedy bot that tries to win material
pub struct GreedyBot {
    name: String,
}

impl GreedyBot {
    pub fn new(name: String) -> Self {
        GreedyBot { name }
    }

    fn evaluate_move(&self, state: &GameState, mv: Move) -> i32 {
        let mover = state.turn();
        let mut next = state.clone();
        if next.apply_move(mv).is_err() {
            return i32::MIN;
        }

        if let Some(winner) = next.outcome().winner() {
            return if winner == mover { 1000 } else { -1000 };
        }

        // Material balance from the mover's point of view, kings up-weighted
        let mut score = 0;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if let Ok(Some(piece)) = next.piece_at(Square::new(row, col)) {
                    let value = match piece.rank {
                        Rank::Man => 1,
                        Rank::King => 3,
                    };
                    if piece.color == mover {
                        score += value;
                    } else {
                        score -= value;
                    }
                }
            }
        }
        score
    }
}

impl Bot for GreedyBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(
        &mut self,
        state: &GameState,
        resume: Option<Square>,
        _time_limit: Duration,
    ) -> Option<Move> {
        let moves = candidate_moves(state, resume);
        if moves.is_empty() {
            return None;
        }

        // Find the move with the best evaluation
        moves
            .into_iter()
            .max_by_key(|&mv| self.evaluate_move(state, mv))
    }
}
