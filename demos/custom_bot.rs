//! Example of how to create your own bot

use makyek_arena::*;
use std::time::Duration;

/// A custom bot that pushes its pieces toward the crowning row (simple heuristic)
pub struct AdvanceBot {
    name: String,
    color: Option<Color>,
}

impl AdvanceBot {
    pub fn new(name: String) -> Self {
        AdvanceBot { name, color: None }
    }

    fn advancement(&self, mv: Move) -> i32 {
        // Prefer destinations near our crowning row; before game_start
        // tells us our color, every move scores the same
        match self.color {
            Some(color) => -(mv.to.row as i32 - color.promotion_row() as i32).abs(),
            None => 0,
        }
    }
}

impl Bot for AdvanceBot {
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

        // Find best move according to our heuristic
        moves.into_iter().max_by_key(|&mv| self.advancement(mv))
    }

    fn game_start(&mut self, color: Color) {
        self.color = Some(color);
        println!("{} starting as {}", self.name, color);
    }
}

fn main() {
    println!("Custom Bot Example\n");

    let bot1 = Box::new(AdvanceBot::new("AdvanceBot".to_string()));
    let bot2 = Box::new(GreedyBot::new("GreedyBot".to_string()));

    let config = MatchConfig {
        time_per_move: Duration::from_secs(1),
        max_moves: 300,
    };

    let mut match_game = Match::new(bot1, bot2, config, true);
    let result = match_game.play();

    println!("\nMatch completed!");
    if let Some(winner) = result.winner() {
        println!("Winner: {}", winner);
    } else {
        println!("Draw!");
    }
}
