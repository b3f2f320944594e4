use crate::bot::Bot;
use crate::game::{Color, GameState, Outcome, Square};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub time_per_move: Duration,
    pub max_moves: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            time_per_move: Duration::from_secs(5),
            max_moves: 200,
        }
    }
}

pub enum MatchResult {
    LightWins { winner_name: String, moves: usize },
    DarkWins { winner_name: String, moves: usize },
    Draw { moves: usize },
    Timeout { violator: String, winner: String },
    IllegalMove { violator: String, winner: String },
}

impl MatchResult {
    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchResult::LightWins { winner_name, .. } => Some(winner_name),
            MatchResult::DarkWins { winner_name, .. } => Some(winner_name),
            MatchResult::Timeout { winner, .. } => Some(winner),
            MatchResult::IllegalMove { winner, .. } => Some(winner),
            MatchResult::Draw { .. } => None,
        }
    }
}

pub struct Match {
    config: MatchConfig,
    state: GameState,
    light_bot: Box<dyn Bot>,
    dark_bot: Box<dyn Bot>,
    verbose: bool,
}

impl Match {
    pub fn new(
        light_bot: Box<dyn Bot>,
        dark_bot: Box<dyn Bot>,
        config: MatchConfig,
        verbose: bool,
    ) -> Self {
        Match {
            config,
            state: GameState::new(),
            light_bot,
            dark_bot,
            verbose,
        }
    }

    pub fn play(&mut self) -> MatchResult {
        // Notify bots that game is starting
        self.light_bot.game_start(Color::Light);
        self.dark_bot.game_start(Color::Dark);

        if self.verbose {
            println!("Match starting:");
            println!("  Light: {}", self.light_bot.name());
            println!("  Dark:  {}", self.dark_bot.name());
            println!("\nInitial board:");
            println!("{}", self.state.display_board());
        }

        // Square a capture chain must be continued from, if one is open
        let mut resume: Option<Square> = None;

        while !self.state.is_game_over() && self.state.move_count() < self.config.max_moves {
            let current = self.state.turn();
            let bot_name = self.bot_name(current).to_string();

            if self.verbose {
                match resume {
                    Some(square) => println!(
                        "\nMove {}: {} continues the capture from {}",
                        self.state.move_count() + 1,
                        bot_name,
                        square
                    ),
                    None => println!(
                        "\nMove {}: {} to play",
                        self.state.move_count() + 1,
                        bot_name
                    ),
                }
            }

            // Get move from bot with time limit
            let start = Instant::now();
            let mv = {
                let bot = match current {
                    Color::Light => &mut self.light_bot,
                    Color::Dark => &mut self.dark_bot,
                };
                bot.get_move(&self.state, resume, self.config.time_per_move)
            };
            let elapsed = start.elapsed();

            if elapsed > self.config.time_per_move {
                let winner = self.bot_name(current.opponent()).to_string();
                if self.verbose {
                    println!(
                        "TIMEOUT: {} took {:?} (limit: {:?})",
                        bot_name, elapsed, self.config.time_per_move
                    );
                }
                return MatchResult::Timeout {
                    violator: bot_name,
                    winner,
                };
            }

            let Some(mv) = mv else {
                // No legal moves or bot gave up
                if self.verbose {
                    println!("{} returned no move", bot_name);
                }
                return MatchResult::Draw {
                    moves: self.state.move_count(),
                };
            };

            // An open chain must be continued by the piece that started it
            if let Some(square) = resume {
                if mv.from != square {
                    let winner = self.bot_name(current.opponent()).to_string();
                    if self.verbose {
                        println!(
                            "ILLEGAL MOVE: {} abandoned the capture chain at {}",
                            bot_name, square
                        );
                    }
                    return MatchResult::IllegalMove {
                        violator: bot_name,
                        winner,
                    };
                }
            }

            if self.verbose {
                println!("{} plays: {} (took {:?})", bot_name, mv, elapsed);
            }

            match self.state.apply_move(mv) {
                Ok(report) => {
                    resume = if report.chain_continues {
                        Some(report.to)
                    } else {
                        None
                    };
                    if self.verbose {
                        if let Some(square) = report.captured {
                            println!("  capture on {}", square);
                        }
                        if report.promoted {
                            println!("  crowned on {}", report.to);
                        }
                    }
                }
                Err(e) => {
                    let winner = self.bot_name(current.opponent()).to_string();
                    if self.verbose {
                        println!("ILLEGAL MOVE: {} - {}", bot_name, e);
                    }
                    return MatchResult::IllegalMove {
                        violator: bot_name,
                        winner,
                    };
                }
            }

            // Notify both bots of the move
            self.light_bot.notify_move(mv);
            self.dark_bot.notify_move(mv);

            if self.verbose {
                println!("{}", self.state.display_board());
            }
        }

        // Game ended normally
        self.light_bot.game_end();
        self.dark_bot.game_end();

        let moves = self.state.move_count();

        if let Outcome::Stalemate(stuck) = self.state.outcome() {
            if self.verbose {
                println!("\n{} has no move left", self.bot_name(stuck));
            }
        }

        match self.state.outcome().winner() {
            Some(Color::Light) => {
                if self.verbose {
                    println!("\n{} wins as Light!", self.light_bot.name());
                }
                MatchResult::LightWins {
                    winner_name: self.light_bot.name().to_string(),
                    moves,
                }
            }
            Some(Color::Dark) => {
                if self.verbose {
                    println!("\n{} wins as Dark!", self.dark_bot.name());
                }
                MatchResult::DarkWins {
                    winner_name: self.dark_bot.name().to_string(),
                    moves,
                }
            }
            None => {
                // Max moves reached
                if self.verbose {
                    println!("\nMax moves ({}) reached - Draw!", self.config.max_moves);
                }
                MatchResult::Draw { moves }
            }
        }
    }

    fn bot_name(&self, color: Color) -> &str {
        match color {
            Color::Light => self.light_bot.name(),
            Color::Dark => self.dark_bot.name(),
        }
    }
}

/// Builds a fresh bot instance for each game it plays in
pub type BotFactory = Box<dyn Fn() -> Box<dyn Bot>>;

pub struct Tournament {
    entrants: Vec<(String, BotFactory)>,
    config: MatchConfig,
    verbose: bool,
}

impl Tournament {
    pub fn new(config: MatchConfig, verbose: bool) -> Self {
        Tournament {
            entrants: Vec::new(),
            config,
            verbose,
        }
    }

    pub fn add_bot(&mut self, name: String, factory: BotFactory) {
        self.entrants.push((name, factory));
    }

    /// Play every pairing twice, once with each color assignment
    pub fn run_round_robin(&mut self) -> TournamentResults {
        let mut results = TournamentResults::new(
            self.entrants.iter().map(|(name, _)| name.clone()).collect(),
        );

        for i in 0..self.entrants.len() {
            for j in (i + 1)..self.entrants.len() {
                if self.verbose {
                    println!("\n{}", "=".repeat(60));
                    println!("Match: {} vs {}", self.entrants[i].0, self.entrants[j].0);
                    println!("{}", "=".repeat(60));
                }

                for (light, dark) in [(i, j), (j, i)] {
                    let mut game = Match::new(
                        (self.entrants[light].1)(),
                        (self.entrants[dark].1)(),
                        self.config,
                        self.verbose,
                    );
                    let result = game.play();
                    results.record(
                        &self.entrants[light].0,
                        &self.entrants[dark].0,
                        result.winner(),
                    );
                }
            }
        }

        results
    }
}

#[derive(Debug)]
pub struct Standing {
    pub name: String,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

#[derive(Debug)]
pub struct TournamentResults {
    standings: Vec<Standing>,
}

impl TournamentResults {
    fn new(names: Vec<String>) -> Self {
        TournamentResults {
            standings: names
                .into_iter()
                .map(|name| Standing {
                    name,
                    wins: 0,
                    losses: 0,
                    draws: 0,
                })
                .collect(),
        }
    }

    fn record(&mut self, light: &str, dark: &str, winner: Option<&str>) {
        match winner {
            Some(winner_name) => {
                let loser = if winner_name == light { dark } else { light };
                self.bump(winner_name, |standing| standing.wins += 1);
                self.bump(loser, |standing| standing.losses += 1);
            }
            None => {
                self.bump(light, |standing| standing.draws += 1);
                self.bump(dark, |standing| standing.draws += 1);
            }
        }
    }

    fn bump(&mut self, name: &str, update: impl FnOnce(&mut Standing)) {
        if let Some(standing) = self.standings.iter_mut().find(|s| s.name == name) {
            update(standing);
        }
    }

    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn display(&self) {
        println!("\nTournament Results:");
        println!("==================");
        for standing in &self.standings {
            println!(
                "{:<20} {} wins, {} losses, {} draws",
                standing.name, standing.wins, standing.losses, standing.draws
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{GreedyBot, RandomBot};

    #[test]
    fn test_random_match_resolves() {
        let config = MatchConfig {
            time_per_move: Duration::from_secs(5),
            max_moves: 400,
        };
        let mut game = Match::new(
            Box::new(RandomBot::new("Alice".to_string())),
            Box::new(RandomBot::new("Bob".to_string())),
            config,
            false,
        );

        // Random bots always produce legal moves within the limit, so
        // the match ends in a decision or the move cap
        match game.play() {
            MatchResult::LightWins { moves, .. }
            | MatchResult::DarkWins { moves, .. }
            | MatchResult::Draw { moves } => assert!(moves <= 400),
            MatchResult::Timeout { violator, .. } => {
                panic!("unexpected timeout by {}", violator)
            }
            MatchResult::IllegalMove { violator, .. } => {
                panic!("unexpected illegal move by {}", violator)
            }
        }
    }

    #[test]
    fn test_match_result_winner() {
        let result = MatchResult::LightWins {
            winner_name: "Alice".to_string(),
            moves: 42,
        };
        assert_eq!(result.winner(), Some("Alice"));

        let result = MatchResult::Timeout {
            violator: "Bob".to_string(),
            winner: "Alice".to_string(),
        };
        assert_eq!(result.winner(), Some("Alice"));

        let result = MatchResult::Draw { moves: 200 };
        assert_eq!(result.winner(), None);
    }

    #[test]
    fn test_round_robin_plays_both_colors() {
        let config = MatchConfig {
            time_per_move: Duration::from_secs(5),
            max_moves: 200,
        };
        let mut tournament = Tournament::new(config, false);
        tournament.add_bot(
            "Random".to_string(),
            Box::new(|| Box::new(RandomBot::new("Random".to_string()))),
        );
        tournament.add_bot(
            "Greedy".to_string(),
            Box::new(|| Box::new(GreedyBot::new("Greedy".to_string()))),
        );

        let results = tournament.run_round_robin();

        // Two games, each crediting both entrants once
        let total: usize = results
            .standings()
            .iter()
            .map(|standing| standing.wins + standing.losses + standing.draws)
            .sum();
        assert_eq!(total, 4);
    }
}
