use makyek_arena::*;
use std::time::Duration;

fn main() {
    println!("Mak Yek Arena - Bot Match System");
    println!("================================\n");

    // Create some example bots
    let light = Box::new(GreedyBot::new("GreedyBot1".to_string()));
    let dark = Box::new(RandomBot::new("RandomBot1".to_string()));

    // Configure match
    let config = MatchConfig {
        time_per_move: Duration::from_secs(2),
        max_moves: 300,
    };

    // Play a match
    let mut match_game = Match::new(light, dark, config, true);
    let result = match_game.play();

    // Display result
    println!("\n================================");
    println!("Match Result:");
    match result {
        MatchResult::LightWins { winner_name, moves } => {
            println!("  {} wins as Light in {} moves!", winner_name, moves);
        }
        MatchResult::DarkWins { winner_name, moves } => {
            println!("  {} wins as Dark in {} moves!", winner_name, moves);
        }
        MatchResult::Draw { moves } => {
            println!("  Draw after {} moves", moves);
        }
        MatchResult::Timeout { violator, winner } => {
            println!("  {} wins by timeout (opponent: {})", winner, violator);
        }
        MatchResult::IllegalMove { violator, winner } => {
            println!("  {} wins by illegal move (opponent: {})", winner, violator);
        }
    }
    println!("================================");
}
