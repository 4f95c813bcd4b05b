//! Selfplay command - computer vs computer games
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_series(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use lineup_core::{GameConfig, GameSession, ImmediateWinAI, PlayerId};

use crate::GameArgs;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Stop a game after this many turns
    #[arg(long, default_value = "500")]
    pub max_turns: u32,

    /// Print the final board of every game
    #[arg(long)]
    pub boards: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// How one game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum GameResult {
    PlayerOneWins,
    PlayerTwoWins,
    SharedLine,
    Draw,
    Unfinished,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    turns: u32,
    #[serde(skip)]
    final_board: String,
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
struct SeriesResults {
    total_games: usize,
    player_one_wins: usize,
    player_two_wins: usize,
    shared_lines: usize,
    draws: usize,
    unfinished: usize,
    avg_turns: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Build the game config
/// 2. Play the series
/// 3. Report results
pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    let config = args.game.to_config(seed)?;

    tracing::info!(
        variant = %config.variant,
        games = args.games,
        max_turns = args.max_turns,
        "starting selfplay"
    );

    let results = play_series(&config, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_series(config: &GameConfig, args: &SelfplayArgs, seed: Option<u64>) -> Result<SeriesResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let game_seed = rng.gen::<u64>();
        let record = play_single_game(config, game_num + 1, game_seed, args.max_turns)?;

        tracing::info!(
            "Game {}: {:?} ({} turns)",
            record.game_number,
            record.result,
            record.turns
        );

        games.push(record);
    }

    Ok(compute_statistics(games))
}

fn report_results(results: &SeriesResults, args: &SelfplayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results, args.boards);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(
    config: &GameConfig,
    game_number: usize,
    seed: u64,
    max_turns: u32,
) -> Result<GameRecord> {
    let mut session = GameSession::new(config.clone().with_seed(seed))?;
    let mut ai = ImmediateWinAI::with_seed(seed);
    ai.play_game(&mut session, max_turns);

    Ok(GameRecord {
        game_number,
        result: classify(&session),
        turns: session.turn_number(),
        final_board: session.board().to_string(),
    })
}

fn classify(session: &GameSession) -> GameResult {
    if !session.is_game_over() {
        return GameResult::Unfinished;
    }
    match session.winner() {
        Some(PlayerId::One) => GameResult::PlayerOneWins,
        Some(PlayerId::Two) => GameResult::PlayerTwoWins,
        None if session.wins().both() => GameResult::SharedLine,
        None => GameResult::Draw,
    }
}

fn compute_statistics(games: Vec<GameRecord>) -> SeriesResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();

    let total_turns: u32 = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    SeriesResults {
        total_games: games.len(),
        player_one_wins: count(GameResult::PlayerOneWins),
        player_two_wins: count(GameResult::PlayerTwoWins),
        shared_lines: count(GameResult::SharedLine),
        draws: count(GameResult::Draw),
        unfinished: count(GameResult::Unfinished),
        avg_turns,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(results: &SeriesResults) {
    match serde_json::to_string_pretty(results) {
        Ok(json) => println!("{}", json),
        Err(err) => tracing::error!("failed to encode results: {}", err),
    }
}

fn print_text_results(results: &SeriesResults, boards: bool) {
    let total = results.total_games;

    println!("\n=== Selfplay Results ===");
    println!("Total games:    {}", total);
    println!(
        "Player 1 wins:  {} ({:.1}%)",
        results.player_one_wins,
        percent(results.player_one_wins, total)
    );
    println!(
        "Player 2 wins:  {} ({:.1}%)",
        results.player_two_wins,
        percent(results.player_two_wins, total)
    );
    println!(
        "Shared lines:   {} ({:.1}%)",
        results.shared_lines,
        percent(results.shared_lines, total)
    );
    println!("Draws:          {} ({:.1}%)", results.draws, percent(results.draws, total));
    if results.unfinished > 0 {
        println!("Unfinished:     {}", results.unfinished);
    }
    println!("Avg turns:      {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        println!("  Game {}: {:?} in {} turns", game.game_number, game.result, game.turns);
        if boards {
            print!("{}", game.final_board);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
