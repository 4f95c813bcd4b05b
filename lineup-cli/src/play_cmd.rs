//! Play command - interactive console game
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: start_session(), play_loop()
//! - Level 3: parse_command(), handle_command(), computer_turn()
//! - Level 4: formatting utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use lineup_core::{
    load_game, save_game, DiscKind, GameConfig, GameSession, ImmediateWinAI, PlayerId,
    TurnOutcome,
};

use crate::GameArgs;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Computer plays player 2
    #[arg(long)]
    pub ai: bool,

    /// Resume a saved game instead of starting a new one
    #[arg(long, value_name = "FILE")]
    pub resume: Option<PathBuf>,
}

/// One line of console input
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    /// Zero-based column and disc kind
    Drop { col: usize, kind: DiscKind },
    Undo,
    Redo,
    Save(PathBuf),
    Load(PathBuf),
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  <col> [kind]   drop a disc; col is 1-based, kind is O, B, M or E (default O)
  undo / redo    step through history
  save <file>    write the game to a JSON file
  load <file>    replace the game with a saved one
  help           show this message
  quit           leave the game";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let mut session = start_session(&args, seed)?;
    let mut ai = seed.map(ImmediateWinAI::with_seed).unwrap_or_default();

    tracing::info!(
        variant = %session.variant(),
        rows = session.board().rows(),
        cols = session.board().cols(),
        "starting interactive game"
    );

    let stdin = io::stdin();
    play_loop(&mut session, &mut ai, stdin.lock(), io::stdout())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn start_session(args: &PlayArgs, seed: Option<u64>) -> Result<GameSession> {
    if let Some(path) = &args.resume {
        return load_game(path);
    }

    let mut config: GameConfig = args.game.to_config(seed)?;
    if args.ai {
        config = config.with_ai_opponent();
    }
    Ok(GameSession::new(config)?)
}

/// Read commands until `quit` or end of input
fn play_loop<R: BufRead, W: Write>(
    session: &mut GameSession,
    ai: &mut ImmediateWinAI,
    mut input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "{}", HELP)?;
    show(session, &mut out)?;

    let mut line = String::new();
    loop {
        if !session.is_game_over() && session.player(session.current_player()).is_computer {
            if !computer_turn(session, ai, &mut out)? {
                break;
            }
            show(session, &mut out)?;
            continue;
        }

        write!(out, "player {}> ", session.current_player())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if handle_command(session, command, &mut out)? {
            show(session, &mut out)?;
        }
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest = words.next();

    match first.to_ascii_lowercase().as_str() {
        "undo" | "u" => return Ok(Command::Undo),
        "redo" | "r" => return Ok(Command::Redo),
        "help" | "h" | "?" => return Ok(Command::Help),
        "quit" | "q" | "exit" => return Ok(Command::Quit),
        "save" => {
            return rest
                .map(|path| Command::Save(PathBuf::from(path)))
                .ok_or_else(|| "usage: save <file>".to_string())
        }
        "load" => {
            return rest
                .map(|path| Command::Load(PathBuf::from(path)))
                .ok_or_else(|| "usage: load <file>".to_string())
        }
        _ => {}
    }

    // "4", "4 b" or "4b"
    let digits_end = first
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(first.len());
    let (number, suffix) = first.split_at(digits_end);
    let column: usize = number
        .parse()
        .map_err(|_| format!("unknown command '{}' (type help)", first))?;
    if column == 0 {
        return Err("columns are numbered from 1".to_string());
    }

    let letter = match (suffix, rest) {
        ("", None) => 'O',
        ("", Some(word)) => single_letter(word)?,
        (attached, _) => single_letter(attached)?,
    };
    let kind = DiscKind::from_letter(letter)
        .ok_or_else(|| format!("unknown disc kind '{}' (use O, B, M or E)", letter))?;

    Ok(Command::Drop {
        col: column - 1,
        kind,
    })
}

fn single_letter(word: &str) -> Result<char, String> {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Ok(letter),
        _ => Err(format!("unknown disc kind '{}' (use O, B, M or E)", word)),
    }
}

/// Returns true when the board should be shown again
fn handle_command<W: Write>(session: &mut GameSession, command: Command, out: &mut W) -> Result<bool> {
    match command {
        Command::Drop { col, kind } => {
            let outcome = session.apply_turn(col, kind);
            if let TurnOutcome::Illegal(reason) = outcome {
                writeln!(out, "illegal move: {}", reason)?;
                return Ok(false);
            }
            Ok(true)
        }
        Command::Undo => {
            if let Err(err) = step_back(session) {
                writeln!(out, "{}", err)?;
                return Ok(false);
            }
            Ok(true)
        }
        Command::Redo => {
            if let Err(err) = step_forward(session) {
                writeln!(out, "{}", err)?;
                return Ok(false);
            }
            Ok(true)
        }
        Command::Save(path) => {
            match save_game(session, &path) {
                Ok(()) => writeln!(out, "saved to {}", path.display())?,
                Err(err) => writeln!(out, "save failed: {:#}", err)?,
            }
            Ok(false)
        }
        Command::Load(path) => match load_game(&path) {
            Ok(loaded) => {
                *session = loaded;
                Ok(true)
            }
            Err(err) => {
                writeln!(out, "load failed: {:#}", err)?;
                Ok(false)
            }
        },
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            Ok(false)
        }
        Command::Quit => Ok(false),
    }
}

/// Undo back to the previous human turn
fn step_back(session: &mut GameSession) -> Result<(), lineup_core::GameError> {
    session.undo()?;
    while session.player(session.current_player()).is_computer && session.history().can_undo() {
        session.undo()?;
    }
    Ok(())
}

/// Redo through any computer turns that follow
fn step_forward(session: &mut GameSession) -> Result<(), lineup_core::GameError> {
    session.redo()?;
    while session.player(session.current_player()).is_computer
        && !session.is_game_over()
        && session.history().can_redo()
    {
        session.redo()?;
    }
    Ok(())
}

/// Let the computer move. Returns false when it has nothing to play.
fn computer_turn<W: Write>(session: &mut GameSession, ai: &mut ImmediateWinAI, out: &mut W) -> Result<bool> {
    let player = session.current_player();
    let Some(mv) = ai.best_move(session) else {
        writeln!(out, "player {} has no move", player)?;
        return Ok(false);
    };

    writeln!(out, "player {} drops {} in column {}", player, mv.kind, mv.col + 1)?;
    let outcome = session.apply_turn(mv.col, mv.kind);
    if let TurnOutcome::Illegal(reason) = outcome {
        tracing::warn!(%reason, "computer move rejected");
        return Ok(false);
    }
    Ok(true)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn show<W: Write>(session: &GameSession, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", session.board())?;
    writeln!(out, "{}", status_line(session))
}

/// One-line summary of whose turn it is, or how the game ended
pub fn status_line(session: &GameSession) -> String {
    if session.is_game_over() {
        let wins = session.wins();
        return match session.winner() {
            Some(player) => format!("Player {} wins after {} turns", player, session.turn_number()),
            None if wins.both() => "Both players completed a line: draw".to_string(),
            None => "Draw".to_string(),
        };
    }

    let player = session.current_player();
    format!(
        "Turn {}: player {} to move ({}) | stock {}",
        session.turn_number() + 1,
        player,
        symbol_of(player),
        stock_summary(session, player)
    )
}

fn symbol_of(player: PlayerId) -> char {
    lineup_core::Disc::ordinary(player).symbol()
}

fn stock_summary(session: &GameSession, player: PlayerId) -> String {
    let inventory = &session.player(player).inventory;
    session
        .variant()
        .allowed_kinds()
        .iter()
        .map(|&kind| format!("{}:{}", kind.letter(), inventory.count(kind)))
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
