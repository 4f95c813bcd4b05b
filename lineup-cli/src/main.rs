//! LineUp CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive game on the console
//! - selfplay: Computer vs computer games with a summary
//! - show: Render a saved game

mod play_cmd;
mod selfplay_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lineup_core::{load_game, GameConfig, Variant};

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Connect-N with special discs")]
struct Cli {
    /// Random seed for stock allocation and computer moves
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on the console
    Play(play_cmd::PlayArgs),
    /// Let the computer play itself
    Selfplay(selfplay_cmd::SelfplayArgs),
    /// Print the board of a saved game
    Show {
        /// Save file written by `play`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Game setup shared by `play` and `selfplay`
#[derive(Args, Clone, Debug)]
pub struct GameArgs {
    /// JSON config file (command-line flags override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rule variant: classic, basic or spin
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Board rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Board columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// Discs in a row needed to win
    #[arg(long)]
    pub win_len: Option<usize>,
}

impl GameArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn to_config(&self, seed: Option<u64>) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(variant) = self.variant {
            if variant != config.variant {
                // sizes from another variant rarely fit
                config.rows = None;
                config.cols = None;
            }
            config.variant = variant;
        }
        if let Some(rows) = self.rows {
            config.rows = Some(rows);
        }
        if let Some(cols) = self.cols {
            config.cols = Some(cols);
        }
        if let Some(win_len) = self.win_len {
            config.win_len = win_len;
        }
        if seed.is_some() {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Selfplay(args) => selfplay_cmd::run(args, cli.seed),
        Commands::Show { file } => {
            let session = load_game(&file)?;
            print!("{}", session.board());
            println!("{}", play_cmd::status_line(&session));
            Ok(())
        }
    }
}
