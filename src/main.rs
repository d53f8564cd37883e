use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chain_reaction::config::AppConfig;
use chain_reaction::game::{Game, Player};
use chain_reaction::ui::App;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Play Chain Reaction in the terminal.
#[derive(Parser)]
#[command(name = "chain-reaction", about = "Hot-seat Chain Reaction in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override board rows
    #[arg(long)]
    rows: Option<usize>,

    /// Override board columns
    #[arg(long)]
    cols: Option<usize>,

    /// Comma-separated player names, in turn order
    #[arg(long, default_value = "Red,Green")]
    players: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(rows) = cli.rows {
        config.game.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.game.cols = cols;
    }
    config.validate().context("validating configuration")?;

    let players = parse_players(&cli.players);
    let game = Game::with_settings(&config.game, players).context("starting game")?;

    run(App::new(game, config.ui)).context("running terminal UI")
}

/// Players get ids `p1, p2, ...`; the first one hosts the game.
fn parse_players(names: &str) -> Vec<Player> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(idx, name)| {
            let player = Player::new(format!("p{}", idx + 1), name);
            if idx == 0 {
                player.admin()
            } else {
                player
            }
        })
        .collect()
}

fn run(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even if the app failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
