use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use chain_reaction::ai::{Agent, RandomAgent};
use chain_reaction::config::AppConfig;
use chain_reaction::game::{Game, GameOutcome, Player};

/// Play Chain Reaction games between random agents without a UI.
#[derive(Parser)]
#[command(name = "simulate", about = "Run headless Chain Reaction self-play")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Number of players per game
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Override board rows
    #[arg(long)]
    rows: Option<usize>,

    /// Override board columns
    #[arg(long)]
    cols: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Print one JSON object per game instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    game: usize,
    outcome: GameOutcome,
    moves: usize,
    explosions: usize,
    skipped_turns: usize,
    forced: bool,
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
    config.game.max_players = config.game.max_players.max(cli.players);
    config.validate().context("validating configuration")?;

    let players: Vec<Player> = (1..=cli.players)
        .map(|i| Player::new(format!("p{i}"), format!("Bot {i}")))
        .collect();

    let mut wins: BTreeMap<String, usize> = BTreeMap::new();
    let mut forced_games = 0;

    for game_idx in 0..cli.games {
        let mut agents: Vec<RandomAgent> = (0..cli.players)
            .map(|seat| match cli.seed {
                Some(seed) => RandomAgent::seeded(seed ^ ((game_idx * cli.players + seat) as u64)),
                None => RandomAgent::new(),
            })
            .collect();

        let mut game = Game::with_settings(&config.game, players.clone())
            .with_context(|| format!("starting game {game_idx}"))?;
        let summary = play_game(game_idx, &mut game, &mut agents)?;

        log::info!(
            "game {}: {} after {} moves ({} explosions{})",
            summary.game,
            summary.outcome,
            summary.moves,
            summary.explosions,
            if summary.forced { ", forced" } else { "" }
        );

        if summary.forced {
            forced_games += 1;
        }
        let key = match &summary.outcome {
            GameOutcome::Winner(id) => id.to_string(),
            GameOutcome::Draw => "draw".to_string(),
        };
        *wins.entry(key).or_default() += 1;

        if cli.json {
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    if !cli.json {
        println!(
            "{} games on a {}x{} board",
            cli.games, config.game.rows, config.game.cols
        );
        println!("-------------------------------------------");
        for (who, count) in &wins {
            let pct = *count as f64 / cli.games.max(1) as f64 * 100.0;
            println!("  {who:<6} {count:>6}  ({pct:.1}%)");
        }
        println!("-------------------------------------------");
        println!("Forced resolutions: {forced_games}");
    }

    Ok(())
}

fn play_game(game_idx: usize, game: &mut Game, agents: &mut [RandomAgent]) -> Result<GameSummary> {
    let board = game.board();
    // Every accepted move adds an orb and a stable board holds fewer than
    // 4 per cell, so a game cannot outlast this many turns.
    let max_turns = board.rows() * board.cols() * 4 * agents.len().max(1);

    let mut explosions = 0;
    let mut skipped_turns = 0;
    let mut forced = false;

    for _ in 0..max_turns {
        if game.is_finished() {
            break;
        }
        let seat = game.cursor();
        let player = game.current_player().id.clone();

        match agents[seat].select_move(game) {
            Some((row, col)) => {
                let report = game
                    .submit_move(&player, row, col, &mut ())
                    .with_context(|| format!("{} made an illegal move", agents[seat].name()))?;
                explosions += report.resolution.explosions;
                forced |= report.resolution.was_forced();
            }
            None => {
                game.skip_turn()?;
                skipped_turns += 1;
            }
        }
    }

    let Some(outcome) = game.outcome().cloned() else {
        bail!("game {game_idx} did not finish within {max_turns} turns");
    };

    Ok(GameSummary {
        game: game_idx,
        outcome,
        moves: game.move_count(),
        explosions,
        skipped_turns,
        forced,
    })
}
