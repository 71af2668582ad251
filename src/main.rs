use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Stdin, Write};
use std::time::Instant;

use connect_four_engine::*;

mod cli;
mod terminal;

use cli::{parse_column, Cli, Command};

/// Asks `question` until a known answer letter is given
fn ask(stdin: &Stdin, question: &str, answers: &[char]) -> Result<char> {
    loop {
        let mut buffer = String::new();
        print!("{}", question);
        stdout().flush().expect("failed to flush to stdout!");
        if stdin.read_line(&mut buffer)? == 0 {
            return Err(anyhow!("input closed"));
        }
        match buffer.to_lowercase().chars().next() {
            Some(letter) if answers.contains(&letter) => return Ok(letter),
            _ => println!("Unknown answer given"),
        }
    }
}

fn run_arena(mut config: GameConfig, games: usize) -> Result<()> {
    // humans sit out, the computer plays both sides
    let depth = config
        .players
        .iter()
        .find_map(|player| match player.kind {
            PlayerKind::Minimax { search_depth } => Some(search_depth),
            _ => None,
        })
        .unwrap_or(DEFAULT_SEARCH_DEPTH);
    for player in config.players.iter_mut() {
        if !player.kind.is_automated() {
            player.kind = PlayerKind::Random;
        }
    }
    if config.players.iter().all(|player| player.kind == PlayerKind::Random) {
        config.players[0].kind = PlayerKind::Minimax {
            search_depth: depth,
        };
    }

    let summary = arena::run(&config, games, true)?;
    for player in config.players.iter() {
        println!(
            "{} ({:?}): {} wins",
            player.label,
            player.kind,
            summary.wins_for(player.token)
        );
    }
    println!("Draws: {}", summary.draws);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Some(Command::Arena { games, config }) = &cli.command {
        let config = match config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        return run_arena(config, *games);
    }
    let config = match cli.config.as_ref() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let stdin = stdin();

    println!("Welcome to Connect {}\n", config.win_length);

    // choose control of every player, unless the config file already did
    let mut players = Vec::with_capacity(config.players.len());
    for (i, spec) in config.players.iter().enumerate() {
        if !cli.prompts_for_players() {
            players.push(spec.clone());
            continue;
        }
        let question = format!(
            "Is player {} ({}) human, random or minimax controlled? h/r/m: ",
            i + 1,
            spec.label
        );
        let kind = match ask(&stdin, &question, &['h', 'r', 'm'])? {
            'h' => PlayerKind::Human,
            'r' => PlayerKind::Random,
            _ => PlayerKind::Minimax {
                search_depth: match spec.kind {
                    PlayerKind::Minimax { search_depth } => search_depth,
                    _ => DEFAULT_SEARCH_DEPTH,
                },
            },
        };
        players.push(PlayerSpec {
            kind,
            ..spec.clone()
        });
    }
    let mut game = TurnController::new(config.with_players(players))?;

    // game loop
    loop {
        terminal::display(game.grid())?;

        match game.phase() {
            Phase::AwaitingMove(index) => {
                let label = game.players()[index].label.clone();

                // automated player
                if let Some(pending) = game.pending() {
                    println!("{} is thinking...", label);
                    stdout().flush().expect("Failed to flush to stdout!");

                    let wait = pending.due.saturating_duration_since(Instant::now());
                    std::thread::sleep(wait);
                    if let Some(automated_move) = game.poll(pending.due)? {
                        println!("{} plays column {}", label, automated_move.column + 1);
                    }
                    continue;
                }

                // human player
                print!("{} > ", label);
                stdout().flush().expect("Failed to flush to stdout!");
                let mut input_str = String::new();
                if stdin.read_line(&mut input_str)? == 0 {
                    break;
                }

                let column = match parse_column(&input_str) {
                    Some(column) => column,
                    None => {
                        println!("Invalid number: {}", input_str.trim());
                        continue;
                    }
                };
                match game.apply_move(column) {
                    Ok(report) if !report.accepted => {
                        println!("Invalid move, column {} full", column + 1)
                    }
                    Ok(_) => {}
                    Err(EngineError::InvalidColumn { columns, .. }) => println!(
                        "Invalid move, column {} out of range. Columns must be between 1 and {}",
                        column + 1,
                        columns
                    ),
                    Err(err) => return Err(err.into()),
                }
            }

            // end states
            Phase::GameOver(outcome) => {
                match outcome {
                    GameOutcome::Win(token) => {
                        let label = game
                            .players()
                            .iter()
                            .find(|player| player.token == token)
                            .map(|player| player.label.as_str())
                            .unwrap_or("Unknown player");
                        println!("{} wins!", label);
                    }
                    _ => println!("Draw!"),
                }
                println!("Moves played: {}", game.history());

                if ask(&stdin, "Play again? y/n: ", &['y', 'n'])? == 'n' {
                    break;
                }
                game.reset();
            }
        }
    }
    Ok(())
}
