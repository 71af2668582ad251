//! Batches of games between automated players

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

use crate::config::GameConfig;
use crate::controller::TurnController;
use crate::grid::Token;
use crate::win::GameOutcome;

/// Tally of finished arena games
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct ArenaSummary {
    pub wins: BTreeMap<u8, usize>,
    pub draws: usize,
}

impl ArenaSummary {
    pub fn wins_for(&self, token: Token) -> usize {
        self.wins.get(&token.0).copied().unwrap_or(0)
    }

    pub fn games(&self) -> usize {
        self.wins.values().sum::<usize>() + self.draws
    }

    fn record(mut self, outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Win(token) => *self.wins.entry(token.0).or_insert(0) += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => {}
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for (token, wins) in other.wins {
            *self.wins.entry(token).or_insert(0) += wins;
        }
        self.draws += other.draws;
        self
    }
}

/// Plays one game to completion without pacing delays
pub fn play_out(config: GameConfig) -> Result<GameOutcome> {
    let mut controller = TurnController::new(config)?;
    controller.run_until_human()?;
    match controller.outcome() {
        GameOutcome::Ongoing => Err(anyhow!(
            "game stopped before finishing after moves {}",
            controller.history()
        )),
        outcome => Ok(outcome),
    }
}

/// Plays `games` games in parallel, game `i` seeded with `seed + i`
pub fn run(config: &GameConfig, games: usize, show_progress: bool) -> Result<ArenaSummary> {
    config.validate()?;
    if config.players.iter().any(|player| !player.kind.is_automated()) {
        return Err(anyhow!("arena games need every player to be automated"));
    }
    let base_seed = config.seed.unwrap_or(0);

    let progress = if show_progress {
        let bar = ProgressBar::new(games as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games")
                .progress_chars("##-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let summary = (0..games)
        .into_par_iter()
        .map(|i| {
            let game_config = config
                .clone()
                .with_delay_ms(0)
                .with_seed(base_seed.wrapping_add(i as u64));
            let outcome = play_out(game_config);
            progress.inc(1);
            outcome
        })
        .try_fold(ArenaSummary::default, |summary, outcome| {
            outcome.map(|outcome| summary.record(outcome))
        })
        .try_reduce(ArenaSummary::default, |a, b| Ok(a.merge(b)))?;

    progress.finish_with_message("done");
    info!(games = summary.games(), draws = summary.draws, "arena finished");
    Ok(summary)
}
