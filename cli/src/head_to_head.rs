use minimax_chess::{RaterParams, Side};
use rand::{Rng, RngCore};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::confidence::{score_and_confidence, ScoreAndConfidence};
use crate::self_play::{play_game, GameOutcome, RaterStrategy};

pub const DEFAULT_MAX_MOVES: usize = 500;
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TrialError {
    #[error("no decisive game in {attempts} attempts")]
    Undecided { attempts: usize },
}

/// How a single champion vs challenger trial is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialConfig {
    /// Depth handed to the move search of both players.
    pub depth: u8,
    /// Plies after which an undecided game is abandoned and replayed.
    pub max_moves: usize,
    /// Games played before giving up on a decisive result.
    pub max_attempts: usize,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            max_moves: DEFAULT_MAX_MOVES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Plays `challenger` against `champion` until one of them is checkmated.
///
/// The challenger's color is drawn anew for every game. Stalemates and games
/// that hit the move limit are replayed. Returns whether the challenger won.
pub fn run_trial(
    champion: RaterParams,
    challenger: RaterParams,
    config: &TrialConfig,
    rng: &mut dyn RngCore,
) -> Result<bool, TrialError> {
    let champion = RaterStrategy::new(champion, config.depth);
    let challenger = RaterStrategy::new(challenger, config.depth);

    for attempt in 0..config.max_attempts {
        let challenger_side = if rng.gen::<bool>() {
            Side::White
        } else {
            Side::Black
        };
        let (white, black) = match challenger_side {
            Side::White => (&challenger, &champion),
            Side::Black => (&champion, &challenger),
        };

        match play_game(white, black, config.max_moves, rng) {
            GameOutcome::Checkmate { winner } => return Ok(winner == challenger_side),
            outcome => debug!(attempt, %outcome, "replaying undecided trial"),
        }
    }

    Err(TrialError::Undecided {
        attempts: config.max_attempts,
    })
}

/// Running record of a head-to-head match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeadToHeadUpdate {
    pub wins: u32,
    pub losses: u32,
    #[serde(flatten)]
    pub estimate: ScoreAndConfidence,
}

/// Runs up to `max_trials` trials, reporting the record after each one.
///
/// `trial` returns whether the challenger won.
pub fn head_to_head<T, E>(
    mut trial: T,
    max_trials: usize,
    mut on_update: impl FnMut(&HeadToHeadUpdate),
) -> Result<HeadToHeadUpdate, E>
where
    T: FnMut() -> Result<bool, E>,
{
    let mut wins = 0;
    let mut losses = 0;
    let mut update = HeadToHeadUpdate {
        wins,
        losses,
        estimate: score_and_confidence(wins, losses),
    };

    for _ in 0..max_trials {
        if trial()? {
            wins += 1;
        } else {
            losses += 1;
        }
        update = HeadToHeadUpdate {
            wins,
            losses,
            estimate: score_and_confidence(wins, losses),
        };
        info!(
            wins,
            losses,
            confidence = update.estimate.confidence,
            "trial finished"
        );
        on_update(&update);
    }
    Ok(update)
}
