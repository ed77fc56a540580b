mod confidence;
mod head_to_head;
mod self_play;
mod tuning;

pub use confidence::{score_and_confidence, ScoreAndConfidence};
pub use head_to_head::{
    head_to_head, run_trial, HeadToHeadUpdate, TrialConfig, TrialError, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_MOVES,
};
pub use self_play::{play_game, play_game_from, GameOutcome, MoveStrategy, PlayedGame, RaterStrategy};
pub use tuning::{
    apply_mutation_vector, generate_mutation_vector, Challenger, ChallengerSummary,
    HeadToHeadSearch, MutationVector, TuningConfig, TuningUpdate, NAIVE_PARAMS,
};
