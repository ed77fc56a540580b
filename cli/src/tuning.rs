use std::f64::consts::PI;

use chrono::{DateTime, Local};
use minimax_chess::RaterParams;
use rand::{Rng, RngCore};
use serde::Serialize;
use tracing::info;

use crate::confidence::score_and_confidence;

/// Starting point of the reference tuning run, far from anything sensible.
pub const NAIVE_PARAMS: RaterParams = RaterParams {
    bishop: 1.0,
    knight: 1.0,
    rook: 1.0,
    queen: 1.0,
    center_boost: 1.0,
    piece_advancement_boost: 0.0001,
    pawn_near_promotion_boost: 1.0,
};

pub type MutationVector = [f64; RaterParams::LEN];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuningConfig {
    /// A challenger whose confidence rises above this replaces the champion.
    pub accept_threshold: f64,
    /// A challenger that has played and whose confidence, counting one extra win,
    /// is not above this leaves the pool.
    pub reject_threshold: f64,
    pub pool_size: usize,
    /// Standard deviation of the log of each mutation factor.
    pub sigma: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.95,
            reject_threshold: 0.51,
            pool_size: 5,
            sigma: 0.08,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Challenger {
    pub vector: MutationVector,
    pub params: RaterParams,
    pub wins: u32,
    pub losses: u32,
}

impl Challenger {
    /// Confidence used to rank the pool: the record plus one optimistic win.
    fn boosted_confidence(&self) -> f64 {
        score_and_confidence(self.wins + 1, self.losses).confidence
    }
}

/// Progress report emitted after every step of [`HeadToHeadSearch`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TuningUpdate {
    pub champion: RaterParams,
    pub challengers: Vec<ChallengerSummary>,
    pub test_count: u64,
    pub challenger_count: u64,
    pub accept_count: u64,
    pub elapsed_minutes: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChallengerSummary {
    pub vector: MutationVector,
    pub wins: u32,
    pub losses: u32,
    pub confidence: f64,
}

/// Standard normal sample by the Box-Muller transform.
fn std_normal(rng: &mut dyn RngCore) -> f64 {
    // `gen` draws from [0, 1); flip to (0, 1] so the log is finite.
    let u = 1.0 - rng.gen::<f64>();
    let v = 1.0 - rng.gen::<f64>();
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

pub fn generate_mutation_vector(sigma: f64, rng: &mut dyn RngCore) -> MutationVector {
    let mut vector = [0.0; RaterParams::LEN];
    for factor in vector.iter_mut() {
        *factor = (sigma * std_normal(rng)).exp();
    }
    vector
}

pub fn apply_mutation_vector(params: RaterParams, vector: &MutationVector) -> RaterParams {
    let mut values = params.to_array();
    for (value, factor) in values.iter_mut().zip(vector) {
        *value *= factor;
    }
    values.into()
}

/// Hill climbing over [`RaterParams`] by head-to-head games.
///
/// A pool of mutated challengers plays the champion one game at a time. The
/// most promising challenger plays next, a confident winner is promoted, and
/// challengers that keep losing are replaced with fresh mutations.
#[derive(Clone, Debug)]
pub struct HeadToHeadSearch {
    champion: RaterParams,
    pool: Vec<Challenger>,
    config: TuningConfig,
    test_count: u64,
    challenger_count: u64,
    accept_count: u64,
    started_at: DateTime<Local>,
}

impl HeadToHeadSearch {
    pub fn new(champion: RaterParams, config: TuningConfig, rng: &mut dyn RngCore) -> Self {
        let mut search = Self {
            champion,
            pool: Vec::with_capacity(config.pool_size),
            config,
            test_count: 0,
            challenger_count: 0,
            accept_count: 0,
            started_at: Local::now(),
        };
        search.refill_pool(rng);
        search
    }

    pub fn champion(&self) -> RaterParams {
        self.champion
    }

    pub fn pool(&self) -> &[Challenger] {
        &self.pool
    }

    pub fn accept_count(&self) -> u64 {
        self.accept_count
    }

    fn create_challenger(&mut self, rng: &mut dyn RngCore) -> Challenger {
        let vector = generate_mutation_vector(self.config.sigma, rng);
        self.challenger_count += 1;
        Challenger {
            vector,
            params: apply_mutation_vector(self.champion, &vector),
            wins: 0,
            losses: 0,
        }
    }

    fn refill_pool(&mut self, rng: &mut dyn RngCore) {
        while self.pool.len() < self.config.pool_size {
            let challenger = self.create_challenger(rng);
            self.pool.push(challenger);
        }
    }

    /// Index of the challenger with the best boosted confidence, the last one on ties.
    fn pick_challenger(&self) -> Option<usize> {
        self.pool
            .iter()
            .map(Challenger::boosted_confidence)
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(idx, _)| idx)
    }

    fn replace_champion(&mut self, idx: usize) {
        let winner = self.pool.remove(idx);
        self.champion = winner.params;
        for challenger in self.pool.iter_mut() {
            challenger.wins = 0;
            challenger.losses = 0;
            challenger.params = apply_mutation_vector(self.champion, &challenger.vector);
        }
        self.accept_count += 1;
        info!(champion = ?self.champion, wins = winner.wins, losses = winner.losses, "new champion");
    }

    fn churn_pool(&mut self, rng: &mut dyn RngCore) {
        let reject_threshold = self.config.reject_threshold;
        self.pool.retain(|challenger| {
            challenger.wins + challenger.losses == 0
                || challenger.boosted_confidence() > reject_threshold
        });
        self.refill_pool(rng);
    }

    /// Plays one game between the champion and the most promising challenger.
    ///
    /// `test_pair(champion, challenger)` returns whether the challenger won.
    pub fn step<E>(
        &mut self,
        mut test_pair: impl FnMut(RaterParams, RaterParams) -> Result<bool, E>,
        rng: &mut dyn RngCore,
    ) -> Result<(), E> {
        if let Some(idx) = self.pick_challenger() {
            let won = test_pair(self.champion, self.pool[idx].params)?;
            self.test_count += 1;

            let challenger = &mut self.pool[idx];
            if won {
                challenger.wins += 1;
                let confidence = score_and_confidence(challenger.wins, challenger.losses).confidence;
                if confidence > self.config.accept_threshold {
                    self.replace_champion(idx);
                }
            } else {
                challenger.losses += 1;
            }
        }

        self.churn_pool(rng);
        Ok(())
    }

    pub fn update(&self) -> TuningUpdate {
        let mut challengers: Vec<ChallengerSummary> = self
            .pool
            .iter()
            .map(|challenger| ChallengerSummary {
                vector: challenger.vector,
                wins: challenger.wins,
                losses: challenger.losses,
                confidence: score_and_confidence(challenger.wins, challenger.losses).confidence,
            })
            .collect();
        challengers.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let elapsed = Local::now().signed_duration_since(self.started_at);
        TuningUpdate {
            champion: self.champion,
            challengers,
            test_count: self.test_count,
            challenger_count: self.challenger_count,
            accept_count: self.accept_count,
            elapsed_minutes: elapsed.num_milliseconds() as f64 / 60_000.0,
        }
    }

    /// Reports the starting state, then steps `steps` times reporting after each.
    pub fn run<E>(
        &mut self,
        steps: usize,
        mut test_pair: impl FnMut(RaterParams, RaterParams) -> Result<bool, E>,
        rng: &mut dyn RngCore,
        mut on_update: impl FnMut(&TuningUpdate),
    ) -> Result<(), E> {
        on_update(&self.update());
        for _ in 0..steps {
            self.step(&mut test_pair, rng)?;
            on_update(&self.update());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::convert::Infallible;
    use testresult::TestResult;

    fn search(rng: &mut StdRng) -> HeadToHeadSearch {
        HeadToHeadSearch::new(RaterParams::CHAMPION, TuningConfig::default(), rng)
    }

    #[test]
    fn test_new_fills_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let search = search(&mut rng);
        assert_eq!(search.pool().len(), 5);
        assert_eq!(search.update().challenger_count, 5);
        for challenger in search.pool() {
            assert_eq!(
                challenger.params,
                apply_mutation_vector(RaterParams::CHAMPION, &challenger.vector)
            );
        }
    }

    #[test]
    fn test_mutation_vector_is_positive_and_small() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let vector = generate_mutation_vector(0.08, &mut rng);
            assert!(vector.iter().all(|&f| f > 0.5 && f < 2.0), "{:?}", vector);
        }
    }

    #[test]
    fn test_apply_mutation_vector() {
        let doubled = apply_mutation_vector(NAIVE_PARAMS, &[2.0; RaterParams::LEN]);
        assert_eq!(doubled.queen, 2.0);
        assert_eq!(doubled.piece_advancement_boost, 0.0002);
    }

    #[test]
    fn test_losers_are_churned() -> TestResult {
        let mut rng = StdRng::seed_from_u64(1);
        let mut search = search(&mut rng);

        search.step(|_, _| Ok::<_, Infallible>(false), &mut rng)?;

        // One loss gives a boosted confidence of exactly one half, below 0.51.
        assert_eq!(search.pool().len(), 5);
        assert!(search.pool().iter().all(|ch| ch.wins + ch.losses == 0));
        assert_eq!(search.update().challenger_count, 6);
        assert_eq!(search.update().test_count, 1);
        Ok(())
    }

    #[test]
    fn test_winner_is_promoted() -> TestResult {
        let mut rng = StdRng::seed_from_u64(2);
        let mut search = search(&mut rng);
        let first_pick = search.pick_challenger().ok_or("empty pool")?;
        let first = search.pool()[first_pick];

        // Wins keep the same challenger on top until 4-0 crosses 0.95.
        for _ in 0..4 {
            search.step(|_, _| Ok::<_, Infallible>(true), &mut rng)?;
        }

        assert_eq!(search.accept_count(), 1);
        assert_eq!(search.champion(), first.params);
        assert_eq!(search.pool().len(), 5);
        for challenger in search.pool() {
            assert_eq!(challenger.wins + challenger.losses, 0);
            assert_eq!(
                challenger.params,
                apply_mutation_vector(first.params, &challenger.vector)
            );
        }
        Ok(())
    }

    #[test]
    fn test_run_reports_every_step() -> TestResult {
        let mut rng = StdRng::seed_from_u64(3);
        let mut search = search(&mut rng);
        let mut updates = Vec::new();

        let mut flip = false;
        search.run(
            3,
            |_, _| {
                flip = !flip;
                Ok::<_, Infallible>(flip)
            },
            &mut rng,
            |update| updates.push(update.test_count),
        )?;

        assert_eq!(updates, vec![0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_update_serializes() -> TestResult {
        let mut rng = StdRng::seed_from_u64(4);
        let json = serde_json::to_value(search(&mut rng).update())?;
        assert_eq!(json["champion"]["queen"], 9.0);
        assert_eq!(json["challengers"].as_array().map(Vec::len), Some(5));
        Ok(())
    }
}
