use serde::Serialize;

const SIMPSON_INTERVALS: usize = 100;

/// Win rate estimate after a series of decisive games.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreAndConfidence {
    /// Posterior mean of the win probability, `(wins + 1) / (wins + losses + 2)`.
    pub score: f64,
    /// Posterior probability that the win probability is above one half.
    pub confidence: f64,
}

/// Scores a record under a uniform prior on the win probability `p`.
///
/// The posterior is `Beta(wins + 1, losses + 1)`, so `confidence` is the share of
/// `p^wins * (1 - p)^losses` that lies above `p = 0.5`.
pub fn score_and_confidence(wins: u32, losses: u32) -> ScoreAndConfidence {
    let score = f64::from(wins + 1) / f64::from(wins + losses + 2);

    let likelihood = |p: f64| p.powf(f64::from(wins)) * (1.0 - p).powf(f64::from(losses));
    let above_half = simpson(likelihood, 0.5, 1.0, SIMPSON_INTERVALS);
    let total = simpson(likelihood, 0.0, 1.0, SIMPSON_INTERVALS);

    ScoreAndConfidence {
        score,
        confidence: above_half / total,
    }
}

/// Composite Simpson's rule over `n` (even) intervals.
fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let h = (b - a) / n as f64;
    let evens: f64 = (1..n / 2).map(|j| f(a + (2 * j) as f64 * h)).sum();
    let odds: f64 = (1..=n / 2).map(|j| f(a + (2 * j - 1) as f64 * h)).sum();
    h / 3.0 * (f(a) + 2.0 * evens + 4.0 * odds + f(b))
}
