//! RYZE reputation scoring - blends an entity's observed rating average with
//! a platform-wide prior, weighted by rating volume, so that sparsely rated
//! entities regress toward the baseline while heavily rated ones converge to
//! their true average.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound of the star rating scale.
pub const RATING_SCALE: f64 = 5.0;
/// Maps the 0-5 score to a 0-100 percentage.
pub const PERCENT_SCALE: f64 = 20.0;
/// z for a 95% confidence interval, used by the Wilson lower bound.
const WILSON_Z: f64 = 1.96;

pub const DEFAULT_CONFIDENCE_THRESHOLD: u32 = 10;
pub const DEFAULT_GLOBAL_AVERAGE: f64 = 3.0;

/// Calibration of the prior. `confidence_threshold` is the rating count at
/// which the prior and the observed average contribute equally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub confidence_threshold: u32,
    pub global_average: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            global_average: DEFAULT_GLOBAL_AVERAGE,
        }
    }
}

impl ScoringParams {
    pub fn new(confidence_threshold: u32, global_average: f64) -> Self {
        Self {
            confidence_threshold,
            global_average,
        }
    }
}

/// Bayesian average of the observed rating. Returns 0 for unrated entities,
/// otherwise a blend that approaches `average_rating` as the count grows.
pub fn bayesian_average(average_rating: f64, total_ratings: u64, params: &ScoringParams) -> f64 {
    if total_ratings == 0 {
        return 0.0;
    }
    let n = total_ratings as f64;
    let m = params.confidence_threshold as f64;
    (m * params.global_average + n * average_rating) / (m + n)
}

/// RYZE score as a percentage, capped at 100.
pub fn success_rate(average_rating: f64, total_ratings: u64, params: &ScoringParams) -> f64 {
    (bayesian_average(average_rating, total_ratings, params) * PERCENT_SCALE).min(100.0)
}

fn wilson_lower_bound(average_rating: f64, total_ratings: u64) -> f64 {
    if total_ratings == 0 {
        return 0.0;
    }
    let n = total_ratings as f64;
    let p = (average_rating / RATING_SCALE).clamp(0.0, 1.0);
    let z2 = WILSON_Z * WILSON_Z;
    let centre = p + z2 / (2.0 * n);
    let spread = WILSON_Z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();
    ((centre - spread) / (1.0 + z2 / n)).max(0.0) * RATING_SCALE
}

fn volume_weighted(average_rating: f64, total_ratings: u64, params: &ScoringParams) -> f64 {
    if total_ratings == 0 {
        return 0.0;
    }
    let n = total_ratings as f64;
    let m = params.confidence_threshold as f64;
    average_rating * n / (n + m)
}

fn imdb_weighted(average_rating: f64, total_ratings: u64, params: &ScoringParams) -> f64 {
    let n = total_ratings as f64;
    // minimum votes must stay positive, the denominator is safe then
    let m = params.confidence_threshold.max(1) as f64;
    (n / (n + m)) * average_rating + (m / (n + m)) * params.global_average
}

/// Interchangeable scoring formulas sharing the
/// `(average_rating, total_ratings) -> score` contract on the 0-5 scale.
/// `Bayesian` is the live default; the rest are alternates for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Bayesian,
    Wilson,
    Volume,
    Imdb,
}

impl Strategy {
    pub fn score(&self, average_rating: f64, total_ratings: u64, params: &ScoringParams) -> f64 {
        match self {
            Strategy::Bayesian => bayesian_average(average_rating, total_ratings, params),
            Strategy::Wilson => wilson_lower_bound(average_rating, total_ratings),
            Strategy::Volume => volume_weighted(average_rating, total_ratings, params),
            Strategy::Imdb => imdb_weighted(average_rating, total_ratings, params),
        }
    }

    pub fn success_rate(
        &self,
        average_rating: f64,
        total_ratings: u64,
        params: &ScoringParams,
    ) -> f64 {
        (self.score(average_rating, total_ratings, params) * PERCENT_SCALE).min(100.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown scoring strategy: {0}")]
pub struct UnknownStrategy(String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bayesian" => Ok(Strategy::Bayesian),
            "wilson" => Ok(Strategy::Wilson),
            "volume" => Ok(Strategy::Volume),
            "imdb" => Ok(Strategy::Imdb),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Bayesian => write!(f, "bayesian"),
            Strategy::Wilson => write!(f, "wilson"),
            Strategy::Volume => write!(f, "volume"),
            Strategy::Imdb => write!(f, "imdb"),
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    const EPS: f64 = 1e-9;

    fn arb_average(raw: u16) -> f64 {
        (raw % 501) as f64 / 100.0
    }

    #[test]
    fn test_bayesian_worked_examples() {
        let params = ScoringParams::default();
        assert!((bayesian_average(5.0, 1, &params) - 35.0 / 11.0).abs() < EPS);
        assert!((bayesian_average(5.0, 10, &params) - 4.0).abs() < EPS);
        assert!((bayesian_average(5.0, 100, &params) - 530.0 / 110.0).abs() < EPS);
        assert!((success_rate(5.0, 100, &params) - 9636.0 / 100.0).abs() < 0.04);
    }

    #[test]
    fn test_unrated_scores_zero() {
        let params = ScoringParams::default();
        for r in [0.0, 2.5, 5.0] {
            assert_eq!(bayesian_average(r, 0, &params), 0.0);
            assert_eq!(success_rate(r, 0, &params), 0.0);
        }
    }

    #[test]
    fn test_success_rate_capped() {
        // threshold 0 degenerates to the raw average, which would map past 100
        let params = ScoringParams::new(0, 3.0);
        assert_eq!(success_rate(5.2, 3, &params), 100.0);
    }

    #[test]
    fn test_imdb_keeps_prior_at_zero_votes() {
        let params = ScoringParams::default();
        assert!((Strategy::Imdb.score(5.0, 0, &params) - params.global_average).abs() < EPS);
        assert_eq!(Strategy::Bayesian.score(5.0, 0, &params), 0.0);
    }

    #[test]
    fn test_strategy_parsing() {
        for strategy in [
            Strategy::Bayesian,
            Strategy::Wilson,
            Strategy::Volume,
            Strategy::Imdb,
        ] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert!("elo".parse::<Strategy>().is_err());
    }

    #[quickcheck]
    fn prop_blend_stays_between_prior_and_observed(raw: u16, count: u32) -> bool {
        let params = ScoringParams::default();
        let average = arb_average(raw);
        let count = count as u64 % 10_000 + 1;
        let score = bayesian_average(average, count, &params);
        let lo = average.min(params.global_average) - EPS;
        let hi = average.max(params.global_average) + EPS;
        score >= lo && score <= hi
    }

    #[quickcheck]
    fn prop_monotonic_in_average(a: u16, b: u16, count: u32) -> bool {
        let params = ScoringParams::default();
        let (lo, hi) = {
            let a = arb_average(a);
            let b = arb_average(b);
            (a.min(b), a.max(b))
        };
        let count = count as u64 % 1000;
        bayesian_average(lo, count, &params) <= bayesian_average(hi, count, &params) + EPS
    }

    #[quickcheck]
    fn prop_converges_to_observed(raw: u16) -> bool {
        let params = ScoringParams::default();
        let average = arb_average(raw);
        // at n = 1000 the blend sits within 1% of the scale from the average
        (bayesian_average(average, 1000, &params) - average).abs() <= RATING_SCALE / 100.0
    }

    #[quickcheck]
    fn prop_success_rate_bounded(raw: u16, count: u32) -> bool {
        let params = ScoringParams::default();
        let rate = success_rate(arb_average(raw), count as u64, &params);
        (0.0..=100.0).contains(&rate)
    }

    #[quickcheck]
    fn prop_imdb_matches_bayesian_when_rated(raw: u16, count: u32) -> bool {
        let params = ScoringParams::default();
        let average = arb_average(raw);
        let count = count as u64 % 10_000 + 1;
        let diff = Strategy::Imdb.score(average, count, &params)
            - Strategy::Bayesian.score(average, count, &params);
        diff.abs() < EPS
    }

    #[quickcheck]
    fn prop_alternates_stay_on_scale(raw: u16, count: u32) -> bool {
        let params = ScoringParams::default();
        let average = arb_average(raw);
        let count = count as u64 % 10_000;
        [Strategy::Wilson, Strategy::Volume, Strategy::Imdb]
            .iter()
            .all(|s| {
                let score = s.score(average, count, &params);
                (0.0..=RATING_SCALE + EPS).contains(&score)
            })
    }

    #[quickcheck]
    fn prop_wilson_never_exceeds_observed(raw: u16, count: u32) -> bool {
        let params = ScoringParams::default();
        let average = arb_average(raw);
        let count = count as u64 % 10_000 + 1;
        Strategy::Wilson.score(average, count, &params) <= average + EPS
    }
}
