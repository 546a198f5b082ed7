pub mod add;
pub mod init_db;
pub mod metrics;
pub mod rate;
pub mod recompute;
pub mod stats;
pub mod top;

use clap::Args;
use ryze_dal::score::ScoreService;
use ryze_scoring::{ScoringParams, Strategy};
use ryze_types::config::BackendConfig;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

/// Scoring calibration shared by all commands that compute scores.
#[derive(Args, Debug, Clone)]
pub struct ScoringOpts {
    #[arg(
        long,
        env = "RYZE_CONFIDENCE_THRESHOLD",
        default_value_t = ryze_scoring::DEFAULT_CONFIDENCE_THRESHOLD,
        help = "Rating count at which the prior and the observed average weigh equally"
    )]
    pub confidence_threshold: u32,

    #[arg(
        long,
        env = "RYZE_GLOBAL_AVERAGE",
        default_value_t = ryze_scoring::DEFAULT_GLOBAL_AVERAGE,
        help = "Platform-wide prior average on the 0-5 scale"
    )]
    pub global_average: f64,

    #[arg(
        long,
        env = "RYZE_STRATEGY",
        default_value = "bayesian",
        help = "Scoring formula: bayesian, wilson, volume or imdb"
    )]
    pub strategy: Strategy,
}

impl ScoringOpts {
    pub fn params(&self) -> ScoringParams {
        ScoringParams::new(self.confidence_threshold, self.global_average)
    }

    pub fn service(&self, pool: ryze_dal::Pool) -> ScoreService {
        ScoreService::new(pool, self.strategy, self.params())
    }
}

pub async fn connect(backend: &BackendConfig) -> anyhow::Result<ryze_dal::Pool> {
    Ok(ryze_dal::new_pool(&backend.database_url()).await?)
}
