use clap::Parser;
use ryze_dal::rating::{
    DeveloperRatingRepository, RatingStats, ShowcaseRatingRepository, VideoRatingRepository,
};
use ryze_types::config::BackendConfig;
use ryze_types::SubjectKind;
use serde::Serialize;

use crate::commands::{connect, Executor};

#[derive(Parser, Debug)]
pub struct StatsCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Subject kind: developer, showcase or video")]
    subject: SubjectKind,
    #[arg(long, help = "Id of the subject")]
    id: i64,
}

#[derive(Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: RatingStats,
    /// Counts for 1 to 5 stars.
    distribution: [u64; 5],
}

impl Executor for StatsCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;

        let output = match self.subject {
            SubjectKind::Developer => {
                let repo = DeveloperRatingRepository::new(pool);
                StatsOutput {
                    stats: repo.stats(self.id).await?,
                    distribution: repo.distribution(self.id).await?,
                }
            }
            SubjectKind::Showcase => {
                let repo = ShowcaseRatingRepository::new(pool);
                StatsOutput {
                    stats: repo.stats(self.id).await?,
                    distribution: repo.distribution(self.id).await?,
                }
            }
            SubjectKind::Video => {
                let repo = VideoRatingRepository::new(pool);
                StatsOutput {
                    stats: repo.stats(self.id).await?,
                    distribution: repo.distribution(self.id).await?,
                }
            }
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
