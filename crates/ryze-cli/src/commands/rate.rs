use clap::Parser;
use garde::Validate as _;
use ryze_dal::rating::{
    CreateRating, DeveloperRatingRepository, ShowcaseRatingRepository, VideoRatingRepository,
};
use ryze_types::config::BackendConfig;
use ryze_types::{Stars, SubjectKind};

use crate::commands::{connect, Executor, ScoringOpts};

#[derive(Parser, Debug)]
pub struct RateCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[command(flatten)]
    scoring: ScoringOpts,
    #[arg(long, help = "What is rated: developer, showcase or video")]
    subject: SubjectKind,
    #[arg(long, help = "Id of the rated subject")]
    id: i64,
    #[arg(long, help = "Id of the rating user")]
    rater: i64,
    #[arg(short, long, help = "Stars, 1 to 5")]
    stars: Stars,
    #[arg(short, long, help = "Optional review comment")]
    comment: Option<String>,
}

impl Executor for RateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let payload = CreateRating {
            stars: self.stars,
            comment: self.comment,
        };
        payload.validate()?;

        let service = self.scoring.service(pool.clone());
        let update = match self.subject {
            SubjectKind::Developer => {
                DeveloperRatingRepository::new(pool)
                    .rate(self.id, self.rater, payload)
                    .await?;
                service.update_developer_ryze_score(self.id).await?
            }
            SubjectKind::Showcase => {
                ShowcaseRatingRepository::new(pool)
                    .rate(self.id, self.rater, payload)
                    .await?;
                service.update_showcase_ryze_score(self.id).await?
            }
            SubjectKind::Video => {
                VideoRatingRepository::new(pool)
                    .rate(self.id, self.rater, payload)
                    .await?;
                service.update_video_ryze_score(self.id).await?
            }
        };

        println!(
            "Rated {} {}: RYZE score {:.2}, success rate {:.1}% across {} rating(s).",
            self.subject, self.id, update.ryze_score, update.success_rate, update.total_ratings
        );
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct UnrateCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[command(flatten)]
    scoring: ScoringOpts,
    #[arg(long, help = "What was rated: developer, showcase or video")]
    subject: SubjectKind,
    #[arg(long, help = "Id of the rated subject")]
    id: i64,
    #[arg(long, help = "Id of the rating user")]
    rater: i64,
}

impl Executor for UnrateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let service = self.scoring.service(pool.clone());

        let update = match self.subject {
            SubjectKind::Developer => {
                DeveloperRatingRepository::new(pool)
                    .delete(self.id, self.rater)
                    .await?;
                service.update_developer_ryze_score(self.id).await?
            }
            SubjectKind::Showcase => {
                ShowcaseRatingRepository::new(pool)
                    .delete(self.id, self.rater)
                    .await?;
                service.update_showcase_ryze_score(self.id).await?
            }
            SubjectKind::Video => {
                VideoRatingRepository::new(pool)
                    .delete(self.id, self.rater)
                    .await?;
                service.update_video_ryze_score(self.id).await?
            }
        };

        println!(
            "Removed rating from {} {}: RYZE score {:.2} across {} rating(s).",
            self.subject, self.id, update.ryze_score, update.total_ratings
        );
        Ok(())
    }
}
