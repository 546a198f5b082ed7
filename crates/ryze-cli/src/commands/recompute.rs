use clap::Parser;
use ryze_types::config::BackendConfig;
use ryze_types::SubjectKind;
use tracing::debug;

use crate::commands::{connect, Executor, ScoringOpts};

#[derive(Parser, Debug)]
pub struct RecomputeCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[command(flatten)]
    scoring: ScoringOpts,
    #[arg(long, help = "Which subject kind to recompute")]
    subject: SubjectKind,
    #[arg(long, help = "Recompute only this subject id, all of the kind otherwise")]
    id: Option<i64>,
}

impl Executor for RecomputeCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let service = self.scoring.service(pool.clone());

        let ids = match self.id {
            Some(id) => vec![id],
            None => {
                let sql = match self.subject {
                    SubjectKind::Developer => "SELECT id FROM developer_profile",
                    SubjectKind::Showcase => "SELECT id FROM showcase",
                    SubjectKind::Video => "SELECT id FROM video",
                };
                sqlx::query_scalar::<_, i64>(sql).fetch_all(&pool).await?
            }
        };

        for id in &ids {
            let update = match self.subject {
                SubjectKind::Developer => service.update_developer_ryze_score(*id).await?,
                SubjectKind::Showcase => service.update_showcase_ryze_score(*id).await?,
                SubjectKind::Video => service.update_video_ryze_score(*id).await?,
            };
            debug!(
                "Recomputed {} {id}: score {:.2}",
                self.subject, update.ryze_score
            );
        }

        println!(
            "Recomputed {} {} score(s) with the {} strategy.",
            ids.len(),
            self.subject,
            self.scoring.strategy
        );
        Ok(())
    }
}
