use clap::Parser;
use ryze_dal::developer::DeveloperRepository;
use ryze_dal::showcase::ShowcaseRepository;
use ryze_dal::video::VideoRepository;
use ryze_dal::{ListingParams, Order};
use ryze_types::config::BackendConfig;
use ryze_types::SubjectKind;

use crate::commands::{connect, Executor};

#[derive(Parser, Debug)]
pub struct TopCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Subject kind: developer, showcase or video")]
    subject: SubjectKind,
    #[arg(long, default_value_t = 10)]
    limit: i64,
}

impl Executor for TopCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;

        println!("Top {}s by RYZE score:", self.subject);
        match self.subject {
            SubjectKind::Developer => {
                let params = ListingParams::new(0, self.limit)
                    .with_order(vec![Order::Desc("rating".into())]);
                for profile in DeveloperRepository::new(pool).list(params).await? {
                    println!(
                        "- {} (id {}) score {:.2}, success rate {:.1}%",
                        profile.display_name, profile.id, profile.rating, profile.success_rate
                    );
                }
            }
            SubjectKind::Showcase => {
                let params = ListingParams::new(0, self.limit)
                    .with_order(vec![Order::Desc("average_rating".into())]);
                for showcase in ShowcaseRepository::new(pool).list(params).await? {
                    println!(
                        "- {} (id {}) score {:.2} across {} rating(s)",
                        showcase.title, showcase.id, showcase.average_rating, showcase.total_ratings
                    );
                }
            }
            SubjectKind::Video => {
                let params = ListingParams::new(0, self.limit)
                    .with_order(vec![Order::Desc("average_rating".into())]);
                for video in VideoRepository::new(pool).list(params).await? {
                    println!(
                        "- {} (id {}) score {:.2} across {} rating(s)",
                        video.title, video.id, video.average_rating, video.total_ratings
                    );
                }
            }
        }

        Ok(())
    }
}
