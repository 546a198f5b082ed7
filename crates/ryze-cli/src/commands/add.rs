use clap::Parser;
use garde::Validate as _;
use ryze_dal::developer::{CreateDeveloper, DeveloperRepository};
use ryze_dal::showcase::{CreateShowcase, ShowcaseRepository};
use ryze_dal::video::{CreateVideo, VideoRepository};
use ryze_types::config::BackendConfig;

use crate::commands::{connect, Executor};

#[derive(Parser, Debug)]
pub struct AddDeveloperCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Display name of the developer")]
    name: String,
    #[arg(long, help = "Short headline shown on the profile")]
    headline: Option<String>,
}

impl Executor for AddDeveloperCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let payload = CreateDeveloper {
            display_name: self.name,
            headline: self.headline,
            version: None,
        };
        payload.validate()?;
        let profile = DeveloperRepository::new(pool).create(payload).await?;
        println!(
            "Created developer profile {} ({}).",
            profile.id, profile.display_name
        );
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct AddShowcaseCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Id of the developer profile owning the showcase")]
    developer_id: i64,
    #[arg(short, long, help = "Showcase title")]
    title: String,
    #[arg(long, help = "Showcase description")]
    description: Option<String>,
}

impl Executor for AddShowcaseCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let payload = CreateShowcase {
            developer_id: self.developer_id,
            title: self.title,
            description: self.description,
        };
        payload.validate()?;
        let showcase = ShowcaseRepository::new(pool).create(payload).await?;
        println!("Created showcase {} ({}).", showcase.id, showcase.title);
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub struct AddVideoCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Id of the developer profile owning the video")]
    developer_id: i64,
    #[arg(short, long, help = "Video title")]
    title: String,
    #[arg(long, help = "Public URL of the video")]
    url: Option<String>,
}

impl Executor for AddVideoCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let payload = CreateVideo {
            developer_id: self.developer_id,
            title: self.title,
            url: self.url,
        };
        payload.validate()?;
        let video = VideoRepository::new(pool).create(payload).await?;
        println!("Created video {} ({}).", video.id, video.title);
        Ok(())
    }
}
