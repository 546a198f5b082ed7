use clap::{Parser, Subcommand};

use crate::commands::{
    add::{AddDeveloperCmd, AddShowcaseCmd, AddVideoCmd},
    init_db::InitDbCmd,
    metrics::MetricsCmd,
    rate::{RateCmd, UnrateCmd},
    recompute::RecomputeCmd,
    stats::StatsCmd,
    top::TopCmd,
};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for RYZE reputation scoring - manages rated subjects, their ratings and the derived reputation scores."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or upgrade the database schema
    InitDb(InitDbCmd),
    /// Add a developer profile
    AddDeveloper(AddDeveloperCmd),
    /// Add a project showcase for a developer
    AddShowcase(AddShowcaseCmd),
    /// Add a video for a developer
    AddVideo(AddVideoCmd),
    /// Submit or replace a rating and refresh the subject's score
    Rate(RateCmd),
    /// Remove a rater's rating and refresh the subject's score
    Unrate(UnrateCmd),
    /// Recompute stored scores, e.g. after recalibrating the scoring config
    Recompute(RecomputeCmd),
    /// Show the rating aggregate and star distribution of a subject
    Stats(StatsCmd),
    /// List subjects ranked by stored score
    Top(TopCmd),
    /// Show a developer's cross-entity reputation metrics
    Metrics(MetricsCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::InitDb(cmd) => cmd.run().await,
            Command::AddDeveloper(cmd) => cmd.run().await,
            Command::AddShowcase(cmd) => cmd.run().await,
            Command::AddVideo(cmd) => cmd.run().await,
            Command::Rate(cmd) => cmd.run().await,
            Command::Unrate(cmd) => cmd.run().await,
            Command::Recompute(cmd) => cmd.run().await,
            Command::Stats(cmd) => cmd.run().await,
            Command::Top(cmd) => cmd.run().await,
            Command::Metrics(cmd) => cmd.run().await,
        }
    }
}
