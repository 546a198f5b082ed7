use clap::Parser;
use ryze_dal::metrics::MetricsRepository;
use ryze_types::config::BackendConfig;

use crate::commands::{connect, Executor};

#[derive(Parser, Debug)]
pub struct MetricsCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Id of the developer profile")]
    developer_id: i64,
}

impl Executor for MetricsCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = connect(&self.backend).await?;
        let metrics = MetricsRepository::new(pool).developer(self.developer_id).await?;
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        Ok(())
    }
}
