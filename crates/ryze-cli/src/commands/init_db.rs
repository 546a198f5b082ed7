use clap::Parser;
use ryze_types::config::BackendConfig;

use crate::commands::Executor;

#[derive(Parser, Debug)]
pub struct InitDbCmd {
    #[command(flatten)]
    backend: BackendConfig,
}

impl Executor for InitDbCmd {
    async fn run(self) -> anyhow::Result<()> {
        let db_url = self.backend.database_url();
        let pool = ryze_dal::create_pool(&db_url).await?;
        sqlx::migrate!("../../migrations").run(&pool).await?;
        println!("Schema ready at {db_url}.");
        Ok(())
    }
}
