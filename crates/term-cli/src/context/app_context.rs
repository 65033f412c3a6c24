use anyhow::Context;
use term_config::TermConfig;
use term_db::service::TermService;

use crate::bootstrap;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: TermService,
    pub config: TermConfig,
}

impl AppContext {
    /// Open the configured database, creating its directory if needed.
    pub async fn init(config: TermConfig) -> anyhow::Result<Self> {
        bootstrap::ensure_database_dir(&config)?;
        let service = TermService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database {}", config.database.path))?
            .with_language_rules(config.import.enforce_language_rules);
        Ok(Self { service, config })
    }
}
