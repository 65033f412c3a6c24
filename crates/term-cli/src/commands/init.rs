use std::path::Path;

use term_config::PROJECT_CONFIG_PATH;
use term_core::responses::InitResponse;
use term_db::seed::VocabularySeed;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `termbase init`.
pub async fn handle(args: &InitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = run(args, ctx, Path::new(PROJECT_CONFIG_PATH)).await?;
    output(&response, flags.format)
}

pub async fn run(args: &InitArgs, ctx: &AppContext, config_path: &Path) -> anyhow::Result<InitResponse> {
    let seeded = if args.no_seed {
        0
    } else {
        ctx.service.seed_vocabulary(&VocabularySeed::builtin()?).await?
    };
    let written = bootstrap::write_default_config(&ctx.config, config_path)?;
    tracing::info!(database = %ctx.config.database.path, seeded, written, "termbase initialized");

    Ok(InitResponse {
        database: ctx.config.database.path.clone(),
        config: written.then(|| config_path.display().to_string()),
        seeded,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use term_config::{IN_MEMORY, TermConfig};

    use super::*;

    async fn memory_context() -> AppContext {
        let mut config = TermConfig::default();
        config.database.path = IN_MEMORY.into();
        AppContext::init(config).await.unwrap()
    }

    #[tokio::test]
    async fn init_seeds_once_and_writes_config() {
        let ctx = memory_context().await;
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let first = run(&InitArgs { no_seed: false }, &ctx, &config_path).await.unwrap();
        assert!(first.seeded > 0);
        assert_eq!(first.database, ":memory:");
        assert_eq!(first.config, Some(config_path.display().to_string()));

        let second = run(&InitArgs { no_seed: false }, &ctx, &config_path).await.unwrap();
        assert_eq!(second.seeded, 0);
        assert_eq!(second.config, None);
    }

    #[tokio::test]
    async fn no_seed_leaves_vocabulary_empty() {
        let ctx = memory_context().await;
        let dir = tempfile::tempdir().unwrap();

        let response = run(&InitArgs { no_seed: true }, &ctx, &dir.path().join("config.toml"))
            .await
            .unwrap();

        assert_eq!(response.seeded, 0);
        assert!(ctx.service.load_vocabulary().await.unwrap().is_empty());
    }
}
