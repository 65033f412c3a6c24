use std::path::Path;

use term_core::enums::VocabularyKind;
use term_core::responses::{VocabularyListResponse, VocabularySeedResponse};
use term_db::seed::VocabularySeed;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VocabCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

const BUILTIN_SEED: &str = "builtin";

/// Handle `termbase vocab`.
pub async fn handle(action: &VocabCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        VocabCommands::Seed { file } => output(&seed(file.as_deref(), ctx).await?, flags.format),
        VocabCommands::List { kind } => output(&list(kind, ctx).await?, flags.format),
    }
}

async fn seed(file: Option<&str>, ctx: &AppContext) -> anyhow::Result<VocabularySeedResponse> {
    let (source, seed) = match file {
        Some(path) => (path.to_string(), VocabularySeed::from_path(Path::new(path))?),
        None => (BUILTIN_SEED.to_string(), VocabularySeed::builtin()?),
    };
    let inserted = ctx.service.seed_vocabulary(&seed).await?;
    Ok(VocabularySeedResponse { source, inserted })
}

async fn list(kind: &str, ctx: &AppContext) -> anyhow::Result<VocabularyListResponse> {
    let kind: VocabularyKind = parse_enum(kind, "vocabulary kind")?;
    let terms = ctx.service.list_vocabulary(kind).await?;
    Ok(VocabularyListResponse { kind, terms })
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
    async fn seed_from_file_then_list() {
        let ctx = memory_context().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.toml");
        std::fs::write(
            &path,
            r#"
[[languages]]
code = "en"
name = "English"

[[external_link_types]]
name = "Web page"
representation = "externalCrossReference"
"#,
        )
        .unwrap();

        let seeded = seed(Some(path.to_str().unwrap()), &ctx).await.unwrap();
        assert_eq!(seeded.inserted, 2);

        let listed = list("external-link-type", &ctx).await.unwrap();
        assert_eq!(listed.kind, VocabularyKind::ExternalLinkType);
        let names: Vec<_> = listed.terms.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Web page"]);
    }

    #[tokio::test]
    async fn builtin_seed_reports_its_source() {
        let ctx = memory_context().await;
        let seeded = seed(None, &ctx).await.unwrap();
        assert_eq!(seeded.source, "builtin");
        assert!(seeded.inserted > 0);

        let statuses = list("administrative_status", &ctx).await.unwrap();
        assert_eq!(statuses.terms.len(), 4);
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let ctx = memory_context().await;
        let err = list("colour", &ctx).await.unwrap_err();
        assert!(err.to_string().contains("invalid vocabulary kind 'colour'"));
    }
}
