use term_core::responses::{GlossaryDeleteResponse, GlossaryListResponse, GlossarySummary};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GlossaryCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `termbase glossary`.
pub async fn handle(
    action: &GlossaryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GlossaryCommands::List => output(&list(ctx).await?, flags.format),
        GlossaryCommands::Delete { id } => output(&delete(*id, ctx).await?, flags.format),
    }
}

async fn list(ctx: &AppContext) -> anyhow::Result<GlossaryListResponse> {
    let mut glossaries = Vec::new();
    for glossary in ctx.service.list_glossaries().await? {
        let concepts = ctx.service.count_concepts(glossary.id).await?;
        glossaries.push(GlossarySummary { glossary, concepts });
    }
    Ok(GlossaryListResponse { glossaries })
}

async fn delete(id: i64, ctx: &AppContext) -> anyhow::Result<GlossaryDeleteResponse> {
    let deleted = ctx.service.purge_glossary(id).await?;
    if !deleted {
        anyhow::bail!("glossary {id} does not exist");
    }
    tracing::info!(id, "glossary deleted");
    Ok(GlossaryDeleteResponse { id, deleted })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use term_config::{IN_MEMORY, TermConfig};
    use term_core::entities::NewGlossary;
    use term_db::seed::VocabularySeed;

    use super::*;

    async fn seeded_context() -> AppContext {
        let mut config = TermConfig::default();
        config.database.path = IN_MEMORY.into();
        let ctx = AppContext::init(config).await.unwrap();
        ctx.service
            .seed_vocabulary(&VocabularySeed::builtin().unwrap())
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn list_counts_concepts_then_delete() {
        let ctx = seeded_context().await;
        let vocab = ctx.service.load_vocabulary().await.unwrap();
        let glossary = ctx
            .service
            .create_glossary(&NewGlossary::new("Automotive", "en"), &vocab)
            .await
            .unwrap();
        ctx.service.create_concept(glossary.id).await.unwrap();
        ctx.service.create_concept(glossary.id).await.unwrap();

        let listed = list(&ctx).await.unwrap();
        assert_eq!(listed.glossaries.len(), 1);
        assert_eq!(listed.glossaries[0].glossary.name, "Automotive");
        assert_eq!(listed.glossaries[0].concepts, 2);

        let deleted = delete(glossary.id, &ctx).await.unwrap();
        assert!(deleted.deleted);
        assert!(list(&ctx).await.unwrap().glossaries.is_empty());
    }

    #[tokio::test]
    async fn deleting_unknown_glossary_fails() {
        let ctx = seeded_context().await;
        let err = delete(42, &ctx).await.unwrap_err();
        assert!(err.to_string().contains("glossary 42 does not exist"));
    }
}
