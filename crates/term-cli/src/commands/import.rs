use std::path::Path;

use anyhow::Context;
use term_core::entities::NewGlossary;
use term_core::responses::ImportResponse;
use term_tbx::Importer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `termbase import`.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = run(args, ctx).await?;
    output(&response, flags.format)
}

pub async fn run(args: &ImportArgs, ctx: &AppContext) -> anyhow::Result<ImportResponse> {
    let source_language = args
        .source_language
        .clone()
        .unwrap_or_else(|| ctx.config.import.default_source_language.clone());
    let mut glossary =
        NewGlossary::new(&args.name, source_language).other_languages(&args.other_languages);
    if let Some(description) = &args.description {
        glossary = glossary.description(description);
    }

    Importer::new(&ctx.service)
        .import_path(&glossary, Path::new(&args.file))
        .await
        .with_context(|| format!("failed to import {}", args.file))
}
