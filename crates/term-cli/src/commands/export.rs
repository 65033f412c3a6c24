use std::path::PathBuf;

use term_core::enums::ExportTerms;
use term_core::responses::ExportResponse;
use term_tbx::{ExportOptions, Exporter};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExportArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `termbase export`.
pub async fn handle(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = run(args, ctx).await?;
    output(&response, flags.format)
}

pub async fn run(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<ExportResponse> {
    let options = options(args, ctx)?;
    let dir = PathBuf::from(
        args.output_dir
            .as_deref()
            .unwrap_or(&ctx.config.export.output_dir),
    );
    Ok(Exporter::new(&ctx.service)
        .export_to_dir(&args.glossary_ids, &options, &dir)
        .await?)
}

/// Command-line flags over the `export` config section.
fn options(args: &ExportArgs, ctx: &AppContext) -> anyhow::Result<ExportOptions> {
    let terms: ExportTerms = match &args.terms {
        Some(raw) => parse_enum(raw, "terms")?,
        None => ctx.config.export.terms,
    };
    Ok(ExportOptions {
        desired_languages: args.remove_languages.clone(),
        include_unfinalized_definitions: args.include_unfinalized_definitions
            || ctx.config.export.include_unfinalized_definitions,
        terms,
    })
}
