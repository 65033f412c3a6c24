use clap::{Args, Subcommand};

use crate::cli::subcommands::{GlossaryCommands, VocabCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database, seed the built-in vocabulary and write a config file.
    Init(InitArgs),
    /// Controlled vocabularies.
    Vocab {
        #[command(subcommand)]
        action: VocabCommands,
    },
    /// Glossaries.
    Glossary {
        #[command(subcommand)]
        action: GlossaryCommands,
    },
    /// Import a TBX file into a new glossary.
    Import(ImportArgs),
    /// Export glossaries as one TBX file.
    Export(ExportArgs),
}

/// Arguments for `termbase init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Do not seed the built-in vocabulary.
    #[arg(long)]
    pub no_seed: bool,
}

/// Arguments for `termbase import`.
#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// TBX file to read.
    pub file: String,
    /// Name of the glossary to create. Must not be taken.
    #[arg(long)]
    pub name: String,
    /// Defaults to `import.default_source_language`.
    #[arg(long)]
    pub source_language: Option<String>,
    #[arg(long = "other-language")]
    pub other_languages: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for `termbase export`.
#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    /// Glossary ids.
    #[arg(required = true)]
    pub glossary_ids: Vec<i64>,
    /// all, preferred, preferred+admitted, preferred+admitted+not_recommended
    #[arg(long)]
    pub terms: Option<String>,
    #[arg(long)]
    pub include_unfinalized_definitions: bool,
    /// Language to leave out of the export.
    #[arg(long = "remove-language")]
    pub remove_languages: Vec<String>,
    /// Defaults to `export.output_dir`.
    #[arg(long)]
    pub output_dir: Option<String>,
}
