use clap::Subcommand;

/// Vocabulary commands.
#[derive(Clone, Debug, Subcommand)]
pub enum VocabCommands {
    /// Seed vocabulary terms. Existing representations are kept.
    Seed {
        /// Seed TOML file; the built-in seed when omitted.
        #[arg(long)]
        file: Option<String>,
    },
    /// List the terms of one vocabulary.
    List {
        /// language, part-of-speech, grammatical-gender, grammatical-number,
        /// administrative-status, administrative-status-reason, external-link-type
        kind: String,
    },
}
