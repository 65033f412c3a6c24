use clap::Subcommand;

/// Glossary commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GlossaryCommands {
    /// List glossaries with their concept counts.
    List,
    /// Delete a glossary and everything in it.
    Delete { id: i64 },
}
