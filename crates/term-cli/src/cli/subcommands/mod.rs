mod glossary;
mod vocab;

pub use glossary::GlossaryCommands;
pub use vocab::VocabCommands;
