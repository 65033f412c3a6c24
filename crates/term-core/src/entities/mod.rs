//! Entity structs for glossaries, concepts and their children.
//!
//! Each entity maps to a table in the libSQL store. Identities are integer row
//! ids assigned by the store; the `New*` structs carry the fields a caller
//! supplies before an identity exists. All structs derive `Serialize`,
//! `Deserialize` and `JsonSchema` for JSON output and schema validation.

mod concept;
mod definition;
mod example;
mod glossary;
mod resource;
mod summary;
mod translation;
mod vocabulary;

pub use concept::{Concept, ConceptRef};
pub use definition::{Definition, DefinitionHistoryEntry, NewDefinition};
pub use example::{ContextSentence, CorpusExample};
pub use glossary::{Glossary, NewGlossary};
pub use resource::{ExternalResource, NewExternalResource};
pub use summary::ConceptInLanguage;
pub use translation::{NewTranslation, Translation};
pub use vocabulary::{GrammarAllowance, LanguageRules, VocabularyTerm};
