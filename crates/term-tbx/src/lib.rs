//! # term-tbx
//!
//! TBX (`TermBase` eXchange) import and export for termbase glossaries.
//!
//! - [`import`]: reads a `martif type="TBX"` document into a new glossary.
//!   Concepts are created in document order (phase 1) and their relations are
//!   wired once every `termEntry` has an identity (phase 2), so references may
//!   point forward. A failed import leaves nothing behind.
//! - [`export`]: groups the stored entities of one or more glossaries by
//!   concept and language, filters them by administrative status tier and
//!   streams the result into a TBX document.
//!
//! Parsing uses `roxmltree`; serialization uses `quick-xml`.

pub mod error;
pub mod export;
pub mod import;
pub mod reader;

pub use error::{ExportError, ImportError};
pub use export::{ExportOptions, Exporter};
pub use import::Importer;
