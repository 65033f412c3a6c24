//! Repository implementations as `impl TermService` blocks.
//!
//! Each module adds methods for one entity family:
//! - `vocabulary` — seeding and loading the controlled vocabularies
//! - `glossary` — create, list, delete glossaries
//! - `concept` — concepts, their relations, and the representation cache
//! - `translation`, `definition`, `resource`, `example`, `summary` — per-language children
//! - `export` — bulk loaders and the concept cursor used by the exporter

pub mod concept;
pub mod definition;
pub mod example;
pub mod export;
pub mod glossary;
pub mod resource;
pub mod summary;
pub mod translation;
pub mod vocabulary;
