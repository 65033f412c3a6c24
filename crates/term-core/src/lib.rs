//! # term-core
//!
//! Core types shared by every termbase crate.
//!
//! This crate provides:
//! - Entity structs for glossaries, concepts and their per-language children
//! - Vocabulary kinds and the export tier ladder
//! - The vocabulary lookup capability (`VocabularyLookup`) with an in-memory registry
//! - Relationship and attribute validation for concepts and translations
//! - The concept representation cache rules
//! - Response types returned by the CLI
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod repr;
pub mod responses;
pub mod validation;
pub mod vocabulary;
