//! TBX import configuration.

use serde::{Deserialize, Serialize};

fn default_source_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Also reject part of speech, gender, number and reason values the
    /// translation's language does not allow.
    #[serde(default)]
    pub enforce_language_rules: bool,

    /// Source language of glossaries created by `termbase import` when none is given.
    #[serde(default = "default_source_language")]
    pub default_source_language: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            enforce_language_rules: false,
            default_source_language: default_source_language(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ImportConfig::default();
        assert!(!config.enforce_language_rules);
        assert_eq!(config.default_source_language, "en");
    }
}
