//! TBX export configuration.

use serde::{Deserialize, Serialize};
use term_core::enums::ExportTerms;

fn default_output_dir() -> String {
    ".".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Export definitions that are not finalized yet.
    #[serde(default)]
    pub include_unfinalized_definitions: bool,

    /// Default export tier.
    #[serde(default)]
    pub terms: ExportTerms,

    /// Directory the exported file is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_unfinalized_definitions: false,
            terms: ExportTerms::All,
            output_dir: default_output_dir(),
        }
    }
}
