//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default tracing filter (e.g. `term_tbx=debug`), used when `TERMBASE_LOG`
    /// is unset and neither `--quiet` nor `--verbose` is given.
    #[serde(default)]
    pub log_filter: Option<String>,
}
