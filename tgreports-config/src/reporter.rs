//! Reporter identity.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Deployment mode label (`DEV`, `PRE`, `PROD`, ...). `PRE` and `PROD`
    /// forward `info` reports to chat.
    #[validate(custom(function = validation::validate_mode))]
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "DEV".into()
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
        }
    }
}
