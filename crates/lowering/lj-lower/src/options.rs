//! Lowering options

use crate::names::TemporaryNames;
use serde::{Deserialize, Serialize};

/// Knobs for the target environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LowerOptions {
    /// Function called by `use 'path'`
    pub require_callee: String,
    /// Object that `export name` assigns onto, possibly dotted
    pub exports_target: String,
    /// Temporary naming strategy
    pub temporaries: TemporaryNames,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            require_callee: "require".to_string(),
            exports_target: "module.exports".to_string(),
            temporaries: TemporaryNames::default(),
        }
    }
}
