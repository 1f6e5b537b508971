//! Search query parameters.

use serde::{Deserialize, Serialize};

/// Filters supported by the search operation.
///
/// One explicit optional field per filter. A posting matches a target
/// salary when `salary.min <= salary <= salary.max`; with no target every
/// posting matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub salary: Option<i64>,
}
