//! Category entity - recipe tags that challenges can filter on.

use serde::{Deserialize, Serialize};

use crate::CategoryId;

/// A recipe category as shown alongside a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
}
