//! Analysis Input Types
//!
//! What a caller hands to the orchestrator: the product being documented and
//! the GitHub repositories linked to it. Persistence of these records is the
//! caller's concern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product under analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Reference to a linked GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// Branch to analyze; `None` means the repository's default branch
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: None,
            description: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(RepoRef::new("acme", "widget").full_name(), "acme/widget");
    }
}
