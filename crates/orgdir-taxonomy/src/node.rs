//! Activity nodes as stored

use crate::path::ActivityPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique activity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One category of the activity taxonomy
///
/// Identity and path are fixed at creation; there is no in-place path update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityNode {
    /// Identifier assigned by storage
    pub id: ActivityId,
    /// Human-readable name as supplied
    pub name: String,
    /// Materialized path
    pub path: ActivityPath,
}

impl ActivityNode {
    /// Create node
    #[inline]
    #[must_use]
    pub fn new(id: ActivityId, name: impl Into<String>, path: ActivityPath) -> Self {
        Self {
            id,
            name: name.into(),
            path,
        }
    }

    /// Number of path segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    /// Whether the node has no parent
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// Whether `other` is this node or one of its descendants
    #[inline]
    #[must_use]
    pub fn covers(&self, other: &ActivityNode) -> bool {
        self.path.is_prefix_of(&other.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, path: &str) -> ActivityNode {
        ActivityNode::new(ActivityId(id), path, path.parse().unwrap())
    }

    #[test]
    fn node_depth_and_root() {
        assert!(node(1, "a").is_root());
        assert_eq!(node(2, "a.b.c").depth(), 3);
    }

    #[test]
    fn node_covers_self_and_descendants_only() {
        let retail = node(1, "retail");
        assert!(retail.covers(&retail));
        assert!(retail.covers(&node(2, "retail.food")));
        assert!(!retail.covers(&node(3, "retailer")));
    }

    #[test]
    fn activity_id_is_transparent_in_json() {
        assert_eq!(serde_json::to_string(&ActivityId(7)).unwrap(), "7");
    }
}
