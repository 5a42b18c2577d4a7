//! Tree assembly
//!
//! Rebuilds parent/children structure from a flat set of nodes that share a
//! path namespace. Nothing is cached; every read assembles afresh.

use crate::error::TaxonomyError;
use crate::node::{ActivityId, ActivityNode};
use crate::path::ActivityPath;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Activity with its nested children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTree {
    /// Node identifier
    pub id: ActivityId,
    /// Node name
    pub name: String,
    /// Node path
    pub path: ActivityPath,
    /// Children in input order
    pub children: Vec<ActivityTree>,
}

impl ActivityTree {
    /// Number of nodes reachable from this one, itself included
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ActivityTree::len).sum::<usize>()
    }

    /// Always false; a tree holds at least its root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Identifiers in pre-order
    #[must_use]
    pub fn ids(&self) -> Vec<ActivityId> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<ActivityId>) {
        out.push(self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    /// Find the subtree rooted at `path`
    #[must_use]
    pub fn find(&self, path: &ActivityPath) -> Option<&ActivityTree> {
        if &self.path == path {
            return Some(self);
        }
        if !self.path.is_ancestor_of(path) {
            return None;
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}

/// Nodes indexed by path with child lists resolved
struct Linked<'a> {
    nodes: &'a [ActivityNode],
    slots: HashMap<&'a ActivityPath, usize>,
    children: Vec<Vec<usize>>,
}

impl<'a> Linked<'a> {
    fn new(nodes: &'a [ActivityNode]) -> Result<Self, TaxonomyError> {
        let mut slots = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if slots.insert(&node.path, idx).is_some() {
                return Err(TaxonomyError::DuplicatePath(node.path.to_string()));
            }
        }

        let mut children = vec![Vec::new(); nodes.len()];
        for (idx, node) in nodes.iter().enumerate() {
            let Some(parent) = node.path.parent() else {
                continue;
            };
            if let Some(&parent_idx) = slots.get(&parent) {
                children[parent_idx].push(idx);
            }
        }

        Ok(Self {
            nodes,
            slots,
            children,
        })
    }

    fn build(&self, idx: usize) -> ActivityTree {
        let node = &self.nodes[idx];
        ActivityTree {
            id: node.id,
            name: node.name.clone(),
            path: node.path.clone(),
            children: self.children[idx].iter().map(|&c| self.build(c)).collect(),
        }
    }
}

/// Assemble the tree rooted at `root_path`
///
/// Nodes whose parent path is not in `nodes` are left unattached. Children
/// keep the order of `nodes`, so callers should pass a stable order (by id).
///
/// # Errors
/// - [`TaxonomyError::RootNotFound`] if no node has `root_path`
/// - [`TaxonomyError::DuplicatePath`] if two input nodes share a path
pub fn assemble(
    nodes: &[ActivityNode],
    root_path: &ActivityPath,
) -> Result<ActivityTree, TaxonomyError> {
    let linked = Linked::new(nodes)?;
    let &root = linked
        .slots
        .get(root_path)
        .ok_or_else(|| TaxonomyError::RootNotFound(root_path.to_string()))?;
    Ok(linked.build(root))
}

/// Assemble one tree per depth-1 node
///
/// Equivalent to calling [`assemble`] for every root with its own subtree;
/// the linking pass is shared instead of repeated.
///
/// # Errors
/// Returns [`TaxonomyError::DuplicatePath`] if two input nodes share a path
pub fn assemble_forest(nodes: &[ActivityNode]) -> Result<Vec<ActivityTree>, TaxonomyError> {
    let linked = Linked::new(nodes)?;
    Ok(nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_root())
        .map(|(idx, _)| linked.build(idx))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: u64, path: &str) -> ActivityNode {
        ActivityNode::new(ActivityId(id), path.rsplit('.').next().unwrap(), path.parse().unwrap())
    }

    fn path(s: &str) -> ActivityPath {
        s.parse().unwrap()
    }

    fn sample() -> Vec<ActivityNode> {
        vec![
            node(1, "food"),
            node(2, "food.meat"),
            node(3, "food.dairy"),
            node(4, "cars"),
            node(5, "cars.trucks"),
            node(6, "cars.parts"),
            node(7, "cars.parts.tires"),
        ]
    }

    #[test]
    fn assemble_links_children() {
        let tree = assemble(&sample(), &path("cars")).unwrap();
        assert_eq!(tree.id, ActivityId(4));
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[1].children[0].path, path("cars.parts.tires"));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn assemble_keeps_input_order() {
        let tree = assemble(&sample(), &path("food")).unwrap();
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["meat", "dairy"]);
    }

    #[test]
    fn assemble_subtree_root() {
        let tree = assemble(&sample(), &path("cars.parts")).unwrap();
        assert_eq!(tree.ids(), vec![ActivityId(6), ActivityId(7)]);
    }

    #[test]
    fn assemble_missing_root() {
        let result = assemble(&sample(), &path("toys"));
        assert_eq!(result, Err(TaxonomyError::RootNotFound("toys".to_string())));
    }

    #[test]
    fn assemble_rejects_duplicate_paths() {
        let mut nodes = sample();
        nodes.push(node(8, "food"));
        assert!(matches!(
            assemble(&nodes, &path("food")),
            Err(TaxonomyError::DuplicatePath(_))
        ));
    }

    #[test]
    fn assemble_skips_orphans() {
        let nodes = vec![node(1, "a"), node(2, "a.b.c")];
        let tree = assemble(&nodes, &path("a")).unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn forest_has_one_tree_per_root() {
        let forest = assemble_forest(&sample()).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].len(), 3);
        assert_eq!(forest[1].len(), 4);
    }

    #[test]
    fn tree_find() {
        let tree = assemble(&sample(), &path("cars")).unwrap();
        assert_eq!(tree.find(&path("cars.parts.tires")).unwrap().id, ActivityId(7));
        assert!(tree.find(&path("food")).is_none());
    }
}
