//! Outline tree reconstruction from flat `(level, title, page)` entries.
//!
//! ```text
//! (1 Ch1) (2 S1) (2 S2) (1 Ch2)   ->   Ch1 ── S1
//!                                          └─ S2
//!                                      Ch2
//! ```
//!
//! A single left-to-right pass keeps a stack of open ancestors. Each new
//! entry closes every open node at the same or a deeper level; whatever is
//! left on top of the stack becomes its parent.

use std::collections::HashMap;

use serde::Serialize;

use crate::ids::IdGenerator;
use crate::{TocEntry, TocNode};

/// The result of [`build_hierarchy`]: every node in creation order plus the
/// ids of the roots.
#[derive(Debug, Clone, Default)]
pub struct TocTree {
    nodes: Vec<TocNode>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
}

impl TocTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, roots and descendants alike, in creation order.
    pub fn nodes(&self) -> &[TocNode] {
        &self.nodes
    }

    /// Root nodes in document order.
    pub fn roots(&self) -> impl Iterator<Item = &TocNode> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    pub fn get(&self, id: &str) -> Option<&TocNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Direct children of `id`, in order.
    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a TocNode> + 'a {
        self.get(id)
            .map(|node| node.child_ids.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(child))
    }

    pub fn into_nodes(self) -> Vec<TocNode> {
        self.nodes
    }
}

/// Reconstruct the outline forest for one file.
///
/// Level jumps in either direction are accepted: an entry whose level is
/// not greater than anything open becomes a root, and a jump from 1 to 4
/// simply attaches the deeper node to the level-1 parent.
pub fn build_hierarchy<I>(entries: I, file_name: &str, ids: &mut dyn IdGenerator) -> TocTree
where
    I: IntoIterator<Item = TocEntry>,
{
    let mut tree = TocTree::default();
    let mut stack: Vec<usize> = Vec::new();

    for entry in entries {
        let position = tree.nodes.len();
        let mut node = TocNode {
            id: ids.next_id(),
            level: entry.level,
            title: entry.title,
            page: entry.page,
            file_name: file_name.to_string(),
            parent_id: None,
            child_ids: Vec::new(),
        };

        while let Some(&top) = stack.last() {
            if tree.nodes[top].level >= node.level {
                stack.pop();
            } else {
                break;
            }
        }

        match stack.last() {
            Some(&parent) => {
                node.parent_id = Some(tree.nodes[parent].id.clone());
                tree.nodes[parent].child_ids.push(node.id.clone());
            }
            None => tree.roots.push(position),
        }

        stack.push(position);
        tree.index.insert(node.id.clone(), position);
        tree.nodes.push(node);
    }

    tree
}

/// A nested view of the outline, for consumers that want a ready-made
/// tree instead of id links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineTreeNode {
    pub id: String,
    pub title: String,
    pub level: u32,
    pub page: u32,
    pub children: Vec<OutlineTreeNode>,
}

/// Nest a flattened node list (as persisted) into owned subtrees.
///
/// Children are always created after their parent, so walking the list
/// backwards builds every subtree before it is needed. Child ids that do
/// not resolve are ignored.
pub fn nest_nodes(nodes: &[TocNode]) -> Vec<OutlineTreeNode> {
    let mut built: HashMap<&str, OutlineTreeNode> = HashMap::with_capacity(nodes.len());

    for node in nodes.iter().rev() {
        let children = node
            .child_ids
            .iter()
            .filter_map(|child| built.remove(child.as_str()))
            .collect();
        built.insert(
            node.id.as_str(),
            OutlineTreeNode {
                id: node.id.clone(),
                title: node.title.clone(),
                level: node.level,
                page: node.page,
                children,
            },
        );
    }

    nodes
        .iter()
        .filter(|node| node.is_root())
        .filter_map(|node| built.remove(node.id.as_str()))
        .collect()
}
