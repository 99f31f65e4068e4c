//! Labelled trees used to display composition graphs.
//!
//! A [`Tree`] is an arena of [`Node`]s addressed by [`NodeId`]. The root is
//! created with the tree and every further node is attached below an existing
//! one, so all nodes are reachable from the root. Nodes carry an optional
//! [`Constituent`] and a map of displayed [`Quantity`] values; the tree
//! itself knows nothing about substances beyond that.
//!
//! Trees are built from substances by [`Substance::input_tree`] and
//! [`Substance::composition_tree`] and rendered as text with
//! [`Tree::render`].
//!
//! [`Substance::input_tree`]: crate::Substance::input_tree
//! [`Substance::composition_tree`]: crate::Substance::composition_tree

pub(crate) mod build;
mod charset;
mod render;

pub use build::TreeOptions;
pub use charset::{CharSet, ParseCharSetError};
pub use render::RenderOptions;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use thiserror::Error;

use crate::substance::Constituent;

/// Index of a node within its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Physical quantity attached to a node, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    AtomicFraction,
    WeightFraction,
    VolumeFraction,
    MolarMass,
    Density,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("cannot move node {node} below {parent}: {parent} is part of its subtree")]
    Cycle { node: NodeId, parent: NodeId },
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    label: String,
    content: Option<Constituent>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: BTreeMap<Quantity, f64>,
    depth: usize,
    right_align: bool,
}

impl Node {
    fn new(
        id: NodeId,
        label: String,
        content: Option<Constituent>,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Self {
        Self {
            id,
            label,
            content,
            parent,
            children: Vec::new(),
            data: BTreeMap::new(),
            depth,
            right_align: false,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn content(&self) -> Option<&Constituent> {
        self.content.as_ref()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn data(&self) -> &BTreeMap<Quantity, f64> {
        &self.data
    }

    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        self.data.get(&quantity).copied()
    }

    /// Number of edges between this node and the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn is_right_aligned(&self) -> bool {
        self.right_align
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Kind printed in front of the label.
    pub fn kind_name(&self) -> String {
        self.content
            .as_ref()
            .map_or_else(|| "Node".to_string(), |c| c.kind().to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates a tree consisting of its root node.
    pub fn new(label: impl Into<String>, content: Option<Constituent>) -> Self {
        Self {
            nodes: vec![Node::new(NodeId(0), label.into(), content, None, 0)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, including the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, Error> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownNode(id))
    }

    fn check(&self, id: NodeId) -> Result<(), Error> {
        self.get(id).map(|_| ()).ok_or(Error::UnknownNode(id))
    }

    /// Appends a new last child to `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        content: Option<Constituent>,
    ) -> Result<NodeId, Error> {
        self.check(parent)?;
        Ok(self.attach(parent, label.into(), content))
    }

    fn attach(&mut self, parent: NodeId, label: String, content: Option<Constituent>) -> NodeId {
        let depth = self.nodes[parent.0].depth + 1;
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(id, label, content, Some(parent), depth));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Moves `node` with its subtree to become the last child of `parent`.
    ///
    /// Depths of the moved subtree are updated. Moving a node below itself or
    /// one of its descendants is rejected, which includes moving the root.
    pub fn set_parent(&mut self, node: NodeId, parent: NodeId) -> Result<(), Error> {
        self.check(node)?;
        self.check(parent)?;
        if self.ancestors_and_self(parent).any(|id| id == node) {
            return Err(Error::Cycle { node, parent });
        }

        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|&c| c != node);
        }
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.push(node);

        let offset = self.nodes[parent.0].depth + 1;
        let mut stack = vec![(node, offset)];
        while let Some((id, depth)) = stack.pop() {
            let n = &mut self.nodes[id.0];
            n.depth = depth;
            stack.extend(n.children.iter().map(|&c| (c, depth + 1)));
        }
        Ok(())
    }

    fn ancestors_and_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&id| self.nodes[id.0].parent)
    }

    /// Sets a displayed quantity of `node`, returning the previous value.
    pub fn insert_data(
        &mut self,
        node: NodeId,
        quantity: Quantity,
        value: f64,
    ) -> Result<Option<f64>, Error> {
        Ok(self.get_mut(node)?.data.insert(quantity, value))
    }

    /// Renders `node` at the maximum depth of the tree.
    ///
    /// With `label_size`, the label is right-aligned to that many characters
    /// so that aligned labels of different lengths line up.
    pub fn align_right(
        &mut self,
        node: NodeId,
        value: bool,
        label_size: Option<usize>,
    ) -> Result<(), Error> {
        let node = self.get_mut(node)?;
        node.right_align = value;
        if let Some(size) = label_size.filter(|&s| s > 0) {
            node.label = format!("{:>size$}", node.label);
        }
        Ok(())
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Node ids in depth-first pre-order, children in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.0].children.iter().rev());
            Some(id)
        })
    }

    /// Nodes in depth-first pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.ids().map(|id| &self.nodes[id.0])
    }

    pub fn nodes_by_label(&self, label: &str) -> Vec<NodeId> {
        self.iter()
            .filter(|n| n.label == label)
            .map(Node::id)
            .collect()
    }

    pub fn nodes_by_content(&self, content: &Constituent) -> Vec<NodeId> {
        self.iter()
            .filter(|n| n.content.as_ref() == Some(content))
            .map(Node::id)
            .collect()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::isotope::Isotope;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new("root", None);
        let a = tree.add_child(tree.root(), "a", None).unwrap();
        let b = tree.add_child(tree.root(), "b", None).unwrap();
        let a1 = tree.add_child(a, "a1", None).unwrap();
        (tree, a, b, a1)
    }

    #[test]
    fn depths_and_leaves() {
        let (tree, a, b, a1) = sample();
        assert_eq!(tree.len(), 4);
        assert!(tree[tree.root()].is_root());
        assert_eq!(tree[a].depth(), 1);
        assert_eq!(tree[a1].depth(), 2);
        assert!(tree[b].is_leaf());
        assert!(!tree[a].is_leaf());
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn pre_order_iteration() {
        let (tree, ..) = sample();
        let labels: Vec<&str> = tree.iter().map(Node::label).collect();
        assert_eq!(labels, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn set_parent_moves_subtree() {
        let (mut tree, a, b, a1) = sample();
        tree.set_parent(a, b).unwrap();
        assert_eq!(tree[a].parent(), Some(b));
        assert_eq!(tree[a].depth(), 2);
        assert_eq!(tree[a1].depth(), 3);
        assert_eq!(tree[tree.root()].children(), &[b]);
        let labels: Vec<&str> = tree.iter().map(Node::label).collect();
        assert_eq!(labels, vec!["root", "b", "a", "a1"]);
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let (mut tree, a, _, a1) = sample();
        assert_eq!(
            tree.set_parent(a, a1),
            Err(Error::Cycle { node: a, parent: a1 })
        );
        let root = tree.root();
        assert!(tree.set_parent(root, a).is_err());
        assert!(tree.set_parent(a, a).is_err());
    }

    #[test]
    fn unknown_nodes_are_rejected() {
        let (mut tree, ..) = sample();
        let missing = NodeId(42);
        assert_eq!(
            tree.add_child(missing, "x", None),
            Err(Error::UnknownNode(missing))
        );
        assert!(tree.insert_data(missing, Quantity::Density, 1.0).is_err());
    }

    #[test]
    fn align_right_pads_label() {
        let (mut tree, _, b, _) = sample();
        tree.align_right(b, true, Some(4)).unwrap();
        assert_eq!(tree[b].label(), "   b");
        assert!(tree[b].is_right_aligned());
    }

    #[test]
    fn lookup_by_label_and_content() {
        let u235 = Constituent::from(Isotope::new(92, 235, 235.04));
        let mut tree = Tree::new("root", None);
        let root = tree.root();
        let first = tree.add_child(root, "U-235", Some(u235.clone())).unwrap();
        tree.add_child(root, "other", None).unwrap();
        let second = tree.add_child(first, "again", Some(u235.clone())).unwrap();
        assert_eq!(tree.nodes_by_label("U-235"), vec![first]);
        assert_eq!(tree.nodes_by_content(&u235), vec![first, second]);
        assert_eq!(tree[first].kind_name(), "Isotope");
        assert_eq!(tree[root].kind_name(), "Node");
    }

    #[test]
    fn data_keeps_display_order() {
        let (mut tree, a, ..) = sample();
        tree.insert_data(a, Quantity::Density, 2.0).unwrap();
        tree.insert_data(a, Quantity::AtomicFraction, 0.5).unwrap();
        let keys: Vec<Quantity> = tree[a].data().keys().copied().collect();
        assert_eq!(keys, vec![Quantity::AtomicFraction, Quantity::Density]);
        assert_eq!(tree.insert_data(a, Quantity::Density, 3.0), Ok(Some(2.0)));
    }
}
