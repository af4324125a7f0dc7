use std::collections::{BTreeMap, BTreeSet};

use crate::node::{AreaNode, BoundaryNode, ClimbNode, Node, NodeId, NodeKind, PageNode};
use crate::paths::split_tokens;

/// Every node produced by ingestion, addressable by id.
///
/// Parent/child links live next to the nodes rather than inside them, so a
/// node never changes after it is inserted.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: BTreeMap<NodeId, Node>,
    parents: BTreeMap<NodeId, NodeId>,
    children: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning the one it replaced if the id was taken.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id().clone(), node)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind() == kind).count()
    }

    /// Areas ordered by display name, then slug.
    pub fn areas(&self) -> Vec<&AreaNode> {
        let mut areas: Vec<&AreaNode> = self.nodes.values().filter_map(Node::as_area).collect();
        areas.sort_by(|a, b| {
            a.frontmatter
                .area_name
                .cmp(&b.frontmatter.area_name)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        areas
    }

    /// Climbs ordered by raw path, then file name.
    pub fn climbs(&self) -> Vec<&ClimbNode> {
        let mut climbs: Vec<&ClimbNode> = self.nodes.values().filter_map(Node::as_climb).collect();
        climbs.sort_by(|a, b| {
            a.raw_path
                .cmp(&b.raw_path)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        climbs
    }

    pub fn pages(&self) -> Vec<&PageNode> {
        let mut pages: Vec<&PageNode> = self
            .nodes
            .values()
            .filter_map(|n| match n {
                Node::Page(page) => Some(page),
                _ => None,
            })
            .collect();
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        pages
    }

    /// The boundary file stored in the same directory as an area, if any.
    pub fn boundary_for(&self, raw_path: &str) -> Option<&BoundaryNode> {
        let id = NodeId::derive(NodeKind::Boundary, &split_tokens(raw_path));
        match self.nodes.get(&id) {
            Some(Node::Boundary(boundary)) => Some(boundary),
            _ => None,
        }
    }

    pub fn link(&mut self, parent: &NodeId, child: &NodeId) {
        if let Some(previous) = self.parents.insert(child.clone(), parent.clone()) {
            if let Some(siblings) = self.children.get_mut(&previous) {
                siblings.remove(child);
            }
        }
        self.children
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
    }

    pub fn clear_links(&mut self) {
        self.parents.clear();
        self.children.clear();
    }

    pub fn parent_of(&self, id: &NodeId) -> Option<&Node> {
        self.parents.get(id).and_then(|parent| self.nodes.get(parent))
    }

    pub fn children_of(&self, id: &NodeId) -> Vec<&Node> {
        self.children
            .get(id)
            .map(|ids| ids.iter().filter_map(|child| self.nodes.get(child)).collect())
            .unwrap_or_default()
    }
}
