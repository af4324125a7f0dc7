use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

use crate::frontmatter::{AreaFrontmatter, ClimbFrontmatter, PageFrontmatter};

/// What a source directory holds. Decides how its files are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    /// Area and route documents, one directory per area.
    Areas,
    /// Free-standing site pages such as "about".
    Pages,
    Ignored,
}

/// A file discovered under one of the configured sources.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub absolute_path: PathBuf,
    /// Directory of the file relative to its source root, as found on disk.
    pub relative_directory: String,
    /// File name including extension, e.g. `index.md`.
    pub base: String,
    /// File name without extension, e.g. `index`.
    pub name: String,
    pub extension: String,
    pub category: SourceCategory,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Area,
    Climb,
    Boundary,
    Page,
}

impl NodeKind {
    fn namespace(self) -> &'static str {
        match self {
            NodeKind::Area => "area",
            NodeKind::Climb => "climb",
            NodeKind::Boundary => "boundary",
            NodeKind::Page => "page",
        }
    }
}

/// Deterministic node identity.
///
/// The same kind and token sequence always give the same id, which is what
/// lets the linker find a parent area from a child's tokens alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn derive<S: AsRef<str>>(kind: NodeKind, tokens: &[S]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.namespace());
        hasher.update(b":");
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                hasher.update(b"/");
            }
            hasher.update(token.as_ref());
        }
        let digest = hasher.finalize();
        NodeId(format!("{:x}", digest)[..32].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        NodeId(raw.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex SHA-256 of a file's raw bytes.
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaNode {
    pub id: NodeId,
    pub slug: String,
    pub raw_path: String,
    pub path_tokens: Vec<String>,
    pub filename: String,
    pub digest: String,
    pub frontmatter: AreaFrontmatter,
    pub body: String,
}

impl AreaNode {
    /// Id of the enclosing area, `None` for a top level (country) area.
    pub fn parent_id(&self) -> Option<NodeId> {
        match self.path_tokens.split_last() {
            Some((_, parent)) if !parent.is_empty() => Some(NodeId::derive(NodeKind::Area, parent)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClimbNode {
    pub id: NodeId,
    pub slug: String,
    pub raw_path: String,
    /// Area tokens followed by the climb's own file name.
    pub path_tokens: Vec<String>,
    pub filename: String,
    pub digest: String,
    pub frontmatter: ClimbFrontmatter,
    pub body: String,
}

impl ClimbNode {
    pub fn area_tokens(&self) -> &[String] {
        &self.path_tokens[..self.path_tokens.len().saturating_sub(1)]
    }

    pub fn parent_id(&self) -> NodeId {
        NodeId::derive(NodeKind::Area, self.area_tokens())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundaryNode {
    pub id: NodeId,
    pub raw_path: String,
    pub raw_geojson: String,
    pub digest: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageNode {
    pub id: NodeId,
    pub slug: String,
    pub title: String,
    pub digest: String,
    pub frontmatter: PageFrontmatter,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Area(AreaNode),
    Climb(ClimbNode),
    Boundary(BoundaryNode),
    Page(PageNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Area(n) => &n.id,
            Node::Climb(n) => &n.id,
            Node::Boundary(n) => &n.id,
            Node::Page(n) => &n.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Area(_) => NodeKind::Area,
            Node::Climb(_) => NodeKind::Climb,
            Node::Boundary(_) => NodeKind::Boundary,
            Node::Page(_) => NodeKind::Page,
        }
    }

    /// Route of the node's page; boundaries have none.
    pub fn slug(&self) -> Option<&str> {
        match self {
            Node::Area(n) => Some(&n.slug),
            Node::Climb(n) => Some(&n.slug),
            Node::Page(n) => Some(&n.slug),
            Node::Boundary(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Node::Area(n) => &n.frontmatter.area_name,
            Node::Climb(n) => &n.frontmatter.route_name,
            Node::Page(n) => &n.title,
            Node::Boundary(n) => &n.raw_path,
        }
    }

    pub fn as_area(&self) -> Option<&AreaNode> {
        match self {
            Node::Area(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_climb(&self) -> Option<&ClimbNode> {
        match self {
            Node::Climb(n) => Some(n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_deterministic() {
        let a = NodeId::derive(NodeKind::Area, &["USA", "Oregon"]);
        let b = NodeId::derive(NodeKind::Area, &["USA".to_string(), "Oregon".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_node_id_depends_on_kind_and_segmentation() {
        let area = NodeId::derive(NodeKind::Area, &["USA", "Oregon"]);
        assert_ne!(area, NodeId::derive(NodeKind::Climb, &["USA", "Oregon"]));
        assert_ne!(area, NodeId::derive(NodeKind::Area, &["USA-Oregon"]));
        assert_ne!(area, NodeId::derive(NodeKind::Area, &["USA", "oregon"]));
    }

    #[test]
    fn test_content_digest() {
        assert_eq!(content_digest(b"abc"), content_digest(b"abc"));
        assert_ne!(content_digest(b"abc"), content_digest(b"abd"));
        assert_eq!(content_digest(b"").len(), 64);
    }
}
