use std::path::PathBuf;

use crate::frontmatter::{
    AreaFrontmatter, ClimbFrontmatter, FrontmatterError, PageFrontmatter, split_document,
};
use crate::names::NameSanitizer;
use crate::node::{
    AreaNode, BoundaryNode, ClimbNode, Node, NodeId, NodeKind, PageNode, SourceCategory,
    SourceFile, content_digest,
};
use crate::paths::path_tokens;
use crate::slug::route_for;

#[derive(Debug)]
pub enum ContentError {
    Encoding(PathBuf),
    Frontmatter {
        path: PathBuf,
        source: FrontmatterError,
    },
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::Encoding(p) => write!(f, "{} is not valid UTF-8", p.display()),
            ContentError::Frontmatter { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Frontmatter { source, .. } => Some(source),
            ContentError::Encoding(_) => None,
        }
    }
}

/// Turns one source file into at most one node.
///
/// The decision only looks at the file's source category and base name,
/// never at files seen before it.
#[derive(Debug, Clone)]
pub struct Classifier {
    sentinel: String,
    boundary_file: String,
    sanitizer: NameSanitizer,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            sentinel: "index".to_string(),
            boundary_file: "boundary.geojson".to_string(),
            sanitizer: NameSanitizer::default(),
        }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name (without extension) marking a directory as an area.
    pub fn sentinel<S: Into<String>>(mut self, name: S) -> Self {
        self.sentinel = name.into();
        self
    }

    pub fn boundary_file<S: Into<String>>(mut self, base: S) -> Self {
        self.boundary_file = base.into();
        self
    }

    pub fn sanitizer(mut self, sanitizer: NameSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn classify(&self, file: &SourceFile) -> Result<Option<Node>, ContentError> {
        if file.base == self.boundary_file {
            return self.boundary(file).map(Some);
        }
        if !is_markdown(&file.extension) {
            return Ok(None);
        }

        match file.category {
            SourceCategory::Pages => self.page(file).map(Some),
            SourceCategory::Areas if file.name == self.sentinel => self.area(file).map(Some),
            SourceCategory::Areas => self.climb(file).map(Some),
            SourceCategory::Ignored => Ok(None),
        }
    }

    fn boundary(&self, file: &SourceFile) -> Result<Node, ContentError> {
        let (raw_path, tokens) = path_tokens(&file.relative_directory);
        let raw_geojson = text_of(file)?.to_string();

        Ok(Node::Boundary(BoundaryNode {
            id: NodeId::derive(NodeKind::Boundary, &tokens),
            raw_path,
            raw_geojson,
            digest: content_digest(&file.content),
        }))
    }

    fn area(&self, file: &SourceFile) -> Result<Node, ContentError> {
        let (raw_path, tokens) = path_tokens(&file.relative_directory);
        let document = split_document(text_of(file)?).map_err(|e| frontmatter_error(file, e))?;
        let mut frontmatter: AreaFrontmatter =
            document.typed().map_err(|e| frontmatter_error(file, e))?;
        frontmatter.area_name = self.sanitizer.apply(&frontmatter.area_name);

        Ok(Node::Area(AreaNode {
            id: NodeId::derive(NodeKind::Area, &tokens),
            slug: route_for(&tokens),
            raw_path,
            path_tokens: tokens,
            filename: file.name.clone(),
            digest: content_digest(&file.content),
            frontmatter,
            body: document.body,
        }))
    }

    fn climb(&self, file: &SourceFile) -> Result<Node, ContentError> {
        let (raw_path, mut tokens) = path_tokens(&file.relative_directory);
        tokens.push(file.name.clone());

        let document = split_document(text_of(file)?).map_err(|e| frontmatter_error(file, e))?;
        let mut frontmatter: ClimbFrontmatter =
            document.typed().map_err(|e| frontmatter_error(file, e))?;
        frontmatter.route_name = self.sanitizer.apply(&frontmatter.route_name);

        Ok(Node::Climb(ClimbNode {
            id: NodeId::derive(NodeKind::Climb, &tokens),
            slug: route_for(&tokens),
            raw_path,
            path_tokens: tokens,
            filename: file.name.clone(),
            digest: content_digest(&file.content),
            frontmatter,
            body: document.body,
        }))
    }

    fn page(&self, file: &SourceFile) -> Result<Node, ContentError> {
        let (_, mut tokens) = path_tokens(&file.relative_directory);
        if file.name != self.sentinel {
            tokens.push(file.name.clone());
        }

        let document = split_document(text_of(file)?).map_err(|e| frontmatter_error(file, e))?;
        let frontmatter: PageFrontmatter = if document.frontmatter.is_some() {
            document.typed().map_err(|e| frontmatter_error(file, e))?
        } else {
            PageFrontmatter::default()
        };
        let title = frontmatter
            .title
            .clone()
            .or_else(|| first_heading(&document.body))
            .unwrap_or_else(|| file.name.clone());

        Ok(Node::Page(PageNode {
            id: NodeId::derive(NodeKind::Page, &tokens),
            slug: route_for(&tokens),
            title,
            digest: content_digest(&file.content),
            frontmatter,
            body: document.body,
        }))
    }
}

fn is_markdown(extension: &str) -> bool {
    extension.eq_ignore_ascii_case("md") || extension.eq_ignore_ascii_case("markdown")
}

fn text_of(file: &SourceFile) -> Result<&str, ContentError> {
    std::str::from_utf8(&file.content)
        .map_err(|_| ContentError::Encoding(file.absolute_path.clone()))
}

fn frontmatter_error(file: &SourceFile, source: FrontmatterError) -> ContentError {
    ContentError::Frontmatter {
        path: file.absolute_path.clone(),
        source,
    }
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
}
