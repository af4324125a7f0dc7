use log::debug;
use pulldown_cmark::{Options, Parser, html};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::node::{AreaNode, ClimbNode, Node, NodeId, NodeKind};
use crate::pages::{PageRequest, Template};
use crate::slug::route_for;
use crate::store::NodeStore;

#[derive(Debug)]
pub enum RenderError {
    TemplateError(tera::Error),
    IoError(std::io::Error),
    Serialization(serde_json::Error),
    UnknownNode(String),
}

impl From<tera::Error> for RenderError {
    fn from(err: tera::Error) -> Self {
        RenderError::TemplateError(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::TemplateError(e) => write!(f, "Template error: {}", e),
            RenderError::IoError(e) => write!(f, "IO error: {}", e),
            RenderError::Serialization(e) => write!(f, "Serialization error: {}", e),
            RenderError::UnknownNode(id) => write!(f, "Page refers to unknown node {}", id),
        }
    }
}

impl std::error::Error for RenderError {}

// Built-in theme, used for any template the theme directory does not provide.
const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../theme/base.html")),
    ("area.html", include_str!("../theme/area.html")),
    ("climb.html", include_str!("../theme/climb.html")),
    ("page.html", include_str!("../theme/page.html")),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavItem {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize)]
struct ClimbLink {
    text: String,
    link: String,
    grade: String,
}

pub struct Renderer {
    tera: Tera,
    context: Context,
    site: SiteConfig,
}

impl Renderer {
    /// Load templates from `theme_dir`, falling back to the built-in theme.
    pub fn new(theme_dir: &Path, site: SiteConfig) -> Result<Self, RenderError> {
        // Parse only: theme templates may extend built-ins, so inheritance
        // chains are built by `extend` once both sets are loaded.
        let mut tera = if theme_dir.is_dir() {
            Tera::parse(&format!("{}/**/*.html", theme_dir.display()))?
        } else {
            Tera::default()
        };

        let mut builtin = Tera::default();
        builtin.add_raw_templates(BUILTIN_TEMPLATES)?;
        tera.extend(&builtin)?;

        let mut context = Context::new();
        context.insert("site", &site);

        Ok(Self {
            tera,
            context,
            site,
        })
    }

    /// Add a value visible to every page.
    pub fn set_global_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }

    pub fn render(&self, request: &PageRequest, store: &NodeStore) -> Result<String, RenderError> {
        let node_id = request.node_id().unwrap_or_default();
        let node = store
            .get(&NodeId::from(node_id))
            .ok_or_else(|| RenderError::UnknownNode(node_id.to_string()))?;

        let mut context = self.context.clone();
        context.insert("page", request);
        context.insert("node", node);
        for (key, value) in &request.context {
            context.insert(key.as_str(), value);
        }

        match (request.template, node) {
            (Template::Area, Node::Area(area)) => self.area_context(&mut context, area, store),
            (Template::Climb, Node::Climb(climb)) => self.climb_context(&mut context, climb, store),
            (_, Node::Page(page)) => context.insert("page_content", &markdown_to_html(&page.body)),
            _ => {}
        }

        Ok(self.tera.render(request.template.file_name(), &context)?)
    }

    fn area_context(&self, context: &mut Context, area: &AreaNode, store: &NodeStore) {
        let mut areas = Vec::new();
        let mut climbs = Vec::new();
        for child in store.children_of(&area.id) {
            match child {
                Node::Area(a) => areas.push(NavItem {
                    text: a.frontmatter.area_name.clone(),
                    link: a.slug.clone(),
                }),
                Node::Climb(c) => climbs.push(ClimbLink {
                    text: c.frontmatter.route_name.clone(),
                    link: c.slug.clone(),
                    grade: c.frontmatter.yds.clone(),
                }),
                _ => {}
            }
        }
        areas.sort_by(|a, b| a.text.cmp(&b.text));
        climbs.sort_by(|a, b| a.text.cmp(&b.text));

        let (parents, _) = area.path_tokens.split_at(area.path_tokens.len().saturating_sub(1));
        context.insert("breadcrumbs", &breadcrumbs(parents, store));
        context.insert("areas", &areas);
        context.insert("climbs", &climbs);
        context.insert("page_content", &markdown_to_html(&area.body));
        if let Some(boundary) = store.boundary_for(&area.raw_path) {
            context.insert("boundary", &boundary.raw_geojson);
        }
        if let Some(link) = self.edit_link(&area.raw_path, &area.filename) {
            context.insert("edit_link", &link);
        }
    }

    fn climb_context(&self, context: &mut Context, climb: &ClimbNode, store: &NodeStore) {
        let crumbs = breadcrumbs(climb.area_tokens(), store);
        context.insert("description", &climb_description(climb, &crumbs));
        context.insert("breadcrumbs", &crumbs);
        context.insert("disciplines", &climb.frontmatter.disciplines());
        context.insert("page_content", &markdown_to_html(&climb.body));
        if let Some(link) = self.edit_link(&climb.raw_path, &climb.filename) {
            context.insert("edit_link", &link);
        }
    }

    fn edit_link(&self, raw_path: &str, filename: &str) -> Option<String> {
        let base = self.site.edit_url.as_deref()?.trim_end_matches('/');
        if raw_path.is_empty() {
            Some(format!("{}/{}.md", base, filename))
        } else {
            Some(format!("{}/{}/{}.md", base, raw_path, filename))
        }
    }

    /// Render every request into `output_dir/<path>/index.html`.
    pub fn render_all(
        &self,
        requests: &[PageRequest],
        store: &NodeStore,
        output_dir: &Path,
    ) -> Result<(), RenderError> {
        std::fs::create_dir_all(output_dir)?;

        for request in requests {
            let html = self.render(request, store)?;
            let output_path = output_dir.join(page_out_path(&request.path));
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            debug!("write {}", output_path.display());
            std::fs::write(output_path, html)?;
        }

        // Route manifest for whatever serves the site, including match paths.
        let manifest = serde_json::to_string_pretty(requests)?;
        std::fs::write(output_dir.join("pages.json"), manifest)?;

        Ok(())
    }
}

pub fn page_out_path(route: &str) -> PathBuf {
    PathBuf::from(route.trim_matches('/')).join("index.html")
}

/// One crumb per ancestor area, named after the area when it exists.
pub fn breadcrumbs(area_tokens: &[String], store: &NodeStore) -> Vec<NavItem> {
    (1..=area_tokens.len())
        .map(|depth| {
            let tokens = &area_tokens[..depth];
            let id = NodeId::derive(NodeKind::Area, tokens);
            match store.get(&id) {
                Some(Node::Area(area)) => NavItem {
                    text: area.frontmatter.area_name.clone(),
                    link: area.slug.clone(),
                },
                _ => NavItem {
                    text: tokens[depth - 1].clone(),
                    link: route_for(tokens),
                },
            }
        })
        .collect()
}

/// "First ascent by X - 5.9 - Located in Crag at Region"
pub fn climb_description(climb: &ClimbNode, crumbs: &[NavItem]) -> String {
    let first_ascent = climb
        .frontmatter
        .fa
        .as_deref()
        .map(|fa| format!("First ascent by {} - ", fa))
        .unwrap_or_default();

    let location = match crumbs {
        [.., region, crag] => format!("{} at {}", crag.text, region.text),
        [crag] => crag.text.clone(),
        [] => String::new(),
    };

    format!("{}{} - Located in {}", first_ascent, climb.frontmatter.yds, location)
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::all());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
