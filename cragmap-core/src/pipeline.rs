use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classify::{Classifier, ContentError};
use crate::config::{Config, ConfigError};
use crate::linker::{LinkReport, link_hierarchy};
use crate::node::{NodeId, NodeKind, SourceFile};
use crate::pages::{PageRequest, plan_pages};
use crate::render::{NavItem, RenderError, Renderer};
use crate::scanner::{ScanError, SiteScanner};
use crate::store::NodeStore;

#[derive(Debug)]
pub enum BuildError {
    Config(ConfigError),
    Scan(ScanError),
    Content(ContentError),
    Render(RenderError),
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        BuildError::Config(err)
    }
}

impl From<ScanError> for BuildError {
    fn from(err: ScanError) -> Self {
        BuildError::Scan(err)
    }
}

impl From<ContentError> for BuildError {
    fn from(err: ContentError) -> Self {
        BuildError::Content(err)
    }
}

impl From<RenderError> for BuildError {
    fn from(err: RenderError) -> Self {
        BuildError::Render(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Config(e) => write!(f, "Config error: {}", e),
            BuildError::Scan(e) => write!(f, "Scan error: {}", e),
            BuildError::Content(e) => write!(f, "Content error: {}", e),
            BuildError::Render(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

/// Ingest-then-link pipeline over one node store.
///
/// Files go in one at a time through [`Pipeline::ingest`]. Once every file
/// is in, [`Pipeline::link`] wires the hierarchy and [`Pipeline::plan`]
/// produces the page requests.
#[derive(Debug, Default)]
pub struct Pipeline {
    classifier: Classifier,
    store: NodeStore,
    report: Option<LinkReport>,
}

impl Pipeline {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            store: NodeStore::new(),
            report: None,
        }
    }

    /// Classify one file and store its node. Returns the id, if a node was made.
    pub fn ingest(&mut self, file: &SourceFile) -> Result<Option<NodeId>, ContentError> {
        let Some(node) = self.classifier.classify(file)? else {
            debug!("skip {}", file.absolute_path.display());
            return Ok(None);
        };

        let id = node.id().clone();
        debug!("{:?} {} from {}", node.kind(), id, file.absolute_path.display());
        if let Some(previous) = self.store.insert(node) {
            warn!(
                "{} replaced an existing {:?} node with the same id",
                file.absolute_path.display(),
                previous.kind()
            );
        }
        // Anything linked before is stale now.
        self.report = None;
        Ok(Some(id))
    }

    pub fn ingest_all<'a, I>(&mut self, files: I) -> Result<usize, ContentError>
    where
        I: IntoIterator<Item = &'a SourceFile>,
    {
        let mut created = 0;
        for file in files {
            if self.ingest(file)?.is_some() {
                created += 1;
            }
        }
        Ok(created)
    }

    pub fn link(&mut self) -> &LinkReport {
        let report = link_hierarchy(&mut self.store);
        info!(
            "linked {} nodes ({} top level, {} orphaned)",
            report.linked,
            report.roots,
            report.orphans.len()
        );
        self.report.insert(report)
    }

    pub fn report(&self) -> Option<&LinkReport> {
        self.report.as_ref()
    }

    /// Page requests for the current store, linking first if needed.
    pub fn plan(&mut self) -> Vec<PageRequest> {
        if self.report.is_none() {
            self.link();
        }
        plan_pages(&self.store)
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            areas: self.store.count(NodeKind::Area),
            climbs: self.store.count(NodeKind::Climb),
            boundaries: self.store.count(NodeKind::Boundary),
            pages: self.store.count(NodeKind::Page),
            orphans: self.report.as_ref().map_or(0, |r| r.orphans.len()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BuildSummary {
    pub areas: usize,
    pub climbs: usize,
    pub boundaries: usize,
    pub pages: usize,
    pub orphans: usize,
}

/// Scan and ingest `content_dir`, then link. No output is written.
pub fn load_site(config: &Config, content_dir: &Path) -> Result<Pipeline, BuildError> {
    let scanner = SiteScanner::new(content_dir, config.content.sources.clone());
    let files = scanner.scan()?;

    let mut pipeline = Pipeline::new(config.content.classifier());
    let created = pipeline.ingest_all(&files)?;
    info!("ingested {} nodes from {} files", created, files.len());
    pipeline.link();

    Ok(pipeline)
}

/// Full build: scan, ingest, link, plan and render into `output_dir`.
pub fn build_site(
    config: &Config,
    content_dir: &Path,
    output_dir: &Path,
    theme_dir: &Path,
) -> Result<BuildSummary, BuildError> {
    let mut pipeline = load_site(config, content_dir)?;
    let requests = pipeline.plan();

    let mut renderer = Renderer::new(theme_dir, config.site.clone())?;
    renderer.set_global_context("navigation", &navigation(pipeline.store()));
    renderer.render_all(&requests, pipeline.store(), output_dir)?;
    info!("rendered {} pages into {}", requests.len(), output_dir.display());

    Ok(pipeline.summary())
}

/// Top level areas followed by free-standing pages.
fn navigation(store: &NodeStore) -> Vec<NavItem> {
    let roots = store
        .areas()
        .into_iter()
        .filter(|area| area.parent_id().is_none())
        .map(|area| NavItem {
            text: area.frontmatter.area_name.clone(),
            link: area.slug.clone(),
        });
    let pages = store.pages().into_iter().map(|page| NavItem {
        text: page.title.clone(),
        link: page.slug.clone(),
    });
    roots.chain(pages).collect()
}

/// Builder for [`build_site`] with the default directory layout.
pub struct SiteBuilder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    theme_dir: PathBuf,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            content_dir: PathBuf::from("./content"),
            output_dir: PathBuf::from("./out"),
            theme_dir: PathBuf::from("./theme"),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Read site and content settings from a `cragmap.toml` file.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, BuildError> {
        self.config = Config::read(path)?;
        Ok(self)
    }

    pub fn content_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.content_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn build(self) -> Result<BuildSummary, BuildError> {
        build_site(&self.config, &self.content_dir, &self.output_dir, &self.theme_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SourceCategory;

    fn file(dir: &str, base: &str, content: &str) -> SourceFile {
        let (name, extension) = base.rsplit_once('.').unwrap();
        SourceFile {
            absolute_path: PathBuf::from(dir).join(base),
            relative_directory: dir.to_string(),
            base: base.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
            category: SourceCategory::Areas,
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_ingest_link_plan() {
        let files = vec![
            file(
                "USA/Oregon/Portland",
                "giants-staircase.md",
                "---\nroute_name: Giants Staircase\n---\n",
            ),
            file("USA/Oregon/Portland", "index.md", "---\narea_name: Portland\n---\n"),
            file("USA/Oregon/Portland", "topo.png", ""),
        ];

        let mut pipeline = Pipeline::default();
        assert_eq!(pipeline.ingest_all(&files).unwrap(), 2);
        assert!(pipeline.report().is_none());

        let requests = pipeline.plan();
        assert_eq!(requests.len(), 2);
        assert_eq!(pipeline.report().unwrap().linked, 1);
        assert_eq!(
            pipeline.summary(),
            BuildSummary {
                areas: 1,
                climbs: 1,
                boundaries: 0,
                pages: 0,
                orphans: 0,
            }
        );
    }

    #[test]
    fn test_ingest_invalidates_links() {
        let mut pipeline = Pipeline::default();
        let usa = file("USA", "index.md", "---\narea_name: USA\n---\n");
        pipeline.ingest(&usa).unwrap();
        pipeline.link();
        assert!(pipeline.report().is_some());

        let utah = file("USA/Utah", "index.md", "---\narea_name: Utah\n---\n");
        pipeline.ingest(&utah).unwrap();
        assert!(pipeline.report().is_none());
        pipeline.plan();
        assert_eq!(pipeline.report().unwrap().linked, 1);
    }

    #[test]
    fn test_content_errors_stop_ingestion() {
        let mut pipeline = Pipeline::default();
        let files = vec![file("USA", "index.md", "---\nname: nope\n---\n")];
        assert!(pipeline.ingest_all(&files).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = SiteBuilder::new().config_file("/definitely/not/here/cragmap.toml");
        assert!(matches!(result, Err(BuildError::Config(ConfigError::Io(_)))));
    }
}
