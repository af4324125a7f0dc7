use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::store::NodeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Area,
    Climb,
    Page,
}

impl Template {
    pub fn file_name(&self) -> &'static str {
        match self {
            Template::Area => "area.html",
            Template::Climb => "climb.html",
            Template::Page => "page.html",
        }
    }
}

/// One page to generate: a route, the template that draws it and the
/// scalar values that template needs to look its node up again.
#[derive(Debug, Clone, Serialize)]
pub struct PageRequest {
    pub path: String,
    pub template: Template,
    pub context: BTreeMap<String, Value>,
    /// Client side route pattern served by this page, if any.
    pub match_path: Option<String>,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, template: Template) -> Self {
        Self {
            path: path.into(),
            template,
            context: BTreeMap::new(),
            match_path: None,
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn node_id(&self) -> Option<&str> {
        self.context.get("node_id").and_then(Value::as_str)
    }
}

const CLIENT_ONLY_PREFIX: &str = "/edit";

/// Emit a page request for every area, climb and page in the store.
///
/// Areas come first sorted by name, then climbs by path, then pages. Linking
/// should already have run, but nothing here depends on it: an orphan still
/// gets its page.
pub fn plan_pages(store: &NodeStore) -> Vec<PageRequest> {
    let mut requests = Vec::new();

    for area in store.areas() {
        requests.push(
            PageRequest::new(area.slug.clone(), Template::Area)
                .with("node_id", area.id.as_str())
                .with("raw_path", area.raw_path.clone()),
        );
    }

    for climb in store.climbs() {
        requests.push(
            PageRequest::new(climb.slug.clone(), Template::Climb)
                .with("node_id", climb.id.as_str()),
        );
    }

    for page in store.pages() {
        requests.push(
            PageRequest::new(page.slug.clone(), Template::Page).with("node_id", page.id.as_str()),
        );
    }

    for request in &mut requests {
        assign_match_path(request);
    }
    for route in colliding_routes(&requests) {
        warn!("several pages are written to {}, the last one wins", route);
    }
    requests
}

/// Routes that more than one request would write to.
///
/// Trailing and leading slashes are ignored, so `/usa/` collides with `/usa`.
pub fn colliding_routes(requests: &[PageRequest]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut colliding = BTreeSet::new();
    for request in requests {
        let key = request.path.trim_matches('/');
        if !seen.insert(key) {
            colliding.insert(format!("/{}", key));
        }
    }
    colliding.into_iter().collect()
}

/// Pages under `/edit` are rendered once and routed in the browser.
pub fn assign_match_path(request: &mut PageRequest) {
    let path = request.path.as_str();
    let under_prefix = path == CLIENT_ONLY_PREFIX
        || path
            .strip_prefix(CLIENT_ONLY_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'));
    if under_prefix {
        request.match_path = Some(format!("{}/*", CLIENT_ONLY_PREFIX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::linker::link_hierarchy;
    use crate::node::{SourceCategory, SourceFile};
    use std::path::PathBuf;

    fn file(category: SourceCategory, dir: &str, base: &str, content: &str) -> SourceFile {
        let (name, extension) = base.rsplit_once('.').unwrap();
        SourceFile {
            absolute_path: PathBuf::from(dir).join(base),
            relative_directory: dir.to_string(),
            base: base.to_string(),
            name: name.to_string(),
            extension: extension.to_string(),
            category,
            content: content.as_bytes().to_vec(),
        }
    }

    fn store_with(files: &[SourceFile]) -> NodeStore {
        let classifier = Classifier::new();
        let mut store = NodeStore::new();
        for f in files {
            if let Some(node) = classifier.classify(f).unwrap() {
                store.insert(node);
            }
        }
        link_hierarchy(&mut store);
        store
    }

    #[test]
    fn test_one_request_per_routable_node() {
        let store = store_with(&[
            file(SourceCategory::Areas, "USA/Oregon", "index.md", "---\narea_name: Oregon\n---\n"),
            file(SourceCategory::Areas, "USA/Oregon", "boundary.geojson", "{}"),
            file(
                SourceCategory::Areas,
                "USA/Oregon/Portland",
                "giants-staircase.md",
                "---\nroute_name: Giants Staircase\n---\n",
            ),
            file(SourceCategory::Pages, "", "about.md", "# About\n"),
        ]);

        let requests = plan_pages(&store);
        let routes: Vec<(&str, Template)> = requests
            .iter()
            .map(|r| (r.path.as_str(), r.template))
            .collect();
        assert_eq!(
            routes,
            vec![
                ("/usa/oregon", Template::Area),
                ("/usa/oregon/portland/giants-staircase", Template::Climb),
                ("/about", Template::Page),
            ]
        );
        assert_eq!(requests[0].context["raw_path"], "USA/Oregon");
        assert!(requests.iter().all(|r| r.node_id().is_some()));
    }

    #[test]
    fn test_empty_slug_segment_collides_with_parent() {
        let store = store_with(&[
            file(SourceCategory::Areas, "USA", "index.md", "---\narea_name: USA\n---\n"),
            file(SourceCategory::Areas, "USA/北京", "index.md", "---\narea_name: Beijing\n---\n"),
        ]);

        let requests = plan_pages(&store);
        assert_eq!(requests.len(), 2);
        assert_eq!(colliding_routes(&requests), vec!["/usa".to_string()]);
    }

    #[test]
    fn test_distinct_routes_do_not_collide() {
        let requests = vec![
            PageRequest::new("/usa", Template::Area),
            PageRequest::new("/usa/oregon", Template::Area),
        ];
        assert!(colliding_routes(&requests).is_empty());
    }

    #[test]
    fn test_edit_pages_get_match_path() {
        let mut edit = PageRequest::new("/edit", Template::Page);
        assign_match_path(&mut edit);
        assert_eq!(edit.match_path.as_deref(), Some("/edit/*"));

        let mut nested = PageRequest::new("/edit/area", Template::Page);
        assign_match_path(&mut nested);
        assert_eq!(nested.match_path.as_deref(), Some("/edit/*"));

        let mut editorial = PageRequest::new("/editorial", Template::Page);
        assign_match_path(&mut editorial);
        assert!(editorial.match_path.is_none());
    }

    #[test]
    fn test_template_file_names() {
        assert_eq!(Template::Area.file_name(), "area.html");
        assert_eq!(Template::Climb.file_name(), "climb.html");
        assert_eq!(Template::Page.file_name(), "page.html");
    }
}
