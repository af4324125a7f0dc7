//! Second ingestion phase: wire areas and climbs to their parent areas.
//!
//! Files arrive in whatever order the scanner finds them, so a child area can
//! be ingested before its parent. Linking therefore waits until every file is
//! in the store and then looks parents up by their derived id.

use log::{debug, warn};

use crate::node::{Node, NodeId};
use crate::store::NodeStore;

/// Outcome of one linking pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkReport {
    pub linked: usize,
    /// Top level areas, which have no parent by definition.
    pub roots: usize,
    /// Nodes whose parent area does not exist. They still get pages.
    pub orphans: Vec<NodeId>,
}

pub fn link_hierarchy(store: &mut NodeStore) -> LinkReport {
    store.clear_links();

    let mut report = LinkReport::default();
    let mut links: Vec<(NodeId, NodeId)> = Vec::new();

    for area in store.areas() {
        match area.parent_id() {
            None => report.roots += 1,
            Some(parent) if store.contains(&parent) => links.push((parent, area.id.clone())),
            Some(_) => {
                warn!("area {} has no parent area, leaving it unlinked", area.raw_path);
                report.orphans.push(area.id.clone());
            }
        }
    }

    for climb in store.climbs() {
        let parent = climb.parent_id();
        if matches!(store.get(&parent), Some(Node::Area(_))) {
            links.push((parent, climb.id.clone()));
        } else {
            warn!(
                "climb {}/{} has no area, leaving it unlinked",
                climb.raw_path, climb.filename
            );
            report.orphans.push(climb.id.clone());
        }
    }

    for (parent, child) in &links {
        debug!("link {} -> {}", parent, child);
        store.link(parent, child);
    }
    report.linked = links.len();
    report
}
