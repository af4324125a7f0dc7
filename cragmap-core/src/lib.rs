pub mod classify;
pub mod config;
pub mod frontmatter;
pub mod linker;
pub mod names;
pub mod node;
pub mod pages;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod scanner;
pub mod slug;
pub mod store;

// Re-export main types
pub use classify::{Classifier, ContentError};
pub use names::sanitize_name;
pub use node::{Node, NodeId, NodeKind, SourceCategory, SourceFile};
pub use pages::{PageRequest, Template};
pub use paths::to_posix;
pub use pipeline::{BuildError, BuildSummary, Pipeline, SiteBuilder, build_site, load_site};
pub use render::{NavItem, Renderer};
pub use scanner::SiteScanner;
pub use slug::slugify_path;
pub use store::NodeStore;
