use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::names::NameSanitizer;
use crate::node::SourceCategory;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: Option<String>,
    /// Base URL for "Improve this page" links, e.g. a repository's edit URL.
    /// The source file's path is appended.
    pub edit_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Cragmap".into(),
            tagline: Some("Climbing areas and routes".to_string()),
            edit_url: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ContentConfig {
    /// File name, without extension, that marks a directory as an area.
    pub sentinel: String,
    pub boundary_file: String,
    /// Strip `(6) ` and `04-` ordering markers from area and route names.
    pub strip_name_prefixes: bool,
    pub sources: Vec<SourceConfig>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            sentinel: "index".to_string(),
            boundary_file: "boundary.geojson".to_string(),
            strip_name_prefixes: true,
            sources: vec![
                SourceConfig {
                    name: "areas-routes".to_string(),
                    path: "areas".to_string(),
                    category: SourceCategory::Areas,
                },
                SourceConfig {
                    name: "regular-md".to_string(),
                    path: "pages".to_string(),
                    category: SourceCategory::Pages,
                },
            ],
        }
    }
}

impl ContentConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new()
            .sentinel(self.sentinel.clone())
            .boundary_file(self.boundary_file.clone())
            .sanitizer(NameSanitizer::new(self.strip_name_prefixes))
    }
}

/// A directory of content, relative to the content root.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub name: String,
    pub path: String,
    pub category: SourceCategory,
}
