use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, Map};
use cragmap_core::config::{Config, ContentConfig, SiteConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration that merges CLI args, env vars, config files, and defaults
///
/// The `[site]` and `[content]` tables are plain fields rather than a flattened
/// core `Config`, so string values from the environment are coerced by `config`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CragmapConfig {
    /// Build configuration
    pub build: BuildConfig,
    pub site: SiteConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Content root holding the configured sources
    pub content: String,
    /// Output directory for generated site
    pub output: String,
    /// Theme directory
    pub theme: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "./content".to_string(),
            output: "./out".to_string(),
            theme: "./theme".to_string(),
            config: "./cragmap.toml".to_string(),
        }
    }
}

impl Default for CragmapConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            site: SiteConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl CragmapConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (CRAGMAP_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        Self::load_with_env(args, None)
    }

    /// Same as [`CragmapConfig::load`], reading `CRAGMAP_*` variables from
    /// `env` instead of the process environment when given.
    pub fn load_with_env(args: &ArgMatches, env: Option<Map<String, String>>) -> Result<Self> {
        let config_file = args
            .try_get_one::<String>("config")
            .unwrap_or(None)
            .cloned()
            .unwrap_or_else(|| "./cragmap.toml".to_string());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::from(Path::new(&config_file)));
        }

        // 3. Add environment variables with CRAGMAP_ prefix
        builder = builder.add_source(
            Environment::with_prefix("CRAGMAP")
                .prefix_separator("_")
                .separator("__") // Use double underscore for nested keys
                .source(env),
        );

        // 4. Override with CLI arguments (highest priority)
        let mut cli_overrides = std::collections::HashMap::new();

        for key in ["content", "output", "theme", "config"] {
            if let Some(value) = args.try_get_one::<String>(key).unwrap_or(None) {
                cli_overrides.insert(format!("build.{}", key), value.clone());
            }
        }

        if !cli_overrides.is_empty() {
            builder = builder.add_source(config::Config::try_from(&cli_overrides)?);
        }

        let config = builder.build()?;
        let cragmap_config: CragmapConfig = config.try_deserialize()?;

        Ok(cragmap_config)
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }

    /// Site and content settings handed to the core pipeline.
    pub fn core(&self) -> Config {
        Config {
            site: self.site.clone(),
            content: self.content.clone(),
        }
    }
}
