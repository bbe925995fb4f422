//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["widgetdesk.toml", ".widgetdesk.toml"];
const ENV_PREFIX: &str = "WIDGETDESK_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `WIDGETDESK_*` environment variables (`WIDGETDESK_API__BASE_URL`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./widgetdesk.toml` or `./.widgetdesk.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/widgetdesk/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(Self::global_config_path().as_deref(), config_path)
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global) = global
            && global.exists()
        {
            figment = figment.merge(Toml::file(global));
        }

        if let Some(project) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/widgetdesk/config.toml if set,
    /// otherwise the platform config directory
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("widgetdesk").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used, in priority order
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [     ] Env:     {}*", ENV_PREFIX));
        if let Some(path) = explicit {
            lines.push(format!(
                "  {} Explicit: {}",
                mark(path.exists()),
                path.display()
            ));
        }
        match Self::project_config_path() {
            Some(path) => lines.push(format!("  {} Project: {}", mark(true), path.display())),
            None => lines.push(format!(
                "  {} Project: ./{} or ./{}",
                mark(false),
                PROJECT_FILES[0],
                PROJECT_FILES[1]
            )),
        }
        if let Some(path) = Self::global_config_path() {
            lines.push(format!(
                "  {} Global:  {}",
                mark(path.exists()),
                path.display()
            ));
        }
        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
