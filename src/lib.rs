//! folio-rs: a personal portfolio site with a contact form
//!
//! Pages are rendered with embedded Tera templates. Project and experience
//! listings come from JSON files next to the site config, and contact
//! submissions are appended to a JSON message log and optionally relayed
//! by email.

pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The portfolio application
#[derive(Debug, Clone)]
pub struct Portfolio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Directory holding the JSON data files
    pub data_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
}

impl Portfolio {
    /// Create a new instance from a directory, reading `_config.yml` and
    /// environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref();
        let data_dir = base_dir.join(&config.data_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            data_dir,
            static_dir,
        }
    }

    pub fn projects_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.projects_file)
    }

    pub fn experiences_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.experiences_file)
    }

    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.messages_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_follow_config() {
        let dir = TempDir::new().unwrap();
        let mut config = config::SiteConfig::default();
        config.data_dir = "data".to_string();
        config.messages_file = "inbox.json".to_string();

        let site = Portfolio::with_config(dir.path(), config);
        assert_eq!(site.messages_path(), dir.path().join("data/inbox.json"));
        assert_eq!(site.projects_path(), dir.path().join("data/projects.json"));
        assert_eq!(site.static_dir, dir.path().join("static"));
    }

    #[test]
    fn test_new_reads_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "title: Test Site\nprofile:\n  name: Test Owner\n",
        )
        .unwrap();

        let site = Portfolio::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Test Site");
        assert_eq!(site.config.profile.name, "Test Owner");
    }
}
