//! Listing loader - reads project and experience data from JSON files

use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::project::{default_projects, Experience, Project};
use crate::Portfolio;

/// Loads listing data on every call; nothing is cached between requests
#[derive(Debug, Clone)]
pub struct DataLoader {
    projects_path: PathBuf,
    experiences_path: PathBuf,
}

impl DataLoader {
    /// Create a loader for the given site
    pub fn new(site: &Portfolio) -> Self {
        Self {
            projects_path: site.projects_path(),
            experiences_path: site.experiences_path(),
        }
    }

    /// Load projects, substituting the canned list on any failure
    pub async fn load_projects(&self) -> Vec<Project> {
        load_json_or(&self.projects_path, default_projects).await
    }

    /// Load experiences, substituting an empty list on any failure
    pub async fn load_experiences(&self) -> Vec<Experience> {
        load_json_or(&self.experiences_path, Vec::new).await
    }
}

/// Parse a JSON file, falling back to `default` if it is missing or malformed
async fn load_json_or<T, F>(path: &Path, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{:?} not found, using defaults", path);
            return default();
        }
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}", path, e);
            return default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}", path, e);
            default()
        }
    }
}
