//! Listing records shown on the site

use serde::{Deserialize, Serialize};

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Anything else the owner put in the record (links, details, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Project {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Experience entries are owner-defined and passed through untouched
pub type Experience = serde_json::Value;

/// Projects shown when `projects.json` is missing or unreadable
pub fn default_projects() -> Vec<Project> {
    vec![
        Project::new(
            "Portfolio Website",
            "This site built with Rust and templates",
        ),
        Project::new("Task Tracker", "A simple CLI task manager"),
        Project::new("Data Entry Automation", "Scripts to speed up Excel work"),
    ]
}
