//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Secret used for flash signing when nothing else is configured
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-change-me";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    #[serde(default)]
    pub profile: Profile,

    // Directory
    pub data_dir: String,
    pub static_dir: String,

    // Data files
    pub projects_file: String,
    pub experiences_file: String,
    pub messages_file: String,

    // Secrets
    pub secret_key: String,

    // Contact relay
    #[serde(default)]
    pub mail: MailConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            profile: Profile::default(),

            data_dir: ".".to_string(),
            static_dir: "static".to_string(),

            projects_file: "projects.json".to_string(),
            experiences_file: "experiences.json".to_string(),
            messages_file: "messages.json".to_string(),

            secret_key: DEFAULT_SECRET_KEY.to_string(),

            mail: MailConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(secret) = get("SECRET_KEY") {
            self.secret_key = secret;
        }
        if let Some(url) = get("MAIL_RELAY_URL") {
            self.mail.relay_url = Some(url);
        }
        if let Some(token) = get("MAIL_RELAY_TOKEN") {
            self.mail.token = Some(token);
        }
        if let Some(from) = get("MAIL_FROM") {
            self.mail.from = from;
        }
        if let Some(to) = get("MAIL_TO") {
            self.mail.to = Some(to);
        }
    }

    /// Whether the flash secret is still the development default
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// The site owner's profile shown on every page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Path relative to the static directory
    pub image: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Jollyrad Stephen Delima".to_string(),
            title: "Virtual Assistant & IT Professional".to_string(),
            description: "I'm learning web development and building a portfolio.".to_string(),
            image: "profile.jpg".to_string(),
        }
    }
}

/// Mail relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub relay_url: Option<String>,
    pub token: Option<String>,
    pub from: String,
    pub to: Option<String>,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            token: None,
            from: "portfolio@localhost".to_string(),
            to: None,
            timeout_secs: 10,
        }
    }
}

impl MailConfig {
    /// The relay is only used once it knows where to send and to whom
    pub fn is_enabled(&self) -> bool {
        self.relay_url.is_some() && self.to.is_some()
    }
}
