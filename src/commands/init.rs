//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::default_projects;

const CONFIG_TEMPLATE: &str = r#"# Portfolio configuration

# Site
title: Portfolio

# Shown in the header, home and about pages
profile:
  name: Jollyrad Stephen Delima
  title: Virtual Assistant & IT Professional
  description: I'm learning web development and building a portfolio.
  image: profile.jpg

# Directory
data_dir: .
static_dir: static

# Data files
projects_file: projects.json
experiences_file: experiences.json
messages_file: messages.json

# Secrets: prefer the SECRET_KEY environment variable
# secret_key: change-me

# Contact relay: MAIL_RELAY_URL, MAIL_RELAY_TOKEN, MAIL_FROM and MAIL_TO
# override these
mail:
  from: portfolio@localhost
  timeout_secs: 10
"#;

/// Initialize a new site in the given directory. Existing files are kept.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("static/css"))?;
    fs::create_dir_all(target_dir.join("static/js"))?;

    let projects = serde_json::to_string_pretty(&default_projects())?;

    let files: [(&str, &str); 5] = [
        ("_config.yml", CONFIG_TEMPLATE),
        ("projects.json", &projects),
        ("experiences.json", "[]\n"),
        (
            "static/css/style.css",
            include_str!("../templates/static/css/style.css"),
        ),
        (
            "static/js/main.js",
            include_str!("../templates/static/js/main.js"),
        ),
    ];

    for (name, content) in files {
        let path = target_dir.join(name);
        if path.exists() {
            tracing::info!("Skipping existing {:?}", path);
            continue;
        }
        fs::write(&path, content)?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::Project;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.profile.name, "Jollyrad Stephen Delima");
        assert_eq!(config.messages_file, "messages.json");

        let raw = fs::read_to_string(dir.path().join("projects.json")).unwrap();
        let projects: Vec<Project> = serde_json::from_str(&raw).unwrap();
        assert_eq!(projects, default_projects());

        assert!(dir.path().join("static/css/style.css").exists());
        assert!(dir.path().join("static/js/main.js").exists());
        assert!(!dir.path().join("messages.json").exists());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("projects.json"), "[]").unwrap();

        init_site(dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("projects.json")).unwrap(),
            "[]"
        );
        assert!(dir.path().join("experiences.json").exists());
    }
}
