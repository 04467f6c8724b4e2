//! Built-in site templates using Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all site templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Visitors' form input is echoed back, so .html autoescaping stays on
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("about.html", include_str!("site/about.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("experiences.html", include_str!("site/experiences.html")),
            ("404.html", include_str!("site/404.html")),
            // Partials
            ("partials/head.html", include_str!("site/partials/head.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/flash.html",
                include_str!("site/partials/flash.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// A one-shot status message shown above the page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashData {
    pub category: String,
    pub message: String,
}

impl FlashData {
    pub fn new(category: &str, message: &str) -> Self {
        Self {
            category: category.to_string(),
            message: message.to_string(),
        }
    }

    pub fn success(message: &str) -> Self {
        Self::new("success", message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new("warning", message)
    }

    pub fn error(message: &str) -> Self {
        Self::new("error", message)
    }
}

/// Build the context shared by every page
pub fn base_context(config: &SiteConfig, current_path: &str, current_year: i32) -> Context {
    let site = SiteData {
        title: config.title.clone(),
        menu: default_menu(),
    };

    let mut context = Context::new();
    context.insert("site", &site);
    context.insert("user", &config.profile);
    context.insert("current_year", &current_year);
    context.insert("current_path", current_path);
    context.insert("flashes", &Vec::<FlashData>::new());
    context
}

fn default_menu() -> Vec<MenuItem> {
    [
        ("Home", "/"),
        ("About", "/about"),
        ("Projects", "/projects"),
        ("Experience", "/experiences"),
        ("Contact", "/contact"),
    ]
    .into_iter()
    .map(|(name, path)| MenuItem {
        name: name.to_string(),
        path: path.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::default_projects;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new().unwrap()
    }

    #[test]
    fn test_all_pages_render() {
        let renderer = renderer();
        let config = SiteConfig::default();

        for page in ["about.html", "404.html"] {
            let context = base_context(&config, "/", 2024);
            let html = renderer.render(page, &context).unwrap();
            assert!(html.contains("Jollyrad Stephen Delima"), "{}", page);
            assert!(html.contains("2024"), "{}", page);
        }
    }

    #[test]
    fn test_base_context_keys() {
        let context = base_context(&SiteConfig::default(), "/about", 2024);

        assert_eq!(context.get("current_year"), Some(&tera::Value::from(2024)));
        assert_eq!(context.get("current_path"), Some(&tera::Value::from("/about")));

        let site = context.get("site").unwrap();
        assert_eq!(site["title"], "Portfolio");
        assert_eq!(site["menu"].as_array().unwrap().len(), 5);
        assert!(site.get("current_year").is_none());
        assert!(site.get("current_path").is_none());
    }

    #[test]
    fn test_index_lists_projects() {
        let config = SiteConfig::default();
        let mut context = base_context(&config, "/", 2024);
        context.insert("projects", &default_projects());

        let html = renderer().render("index.html", &context).unwrap();
        assert!(html.contains("Task Tracker"));
        assert!(html.contains("Virtual Assistant &amp; IT Professional"));
    }

    #[test]
    fn test_contact_escapes_form_values() {
        let config = SiteConfig::default();
        let mut context = base_context(&config, "/contact", 2024);
        let mut form = HashMap::new();
        form.insert("name", "<script>alert(1)</script>");
        context.insert("form", &form);
        context.insert(
            "flashes",
            &vec![FlashData::error("Please enter your name.")],
        );

        let html = renderer().render("contact.html", &context).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Please enter your name."));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(5));
        let value = tera::Value::String("abcdefgh".to_string());
        let result = truncate_chars_filter(&value, &args).unwrap();
        assert_eq!(result, tera::Value::String("abcde...".to_string()));

        let short = tera::Value::String("abc".to_string());
        let result = truncate_chars_filter(&short, &args).unwrap();
        assert_eq!(result, tera::Value::String("abc".to_string()));
    }
}
