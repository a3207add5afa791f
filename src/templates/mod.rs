//! Built-in blog templates using the Tera template engine
//!
//! Templates, the stylesheet and the client scripts are embedded in the
//! binary, so a site only needs content and a config file.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Static files written under `assets/` of the output directory
pub const ASSETS: &[(&str, &str)] = &[
    ("style.css", include_str!("assets/style.css")),
    ("tag-filter.js", include_str!("assets/tag-filter.js")),
    ("reading-progress.js", include_str!("assets/reading-progress.js")),
];

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Content is pre-rendered HTML and every text field is escaped when
        // the template data is built
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("article.html", include_str!("blog/article.html")),
            ("partials/head.html", include_str!("blog/partials/head.html")),
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
            (
                "partials/tag_list.html",
                include_str!("blog/partials/tag_list.html"),
            ),
            ("partials/toc.html", include_str!("blog/partials/toc.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::helpers::strip_tags(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetUrls {
    pub stylesheet: String,
    pub tag_filter: String,
    pub reading_progress: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    /// List view with this tag selected
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub title: String,
    pub description: String,
    pub date: String,
    pub date_iso: String,
    pub updated: Option<String>,
    pub url: String,
    pub hero_image: Option<String>,
    pub tags: Vec<TagLink>,
    /// JSON array of the raw labels, escaped for an attribute value
    pub tags_json: String,
    pub visible: bool,
    pub reading_minutes: usize,
    pub selection_class: Option<&'static str>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagData {
    pub name: String,
    pub count: usize,
    pub style: String,
    /// Where the control leads without scripts
    pub url: String,
    pub selection_class: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavArticle {
    pub title: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: "Test".into(),
                description: "<b>desc</b>".into(),
                author: "Me".into(),
                language: "en".into(),
                url: "http://localhost".into(),
            },
        );
        context.insert(
            "assets",
            &AssetUrls {
                stylesheet: "/assets/style.css".into(),
                tag_filter: "/assets/tag-filter.js".into(),
                reading_progress: "/assets/reading-progress.js".into(),
            },
        );
        context.insert("root", "/");
        context.insert("feed_url", "/rss.xml");
        context.insert("canonical_url", "http://localhost/");
        context.insert("current_year", "2024");
        context.insert("dev_mode", &false);
        context.insert("body_class", "list");
        context.insert("page_title", &Option::<String>::None);
        context.insert("page_description", "<b>desc</b>");
        context.insert("selected_tag", &Option::<String>::None);
        context
    }

    #[test]
    fn test_templates_parse() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_render_empty_index() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("articles", &Vec::<ArticleData>::new());
        context.insert("tags", &Vec::<TagData>::new());

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("Nothing published yet."));
        assert!(html.contains(r#"<meta name="description" content="desc">"#));
        assert!(!html.contains("tag-list"));
        assert!(html.contains("/assets/tag-filter.js"));
    }

    #[test]
    fn test_render_selected_tag() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("selected_tag", &Some("rust"));
        context.insert("articles", &Vec::<ArticleData>::new());
        context.insert(
            "tags",
            &vec![TagData {
                name: "rust".into(),
                count: 1,
                style: "tag-default".into(),
                url: "/".into(),
                selection_class: Some("is-highlighted"),
            }],
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(r#"data-selected-tag="rust""#));
        assert!(html.contains(r#"class="tag tag-default is-highlighted" href="/" data-tag="rust""#));
    }

    #[test]
    fn test_assets_embedded() {
        let names: Vec<_> = ASSETS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["style.css", "tag-filter.js", "reading-progress.js"]);
        assert!(ASSETS.iter().all(|(_, body)| !body.is_empty()));
    }
}
