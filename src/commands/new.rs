//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Front-matter template of a new article
fn scaffold(title: &str, date: &str) -> String {
    format!(
        r#"---
title: {title}
description: ''
pubDate: {date}
tags: []
visible: false
---

"#,
        title = quote_yaml(title),
        date = date,
    )
}

/// Quote a value for a YAML scalar
fn quote_yaml(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Create a new article file and return its path
///
/// New articles start hidden so they only show up in development builds.
pub fn create_article(blog: &Blog, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}", title);
    }

    fs::create_dir_all(&blog.source_dir)?;
    let file_path = blog.source_dir.join(format!("{}.md", slug));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(&file_path, scaffold(title, &today))?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;

    #[test]
    fn test_new_article_passes_schema() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_article(&blog, "Rust's Ownership", None).unwrap();
        assert!(path.ends_with("content/blog/rust-s-ownership.md"));

        let articles = ContentLoader::new(&blog).load_articles().unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].meta.title, "Rust's Ownership");
        assert!(!articles[0].is_visible());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        create_article(&blog, "Hello", None).unwrap();
        assert!(create_article(&blog, "Hello", None).is_err());
    }

    #[test]
    fn test_explicit_slug() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_article(&blog, "Hello", Some("Greeting Post")).unwrap();
        assert!(path.ends_with("greeting-post.md"));
    }
}
