//! Article model

use serde::Serialize;
use std::path::PathBuf;

use super::schema::ArticleMeta;
use crate::toc::TableOfContents;

/// A blog article, built once from its content file and never mutated after
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// Validated front-matter
    pub meta: ArticleMeta,

    /// URL-safe name derived from the file name
    pub slug: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Raw markdown body, front-matter removed
    pub body: String,

    /// Rendered HTML content
    pub content: String,

    /// Headings of the rendered content
    pub toc: TableOfContents,

    /// Whitespace-separated words in the source file
    pub word_count: usize,

    /// Lines in the source file
    pub line_count: usize,
}

impl Article {
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn tags(&self) -> &[String] {
        &self.meta.tags
    }

    pub fn is_visible(&self) -> bool {
        self.meta.visible
    }

    /// URL path of the article view (without root)
    pub fn path(&self) -> String {
        format!("{}/", self.slug)
    }
}

/// Derive the slug of a content file from its name
pub fn slug_from_path(path: &std::path::Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let slug = slug::slugify(stem);
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path(Path::new("blog/first-post.md")), "first-post");
        assert_eq!(slug_from_path(Path::new("Using MDX.mdx")), "using-mdx");
        assert_eq!(slug_from_path(Path::new("???.md")), "untitled");
    }
}
