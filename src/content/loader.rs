//! Content loader - loads and validates articles from the content directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::article::slug_from_path;
use super::error::ContentError;
use super::markdown::strip_mdx_esm;
use super::schema::ArticleMeta;
use super::stats::{count_words, FileStats};
use super::{Article, FrontMatter, MarkdownRenderer};
use crate::toc::TableOfContents;
use crate::Blog;

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &blog.config.highlight_theme,
            blog.config.line_numbers,
        );
        Self { blog, renderer }
    }

    /// Load every article, newest first
    ///
    /// The first file that fails to parse or validate aborts the load.
    pub fn load_articles(&self) -> Result<Vec<Article>, ContentError> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", source_dir);
            return Ok(Vec::new());
        }

        let mut articles = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if !is_content_file(path) {
                tracing::warn!("Skipping non-content file {:?}", path);
                continue;
            }

            let article = self.load_article(path)?;
            if let Some(first) = seen.insert(article.slug.clone(), path.to_path_buf()) {
                return Err(ContentError::DuplicateSlug {
                    slug: article.slug,
                    first,
                    second: path.to_path_buf(),
                });
            }
            articles.push(article);
        }

        // Sort by date descending (newest first)
        articles.sort_by(|a, b| b.meta.pub_date.cmp(&a.meta.pub_date));

        tracing::debug!("Loaded {} articles from {:?}", articles.len(), source_dir);
        Ok(articles)
    }

    /// Load a single article from a file
    pub fn load_article(&self, path: &Path) -> Result<Article, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (fm, body) = FrontMatter::parse(&content).map_err(|source| ContentError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;

        let meta = ArticleMeta::from_front_matter(&fm).map_err(|source| ContentError::Schema {
            path: path.to_path_buf(),
            source,
        })?;

        let markdown = if is_mdx(path) {
            strip_mdx_esm(body)
        } else {
            body.to_string()
        };
        let html = self.renderer.render(&markdown);

        let mut toc = TableOfContents::new(self.blog.config.toc_max_depth);
        toc.populate(&html);

        let source = path
            .strip_prefix(&self.blog.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        let stats = FileStats::from_text(source.clone(), &content);

        Ok(Article {
            meta,
            slug: slug_from_path(path),
            source,
            full_source: path.to_path_buf(),
            body: body.to_string(),
            content: html,
            toc,
            word_count: stats.words,
            line_count: stats.lines,
        })
    }
}

/// Check if a file is a markdown or MDX file
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}

fn is_mdx(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "mdx")
}

/// Approximate reading time in minutes, at least one
pub fn reading_minutes(body: &str) -> usize {
    count_words(body).div_ceil(200).max(1)
}
