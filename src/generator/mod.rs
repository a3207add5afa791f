//! Generator module - writes the static site using the built-in templates

use anyhow::{Context as _, Result};
use chrono::Datelike;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::loader::reading_minutes;
use crate::content::Article;
use crate::filter::{FilterView, TagFilter};
use crate::helpers::{
    date_iso, date_rfc2822, display_date, escape_html, escape_xml, full_url_for,
    strip_invalid_xml_chars, truncate_chars, url_for,
};
use crate::taxonomy::{TagEntry, TagIndex};
use crate::templates::{
    ArticleData, AssetUrls, NavArticle, SiteData, TagData, TagLink, TemplateRenderer, ASSETS,
};
use crate::{Blog, BuildMode};

/// Directory of the embedded assets inside the output
const ASSET_DIR: &str = "assets";

/// Feed file name
const FEED_FILE: &str = "rss.xml";

/// Directory of the per-tag list views
const TAG_DIR: &str = "tags";

/// Description length shown on the list view
const LIST_DESCRIPTION_CHARS: usize = 160;

/// What a build wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub articles: usize,
    pub hidden_skipped: usize,
    pub tags: usize,
    pub tag_views: usize,
    pub static_files: usize,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    mode: BuildMode,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog, mode: BuildMode) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            blog: blog.clone(),
            mode,
            renderer,
        })
    }

    /// Generate the entire site from articles sorted newest first
    pub fn generate(&self, articles: &[Article]) -> Result<BuildReport> {
        let output_dir = &self.blog.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {:?}", output_dir))?;

        let static_files = self.copy_static_files()?;
        self.write_assets()?;

        let published = self.published(articles);
        let index = TagIndex::collect(published.iter().copied(), &self.blog.config);

        self.generate_index(&published, &index)?;
        let tag_views = self.generate_tag_views(&published, &index)?;
        self.generate_article_pages(&published, &index)?;
        self.generate_feed(&published)?;

        Ok(BuildReport {
            articles: published.len(),
            hidden_skipped: articles.len() - published.len(),
            tags: index.len(),
            tag_views,
            static_files,
        })
    }

    /// Articles this build publishes
    pub fn published<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles
            .iter()
            .filter(|a| a.is_visible() || self.mode.includes_hidden())
            .collect()
    }

    fn site_data(&self) -> SiteData {
        let config = &self.blog.config;
        SiteData {
            title: escape_html(&config.title),
            description: escape_html(&config.description),
            author: escape_html(&config.author),
            language: escape_html(&config.language),
            url: config.url.clone(),
        }
    }

    fn asset_urls(&self) -> AssetUrls {
        let config = &self.blog.config;
        AssetUrls {
            stylesheet: url_for(config, &format!("{}/style.css", ASSET_DIR)),
            tag_filter: url_for(config, &format!("{}/tag-filter.js", ASSET_DIR)),
            reading_progress: url_for(config, &format!("{}/reading-progress.js", ASSET_DIR)),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, path: &str) -> Context {
        let config = &self.blog.config;
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("assets", &self.asset_urls());
        context.insert("root", &url_for(config, ""));
        context.insert("feed_url", &url_for(config, FEED_FILE));
        context.insert("canonical_url", &full_url_for(config, path));
        context.insert("current_year", &chrono::Utc::now().year().to_string());
        context.insert("dev_mode", &self.mode.includes_hidden());
        context.insert("page_title", &Option::<String>::None);
        context.insert("page_description", &self.site_data().description);
        context
    }

    fn article_data(
        &self,
        article: &Article,
        index: &TagIndex,
        selection_class: Option<&'static str>,
    ) -> ArticleData {
        let config = &self.blog.config;
        let meta = &article.meta;

        let tags_json = serde_json::to_string(&meta.tags).unwrap_or_else(|_| "[]".to_string());

        ArticleData {
            title: escape_html(&meta.title),
            description: escape_html(&meta.description),
            date: display_date(&meta.pub_date),
            date_iso: date_iso(&meta.pub_date),
            updated: meta.updated_date.as_ref().map(display_date),
            url: url_for(config, &article.path()),
            hero_image: meta
                .hero_image
                .as_deref()
                .map(|src| escape_html(&url_for(config, src))),
            tags: meta
                .tags
                .iter()
                .filter_map(|t| index.get(t))
                .map(|tag| TagLink {
                    name: escape_html(&tag.name),
                    url: url_for(config, &self.tag_view_path(tag)),
                })
                .collect(),
            tags_json: escape_html(&tags_json),
            visible: meta.visible,
            reading_minutes: reading_minutes(&article.body),
            selection_class,
            content: article.content.clone(),
        }
    }

    /// Generate the list view, unselected
    fn generate_index(&self, articles: &[&Article], index: &TagIndex) -> Result<()> {
        let filter = TagFilter::from_articles(articles, index);
        let html = self.render_list(articles, index, &filter)?;
        self.write_page(&self.blog.output_dir.join("index.html"), &html)?;
        tracing::info!(
            "Generated list view with {} articles and {} tags",
            articles.len(),
            index.len()
        );

        Ok(())
    }

    /// Generate one list view per tag with that tag already clicked
    ///
    /// These back the tag links of article pages and work without scripts.
    fn generate_tag_views(&self, articles: &[&Article], index: &TagIndex) -> Result<usize> {
        for tag in index.iter() {
            let mut filter = TagFilter::from_articles(articles, index);
            filter.on_tag_click(&tag.name);

            let html = self.render_list(articles, index, &filter)?;
            let output_path = self
                .blog
                .output_dir
                .join(self.tag_view_path(tag))
                .join("index.html");
            self.write_page(&output_path, &html)?;
            tracing::debug!("Generated tag view: {:?}", output_path);
        }

        Ok(index.len())
    }

    fn tag_view_path(&self, tag: &TagEntry) -> String {
        format!("{}/{}/", TAG_DIR, tag.slug)
    }

    /// Render the list view in the state of `filter`
    fn render_list(
        &self,
        articles: &[&Article],
        index: &TagIndex,
        filter: &TagFilter,
    ) -> Result<String> {
        let config = &self.blog.config;
        let view: FilterView = filter.view();
        let selected = filter.last_tag_clicked();

        let article_data: Vec<ArticleData> = articles
            .iter()
            .zip(view.articles.iter())
            .map(|(article, selection)| {
                let mut data = self.article_data(article, index, selection.class());
                data.description = escape_html(&truncate_chars(
                    &article.meta.description,
                    LIST_DESCRIPTION_CHARS,
                    "…",
                ));
                data.content = String::new();
                data
            })
            .collect();

        // A selected tag links back to the unselected list
        let tag_data: Vec<TagData> = index
            .iter()
            .zip(view.tags.iter())
            .map(|(tag, selection)| TagData {
                name: escape_html(&tag.name),
                count: tag.count,
                style: escape_html(&tag.style),
                url: if selected == Some(tag.name.as_str()) {
                    url_for(config, "")
                } else {
                    url_for(config, &self.tag_view_path(tag))
                },
                selection_class: selection.class(),
            })
            .collect();

        let selected_entry = selected.and_then(|name| index.get(name));
        let path = selected_entry
            .map(|tag| self.tag_view_path(tag))
            .unwrap_or_default();

        let mut context = self.create_base_context(&path);
        context.insert("body_class", "list");
        context.insert("articles", &article_data);
        context.insert("tags", &tag_data);
        context.insert("selected_tag", &selected.map(escape_html));
        if let Some(tag) = selected_entry {
            context.insert("page_title", &Some(format!("#{}", escape_html(&tag.name))));
        }

        self.renderer.render("index.html", &context)
    }

    /// Generate individual article pages
    fn generate_article_pages(&self, articles: &[&Article], index: &TagIndex) -> Result<()> {
        for (i, article) in articles.iter().enumerate() {
            // Newest first: the previous article is the older one
            let prev_article = articles.get(i + 1).map(|a| self.nav(a));
            let next_article = i.checked_sub(1).and_then(|j| articles.get(j)).map(|a| self.nav(a));

            let data = self.article_data(article, index, None);

            let mut context = self.create_base_context(&article.path());
            context.insert("body_class", "article");
            context.insert("page_title", &Some(&data.title));
            context.insert("page_description", &data.description);
            context.insert("article", &data);
            context.insert("toc", &article.toc.render());
            context.insert("prev_article", &prev_article);
            context.insert("next_article", &next_article);

            let html = self.renderer.render("article.html", &context)?;

            let output_path = self
                .blog
                .output_dir
                .join(&article.slug)
                .join("index.html");
            self.write_page(&output_path, &html)?;
            tracing::debug!("Generated article: {:?}", output_path);
        }

        Ok(())
    }

    fn nav(&self, article: &Article) -> NavArticle {
        NavArticle {
            title: escape_html(article.title()),
            url: url_for(&self.blog.config, &article.path()),
        }
    }

    /// Generate the RSS 2.0 feed
    fn generate_feed(&self, articles: &[&Article]) -> Result<()> {
        let config = &self.blog.config;
        let site_url = full_url_for(config, "");

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#);
        feed.push_str("\n<channel>\n");
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <description>{}</description>\n",
            escape_xml(&config.description)
        ));
        feed.push_str(&format!("  <link>{}</link>\n", escape_xml(&site_url)));
        feed.push_str(&format!(
            "  <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
            escape_xml(&full_url_for(config, FEED_FILE))
        ));
        feed.push_str(&format!(
            "  <language>{}</language>\n",
            escape_xml(&config.language)
        ));

        for article in articles.iter().take(config.feed_limit) {
            let link = full_url_for(config, &article.path());
            feed.push_str("  <item>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(article.title())
            ));
            feed.push_str(&format!("    <link>{}</link>\n", escape_xml(&link)));
            feed.push_str(&format!("    <guid>{}</guid>\n", escape_xml(&link)));
            feed.push_str(&format!(
                "    <description>{}</description>\n",
                escape_xml(&strip_invalid_xml_chars(&article.meta.description))
            ));
            feed.push_str(&format!(
                "    <pubDate>{}</pubDate>\n",
                date_rfc2822(&article.meta.pub_date)
            ));
            for tag in article.tags() {
                feed.push_str(&format!("    <category>{}</category>\n", escape_xml(tag)));
            }
            feed.push_str("  </item>\n");
        }

        feed.push_str("</channel>\n</rss>\n");

        let output_path = self.blog.output_dir.join(FEED_FILE);
        fs::write(&output_path, feed)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::info!("Generated {}", FEED_FILE);

        Ok(())
    }

    /// Write the embedded stylesheet and scripts
    fn write_assets(&self) -> Result<()> {
        let asset_dir = self.blog.output_dir.join(ASSET_DIR);
        fs::create_dir_all(&asset_dir)?;
        for (name, body) in ASSETS {
            fs::write(asset_dir.join(name), body)
                .with_context(|| format!("Failed to write asset {}", name))?;
        }
        Ok(())
    }

    /// Copy the static directory (images, fonts, ...) to the output
    fn copy_static_files(&self) -> Result<usize> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            match fs::copy(path, &dest) {
                Ok(_) => copied += 1,
                Err(e) => tracing::warn!("Failed to copy {:?}: {}", path, e),
            }
        }

        Ok(copied)
    }

    fn write_page(&self, output_path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::testing::article;

    fn blog(dir: &Path) -> Blog {
        Blog::with_config(dir.to_path_buf(), SiteConfig::default())
    }

    fn sample() -> Vec<Article> {
        let mut hidden = article("hidden", &["secret", "rust"]);
        hidden.meta.visible = false;
        vec![article("first", &["rust"]), hidden, article("second", &["web"])]
    }

    #[test]
    fn test_hidden_articles_excluded_in_production() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let articles = sample();

        let generator = Generator::new(&blog, BuildMode::Production).unwrap();
        let report = generator.generate(&articles).unwrap();
        assert_eq!(report.articles, 2);
        assert_eq!(report.hidden_skipped, 1);
        assert_eq!(report.tags, 2);

        let index = fs::read_to_string(blog.output_dir.join("index.html")).unwrap();
        assert!(index.contains("/first/"));
        assert!(!index.contains("/hidden/"));
        assert!(!index.contains("data-tag=\"secret\""));
        assert!(!blog.output_dir.join("hidden/index.html").exists());
    }

    #[test]
    fn test_hidden_articles_included_in_development() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let articles = sample();

        let generator = Generator::new(&blog, BuildMode::Development).unwrap();
        let report = generator.generate(&articles).unwrap();
        assert_eq!(report.articles, 3);
        assert_eq!(report.hidden_skipped, 0);

        let index = fs::read_to_string(blog.output_dir.join("index.html")).unwrap();
        assert!(index.contains("/hidden/"));
        assert!(index.contains("is-hidden-article"));
        assert!(blog.output_dir.join("hidden/index.html").exists());
    }

    #[test]
    fn test_tag_controls_unique() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let articles = vec![
            article("a", &["rust", "web"]),
            article("b", &["web", "rust"]),
            article("c", &["rust"]),
        ];

        Generator::new(&blog, BuildMode::Production)
            .unwrap()
            .generate(&articles)
            .unwrap();

        let index = fs::read_to_string(blog.output_dir.join("index.html")).unwrap();
        assert_eq!(index.matches("data-tag=\"rust\"").count(), 1);
        assert_eq!(index.matches("data-tag=\"web\"").count(), 1);
        assert!(index.contains(r#"data-tags="[&quot;rust&quot;,&quot;web&quot;]""#));
    }

    #[test]
    fn test_tag_views_apply_one_click() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let articles = vec![article("a", &["rust", "web"]), article("b", &["web"])];

        let report = Generator::new(&blog, BuildMode::Production)
            .unwrap()
            .generate(&articles)
            .unwrap();
        assert_eq!(report.tag_views, 2);

        let index = fs::read_to_string(blog.output_dir.join("index.html")).unwrap();
        assert!(!index.contains("is-dimmed"));
        assert!(!index.contains("data-selected-tag"));
        assert!(index.contains(r#"href="/tags/rust/" data-tag="rust""#));

        let rust = fs::read_to_string(blog.output_dir.join("tags/rust/index.html")).unwrap();
        assert!(rust.contains(r#"data-selected-tag="rust""#));
        assert!(rust.contains(
            r#"<li class="article-card is-highlighted" data-tags="[&quot;rust&quot;,&quot;web&quot;]">"#
        ));
        assert!(rust.contains(r#"<li class="article-card is-dimmed" data-tags="[&quot;web&quot;]">"#));
        // clicking the selected tag again leads back to the reset list
        assert!(rust.contains(r#"class="tag tag-default is-highlighted" href="/" data-tag="rust""#));
        assert!(rust.contains(r#"class="tag tag-default is-dimmed" href="/tags/web/" data-tag="web""#));
        assert!(rust.contains("<title>#rust | "));

        let page = fs::read_to_string(blog.output_dir.join("a/index.html")).unwrap();
        assert!(page.contains(r#"<a href="/tags/rust/">rust</a>"#));
    }

    #[test]
    fn test_feed_and_assets_written() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let mut articles = vec![article("a", &["x & y"])];
        articles[0].meta.title = "Fish & Chips".to_string();

        Generator::new(&blog, BuildMode::Production)
            .unwrap()
            .generate(&articles)
            .unwrap();

        let feed = fs::read_to_string(blog.output_dir.join(FEED_FILE)).unwrap();
        assert!(feed.contains("<title>Fish &amp; Chips</title>"));
        assert!(feed.contains("<link>http://example.com/a/</link>"));
        assert!(feed.contains("<category>x &amp; y</category>"));

        for (name, _) in ASSETS {
            assert!(blog.output_dir.join(ASSET_DIR).join(name).exists());
        }
    }

    #[test]
    fn test_article_page_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let mut articles = vec![article("newer", &[]), article("middle", &[]), article("older", &[])];
        let body = r#"<h2 id="one">One</h2><h2 id="two">Two</h2>"#;
        articles[1].content = body.to_string();
        articles[1].toc.populate(body);

        Generator::new(&blog, BuildMode::Production)
            .unwrap()
            .generate(&articles)
            .unwrap();

        let page = fs::read_to_string(blog.output_dir.join("middle/index.html")).unwrap();
        assert!(page.contains(r#"<a class="prev" href="/older/">"#));
        assert!(page.contains(r#"<a class="next" href="/newer/">"#));
        assert!(page.contains("toc-container"));
        assert!(page.contains(r##"href="#two""##));
        assert!(page.contains(r#"id="reading-progress""#));

        let newest = fs::read_to_string(blog.output_dir.join("newer/index.html")).unwrap();
        assert!(!newest.contains(r#"class="next""#));
        assert!(!newest.contains("toc-container"));
    }

    #[test]
    fn test_static_files_copied() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        fs::create_dir_all(blog.static_dir.join("images")).unwrap();
        fs::write(blog.static_dir.join("images/hero.jpg"), b"jpg").unwrap();
        fs::write(blog.static_dir.join("favicon.svg"), b"svg").unwrap();

        let report = Generator::new(&blog, BuildMode::Production)
            .unwrap()
            .generate(&[])
            .unwrap();
        assert_eq!(report.static_files, 2);
        assert!(blog.output_dir.join("images/hero.jpg").exists());
    }
}
