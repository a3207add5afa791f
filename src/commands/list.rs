//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::taxonomy::TagIndex;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(blog);
    let articles = loader.load_articles()?;

    match content_type {
        "article" | "articles" | "post" | "posts" => {
            println!("Articles ({}):", articles.len());
            for article in &articles {
                println!(
                    "  {} - {}{} [{}]",
                    article.meta.pub_date.format("%Y-%m-%d"),
                    article.title(),
                    if article.is_visible() { "" } else { " (hidden)" },
                    article.source
                );
            }
        }
        "tag" | "tags" => {
            let index = TagIndex::collect(&articles, &blog.config);
            println!("Tags ({}):", index.len());
            for tag in index.by_count() {
                println!("  {} ({})", tag.name, tag.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: articles, tags",
                content_type
            );
        }
    }

    Ok(())
}
