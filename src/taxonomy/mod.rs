//! Tag index - the union of all article tags

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

use crate::config::SiteConfig;
use crate::content::Article;

/// A tag control as rendered on the list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub name: String,
    /// Directory of the tag view, unique within the index
    pub slug: String,
    pub count: usize,
    /// CSS class keyed by label
    pub style: String,
}

/// Every distinct tag across a set of articles, in first-seen order
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagIndex {
    entries: IndexMap<String, TagEntry>,
}

impl TagIndex {
    /// Collect the union of the tags of `articles`
    pub fn collect<'a, I>(articles: I, config: &SiteConfig) -> Self
    where
        I: IntoIterator<Item = &'a Article>,
    {
        let mut entries: IndexMap<String, TagEntry> = IndexMap::new();
        let mut slugs: HashSet<String> = HashSet::new();

        for article in articles {
            for tag in article.tags() {
                entries
                    .entry(tag.clone())
                    .or_insert_with(|| TagEntry {
                        name: tag.clone(),
                        slug: unique_slug(tag, &mut slugs),
                        count: 0,
                        style: config.tag_style(tag).to_string(),
                    })
                    .count += 1;
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&TagEntry> {
        self.entries.get(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Entries ordered by article count, most used first
    pub fn by_count(&self) -> Vec<&TagEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        entries
    }
}

/// Labels like `C++` and `C` slugify alike; later ones get a counter
fn unique_slug(tag: &str, taken: &mut HashSet<String>) -> String {
    let base = match slug::slugify(tag) {
        s if s.is_empty() => "tag".to_string(),
        s => s,
    };

    let mut candidate = base.clone();
    let mut n = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}-{}", base, n);
        n += 1;
    }
    candidate
}
