//! Table of contents
//!
//! Derives a navigational list of in-page anchors from the heading elements of
//! a rendered article body.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::helpers::strip_tags;

lazy_static! {
    static ref HEADING_RE: Regex =
        Regex::new(r"(?is)<h([1-6])(\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap();
    static ref ID_RE: Regex = Regex::new(r#"\bid\s*=\s*"([^"]*)""#).unwrap();
}

/// Shallowest heading level listed; `h1` is the page title
const MIN_LEVEL: u8 = 2;

/// One navigational entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

/// The TOC container of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableOfContents {
    max_depth: u8,
    entries: Vec<TocEntry>,
}

impl TableOfContents {
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.clamp(MIN_LEVEL, 6),
            entries: Vec::new(),
        }
    }

    /// Fill the container from the headings of `body_html`, in document order
    ///
    /// A container that already has entries is left untouched, so repeated
    /// calls for the same page add nothing. Returns the number of entries added.
    pub fn populate(&mut self, body_html: &str) -> usize {
        if !self.entries.is_empty() {
            return 0;
        }

        for caps in HEADING_RE.captures_iter(body_html) {
            let Some(level) = caps[1].parse::<u8>().ok() else {
                continue;
            };
            if !(MIN_LEVEL..=self.max_depth).contains(&level) {
                continue;
            }

            let text = strip_tags(&caps[3]).trim().to_string();
            let anchor = caps
                .get(2)
                .and_then(|attrs| ID_RE.captures(attrs.as_str()))
                .map(|id| id[1].to_string())
                .unwrap_or_else(|| slug::slugify(&text));

            if text.is_empty() && anchor.is_empty() {
                continue;
            }

            self.entries.push(TocEntry {
                level,
                text,
                anchor,
            });
        }

        tracing::trace!("TOC populated with {} entries", self.entries.len());
        self.entries.len()
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render as an indented list; empty when there is nothing to link to
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut html = String::from(r#"<ol class="toc">"#);
        for entry in &self.entries {
            html.push_str(&format!(
                r##"<li class="toc-item toc-level-{level}" style="--toc-indent: {indent}"><a class="toc-link" href="#{anchor}">{text}</a></li>"##,
                level = entry.level,
                indent = entry.level - MIN_LEVEL,
                anchor = entry.anchor,
                text = entry.text,
            ));
        }
        html.push_str("</ol>");
        html
    }
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<h2 id="install">Install</h2>
<p>text</p>
<h3 id="from-source">From <code>source</code></h3>
<h2 id="usage">Usage</h2>"#;

    #[test]
    fn test_entries_in_document_order() {
        let mut toc = TableOfContents::default();
        assert_eq!(toc.populate(BODY), 3);

        let levels: Vec<_> = toc.entries().iter().map(|e| e.level).collect();
        let anchors: Vec<_> = toc.entries().iter().map(|e| e.anchor.as_str()).collect();
        assert_eq!(levels, vec![2, 3, 2]);
        assert_eq!(anchors, vec!["install", "from-source", "usage"]);
        assert_eq!(toc.entries()[1].text, "From source");
    }

    #[test]
    fn test_populate_runs_once() {
        let mut toc = TableOfContents::default();
        toc.populate(BODY);
        assert_eq!(toc.populate(BODY), 0);
        assert_eq!(toc.len(), 3);
    }

    #[test]
    fn test_depth_and_title_filtered() {
        let mut toc = TableOfContents::new(3);
        toc.populate(r#"<h1>Title</h1><h2>A</h2><h4 id="deep">Deep</h4>"#);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc.entries()[0].anchor, "a");
    }

    #[test]
    fn test_no_headings_renders_nothing() {
        let mut toc = TableOfContents::default();
        assert_eq!(toc.populate("<p>No headings here.</p>"), 0);
        assert!(toc.is_empty());
        assert_eq!(toc.render(), "");
    }

    #[test]
    fn test_render_indents_by_level() {
        let mut toc = TableOfContents::default();
        toc.populate(BODY);
        let html = toc.render();
        assert!(html.contains(r##"<li class="toc-item toc-level-3" style="--toc-indent: 1"><a class="toc-link" href="#from-source">"##));
        assert_eq!(html.matches("toc-item").count(), 3);
    }
}
