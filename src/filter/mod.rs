//! Tag filter
//!
//! Presentation state of the list view: clicking a tag highlights the
//! articles carrying it and dims the rest, clicking the same tag again
//! resets. The shipped `tag-filter.js` runs the same state machine over the
//! rendered DOM; this type is the reference it is tested against.

use serde::Serialize;

use crate::content::Article;
use crate::taxonomy::TagIndex;

/// Display state of one article or tag control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Unselected, full opacity
    Neutral,
    /// Full opacity, part of the current selection
    Highlighted,
    /// Reduced opacity, outside the current selection
    Dimmed,
}

impl Selection {
    /// CSS class applied to the element, if any
    pub fn class(self) -> Option<&'static str> {
        match self {
            Selection::Neutral => None,
            Selection::Highlighted => Some("is-highlighted"),
            Selection::Dimmed => Some("is-dimmed"),
        }
    }
}

/// Snapshot of the list view, in render order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterView {
    pub articles: Vec<Selection>,
    pub tags: Vec<Selection>,
}

impl FilterView {
    /// Nothing selected
    pub fn is_reset(&self) -> bool {
        self.articles
            .iter()
            .chain(self.tags.iter())
            .all(|s| *s == Selection::Neutral)
    }

    /// Indices of highlighted articles
    pub fn highlighted_articles(&self) -> Vec<usize> {
        self.articles
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Selection::Highlighted)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Selection state over a fixed list of articles and tag controls
#[derive(Debug, Clone)]
pub struct TagFilter {
    article_tags: Vec<Vec<String>>,
    tags: Vec<String>,
    last_tag_clicked: Option<String>,
}

impl TagFilter {
    /// `article_tags[i]` is the tag set of the i-th rendered article
    pub fn new(article_tags: Vec<Vec<String>>, tags: Vec<String>) -> Self {
        Self {
            article_tags,
            tags,
            last_tag_clicked: None,
        }
    }

    pub fn from_articles(articles: &[&Article], index: &TagIndex) -> Self {
        Self::new(
            articles.iter().map(|a| a.tags().to_vec()).collect(),
            index.names(),
        )
    }

    pub fn last_tag_clicked(&self) -> Option<&str> {
        self.last_tag_clicked.as_deref()
    }

    /// Handle a click on a tag control
    pub fn on_tag_click(&mut self, tag: &str) -> FilterView {
        if self.last_tag_clicked.as_deref() == Some(tag) {
            self.last_tag_clicked = None;
        } else {
            self.last_tag_clicked = Some(tag.to_string());
        }
        self.view()
    }

    /// Current presentation
    pub fn view(&self) -> FilterView {
        let Some(selected) = self.last_tag_clicked.as_deref() else {
            return FilterView {
                articles: vec![Selection::Neutral; self.article_tags.len()],
                tags: vec![Selection::Neutral; self.tags.len()],
            };
        };

        let pick = |hit: bool| {
            if hit {
                Selection::Highlighted
            } else {
                Selection::Dimmed
            }
        };

        FilterView {
            articles: self
                .article_tags
                .iter()
                .map(|tags| pick(tags.iter().any(|t| t == selected)))
                .collect(),
            tags: self.tags.iter().map(|t| pick(t == selected)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Selection::*;

    fn filter() -> TagFilter {
        TagFilter::new(
            vec![
                vec!["rust".into(), "cli".into()],
                vec!["astro".into()],
                vec![],
                vec!["rust".into(), "astro".into()],
            ],
            vec!["rust".into(), "cli".into(), "astro".into()],
        )
    }

    #[test]
    fn test_initial_view_is_reset() {
        let filter = filter();
        assert!(filter.view().is_reset());
        assert_eq!(filter.last_tag_clicked(), None);
    }

    #[test]
    fn test_click_highlights_members() {
        let mut filter = filter();
        let view = filter.on_tag_click("rust");
        assert_eq!(view.articles, vec![Highlighted, Dimmed, Dimmed, Highlighted]);
        assert_eq!(view.tags, vec![Highlighted, Dimmed, Dimmed]);
        assert_eq!(filter.last_tag_clicked(), Some("rust"));
    }

    #[test]
    fn test_second_click_resets() {
        let mut filter = filter();
        filter.on_tag_click("astro");
        let view = filter.on_tag_click("astro");
        assert!(view.is_reset());
        assert_eq!(filter.last_tag_clicked(), None);

        // and the cycle starts over
        let view = filter.on_tag_click("astro");
        assert_eq!(view.highlighted_articles(), vec![1, 3]);
    }

    #[test]
    fn test_switching_tags() {
        let mut filter = filter();
        filter.on_tag_click("rust");
        let view = filter.on_tag_click("cli");
        assert_eq!(view.highlighted_articles(), vec![0]);
        assert_eq!(view.tags, vec![Dimmed, Highlighted, Dimmed]);
        assert_eq!(filter.last_tag_clicked(), Some("cli"));
    }

    #[test]
    fn test_unknown_tag_dims_everything() {
        let mut filter = filter();
        let view = filter.on_tag_click("go");
        assert!(view.highlighted_articles().is_empty());
        assert!(view.tags.iter().all(|s| *s == Dimmed));
    }

    #[test]
    fn test_selection_classes() {
        assert_eq!(Neutral.class(), None);
        assert_eq!(Highlighted.class(), Some("is-highlighted"));
        assert_eq!(Dimmed.class(), Some("is-dimmed"));
    }
}
