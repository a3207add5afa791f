//! Article schema
//!
//! Checks the types of the raw front-matter fields and converts them into an
//! [`ArticleMeta`]. Only types are enforced: an empty `tags` list is valid.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexSet;
use serde::Serialize;
use serde_yaml::Value;

use super::error::SchemaError;
use super::FrontMatter;

/// Typed article metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleMeta {
    pub title: String,
    pub description: String,
    pub pub_date: NaiveDateTime,
    pub updated_date: Option<NaiveDateTime>,
    pub hero_image: Option<String>,
    pub tags: Vec<String>,
    pub visible: bool,
}

impl ArticleMeta {
    /// Validate a raw front-matter record
    pub fn from_front_matter(fm: &FrontMatter) -> Result<Self, SchemaError> {
        validate(&fm.raw)
    }
}

/// Validate a raw record against the article schema
///
/// Besides the type checks, tag labels are normalised: surrounding
/// whitespace is trimmed, blank labels are dropped and repeated labels
/// collapse to their first occurrence.
pub fn validate(record: &Value) -> Result<ArticleMeta, SchemaError> {
    let empty = serde_yaml::Mapping::new();
    let fields = match record {
        Value::Mapping(map) => map,
        Value::Null => &empty,
        _ => return Err(SchemaError::NotAMapping),
    };
    let field = |name: &str| fields.get(name).filter(|v| !v.is_null());

    let title = required_text(field("title"), "title")?;
    let description = required_text(field("description"), "description")?;
    let pub_date = match field("pubDate") {
        Some(value) => date(value, "pubDate")?,
        None => return Err(SchemaError::MissingField("pubDate")),
    };
    let updated_date = field("updatedDate")
        .map(|v| date(v, "updatedDate"))
        .transpose()?;
    let hero_image = field("heroImage")
        .map(|v| text(v, "heroImage"))
        .transpose()?;
    let tags = match field("tags") {
        Some(value) => tag_list(value)?,
        None => Vec::new(),
    };
    let visible = match field("visible") {
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(SchemaError::WrongType {
                field: "visible",
                expected: "a boolean",
            })
        }
        None => true,
    };

    Ok(ArticleMeta {
        title,
        description,
        pub_date,
        updated_date,
        hero_image,
        tags,
        visible,
    })
}

fn required_text(value: Option<&Value>, field: &'static str) -> Result<String, SchemaError> {
    match value {
        Some(v) => text(v, field),
        None => Err(SchemaError::MissingField(field)),
    }
}

fn text(value: &Value, field: &'static str) -> Result<String, SchemaError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(SchemaError::WrongType {
            field,
            expected: "text",
        })
}

/// Trimmed, non-blank, first occurrence of each label
fn tag_list(value: &Value) -> Result<Vec<String>, SchemaError> {
    let wrong = SchemaError::WrongType {
        field: "tags",
        expected: "a sequence of text",
    };
    let Value::Sequence(items) = value else {
        return Err(wrong);
    };

    let mut tags = IndexSet::new();
    for item in items {
        let tag = item.as_str().ok_or_else(|| wrong.clone())?;
        let tag = tag.trim();
        if !tag.is_empty() {
            tags.insert(tag.to_string());
        }
    }
    Ok(tags.into_iter().collect())
}

fn date(value: &Value, field: &'static str) -> Result<NaiveDateTime, SchemaError> {
    let s = value.as_str().ok_or(SchemaError::WrongType {
        field,
        expected: "a date",
    })?;
    parse_date_string(s).ok_or_else(|| SchemaError::InvalidDate {
        field,
        value: s.to_string(),
    })
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 with offset first, normalised to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    const DATETIME_FORMATS: [&str; 7] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%b %d %Y",
        "%B %d %Y",
        "%b %d, %Y",
        "%B %d, %Y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
