//! Front-matter extraction
//!
//! Splits a content file into its raw YAML header and the markdown body.
//! Typing of the header fields is left to [`super::schema`].

use serde_yaml::Value;

/// Raw front-matter of an article, untyped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// `Value::Null` when the file has no header
    pub raw: Value,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content without a `---` header yields an empty record; the schema
    /// then reports the missing fields.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if !content.starts_with("---") {
            return Ok((FrontMatter::default(), content));
        }

        let rest = content[3..].trim_start_matches([' ', '\t']);
        let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'));
        let Some(rest) = rest else {
            // `----` or `--- text` is a horizontal rule, not a header
            return Ok((FrontMatter::default(), content));
        };

        let Some((yaml_content, remaining)) = split_closing_fence(rest) else {
            return Ok((FrontMatter::default(), content));
        };

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        if !looks_like_yaml(yaml_content) {
            return Ok((FrontMatter::default(), content));
        }

        let raw: Value = serde_yaml::from_str(yaml_content)?;
        Ok((FrontMatter { raw }, remaining))
    }

    pub fn is_empty(&self) -> bool {
        match &self.raw {
            Value::Null => true,
            Value::Mapping(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

/// Find the closing `---` line, returning (yaml, body)
fn split_closing_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Valid YAML front-matter has at least one `key: value` line
fn looks_like_yaml(yaml_content: &str) -> bool {
    yaml_content.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = unquote(&trimmed[..colon_pos]);
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

/// Strip one pair of matching YAML quotes from a key
fn unquote(key: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = key
            .strip_prefix(quote)
            .and_then(|k| k.strip_suffix(quote))
        {
            return inner;
        }
    }
    key
}
