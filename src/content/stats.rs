//! Word and line statistics for content files

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::loader::is_content_file;

/// Size of one content file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    /// File name
    pub file: String,
    pub words: usize,
    pub lines: usize,
}

impl FileStats {
    pub fn from_text(file: impl Into<String>, text: &str) -> Self {
        Self {
            file: file.into(),
            words: count_words(text),
            lines: text.lines().count(),
        }
    }
}

/// Whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Files ranked by word count, largest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsReport {
    pub entries: Vec<FileStats>,
    pub top_words: usize,
    pub top_lines: usize,
}

impl StatsReport {
    pub fn new(mut entries: Vec<FileStats>) -> Self {
        entries.sort_by(|a, b| b.words.cmp(&a.words).then_with(|| a.file.cmp(&b.file)));
        let top_words = entries.iter().map(|e| e.words).max().unwrap_or(0);
        let top_lines = entries.iter().map(|e| e.lines).max().unwrap_or(0);
        Self {
            entries,
            top_words,
            top_lines,
        }
    }

    /// Scan every content file below `dir`
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();

        if dir.exists() {
            for entry in WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() || !is_content_file(path) {
                    continue;
                }
                let text = fs::read_to_string(path)?;
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                entries.push(FileStats::from_text(file, &text));
            }
        } else {
            tracing::warn!("Content directory {:?} does not exist", dir);
        }

        Ok(Self::new(entries))
    }

    /// Words of `entry` as a rounded percentage of the largest file
    pub fn word_percent(&self, entry: &FileStats) -> u32 {
        percent(entry.words, self.top_words)
    }

    /// Lines of `entry` as a rounded percentage of the longest file
    pub fn line_percent(&self, entry: &FileStats) -> u32 {
        percent(entry.lines, self.top_lines)
    }
}

fn percent(value: usize, top: usize) -> u32 {
    if top == 0 {
        return 0;
    }
    ((value as f64 / top as f64) * 100.0).round() as u32
}
