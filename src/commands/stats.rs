//! Report word and line counts of the content files

use anyhow::Result;

use crate::content::stats::StatsReport;
use crate::Blog;

/// Print every content file ranked by size
pub fn run(blog: &Blog) -> Result<StatsReport> {
    let report = StatsReport::scan(&blog.source_dir)?;

    for entry in &report.entries {
        println!("{}", entry.file);
        println!(
            "{:>3} % \t {} words \t {:>3} % \t {} lines\n",
            report.word_percent(entry),
            entry.words,
            report.line_percent(entry),
            entry.lines
        );
    }

    tracing::info!("Scanned {} files", report.entries.len());
    Ok(report)
}
