//! Generate static files

use anyhow::{Context, Result};

use crate::content::loader::ContentLoader;
use crate::generator::{BuildReport, Generator};
use crate::{Blog, BuildMode};

/// Load, validate and render the whole site
///
/// Any schema violation aborts the build before anything is written. On
/// success the previous output is removed first, so pages of articles that
/// are no longer published do not survive.
pub fn run(blog: &Blog, mode: BuildMode) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(blog);
    let articles = loader
        .load_articles()
        .context("Content validation failed, nothing was generated")?;

    tracing::info!("Loaded {} articles ({:?} build)", articles.len(), mode);

    let generator = Generator::new(blog, mode)?;
    super::clean::run(blog)?;
    let report = generator.generate(&articles)?;

    if report.hidden_skipped > 0 {
        tracing::info!("Skipped {} hidden articles", report.hidden_skipped);
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}
