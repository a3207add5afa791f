//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Remove the output directory
///
/// Refuses when the output directory is the site itself or holds the
/// content or static directory.
pub fn run(blog: &Blog) -> Result<()> {
    let output = &blog.output_dir;
    if blog.base_dir.starts_with(output)
        || blog.source_dir.starts_with(output)
        || blog.static_dir.starts_with(output)
    {
        anyhow::bail!(
            "Refusing to delete {:?}: it contains the site sources",
            output
        );
    }

    if output.exists() {
        fs::remove_dir_all(output)?;
        tracing::info!("Deleted: {:?}", output);
    } else {
        tracing::debug!("Nothing to clean at {:?}", output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        fs::create_dir_all(blog.output_dir.join("old")).unwrap();

        run(&blog).unwrap();
        assert!(!blog.output_dir.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_refuses_to_delete_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            output_dir: ".".to_string(),
            ..SiteConfig::default()
        };
        let blog = Blog::with_config(dir.path().to_path_buf(), config);

        assert!(run(&blog).is_err());
        assert!(dir.path().exists());
    }
}
