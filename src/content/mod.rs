//! Content module - article schema, loading and rendering

mod article;
pub mod error;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod schema;
pub mod stats;

pub use article::{slug_from_path, Article};
pub use error::{ContentError, SchemaError};
pub use frontmatter::FrontMatter;
pub use markdown::{strip_mdx_esm, MarkdownRenderer};
pub use schema::ArticleMeta;
