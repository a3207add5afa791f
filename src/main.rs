//! CLI entry point for tagblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagblog::server::ServeOptions;
use tagblog::{Blog, BuildMode};

#[derive(Parser)]
#[command(name = "tagblog")]
#[command(version)]
#[command(about = "A static blog generator with tag filtering and tables of contents", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the site
    #[command(alias = "b")]
    Build {
        /// Development build: hidden articles are published too
        #[arg(long)]
        dev: bool,
    },

    /// Build in development mode and serve with live reload
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Serve once without watching for changes
        #[arg(long)]
        r#static: bool,
    },

    /// Create a new article
    New {
        /// Title of the new article
        title: String,

        /// File name to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List articles or tags
    List {
        /// Type of content to list (articles, tags)
        #[arg(default_value = "articles")]
        r#type: String,
    },

    /// Word and line counts of every article
    Stats,

    /// Remove the output directory
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "tagblog=debug,info"
    } else {
        "tagblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    let blog = Blog::new(&base_dir)?;

    match cli.command {
        Commands::Build { dev } => {
            let mode = if dev {
                BuildMode::Development
            } else {
                BuildMode::Production
            };
            let report = blog.build(mode)?;
            println!(
                "Generated {} articles and {} tags into {:?}",
                report.articles, report.tags, blog.output_dir
            );
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            let options = ServeOptions {
                ip,
                port,
                open,
                watch: !r#static,
            };
            tagblog::server::start(&blog, &options).await?;
        }

        Commands::New { title, slug } => {
            let path = tagblog::commands::new::create_article(&blog, &title, slug.as_deref())?;
            println!("Created {}", path.display());
        }

        Commands::List { r#type } => {
            tagblog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Stats => {
            tagblog::commands::stats::run(&blog)?;
        }

        Commands::Clean => {
            blog.clean()?;
            println!("Cleaned {:?}", blog.output_dir);
        }
    }

    Ok(())
}
