//! CLI entry point for quillpost

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quillpost")]
#[command(version)]
#[command(about = "A small blog engine for MDX posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Write the site to static files
    #[command(alias = "b")]
    Build,

    /// List posts, newest first
    List,

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Clean the public folder
    Clean,

    /// Search post titles on a running site
    Search {
        /// Base URL of the site
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        /// Query to run once
        #[arg(short, long)]
        query: Option<String>,

        /// Read queries from stdin, one per line
        #[arg(short, long)]
        interactive: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quillpost=debug,info"
    } else {
        "quillpost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip, open } => {
            let site = quillpost::Site::new(&base_dir)?;
            quillpost::server::start(&site, &ip, port, open).await?;
        }

        Commands::Build => {
            let site = quillpost::Site::new(&base_dir)?;
            tracing::info!("Building static files...");
            site.build()?;
            println!("Built successfully!");
        }

        Commands::List => {
            let site = quillpost::Site::new(&base_dir)?;
            quillpost::commands::list::run(&site)?;
        }

        Commands::New { title } => {
            let site = quillpost::Site::new(&base_dir)?;
            let path = site.new_post(&title)?;
            println!("Created {}", path.display());
        }

        Commands::Clean => {
            let site = quillpost::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Search {
            url,
            query,
            interactive,
        } => {
            let site = quillpost::Site::new(&base_dir)?;
            quillpost::commands::search::run(&site, &url, query.as_deref(), interactive).await?;
        }

        Commands::Version => {
            println!("quillpost {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
