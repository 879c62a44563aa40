//! kubecompose - composition discovery for Kubernetes custom resources
//!
//! Answers "what is this resource part of, and what does it own?" for custom
//! resource instances, and prints schema excerpts and man pages for their kinds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kubecompose::cli::{self, ConfigSubcommand, QueryCommand};
use kubecompose::composition::{CompositionRegistry, GraphBuilder};
use kubecompose::config::ConfigLoader;
use kubecompose::kube::{KubeCatalog, KubeDocumentation, create_client};
use kubecompose::services::DiscoveryService;
use std::sync::Arc;

/// Composition discovery for Kubernetes custom resources
#[derive(Parser, Debug)]
#[command(name = "kubecompose")]
#[command(
    about = "Discover the composition structure of Kubernetes custom resources",
    long_about = None
)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Query(QueryCommand),
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let query = match args.command {
        Command::Config { subcommand } => return cli::handle_config_command(subcommand).await,
        Command::Version => {
            cli::display_version();
            return Ok(());
        }
        Command::Query(query) => query,
    };

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    tracing::debug!(
        "Configuration loaded: defaultNamespace={}, catalog timeout={}s",
        config.default_namespace,
        config.catalog.timeout_seconds
    );

    let client = create_client(config.catalog.timeout()).await?;

    let catalog = KubeCatalog::new(client.clone(), config.catalog.groups.clone());
    let builder = GraphBuilder::new(Arc::new(catalog))
        .with_timeout(config.catalog.timeout())
        .with_retries(config.catalog.retries);
    let docs = KubeDocumentation::new(client, config.docs.clone());

    let service = DiscoveryService::new(
        builder,
        Arc::new(CompositionRegistry::new()),
        Arc::new(docs),
    )
    .with_default_namespace(config.default_namespace.clone())
        .with_indent(config.composition.indent)
        .with_min_rebuild_interval(config.composition.min_rebuild_interval());

    let output = cli::handle_query_command(query, &service).await?;
    println!("{}", output);

    Ok(())
}
