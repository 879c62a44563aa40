//! CLI command handlers

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};

use crate::composition::NamespaceScope;
use crate::config::{ConfigLoader, paths};
use crate::services::DiscoveryService;

/// Output format for composition listings
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented `<kind>/<name>` lines
    #[default]
    Text,
    /// JSON array of subtrees
    Json,
}

/// Queries against the cluster
#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Show what a resource owns (rebuilds the composition forest first)
    Composition {
        /// Custom resource kind (e.g., "Postgres")
        #[arg(long, short = 'k')]
        kind: String,
        /// Instance name; every instance of the kind when omitted
        #[arg(long, short = 'i', default_value = "")]
        instance: String,
        /// Namespace; falls back to defaultNamespace
        #[arg(long, short = 'n', default_value = "")]
        namespace: String,
        /// Query across all namespaces
        #[arg(long, short = 'A', conflicts_with = "namespace")]
        all_namespaces: bool,
        /// Output format
        #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// Describe a single resource, its owner and direct children
    Resource {
        #[arg(long, short = 'k')]
        kind: String,
        #[arg(long, short = 'i', default_value = "")]
        instance: String,
        #[arg(long, short = 'n', default_value = "")]
        namespace: String,
    },
    /// Print the schema definition for a kind (e.g., "Postgres.PostgresSpec.UserSpec")
    Explain {
        /// Dotted type path; only the first segment selects the definition
        path: String,
        /// Kind whose schema document to read; defaults to the path's first segment
        #[arg(long, short = 'k', default_value = "")]
        kind: String,
    },
    /// Print usage guidance and implementation notes for a kind
    Man {
        #[arg(long, short = 'k')]
        kind: String,
        #[arg(long, short = 'n', default_value = "")]
        namespace: String,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "defaultNamespace", "catalog.timeoutSeconds")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "defaultNamespace", "catalog.groups")
        key: String,
        /// Configuration value
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Run a query and return the text to print
///
/// Only an unreachable catalog is an error; everything else is answered with
/// explanatory text.
pub async fn handle_query_command(cmd: QueryCommand, service: &DiscoveryService) -> Result<String> {
    match cmd {
        QueryCommand::Composition {
            kind,
            instance,
            namespace,
            all_namespaces,
            output,
        } => {
            let scope = if all_namespaces {
                NamespaceScope::All
            } else {
                service.scope(&namespace)
            };
            let rendered = match output {
                OutputFormat::Text => service.build_and_query_in(&kind, &instance, &scope).await,
                OutputFormat::Json => {
                    service
                        .build_and_query_json_in(&kind, &instance, &scope)
                        .await
                }
            };
            rendered.with_context(|| format!("Failed to query composition of {}", kind))
        }
        QueryCommand::Resource {
            kind,
            instance,
            namespace,
        } => {
            let scope = service.scope(&namespace);
            service
                .ensure_fresh(&scope)
                .await
                .with_context(|| format!("Failed to build composition for {}", scope))?;
            Ok(service.query_resource_info_in(&kind, &instance, &scope))
        }
        QueryCommand::Explain { path, kind } => Ok(service.explain(&kind, &path).await),
        QueryCommand::Man { kind, namespace } => Ok(service.man_page(&kind, &namespace).await),
    }
}

/// Handle configuration subcommands
pub async fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;

            if let Some(key) = key {
                let value = crate::config::get_config_value(&config, &key)?;
                println!("{}", value);
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set { key, value } => {
            // Load existing config or create default
            let mut config = ConfigLoader::load().unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable configuration: {}", e);
                ConfigLoader::load_defaults()
            });

            crate::config::set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save_root(&config).context("Failed to save configuration")?;
            println!("Configuration saved");
        }
        ConfigSubcommand::List => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                eprintln!("Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
