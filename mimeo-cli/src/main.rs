//! mimeo
//!
//! Replicates environment-manager catalog objects between consoles and
//! local snapshot directories.

use anyhow::Result;
use clap::Parser;

use mimeo_cli::config::{FileConfig, Flags, RunConfig};
use mimeo_cli::logging;
use mimeo_cli::output::{self, OutputFormat};
use mimeo_cli::pipeline::Replicator;
use mimeo_common::ObjectType;

#[derive(Parser)]
#[command(name = "mimeo", author, version, about, long_about = None)]
struct Cli {
    /// Source: console API URL or snapshot directory
    #[arg(long)]
    source: String,

    /// Target: console API URL or snapshot directory
    #[arg(long)]
    target: String,

    /// Object type to replicate (workflowhandlers, configcontexts,
    /// resourcetemplates, environmenttemplates, computeprofiles,
    /// serviceprofiles)
    #[arg(long = "type", value_name = "TYPE")]
    object_type: String,

    /// Project stamped into every replicated object
    #[arg(long)]
    project: Option<String>,

    /// Verify TLS certificates on remote endpoints
    #[arg(long)]
    verify_ssl: bool,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: String,

    /// Debug output: payload dumps and version lists
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let file_config = match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            output::print_warning(&format!("ignoring unreadable config file: {e}"));
            FileConfig::default()
        }
    };

    let object_type: ObjectType = cli.object_type.parse()?;
    let config = RunConfig::assemble(
        Flags {
            source: cli.source,
            target: cli.target,
            object_type,
            project: cli.project,
            verify_ssl: cli.verify_ssl,
            debug: cli.debug,
            output: OutputFormat::from_str(&cli.output),
        },
        file_config,
    );

    output::print_info(&format!(
        "replicating {} from {} to {}",
        config.object_type, config.source, config.target
    ));

    let format = config.output;
    let replicator = Replicator::new(config)?;
    let report = replicator.run().await?;

    output::print_summary(&report, format)?;
    Ok(())
}
