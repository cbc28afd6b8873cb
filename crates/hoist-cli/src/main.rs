//! Hoist - contract deployment orchestrator
//!
//! Usage:
//!   hoist deploy      # Install, instantiate and publish the contract
//!   hoist show        # Print the generated installation constants

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hoist_core::config::{ConfigOverrides, DeployConfig, Environment};
use hoist_core::deploy::{DeployPipeline, DeployReport, PipelineError};
use hoist_core::output::{GeneratedConfig, read_generated_config};
use hoist_core::remote::HttpBridge;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Contract deployment orchestrator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the contract, create an instance and publish the installation
    ///
    /// Every run performs a fresh install and registration, producing a new
    /// registry key. Nothing is retried; on failure the remote state created
    /// so far is reported and left in place.
    Deploy(Box<DeployArgs>),

    /// Show the generated installation constants
    Show {
        #[command(flatten)]
        project: ProjectArgs,

        /// Generated constants file (defaults to the configured output path)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Only the registry key (deploy) or nothing (show) on success
    Quiet,
}

#[derive(clap::Args)]
struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, short = 'p')]
    project: Option<PathBuf>,

    /// Config file (defaults to hoist.toml in the project root)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct DeployArgs {
    #[command(flatten)]
    project: ProjectArgs,
    /// Contract source file
    #[arg(long)]
    contract: Option<PathBuf>,
    /// Base name the installation is published under
    #[arg(long, short)]
    name: Option<String>,
    /// Wallet petname of the issuer bound to the Tip keyword
    ///
    /// Falls back to $TIP_ISSUER_PETNAME, then hoist.toml, then "moola".
    #[arg(long, short)]
    issuer: Option<String>,
    /// Bridge endpoint for the remote services
    #[arg(long)]
    bridge_url: Option<String>,
    /// API endpoint written into the generated constants
    #[arg(long)]
    api_url: Option<String>,
    /// Generated constants file
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `--format json` output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoist=info,hoist_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy(args) => run_deploy(*args).await,
        Commands::Show {
            project,
            output,
            format,
        } => run_show(project, output, format).await,
    }
}

fn project_root(args: &ProjectArgs) -> Result<PathBuf> {
    match &args.project {
        Some(path) => Ok(path.clone()),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

fn load_config(args: &ProjectArgs, overrides: &ConfigOverrides) -> Result<DeployConfig> {
    let root = project_root(args)?;
    let env = Environment::from_process().context("Invalid process environment")?;
    DeployConfig::load(&root, args.config.as_deref(), &env, overrides)
        .context("Invalid deployment configuration")
}

async fn run_deploy(args: DeployArgs) -> Result<()> {
    let mut overrides = ConfigOverrides::new();
    if let Some(name) = &args.name {
        overrides = overrides.with_contract_name(name);
    }
    if let Some(path) = &args.contract {
        overrides = overrides.with_contract_path(path);
    }
    if let Some(petname) = &args.issuer {
        overrides = overrides.with_issuer_petname(petname);
    }
    if let Some(url) = &args.bridge_url {
        overrides = overrides.with_bridge_url(url);
    }
    if let Some(url) = &args.api_url {
        overrides = overrides.with_api_url(url);
    }
    if let Some(path) = &args.output {
        overrides = overrides.with_output_path(path);
    }

    let config = load_config(&args.project, &overrides)?;
    let bridge_url = config.bridge_url.clone();
    tracing::info!(
        contract = %config.contract_name,
        bridge = %bridge_url,
        "Starting deployment"
    );
    let pipeline = DeployPipeline::new(config);

    match pipeline.run(HttpBridge::connect(bridge_url)).await {
        Ok(report) => print_deploy_report(&report, args.format),
        Err(err) => {
            print_orphaned_state(&err);
            Err(err.into())
        }
    }
}

fn print_deploy_report(report: &DeployReport, format: OutputFormat) -> Result<()> {
    print!("{}", render_deploy_report(report, format)?);
    Ok(())
}

fn render_deploy_report(report: &DeployReport, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => format!(
            "{} Deployed '{}'\n  Registry key:  {}\n  Installation:  {}\n  Constants:     {}\n",
            style("✓").green(),
            style(&report.contract_name).bold(),
            style(&report.registry_key).green(),
            report.installation,
            report.config_path.display()
        ),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(report)?),
        // Bare key so scripts can capture it
        OutputFormat::Quiet => format!("{}\n", report.registry_key),
    };
    Ok(rendered)
}

fn print_orphaned_state(err: &PipelineError) {
    let effects = &err.side_effects;
    if effects.is_empty() {
        return;
    }

    eprintln!(
        "{} Remote state was created before '{}' failed and was not cleaned up:",
        style("⚠").yellow(),
        err.stage
    );
    if let Some(installation) = &effects.installation {
        eprintln!("  installation: {}", installation);
    }
    if let Some(instance) = &effects.instance {
        eprintln!("  instance:     {}", instance);
    }
    if let Some(key) = &effects.registry_key {
        eprintln!("  registry key: {}", key);
    }
}

async fn run_show(
    project: ProjectArgs,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let path = match output {
        Some(path) if path.is_absolute() => path,
        Some(path) => project_root(&project)?.join(path),
        None => load_config(&project, &ConfigOverrides::new())?.output_path,
    };

    let generated = read_generated_config(&path)
        .await
        .with_context(|| format!("Failed to read generated constants: {}", path.display()))?;

    print_generated(&path, &generated, format)
}

fn print_generated(path: &Path, generated: &GeneratedConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("File: {}", path.display());
            println!();
            println!("  CONTRACT_NAME         {}", generated.contract_name);
            println!("  INSTALLATION_REG_KEY  {}", generated.installation_reg_key);
            println!("  BRIDGE_URL            {}", generated.bridge_url);
            println!("  API_URL               {}", generated.api_url);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(generated)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}
