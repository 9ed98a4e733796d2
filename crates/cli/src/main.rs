mod agents;
mod insights;
mod leads;
mod pages;
mod prompt;
mod properties;
mod render;

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use summer_core::CrmError;
use summer_remote::config::parse_base_url;
use summer_remote::{ClientConfig, ConfigError, Transport, UreqTransport};

#[derive(Parser)]
#[command(
    name = "summer",
    version,
    about = "Summer real-estate CRM client",
    long_about = None
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "text")]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Base URL of the CRM API (overrides SUMMER_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List the agent roster
    Agents(agents::AgentsArgs),

    /// Manage leads
    Leads {
        #[command(subcommand)]
        command: leads::LeadsCommand,
    },

    /// Manage property listings
    Properties {
        #[command(subcommand)]
        command: properties::PropertiesCommand,
    },

    /// Fetch quote, fortune, color and spirit animal from the API
    Insights,

    /// Headline figures across every page
    Analytics,
}

/// Everything a command needs from the global flags.
pub(crate) struct Context {
    pub output: OutputFormat,
    pub quiet: bool,
    pub config: ClientConfig,
}

impl Context {
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(UreqTransport::new(self.config.timeout))
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Crm(#[from] CrmError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),

    #[error("Delete aborted.")]
    Aborted,

    /// Already shown to the user through the prompt.
    #[error("{0}")]
    Alerted(String),
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            CliError::Crm(e) => e.kind(),
            CliError::Config(_) => "config",
            CliError::Usage(_) => "usage",
            CliError::Aborted => "aborted",
            CliError::Alerted(_) => "alert",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = match load_config(cli.api_base.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(&CliError::from(e), cli.output, cli.quiet);
            process::exit(2);
        }
    };
    let ctx = Context {
        output: cli.output,
        quiet: cli.quiet,
        config,
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_message(
                &format!("failed to start runtime: {}", e),
                "runtime",
                ctx.output,
                ctx.quiet,
            );
            process::exit(1);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Agents(args) => agents::cmd_agents(&ctx, args).await,
            Commands::Leads { command } => leads::cmd_leads(&ctx, command).await,
            Commands::Properties { command } => properties::cmd_properties(&ctx, command).await,
            Commands::Insights => insights::cmd_insights(&ctx).await,
            Commands::Analytics => insights::cmd_analytics(&ctx).await,
        }
    });

    if let Err(e) = result {
        if !matches!(e, CliError::Alerted(_)) {
            report_error(&e, ctx.output, ctx.quiet);
        }
        process::exit(1);
    }
}

fn load_config(api_base: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let config = ClientConfig::from_env()?;
    match api_base {
        Some(value) => Ok(config.with_api_base(parse_base_url("--api-base", value)?)),
        None => Ok(config),
    }
}

/// Diagnostics only; `RUST_LOG=summer=info` turns them on. Logs go to
/// stderr so `--output json` stays machine-readable.
fn init_logging(quiet: bool) {
    let default = if quiet { "off" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Report an error to stderr, respecting output format and quiet mode.
fn report_error(err: &CliError, output: OutputFormat, quiet: bool) {
    report_message(&err.to_string(), err.kind(), output, quiet);
}

pub(crate) fn report_message(msg: &str, kind: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            eprintln!("{}", msg);
        }
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg, "kind": kind }));
        }
    }
}
