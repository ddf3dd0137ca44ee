//! CLI command definitions for brand-synth.

use clap::Parser;
use std::time::Duration;

use crate::config::AppConfig;
use crate::web;

/// Brand strategy synthesiser.
#[derive(Parser)]
#[command(name = "brand-synth")]
#[command(about = "Serve the brand strategy synthesiser form")]
#[command(version)]
#[command(
    long_about = "brand-synth serves a four-panel web form: paste Customer, Competition and Brand notes, \
generate a synthesis for each with an editable prompt, then combine the latest three into a final brand strategy.\n\n\
Example usage:\n  OPENAI_API_KEY=sk-... brand-synth serve --port 8501"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve(ServeArgs),
}

/// Arguments for `brand-synth serve`. Flags override environment values.
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Model identifier for completions.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long)]
    pub api_base: Option<String>,

    /// API key (prefer the OPENAI_API_KEY environment variable).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for one completion call, in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Idle time after which a session is discarded, in seconds.
    #[arg(long)]
    pub session_ttl_secs: Option<u64>,
}

impl ServeArgs {
    /// Apply the flags on top of `config` and re-validate.
    pub fn apply(self, mut config: AppConfig) -> Result<AppConfig, crate::config::ConfigError> {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(api_base) = self.api_base {
            config.api_base = api_base;
        }
        if let Some(api_key) = self.api_key.filter(|k| !k.trim().is_empty()) {
            config.api_key = Some(api_key);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.session_ttl_secs {
            config.session_ttl = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with pre-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => run_serve_command(args).await,
    }
}

async fn run_serve_command(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(AppConfig::from_env()?)?;
    config.require_api_key()?;
    web::serve(config).await
}
