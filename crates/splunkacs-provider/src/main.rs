//! splunkacs - manage Splunk Cloud resources through ACS.
//!
//! Credentials come from `SPLUNK_DEPLOYMENT_NAME` and `SPLUNK_AUTH_TOKEN`
//! unless given on the command line or in a `--config` file. Writes block
//! until the deployment reports the change; Ctrl-C abandons the wait.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splunkacs_core::{HecTokenSpec, IndexDataType, IndexSpec, ResourceName};
use splunkacs_provider::{AcsProvider, ProviderConfig, ProviderError};

/// Manage Splunk Cloud HEC tokens and indexes.
#[derive(Parser, Debug)]
#[command(name = "splunkacs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Splunk Cloud deployment (stack) name.
    #[arg(long, global = true, env = "SPLUNK_DEPLOYMENT_NAME")]
    deployment_name: Option<String>,

    /// ACS authentication token.
    #[arg(long, global = true, env = "SPLUNK_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// ACS host override.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Give up on any single wait after this many seconds.
    #[arg(long, global = true)]
    timeout_seconds: Option<u64>,

    /// Keep waiting through throttled (429/503) reads instead of failing.
    #[arg(long, global = true)]
    retry_throttled: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// HTTP Event Collector tokens.
    #[command(subcommand)]
    HecToken(HecTokenCommand),

    /// Indexes.
    #[command(subcommand)]
    Index(IndexCommand),

    /// Show the stack type and version.
    StackStatus,
}

#[derive(Subcommand, Debug)]
enum HecTokenCommand {
    /// Show a token.
    Get { name: ResourceName },
    /// Create a token and wait until it is readable.
    Create(HecTokenArgs),
    /// Update a token and wait until the change is visible.
    Update(HecTokenArgs),
    /// Delete a token.
    Delete { name: ResourceName },
    /// Adopt an existing token by name.
    Import { id: String },
}

#[derive(Args, Debug)]
struct HecTokenArgs {
    name: ResourceName,

    #[arg(long)]
    default_index: String,

    /// May be repeated.
    #[arg(long = "allowed-index")]
    allowed_indexes: Vec<String>,

    #[arg(long)]
    default_host: Option<String>,

    #[arg(long)]
    default_source: Option<String>,

    #[arg(long)]
    default_sourcetype: Option<String>,

    #[arg(long)]
    disabled: bool,

    /// Enable indexer acknowledgement.
    #[arg(long)]
    use_ack: bool,
}

impl From<HecTokenArgs> for HecTokenSpec {
    fn from(args: HecTokenArgs) -> Self {
        Self {
            name: args.name,
            allowed_indexes: args.allowed_indexes,
            default_host: args.default_host,
            default_index: args.default_index,
            default_source: args.default_source,
            default_sourcetype: args.default_sourcetype,
            disabled: args.disabled,
            use_ack: args.use_ack,
        }
    }
}

#[derive(Subcommand, Debug)]
enum IndexCommand {
    /// Show an index.
    Get { name: ResourceName },
    /// Create an index and wait until it is readable.
    Create(IndexArgs),
    /// Change retention settings and wait until they are visible.
    Update(IndexArgs),
    /// Delete an index.
    Delete { name: ResourceName },
    /// Adopt an existing index by name.
    Import { id: String },
}

#[derive(Args, Debug)]
struct IndexArgs {
    name: ResourceName,

    /// `event` or `metric`.
    #[arg(long, default_value = "event")]
    data_type: IndexDataType,

    #[arg(long, default_value_t = 90)]
    searchable_days: u32,

    /// 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    max_data_size_mb: u64,
}

impl From<IndexArgs> for IndexSpec {
    fn from(args: IndexArgs) -> Self {
        Self {
            name: args.name,
            data_type: args.data_type,
            searchable_days: args.searchable_days,
            max_data_size_mb: args.max_data_size_mb,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ProviderConfig> {
    let mut config = match &cli.config {
        Some(path) => ProviderConfig::from_file(path)?,
        None => ProviderConfig::default(),
    };

    if cli.deployment_name.is_some() {
        config.acs.deployment_name.clone_from(&cli.deployment_name);
    }
    if cli.token.is_some() {
        config.acs.token.clone_from(&cli.token);
    }
    if cli.base_url.is_some() {
        config.acs.base_url.clone_from(&cli.base_url);
    }
    if cli.timeout_seconds.is_some() {
        config.wait.timeout_seconds = cli.timeout_seconds;
    }
    if cli.retry_throttled {
        config.wait.retry_throttled = true;
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_hec_token(
    provider: &AcsProvider,
    command: HecTokenCommand,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let tokens = provider.hec_tokens();
    match command {
        HecTokenCommand::Get { name } => print_json(&tokens.read(&name).await?),
        HecTokenCommand::Create(args) => {
            let token = tokens.create(&args.into(), cancel).await?;
            print_json(&token)
        }
        HecTokenCommand::Update(args) => {
            let planned = HecTokenSpec::from(args);
            let prior = tokens
                .read(&planned.name)
                .await
                .with_context(|| format!("HEC Token '{}' must exist to be updated", planned.name))?;
            print_json(&tokens.update(&planned, &prior, cancel).await?)
        }
        HecTokenCommand::Delete { name } => tokens.delete(&name).await.map_err(Into::into),
        HecTokenCommand::Import { id } => print_json(&tokens.import(&id).await?),
    }
}

async fn run_index(
    provider: &AcsProvider,
    command: IndexCommand,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let indexes = provider.indexes();
    match command {
        IndexCommand::Get { name } => print_json(&indexes.read(&name).await?),
        IndexCommand::Create(args) => print_json(&indexes.create(&args.into(), cancel).await?),
        IndexCommand::Update(args) => {
            let planned = IndexSpec::from(args);
            let prior = indexes
                .read(&planned.name)
                .await
                .with_context(|| format!("Index '{}' must exist to be updated", planned.name))?;
            print_json(&indexes.update(&planned, &prior, cancel).await?)
        }
        IndexCommand::Delete { name } => indexes.delete(&name).await.map_err(Into::into),
        IndexCommand::Import { id } => print_json(&indexes.import(&id).await?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,splunkacs=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    let provider = AcsProvider::configure(config)?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, abandoning wait");
                cancel.cancel();
            }
        });
    }

    let result = match cli.command {
        Command::HecToken(command) => run_hec_token(&provider, command, &cancel).await,
        Command::Index(command) => run_index(&provider, command, &cancel).await,
        Command::StackStatus => print_json(&provider.stack_status_data_source().read().await?),
    };

    if let Err(err) = &result {
        if err
            .downcast_ref::<ProviderError>()
            .is_some_and(ProviderError::is_retriable)
        {
            tracing::warn!("ACS may still be applying the change; running the command again may succeed");
        }
    }
    result
}
