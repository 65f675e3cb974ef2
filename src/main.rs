use anyhow::{Context, Result};
use clap::Parser;
use langcurl::api::{build_transport, LookupClient, Query, TransportKind};
use langcurl::config::Config;
use langcurl::result_display::{self, DisplayOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;

/// A CLI application that performs langnet API searches.
///
/// Looks up a term in the langnet classical-language service and prints
/// the response.
#[derive(Parser, Debug)]
#[command(name = "langcurl", version, about)]
struct Cli {
    /// Text to search in the langnet database [config default: οὐσία]
    #[arg(long)]
    query: Option<String>,

    /// Language code for the search (e.g. 'grc' for Greek, 'lat' for Latin) [config default: grc]
    #[arg(long)]
    language: Option<String>,

    /// Output parsable JSON instead of formatted output
    #[arg(long)]
    json: bool,

    /// Lookup endpoint (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Transport used to reach the service
    #[arg(long, value_enum)]
    transport: Option<TransportKind>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// Increase log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn generate_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::get_config_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;
    println!("Configuration file created at: {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<i32> {
    if cli.generate_config {
        generate_config(cli.config)?;
        return Ok(0);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = cli.endpoint {
        config.client.endpoint = endpoint;
    }
    if let Some(transport) = cli.transport {
        config.client.transport = transport;
    }
    if cli.timeout.is_some() {
        config.client.timeout_secs = cli.timeout;
    }

    let query = Query::new(
        cli.query.unwrap_or(config.defaults.query),
        cli.language.unwrap_or(config.defaults.language),
    )?;

    let transport = build_transport(
        config.client.transport,
        &config.client.curl_program,
        config.client.timeout(),
    )?;
    let client = LookupClient::new(&config.client.endpoint, transport)?
        .with_accepted_statuses(config.client.accepted_statuses.clone());

    let outcome = client
        .execute(&query)
        .context("API request could not be sent")?;
    debug!(target: "langcurl", "Outcome: {}", outcome.kind());

    if let Some(message) = result_display::failure_message(&outcome) {
        eprintln!("Error: {}", message);
    }

    let options = DisplayOptions {
        use_glyphs: config.display.use_glyphs,
        use_color: std::io::stdout().is_terminal(),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    result_display::render(&mut out, &outcome, cli.json, options)?;

    Ok(result_display::exit_code(&outcome))
}

fn main() {
    let cli = Cli::parse();
    if let Some(log_path) = langcurl::utils::logging::init_tracing(cli.verbose) {
        debug!(target: "langcurl", "Writing debug log to {}", log_path.display());
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
