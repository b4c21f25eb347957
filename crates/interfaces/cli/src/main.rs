//! hreg — query the shared company-register portal of the German federal
//! states from the command line, without a browser.

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use hreg_config::AppConfig;
use hreg_portal::{Company, MatchMode, SearchQuery, Searcher};
use hreg_states::StateCode;

#[derive(Debug, Parser)]
#[command(
    name = "hreg",
    version,
    about = "Search the shared register of companies for the German federal states"
)]
struct Cli {
    /// Search for the provided keywords.
    #[arg(short = 's', long)]
    schlagwoerter: String,

    /// Keyword semantics: all keywords, at least one, or the exact name.
    #[arg(short = 'm', long, value_enum, default_value = "all")]
    mode: CliMode,

    /// Filter by German state, as a two-letter code or a German/English
    /// name. Can be given multiple times.
    #[arg(short = 'b', long)]
    bundesland: Vec<String>,

    /// Force a fresh pull and skip the cache.
    #[arg(short = 'f', long)]
    force: bool,

    /// Enable verbose portal-protocol logging.
    #[arg(short = 'd', long)]
    debug: bool,

    /// Print the result as JSON.
    #[arg(short = 'j', long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    All,
    Min,
    Exact,
}

impl From<CliMode> for MatchMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::All => MatchMode::All,
            CliMode::Min => MatchMode::Min,
            CliMode::Exact => MatchMode::Exact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Keep normal output clean; --debug opens up the protocol logging.
    let default_filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut states = Vec::new();
    for raw in &cli.bundesland {
        match StateCode::resolve(raw) {
            Some(code) => states.push(code),
            None => bail!(
                "unknown state {raw:?} — use a two-letter code ({}) or a German/English name",
                StateCode::ALL.map(|c| c.as_str()).join(", ")
            ),
        }
    }

    let config = AppConfig::from_env()?;
    let searcher = Searcher::new(config.portal)?;

    let mut query = SearchQuery::new(&cli.schlagwoerter);
    query.mode = cli.mode.into();
    query.states = states;
    query.bypass_cache = cli.force;
    query.debug = cli.debug;

    let companies = searcher.search(&query).await?;

    if cli.json {
        println!("{}", serde_json::to_string(&companies)?);
    } else {
        for company in &companies {
            print_company(company);
        }
    }
    Ok(())
}

fn print_company(company: &Company) {
    println!("name: {}", company.name);
    println!("court: {}", company.court);
    println!(
        "register_num: {}",
        company.register_num.as_deref().unwrap_or("-")
    );
    println!("state: {}", company.state);
    println!("status: {}", company.status);
    println!("statusCurrent: {}", company.status_current);
    println!("history:");
    for (name, location) in &company.history {
        println!("{name} {location}");
    }
    println!();
}
