//! Gift finder entry point
//!
//! It supports two modes:
//! - One-shot (--query or --preset): prints one ranked list and exits
//! - Interactive (default): a prompt loop reading queries from stdin

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use giftfinder_cli::display;
use giftfinder_cli::presets::Preset;
use giftfinder_cli::repl::{self, Command};
use giftfinder_core::{
    CatalogConfig, FastEmbedEncoder, GiftFinder, SearchConfig, DEFAULT_CACHE_FILE,
    DEFAULT_CONVERSION_RATE,
};

#[derive(Parser)]
#[command(name = "giftfinder")]
#[command(about = "Semantic gift search over a product catalog")]
#[command(version)]
struct Args {
    /// Product catalog CSV
    #[arg(long, default_value = "amazon.csv")]
    catalog: PathBuf,

    /// Embedding cache file, built on first run
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache: PathBuf,

    /// Describe the recipient in any language; omit for the interactive prompt
    #[arg(long, short)]
    query: Option<String>,

    /// Search a preset category instead of a free-text query
    #[arg(long, value_enum, conflicts_with = "query")]
    preset: Option<Preset>,

    /// Budget ceiling in EUR
    #[arg(long, default_value_t = 50.0)]
    max_price: f64,

    /// Maximum number of results
    #[arg(long, default_value_t = 15)]
    top_k: usize,

    /// Minimum cosine similarity; matches must score strictly above it
    #[arg(long, default_value_t = 0.35)]
    threshold: f32,

    /// Units of the catalog's source currency per EUR
    #[arg(long, default_value_t = DEFAULT_CONVERSION_RATE)]
    conversion_rate: f64,

    /// Embedding model (paraphrase-ml-minilm, multilingual-e5-small, all-minilm-l6-v2)
    #[arg(long)]
    model: Option<String>,

    /// Print one-shot results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_filter = if args.verbose {
        "giftfinder=debug,giftfinder_cli=debug,giftfinder_core=debug"
    } else {
        "giftfinder=info,giftfinder_cli=info,giftfinder_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    tracing::info!("Loading embedding model (the first run downloads it)");
    let encoder = match args.model.as_deref() {
        Some(name) => FastEmbedEncoder::with_model_name(name)?,
        None => FastEmbedEncoder::new()?,
    };
    let encoder: Arc<dyn giftfinder_core::TextEncoder> = Arc::new(encoder);

    let catalog_config = CatalogConfig {
        conversion_rate: args.conversion_rate,
    };
    let finder = GiftFinder::open(&args.catalog, &args.cache, encoder, &catalog_config)
        .with_context(|| format!("failed to open catalog {}", args.catalog.display()))?;

    let config = SearchConfig {
        top_k: args.top_k,
        relevance_threshold: args.threshold,
    };

    let query = args
        .preset
        .map(|p| p.query().to_string())
        .or_else(|| args.query.clone());
    match query {
        Some(query) => run_once(&finder, &query, args.max_price, &config, args.json),
        None => run_prompt(&finder, args.max_price, &config),
    }
}

fn run_once(
    finder: &GiftFinder,
    query: &str,
    max_price: f64,
    config: &SearchConfig,
    json: bool,
) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query is empty; describe the recipient or use --preset");
    }

    let results = finder.search_with(query, max_price, config)?;
    let mut stdout = io::stdout().lock();
    if json {
        display::render_json(&mut stdout, &results)?;
    } else {
        display::render_results(&mut stdout, &results, finder.affordable_count(max_price))?;
    }
    Ok(())
}

fn run_prompt(finder: &GiftFinder, mut max_price: f64, config: &SearchConfig) -> anyhow::Result<()> {
    let steps = repl::BUDGET_STEPS
        .iter()
        .map(|v| format!("{v}"))
        .collect::<Vec<_>>()
        .join(", ");

    println!("Describe the gift recipient in any language.");
    println!("Commands: :budget <eur>  :presets  :quit  (typical budgets: {steps})");

    let stdin = io::stdin();
    loop {
        print!("[{max_price:.0} EUR] gift> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match repl::parse_command(&line) {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Presets => {
                for preset in Preset::ALL {
                    println!("  {:<16} {}", preset.label(), preset.query());
                }
            }
            Command::Budget(value) => {
                max_price = value;
                println!(
                    "Budget set to {:.2} EUR ({} products available)",
                    max_price,
                    finder.affordable_count(max_price)
                );
            }
            Command::Unknown(text) => {
                println!("Unknown command ':{text}'. Commands: :budget <eur>  :presets  :quit");
            }
            Command::Query(query) => {
                let results = finder.search_with(&query, max_price, config)?;
                let mut stdout = io::stdout().lock();
                display::render_results(&mut stdout, &results, finder.affordable_count(max_price))?;
            }
        }
    }
    Ok(())
}
