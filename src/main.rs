use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use product_scout::normalize::{self, SortOrder};
use product_scout::report;
use product_scout::{AggregateResult, AppConfig, Orchestrator, SearchQuery, SourceTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    All,
    Amazon,
    Flipkart,
}

impl SourceArg {
    fn tags(&self) -> Vec<SourceTag> {
        match self {
            SourceArg::All => SourceTag::ALL.to_vec(),
            SourceArg::Amazon => vec![SourceTag::Amazon],
            SourceArg::Flipkart => vec![SourceTag::Flipkart],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    None,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl SortArg {
    fn order(&self) -> Option<SortOrder> {
        match self {
            SortArg::None => None,
            SortArg::PriceAsc => Some(SortOrder::PriceLowToHigh),
            SortArg::PriceDesc => Some(SortOrder::PriceHighToLow),
            SortArg::Rating => Some(SortOrder::RatingHighToLow),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

/// Search Amazon and Flipkart for a product and compare the listings.
#[derive(Debug, Parser)]
#[command(name = "product-scout", version, about)]
struct Cli {
    /// Search query; omit to start an interactive prompt
    query: Option<String>,

    /// Which storefronts to search
    #[arg(long, value_enum, default_value = "all")]
    source: SourceArg,

    /// Ordering applied to the merged listings
    #[arg(long, value_enum, default_value = "none")]
    sort: SortArg,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Configuration file used instead of the layered config/ directory
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays machine-readable
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("product_scout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::from_env(),
    }
    .context("Failed to load configuration")?;

    let orchestrator = Orchestrator::from_config(&config, &cli.source.tags())
        .context("Failed to set up source adapters")?;
    info!(sources = ?orchestrator.sources(), "Product scout ready");

    match &cli.query {
        Some(raw) => {
            let query = SearchQuery::new(raw)?;
            run_query(&orchestrator, &query, &cli).await?;
        }
        None => interactive(&orchestrator, &cli).await?,
    }

    Ok(())
}

async fn interactive(orchestrator: &Orchestrator, cli: &Cli) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nWhat product would you like to search for? (or 'quit' to exit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }

        match SearchQuery::new(&line) {
            Ok(query) => run_query(orchestrator, &query, cli).await?,
            Err(_) => println!("Please enter a valid search query."),
        }
    }

    Ok(())
}

async fn run_query(orchestrator: &Orchestrator, query: &SearchQuery, cli: &Cli) -> Result<()> {
    if cli.format == OutputFormat::Table {
        println!("\nSearching for '{}'... this may take a moment.", query);
    }

    let aggregate = orchestrator.search(query).await;

    match cli.format {
        OutputFormat::Json => print_json(&aggregate, cli.sort.order())?,
        OutputFormat::Table => print_table(&aggregate, cli.sort.order()),
    }

    Ok(())
}

fn print_json(aggregate: &AggregateResult, order: Option<SortOrder>) -> Result<()> {
    let mut report = aggregate.to_report();
    if let Some(order) = order {
        report.products = normalize::sorted(aggregate.products(), order)
            .iter()
            .map(|product| product.to_plain())
            .collect();
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_table(aggregate: &AggregateResult, order: Option<SortOrder>) {
    if aggregate.is_empty() {
        println!("No products found for '{}'.", aggregate.query());
        return;
    }

    let counts: Vec<String> = aggregate
        .source_counts()
        .iter()
        .map(|(source, count)| format!("{} on {}", count, source))
        .collect();
    println!("\nFound {} products: {}", aggregate.total_found(), counts.join(", "));

    let products = match order {
        Some(order) => normalize::sorted(aggregate.products(), order),
        None => aggregate.products().to_vec(),
    };

    println!("\n{}", report::product_details(&products));
    println!("Quick comparison:\n{}", report::comparison_table(&products));
}
