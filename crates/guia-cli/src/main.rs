//! Guia CLI - Command-line interface
//!
//! Usage:
//!   guia import <path|->  [--dry-run] [--llm] [--json]
//!   guia list
//!   guia show <name>
//!   guia facets
//!   guia filter [--cuisine <c>]... [--price <$|$$|$$$>] [--voucher <pref>]
//!               [--diet <d>]... [--accessibility <pref>] [--limit <n>]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use guia_catalog::{
    facets, find_match, CatalogStore, Importer, JsonCatalogStore, Preference, RestaurantFilter,
};
use guia_core::{AppConfig, GuiaError, LoggingConfig, PriceLevel, RestaurantRecord};
use guia_extractor::{FieldExtractor, LlmExtractor, LlmExtractorConfig, PatternExtractor};

#[derive(Parser)]
#[command(name = "guia")]
#[command(about = "Pinheiros restaurant guide: extract, merge and browse restaurant records")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import restaurant descriptions into the catalog
    Import {
        /// Text file with one paragraph per restaurant, or "-" for stdin
        input: String,
        /// Compute and report the merges without writing the catalog
        #[arg(long)]
        dry_run: bool,
        /// Use the language model instead of the pattern extractor
        #[arg(long)]
        llm: bool,
        /// Neighborhood assigned when a paragraph names none
        #[arg(long)]
        neighborhood: Option<String>,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog records
    List,
    /// Show one record
    Show {
        /// Restaurant name (case and accents are ignored)
        name: String,
    },
    /// List the cuisines and diet options present in the catalog
    Facets,
    /// Filter restaurants by preferences
    Filter {
        /// Accept any of these cuisines
        #[arg(long = "cuisine")]
        cuisines: Vec<String>,
        /// Exact price level
        #[arg(long, value_parser = parse_price)]
        price: Option<PriceLevel>,
        /// Meal voucher acceptance: any, yes or no
        #[arg(long, default_value = "any")]
        voucher: Preference,
        /// Require all of these diet options
        #[arg(long = "diet")]
        diets: Vec<String>,
        /// Accessibility: any, yes or no
        #[arg(long, default_value = "any")]
        accessibility: Preference,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn parse_price(token: &str) -> Result<PriceLevel, String> {
    PriceLevel::from_token(token).ok_or_else(|| format!("price must be $, $$ or $$$, got '{token}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(path) = cli.catalog {
        config.catalog.path = path;
    }

    init_tracing(&config.logging);

    let store = JsonCatalogStore::new(&config.catalog.path);

    match cli.command {
        Commands::Import {
            input,
            dry_run,
            llm,
            neighborhood,
            json,
        } => {
            if llm {
                config.extraction.use_llm = true;
            }
            if let Some(neighborhood) = neighborhood {
                config.catalog.target_neighborhood = neighborhood;
            }
            config.validate()?;

            let (text, source) = read_input(&input)?;
            let extractor = build_extractor(&config)?;
            let importer = Importer::new(extractor, config.catalog.target_neighborhood.clone());

            let plan = importer.run(&store, &text, &source, dry_run).await?;
            let report = &plan.report;

            if json {
                let output = serde_json::json!({
                    "report": report,
                    "merges": plan.merges,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            println!(
                "Run {}: {} paragraph(s), {} created, {} updated, {} unchanged, {} issue(s)",
                report.run_id,
                report.paragraphs,
                report.created,
                report.updated,
                report.unchanged,
                report.issues.len()
            );
            for merge in plan.merges.iter().filter(|m| m.has_changes()) {
                let fields: Vec<_> = merge.changed_fields().iter().map(|f| f.as_str()).collect();
                let verb = if merge.created { "new" } else { "updated" };
                println!("  {verb:<8} {} [{}]", merge.name, fields.join(", "));
            }
            for issue in &report.issues {
                println!(
                    "  skipped  paragraph {} of {} ({}): {}",
                    issue.index + 1,
                    issue.source,
                    issue.kind,
                    issue.detail
                );
            }

            if report.committed {
                println!("Catalog written to {}", store.path().display());
            } else if dry_run {
                println!("Dry run: catalog not written");
            } else {
                println!("No changes");
            }
        }
        Commands::List => {
            let catalog = store.load()?;
            for record in catalog.iter() {
                println!("{}", summary_line(record));
            }
            println!("{} restaurant(s)", catalog.len());
        }
        Commands::Show { name } => {
            let catalog = store.load()?;
            let record =
                find_match(&name, &catalog).ok_or_else(|| GuiaError::NotFound(name.clone()))?;
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        Commands::Facets => {
            let catalog = store.load()?;
            let facets = facets(&catalog);
            println!("Cuisines: {}", facets.cuisines.join(", "));
            println!("Diets:    {}", facets.diets.join(", "));
        }
        Commands::Filter {
            cuisines,
            price,
            voucher,
            diets,
            accessibility,
            limit,
        } => {
            let catalog = store.load()?;
            let filter = RestaurantFilter {
                cuisines,
                price_level: price,
                voucher,
                diets,
                accessibility,
                limit,
            };

            let results = filter.filter(&catalog);
            if results.is_empty() {
                println!("No restaurant matches these preferences.");
            }
            for record in results {
                println!("{}", summary_line(record));
            }
        }
    }

    Ok(())
}

/// Load configuration from a file or the environment
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)
            .and_then(AppConfig::with_env_override)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Pick the extraction strategy from configuration
fn build_extractor(config: &AppConfig) -> anyhow::Result<Arc<dyn FieldExtractor>> {
    if config.extraction.use_llm {
        let client = guia_llm::create_llm_client(&config.llm)?;
        tracing::info!(model = client.model(), "Using LLM extractor");
        let extractor = LlmExtractor::with_config(client, LlmExtractorConfig::from(&config.llm));
        Ok(Arc::new(extractor))
    } else {
        Ok(Arc::new(PatternExtractor::new()))
    }
}

fn read_input(input: &str) -> anyhow::Result<(String, String)> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok((text, "<stdin>".to_string()));
    }

    let path = Path::new(input);
    let text = guia_parser::load_text(path)?;
    Ok((text, path.display().to_string()))
}

fn summary_line(record: &RestaurantRecord) -> String {
    let price = record.price_level.map_or("-", |p| p.as_str());
    format!(
        "{:<32} {:<4} {:<24} voucher: {:<5} accessible: {}",
        record.name,
        price,
        record.cuisine.join(", "),
        record.accepts_voucher,
        record.accessibility
    )
}
