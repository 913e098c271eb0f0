//! Book finder CLI application.

use anyhow::{Context, Result};
use book_finder::{
    CatalogSource, CategoryDiscoverer, GoogleBooksClient, PageOutcome, RetailLinkBuilder,
    SearchSession,
};
use clap::Parser;
use serde::Serialize;
use shared::{BookItem, Config, LogConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Longest description printed in text mode, in characters
const DESCRIPTION_PREVIEW_CHARS: usize = 240;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find books by category and language", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Category to search, by id or label (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<String>,

    /// Language code to restrict results to
    #[arg(short, long)]
    language: Option<String>,

    /// Number of pages to load
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Skip category discovery and use the built-in list
    #[arg(long)]
    no_discover: bool,

    /// Print the available categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct BookView<'a> {
    #[serde(flatten)]
    book: &'a BookItem,
    retail_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let mut log_config = LogConfig::from_settings(&config.logging, "book-finder");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Book finder starting");

    let credentials = config
        .credentials()
        .context("Missing credentials")?;

    let client = GoogleBooksClient::new(&config.api, credentials.api_key.clone())
        .context("Failed to create Google Books client")?;
    let retail = RetailLinkBuilder::from_config(&config.retail, credentials.affiliate_tag.clone())
        .context("Failed to create retail link builder")?;

    let mut session = SearchSession::from_config(&config);

    if let Some(language) = &args.language {
        if !config.search.languages.iter().any(|l| &l.code == language) {
            warn!(language = %language, "Language is not in the configured list");
        }
        session.set_language(language.clone());
    }

    if config.discovery.enabled && !args.no_discover {
        let discoverer = CategoryDiscoverer::from_config(&config.discovery);
        if !session.refresh_categories(&discoverer, &client).await {
            info!("Using built-in categories");
        }
    }

    if args.list_categories {
        print_categories(&session);
        return Ok(());
    }

    for key in &args.categories {
        match session.catalog().find(key).map(|c| c.id.clone()) {
            Some(id) => {
                if !session.is_selected(&id) {
                    session.toggle_category(&id);
                }
            }
            None => warn!(category = %key, "Unknown category, ignoring"),
        }
    }

    let first = session.search(&client).await;
    report_failure(&session, first);
    for _ in 1..args.pages {
        // Each extra page stands in for the viewport reaching the bottom
        let next = session.load_more(&client, true).await;
        if next.is_none() {
            break;
        }
        report_failure(&session, next);
    }

    if args.json {
        let views: Vec<_> = session
            .items()
            .iter()
            .map(|book| BookView {
                book,
                retail_url: retail.link_for(book).to_string(),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&views).context("Failed to serialize results")?
        );
    } else {
        print_books(&session, &retail);
    }

    info!(
        books = session.items().len(),
        exhausted = session.results().is_exhausted(),
        "Book finder finished"
    );

    Ok(())
}

/// User-facing message for a page that just failed
fn failure_message(session: &SearchSession, outcome: Option<PageOutcome>) -> Option<&str> {
    match outcome {
        Some(PageOutcome::Failed) => session.results().last_error(),
        _ => None,
    }
}

fn report_failure(session: &SearchSession, outcome: Option<PageOutcome>) {
    if let Some(message) = failure_message(session, outcome) {
        eprintln!("{}", message);
    }
}

fn print_categories(session: &SearchSession) {
    match session.catalog().source() {
        CatalogSource::Defaults => println!("Categories (built-in):"),
        CatalogSource::Discovered { at, sample_labels } => println!(
            "Categories (discovered {} from {} sampled labels):",
            at.format("%Y-%m-%d %H:%M UTC"),
            sample_labels
        ),
    }
    for option in session.catalog().options() {
        println!("  {:<12} {}", option.id, option.label);
    }
}

fn print_books(session: &SearchSession, retail: &RetailLinkBuilder) {
    if session.items().is_empty() {
        println!("No books found.");
        return;
    }

    for book in session.items() {
        println!("{}", book.title);
        println!("  {}", book.authors_display("Unknown author"));

        let description = book
            .description
            .as_deref()
            .unwrap_or("No description available");
        let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        if preview.len() < description.len() {
            println!("  {}...", preview);
        } else {
            println!("  {}", preview);
        }

        if let Some(thumbnail) = &book.thumbnail_url {
            println!("  Cover: {}", thumbnail);
        }
        println!("  {}", retail.link_for(book));
        println!();
    }

    let results = session.results();
    println!(
        "{} books{}",
        session.items().len(),
        if results.is_exhausted() { " (no more results)" } else { "" }
    );
}
