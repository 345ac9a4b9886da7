use anyhow::{bail, ensure, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codescout_indexer::ProjectIndexer;
use codescout_search::{QueryResult, SearchEngine};
use codescout_vector_store::Index;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub mod config;
pub mod report;
pub mod ticket;

use config::CodescoutConfig;
use ticket::{extract_ticket_text, TicketClient, TicketConfig};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "codescout")]
#[command(about = "Lexical code search over a local repository", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk and vectorize a repository into an index file
    Index(IndexArgs),

    /// Rank indexed chunks against a free-text query
    Search(SearchArgs),

    /// Fetch an issue from the tracker and search for code related to it
    Ticket(TicketArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Repository root (overrides REPO_PATH and the config file)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Where to write the index (overrides INDEX_PATH and the config file)
    #[arg(long)]
    index: Option<PathBuf>,

    /// Print statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// Search query
    #[arg(required_unless_present = "query_file", conflicts_with = "query_file")]
    query: Option<String>,

    /// Read the query from a file ("-" for stdin)
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// Index file to load (overrides INDEX_PATH and the config file)
    #[arg(long)]
    index: Option<PathBuf>,

    /// Maximum number of results
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TicketArgs {
    /// Tracker item id
    item_id: u64,

    /// Index file to load (overrides INDEX_PATH and the config file)
    #[arg(long)]
    index: Option<PathBuf>,

    /// Maximum number of results
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    results: &'a [QueryResult],
}

#[derive(Serialize)]
struct TicketOutput<'a> {
    item_id: u64,
    ticket_text: &'a str,
    results: &'a [QueryResult],
}

pub async fn main_entry() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let json = match &cli.command {
        Commands::Index(args) => args.json,
        Commands::Search(args) => args.json,
        Commands::Ticket(args) => args.json,
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => log::warn!("Ignoring unreadable .env file: {err}"),
    }

    let config = CodescoutConfig::load(cli.config.as_deref())?.with_env_overrides();
    config.validate()?;

    match cli.command {
        Commands::Index(args) => run_index(args, config).await?,
        Commands::Search(args) => run_search(args, config)?,
        Commands::Ticket(args) => run_ticket(args, config).await?,
    }

    Ok(())
}

async fn run_index(args: IndexArgs, mut config: CodescoutConfig) -> Result<()> {
    if let Some(root) = args.root {
        config.paths.root = root;
    }
    if let Some(index) = args.index {
        config.paths.index = index;
    }
    let root = config.paths.root.clone();
    let index_path = config.paths.index.clone();

    let indexer = ProjectIndexer::new(&root, &config.indexer)
        .with_context(|| format!("Cannot index {}", root.display()))?;
    let target = index_path.clone();
    let stats = tokio::task::spawn_blocking(move || indexer.index_to(target))
        .await
        .context("Indexing task panicked")??;

    log::info!("Indexed {} files into {} chunks", stats.files, stats.chunks);
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&stats)?)?;
    } else {
        print_stdout(&report::render_index_summary(&stats, &index_path))?;
    }
    Ok(())
}

fn run_search(args: SearchArgs, mut config: CodescoutConfig) -> Result<()> {
    if let Some(index) = args.index {
        config.paths.index = index;
    }
    let top_k = resolve_top_k(args.top_k, &config)?;
    let query = match (args.query, args.query_file) {
        (Some(query), _) => query,
        (None, Some(path)) => read_query_file(&path)?,
        (None, None) => bail!("Provide a query or --query-file"),
    };

    let index = load_index(&config.paths.index)?;
    let results = SearchEngine::new(&index).search(&query, top_k)?;

    if args.json {
        let output = SearchOutput {
            query: &query,
            results: &results,
        };
        print_stdout(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_stdout(&report::render_results(&results))?;
    }
    Ok(())
}

async fn run_ticket(args: TicketArgs, mut config: CodescoutConfig) -> Result<()> {
    if let Some(index) = args.index {
        config.paths.index = index;
    }
    let top_k = resolve_top_k(args.top_k, &config)?;

    let client = TicketClient::new(TicketConfig::from_env()?)?;
    let item = client.get_item(args.item_id).await?;
    let ticket_text = extract_ticket_text(&item);
    if ticket_text.is_empty() {
        bail!(
            "Ticket {} has no title or description to search for",
            args.item_id
        );
    }

    let index = load_index(&config.paths.index)?;
    let results = SearchEngine::new(&index).search(&ticket_text, top_k)?;

    if args.json {
        let output = TicketOutput {
            item_id: args.item_id,
            ticket_text: &ticket_text,
            results: &results,
        };
        print_stdout(&serde_json::to_string_pretty(&output)?)?;
    } else {
        print_stdout(&report::render_ticket_header(args.item_id, &ticket_text))?;
        print_stdout(&report::render_results(&results))?;
    }
    Ok(())
}

/// `-k` wins over `[search] top_k`; either way it must be at least 1.
fn resolve_top_k(flag: Option<usize>, config: &CodescoutConfig) -> Result<usize> {
    let top_k = flag.unwrap_or(config.search.top_k);
    ensure!(top_k >= 1, "top_k must be at least 1 (got {top_k})");
    Ok(top_k)
}

fn load_index(path: &Path) -> Result<Index> {
    let index = Index::load(path).with_context(|| {
        format!(
            "Failed to load index {} (run `codescout index` first)",
            path.display()
        )
    })?;
    log::debug!("Loaded {} chunks from {}", index.len(), path.display());
    Ok(index)
}

fn read_query_file(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut query = String::new();
        io::stdin()
            .read_to_string(&mut query)
            .context("Failed to read query from stdin")?;
        return Ok(query);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
