// birdquiz - main.rs
// Command-line entry point: the terminal quiz plus the data-prep tools.

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use birdquiz::catalog::{loader, validate, Catalog};
use birdquiz::config::Config;
use birdquiz::media::{HttpFetcher, ImageCache, LookupResolver, MediaIndex, MediaLookup};
use birdquiz::scenes::quiz::{self, logic::run_quiz};
use birdquiz::scheduler::SystemClock;
use birdquiz::session::QuizSession;
use birdquiz::storage::{attempt_log, CsvAttemptLog, SqliteStateStore};

#[derive(Parser)]
#[command(name = "birdquiz", about = "Spaced-repetition bird identification quiz", version)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog CSV (defaults to the configured items file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// JSON object of species code -> common name, used instead of a catalog CSV
    #[arg(long, global = true, conflicts_with = "catalog")]
    mapping: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start a quiz in the terminal (the default)
    Quiz {
        /// Answers offered per question
        #[arg(long)]
        options: Option<usize>,
        /// Seed for reproducible question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show accuracy from the attempt log
    Stats,

    /// Check a catalog CSV for missing columns and blank values
    Validate {
        csv: PathBuf,
    },

    /// Download every catalog image into the cache directory
    Cache {
        /// Catalog CSV to read image URLs from
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Cache directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };

    match cli.command.unwrap_or(Command::Quiz { options: None, seed: None }) {
        Command::Quiz { options, seed } => {
            let catalog = load_catalog(&config, cli.catalog.as_deref(), cli.mapping.as_deref())?;
            start_quiz(&config, catalog, options, seed)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Stats => {
            let summary = attempt_log::summarize(&config.reviews_csv)?;
            quiz::draw_stats(&mut io::stdout(), &summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { csv } => match validate::validate_csv(&csv) {
            Ok(rows) => {
                println!("Validation passed ({} rows)", rows);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("{}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Cache { csv, dir } => {
            let catalog = load_catalog(&config, csv.as_deref().or(cli.catalog.as_deref()), cli.mapping.as_deref())?;
            let dir = dir.unwrap_or_else(|| config.cache_dir.clone());
            cache_images(&catalog, &dir, &config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_catalog(config: &Config, csv: Option<&Path>, mapping: Option<&Path>) -> Result<Catalog, Box<dyn Error>> {
    let catalog = match mapping {
        Some(path) => loader::load_mapping_json(path)?,
        None => loader::load_items_csv(csv.unwrap_or(&config.items_csv))?,
    };
    Ok(catalog)
}

fn start_quiz(config: &Config, catalog: Catalog, options: Option<usize>, seed: Option<u64>) -> Result<(), Box<dyn Error>> {
    let store = SqliteStateStore::open(&config.db_path)?;
    let attempt_log = CsvAttemptLog::new(&config.reviews_csv)?;
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = QuizSession::new(
        catalog,
        Box::new(store),
        Box::new(attempt_log),
        Box::new(SystemClock),
        Box::new(rng),
        options.unwrap_or(config.option_count),
    );

    let images = ImageCache::new(&config.cache_dir, MediaIndex::load(&config.media_index), HttpFetcher::new()?)?;
    let lookup = MediaLookup::new(MediaIndex::load(&config.lookup_index), HttpFetcher::new()?);
    let mut resolver = LookupResolver::new(lookup, images);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_quiz(&mut session, &mut resolver, &mut stdin.lock(), &mut stdout)?;

    let summary = attempt_log::summarize(&config.reviews_csv)?;
    quiz::draw_summary(&mut stdout, session.tally(), &summary)?;
    Ok(())
}

/// Prefetches every image and records it in the media index; failures are
/// reported and skipped.
fn cache_images(catalog: &Catalog, dir: &Path, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut cache = ImageCache::new(dir, MediaIndex::load(&config.media_index), HttpFetcher::new()?)?;
    let mut lookup = MediaLookup::new(MediaIndex::load(&config.lookup_index), HttpFetcher::new()?);
    let (mut fetched, mut failed) = (0, 0);
    for item in catalog.items() {
        let item = lookup.enrich(item);
        if item.image_url.is_empty() {
            println!("No image for {}", item.id);
            continue;
        }
        match cache.cache_item(&item) {
            Ok((path, true)) => {
                println!("Cached {} -> {}", item.image_url, path.display());
                fetched += 1;
            }
            Ok((_, false)) => {}
            Err(e) => {
                println!("Failed {}: {}", item.image_url, e);
                failed += 1;
            }
        }
    }
    println!("{} downloaded, {} failed", fetched, failed);
    Ok(())
}
