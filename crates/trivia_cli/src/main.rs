//! Command-line entry point for the trivia API.
//!
//! # Responsibility
//! - Load configuration and start logging.
//! - Seed default categories into a fresh store.
//! - Execute one API request and print the JSON response.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use trivia_api::{handle, ApiRequest, Method, TriviaConfig};
use trivia_core::db::open_db;
use trivia_core::{Category, CategoryRepository, SqliteCategoryRepository};

const DEFAULT_CATEGORIES: [(i64, &str); 6] = [
    (1, "Science"),
    (2, "Art"),
    (3, "Geography"),
    (4, "History"),
    (5, "Entertainment"),
    (6, "Sports"),
];

#[derive(Debug, Parser)]
#[command(name = "trivia", version, about = "Trivia question store and quiz API")]
struct Cli {
    /// JSON config file; `TRIVIA_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert the default categories when none exist yet.
    Seed,
    /// Execute one API request, e.g. `request GET /questions?page=2`.
    Request {
        method: String,
        target: String,
        /// Raw JSON request body.
        #[arg(long)]
        body: Option<String>,
    },
    /// Print the core library version.
    Version,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    if let Some(log_dir) = &config.log_dir {
        trivia_core::init_logging(&config.log_level, log_dir)
            .context("failed to initialize logging")?;
    }

    match cli.command {
        Command::Seed => {
            let inserted = seed_categories(&config)?;
            println!("seeded {inserted} categories into {}", config.db_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Request {
            method,
            target,
            body,
        } => run_request(&config, &method, &target, body),
        Command::Version => {
            println!("trivia_core version={}", trivia_core::core_version());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<TriviaConfig> {
    let config = match path {
        Some(path) => TriviaConfig::from_json_file(path)?
            .with_overrides(|key| std::env::var(key).ok())?,
        None => TriviaConfig::from_env()?,
    };
    Ok(config)
}

fn seed_categories(config: &TriviaConfig) -> Result<usize> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let repo = SqliteCategoryRepository::try_new(&conn)?;
    if !repo.list_categories()?.is_empty() {
        info!("event=seed_categories module=cli status=skipped reason=not_empty");
        return Ok(0);
    }

    for (id, kind) in DEFAULT_CATEGORIES {
        repo.create_category(&Category::new(id, kind))?;
    }
    info!(
        "event=seed_categories module=cli status=ok inserted={}",
        DEFAULT_CATEGORIES.len()
    );
    Ok(DEFAULT_CATEGORIES.len())
}

fn run_request(
    config: &TriviaConfig,
    method: &str,
    target: &str,
    body: Option<String>,
) -> Result<ExitCode> {
    let Some(method) = Method::parse(method) else {
        bail!("unsupported method `{method}`; expected GET|POST|PUT|DELETE|OPTIONS");
    };
    let mut request = ApiRequest::new(method, target);
    if let Some(body) = body {
        request = request.with_body(body);
    }

    let response = handle(config, &request);
    println!("{}", response.status);
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    Ok(if (200..300).contains(&response.status) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
