use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ghcontrib::report::{format_json, format_text};
use ghcontrib::{export_csv, Config, ContributionRun, RunConfig, SearchClient, SearchKind};

/// Find the merged PRs (or created issues) of a team of GitHub users.
#[derive(Parser, Debug)]
#[command(name = "ghcontrib")]
#[command(version = "0.1.0")]
#[command(about = "Tally merged PRs, reviews and issues for GitHub users on a team")]
struct Args {
    /// The config json to load
    #[arg(short = 'f', long, value_parser = existing_file)]
    filename: PathBuf,

    /// The GitHub organization that owns the repositories to search
    #[arg(short, long, default_value = "o3de")]
    organization: String,

    /// Search created issues rather than merged PRs
    #[arg(short, long, conflicts_with = "kind")]
    issues: bool,

    /// What to search for
    #[arg(short, long, value_enum)]
    kind: Option<SearchKind>,

    /// Export retained results to this CSV file, which must not exist yet
    #[arg(short, long, value_parser = new_file)]
    result: Option<PathBuf>,

    /// Report format (text, json)
    #[arg(long, default_value = "text")]
    format: String,

    /// Stop paging a search after this many pages (at least 1)
    #[arg(long)]
    max_pages: Option<NonZeroUsize>,
}

impl Args {
    fn search_kind(&self) -> SearchKind {
        match (self.kind, self.issues) {
            (Some(kind), _) => kind,
            (None, true) => SearchKind::OpenedIssues,
            (None, false) => SearchKind::MergedPrs,
        }
    }
}

fn existing_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("{} is not a file", path.display()))
    }
}

fn new_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);
    if path.exists() {
        Err(format!("{} already exists", path.display()))
    } else {
        Ok(path)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ghcontrib=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_file(&args.filename)?;

    let client = SearchClient::new(config.token())?.with_max_pages(args.max_pages);
    let run_config = RunConfig::new(&config, args.organization.clone(), args.search_kind());

    tracing::info!(
        "Searching {} for {} members of {}",
        run_config.kind,
        run_config.members.len(),
        run_config.organization
    );
    let result = match ContributionRun::new(client, run_config).run().await {
        Ok(result) => result,
        Err(e) => {
            if e.is_retryable() {
                tracing::warn!("Search failed on the GitHub side, re-running later may succeed");
            }
            return Err(e.into());
        }
    };

    let output = match args.format.as_str() {
        "json" => format_json(&result)?,
        _ => format_text(&result),
    };
    println!("{}", output);

    if let Some(ref path) = args.result {
        tracing::info!("Generating results csv: {}", path.display());
        export_csv(path, result.items())?;
    }

    Ok(())
}
