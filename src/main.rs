//! cfdiv - Codeforces problem-slot statistics
//!
//! Fetches the contest list and the problemset from the Codeforces API,
//! keeps the most recent finished contests of one division, and reports
//! rating distributions and common tags for problems A-F.
//!
//! Exit codes:
//!   0 - Success (including runs that found no data)
//!   1 - Runtime error (fetch failure, bad config, chart rendering)

mod analysis;
mod api;
mod cli;
mod config;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use report::{ChartPaths, Summary};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("cfdiv v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .cfdiv.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Fetch both feeds, aggregate, print the summary and render charts.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    // Progress lines would corrupt JSON on stdout.
    let chatty = !args.quiet && args.format == OutputFormat::Text;
    let category = config.selection.category.clone();
    let count = config.selection.count;

    let client = api::FeedClient::new(&config.api.base_url, config.api.timeout_seconds, chatty)
        .context("Failed to create HTTP client")?;

    if chatty {
        println!("📥 Fetching data from {}...", config.api.base_url);
    }

    // Step 1: contest selection
    let contests = client
        .fetch_contests()
        .await
        .context("Error fetching contests")?;
    let selected = analysis::select_contests(&contests, &category, count);
    if chatty {
        println!("🔎 Analyzing {} recent {} contests...", selected.len(), category);
    }
    if selected.is_empty() {
        warn!("No finished contests match {:?}", category);
    }

    // Step 2: problem aggregation
    let problems = client
        .fetch_problems()
        .await
        .context("Error fetching problems")?;
    let aggregation = analysis::aggregate(&problems, &selected);
    info!(
        "{} rating rows from {} problems",
        aggregation.ratings.len(),
        problems.len()
    );
    if aggregation.is_empty() {
        warn!("Selected contests produced no ratings or tags");
    }

    // Step 3: summaries
    let summary = Summary::new(
        &category,
        count,
        selected.len(),
        &aggregation.ratings,
        &aggregation.tags,
        config.report.top_tags,
    );
    match args.format {
        OutputFormat::Text => print!(
            "{}",
            report::generate_text_report(&summary, config.report.top_tags)
        ),
        OutputFormat::Json => println!("{}", report::generate_json_report(&summary)?),
    }

    // Step 4: charts
    if config.report.charts {
        render_charts(&config, &aggregation, chatty)?;
    } else {
        debug!("Chart rendering disabled");
    }

    info!("Finished in {:.1}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Render both chart images into the configured directory.
fn render_charts(config: &Config, aggregation: &analysis::Aggregation, chatty: bool) -> Result<()> {
    let dir = &config.report.output_dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let category = &config.selection.category;
    let count = config.selection.count;
    let paths = ChartPaths::new(dir, category, count);

    if chatty {
        println!("\n📊 Generating charts...");
    }

    let title = format!(
        "Problem Rating Distribution - Past {} {} Contests",
        count, category
    );
    let wrote = report::render_rating_boxplot(&paths.ratings, &aggregation.ratings, &title)
        .with_context(|| format!("Failed to render {}", paths.ratings.display()))?;
    if chatty {
        if wrote {
            println!("   Saved '{}'", paths.ratings.display());
        } else {
            println!("   No rating data, skipped rating chart.");
        }
    }

    let title = format!(
        "Top {} Tags by Problem Level (Past {} {})",
        config.report.chart_tags, count, category
    );
    let wrote = report::render_tag_bars(
        &paths.tags,
        &aggregation.tags,
        config.report.chart_tags,
        &title,
    )
    .with_context(|| format!("Failed to render {}", paths.tags.display()))?;
    if chatty {
        if wrote {
            println!("   Saved '{}'", paths.tags.display());
        } else {
            println!("   No tag data, skipped tag chart.");
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
