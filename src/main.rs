use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use clubscout::config::{Config, DEFAULT_CONFIG_PATH};
use clubscout::fetch::{BrowserFetcher, FetchStrategy, StaticFetcher};
use clubscout::outreach::{self, DryRunMailer, Mailer, SmtpMailer};
use clubscout::pipeline::ClubScraper;
use clubscout::progress::StatusBoard;
use clubscout::reference::ReferenceBook;
use clubscout::report;
use clubscout::runner::{self, BatchOptions};
use clubscout::storage;

#[derive(Parser)]
#[command(name = "clubscout", about = "Tennis club data enrichment and outreach")]
struct Cli {
    /// Config file path.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape club websites from the roster
    Scrape {
        /// Max clubs to process (testing aid)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Enable the headless-browser fallback for JS-heavy pages
        #[arg(long)]
        js_fallback: bool,
    },
    /// Show data-completeness statistics for scraped results
    Analyze,
    /// Export results as CSV
    Export {
        /// Output path (default: results path with .csv extension)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate outreach emails for clubs with missing data
    Outreach {
        /// Actually transmit (default is a dry run)
        #[arg(long)]
        send: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Scrape { limit, js_fallback } => scrape(config, limit, js_fallback),
        Commands::Analyze => analyze(config),
        Commands::Export { out } => export(config, out),
        Commands::Outreach { send } => run_outreach(config, send),
    }
}

fn scrape(config: Config, limit: Option<usize>, js_fallback: bool) -> Result<()> {
    let roster = storage::load_roster(&config.roster)?;

    let reference = ReferenceBook::load(&config.reference_sources);
    println!("Reference data: {}", reference.summary());

    let static_fetcher: Box<dyn FetchStrategy> = Box::new(StaticFetcher::new(
        Duration::from_secs(config.fetch_timeout_secs),
        config.min_visible_text,
    )?);
    let browser_fetcher: Option<Box<dyn FetchStrategy>> = if js_fallback || config.js_fallback {
        Some(Box::new(BrowserFetcher::new(&config.webdriver_url)?))
    } else {
        None
    };

    let scraper = ClubScraper::new(reference, static_fetcher, browser_fetcher);
    let status = Arc::new(StatusBoard::new());
    let options = BatchOptions {
        delay: Duration::from_millis(config.politeness_delay_ms),
        limit,
    };
    let results_path = config.results.clone();

    // The batch runs on its own thread; this thread only reads progress
    // snapshots, the same single-writer contract a polling dashboard
    // would use.
    let worker_status = Arc::clone(&status);
    let worker = thread::spawn(move || {
        runner::run_batch(&scraper, &roster, &worker_status, &options, &results_path)
    });

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    while !worker.is_finished() {
        let snap = status.snapshot();
        if snap.total > 0 {
            bar.set_length(snap.total as u64);
            bar.set_position(snap.current.saturating_sub(1) as u64);
            bar.set_message(snap.current_club.clone());
        }
        thread::sleep(Duration::from_millis(200));
    }
    bar.finish_and_clear();

    let results = worker
        .join()
        .map_err(|_| anyhow::anyhow!("scrape worker panicked"))??;

    let snap = status.snapshot();
    println!();
    println!("{}", "=".repeat(60));
    println!("Scraping summary");
    println!("{}", "=".repeat(60));
    println!("Total clubs processed: {}", results.len());
    println!("Successful: {}", snap.successful);
    println!("Failed: {}", snap.failed);
    println!("Results saved to: {}", config.results.display());
    println!("{}", "=".repeat(60));

    Ok(())
}

fn analyze(config: Config) -> Result<()> {
    let records = storage::load_results(&config.results)?;
    if records.is_empty() {
        println!("No results yet. Run 'clubscout scrape' first.");
        return Ok(());
    }
    print!("{}", report::completeness_report(&records));
    Ok(())
}

fn export(config: Config, out: Option<PathBuf>) -> Result<()> {
    let records = storage::load_results(&config.results)?;
    if records.is_empty() {
        println!("No results yet. Run 'clubscout scrape' first.");
        return Ok(());
    }
    let out = out.unwrap_or_else(|| config.results.with_extension("csv"));
    storage::export_csv(&out, &records)?;
    println!("Exported {} clubs to {}", records.len(), out.display());
    Ok(())
}

fn run_outreach(config: Config, send: bool) -> Result<()> {
    let records = storage::load_results(&config.results)?;
    if records.is_empty() {
        println!("No results yet. Run 'clubscout scrape' first.");
        return Ok(());
    }

    let mailer: Box<dyn Mailer> = if send {
        Box::new(SmtpMailer::from_env(&config.smtp)?)
    } else {
        println!("Dry run: generating emails without sending (--send to transmit).");
        Box::new(DryRunMailer)
    };

    let summary = outreach::run_outreach(
        &records,
        mailer.as_ref(),
        &config.send_log,
        Duration::from_secs(config.smtp.send_delay_secs),
    )?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Outreach summary");
    println!("{}", "=".repeat(60));
    println!("Clubs needing outreach: {}", summary.candidates);
    if send {
        println!("Emails sent: {}", summary.sent);
        println!("Send failures: {}", summary.failed);
    } else {
        println!("Emails generated (dry run): {}", summary.sent);
    }
    println!("Send log: {}", config.send_log.display());
    println!("{}", "=".repeat(60));

    Ok(())
}
