//! url-scout main entry point
//!
//! This is the command-line interface for the url-scout page discovery tool.

use anyhow::Context;
use clap::{Args, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url_scout::config::{resolve_config, Config, ConfigOverrides};
use url_scout::crawler::Fetcher;
use url_scout::output::{finalize, print_summary, CrawlSummary, FileSink, ProgressReporter};
use url_scout::{canonicalize, CanonicalUrl, CrawlOptions, Crawler, ScoutError};
use url_scout::{SitemapResolver, UrlScope};

/// url-scout: discover every page of a site
///
/// Follows links from a start URL (or resolves a sitemap) and writes every
/// in-domain page URL to a text file, one per line, as it is found.
#[derive(Parser, Debug)]
#[command(name = "url-scout")]
#[command(version = "1.0.0")]
#[command(about = "Discover every page of a site by crawling or from its sitemap", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: Source,

    /// Output file, one URL per line [default: crawled_urls.txt]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of URLs to fetch [default: 10000]
    #[arg(long, value_name = "N")]
    max_urls: Option<usize>,

    /// Maximum link depth from the start URL (crawl mode only)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Number of pages fetched at once [default: 1]
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Keep URLs that have query parameters
    #[arg(long)]
    include_params: bool,

    /// Print each failed page as it happens
    #[arg(long)]
    verbose_errors: bool,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Where discovery starts; exactly one is required
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Source {
    /// Start URL to crawl (e.g. https://www.example.com)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Sitemap or sitemap index to resolve instead of crawling
    #[arg(long, value_name = "URL")]
    sitemap: Option<String>,
}

/// Discovery mode selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Crawl,
    Sitemap,
}

impl Source {
    fn mode(&self) -> Option<(Mode, &str)> {
        match (&self.url, &self.sitemap) {
            (Some(url), _) => Some((Mode::Crawl, url.as_str())),
            (None, Some(sitemap)) => Some((Mode::Sitemap, sitemap.as_str())),
            (None, None) => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, takes precedence over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            // Only show errors
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("url_scout=info,warn"),
                1 => EnvFilter::new("url_scout=debug,info"),
                2 => EnvFilter::new("url_scout=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs one discovery and maps its outcome to an exit code
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some((mode, raw_url)) = cli.source.mode() else {
        anyhow::bail!("either --url or --sitemap is required");
    };

    let overrides = ConfigOverrides {
        max_urls: cli.max_urls,
        max_depth: cli.max_depth,
        concurrency: cli.concurrency,
        include_params: cli.include_params,
        output_path: cli.output.as_ref().map(|p| p.display().to_string()),
    };
    let config = resolve_config(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    let start = match canonicalize(raw_url, None) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: Invalid URL format: {} ({})", raw_url, e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let fetcher = Fetcher::from_config(&config.http).context("Failed to build HTTP client")?;

    // Reachability check, before any output file exists
    println!("Testing connection to {}...", start);
    if let Err(e) = fetcher.probe(&start).await {
        report_unreachable(&e);
        return Ok(ExitCode::FAILURE);
    }
    println!("Connection successful!\n");

    let output_path = PathBuf::from(&config.output.path);
    let mut sink = FileSink::create(&output_path)
        .with_context(|| format!("Could not create output file {}", output_path.display()))?;

    let progress = ProgressReporter::new(cli.quiet);
    let summary = match mode {
        Mode::Crawl => {
            run_crawl(&config, fetcher, &start, cli.verbose_errors, progress.clone(), &mut sink)
                .await?
        }
        Mode::Sitemap => {
            run_sitemap(&config, fetcher, &start, cli.verbose_errors, progress.clone(), &mut sink)
                .await?
        }
    };
    progress.finish();
    drop(sink);

    println!("\nDiscovery complete!");
    print_summary(&summary);

    finish_output(&config, &output_path)
}

async fn run_crawl(
    config: &Config,
    fetcher: Fetcher,
    seed: &CanonicalUrl,
    verbose_errors: bool,
    progress: ProgressReporter,
    sink: &mut FileSink,
) -> anyhow::Result<CrawlSummary> {
    println!("Starting crawler...");
    println!("Start URL: {}", seed);
    if let Some(max_depth) = config.crawler.max_depth {
        println!("Max depth: {}", max_depth);
    }
    println!("Max URLs: {}\n", config.crawler.max_urls);

    let options = CrawlOptions::from_config(&config.crawler, verbose_errors);
    let crawler = Crawler::new(fetcher, options).with_progress(progress);

    crawler.crawl(seed, sink).await.context("Crawl failed")
}

async fn run_sitemap(
    config: &Config,
    fetcher: Fetcher,
    sitemap: &CanonicalUrl,
    verbose_errors: bool,
    progress: ProgressReporter,
    sink: &mut FileSink,
) -> anyhow::Result<CrawlSummary> {
    let scope = UrlScope::origin_of(sitemap);
    println!("Resolving sitemap...");
    println!("Sitemap: {}", sitemap);
    println!("Scope: {}", scope);
    println!("Max URLs: {}\n", config.crawler.max_urls);

    let resolver = SitemapResolver::new(fetcher, config.crawler.max_sitemap_depth)
        .with_verbose_errors(verbose_errors)
        .with_progress(progress);

    resolver
        .resolve(sitemap, &scope, config.crawler.max_urls, sink)
        .await
        .context("Sitemap resolution failed")
}

/// Applies the query filter and maps what is left to an exit code
fn finish_output(config: &Config, output_path: &Path) -> anyhow::Result<ExitCode> {
    let outcome = finalize(output_path, config.crawler.include_params)
        .with_context(|| format!("Failed to finalize {}", output_path.display()))?;

    if outcome.removed > 0 {
        println!(
            "Filtered out {} URLs with query parameters.",
            outcome.removed
        );
        println!("Use --include-params to keep them.\n");
    }

    if outcome.is_empty() {
        eprintln!("Warning: No URLs found!");
        return Ok(ExitCode::FAILURE);
    }

    println!("✓ URL list written to: {}", output_path.display());
    println!("✓ Total URLs exported: {}", outcome.kept);
    Ok(ExitCode::SUCCESS)
}

fn report_unreachable(error: &ScoutError) {
    eprintln!("Error: {}\n", error);
    eprintln!("Please check:");
    eprintln!("  - Is the URL correct?");
    eprintln!("  - Is the website online?");
    eprintln!("  - Do you have internet connection?");
}
