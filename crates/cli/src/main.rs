use anyhow::{bail, Context, Result};
use apidocs_core::config::{self, CrawlConfig};
use apidocs_core::crawl::Crawler;
use apidocs_core::fetch::HttpFetcher;
use apidocs_core::{output, EndpointRecord};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apidocs", about = "Crawl API documentation pages into endpoint catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the configured documentation pages and save CSV + JSON
    Crawl {
        /// JSON config file (keys not given fall back to defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the documentation base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pause between page fetches, in milliseconds
        #[arg(long)]
        pause_ms: Option<u64>,

        /// Crawl the extended resource list instead of the core pages
        #[arg(long)]
        all_resources: bool,

        /// Rewrite the outputs after every resource, not only at the end
        #[arg(long)]
        incremental: bool,

        /// Do not save raw HTML of the debug-dump resources
        #[arg(long)]
        no_debug_dump: bool,
    },
    /// Extract endpoints from a local HTML file
    Parse {
        /// The HTML file to parse (use - for stdin)
        file: String,

        /// Resource label to file the endpoints under
        #[arg(long, default_value = "Resource")]
        resource: String,

        /// Output as JSON instead of compact format
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            config: config_path,
            base_url,
            out,
            pause_ms,
            all_resources,
            incremental,
            no_debug_dump,
        } => {
            let mut cfg = match config_path {
                Some(path) => CrawlConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => CrawlConfig::default(),
            };
            if let Some(base_url) = base_url {
                cfg.base_url = base_url;
            }
            if let Some(out) = out {
                cfg.output_dir = out;
            }
            if let Some(pause_ms) = pause_ms {
                cfg.pause_ms = pause_ms;
            }
            if all_resources {
                cfg.resources = config::extended_resources();
            }
            if no_debug_dump {
                cfg.debug_dump.clear();
            }
            cfg.validate()?;
            crawl(cfg, incremental)
        }
        Commands::Parse {
            file,
            resource,
            json,
        } => {
            let html = if file == "-" {
                use std::io::Read;
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("reading stdin")?;
                buf
            } else {
                std::fs::read_to_string(&file).with_context(|| format!("reading {}", file))?
            };

            let endpoints = apidocs_core::parse(&html, &resource);
            print_endpoints(&endpoints, json)
        }
    }
}

fn crawl(cfg: CrawlConfig, incremental: bool) -> Result<()> {
    let out_dir = cfg.output_dir.clone();
    let stem = cfg.output_stem.clone();
    let mut crawler = Crawler::new(cfg, HttpFetcher::new());

    let report = crawler.run_with(|_, aggregate| {
        if incremental && !aggregate.is_empty() {
            if let Err(e) = output::save_outputs(aggregate.records(), &out_dir, &stem) {
                warn!(error = %e, "incremental save failed");
            }
        }
    });

    for failure in report.failures() {
        warn!(resource = %failure.resource, url = %failure.url, "resource skipped");
    }

    if report.aggregate.is_empty() {
        println!("No API endpoints found.");
        if report.failures().count() == report.outcomes.len() && !report.outcomes.is_empty() {
            bail!("every resource failed to load");
        }
        return Ok(());
    }

    let paths = output::save_outputs(report.aggregate.records(), &out_dir, &stem)?;
    info!(
        endpoints = report.aggregate.len(),
        csv = %paths.csv.display(),
        json = %paths.json.display(),
        "done"
    );
    println!(
        "Saved {} endpoints to {} and {}",
        report.aggregate.len(),
        paths.csv.display(),
        paths.json.display()
    );
    Ok(())
}

fn print_endpoints(endpoints: &[EndpointRecord], as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(endpoints)?);
        return Ok(());
    }
    println!("endpoints: {}", endpoints.len());
    println!("---");
    for ep in endpoints {
        println!(
            "{} {} [{}] {} params",
            ep.http_method,
            ep.path,
            ep.name,
            ep.parameters.len()
        );
        println!("  {}", ep.description);
    }
    Ok(())
}
