//! Command-line entry point: build an EPUB from a `Title::URL` list.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use seirei_epub::{read_entries, BookSpec, EpubPackager, HttpFetcher, Options, Pipeline, DEFAULT_SITE_DOMAIN};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "seirei-epub", version, about = "Build an EPUB from a list of blog-post chapters")]
struct Cli {
    /// Book title
    #[arg(long)]
    title: String,

    /// Book author
    #[arg(long)]
    author: String,

    /// URL of the cover image
    #[arg(long)]
    cover: String,

    /// Output EPUB path
    #[arg(long)]
    output: PathBuf,

    /// File with one `Chapter Name::URL` entry per line
    #[arg(long)]
    urls: PathBuf,

    /// Cache downloads, save HTML snapshots, and keep the working directory
    #[arg(long)]
    debug: bool,

    /// Site domain whose attribution lines are removed
    #[arg(long, default_value = DEFAULT_SITE_DOMAIN)]
    site_domain: String,

    /// Pause after each page fetch, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Do not add the chapter listing the source pages
    #[arg(long)]
    no_sources: bool,
}

impl Cli {
    fn options(&self, work_dir: PathBuf) -> Options {
        Options {
            site_domain: self.site_domain.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            request_delay: Duration::from_millis(self.delay_ms),
            debug: self.debug,
            work_dir,
            include_sources: !self.no_sources,
            ..Options::default()
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .init();
}

fn run(cli: &Cli, work_dir: &Path) -> anyhow::Result<()> {
    let entries = read_entries(&cli.urls).with_context(|| format!("reading URL list {}", cli.urls.display()))?;
    info!(count = entries.len(), "entries read");

    let options = cli.options(work_dir.to_path_buf());
    let fetcher = HttpFetcher::new(&options).context("creating HTTP client")?;
    let pipeline = Pipeline::new(options, fetcher);
    let mut packager = EpubPackager::new(&cli.title, &cli.author);

    let book = BookSpec {
        cover_url: &cli.cover,
        output: &cli.output,
    };
    let report = pipeline
        .run(book, &entries, &mut packager)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    for skipped in &report.skipped {
        warn!(position = skipped.position, entry = %skipped.entry, reason = %skipped.reason, "skipped");
    }
    info!(
        processed = report.processed,
        skipped = report.skipped.len(),
        chapters = report.chapters,
        images = report.images,
        "successfully created EPUB: {}",
        cli.output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let started = Instant::now();

    let work_dir = Options::work_dir_for(&cli.output, cli.debug);
    if let Err(err) = std::fs::create_dir_all(&work_dir) {
        error!(path = %work_dir.display(), error = %err, "error creating temp directory");
        return ExitCode::FAILURE;
    }

    let result = run(&cli, &work_dir);

    if cli.debug {
        info!(path = %work_dir.display(), "debug mode: temporary directory kept");
    } else {
        info!(path = %work_dir.display(), "cleaning up temporary directory");
        if let Err(err) = std::fs::remove_dir_all(&work_dir) {
            warn!(path = %work_dir.display(), error = %err, "could not remove temporary directory");
        }
    }

    match result {
        Ok(()) => {
            info!(elapsed_secs = started.elapsed().as_secs_f64(), "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
