use anyhow::{Context, Result};
use boccob_scanner::{CrawlOutcome, CrawlScope, Crawler, HttpFetcher, WeightPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Base URL of the site, scheme and host included
    pub site: String,
    pub workers: usize,
    pub max_depth: Option<usize>,
    pub max_pages: Option<usize>,
    /// Extra ignore keywords, added to the defaults unless `default_ignores` is off
    pub ignores: Vec<String>,
    pub default_ignores: bool,
    pub weight_policy: WeightPolicy,
    pub timeout_secs: Option<u64>,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            workers: 1,
            max_depth: None,
            max_pages: None,
            ignores: Vec::new(),
            default_ignores: true,
            weight_policy: WeightPolicy::default(),
            timeout_secs: None,
            show_progress_bars: false,
        }
    }

    pub fn scope(&self) -> Result<CrawlScope> {
        let mut scope = CrawlScope::new(&self.site)
            .with_context(|| format!("invalid site URL '{}'", self.site))?;
        if !self.default_ignores {
            scope = scope.without_default_ignores();
        }
        Ok(scope.with_ignores(self.ignores.iter().cloned()))
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a crawl with the given options
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome> {
    let scope = options.scope()?;
    let fetcher = HttpFetcher::with_timeout(options.timeout_secs)
        .context("failed to build HTTP client")?;

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let crawler_progress: boccob_scanner::ProgressCallback =
        Arc::new(move |recorded: usize, url: String| {
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("{} pages recorded, fetching {}", recorded, url));
            }
            if let Some(ref callback) = progress_callback {
                callback(url);
            }
        });

    let mut crawler = Crawler::new(scope, Arc::new(fetcher))
        .with_workers(options.workers)
        .with_weight_policy(options.weight_policy)
        .with_progress_callback(crawler_progress);
    if let Some(depth) = options.max_depth {
        crawler = crawler.with_max_depth(depth);
    }
    if let Some(pages) = options.max_pages {
        crawler = crawler.with_max_pages(pages);
    }

    let outcome = crawler.crawl().await.context("crawl aborted")?;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }
    info!(
        "{}: {} pages, {} skipped",
        options.site,
        outcome.pages.len(),
        outcome.failures.len()
    );

    Ok(outcome)
}
