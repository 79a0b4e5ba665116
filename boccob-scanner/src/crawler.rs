use crate::error::{Result, ScanError};
use crate::extract::PageDocument;
use crate::fetch::Fetcher;
use crate::page::{PageStore, WeightPolicy};
use crate::scope::CrawlScope;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::task::{self, JoinSet};
use tracing::{debug, info, warn};

/// Called with (pages recorded so far, url) before each fetch.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// A branch of the crawl that was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct CrawlOutcome {
    pub pages: PageStore,
    pub failures: Vec<FetchFailure>,
}

/// Walks the link graph of one site, recording each distinct page once and
/// counting how often it is referenced.
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    scope: CrawlScope,
    workers: usize,
    max_depth: Option<usize>,
    max_pages: Option<usize>,
    weight_policy: WeightPolicy,
    progress_callback: Option<ProgressCallback>,
}

/// Links of a fetched page that are still to be handled.
struct Frame {
    depth: usize,
    links: VecDeque<String>,
}

#[derive(Default)]
struct Traversal {
    pages: PageStore,
    failures: Vec<FetchFailure>,
    // every URL handed to the fetcher, successful or not
    claimed: HashSet<String>,
}

impl Traversal {
    fn record(&mut self, url: &str, document: &PageDocument, weight: u32) {
        info!("Recorded {} ({:?}, {} links)", url, document.title, document.links.len());
        self.pages.record(url, document.title.clone(), weight);
    }

    fn fail(&mut self, url: &str, error: ScanError) {
        warn!("Skipping {}: {}", url, error);
        self.failures.push(FetchFailure {
            url: url.to_string(),
            error: error.to_string(),
        });
    }

    fn into_outcome(self) -> CrawlOutcome {
        CrawlOutcome {
            pages: self.pages,
            failures: self.failures,
        }
    }
}

impl Crawler {
    pub fn new(scope: CrawlScope, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            scope,
            workers: 1,
            max_depth: None,
            max_pages: None,
            weight_policy: WeightPolicy::default(),
            progress_callback: None,
        }
    }

    /// More than one worker switches from the depth-first walk to a bounded
    /// pool of concurrent fetches.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = Some(pages);
        self
    }

    pub fn with_weight_policy(mut self, policy: WeightPolicy) -> Self {
        self.weight_policy = policy;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(&self) -> Result<CrawlOutcome> {
        info!(
            "Starting crawl of {} with {} workers",
            self.scope.base_url(),
            self.workers
        );

        let outcome = if self.workers > 1 {
            self.crawl_concurrent().await
        } else {
            self.crawl_depth_first().await
        };

        info!(
            "Crawl complete. Recorded {} pages, skipped {}",
            outcome.pages.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    /// Visits pages in the order a recursive descent would: every new link is
    /// fully explored before its next sibling is looked at.
    async fn crawl_depth_first(&self) -> CrawlOutcome {
        let mut state = Traversal::default();
        let mut stack: Vec<Frame> = Vec::new();

        let entry = self.scope.base_url().to_string();
        state.claimed.insert(entry.clone());
        if let Some(links) = self.visit(&entry, &mut state).await {
            stack.push(Frame {
                depth: 0,
                links: links.into(),
            });
        }

        while let Some(frame) = stack.last_mut() {
            let depth = frame.depth + 1;
            let Some(link) = frame.links.pop_front() else {
                stack.pop();
                continue;
            };

            let Some(url) = self.scope.canonicalize(&link) else {
                continue;
            };

            if state.pages.reference(&url) {
                debug!("  -> Already recorded, weight +1: {}", url);
                continue;
            }
            if state.claimed.contains(&url) {
                debug!("  -> Fetch already failed: {}", url);
                continue;
            }
            if !self.within_limits(depth, state.pages.len()) {
                debug!("  -> Beyond crawl limits: {}", url);
                continue;
            }

            state.claimed.insert(url.clone());
            if let Some(links) = self.visit(&url, &mut state).await {
                stack.push(Frame {
                    depth,
                    links: links.into(),
                });
            }
        }

        state.into_outcome()
    }

    async fn visit(&self, url: &str, state: &mut Traversal) -> Option<Vec<String>> {
        self.report_progress(state.pages.len(), url);

        match fetch_document(self.fetcher.as_ref(), url).await {
            Ok(document) => {
                // the reference that led here is the only one counted so far
                state.record(url, &document, self.weight_policy.initial_weight(1));
                Some(document.links)
            }
            Err(e) => {
                state.fail(url, e);
                None
            }
        }
    }

    /// Up to `workers` fetches run at once. Only this loop touches the store
    /// and the visited set, so claiming a URL is a single check-and-insert.
    async fn crawl_concurrent(&self) -> CrawlOutcome {
        let mut state = Traversal::default();
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        // queued or in-flight URL -> references counted while waiting
        let mut pending: HashMap<String, u32> = HashMap::new();
        let mut in_flight = JoinSet::new();
        let mut task_urls: HashMap<task::Id, String> = HashMap::new();

        let entry = self.scope.base_url().to_string();
        state.claimed.insert(entry.clone());
        pending.insert(entry.clone(), 1);
        queue.push_back((entry, 0));

        loop {
            while in_flight.len() < self.workers {
                let Some((url, depth)) = queue.pop_front() else {
                    break;
                };
                self.report_progress(state.pages.len(), &url);

                let fetcher = Arc::clone(&self.fetcher);
                let task_url = url.clone();
                let handle = in_flight.spawn(async move {
                    let result = fetch_document(fetcher.as_ref(), &url).await;
                    (url, depth, result)
                });
                task_urls.insert(handle.id(), task_url);
            }

            let Some(joined) = in_flight.join_next_with_id().await else {
                break;
            };
            let (url, depth, result) = match joined {
                Ok((id, output)) => {
                    task_urls.remove(&id);
                    output
                }
                Err(e) => {
                    // a panicked fetch only loses its own branch
                    if let Some(url) = task_urls.remove(&e.id()) {
                        pending.remove(&url);
                        state.fail(&url, ScanError::JoinError(e));
                    }
                    continue;
                }
            };
            let references = pending.remove(&url).unwrap_or(1);

            let document = match result {
                Ok(document) => document,
                Err(e) => {
                    state.fail(&url, e);
                    continue;
                }
            };
            state.record(&url, &document, self.weight_policy.initial_weight(references));

            for link in document.links {
                let Some(target) = self.scope.canonicalize(&link) else {
                    continue;
                };

                if state.pages.reference(&target) {
                    debug!("  -> Already recorded, weight +1: {}", target);
                    continue;
                }
                if let Some(count) = pending.get_mut(&target) {
                    debug!("  -> Already queued: {}", target);
                    *count += 1;
                    continue;
                }
                if state.claimed.contains(&target) {
                    debug!("  -> Fetch already failed: {}", target);
                    continue;
                }
                if !self.within_limits(depth + 1, state.pages.len() + pending.len()) {
                    debug!("  -> Beyond crawl limits: {}", target);
                    continue;
                }

                state.claimed.insert(target.clone());
                pending.insert(target.clone(), 1);
                queue.push_back((target, depth + 1));
            }
        }

        state.into_outcome()
    }

    /// `committed` is the number of pages recorded or about to be fetched.
    fn within_limits(&self, depth: usize, committed: usize) -> bool {
        if let Some(max) = self.max_depth
            && depth > max
        {
            return false;
        }
        if let Some(max) = self.max_pages
            && committed >= max
        {
            return false;
        }
        true
    }

    fn report_progress(&self, recorded: usize, url: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(recorded, url.to_string());
        }
    }
}

async fn fetch_document(fetcher: &dyn Fetcher, url: &str) -> Result<PageDocument> {
    let body = fetcher.fetch(url).await?;
    Ok(PageDocument::parse(&body))
}
