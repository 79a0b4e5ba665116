pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod page;
pub mod scope;

pub use crawler::{CrawlOutcome, Crawler, FetchFailure, ProgressCallback};
pub use error::ScanError;
pub use fetch::{Fetcher, HttpFetcher};
pub use page::{Page, PageStore, WeightPolicy};
pub use scope::CrawlScope;
