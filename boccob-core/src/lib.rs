pub mod crawl;
pub mod report;

pub use crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use report::{ReportData, ReportFormat, ReportOrder, gather_report_data, generate_report};
