use boccob_core::crawl::{CrawlOptions, execute_crawl};
use boccob_core::report::{
    ReportFormat, ReportOrder, gather_report_data, generate_report, save_report,
};
use boccob_scanner::{CrawlOutcome, WeightPolicy};
use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;
use tracing::Level;
use url::Url;

/// Accepts only absolute http(s) URLs with a host. A trailing `/` is dropped
/// later when the crawl scope is built, and links back to the site as typed
/// still count toward the entry page.
pub fn parse_site(value: &str) -> Result<String, String> {
    let parsed = Url::parse(value).map_err(|e| format!("'{}' is not a valid URL: {}", value, e))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("'{}' must start with http:// or https://", value));
    }
    if parsed.host_str().is_none() {
        return Err(format!("'{}' has no host", value));
    }

    Ok(value.to_string())
}

/// Where and how the finished inventory is written.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub format: ReportFormat,
    pub order: ReportOrder,
    pub output: Option<PathBuf>,
}

pub fn crawl_options_from_matches(matches: &ArgMatches) -> Result<CrawlOptions, String> {
    let site = matches
        .get_one::<String>("site")
        .ok_or("--site is required")?;

    let weight = matches
        .get_one::<String>("weight")
        .map(String::as_str)
        .unwrap_or("accumulate");
    let weight_policy = weight.parse::<WeightPolicy>()?;

    let mut options = CrawlOptions::new(site.as_str());
    options.workers = *matches.get_one::<usize>("workers").unwrap_or(&1);
    options.max_depth = matches.get_one::<usize>("max-depth").copied();
    options.max_pages = matches.get_one::<usize>("max-pages").copied();
    options.ignores = matches
        .get_many::<String>("ignore")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    options.default_ignores = !matches.get_flag("no-default-ignores");
    options.weight_policy = weight_policy;
    options.timeout_secs = matches.get_one::<u64>("timeout").copied();
    options.show_progress_bars = !matches.get_flag("quiet");

    Ok(options)
}

pub fn report_settings_from_matches(matches: &ArgMatches) -> Result<ReportSettings, String> {
    let format_name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| format!("unknown report format '{}'", format_name))?;

    let order_name = matches
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("discovery");
    let order = ReportOrder::from_str(order_name)
        .ok_or_else(|| format!("unknown report order '{}'", order_name))?;

    Ok(ReportSettings {
        format,
        order,
        output: matches.get_one::<PathBuf>("output").cloned(),
    })
}

/// WARN by default, INFO with -v, DEBUG with -vv.
pub fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Logs go to stderr so stdout only carries the report.
pub fn init_tracing(verbose: u8) {
    // a subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(verbose))
        .try_init();
}

/// Runs the crawl described by `matches`. Returns the process exit code.
pub async fn handle_crawl(matches: &ArgMatches) -> i32 {
    init_tracing(matches.get_count("verbose"));

    let (options, settings) = match (
        crawl_options_from_matches(matches),
        report_settings_from_matches(matches),
    ) {
        (Ok(options), Ok(settings)) => (options, settings),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };
    let quiet = matches.get_flag("quiet");
    let site = options.site.clone();

    let outcome = match execute_crawl(options, None).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} Crawl failed: {:#}", "✗".red().bold(), e);
            return 1;
        }
    };

    if !quiet {
        print_summary(&outcome);
    }

    let data = gather_report_data(&site, &outcome, settings.order);
    let report = match generate_report(&data, settings.format) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} Failed to render report: {}", "✗".red().bold(), e);
            return 1;
        }
    };

    match settings.output {
        Some(path) => {
            if let Err(e) = save_report(&report, &path) {
                eprintln!(
                    "{} Failed to write report to {}: {}",
                    "✗".red().bold(),
                    path.display(),
                    e
                );
                return 1;
            }
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    0
}

fn print_summary(outcome: &CrawlOutcome) {
    eprintln!(
        "{} Crawl complete: {} pages recorded",
        "✓".green().bold(),
        outcome.pages.len()
    );

    if outcome.failures.is_empty() {
        return;
    }

    eprintln!(
        "{} {} pages skipped, the inventory is incomplete:",
        "⚠".yellow().bold(),
        outcome.failures.len()
    );
    for failure in &outcome.failures {
        eprintln!("  {} {} ({})", "•".yellow(), failure.url.bright_white(), failure.error);
    }
}
