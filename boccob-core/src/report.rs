// Report generation from a finished crawl

use anyhow::{Context, Result};
use boccob_scanner::{CrawlOutcome, FetchFailure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const TEXT_HEADER: &str = "Entry, Name, URL, Weight";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Csv,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// Order of the report rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportOrder {
    /// The order pages were first recorded in
    #[default]
    Discovery,
    Url,
    /// Heaviest first, ties broken by URL
    Weight,
}

impl ReportOrder {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "discovery" => Some(ReportOrder::Discovery),
            "url" => Some(ReportOrder::Url),
            "weight" => Some(ReportOrder::Weight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub entry: usize,
    pub name: String,
    pub url: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub site: String,
    pub total_pages: usize,
    pub entries: Vec<ReportEntry>,
    pub skipped: Vec<FetchFailure>,
}

pub fn gather_report_data(site: &str, outcome: &CrawlOutcome, order: ReportOrder) -> ReportData {
    let mut pages: Vec<_> = outcome.pages.iter().collect();
    match order {
        ReportOrder::Discovery => {}
        ReportOrder::Url => pages.sort_by(|a, b| a.url.cmp(&b.url)),
        ReportOrder::Weight => {
            pages.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.url.cmp(&b.url)))
        }
    }

    let entries = pages
        .into_iter()
        .enumerate()
        .map(|(idx, page)| ReportEntry {
            entry: idx + 1,
            name: page.name.clone(),
            url: page.url.clone(),
            weight: page.weight,
        })
        .collect::<Vec<_>>();

    ReportData {
        site: site.to_string(),
        total_pages: entries.len(),
        entries,
        skipped: outcome.failures.clone(),
    }
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Csv => generate_csv_report(data),
        ReportFormat::Json => Ok(generate_json_report(data)?),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

/// One `Entry, Name, URL, Weight` line per page, values unquoted.
pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();
    report.push_str(TEXT_HEADER);
    report.push('\n');

    for entry in &data.entries {
        report.push_str(&format!(
            "{}, {}, {}, {}\n",
            entry.entry, entry.name, entry.url, entry.weight
        ));
    }

    report
}

pub fn generate_csv_report(data: &ReportData) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    // written by hand so an empty inventory still gets a header row
    writer.write_record(["entry", "name", "url", "weight"])?;

    for entry in &data.entries {
        writer.write_record([
            entry.entry.to_string(),
            entry.name.clone(),
            entry.url.clone(),
            entry.weight.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().context("failed to flush CSV report")?;
    Ok(String::from_utf8(bytes)?)
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Boccob",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "site": data.site,
            "summary": {
                "total_pages": data.total_pages,
                "skipped_pages": data.skipped.len()
            },
            "pages": data.entries,
            "skipped": data.skipped
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();
    report.push_str(&format!("# Page inventory: {}\n\n", data.site));
    report.push_str(&format!("{} pages found\n\n", data.total_pages));
    report.push_str("| Entry | Name | URL | Weight |\n");
    report.push_str("|------:|------|-----|-------:|\n");

    for entry in &data.entries {
        report.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            entry.entry,
            markdown_cell(&entry.name),
            markdown_cell(&entry.url),
            entry.weight
        ));
    }

    if !data.skipped.is_empty() {
        report.push_str(&format!("\n## Skipped ({})\n\n", data.skipped.len()));
        for failure in &data.skipped {
            report.push_str(&format!(
                "- {}: {}\n",
                markdown_cell(&failure.url),
                markdown_cell(&failure.error)
            ));
        }
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}
