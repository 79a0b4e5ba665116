// Tests for report generation functionality

use boccob_core::report::{
    ReportData, ReportEntry, ReportFormat, ReportOrder, TEXT_HEADER, gather_report_data,
    generate_csv_report, generate_json_report, generate_markdown_report, generate_report,
    generate_text_report, save_report,
};
use boccob_scanner::{CrawlOutcome, FetchFailure, PageStore};

fn sample_outcome() -> CrawlOutcome {
    let mut pages = PageStore::new();
    pages.record("http://example.com", "Home".to_string(), 1);
    pages.record("http://example.com/contact", "Contact".to_string(), 3);
    pages.record("http://example.com/about", "About".to_string(), 3);

    CrawlOutcome {
        pages,
        failures: vec![FetchFailure {
            url: "http://example.com/broken".to_string(),
            error: "Response body from http://example.com/broken is empty".to_string(),
        }],
    }
}

fn urls(data: &ReportData) -> Vec<&str> {
    data.entries.iter().map(|e| e.url.as_str()).collect()
}

// ============================================================================
// Format / Order Parsing Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("CSV"), Some(ReportFormat::Csv)));
    assert!(matches!(ReportFormat::from_str("Json"), Some(ReportFormat::Json)));
    assert!(matches!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown)));
    assert!(ReportFormat::from_str("html").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

#[test]
fn test_report_order_from_str() {
    assert_eq!(ReportOrder::from_str("discovery"), Some(ReportOrder::Discovery));
    assert_eq!(ReportOrder::from_str("URL"), Some(ReportOrder::Url));
    assert_eq!(ReportOrder::from_str("weight"), Some(ReportOrder::Weight));
    assert_eq!(ReportOrder::from_str("random"), None);
    assert_eq!(ReportOrder::default(), ReportOrder::Discovery);
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_gather_discovery_order() {
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);

    assert_eq!(data.total_pages, 3);
    assert_eq!(
        urls(&data),
        vec![
            "http://example.com",
            "http://example.com/contact",
            "http://example.com/about"
        ]
    );
    let entries: Vec<usize> = data.entries.iter().map(|e| e.entry).collect();
    assert_eq!(entries, vec![1, 2, 3]);
    assert_eq!(data.skipped.len(), 1);
}

#[test]
fn test_gather_url_order() {
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Url);
    assert_eq!(
        urls(&data),
        vec![
            "http://example.com",
            "http://example.com/about",
            "http://example.com/contact"
        ]
    );
    assert_eq!(data.entries[0].entry, 1);
}

#[test]
fn test_gather_weight_order_breaks_ties_by_url() {
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Weight);
    assert_eq!(
        urls(&data),
        vec![
            "http://example.com/about",
            "http://example.com/contact",
            "http://example.com"
        ]
    );
}

#[test]
fn test_gather_empty_outcome() {
    let data = gather_report_data("http://example.com", &CrawlOutcome::default(), ReportOrder::Url);
    assert_eq!(data.total_pages, 0);
    assert!(data.entries.is_empty());
    assert_eq!(generate_text_report(&data), format!("{}\n", TEXT_HEADER));
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_text_report_layout() {
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);
    let report = generate_text_report(&data);

    assert_eq!(
        report,
        "Entry, Name, URL, Weight\n\
         1, Home, http://example.com, 1\n\
         2, Contact, http://example.com/contact, 3\n\
         3, About, http://example.com/about, 3\n"
    );
}

#[test]
fn test_text_report_empty_name() {
    let data = ReportData {
        site: "http://example.com".to_string(),
        total_pages: 1,
        entries: vec![ReportEntry {
            entry: 1,
            name: String::new(),
            url: "http://example.com".to_string(),
            weight: 1,
        }],
        skipped: Vec::new(),
    };
    assert!(generate_text_report(&data).ends_with("1, , http://example.com, 1\n"));
}

#[test]
fn test_csv_report_quotes_fields() {
    let mut data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);
    data.entries[0].name = "Home, \"sweet\" home".to_string();

    let report = generate_csv_report(&data).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "entry,name,url,weight");
    assert_eq!(lines[1], r#"1,"Home, ""sweet"" home",http://example.com,1"#);
    assert_eq!(lines[2], "2,Contact,http://example.com/contact,3");
}

#[test]
fn test_csv_report_multiline_name_and_empty_inventory() {
    let mut data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);
    data.entries.truncate(1);
    data.entries[0].name = "Home\nPage".to_string();
    assert_eq!(
        generate_csv_report(&data).unwrap(),
        "entry,name,url,weight\n1,\"Home\nPage\",http://example.com,1\n"
    );

    let empty = gather_report_data("http://example.com", &CrawlOutcome::default(), ReportOrder::Url);
    assert_eq!(generate_csv_report(&empty).unwrap(), "entry,name,url,weight\n");
}

#[test]
fn test_json_report_structure() {
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);
    let report = generate_json_report(&data).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();

    let root = &value["report"];
    assert_eq!(root["metadata"]["generator"], "Boccob");
    assert_eq!(root["site"], "http://example.com");
    assert_eq!(root["summary"]["total_pages"], 3);
    assert_eq!(root["summary"]["skipped_pages"], 1);
    assert_eq!(root["pages"][1]["name"], "Contact");
    assert_eq!(root["pages"][1]["weight"], 3);
    assert_eq!(root["skipped"][0]["url"], "http://example.com/broken");
}

#[test]
fn test_markdown_report_escapes_pipes() {
    let mut data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);
    data.entries[0].name = "Home | Start".to_string();

    let report = generate_markdown_report(&data);
    assert!(report.contains("| Entry | Name | URL | Weight |"));
    assert!(report.contains("| 1 | Home \\| Start | http://example.com | 1 |"));
    assert!(report.contains("## Skipped (1)"));
}

#[test]
fn test_generate_report_dispatch() {
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);
    assert!(
        generate_report(&data, ReportFormat::Text)
            .unwrap()
            .starts_with(TEXT_HEADER)
    );
    assert!(
        generate_report(&data, ReportFormat::Csv)
            .unwrap()
            .starts_with("entry,name")
    );
    assert!(
        generate_report(&data, ReportFormat::Markdown)
            .unwrap()
            .starts_with("# Page inventory")
    );
    assert!(
        generate_report(&data, ReportFormat::Json)
            .unwrap()
            .contains("\"pages\"")
    );
}

#[test]
fn test_save_report() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("pages.txt");
    let data = gather_report_data("http://example.com", &sample_outcome(), ReportOrder::Discovery);

    save_report(&generate_text_report(&data), &path)?;

    let written = std::fs::read_to_string(&path)?;
    assert!(written.starts_with(TEXT_HEADER));
    assert_eq!(written.lines().count(), 4);
    Ok(())
}
