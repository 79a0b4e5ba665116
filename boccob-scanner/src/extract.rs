use scraper::{Html, Selector};

/// What the crawler needs from a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDocument {
    /// Text of the first `<title>` element, empty when the page has none.
    pub title: String,
    /// Every `href` value in document order. Repeats are kept since each
    /// occurrence counts as a reference.
    pub links: Vec<String>,
}

impl PageDocument {
    pub fn parse(body: &str) -> Self {
        let document = Html::parse_document(body);
        Self {
            title: extract_title(&document),
            links: extract_links(&document),
        }
    }
}

fn extract_title(document: &Html) -> String {
    let title_selector = Selector::parse("title").expect("static selector");
    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_links(document: &Html) -> Vec<String> {
    // Any element, not just anchors: <link href> targets get dropped later by
    // the ignore filter.
    let href_selector = Selector::parse("[href]").expect("static selector");
    document
        .select(&href_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}
