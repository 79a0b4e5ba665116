use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One distinct page of the crawled site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Display title taken from the page's `<title>`.
    pub name: String,
    /// Canonical URL, the page's unique key.
    pub url: String,
    /// Number of references to this page found while crawling.
    pub weight: u32,
}

impl Page {
    pub fn new(name: String, url: String, weight: u32) -> Self {
        Self { name, url, weight }
    }
}

/// How references seen before a page is fetched are counted.
///
/// In a depth-first crawl a page is fetched as soon as it is first referenced,
/// so both policies give the same weights. They differ once pages wait in a
/// queue: `ResetOnFetch` drops the references counted while waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightPolicy {
    /// A fetched page starts at weight 1, whatever was counted before.
    ResetOnFetch,
    /// Every reference counts, including the one that led to the fetch.
    #[default]
    Accumulate,
}

impl WeightPolicy {
    /// Weight of a page at fetch time, given the references counted while it
    /// was waiting to be fetched (the discovering reference included).
    pub fn initial_weight(self, pending_references: u32) -> u32 {
        match self {
            WeightPolicy::ResetOnFetch => 1,
            WeightPolicy::Accumulate => pending_references.max(1),
        }
    }
}

impl std::str::FromStr for WeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reset" | "reset-on-fetch" => Ok(WeightPolicy::ResetOnFetch),
            "accumulate" => Ok(WeightPolicy::Accumulate),
            other => Err(format!("unknown weight policy '{}'", other)),
        }
    }
}

/// Canonical URL -> page, iterated in discovery order.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
    index: HashMap<String, usize>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a page, or overwrites the existing record for `url` in place.
    pub fn record(&mut self, url: &str, name: String, weight: u32) {
        let page = Page::new(name, url.to_string(), weight);
        match self.index.get(url) {
            Some(&slot) => self.pages[slot] = page,
            None => {
                self.index.insert(url.to_string(), self.pages.len());
                self.pages.push(page);
            }
        }
    }

    /// Counts one more reference to `url`. Returns false when the page is not
    /// in the store.
    pub fn reference(&mut self, url: &str) -> bool {
        match self.index.get(url) {
            Some(&slot) => {
                self.pages[slot].weight += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, url: &str) -> Option<&Page> {
        self.index.get(url).map(|&slot| &self.pages[slot])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reference() {
        let mut store = PageStore::new();
        store.record("http://example.com", "Home".to_string(), 1);

        assert!(store.reference("http://example.com"));
        assert!(store.reference("http://example.com"));
        assert!(!store.reference("http://example.com/missing"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("http://example.com").unwrap().weight, 3);
        assert!(!store.contains("http://example.com/missing"));
    }

    #[test]
    fn test_record_overwrites_in_place() {
        let mut store = PageStore::new();
        store.record("http://example.com", "Home".to_string(), 1);
        store.record("http://example.com/a", "A".to_string(), 1);
        store.reference("http://example.com");
        store.record("http://example.com", "Home v2".to_string(), 1);

        let urls: Vec<&str> = store.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["http://example.com", "http://example.com/a"]);

        let home = store.get("http://example.com").unwrap();
        assert_eq!(home.name, "Home v2");
        assert_eq!(home.weight, 1);
    }

    #[test]
    fn test_discovery_order() {
        let mut store = PageStore::new();
        for url in ["http://x/c", "http://x/a", "http://x/b"] {
            store.record(url, String::new(), 1);
        }
        let pages = store.into_pages();
        assert_eq!(pages[0].url, "http://x/c");
        assert_eq!(pages[2].url, "http://x/b");
    }

    #[test]
    fn test_weight_policy() {
        assert_eq!(WeightPolicy::ResetOnFetch.initial_weight(4), 1);
        assert_eq!(WeightPolicy::Accumulate.initial_weight(4), 4);
        assert_eq!(WeightPolicy::Accumulate.initial_weight(0), 1);
        assert_eq!(WeightPolicy::default(), WeightPolicy::Accumulate);
        assert_eq!("accumulate".parse(), Ok(WeightPolicy::Accumulate));
        assert_eq!("Reset".parse(), Ok(WeightPolicy::ResetOnFetch));
        assert!("sometimes".parse::<WeightPolicy>().is_err());
    }
}
