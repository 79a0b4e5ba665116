use crate::error::{Result, ScanError};
use tracing::debug;
use url::Url;

/// Substrings that mark a link as a non-content target (stylesheets, scripts,
/// in-page anchors and the events section).
pub const DEFAULT_IGNORES: &[&str] = &["_css", "css", "_js", "_html", "#", "events"];

/// The per-run crawl configuration: which site is being inventoried and which
/// links are never followed.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    base_url: String,
    // the base as typed, when a trailing `/` was trimmed from it
    root_alias: Option<String>,
    ignores: Vec<String>,
}

impl CrawlScope {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }
        if parsed.host_str().is_none() {
            return Err(ScanError::InvalidUrl(format!("{}: missing host", base_url)));
        }

        let (base_url, root_alias) = match base_url.strip_suffix('/') {
            Some(trimmed) => (trimmed.to_string(), Some(base_url.to_string())),
            None => (base_url.to_string(), None),
        };

        Ok(Self {
            base_url,
            root_alias,
            ignores: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn with_ignores<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignores.extend(
            keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty()),
        );
        self
    }

    pub fn without_default_ignores(mut self) -> Self {
        self.ignores.retain(|k| !DEFAULT_IGNORES.contains(&k.as_str()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ignores(&self) -> &[String] {
        &self.ignores
    }

    /// Case-sensitive, unanchored substring match against the ignore list.
    pub fn is_ignored(&self, link: &str) -> bool {
        self.ignores.iter().any(|k| link.contains(k.as_str()))
    }

    /// Root-relative links and links under the base URL are in scope.
    pub fn is_in_scope(&self, link: &str) -> bool {
        link.starts_with(&self.base_url) || link.starts_with('/')
    }

    /// Turns an in-scope link into the key used by the page store.
    ///
    /// Root-relative links lose one trailing `/` and are appended to the base
    /// URL. Absolute links are returned untouched, so `http://site/a` and
    /// `http://site/a/` stay distinct pages. The one exception is the base
    /// exactly as it was typed, which maps to the entry page.
    pub fn normalize(&self, link: &str) -> String {
        if link.starts_with('/') {
            let path = link.strip_suffix('/').unwrap_or(link);
            format!("{}{}", self.base_url, path)
        } else if self.root_alias.as_deref() == Some(link) {
            self.base_url.clone()
        } else {
            link.to_string()
        }
    }

    /// Ignore filter, then scope filter, then normalization.
    pub fn canonicalize(&self, link: &str) -> Option<String> {
        if self.is_ignored(link) {
            debug!("  -> Ignored: {}", link);
            return None;
        }
        if !self.is_in_scope(link) {
            debug!("  -> Out of scope: {}", link);
            return None;
        }
        Some(self.normalize(link))
    }
}
