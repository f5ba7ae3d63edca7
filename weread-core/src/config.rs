//! Client configuration

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://i.weread.qq.com";
pub const DEFAULT_WEB_BASE: &str = "https://weread.qq.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Settings for the session client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the JSON API
    pub api_base: String,

    /// Base URL of the web reader
    pub web_base: String,

    /// Timeout applied to every remote call
    pub timeout: Duration,

    /// Shelf items requested per page (the provider may return fewer)
    pub page_size: u32,

    /// Upper bound on shelf pages fetched in one listing
    pub max_pages: u32,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: concat!("weread-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `WEREAD_*` environment variables.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] over any variable source. Numeric
    /// values go through the `with_*` setters and share their bounds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base) = lookup("WEREAD_API_BASE") {
            config.api_base = base;
        }
        if let Some(base) = lookup("WEREAD_WEB_BASE") {
            config.web_base = base;
        }
        if let Some(secs) = env_number::<u64, _>(&lookup, "WEREAD_TIMEOUT_SECS") {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(size) = env_number::<u32, _>(&lookup, "WEREAD_PAGE_SIZE") {
            config = config.with_page_size(size);
        }
        if let Some(pages) = env_number::<u32, _>(&lookup, "WEREAD_MAX_PAGES") {
            config = config.with_max_pages(pages);
        }
        config
    }

    /// Point both API and web reader at another host
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.web_base = base.clone();
        self.api_base = base;
        self
    }

    /// A zero timeout is ignored and the current one kept
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            tracing::warn!("Ignoring zero request timeout");
        } else {
            self.timeout = timeout;
        }
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Join an API path onto the base URL
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}

fn env_number<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a number", name, raw);
            None
        }
    }
}
