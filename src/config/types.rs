use serde::Deserialize;

/// Default User-Agent: browser-compatible, but identifies the tool
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; url-scout/1.0)";

/// Main configuration structure for url-scout
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Traversal limits and filters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Hard cap on fetch attempts (crawl) or accepted URLs (sitemap)
    #[serde(rename = "max-urls")]
    pub max_urls: usize,

    /// Maximum link depth from the seed; unbounded when absent
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Number of fetches allowed in flight at once
    pub concurrency: usize,

    /// Maximum nesting of sitemap index files
    #[serde(rename = "max-sitemap-depth")]
    pub max_sitemap_depth: u32,

    /// Keep URLs with a query string in the final output
    #[serde(rename = "include-params")]
    pub include_params: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_urls: 10_000,
            max_depth: None,
            concurrency: 1,
            max_sitemap_depth: 8,
            include_params: false,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Redirect hops followed before giving up
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Skip TLS certificate verification (staging mirrors use self-signed certs)
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_redirects: 5,
            accept_invalid_certs: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the line-delimited URL file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "crawled_urls.txt".to_string(),
        }
    }
}

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_urls: Option<usize>,
    pub max_depth: Option<u32>,
    pub concurrency: Option<usize>,
    pub include_params: bool,
    pub output_path: Option<String>,
}

impl Config {
    /// Applies command-line values; a flag that was not given keeps the
    /// file (or default) value
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(max_urls) = overrides.max_urls {
            self.crawler.max_urls = max_urls;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.crawler.max_depth = Some(max_depth);
        }
        if let Some(concurrency) = overrides.concurrency {
            self.crawler.concurrency = concurrency;
        }
        if overrides.include_params {
            self.crawler.include_params = true;
        }
        if let Some(path) = &overrides.output_path {
            self.output.path = path.clone();
        }
    }
}
