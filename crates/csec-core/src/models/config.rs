//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding [`CrawlConfig::listing_url`].
pub const ENV_LISTING_URL: &str = "CSEC_URL";

/// Environment variable overriding [`OutputConfig::path`].
pub const ENV_OUTPUT_PATH: &str = "CSEC_OUT";

/// Older name for [`ENV_OUTPUT_PATH`], read when the newer one is unset.
pub const ENV_OUTPUT_PATH_LEGACY: &str = "OUT_XLSX";

/// Main configuration for the csec pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CsecConfig {
    /// Listing crawl and HTTP configuration.
    pub crawl: CrawlConfig,

    /// Detail-page HTML extraction configuration.
    pub html: HtmlConfig,

    /// Certification report PDF configuration.
    pub pdf: PdfConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Listing crawl configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Page listing every issued certificate.
    pub listing_url: String,

    /// Origin used to resolve relative links.
    pub site_origin: String,

    /// Substring (case-insensitive) a product link must contain.
    pub link_keyword: String,

    /// Selector for candidate product anchors on the listing page.
    pub listing_selector: String,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Timeout for listing and detail page requests, in seconds.
    pub page_timeout_secs: u64,

    /// Timeout for certification report downloads, in seconds.
    pub pdf_timeout_secs: u64,

    /// Keep crawling when a detail page cannot be fetched.
    pub continue_on_error: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://www.fmv.se/verksamhet/ovrig-verksamhet/csec/certifikat-utgivna-av-csec/"
                .to_string(),
            site_origin: "https://www.fmv.se".to_string(),
            link_keyword: "csec".to_string(),
            listing_selector: "main a, article a, section a".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            page_timeout_secs: 120,
            pdf_timeout_secs: 60,
            continue_on_error: true,
        }
    }
}

/// Detail-page extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Selector for row-like elements visited by the block scan.
    pub block_selector: String,

    /// Maximum number of elements the block scan visits.
    pub block_scan_limit: usize,

    /// Label spellings searched by the Certification ID proximity fallback.
    pub proximity_labels: Vec<String>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            block_selector: "li, .row, .grid, .c-table__row, .c-list__item, p, div".to_string(),
            block_scan_limit: 1200,
            proximity_labels: vec![
                "Certifierings ID".to_string(),
                "Certification ID".to_string(),
                "Certifikat ID".to_string(),
                "Certifikat-ID".to_string(),
                "Certifikatnummer".to_string(),
            ],
        }
    }
}

/// Certification report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Label of the identification field recovered from the report.
    pub target_label: String,

    /// Characters scanned past the section heading when no next section is found.
    pub section_span_chars: usize,

    /// Lines collected after a label standing on its own line.
    pub follow_lines: usize,

    /// Maximum vertical-center distance for two lines to share a row.
    pub row_tolerance: f64,

    /// Minimum horizontal gap between the label's right edge and a value.
    pub min_gap: f64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            target_label: "ITSEF".to_string(),
            section_span_chars: 8000,
            follow_lines: 7,
            row_tolerance: 2.2,
            min_gap: 1.0,
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File the crawl writes its records to.
    pub path: PathBuf,

    /// Format of that file.
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output/csec_products.csv"),
            format: OutputFormat::Csv,
        }
    }
}

impl CsecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Apply `CSEC_URL` / `CSEC_OUT` (or `OUT_XLSX`) from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_LISTING_URL).filter(|v| !v.trim().is_empty()) {
            self.crawl.listing_url = url;
        }
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(path) = non_empty(ENV_OUTPUT_PATH).or_else(|| non_empty(ENV_OUTPUT_PATH_LEGACY)) {
            self.output.path = PathBuf::from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsecConfig::default();
        assert_eq!(config.html.block_scan_limit, 1200);
        assert_eq!(config.pdf.target_label, "ITSEF");
        assert_eq!(config.pdf.section_span_chars, 8000);
        assert!((config.pdf.row_tolerance - 2.2).abs() < f64::EPSILON);
        assert_eq!(config.crawl.site_origin, "https://www.fmv.se");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CsecConfig =
            serde_json::from_str(r#"{"html": {"block_scan_limit": 50}, "output": {"format": "json"}}"#)
                .unwrap();
        assert_eq!(config.html.block_scan_limit, 50);
        assert_eq!(config.html.proximity_labels.len(), 5);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.crawl.pdf_timeout_secs, 60);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CsecConfig::default();
        config.apply_env_with(|key| match key {
            ENV_LISTING_URL => Some("https://example.org/list".to_string()),
            ENV_OUTPUT_PATH => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.crawl.listing_url, "https://example.org/list");
        assert_eq!(config.output.path, PathBuf::from("output/csec_products.csv"));
    }

    #[test]
    fn test_legacy_output_variable() {
        let mut config = CsecConfig::default();
        config.apply_env_with(|key| match key {
            ENV_OUTPUT_PATH_LEGACY => Some("out/legacy.xlsx".to_string()),
            _ => None,
        });
        assert_eq!(config.output.path, PathBuf::from("out/legacy.xlsx"));

        let mut config = CsecConfig::default();
        config.apply_env_with(|key| match key {
            ENV_OUTPUT_PATH => Some("out/new.csv".to_string()),
            ENV_OUTPUT_PATH_LEGACY => Some("out/legacy.xlsx".to_string()),
            _ => None,
        });
        assert_eq!(config.output.path, PathBuf::from("out/new.csv"));
    }
}
