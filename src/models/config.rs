//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Target site settings and selectors
    #[serde(default)]
    pub site: SiteConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.site.allowed_host.trim().is_empty() {
            return Err(AppError::validation("site.allowed_host is empty"));
        }
        url::Url::parse(&self.site.start_url)
            .map_err(|e| AppError::validation(format!("site.start_url: {e}")))?;
        self.site.selectors.validate()?;
        if self.geocoder.api_key_env.trim().is_empty() {
            return Err(AppError::validation("geocoder.api_key_env is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Target site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL of the branch listing page, the crawl entry point
    #[serde(default = "defaults::start_url")]
    pub start_url: String,

    /// The only host eligible for visits; off-host links are ignored
    #[serde(default = "defaults::allowed_host")]
    pub allowed_host: String,

    /// CSS selectors for the site's page structures
    #[serde(default)]
    pub selectors: SiteSelectors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            start_url: defaults::start_url(),
            allowed_host: defaults::allowed_host(),
            selectors: SiteSelectors::default(),
        }
    }
}

/// CSS selectors for the branch-locator page structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Listing rows on the locations page
    #[serde(default = "defaults::listing_row")]
    pub listing_row: String,

    /// One branch entry within a listing row
    #[serde(default = "defaults::listing_item")]
    pub listing_item: String,

    /// Branch name within an entry
    #[serde(default = "defaults::branch_name")]
    pub branch_name: String,

    /// Borough within an entry
    #[serde(default = "defaults::branch_borough")]
    pub branch_borough: String,

    /// Postal address within an entry
    #[serde(default = "defaults::branch_address")]
    pub branch_address: String,

    /// Phone link within an entry
    #[serde(default = "defaults::branch_phone")]
    pub branch_phone: String,

    /// Link from an entry to the branch detail page
    #[serde(default = "defaults::detail_link")]
    pub detail_link: String,

    /// Navigation anchors on a detail page searched for the about link
    #[serde(default = "defaults::menu_link")]
    pub menu_link: String,

    /// Anchor text marking the about link (case-sensitive substring)
    #[serde(default = "defaults::about_text")]
    pub about_text: String,

    /// Staff content block on an about page
    #[serde(default = "defaults::staff_block")]
    pub staff_block: String,

    /// One person block within the staff content block
    #[serde(default = "defaults::person_block")]
    pub person_block: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            listing_row: defaults::listing_row(),
            listing_item: defaults::listing_item(),
            branch_name: defaults::branch_name(),
            branch_borough: defaults::branch_borough(),
            branch_address: defaults::branch_address(),
            branch_phone: defaults::branch_phone(),
            detail_link: defaults::detail_link(),
            menu_link: defaults::menu_link(),
            about_text: defaults::about_text(),
            staff_block: defaults::staff_block(),
            person_block: defaults::person_block(),
        }
    }
}

impl SiteSelectors {
    /// Check that every configured CSS selector parses.
    pub fn validate(&self) -> Result<()> {
        let all = [
            ("site.selectors.listing_row", &self.listing_row),
            ("site.selectors.listing_item", &self.listing_item),
            ("site.selectors.branch_name", &self.branch_name),
            ("site.selectors.branch_borough", &self.branch_borough),
            ("site.selectors.branch_address", &self.branch_address),
            ("site.selectors.branch_phone", &self.branch_phone),
            ("site.selectors.detail_link", &self.detail_link),
            ("site.selectors.menu_link", &self.menu_link),
            ("site.selectors.staff_block", &self.staff_block),
            ("site.selectors.person_block", &self.person_block),
        ];
        for (name, selector) in all {
            scraper::Selector::parse(selector)
                .map_err(|e| AppError::validation(format!("{name}: {e:?}")))?;
        }
        if self.about_text.is_empty() {
            return Err(AppError::validation("site.selectors.about_text is empty"));
        }
        Ok(())
    }
}

/// Geocoding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Geocoding API endpoint
    #[serde(default = "defaults::geocoder_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API credential
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::geocoder_endpoint(),
            api_key_env: defaults::api_key_env(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; branchmap/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        5
    }

    // Site defaults
    pub fn start_url() -> String {
        "https://ymcanyc.org/locations?type&amenities".into()
    }
    pub fn allowed_host() -> String {
        "ymcanyc.org".into()
    }

    // Selector defaults, taken from the source site's markup
    pub fn listing_row() -> String {
        "div.row.location-list-row".into()
    }
    pub fn listing_item() -> String {
        "div.location-list-item".into()
    }
    pub fn branch_name() -> String {
        "h2.location-item--title.card-type--branch".into()
    }
    pub fn branch_borough() -> String {
        "div.field-borough".into()
    }
    pub fn branch_address() -> String {
        "div.field-location-direction".into()
    }
    pub fn branch_phone() -> String {
        "div.field-location-phone.field-item > a".into()
    }
    pub fn detail_link() -> String {
        "a.btn-primary".into()
    }
    pub fn menu_link() -> String {
        "li.camp-menu-item a".into()
    }
    pub fn about_text() -> String {
        "About".into()
    }
    pub fn staff_block() -> String {
        "div.field-prgf-2c-left.block-description--text.col-12.col-lg".into()
    }
    pub fn person_block() -> String {
        "p".into()
    }

    // Geocoder defaults
    pub fn geocoder_endpoint() -> String {
        "https://maps.googleapis.com/maps/api/geocode/json".into()
    }
    pub fn api_key_env() -> String {
        "GOOGLE_API_KEY".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.crawler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.site.selectors.listing_item = "[[invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_start_url() {
        let mut config = Config::default();
        config.site.start_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            max_concurrent = 2

            [site]
            allowed_host = "example.org"
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.max_concurrent, 2);
        assert_eq!(config.site.allowed_host, "example.org");
        // Untouched sections keep their defaults
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.geocoder.api_key_env, "GOOGLE_API_KEY");
    }
}
