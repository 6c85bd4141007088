//! Branch crawl orchestrator.
//!
//! Drives the three-stage traversal: the listing page yields branch stubs
//! and detail links, each detail page yields its about link, and each
//! about page yields a staff roster merged back into the store. Pages are
//! fetched concurrently up to a configured limit; handlers run one page at
//! a time on the driving task. The crawl finishes only when the frontier
//! and the in-flight set are both empty, so visits scheduled from inside
//! handlers are always awaited.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Branch, Config, Person};
use crate::services::geocoder::Geocoder;
use crate::services::staff;
use crate::services::store::BranchStore;

/// The page kinds a crawl visits, decided from the URL alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The branch listing page (the start URL)
    Listing,
    /// A branch's own page, hosting the link to its about sub-page
    Detail,
    /// A branch sub-page whose URL ends in `/about`, holding the staff block
    About,
}

/// Summary of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Final branch records, in unspecified order
    pub branches: Vec<Branch>,
    /// Pages fetched and handled
    pub pages_fetched: usize,
    /// Pages that failed to fetch
    pub fetch_failures: usize,
    /// Staff rosters merged into a branch
    pub staff_attached: usize,
    /// Staff rosters dropped for lack of a branch record
    pub staff_dropped: usize,
}

/// Pre-parsed CSS selectors for the site's page structures.
struct CompiledSelectors {
    listing_row: Selector,
    listing_item: Selector,
    branch_name: Selector,
    branch_borough: Selector,
    branch_address: Selector,
    branch_phone: Selector,
    detail_link: Selector,
    menu_link: Selector,
    staff_block: Selector,
    person_block: Selector,
}

impl CompiledSelectors {
    fn new(config: &crate::models::SiteSelectors) -> Result<Self> {
        Ok(Self {
            listing_row: parse_selector(&config.listing_row)?,
            listing_item: parse_selector(&config.listing_item)?,
            branch_name: parse_selector(&config.branch_name)?,
            branch_borough: parse_selector(&config.branch_borough)?,
            branch_address: parse_selector(&config.branch_address)?,
            branch_phone: parse_selector(&config.branch_phone)?,
            detail_link: parse_selector(&config.detail_link)?,
            menu_link: parse_selector(&config.menu_link)?,
            staff_block: parse_selector(&config.staff_block)?,
            person_block: parse_selector(&config.person_block)?,
        })
    }
}

/// Service for crawling a branch-locator site.
pub struct BranchCrawler {
    config: Arc<Config>,
    client: Client,
    geocoder: Arc<dyn Geocoder>,
    store: BranchStore,
    selectors: CompiledSelectors,
}

impl BranchCrawler {
    /// Create a new crawler with the given configuration and collaborators.
    pub fn new(config: Arc<Config>, client: Client, geocoder: Arc<dyn Geocoder>) -> Result<Self> {
        let selectors = CompiledSelectors::new(&config.site.selectors)?;
        Ok(Self {
            config,
            client,
            geocoder,
            store: BranchStore::new(),
            selectors,
        })
    }

    /// Crawl from the configured start URL until every reachable in-scope
    /// page has been fetched and handled.
    pub async fn run(&self) -> Result<CrawlOutcome> {
        let concurrency = self.config.crawler.max_concurrent.max(1);
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);

        let mut frontier: VecDeque<String> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();
        let start = self.config.site.start_url.clone();
        visited.insert(start.clone());
        frontier.push_back(start);

        let mut outcome = CrawlOutcome::default();
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < concurrency {
                match frontier.pop_front() {
                    Some(url) => in_flight.push(self.fetch(url)),
                    None => break,
                }
            }

            // Frontier drained and nothing in flight: the transitive
            // closure of scheduled visits is complete.
            let Some((url, result)) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(body) => {
                    outcome.pages_fetched += 1;
                    for link in self.handle_page(&url, &body, &mut outcome).await {
                        if self.eligible(&link) && visited.insert(link.clone()) {
                            frontier.push_back(link);
                        }
                    }
                }
                Err(e) => {
                    outcome.fetch_failures += 1;
                    log::warn!("Failed to fetch {url}: {e}");
                }
            }

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        outcome.branches = self.store.snapshot();
        Ok(outcome)
    }

    /// Classify a URL into the page kind its handler expects. The literal
    /// `/about` suffix is the authoritative gate for staff parsing.
    fn classify(&self, url: &str) -> PageKind {
        if url == self.config.site.start_url {
            PageKind::Listing
        } else if url.ends_with("/about") {
            PageKind::About
        } else {
            PageKind::Detail
        }
    }

    /// Only links on the allowed host are visited; anything else,
    /// including unparseable hrefs, is silently ignored.
    fn eligible(&self, link: &str) -> bool {
        crate::utils::get_domain(link).as_deref() == Some(self.config.site.allowed_host.as_str())
    }

    async fn fetch_body(&self, url: &str) -> reqwest::Result<String> {
        log::debug!("Fetching {url}");
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    async fn fetch(&self, url: String) -> (String, reqwest::Result<String>) {
        let result = self.fetch_body(&url).await;
        (url, result)
    }

    /// Parse a fetched page and dispatch to its handler. Returns the URLs
    /// the handler discovered for visiting.
    async fn handle_page(&self, url: &str, body: &str, outcome: &mut CrawlOutcome) -> Vec<String> {
        let document = Html::parse_document(body);
        match self.classify(url) {
            PageKind::Listing => self.handle_listing(url, &document).await,
            PageKind::Detail => self.handle_detail(url, &document),
            PageKind::About => {
                self.handle_about(url, &document, outcome);
                Vec::new()
            }
        }
    }

    /// Extract every branch entry from the listing page, geocode its
    /// address, store the stub under its absolute detail URL, and return
    /// the detail URLs for visiting.
    async fn handle_listing(&self, url: &str, document: &Html) -> Vec<String> {
        let Ok(base) = Url::parse(url) else {
            return Vec::new();
        };

        let mut discovered = Vec::new();
        let mut entries = 0usize;
        for row in document.select(&self.selectors.listing_row) {
            for item in row.select(&self.selectors.listing_item) {
                entries += 1;

                let address = child_text(&item, &self.selectors.branch_address);
                let (latitude, longitude) = self.geocoder.locate(&address).await;

                let branch = Branch {
                    name: child_text(&item, &self.selectors.branch_name),
                    borough: child_text(&item, &self.selectors.branch_borough),
                    address,
                    phone: child_text(&item, &self.selectors.branch_phone),
                    latitude,
                    longitude,
                    staff: Vec::new(),
                };

                let href = item
                    .select(&self.selectors.detail_link)
                    .next()
                    .and_then(|a| a.value().attr("href"));
                let Some(href) = href else {
                    log::warn!("Listing entry '{}' has no detail link, skipping", branch.name);
                    continue;
                };

                let detail_url = crate::utils::resolve_url(&base, href);
                self.store.upsert(&detail_url, branch);
                discovered.push(detail_url);
            }
        }

        if entries == 0 {
            log::warn!("No branch entries found on listing page {url}");
        }
        discovered
    }

    /// Find the about navigation link on a branch detail page. The match is
    /// a case-sensitive substring on the anchor text, as in the source
    /// site's markup; there is no fallback.
    fn handle_detail(&self, url: &str, document: &Html) -> Vec<String> {
        let Ok(base) = Url::parse(url) else {
            return Vec::new();
        };

        let about_text = &self.config.site.selectors.about_text;
        let href = document
            .select(&self.selectors.menu_link)
            .find(|a| a.text().collect::<String>().contains(about_text.as_str()))
            .and_then(|a| a.value().attr("href"));

        match href {
            Some(href) => vec![crate::utils::resolve_url(&base, href)],
            None => {
                log::warn!("No about link found on detail page {url}");
                Vec::new()
            }
        }
    }

    /// Parse the staff block on an about page and merge the roster into
    /// the branch stored under this exact URL.
    fn handle_about(&self, url: &str, document: &Html, outcome: &mut CrawlOutcome) {
        let Some(block) = document.select(&self.selectors.staff_block).next() else {
            log::warn!("No staff block found on about page {url}");
            return;
        };

        let roster: Vec<Person> = block
            .select(&self.selectors.person_block)
            .filter_map(|p| staff::person_from_block(&p))
            .collect();

        log::debug!("Parsed {} staff entries from {url}", roster.len());
        if self.store.attach_staff(url, roster) {
            outcome.staff_attached += 1;
        } else {
            outcome.staff_dropped += 1;
        }
    }
}

/// Trimmed text of the first child matching `selector`, empty when absent.
fn child_text(el: &ElementRef, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
