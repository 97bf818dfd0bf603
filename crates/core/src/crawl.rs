//! The sequential crawl loop: fetch, extract, aggregate, pause, repeat.

use crate::aggregate::{Aggregator, BatchSummary};
use crate::config::{CrawlConfig, ResourceLink};
use crate::extract::Extractor;
use crate::fetch::PageFetcher;
use crate::output;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// How one resource page fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    Fetched { extracted: usize, batch: BatchSummary },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub resource: String,
    pub url: String,
    pub status: ResourceStatus,
}

impl ResourceOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, ResourceStatus::Failed { .. })
    }
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub aggregate: Aggregator,
    pub outcomes: Vec<ResourceOutcome>,
}

impl CrawlReport {
    pub fn failures(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Drives one crawl over the configured resources.
pub struct Crawler<F> {
    config: CrawlConfig,
    fetcher: F,
    extractor: Extractor,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(config: CrawlConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            extractor: Extractor::default(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn run(&mut self) -> CrawlReport {
        self.run_with(|_, _| {})
    }

    /// Run the crawl, calling `after_resource` once per resource with its
    /// outcome and the aggregate so far (e.g. to persist incrementally).
    pub fn run_with<H>(&mut self, mut after_resource: H) -> CrawlReport
    where
        H: FnMut(&ResourceOutcome, &Aggregator),
    {
        info!(
            base_url = %self.config.base_url,
            resources = self.config.resources.len(),
            "starting API documentation crawl"
        );

        let mut aggregate = Aggregator::new();
        let mut outcomes = Vec::with_capacity(self.config.resources.len());
        let resources = self.config.resources.clone();

        for (i, link) in resources.iter().enumerate() {
            if i > 0 && self.config.pause_ms > 0 {
                thread::sleep(Duration::from_millis(self.config.pause_ms));
            }

            let outcome = self.process(link, &mut aggregate);
            after_resource(&outcome, &aggregate);
            outcomes.push(outcome);
        }

        info!(
            endpoints = aggregate.len(),
            failed = outcomes.iter().filter(|o| o.is_failure()).count(),
            "crawl finished"
        );
        CrawlReport {
            aggregate,
            outcomes,
        }
    }

    fn process(&mut self, link: &ResourceLink, aggregate: &mut Aggregator) -> ResourceOutcome {
        let failed = |url: String, error: String| ResourceOutcome {
            resource: link.label.clone(),
            url,
            status: ResourceStatus::Failed { error },
        };

        let url = match self.config.resource_url(link) {
            Ok(url) => url,
            Err(e) => {
                warn!(resource = %link.label, error = %e, "skipping resource with bad URL");
                return failed(link.page.clone(), e.to_string());
            }
        };
        info!(resource = %link.label, url = %url, "processing resource");

        let html = match self.fetcher.fetch(&url, &self.config.session_id) {
            Ok(html) => html,
            Err(e) => {
                warn!(resource = %link.label, error = %e, "error fetching resource");
                return failed(url, e.to_string());
            }
        };

        if self.config.should_dump(link) {
            match output::dump_html(&self.config.output_dir, &link.label, &html) {
                Ok(path) => info!(resource = %link.label, path = %path.display(), "saved page HTML"),
                Err(e) => warn!(resource = %link.label, error = %e, "could not save page HTML"),
            }
        }

        let endpoints = self.extractor.extract(&html, &link.label);
        let extracted = endpoints.len();
        let batch = aggregate.ingest(endpoints);
        info!(
            resource = %link.label,
            extracted,
            accepted = batch.accepted,
            duplicates = batch.duplicates,
            incomplete = batch.incomplete,
            "merged endpoints"
        );

        ResourceOutcome {
            resource: link.label.clone(),
            url,
            status: ResourceStatus::Fetched { extracted, batch },
        }
    }
}
