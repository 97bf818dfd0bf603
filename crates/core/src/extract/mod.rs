//! Endpoint extraction from rendered documentation pages.
//!
//! Documentation markup varies between resource pages, so extraction is a
//! chain of fallbacks: an ordered list of heading strategies picks the
//! endpoint headings, then each field is recovered independently from the
//! markup around a heading. Only the method and path are mandatory; every
//! other field has a synthesized fallback.

mod fields;

use crate::dom::{parse_html, Document, NodeId};
use crate::model::{truncate_chars, EndpointRecord, DESCRIPTION_CAP};
use tracing::{debug, info};

pub use fields::{find_method_path, MethodPath};

/// How endpoint headings are located on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStrategy {
    /// Headings carrying the documentation generator's method marker class.
    MarkedHeadings,
    /// Any `h2` in the main content container whose text reads like `GET /path`.
    ContentHeadings,
}

impl HeadingStrategy {
    pub const DEFAULT_ORDER: [HeadingStrategy; 2] = [
        HeadingStrategy::MarkedHeadings,
        HeadingStrategy::ContentHeadings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HeadingStrategy::MarkedHeadings => "marked-headings",
            HeadingStrategy::ContentHeadings => "content-headings",
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            HeadingStrategy::MarkedHeadings => "h2.api_method_name",
            HeadingStrategy::ContentHeadings => "div#content h2",
        }
    }

    /// Candidate headings in document order. May be empty.
    pub fn candidates(&self, doc: &Document) -> Vec<NodeId> {
        let found = doc.select(self.selector());
        match self {
            HeadingStrategy::MarkedHeadings => found,
            HeadingStrategy::ContentHeadings => {
                let total = found.len();
                let filtered: Vec<NodeId> = found
                    .into_iter()
                    .filter(|&h| find_method_path(&doc.inline_text(h)).is_some())
                    .collect();
                debug!(
                    total,
                    kept = filtered.len(),
                    "filtered general headings by method/path text"
                );
                filtered
            }
        }
    }
}

/// Turns documentation HTML into candidate endpoint records.
#[derive(Debug, Clone)]
pub struct Extractor {
    strategies: Vec<HeadingStrategy>,
    /// How many siblings after a heading are searched for a description.
    pub sibling_window: usize,
    pub description_cap: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            strategies: HeadingStrategy::DEFAULT_ORDER.to_vec(),
            sibling_window: 10,
            description_cap: DESCRIPTION_CAP,
        }
    }
}

impl Extractor {
    pub fn with_strategies(strategies: Vec<HeadingStrategy>) -> Self {
        Self {
            strategies,
            ..Default::default()
        }
    }

    /// Parse `html` and extract every endpoint documented on it.
    pub fn extract(&self, html: &str, resource: &str) -> Vec<EndpointRecord> {
        let doc = parse_html(html);
        self.extract_document(&doc, resource)
    }

    pub fn extract_document(&self, doc: &Document, resource: &str) -> Vec<EndpointRecord> {
        let headings = self.locate_headings(doc, resource);

        let mut endpoints = Vec::new();
        for (i, &heading) in headings.iter().enumerate() {
            // Tables and examples past the next heading belong to the next endpoint
            let boundary = headings.get(i + 1).copied().unwrap_or(doc.len());
            if let Some(endpoint) = self.extract_heading(doc, heading, boundary, resource) {
                endpoints.push(endpoint);
            }
        }

        info!(
            resource,
            count = endpoints.len(),
            "extracted API endpoints"
        );
        endpoints
    }

    /// Try each strategy in order; the first non-empty result wins.
    fn locate_headings(&self, doc: &Document, resource: &str) -> Vec<NodeId> {
        for strategy in &self.strategies {
            let headings = strategy.candidates(doc);
            if !headings.is_empty() {
                info!(
                    resource,
                    strategy = strategy.name(),
                    count = headings.len(),
                    "found potential API methods"
                );
                return headings;
            }
            debug!(resource, strategy = strategy.name(), "no headings matched");
        }
        info!(resource, "found no API method headings");
        Vec::new()
    }

    fn extract_heading(
        &self,
        doc: &Document,
        heading: NodeId,
        boundary: NodeId,
        resource: &str,
    ) -> Option<EndpointRecord> {
        let heading_text = doc.text_content(heading);
        debug!(text = %preview(&heading_text), "analyzing method heading");

        let Some(MethodPath { method, path }) = fields::method_path(doc, heading) else {
            debug!(text = %preview(&heading_text), "could not extract method and path");
            return None;
        };

        let description = fields::description(doc, heading, &heading_text, &path, self.sibling_window);
        let name = fields::name(doc, heading, method, &path, resource);
        let parameters = fields::parameters(doc, heading, boundary);
        let example_request = fields::example(doc, heading, boundary, "Example Request");
        let example_response = fields::example(doc, heading, boundary, "Example Response");

        debug!(%method, %path, params = parameters.len(), "extracted endpoint");

        Some(EndpointRecord {
            resource: resource.to_string(),
            name,
            http_method: method,
            path,
            description: truncate_chars(&description, self.description_cap),
            parameters,
            example_request,
            example_response,
        })
    }
}

/// Extract endpoints with the default strategy order.
pub fn extract_endpoints(html: &str, resource: &str) -> Vec<EndpointRecord> {
    Extractor::default().extract(html, resource)
}

fn preview(text: &str) -> String {
    truncate_chars(text, 50)
}
