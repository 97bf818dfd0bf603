pub mod aggregate;
pub mod config;
pub mod crawl;
pub mod dom;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod output;

pub use model::{EndpointRecord, HttpMethod, Parameter};

/// Parse one documentation page and return its candidate endpoints.
/// This is the primary entry point for apidocs-core.
pub fn parse(html: &str, resource: &str) -> Vec<EndpointRecord> {
    extract::extract_endpoints(html, resource)
}
