//! Endpoint records and the rules every accepted record must satisfy.

use crate::error::UnknownMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extractor-side cap on description length, in characters.
pub const DESCRIPTION_CAP: usize = 500;
/// Cap applied to descriptions in the tabular projection.
pub const TABULAR_DESCRIPTION_CAP: usize = 200;
/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// The HTTP verbs an endpoint heading may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Exact, case-sensitive match: documentation headings use upper-case verbs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// One row of an endpoint's parameter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
}

/// A documented API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Category assigned by the caller (e.g. "Users"); never parsed from the page.
    pub resource: String,
    pub name: String,
    pub http_method: HttpMethod,
    /// URL template, always starting with `/`.
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_response: Option<String>,
}

impl EndpointRecord {
    /// Dedup identity: `(resource, method, path)` joined into one key.
    pub fn identity_key(&self) -> String {
        format!("{}_{}_{}", self.resource, self.http_method, self.path)
    }

    /// Required-field gate applied at aggregation.
    ///
    /// `http_method` is always present by construction, so only the string
    /// fields need checking. Whitespace counts as content.
    pub fn is_complete(&self) -> bool {
        [&self.resource, &self.name, &self.path, &self.description]
            .iter()
            .all(|field| !field.is_empty())
    }
}

/// Cap `text` at `cap` characters, appending [`ELLIPSIS`] when anything was cut.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
