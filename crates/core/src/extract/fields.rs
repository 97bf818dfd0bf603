//! Per-field heuristics around a single endpoint heading.

use crate::dom::{Document, NodeId};
use crate::model::{HttpMethod, Parameter};
use regex::Regex;
use std::sync::LazyLock;

/// `GET /api/v1/users`: any run of non-space characters after the slash.
static STRICT_METHOD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GET|POST|PUT|DELETE|PATCH)\s+(/\S+)").expect("valid method/path regex")
});

/// Narrower path alphabet, also accepting a bare `/`. Catches headings where
/// stray encoding artifacts trail the path.
static LOOSE_METHOD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GET|POST|PUT|DELETE|PATCH)\s+(/[\w./:{}\-]*)")
        .expect("valid loose method/path regex")
});

/// Sub-headings that may introduce example blocks.
const EXAMPLE_HEADING_TAGS: &[&str] = &["h3", "h4", "h5"];

/// Description candidates must be longer than this many characters.
const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPath {
    pub method: HttpMethod,
    pub path: String,
}

/// Find an HTTP verb followed by a path in free text, strict pattern first.
pub fn find_method_path(text: &str) -> Option<MethodPath> {
    [&*STRICT_METHOD_PATH, &*LOOSE_METHOD_PATH]
        .into_iter()
        .find_map(|re| {
            let caps = re.captures(text)?;
            let method = caps[1].parse().ok()?;
            Some(MethodPath {
                method,
                path: caps[2].to_string(),
            })
        })
}

/// Method and path from the heading itself, or from the `h3` endpoint line
/// some generators place right after a named heading.
pub(super) fn method_path(doc: &Document, heading: NodeId) -> Option<MethodPath> {
    find_method_path(&doc.inline_text(heading)).or_else(|| {
        doc.next_siblings(heading)
            .filter(|&s| doc.is_element(s))
            .take_while(|&s| !doc.is_tag(s, "h2"))
            .filter(|&s| doc.is_tag(s, "h3"))
            .find_map(|s| find_method_path(&doc.inline_text(s)))
    })
}

pub(super) fn description(
    doc: &Document,
    heading: NodeId,
    heading_text: &str,
    path: &str,
    window: usize,
) -> String {
    let from_siblings = doc
        .next_siblings(heading)
        .take(window)
        .filter(|&s| doc.is_tag(s, "p") || doc.is_tag(s, "div"))
        .map(|s| doc.text_content(s))
        .find(|text| text.chars().count() > MIN_DESCRIPTION_CHARS);
    if let Some(text) = from_siblings {
        return text;
    }

    if let Some(title) = doc
        .attr(heading, "title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return title.to_string();
    }

    if let Some(parent) = doc.parent(heading).filter(|&p| doc.is_element(p)) {
        let parent_text = doc.text_content(parent);
        if !parent_text.is_empty() && parent_text != heading_text {
            let rest = if heading_text.is_empty() {
                parent_text
            } else {
                parent_text.replace(heading_text, "")
            };
            let rest = rest.trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }

    format!("API endpoint for {}", path)
}

pub(super) fn name(
    doc: &Document,
    heading: NodeId,
    method: HttpMethod,
    path: &str,
    resource: &str,
) -> String {
    let anchor_text = doc
        .descendants(heading)
        .filter(|&n| doc.is_tag(n, "a"))
        .map(|a| doc.text_content(a))
        .find(|text| !text.is_empty());
    if let Some(text) = anchor_text {
        return text;
    }

    match path.split('/').rev().find(|segment| !segment.trim().is_empty()) {
        Some(segment) => segment.to_string(),
        None => format!("{} {} endpoint", method, resource),
    }
}

/// Rows of the first table between the heading and the next endpoint.
/// The first row is a header; rows with fewer than three cells are skipped.
pub(super) fn parameters(doc: &Document, heading: NodeId, boundary: NodeId) -> Vec<Parameter> {
    let Some(table) = doc
        .following(heading)
        .take_while(|&n| n < boundary)
        .find(|&n| doc.is_tag(n, "table"))
    else {
        return Vec::new();
    };

    doc.descendants(table)
        .filter(|&n| doc.is_tag(n, "tr"))
        .skip(1)
        .filter_map(|row| {
            let mut cells = doc
                .descendants(row)
                .filter(|&n| doc.is_tag(n, "td"))
                .map(|cell| doc.text_content(cell));
            let name = cells.next()?;
            let param_type = cells.next()?;
            let description = cells.next()?;
            Some(Parameter {
                name,
                param_type,
                description,
            })
        })
        .collect()
}

/// Text of the first `<pre>` after a sub-heading containing `marker`.
pub(super) fn example(
    doc: &Document,
    heading: NodeId,
    boundary: NodeId,
    marker: &str,
) -> Option<String> {
    let label = doc
        .following(heading)
        .take_while(|&n| n < boundary)
        .find(|&n| {
            EXAMPLE_HEADING_TAGS.iter().any(|t| doc.is_tag(n, t))
                && doc.text_content(n).contains(marker)
        })?;

    let block = doc
        .following(label)
        .take_while(|&n| n < boundary)
        .find(|&n| doc.is_tag(n, "pre"))?;

    let text = doc.raw_text(block).trim().to_string();
    (!text.is_empty()).then_some(text)
}
