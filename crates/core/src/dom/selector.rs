//! Minimal CSS selector matching engine.
//! Supports: tag, .class, #id, [attr], [attr=value], *, combinators
//! (descendant, child), and comma-separated selector lists.

use super::{Document, NodeId};

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}

/// A single selector (one part of a comma-separated list).
///
/// `combinators[i]` joins `compounds[i]` to `compounds[i + 1]`.
#[derive(Debug, Clone)]
pub struct Selector {
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

/// A run of simple selectors that all apply to one element: `div#content.main`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Combinator {
    /// Descendant combinator (space)
    Descendant,
    /// Child combinator (>)
    Child,
}

impl SelectorList {
    /// Parse a selector list. Returns `None` if any member is malformed or
    /// uses syntax outside the supported subset.
    pub fn parse(input: &str) -> Option<Self> {
        let selectors = input
            .split(',')
            .map(parse_selector)
            .collect::<Option<Vec<_>>>()?;
        if selectors.is_empty() {
            None
        } else {
            Some(Self { selectors })
        }
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(doc, node))
    }
}

impl Selector {
    /// Check if this selector matches an element, walking its ancestry right to left.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if self.compounds.is_empty() {
            return false;
        }
        self.matches_at(doc, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, doc: &Document, node: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(doc, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => doc
                .ancestors(node)
                .next()
                .is_some_and(|p| self.matches_at(doc, p, idx - 1)),
            Combinator::Descendant => doc
                .ancestors(node)
                .any(|a| self.matches_at(doc, a, idx - 1)),
        }
    }
}

impl Compound {
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if !doc.is_element(node) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !doc.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| match expected {
            Some(val) => doc.attr(node, name) == Some(val.as_str()),
            None => doc.attr(node, name).is_some(),
        })
    }
}

impl Document {
    /// All elements matching `selector`, in document order.
    /// A selector outside the supported grammar matches nothing.
    pub fn select(&self, selector: &str) -> Vec<NodeId> {
        match SelectorList::parse(selector) {
            Some(list) => self.select_with(&list),
            None => Vec::new(),
        }
    }

    pub fn select_with(&self, list: &SelectorList) -> Vec<NodeId> {
        (0..self.len()).filter(|&n| list.matches(self, n)).collect()
    }
}

/// Parse a single selector string into a Selector.
fn parse_selector(input: &str) -> Option<Selector> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut current = Compound::default();
    // Whether `current` holds at least one simple selector (`*` included)
    let mut started = false;
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            ' ' | '\t' | '\n' | '\r' | '>' => {
                if !started {
                    // Leading or doubled combinator
                    return None;
                }
                skip_whitespace(&mut chars);
                let combinator = if chars.peek() == Some(&'>') {
                    chars.next();
                    skip_whitespace(&mut chars);
                    Combinator::Child
                } else {
                    Combinator::Descendant
                };
                compounds.push(std::mem::take(&mut current));
                combinators.push(combinator);
                started = false;
                continue;
            }
            '.' => {
                chars.next();
                let class_name = read_ident(&mut chars);
                if class_name.is_empty() {
                    return None;
                }
                current.classes.push(class_name);
            }
            '#' => {
                chars.next();
                let id_name = read_ident(&mut chars);
                if id_name.is_empty() {
                    return None;
                }
                current.id = Some(id_name);
            }
            '[' => {
                chars.next();
                current.attributes.push(read_attribute(&mut chars)?);
            }
            '*' => {
                chars.next();
            }
            c if c.is_alphanumeric() => {
                let tag = read_ident(&mut chars);
                current.tag = Some(tag.to_lowercase());
            }
            // `+`, `~`, pseudo-classes and the rest are not supported
            _ => return None,
        }
        started = true;
    }

    if !started {
        return None;
    }
    compounds.push(current);
    Some(Selector {
        compounds,
        combinators,
    })
}

fn read_attribute(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<(String, Option<String>)> {
    let mut attr = String::new();
    let mut value = None;
    // Read until ]
    loop {
        let c = chars.next()?;
        match c {
            ']' => break,
            '=' => {
                let mut val = String::new();
                let quote = chars.peek().copied().filter(|q| *q == '"' || *q == '\'');
                if quote.is_some() {
                    chars.next();
                }
                while let Some(&vc) = chars.peek() {
                    if Some(vc) == quote {
                        chars.next();
                        break;
                    }
                    if quote.is_none() && vc == ']' {
                        break;
                    }
                    val.push(vc);
                    chars.next();
                }
                value = Some(val);
            }
            _ => attr.push(c),
        }
    }
    let attr = attr.trim().to_string();
    if attr.is_empty() {
        None
    } else {
        Some((attr, value))
    }
}

fn read_ident(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars>) {
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else {
            break;
        }
    }
}
