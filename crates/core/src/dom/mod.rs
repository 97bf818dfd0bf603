use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashMap;

pub mod selector;

/// Index of a node inside a [`Document`]. Ids follow document order.
pub type NodeId = usize;

/// A node in the document arena. Minimal — only what extraction needs.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub node_type: NodeType,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// One past the last id of this node's subtree.
    pub subtree_end: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Element,
    Text,
    Document,
}

impl DomNode {
    fn new_element(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: HashMap::new(),
            text: String::new(),
            node_type: NodeType::Element,
            parent,
            children: Vec::new(),
            subtree_end: 0,
        }
    }

    fn new_text(text: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: text.to_string(),
            node_type: NodeType::Text,
            parent,
            children: Vec::new(),
            subtree_end: 0,
        }
    }

    fn new_document() -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: String::new(),
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            subtree_end: 0,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }
}

/// A parsed HTML page stored as a flat arena in document (pre-)order.
///
/// Flat storage makes the two navigation styles the extractor needs cheap:
/// sibling scans through `parent.children`, and "next matching element"
/// scans through the id range after a node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<DomNode>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id].tag
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.nodes[id].is_element()
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        let node = &self.nodes[id];
        node.is_element() && node.tag == tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Parent chain, nearest first. Stops before the document node.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
            .filter(move |&p| self.nodes[p].node_type != NodeType::Document)
    }

    /// Next sibling element or non-blank text node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&s| !self.is_blank_text(s))
    }

    /// Siblings after `id`, in order. Whitespace-only text never appears here.
    pub fn next_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.next_sibling(id), move |&s| self.next_sibling(s))
    }

    /// All nodes inside the subtree of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        id + 1..self.nodes[id].subtree_end
    }

    /// All nodes after `id` in document order, including its own descendants.
    pub fn following(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        id + 1..self.nodes.len()
    }

    /// First element after `id` in document order with one of the given tags.
    pub fn find_next(&self, id: NodeId, tags: &[&str]) -> Option<NodeId> {
        self.following(id)
            .find(|&n| tags.iter().any(|t| self.is_tag(n, t)))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id].attributes.get(name).map(|s| s.as_str())
    }

    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attr(id, "class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    fn is_blank_text(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.node_type == NodeType::Text && node.text.trim().is_empty()
    }

    /// Get the visible text content of this node and all children.
    pub fn text_content(&self, id: NodeId) -> String {
        let node = &self.nodes[id];
        if node.node_type == NodeType::Text {
            return node.text.trim().to_string();
        }
        let mut out = String::new();
        for n in self.descendants(id) {
            let child = &self.nodes[n];
            if child.node_type != NodeType::Text {
                continue;
            }
            let trimmed = child.text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(trimmed);
        }
        out
    }

    /// Text as it reads inline: fragments concatenated as written, whitespace
    /// runs collapsed to one space. `GET /users/<span>:id</span>` stays one
    /// token, unlike [`Document::text_content`].
    pub fn inline_text(&self, id: NodeId) -> String {
        self.raw_text(id).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Text of this subtree with whitespace preserved, for `<pre>` blocks.
    pub fn raw_text(&self, id: NodeId) -> String {
        let node = &self.nodes[id];
        if node.node_type == NodeType::Text {
            return node.text.clone();
        }
        self.descendants(id)
            .map(|n| &self.nodes[n])
            .filter(|n| n.node_type == NodeType::Text)
            .map(|n| n.text.as_str())
            .collect()
    }
}

/// Parse an HTML string into a [`Document`].
pub fn parse_html(html: &str) -> Document {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts).one(html);

    let mut nodes = Vec::new();
    convert_node(&dom.document, None, &mut nodes);
    if nodes.is_empty() {
        let mut doc = DomNode::new_document();
        doc.subtree_end = 1;
        nodes.push(doc);
    }
    Document { nodes }
}

fn push_node(nodes: &mut Vec<DomNode>, node: DomNode) -> NodeId {
    let id = nodes.len();
    if let Some(parent) = node.parent {
        nodes[parent].children.push(id);
    }
    nodes.push(node);
    id
}

fn convert_node(handle: &Handle, parent: Option<NodeId>, nodes: &mut Vec<DomNode>) {
    let id = match &handle.data {
        NodeData::Document => push_node(nodes, DomNode::new_document()),
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let mut node = DomNode::new_element(&tag, parent);
            for attr in attrs.borrow().iter() {
                node.attributes
                    .insert(attr.name.local.to_string(), attr.value.to_string());
            }
            let id = push_node(nodes, node);
            // Script and style bodies never carry documentation text
            if tag == "script" || tag == "style" || tag == "noscript" {
                nodes[id].subtree_end = id + 1;
                return;
            }
            id
        }
        NodeData::Text { contents } => {
            // Blank runs are kept: inside `<pre>` they separate highlighted tokens
            let text = contents.borrow().to_string();
            let id = push_node(nodes, DomNode::new_text(&text, parent));
            nodes[id].subtree_end = id + 1;
            return;
        }
        _ => return, // Comments, PIs, doctypes → ignored
    };

    for child in handle.children.borrow().iter() {
        convert_node(child, Some(id), nodes);
    }
    nodes[id].subtree_end = nodes.len();
}
