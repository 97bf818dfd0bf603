//! Tests for the document arena and selector matching.

use apidocs_core::dom::parse_html;
use pretty_assertions::assert_eq;

const PAGE: &str = r#"
<html><body>
<div id="content" class="main wide">
    <div class="section">
        <h2 class="api_method_name">GET /api/v1/a</h2>
        <p>First   paragraph <b>bold</b> tail.</p>
    </div>
    <h2 data-kind="general">Overview</h2>
    <pre>  line one
  line two</pre>
    <script>var ignored = "GET /api/v1/script";</script>
</div>
<div><h2>Outside</h2></div>
</body></html>
"#;

fn texts(doc: &apidocs_core::dom::Document, ids: &[usize]) -> Vec<String> {
    ids.iter().map(|&id| doc.text_content(id)).collect()
}

#[test]
fn test_select_class_and_id() {
    let doc = parse_html(PAGE);
    assert_eq!(texts(&doc, &doc.select("h2.api_method_name")), vec!["GET /api/v1/a"]);
    assert_eq!(
        texts(&doc, &doc.select("div#content h2")),
        vec!["GET /api/v1/a", "Overview"]
    );
    assert_eq!(doc.select("div.main.wide").len(), 1);
    assert_eq!(doc.select("div.main.narrow").len(), 0);
}

#[test]
fn test_select_child_combinator() {
    let doc = parse_html(PAGE);
    assert_eq!(
        texts(&doc, &doc.select("div > div > h2")),
        vec!["GET /api/v1/a"]
    );
    assert_eq!(
        texts(&doc, &doc.select("body > div > h2")),
        vec!["Overview", "Outside"]
    );
}

#[test]
fn test_select_attributes_and_lists() {
    let doc = parse_html(PAGE);
    assert_eq!(texts(&doc, &doc.select("h2[data-kind]")), vec!["Overview"]);
    assert_eq!(texts(&doc, &doc.select("[data-kind=general]")), vec!["Overview"]);
    assert_eq!(doc.select("h2[data-kind='other']").len(), 0);
    assert_eq!(doc.select("h2.api_method_name, pre").len(), 2);
    assert_eq!(doc.select("div.section > *").len(), 2);
}

#[test]
fn test_unsupported_selectors_match_nothing() {
    let doc = parse_html(PAGE);
    assert!(doc.select("h2:first-child").is_empty());
    assert!(doc.select("div + h2").is_empty());
    assert!(doc.select("> h2").is_empty());
    assert!(doc.select("").is_empty());
}

#[test]
fn test_text_content_and_raw_text() {
    let doc = parse_html(PAGE);
    let p = doc.select("p")[0];
    assert_eq!(doc.text_content(p), "First   paragraph bold tail.");

    let pre = doc.select("pre")[0];
    assert_eq!(doc.raw_text(pre), "  line one\n  line two");

    // Script bodies are dropped
    let content = doc.select("div#content")[0];
    assert!(!doc.text_content(content).contains("script"));
}

#[test]
fn test_inline_text_and_blank_runs() {
    let doc = parse_html(
        "<h2>GET /api/v1/users/<span>:id</span></h2><pre><b>a</b> <b>b</b>\n<b>c</b></pre>",
    );
    let heading = doc.select("h2")[0];
    assert_eq!(doc.inline_text(heading), "GET /api/v1/users/:id");
    assert_eq!(doc.text_content(heading), "GET /api/v1/users/ :id");

    let pre = doc.select("pre")[0];
    assert_eq!(doc.raw_text(pre), "a b\nc");
    assert_eq!(doc.text_content(pre), "a b c");
}

#[test]
fn test_sibling_navigation() {
    let doc = parse_html(PAGE);
    let heading = doc.select("h2.api_method_name")[0];
    let next = doc.next_sibling(heading).unwrap();
    assert!(doc.is_tag(next, "p"));
    assert_eq!(doc.next_siblings(heading).count(), 1);

    let overview = doc.select("h2[data-kind]")[0];
    let table_or_pre = doc.find_next(overview, &["table", "pre"]).unwrap();
    assert!(doc.is_tag(table_or_pre, "pre"));

    let parent = doc.parent(heading).unwrap();
    assert!(doc.has_class(parent, "section"));
    assert_eq!(doc.ancestors(heading).count(), 4); // div.section, div#content, body, html
}
