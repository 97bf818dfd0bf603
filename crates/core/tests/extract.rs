//! Tests for endpoint extraction from documentation HTML.

use apidocs_core::aggregate::Aggregator;
use apidocs_core::extract::{find_method_path, Extractor, HeadingStrategy};
use apidocs_core::model::{HttpMethod, Parameter, DESCRIPTION_CAP, ELLIPSIS};
use apidocs_core::output;
use pretty_assertions::assert_eq;

const USERS_PAGE: &str = r#"
<html><body>
<div id="content">
    <h2>GET /api/v1/users</h2>
    <p>Lists users.</p>
    <table>
        <tr><th>Parameter</th><th>Type</th><th>Description</th></tr>
        <tr><td>search_term</td><td>string</td><td>Partial name or full ID</td></tr>
        <tr><td>per_page</td><td>integer</td><td>Page size</td></tr>
    </table>
</div>
</body></html>
"#;

/// Structure used by the Canvas documentation generator: a named heading
/// followed by an `h3` carrying the verb and path.
const CANVAS_PAGE: &str = r##"
<html><body>
<div id="content">
    <h2 class="api_method_name" name="method.users.index">
        <a name="method.users.index" href="#method.users.index">List users in account</a>
    </h2>
    <h3 class="endpoint">GET /api/v1/accounts/:account_id/users</h3>
    <p>Returns the list of users in this account.</p>
    <h4>Request Parameters:</h4>
    <table class="request-params">
        <thead><tr><th>Parameter</th><th>Type</th><th>Description</th></tr></thead>
        <tbody>
            <tr><td>search_term</td><td>string</td><td>The partial name or full ID of the users to match.</td></tr>
            <tr><td colspan="3">Deprecated parameters follow</td></tr>
        </tbody>
    </table>
    <h4>Example Request:</h4>
    <pre class="example code">curl https://&lt;canvas&gt;/api/v1/accounts/self/users \
    -H 'Authorization: Bearer &lt;token&gt;'</pre>
    <h4>Example Response:</h4>
    <pre>[{"id": 1}]</pre>

    <h2 class="api_method_name">
        <a href="#method.users.show">Show user details</a>
    </h2>
    <h3 class="endpoint">GET /api/v1/users/:id</h3>
    <p>Shows details for a user.</p>
</div>
</body></html>
"##;

#[test]
fn test_single_endpoint_with_parameter_table() {
    let endpoints = apidocs_core::parse(USERS_PAGE, "Users");
    assert_eq!(endpoints.len(), 1);

    let ep = &endpoints[0];
    assert_eq!(ep.resource, "Users");
    assert_eq!(ep.http_method, HttpMethod::Get);
    assert_eq!(ep.path, "/api/v1/users");
    assert_eq!(ep.description, "Lists users.");
    assert_eq!(ep.name, "users");
    assert_eq!(
        ep.parameters,
        vec![
            Parameter {
                name: "search_term".into(),
                param_type: "string".into(),
                description: "Partial name or full ID".into(),
            },
            Parameter {
                name: "per_page".into(),
                param_type: "integer".into(),
                description: "Page size".into(),
            },
        ]
    );
    assert_eq!(ep.example_request, None);
    assert_eq!(ep.example_response, None);
}

#[test]
fn test_page_without_headings_is_empty() {
    let html = r#"<html><body><div id="content"><p>Nothing documented here.</p></div></body></html>"#;
    assert!(apidocs_core::parse(html, "Empty").is_empty());
    assert!(apidocs_core::parse("", "Empty").is_empty());
}

#[test]
fn test_unknown_verb_produces_no_candidate() {
    let html = r#"
    <div id="content">
        <h2>FETCH /foo</h2>
        <p>Fetches a foo from the store.</p>
    </div>
    "#;
    assert!(apidocs_core::parse(html, "Foo").is_empty());

    let marked = r#"<h2 class="api_method_name">FETCH /foo</h2><p>Fetches a foo.</p>"#;
    assert!(apidocs_core::parse(marked, "Foo").is_empty());
}

#[test]
fn test_marked_headings_take_precedence() {
    let html = r#"
    <div id="content">
        <h2 class="api_method_name">POST /api/v1/courses</h2>
        <p>Creates a new course.</p>
        <h2>GET /api/v1/other</h2>
        <p>Should not be picked up.</p>
    </div>
    "#;
    let endpoints = apidocs_core::parse(html, "Courses");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].http_method, HttpMethod::Post);
    assert_eq!(endpoints[0].path, "/api/v1/courses");
}

#[test]
fn test_content_headings_filtered_by_method_text() {
    let html = r#"
    <div id="content">
        <h2>Overview</h2>
        <p>General information about courses.</p>
        <h2>PATCH /api/v1/courses/:id</h2>
        <p>Partially updates a course.</p>
    </div>
    <h2>GET /outside/content</h2>
    "#;
    let endpoints = apidocs_core::parse(html, "Courses");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].http_method, HttpMethod::Patch);
    assert_eq!(endpoints[0].path, "/api/v1/courses/:id");
    assert_eq!(endpoints[0].name, ":id");
}

#[test]
fn test_canvas_structure() {
    let endpoints = apidocs_core::parse(CANVAS_PAGE, "Users");
    assert_eq!(endpoints.len(), 2);

    let list = &endpoints[0];
    assert_eq!(list.name, "List users in account");
    assert_eq!(list.path, "/api/v1/accounts/:account_id/users");
    assert_eq!(list.description, "Returns the list of users in this account.");
    assert_eq!(list.parameters.len(), 1, "rows with fewer than 3 cells are skipped");
    assert_eq!(list.parameters[0].name, "search_term");

    let request = list.example_request.as_deref().unwrap();
    assert!(request.starts_with("curl https://<canvas>/api/v1/accounts/self/users"));
    assert!(request.contains("\n"), "pre text keeps its line breaks");
    assert!(request.contains("Authorization: Bearer <token>"));
    assert_eq!(list.example_response.as_deref(), Some(r#"[{"id": 1}]"#));

    let show = &endpoints[1];
    assert_eq!(show.name, "Show user details");
    assert_eq!(show.path, "/api/v1/users/:id");
    assert_eq!(show.description, "Shows details for a user.");
    assert!(show.parameters.is_empty(), "the previous endpoint's table is not reused");
    assert_eq!(show.example_request, None);
}

#[test]
fn test_description_from_title_attribute() {
    let html = r#"<div id="content"><h2 title="Fetch a single user">GET /api/v1/users/:id</h2></div>"#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(endpoints[0].description, "Fetch a single user");
}

#[test]
fn test_description_from_parent_text() {
    let html = r#"
    <div id="content">
        <div>
            <h2>DELETE /api/v1/users/:id</h2>
            <span>Removes the user permanently</span>
        </div>
    </div>
    "#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(endpoints[0].description, "Removes the user permanently");
}

#[test]
fn test_short_paragraphs_are_not_descriptions() {
    let html = r#"
    <div id="content">
        <h2 title="Updates a user">PUT /api/v1/users/:id</h2>
        <p>Beta.</p>
    </div>
    "#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(endpoints[0].description, "Updates a user");
}

#[test]
fn test_generic_description_when_nothing_found() {
    let html = r#"<div id="content"><h2>PUT /api/v1/users/:id</h2></div>"#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(endpoints[0].description, "API endpoint for /api/v1/users/:id");
}

#[test]
fn test_name_synthesized_for_root_path() {
    let html = r#"<div id="content"><h2>GET /</h2><p>Root of the API surface.</p></div>"#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].path, "/");
    assert_eq!(endpoints[0].name, "GET Users endpoint");
}

#[test]
fn test_name_skips_trailing_slash() {
    let html = r#"<div id="content"><h2>POST /api/v1/files/</h2><p>Uploads a new file.</p></div>"#;
    let endpoints = apidocs_core::parse(html, "Files");
    assert_eq!(endpoints[0].name, "files");
}

#[test]
fn test_description_is_capped() {
    let long = "a".repeat(600);
    let html = format!(r#"<div id="content"><h2>GET /api/v1/long</h2><p>{}</p></div>"#, long);
    let endpoints = apidocs_core::parse(&html, "Long");

    let description = &endpoints[0].description;
    assert_eq!(description.chars().count(), DESCRIPTION_CAP + ELLIPSIS.len());
    assert!(description.ends_with(ELLIPSIS));
}

#[test]
fn test_find_method_path_patterns() {
    let strict = find_method_path("GET /api/v1/users?page=2").unwrap();
    assert_eq!(strict.method, HttpMethod::Get);
    assert_eq!(strict.path, "/api/v1/users?page=2");

    let nbsp = find_method_path("DELETE\u{a0}/api/v1/users/:id").unwrap();
    assert_eq!(nbsp.method, HttpMethod::Delete);
    assert_eq!(nbsp.path, "/api/v1/users/:id");

    let bare = find_method_path("GET /").unwrap();
    assert_eq!(bare.path, "/");

    assert_eq!(find_method_path("FETCH /foo"), None);
    assert_eq!(find_method_path("TARGET /foo"), None);
    assert_eq!(find_method_path("GET users"), None);
}

#[test]
fn test_custom_strategy_order() {
    let html = r#"
    <div id="content">
        <h2 class="api_method_name">POST /api/v1/courses</h2>
        <p>Creates a new course.</p>
        <h2>GET /api/v1/other</h2>
        <p>Lists other things.</p>
    </div>
    "#;
    let extractor = Extractor::with_strategies(vec![HeadingStrategy::ContentHeadings]);
    let endpoints = extractor.extract(html, "Courses");
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[1].path, "/api/v1/other");
}

#[test]
fn test_users_page_through_aggregate_to_csv() {
    let mut agg = Aggregator::new();
    let summary = agg.ingest(apidocs_core::parse(USERS_PAGE, "Users"));
    assert_eq!(summary.accepted, 1);

    let mut buf = Vec::new();
    output::write_tabular(agg.records(), &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Users,users,GET,/api/v1/users,Lists users.,,2");
    assert!(lines[1].ends_with(",2"));
}

#[test]
fn test_inline_markup_inside_path() {
    let html = r#"
    <div id="content">
        <h2 class="api_method_name">GET /api/v1/users/<span class="param">:id</span></h2>
        <p>Shows a single user.</p>
        <h2 class="api_method_name">GET /api/v1/users/<span class="param">:user_id</span>/avatars</h2>
        <p>Lists avatar options for a user.</p>
    </div>
    "#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(endpoints.len(), 2);
    assert_eq!(endpoints[0].path, "/api/v1/users/:id");
    assert_eq!(endpoints[0].name, ":id");
    assert_eq!(endpoints[1].path, "/api/v1/users/:user_id/avatars");

    let mut agg = Aggregator::new();
    agg.ingest(endpoints);
    assert_eq!(agg.len(), 2);
}

#[test]
fn test_inline_markup_in_content_heading() {
    let html = r#"<div id="content"><h2><code>PUT</code> <code>/api/v1/courses/:id</code></h2><p>Updates a course.</p></div>"#;
    let endpoints = apidocs_core::parse(html, "Courses");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].http_method, HttpMethod::Put);
    assert_eq!(endpoints[0].path, "/api/v1/courses/:id");
}

#[test]
fn test_highlighted_example_keeps_token_spacing() {
    let html = r#"
    <div id="content">
        <h2 class="api_method_name">GET /api/v1/users</h2>
        <p>Lists users in the account.</p>
        <h4>Example Request:</h4>
        <pre><span>curl</span> <span>-X</span> <span>GET</span>
<span>https://x/api</span></pre>
    </div>
    "#;
    let endpoints = apidocs_core::parse(html, "Users");
    assert_eq!(
        endpoints[0].example_request.as_deref(),
        Some("curl -X GET\nhttps://x/api")
    );
}
