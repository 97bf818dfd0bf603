//! Which documentation pages to visit and where results go.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://canvas.instructure.com/doc/api/";

/// Core resource pages crawled by default.
const DEFAULT_PAGES: &[&str] = &[
    "users.html",
    "courses.html",
    "accounts.html",
    "enrollments.html",
    "assignments.html",
    "submissions.html",
    "files.html",
    "groups.html",
    "discussion_topics.html",
    "modules.html",
    "pages.html",
    "quizzes.html",
];

/// Curated wider set, with display labels.
const EXTENDED_PAGES: &[(&str, &str)] = &[
    ("users.html", "Users"),
    ("courses.html", "Courses"),
    ("accounts.html", "Accounts"),
    ("enrollments.html", "Enrollments"),
    ("assignments.html", "Assignments"),
    ("submissions.html", "Submissions"),
    ("files.html", "Files"),
    ("groups.html", "Groups"),
    ("discussion_topics.html", "Discussion Topics"),
    ("pages.html", "Pages"),
    ("modules.html", "Modules"),
    ("quizzes.html", "Quizzes"),
    ("sections.html", "Sections"),
    ("announcements.html", "Announcements"),
    ("calendar_events.html", "Calendar Events"),
    ("content_migrations.html", "Content Migrations"),
    ("external_tools.html", "External Tools"),
    ("grading_standards.html", "Grading Standards"),
    ("rubrics.html", "Rubrics"),
    ("authentication_providers.html", "Authentication Providers"),
    ("sis_imports.html", "SIS Imports"),
    ("tabs.html", "Tabs"),
    ("outcome_groups.html", "Outcome Groups"),
    ("outcomes.html", "Outcomes"),
    ("bookmarks.html", "Bookmarks"),
    ("api_token_scopes.html", "API Token Scopes"),
    ("conversations.html", "Conversations"),
    ("collaborations.html", "Collaborations"),
    ("gradebook_history.html", "Gradebook History"),
    ("favorites.html", "Favorites"),
    ("feature_flags.html", "Feature Flags"),
    ("services.html", "Services"),
];

/// A documentation page and the resource label its endpoints are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub label: String,
    /// Page path relative to the base URL.
    pub page: String,
}

impl ResourceLink {
    /// Label derived from the page name: `"users.html"` → `"Users"`.
    pub fn from_page(page: &str) -> Self {
        Self {
            label: label_for_page(page),
            page: page.to_string(),
        }
    }

    pub fn named(page: &str, label: &str) -> Self {
        Self {
            label: label.to_string(),
            page: page.to_string(),
        }
    }
}

/// Strip `.html` and upper-case the first character, lower-casing the rest.
pub fn label_for_page(page: &str) -> String {
    let stem = page.replace(".html", "");
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn default_resources() -> Vec<ResourceLink> {
    DEFAULT_PAGES.iter().map(|p| ResourceLink::from_page(p)).collect()
}

pub fn extended_resources() -> Vec<ResourceLink> {
    EXTENDED_PAGES
        .iter()
        .map(|(page, label)| ResourceLink::named(page, label))
        .collect()
}

/// Settings for one crawl run. Every field has a default, so a JSON config
/// file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub base_url: String,
    pub resources: Vec<ResourceLink>,
    /// Shared by every request so the host sees one browsing session.
    pub session_id: String,
    /// Pause between successive page fetches, in milliseconds.
    pub pause_ms: u64,
    pub output_dir: PathBuf,
    /// File name stem for the `.csv` and `.json` outputs.
    pub output_stem: String,
    /// Resources (matched case-insensitively by label) whose raw HTML is
    /// saved next to the outputs for inspection.
    pub debug_dump: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resources: default_resources(),
            session_id: "canvas_api_crawl_session".to_string(),
            pause_ms: 1000,
            output_dir: PathBuf::from("results"),
            output_stem: "canvas_api_endpoints".to_string(),
            debug_dump: vec!["users".into(), "courses".into(), "accounts".into()],
        }
    }
}

impl CrawlConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CrawlConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url().map(|_| ())
    }

    fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Absolute URL of a resource page.
    pub fn resource_url(&self, link: &ResourceLink) -> Result<String, ConfigError> {
        let base = self.parsed_base_url()?;
        base.join(&link.page)
            .map(String::from)
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, link.page),
                reason: e.to_string(),
            })
    }

    pub fn should_dump(&self, link: &ResourceLink) -> bool {
        self.debug_dump
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&link.label))
    }
}
