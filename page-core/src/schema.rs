//! Page documents - the serialized form exchanged with persistence.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{BuilderError, BuilderResult, ElementId, PageElement};

/// Current document format version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Publication state of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Work in progress.
    #[default]
    Draft,
    /// Publicly visible.
    Published,
    /// Retired.
    Archived,
}

/// Search-engine metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoMeta {
    /// `<title>` override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    /// Meta description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// Meta keywords.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Open Graph image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    /// Canonical URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    /// Ask crawlers not to index the page.
    pub no_index: bool,
}

/// Page-level metadata (everything in a [`PageSchema`] except the elements).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Document format version.
    #[serde(default = "PageInfo::default_version")]
    pub version: String,
    /// Page identifier.
    pub page_id: String,
    /// URL slug.
    pub slug: String,
    /// Page title.
    pub title: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Search-engine metadata.
    #[serde(default)]
    pub seo: SeoMeta,
    /// Creation time (Unix milliseconds).
    #[serde(default)]
    pub created_at: u64,
    /// Last modification time (Unix milliseconds).
    #[serde(default)]
    pub updated_at: u64,
    /// Publication time (Unix milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<u64>,
    /// Publication state.
    #[serde(default)]
    pub status: PageStatus,
}

impl PageInfo {
    fn default_version() -> String {
        SCHEMA_VERSION.to_string()
    }

    /// Change the publication state, stamping `published_at` on first publish.
    pub fn set_status(&mut self, status: PageStatus) {
        if status == PageStatus::Published && self.published_at.is_none() {
            self.published_at = Some(current_timestamp_ms());
        }
        self.status = status;
    }
}

/// A complete page document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSchema {
    /// Page metadata.
    #[serde(flatten)]
    pub info: PageInfo,
    /// Top-level elements in render order.
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

impl PageSchema {
    /// Start a blank draft page.
    pub fn blank(
        page_id: impl Into<String>,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let now = current_timestamp_ms();
        Self {
            info: PageInfo {
                version: SCHEMA_VERSION.to_string(),
                page_id: page_id.into(),
                slug: slug.into(),
                title: title.into(),
                description: None,
                seo: SeoMeta::default(),
                created_at: now,
                updated_at: now,
                published_at: None,
                status: PageStatus::Draft,
            },
            elements: Vec::new(),
        }
    }

    /// Append a top-level element.
    #[must_use]
    pub fn with_element(mut self, element: PageElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Find an element anywhere in the document.
    #[must_use]
    pub fn find(&self, id: &ElementId) -> Option<&PageElement> {
        fn search<'a>(elements: &'a [PageElement], id: &ElementId) -> Option<&'a PageElement> {
            elements.iter().find_map(|element| {
                if element.id == *id {
                    Some(element)
                } else {
                    search(&element.children, id)
                }
            })
        }
        search(&self.elements, id)
    }

    /// Total number of elements at every depth.
    #[must_use]
    pub fn element_count(&self) -> usize {
        let mut count = 0;
        for element in &self.elements {
            element.walk(&mut |_| count += 1);
        }
        count
    }

    /// Check that every element id is unique.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::DuplicateId`] for the first repeated id.
    pub fn validate(&self) -> BuilderResult<()> {
        let mut seen = HashSet::new();
        let mut duplicate = None;
        for element in &self.elements {
            element.walk(&mut |el| {
                if !seen.insert(&el.id) && duplicate.is_none() {
                    duplicate = Some(el.id.clone());
                }
            });
        }
        match duplicate {
            Some(id) => Err(BuilderError::DuplicateId(id)),
            None => Ok(()),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BuilderResult<String> {
        serde_json::to_string_pretty(self).map_err(BuilderError::Serialization)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a page document.
    pub fn from_json(json: &str) -> BuilderResult<Self> {
        serde_json::from_str(json).map_err(BuilderError::Serialization)
    }
}

/// Get the current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
