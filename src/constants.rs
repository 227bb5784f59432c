// src/constants.rs
//! Domain constants that define the operational boundaries of the client.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! them should tell you how the client talks to the CMS, how long it
//! trusts what it got back, and what it shows when the CMS is silent.

use std::time::Duration;

// ---------------------------------------------------------------------------
// CMS API boundaries
// ---------------------------------------------------------------------------

/// Site the binary talks to when neither flag nor environment names one.
pub const DEFAULT_SITE_URL: &str = "https://mukaan.de";

/// REST namespace of the core content endpoints, relative to the site root.
pub const CONTENT_API_PATH: &str = "wp-json/wp/v2";

/// Route of the supplementary table extraction endpoint.
pub const TABLE_API_PATH: &str = "wp-json/mukaan-app/v1/table-data";

/// Route of the site discovery document.
pub const SITE_INFO_PATH: &str = "wp-json";

/// Articles per page for list and category screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Articles per page for search results.
pub const SEARCH_PAGE_SIZE: u32 = 20;

/// Page size for taxonomy and author listings; the CMS maximum.
pub const TAXONOMY_PAGE_SIZE: u32 = 100;

/// How many related articles accompany an opened article.
pub const RELATED_ARTICLES_LIMIT: u32 = 5;

/// Request timeout applied by the HTTP transport.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Staleness windows
// ---------------------------------------------------------------------------

/// How long an opened article is served from the local cache.
pub const ARTICLE_CACHE_TTL_SECS: u64 = 60 * 60;

/// How long raw listing responses (lists, search, taxonomies) are reused.
pub const RESPONSE_CACHE_TTL_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Fallback values
// ---------------------------------------------------------------------------

/// Display name of the sentinel author used when none is embedded.
pub const UNKNOWN_AUTHOR_NAME: &str = "Unknown author";

/// Post format the CMS applies when none is set.
pub const DEFAULT_POST_FORMAT: &str = "standard";

/// Heading level used when a heading widget does not carry one.
pub const DEFAULT_HEADING_LEVEL: u8 = 2;

/// CSS class given to flattened button widgets so renderers can style them.
pub const BUTTON_CLASS: &str = "elementor-button";

// ---------------------------------------------------------------------------
// Page-builder metadata keys
// ---------------------------------------------------------------------------

/// Meta key carrying the JSON-encoded page-builder document.
pub const PAGE_BUILDER_DATA_KEY: &str = "_elementor_data";

/// Meta key carrying the page-builder template id.
pub const PAGE_BUILDER_TEMPLATE_KEY: &str = "_elementor_template_id";

/// Meta key flagging that the page builder owns the article body.
pub const PAGE_BUILDER_EDIT_MODE_KEY: &str = "_elementor_edit_mode";

// ---------------------------------------------------------------------------
// String capacity hints (performance, not correctness)
// ---------------------------------------------------------------------------

/// Estimated characters contributed per page-builder node.
pub const CHARS_PER_NODE_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
