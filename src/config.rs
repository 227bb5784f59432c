// src/config.rs
use crate::cache::FileStore;
use crate::constants::{
    ARTICLE_CACHE_TTL_SECS, DEFAULT_PAGE_SIZE, DEFAULT_SITE_URL, RELATED_ARTICLES_LIMIT,
    REQUEST_TIMEOUT, RESPONSE_CACHE_TTL_SECS, SEARCH_PAGE_SIZE,
};
use crate::error::AppError;
use crate::formatting::{PhraseRule, Sanitizer};
use crate::types::{ArticleId, MediaId, TermId, ValidationError};
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Environment variable naming the site when `--base-url` is absent.
pub const BASE_URL_ENV: &str = "CMS_BASE_URL";

/// Largest related-article count the CMS will serve in one page.
const MAX_RELATED_LIMIT: u32 = 100;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Site root of the CMS (falls back to $CMS_BASE_URL, then https://mukaan.de)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Seconds an opened article is served from the local cache
    #[arg(long, global = true, default_value_t = ARTICLE_CACHE_TTL_SECS)]
    pub article_ttl: u64,

    /// Seconds list, search and taxonomy responses are reused
    #[arg(long, global = true, default_value_t = RESPONSE_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Disable on-disk caching (always fetch fresh data)
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    /// Directory for cached entries (defaults to $XDG_CACHE_HOME/cms-reader)
    #[arg(long, global = true)]
    pub cache_dir: Option<String>,

    /// How many related articles accompany an opened article
    #[arg(long, global = true, default_value_t = RELATED_ARTICLES_LIMIT)]
    pub related_limit: u32,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT.as_secs() as u32)]
    pub timeout: u32,

    /// Additional phrase to strip from article bodies (repeatable)
    #[arg(long = "strip-phrase", global = true)]
    pub strip_phrases: Vec<String>,

    /// Additional bracketed marker to strip from article bodies (repeatable)
    #[arg(long = "strip-marker", global = true)]
    pub strip_markers: Vec<String>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Latest articles, optionally within one category
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: u32,
        /// Category id
        #[arg(long)]
        category: Option<TermId>,
    },
    /// Full-text search, most relevant first
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = SEARCH_PAGE_SIZE)]
        per_page: u32,
    },
    /// Open one article (id or permalink)
    Show {
        article: ArticleId,
        /// Serve a stale cached copy at once and refresh it in the background
        #[arg(long, default_value_t = false)]
        revalidate: bool,
    },
    /// Articles sharing a category with the given one
    Related { article: ArticleId },
    /// All categories, most used first
    Categories,
    /// All tags, most used first
    Tags,
    /// All authors, most recently registered first
    Authors,
    /// One media library item
    Media { id: MediaId },
    /// What the site says about itself
    Site,
    /// Rows of the table embedded in an article
    Table { article: ArticleId },
}

/// Resolved client configuration, validated and ready to build the reader.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Always ends with `/`.
    pub site_url: Url,
    pub article_ttl: Duration,
    pub response_ttl: Duration,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
    pub related_limit: u32,
    pub request_timeout: Duration,
    /// Applied after the default sanitizer rules.
    pub extra_rules: Vec<PhraseRule>,
}

impl ClientConfig {
    /// Resolves the configuration from CLI input and environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with_env(cli, std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_with_env(
        cli: &CommandLineInput,
        env_base_url: Option<String>,
    ) -> Result<Self, AppError> {
        let raw_url = cli
            .base_url
            .clone()
            .or(env_base_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let site_url = parse_site_url(&raw_url)?;

        if cli.timeout == 0 {
            return Err(ValidationError::OutOfBounds {
                value: 0,
                min: 1,
                max: u32::MAX,
            }
            .into());
        }
        if cli.related_limit > MAX_RELATED_LIMIT {
            return Err(ValidationError::OutOfBounds {
                value: cli.related_limit,
                min: 0,
                max: MAX_RELATED_LIMIT,
            }
            .into());
        }

        let extra_rules = cli
            .strip_phrases
            .iter()
            .map(|phrase| PhraseRule::Phrase(phrase.clone()))
            .chain(
                cli.strip_markers
                    .iter()
                    .map(|marker| PhraseRule::Marker(marker.clone())),
            )
            .collect();

        Ok(ClientConfig {
            site_url,
            article_ttl: Duration::from_secs(cli.article_ttl),
            response_ttl: Duration::from_secs(cli.cache_ttl),
            use_cache: !cli.no_cache,
            cache_dir: resolve_cache_dir(
                cli.cache_dir.as_deref(),
                FileStore::default_dir(),
                !cli.no_cache,
            )?,
            related_limit: cli.related_limit,
            request_timeout: Duration::from_secs(u64::from(cli.timeout)),
            extra_rules,
        })
    }

    /// The default sanitizer rules followed by the configured extras.
    pub fn sanitizer(&self) -> Result<Sanitizer, AppError> {
        Ok(Sanitizer::with_extra_rules(self.extra_rules.clone())?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE.clone(),
            article_ttl: Duration::from_secs(ARTICLE_CACHE_TTL_SECS),
            response_ttl: Duration::from_secs(RESPONSE_CACHE_TTL_SECS),
            use_cache: true,
            cache_dir: FileStore::default_dir()
                .unwrap_or_else(|| std::env::temp_dir().join(env!("CARGO_PKG_NAME"))),
            related_limit: RELATED_ARTICLES_LIMIT,
            request_timeout: REQUEST_TIMEOUT,
            extra_rules: Vec::new(),
        }
    }
}

static DEFAULT_SITE: Lazy<Url> = Lazy::new(|| {
    parse_site_url(DEFAULT_SITE_URL).expect("Failed to parse DEFAULT_SITE_URL - this is a bug")
});

/// An explicit directory wins; otherwise the platform default. With caching
/// enabled there has to be one.
fn resolve_cache_dir(
    explicit: Option<&str>,
    platform_default: Option<PathBuf>,
    use_cache: bool,
) -> Result<PathBuf, AppError> {
    match explicit.map(str::trim).filter(|dir| !dir.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => match platform_default {
            Some(dir) => Ok(dir),
            None if use_cache => Err(AppError::MissingConfiguration(
                "no cache directory: pass --cache-dir or set XDG_CACHE_HOME or HOME".to_string(),
            )),
            None => Ok(PathBuf::new()),
        },
    }
}

/// Accepts an http(s) site root, with or without trailing slash.
fn parse_site_url(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
