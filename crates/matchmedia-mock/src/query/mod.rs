//! Media Query Parsing and Matching
//!
//! The engine never interprets query syntax itself. It goes through the
//! [`MediaMatcher`] capability, which turns a query string into
//! [`MediaQuery`] alternatives and decides whether they match a set of
//! feature values. [`CssMediaMatcher`] is the built-in implementation.
//!
//! ## Example
//!
//! ```rust
//! use matchmedia_mock::{CssMediaMatcher, MediaMatcher, MediaValues};
//!
//! let matcher = CssMediaMatcher;
//! let queries = matcher.parse("screen and (min-width: 800px)").unwrap();
//! let values = MediaValues::new().with("type", "screen").with("width", "1024px");
//! assert!(matcher.matches(&queries, &values));
//! ```

mod evaluate;
mod parser;

use crate::feature::MediaFeature;
use crate::result::MediaResult;
use crate::value::MediaValues;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub use parser::parse_media_query_list;

/// Media type a query applies to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaType {
    /// Matches every environment
    #[default]
    All,
    /// Screens
    Screen,
    /// Paged media
    Print,
    /// Speech synthesizers
    Speech,
    /// Any other (deprecated or unknown) type name
    Other(String),
}

impl MediaType {
    /// Look up a media type by name (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "all" => Self::All,
            "screen" => Self::Screen,
            "print" => Self::Print,
            "speech" => Self::Speech,
            _ => Self::Other(lower),
        }
    }

    /// CSS name of the media type
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Screen => "screen",
            Self::Print => "print",
            Self::Speech => "speech",
            Self::Other(name) => name,
        }
    }

    /// Whether this is the `all` wildcard
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Range prefix of a feature test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Modifier {
    /// Exact comparison, e.g. `(width: 800px)`
    #[default]
    Exact,
    /// Lower bound, e.g. `(min-width: 800px)`
    Min,
    /// Upper bound, e.g. `(max-width: 800px)`
    Max,
}

/// One parenthesized feature test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaExpression {
    /// Range prefix
    pub modifier: Modifier,
    /// Tested feature, with any `min-`/`max-` prefix removed
    pub feature: MediaFeature,
    /// Expected value as written; `None` for boolean tests such as `(hover)`
    pub value: Option<String>,
}

impl MediaExpression {
    /// Create an exact feature test
    #[must_use]
    pub fn new(feature: impl Into<MediaFeature>, value: Option<&str>) -> Self {
        Self {
            modifier: Modifier::Exact,
            feature: feature.into(),
            value: value.map(str::to_string),
        }
    }

    /// Set the range prefix
    #[must_use]
    pub const fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }
}

/// One alternative of a comma separated media query list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaQuery {
    /// Whether the query was prefixed with `not`
    pub inverse: bool,
    /// Declared media type (`all` when omitted)
    pub media_type: MediaType,
    /// Feature tests joined with `and`
    pub expressions: Vec<MediaExpression>,
}

impl MediaQuery {
    /// The `all` query
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }
}

/// Features a parsed query list can depend on.
///
/// Every expression contributes its feature; an alternative declaring a
/// concrete type contributes the synthetic `type` feature as well.
#[must_use]
pub fn dependencies(queries: &[MediaQuery]) -> BTreeSet<MediaFeature> {
    let mut features = BTreeSet::new();
    for query in queries {
        if !query.media_type.is_all() {
            let _ = features.insert(MediaFeature::Type);
        }
        for expression in &query.expressions {
            let _ = features.insert(expression.feature.clone());
        }
    }
    features
}

/// Parse/match capability the media state engine depends on
pub trait MediaMatcher {
    /// Parse a media query list into its alternatives
    fn parse(&self, media: &str) -> MediaResult<Vec<MediaQuery>>;

    /// Whether any alternative matches the given values
    fn matches(&self, queries: &[MediaQuery], values: &MediaValues) -> bool;

    /// Parse and match in one step
    fn evaluate(&self, media: &str, values: &MediaValues) -> MediaResult<bool> {
        let queries = self.parse(media)?;
        Ok(self.matches(&queries, values))
    }
}

/// Built-in matcher for CSS media queries level 3 syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMediaMatcher;

impl MediaMatcher for CssMediaMatcher {
    fn parse(&self, media: &str) -> MediaResult<Vec<MediaQuery>> {
        parse_media_query_list(media)
    }

    fn matches(&self, queries: &[MediaQuery], values: &MediaValues) -> bool {
        queries.iter().any(|query| evaluate::query_matches(query, values))
    }
}
