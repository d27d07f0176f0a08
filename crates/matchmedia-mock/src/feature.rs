//! Media Feature Domain
//!
//! Names of the environmental dimensions a media query can test. The list
//! covers what the built-in matcher understands; anything else is kept as
//! [`MediaFeature::Other`] so callers can store values the matcher does not
//! know about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A media feature, plus the synthetic `type` feature for the media type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaFeature {
    /// Media type (`screen`, `print`, ...)
    Type,
    /// `any-hover`
    AnyHover,
    /// `any-pointer`
    AnyPointer,
    /// `aspect-ratio`
    AspectRatio,
    /// `color-index`
    ColorIndex,
    /// `color`
    Color,
    /// `device-aspect-ratio` (deprecated)
    DeviceAspectRatio,
    /// `device-height` (deprecated)
    DeviceHeight,
    /// `device-width` (deprecated)
    DeviceWidth,
    /// `display-mode`
    DisplayMode,
    /// `grid`
    Grid,
    /// `height`
    Height,
    /// `hover`
    Hover,
    /// `inverted-colors`
    InvertedColors,
    /// `monochrome`
    Monochrome,
    /// `orientation`
    Orientation,
    /// `pointer`
    Pointer,
    /// `prefers-color-scheme`
    PrefersColorScheme,
    /// `prefers-contrast`
    PrefersContrast,
    /// `prefers-reduced-data`
    PrefersReducedData,
    /// `prefers-reduced-motion`
    PrefersReducedMotion,
    /// `prefers-reduced-transparency`
    PrefersReducedTransparency,
    /// `resolution`
    Resolution,
    /// `scan`
    Scan,
    /// `width`
    Width,
    /// Any feature name the matcher has no dedicated handling for
    Other(String),
}

/// How the matcher compares values of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// CSS `<length>`, compared in px
    Length,
    /// CSS `<resolution>`, compared in dpi
    Resolution,
    /// CSS `<ratio>`, compared as a decimal
    Ratio,
    /// CSS `<integer>`
    Integer,
    /// Keyword compared case-insensitively
    Discrete,
}

impl MediaFeature {
    /// All features with dedicated matcher support
    pub const KNOWN: [Self; 25] = [
        Self::Type,
        Self::AnyHover,
        Self::AnyPointer,
        Self::AspectRatio,
        Self::ColorIndex,
        Self::Color,
        Self::DeviceAspectRatio,
        Self::DeviceHeight,
        Self::DeviceWidth,
        Self::DisplayMode,
        Self::Grid,
        Self::Height,
        Self::Hover,
        Self::InvertedColors,
        Self::Monochrome,
        Self::Orientation,
        Self::Pointer,
        Self::PrefersColorScheme,
        Self::PrefersContrast,
        Self::PrefersReducedData,
        Self::PrefersReducedMotion,
        Self::PrefersReducedTransparency,
        Self::Resolution,
        Self::Scan,
        Self::Width,
    ];

    /// Look up a feature by its CSS name (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "type" => Self::Type,
            "any-hover" => Self::AnyHover,
            "any-pointer" => Self::AnyPointer,
            "aspect-ratio" => Self::AspectRatio,
            "color-index" => Self::ColorIndex,
            "color" => Self::Color,
            "device-aspect-ratio" => Self::DeviceAspectRatio,
            "device-height" => Self::DeviceHeight,
            "device-width" => Self::DeviceWidth,
            "display-mode" => Self::DisplayMode,
            "grid" => Self::Grid,
            "height" => Self::Height,
            "hover" => Self::Hover,
            "inverted-colors" => Self::InvertedColors,
            "monochrome" => Self::Monochrome,
            "orientation" => Self::Orientation,
            "pointer" => Self::Pointer,
            "prefers-color-scheme" => Self::PrefersColorScheme,
            "prefers-contrast" => Self::PrefersContrast,
            "prefers-reduced-data" => Self::PrefersReducedData,
            "prefers-reduced-motion" => Self::PrefersReducedMotion,
            "prefers-reduced-transparency" => Self::PrefersReducedTransparency,
            "resolution" => Self::Resolution,
            "scan" => Self::Scan,
            "width" => Self::Width,
            _ => Self::Other(lower),
        }
    }

    /// CSS name of the feature
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type => "type",
            Self::AnyHover => "any-hover",
            Self::AnyPointer => "any-pointer",
            Self::AspectRatio => "aspect-ratio",
            Self::ColorIndex => "color-index",
            Self::Color => "color",
            Self::DeviceAspectRatio => "device-aspect-ratio",
            Self::DeviceHeight => "device-height",
            Self::DeviceWidth => "device-width",
            Self::DisplayMode => "display-mode",
            Self::Grid => "grid",
            Self::Height => "height",
            Self::Hover => "hover",
            Self::InvertedColors => "inverted-colors",
            Self::Monochrome => "monochrome",
            Self::Orientation => "orientation",
            Self::Pointer => "pointer",
            Self::PrefersColorScheme => "prefers-color-scheme",
            Self::PrefersContrast => "prefers-contrast",
            Self::PrefersReducedData => "prefers-reduced-data",
            Self::PrefersReducedMotion => "prefers-reduced-motion",
            Self::PrefersReducedTransparency => "prefers-reduced-transparency",
            Self::Resolution => "resolution",
            Self::Scan => "scan",
            Self::Width => "width",
            Self::Other(name) => name,
        }
    }

    /// Comparison rules the matcher applies to this feature
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        match self {
            Self::Width | Self::Height | Self::DeviceWidth | Self::DeviceHeight => {
                FeatureKind::Length
            }
            Self::Resolution => FeatureKind::Resolution,
            Self::AspectRatio | Self::DeviceAspectRatio => FeatureKind::Ratio,
            Self::Color | Self::ColorIndex | Self::Monochrome | Self::Grid => FeatureKind::Integer,
            _ => FeatureKind::Discrete,
        }
    }

    /// Whether this feature accepts `min-`/`max-` prefixes
    #[must_use]
    pub const fn is_range(&self) -> bool {
        !matches!(self.kind(), FeatureKind::Discrete)
    }
}

impl fmt::Display for MediaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for MediaFeature {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for MediaFeature {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<MediaFeature> for String {
    fn from(feature: MediaFeature) -> Self {
        feature.name().to_string()
    }
}
