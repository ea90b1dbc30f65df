//! Release payloads and selectors.
//!
//! The API returns releases in two shapes: the full detail object for a
//! single release and the summary objects that make up the listing
//! endpoints. Both are deserialized once into the structs below; no field
//! is looked up dynamically.

mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

pub use resolver::ReleaseResolver;

/// Full release detail, as returned by
/// `/apps/{owner}/{app}/releases/{id}` and `releases/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDetails {
    /// Release identifier, unique within the app.
    pub id: u64,
    /// The app's display name.
    pub app_display_name: String,
    /// Operating system the app targets (e.g. `"Android"`, `"iOS"`).
    pub app_os: String,
    /// Build number.
    pub version: String,
    /// Human-facing version string (e.g. `"1.2"`).
    pub short_version: String,
    /// Binary size in bytes.
    pub size: u64,
    /// Minimum OS version the release supports.
    pub min_os: String,
    /// Bundle identifier / package name.
    pub bundle_identifier: String,
    /// Pre-signed URL of the binary.
    pub download_url: String,
}

impl ReleaseDetails {
    /// The combined version string shown in the release list,
    /// e.g. `"2.3 (45)"`.
    pub fn full_version(&self) -> String {
        format!("{} ({})", self.short_version, self.version)
    }
}

/// One element of the `/releases` and `/recent_releases` arrays.
///
/// The listing endpoints return newest-first; the resolver relies on that
/// ordering when reporting "the latest" of several matches.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSummary {
    /// Release identifier, unique within the app.
    pub id: u64,
    /// Build number.
    pub version: String,
    /// Human-facing version string.
    pub short_version: String,
    /// Upload timestamp (ISO 8601), when the API includes it.
    #[serde(default)]
    pub uploaded_at: Option<String>,
    /// Whether the release is enabled for distribution.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Selects a release by id or as the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseRef {
    /// The app's most recent release.
    Latest,
    /// A specific release id.
    Id(u64),
}

impl fmt::Display for ReleaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseRef::Latest => write!(f, "latest"),
            ReleaseRef::Id(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for ReleaseRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Validation(
                "release id must be \"latest\" or a numeric value".into(),
            ));
        }
        if s.eq_ignore_ascii_case("latest") {
            return Ok(ReleaseRef::Latest);
        }
        s.parse::<u64>().map(ReleaseRef::Id).map_err(|_| {
            Error::Validation(format!(
                "release id must be \"latest\" or a numeric value, got {s:?}"
            ))
        })
    }
}
