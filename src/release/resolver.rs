//! Resolution of human-readable versions to release ids.
//!
//! The listing endpoint identifies releases by a numeric id, while users
//! hold a build number (or a short-version + build-number pair, the
//! `"1.2 (567)"` shown in the release list). The resolver bridges the two.

use log::info;

use crate::error::{Error, Result};

use super::ReleaseSummary;

/// Release resolver - pure functions over a release listing.
///
/// All methods are stateless; the slice is expected in the API's own
/// order, newest release first.
pub struct ReleaseResolver;

impl ReleaseResolver {
    /// Resolve a build number to a release id.
    ///
    /// Matching is case-insensitive. When several releases carry the same
    /// build number, all matching ids are reported via an informational
    /// log message and the newest match is returned.
    pub fn by_build_number(releases: &[ReleaseSummary], build_number: &str) -> Result<u64> {
        let matches = Self::collect(releases, |r| {
            r.version.eq_ignore_ascii_case(build_number)
        });
        Self::pick(matches, || {
            format!("no release found with the build number {build_number}")
        })
    }

    /// Resolve a short-version + build-number pair to a release id.
    ///
    /// Both fields must match, case-insensitively. Ambiguity is handled as
    /// in [`Self::by_build_number`].
    pub fn by_version(
        releases: &[ReleaseSummary],
        short_version: &str,
        build_number: &str,
    ) -> Result<u64> {
        let matches = Self::collect(releases, |r| {
            r.short_version.eq_ignore_ascii_case(short_version)
                && r.version.eq_ignore_ascii_case(build_number)
        });
        Self::pick(matches, || {
            format!(
                "no release found with the short version {short_version} \
                 and build number {build_number}"
            )
        })
    }

    /// Ids of all releases satisfying the predicate, in listing order.
    fn collect<P>(releases: &[ReleaseSummary], matches: P) -> Vec<u64>
    where
        P: Fn(&ReleaseSummary) -> bool,
    {
        releases.iter().filter(|r| matches(r)).map(|r| r.id).collect()
    }

    /// Zero matches is an error; several are reported and the first
    /// (newest, per listing order) wins.
    fn pick<F>(matches: Vec<u64>, not_found: F) -> Result<u64>
    where
        F: FnOnce() -> String,
    {
        match matches.as_slice() {
            [] => Err(Error::NotFound(not_found())),
            [id] => Ok(*id),
            [id, ..] => {
                info!("{}", Self::ambiguity_note(&matches));
                Ok(*id)
            }
        }
    }

    /// The informational message emitted when a version query matches more
    /// than one release. Lists every matching id.
    fn ambiguity_note(ids: &[u64]) -> String {
        let listed = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} releases ({}) match the requested version, returning the latest ({})",
            ids.len(),
            listed,
            ids[0]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summary(id: u64, short_version: &str, version: &str) -> ReleaseSummary {
        ReleaseSummary {
            id,
            version: version.to_string(),
            short_version: short_version.to_string(),
            uploaded_at: None,
            enabled: None,
        }
    }

    #[test]
    fn test_single_match_returns_its_id() {
        let releases = vec![
            make_summary(30, "1.2", "567"),
            make_summary(20, "1.1", "512"),
            make_summary(10, "1.0", "480"),
        ];
        assert_eq!(
            ReleaseResolver::by_build_number(&releases, "512").unwrap(),
            20
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let releases = vec![make_summary(7, "1.0-RC1", "45B")];
        assert_eq!(ReleaseResolver::by_build_number(&releases, "45b").unwrap(), 7);
        assert_eq!(
            ReleaseResolver::by_version(&releases, "1.0-rc1", "45B").unwrap(),
            7
        );
    }

    #[test]
    fn test_first_listed_release_is_searched_too() {
        // The newest release sits at index 0; a query for it must succeed.
        let releases = vec![
            make_summary(30, "1.2", "567"),
            make_summary(20, "1.1", "512"),
        ];
        assert_eq!(
            ReleaseResolver::by_build_number(&releases, "567").unwrap(),
            30
        );
    }

    #[test]
    fn test_no_match_is_not_found() {
        let releases = vec![make_summary(30, "1.2", "567")];
        let err = ReleaseResolver::by_build_number(&releases, "999").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("999"));
    }

    #[test]
    fn test_empty_list_is_not_found() {
        let err = ReleaseResolver::by_build_number(&[], "1").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_ambiguous_match_returns_newest() {
        // Three releases re-using build number 100; the listing is
        // newest-first, so id 33 wins.
        let releases = vec![
            make_summary(33, "2.0", "100"),
            make_summary(22, "2.0", "100"),
            make_summary(11, "1.9", "100"),
        ];
        assert_eq!(
            ReleaseResolver::by_build_number(&releases, "100").unwrap(),
            33
        );
    }

    #[test]
    fn test_pair_match_requires_both_fields() {
        let releases = vec![
            make_summary(33, "2.0", "100"),
            make_summary(22, "1.9", "100"),
        ];
        assert_eq!(
            ReleaseResolver::by_version(&releases, "1.9", "100").unwrap(),
            22
        );
        assert!(matches!(
            ReleaseResolver::by_version(&releases, "1.8", "100"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_ambiguity_note_lists_every_id() {
        let note = ReleaseResolver::ambiguity_note(&[33, 22, 11]);
        assert!(note.starts_with("3 releases"));
        assert!(note.contains("33, 22, 11"));
        assert!(note.ends_with("returning the latest (33)"));
    }
}
