//! Tag resolution: raw tag names to one chosen tag per major version.

use std::sync::LazyLock;

use regex::Regex;

/// Bare semantic version segment (`MAJOR.MINOR.PATCH`).
const SEMVER_SEGMENT: &str = r"(\d+)(\.\d+){2}";

/// Matches a semantic version anywhere in a tag; capture 1 is MAJOR.
static SEMVER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEMVER_SEGMENT).expect("valid semver pattern"));

/// Matches plain version tags (`v1.2.3`).
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^v{SEMVER_SEGMENT}$")).expect("valid tag pattern"));

/// One resolved version: the chosen tag for a major version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionEntry {
    /// Major version number as a string (the grouping key).
    pub key: String,
    /// The tag chosen for this major version.
    pub tag: String,
    /// The full semantic version segment matched in the tag
    /// (e.g., "1.5.0").
    pub semver: String,
}

/// Resolved versions in descending key order; the first is current.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedVersions {
    entries: Vec<VersionEntry>,
}

impl ResolvedVersions {
    /// Entries in descending key order.
    #[must_use]
    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    /// Key of the current (latest major) version, if any.
    #[must_use]
    pub fn current_key(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.key.as_str())
    }

    /// True if no tag resolved to a version.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve version tags for the repository `repo` (the name part of
/// `owner/repo`).
///
/// Accepts tags matching `v{MAJOR}.{MINOR}.{PATCH}` or the
/// package-scoped `{repo}@{MAJOR}.{MINOR}.{PATCH}` variant. `tags` must
/// already be in descending version order (as `--sort=-v:refname`
/// reports them); for each major version the first tag encountered
/// wins, and no semantic re-sorting is attempted beyond that supplied
/// order. Keys are then ordered by descending string comparison and the
/// first key is current.
///
/// # Errors
///
/// Returns an error if the package-scoped pattern cannot be built for
/// `repo`.
pub fn resolve_versions(tags: &[String], repo: &str) -> Result<ResolvedVersions, regex::Error> {
    // Package-scoped tags as produced by lerna-style release tooling.
    let package_pattern = Regex::new(&format!("^{}@{SEMVER_SEGMENT}$", regex::escape(repo)))?;

    let mut entries: Vec<VersionEntry> = Vec::new();
    for tag in tags {
        if !TAG_PATTERN.is_match(tag) && !package_pattern.is_match(tag) {
            continue;
        }
        let Some(captures) = SEMVER_PATTERN.captures(tag) else {
            continue;
        };
        let semver = captures
            .get(0)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default();
        let key = captures
            .get(1)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default();

        // First tag wins per major: the supplied order is descending,
        // so later tags with the same key are older.
        if entries.iter().any(|entry| entry.key == key) {
            continue;
        }
        entries.push(VersionEntry {
            key,
            tag: tag.clone(),
            semver,
        });
    }

    entries.sort_by(|a, b| b.key.cmp(&a.key));
    Ok(ResolvedVersions { entries })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_accepts_only_version_shaped_tags() {
        let resolved = resolve_versions(
            &tags(&[
                "v2.0.0",
                "v2.0",
                "release-candidate",
                "docs@1.4.2",
                "other@1.0.0",
                "v1.0.0-beta.1",
            ]),
            "docs",
        )
        .unwrap();

        let kept: Vec<&str> = resolved
            .entries()
            .iter()
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(kept, vec!["v2.0.0", "docs@1.4.2"]);
    }

    #[test]
    fn test_first_tag_wins_per_major() {
        let resolved =
            resolve_versions(&tags(&["v1.5.0", "v1.4.0", "v1.0.0"]), "docs").unwrap();

        assert_eq!(resolved.entries().len(), 1);
        assert_eq!(resolved.entries()[0].tag, "v1.5.0");
        assert_eq!(resolved.entries()[0].semver, "1.5.0");
    }

    #[test]
    fn test_selection_is_idempotent() {
        let input = tags(&["v2.0.0", "v1.5.0", "v1.0.0"]);
        let first = resolve_versions(&input, "docs").unwrap();
        let second = resolve_versions(&input, "docs").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_descending_and_first_is_current() {
        let resolved =
            resolve_versions(&tags(&["v2.0.0", "v1.5.0", "v1.0.0"]), "docs").unwrap();

        let keys: Vec<&str> = resolved.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["2", "1"]);
        assert_eq!(resolved.current_key(), Some("2"));
    }

    #[test]
    fn test_supplied_order_is_trusted_within_a_major() {
        // If the provided sort put an older tag first, it still wins:
        // the resolver does not verify minor/patch monotonicity.
        let resolved =
            resolve_versions(&tags(&["v1.4.0", "v1.5.0"]), "docs").unwrap();

        assert_eq!(resolved.entries()[0].tag, "v1.4.0");
    }

    #[test]
    fn test_package_scoped_repo_name_is_escaped() {
        let resolved =
            resolve_versions(&tags(&["my.repo@1.0.0", "myxrepo@2.0.0"]), "my.repo").unwrap();

        assert_eq!(resolved.entries().len(), 1);
        assert_eq!(resolved.entries()[0].tag, "my.repo@1.0.0");
    }

    #[test]
    fn test_empty_input_resolves_to_nothing() {
        let resolved = resolve_versions(&[], "docs").unwrap();

        assert!(resolved.is_empty());
        assert_eq!(resolved.current_key(), None);
    }
}
