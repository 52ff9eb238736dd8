// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Artifact coordinates.
//!
//! A coordinate is a fixed, fully-qualified `namespace:package:version`
//! triple. There is no version resolution or dependency graph here; a
//! coordinate names exactly one jar and the paths it lives at, locally
//! and remotely.

use std::fmt;
use std::path::PathBuf;

use crate::config::ConfigError;

/// A fully-qualified artifact coordinate.
///
/// Identity is value-based: two coordinates with equal fields name the
/// same artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    /// Dotted namespace, e.g. `org.example`
    pub namespace: String,
    /// Package name, e.g. `foo`
    pub package: String,
    /// Version string, e.g. `1.0`
    pub version: String,
}

impl ArtifactCoordinate {
    pub fn new(
        namespace: impl Into<String>,
        package: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            package: package.into(),
            version: version.into(),
        }
    }

    /// Parse a `namespace:package:version` triple.
    ///
    /// Anything other than exactly three non-empty fields is a
    /// configuration error naming the offending entry.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::InvalidDependency(spec.to_string()));
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// Display name: `package-version`.
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.package, self.version)
    }

    /// Jar file name: `package-version.jar`.
    pub fn file_name(&self) -> String {
        format!("{}.jar", self.display_name())
    }

    /// Cache-relative path of the jar:
    /// `<namespace-as-dirs>/<package>/<package>-<version>.jar`.
    pub fn cache_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for part in self.namespace.split('.') {
            path.push(part);
        }
        path.push(&self.package);
        path.push(self.file_name());
        path
    }

    /// Repository-relative path of the jar:
    /// `<namespace-as-dirs>/<package>/<version>/<package>-<version>.jar`.
    ///
    /// Always slash-separated regardless of platform, since it becomes
    /// part of a URL.
    pub fn remote_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.namespace.replace('.', "/"),
            self.package,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.package, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_coordinate() {
        let coord = ArtifactCoordinate::parse("org.example:foo:1.0").unwrap();
        assert_eq!(coord.namespace, "org.example");
        assert_eq!(coord.package, "foo");
        assert_eq!(coord.version, "1.0");
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(ArtifactCoordinate::parse("org.example:foo").is_err());
        assert!(ArtifactCoordinate::parse("org.example:foo:1.0:extra").is_err());
        assert!(ArtifactCoordinate::parse("").is_err());
        assert!(ArtifactCoordinate::parse("a::c").is_err());
    }

    #[test]
    fn test_display_name_and_file_name() {
        let coord = ArtifactCoordinate::parse("org.example:foo:1.0").unwrap();
        assert_eq!(coord.display_name(), "foo-1.0");
        assert_eq!(coord.file_name(), "foo-1.0.jar");
    }

    #[test]
    fn test_cache_path_expands_namespace() {
        let coord = ArtifactCoordinate::parse("org.example:foo:1.0").unwrap();
        let expected: PathBuf = ["org", "example", "foo", "foo-1.0.jar"].iter().collect();
        assert_eq!(coord.cache_path(), expected);
    }

    #[test]
    fn test_remote_path_includes_version_dir() {
        let coord = ArtifactCoordinate::parse("org.example:foo:1.0").unwrap();
        assert_eq!(coord.remote_path(), "org/example/foo/1.0/foo-1.0.jar");
    }

    #[test]
    fn test_distinct_coordinates_have_distinct_paths() {
        let a = ArtifactCoordinate::parse("org.example:foo:1.0").unwrap();
        let b = ArtifactCoordinate::parse("org.example:foo:1.1").unwrap();
        let c = ArtifactCoordinate::parse("org.other:foo:1.0").unwrap();
        assert_ne!(a.cache_path(), b.cache_path());
        assert_ne!(a.cache_path(), c.cache_path());
        assert_ne!(b.remote_path(), c.remote_path());
    }

    #[test]
    fn test_value_identity() {
        let a = ArtifactCoordinate::parse("org.example:foo:1.0").unwrap();
        let b = ArtifactCoordinate::new("org.example", "foo", "1.0");
        assert_eq!(a, b);
    }
}
