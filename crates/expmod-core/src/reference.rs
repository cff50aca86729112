//! Repository references on the hosting platform.
//!
//! A module path such as `github.com/go-redis/redis/v8` names its
//! repository directly: the second segment is the owner, the third the
//! repository name. Anything after that (major version suffixes, package
//! sub-directories) is ignored.

use std::fmt;

use url::Url;

/// The hosting platform every reference points into.
pub const HOSTING_PLATFORM: &str = "github.com";

/// An `(owner, name)` pair identifying a repository on [`HOSTING_PLATFORM`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryRef {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Create a reference from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepositoryRef {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Both parts are present.
    pub fn is_valid(&self) -> bool {
        !self.owner.is_empty() && !self.name.is_empty()
    }

    /// The description cache key, `owner/name`.
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Build a reference from a repository URL such as
    /// `https://github.com/uber-go/zap`.
    ///
    /// Returns `None` for URLs on other hosts or without owner and name.
    /// A trailing `.git` is dropped from the name.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url.trim()).ok()?;
        if !matches!(url.scheme(), "https" | "http") || url.host_str() != Some(HOSTING_PLATFORM) {
            return None;
        }
        let mut segments = url.path_segments()?;
        let owner = segments.next()?;
        let name = segments.next()?.trim_end_matches(".git");
        let reference = RepositoryRef::new(owner, name);
        reference.is_valid().then_some(reference)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HOSTING_PLATFORM}/{}/{}", self.owner, self.name)
    }
}

/// Extract the repository reference from a module path.
///
/// `"github.com/go-redis/redis/v8 v8.11.5"` yields `go-redis`, `redis`.
/// Paths with fewer than three segments yield an empty reference, which
/// callers treat as "not resolvable by parsing".
pub fn parse_reference(path: &str) -> RepositoryRef {
    let fields: Vec<&str> = path.split('/').collect();
    if fields.len() < 3 {
        return RepositoryRef::new("", "");
    }
    let name = fields[2].split(' ').next().unwrap_or_default();
    RepositoryRef::new(fields[1], name)
}

/// The path is hosted directly on [`HOSTING_PLATFORM`].
pub fn is_platform_native(path: &str) -> bool {
    path.split('/').next() == Some(HOSTING_PLATFORM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_path() {
        let r = parse_reference("github.com/sahilm/fuzzy v0.1.0");
        assert_eq!(r, RepositoryRef::new("sahilm", "fuzzy"));
    }

    #[test]
    fn parse_major_version_suffix() {
        let r = parse_reference("github.com/cenkalti/backoff/v4 v4.1.2");
        assert_eq!(r.owner, "cenkalti");
        assert_eq!(r.name, "backoff");
    }

    #[test]
    fn short_path_is_empty() {
        let r = parse_reference("Go forward");
        assert!(!r.is_valid());
        assert_eq!(r.owner, "");
        assert_eq!(r.name, "");

        assert!(!parse_reference("github.com/only-owner").is_valid());
    }

    #[test]
    fn cache_key_and_display() {
        let r = RepositoryRef::new("pkg", "errors");
        assert_eq!(r.cache_key(), "pkg/errors");
        assert_eq!(r.to_string(), "github.com/pkg/errors");
    }

    #[test]
    fn from_repository_url() {
        assert_eq!(
            RepositoryRef::from_url("https://github.com/uber-go/zap"),
            Some(RepositoryRef::new("uber-go", "zap"))
        );
        assert_eq!(RepositoryRef::from_url("https://gitlab.com/a/b"), None);
        assert_eq!(RepositoryRef::from_url("https://github.com/a"), None);
        assert_eq!(RepositoryRef::from_url("https://github.com/a/"), None);
    }

    #[test]
    fn from_repository_url_requires_exact_host() {
        assert_eq!(RepositoryRef::from_url("https://github.community/evil/repo"), None);
        assert_eq!(RepositoryRef::from_url("https://github.com.evil.org/evil/repo"), None);
        assert_eq!(RepositoryRef::from_url("https://evil.org/github.com/a/b"), None);
        assert_eq!(RepositoryRef::from_url("github.com/a/b"), None);
    }

    #[test]
    fn from_repository_url_drops_git_suffix() {
        assert_eq!(
            RepositoryRef::from_url("https://github.com/ex/m.git"),
            Some(RepositoryRef::new("ex", "m"))
        );
        assert_eq!(
            RepositoryRef::from_url("https://github.com/uber-go/zap/tree/master/zapcore"),
            Some(RepositoryRef::new("uber-go", "zap"))
        );
    }

    #[test]
    fn platform_native_paths() {
        assert!(is_platform_native("github.com/pkg/errors"));
        assert!(!is_platform_native("gopkg.in/yaml.v3"));
        assert!(!is_platform_native("github.community/x/y"));
    }
}
