//! Ignore-pattern matching.
//!
//! Patterns are shell globs evaluated against root-relative paths written
//! with `/` separators. `*` may span directory boundaries (so `*/tests/*`
//! hides every file under any `tests` directory), `?` matches a single
//! character and `[...]` / `[!...]` are character classes.

use glob::{MatchOptions, Pattern};
use std::path::{Component, Path};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Match a single pattern. A pattern that does not compile never matches.
pub fn matches(pattern: &str, relative_path: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches_with(relative_path, MATCH_OPTIONS))
        .unwrap_or(false)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// A compiled ignore set. Invalid patterns are kept aside for reporting.
#[derive(Debug, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
    invalid: Vec<(String, String)>,
}

impl IgnoreSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut set = Self::default();
        for raw in patterns {
            let raw = raw.as_ref();
            match Pattern::new(raw) {
                Ok(p) => set.patterns.push(p),
                Err(e) => set.invalid.push((raw.to_string(), e.msg.to_string())),
            }
        }
        set
    }

    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
    }

    /// `(pattern, reason)` for every pattern that failed to compile.
    pub fn invalid(&self) -> &[(String, String)] {
        &self.invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_star_spans_directories() {
        assert!(matches("*.test.cpp", "src/unit/a.test.cpp"));
        assert!(matches("*/tests/*", "lib/tests/a.cc"));
        assert!(!matches("*/tests/*", "tests/a.cc"));
        assert!(matches("third_party/*", "third_party/x/y.cu"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        assert!(matches("src/?.cc", "src/a.cc"));
        assert!(!matches("src/?.cc", "src/ab.cc"));
        assert!(matches("gen/[ab].cc", "gen/b.cc"));
        assert!(!matches("gen/[!ab].cc", "gen/b.cc"));
        assert!(matches("gen/[!ab].cc", "gen/c.cc"));
    }

    #[test]
    fn test_literal_segments() {
        assert!(matches("src/main.cc", "src/main.cc"));
        assert!(!matches("src/main.cc", "other/src/main.cc"));
        assert!(!matches("src/main.cc", "src/main.ccx"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!matches("*.CU", "k.cu"));
    }

    #[test]
    fn test_malformed_pattern_never_matches() {
        assert!(!matches("src/**x", "src/**x"));
        assert!(!matches("src/**x", "src/ax"));
    }

    #[test]
    fn test_ignore_set_survives_bad_pattern() {
        let set = IgnoreSet::new(&["a**", "build/*"]);
        assert_eq!(set.invalid().len(), 1);
        assert_eq!(set.invalid()[0].0, "a**");
        assert!(set.is_ignored("build/obj.cc"));
        assert!(!set.is_ignored("src/obj.cc"));
    }

    #[test]
    fn test_empty_set_ignores_nothing() {
        let set = IgnoreSet::new::<&str>(&[]);
        assert!(!set.is_ignored("anything.cc"));
    }

    #[test]
    fn test_to_slash() {
        let path: PathBuf = ["src", "kernels", "a.cu"].iter().collect();
        assert_eq!(to_slash(&path), "src/kernels/a.cu");
    }
}
