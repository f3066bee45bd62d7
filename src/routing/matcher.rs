//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse route patterns such as `/cookie_set/:name/:cookie`
//! - Match request paths segment by segment
//! - Bind named segments to their values
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Segment counts must be equal; a missing segment is a non-match
//! - A parameter may bind an empty segment (`/dns/` binds `domains = ""`)
//! - Segments are percent-decoded after splitting, so `%2F` stays inside
//!   its segment
//! - No regex to guarantee O(n) matching

use std::fmt;

use percent_encoding::percent_decode_str;

/// Error produced when a route pattern cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("pattern `{0}` has a parameter without a name")]
    EmptyParamName(String),

    #[error("pattern `{pattern}` binds `{name}` more than once")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern. Segments starting with `:` are named parameters.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;

        let mut segments = Vec::new();
        for part in rest.split('/') {
            match part.strip_prefix(':') {
                Some("") => return Err(PatternError::EmptyParamName(pattern.to_string())),
                Some(name) => {
                    if segments.contains(&Segment::Param(name.to_string())) {
                        return Err(PatternError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Static(part.to_string())),
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as it was registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning the parameter bindings on success.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let rest = path.strip_prefix('/')?;
        let mut parts = rest.split('/');
        let mut params = Params::default();

        for segment in &self.segments {
            let part = percent_decode_str(parts.next()?).decode_utf8_lossy();
            match segment {
                Segment::Static(expected) if *expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => params.push(name.clone(), part.into_owned()),
            }
        }

        // Trailing segments mean the path is longer than the pattern.
        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Ordered path parameter bindings for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    bindings: Vec<(String, String)>,
}

impl Params {
    fn push(&mut self, name: String, value: String) {
        self.bindings.push((name, value));
    }

    /// Value bound to `name`, if the matched pattern declares it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pattern() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.captures("/").is_some());
        assert!(root.captures("/ping").is_none());

        let ping = PathPattern::parse("/ping").unwrap();
        assert!(ping.captures("/ping").is_some());
        assert!(ping.captures("/ping/").is_none());
        assert!(ping.captures("/PING").is_none()); // Case sensitive
        assert!(ping.captures("/").is_none());
    }

    #[test]
    fn test_param_binding() {
        let pattern = PathPattern::parse("/cookie_set/:name/:cookie").unwrap();
        let params = pattern.captures("/cookie_set/foo/bar").unwrap();
        assert_eq!(params.get("name"), Some("foo"));
        assert_eq!(params.get("cookie"), Some("bar"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("name", "foo"), ("cookie", "bar")]
        );
    }

    #[test]
    fn test_param_may_be_empty() {
        let pattern = PathPattern::parse("/cookie_set/:name/:cookie").unwrap();
        let params = pattern.captures("/cookie_set/foo/").unwrap();
        assert_eq!(params.get("cookie"), Some(""));

        let dns = PathPattern::parse("/dns/:domains").unwrap();
        assert_eq!(dns.captures("/dns/").unwrap().get("domains"), Some(""));
    }

    #[test]
    fn test_missing_segment_does_not_match() {
        let pattern = PathPattern::parse("/cookie_set/:name/:cookie").unwrap();
        assert!(pattern.captures("/cookie_set/foo").is_none());
        assert!(pattern.captures("/cookie_set/foo/bar/baz").is_none());

        let dns = PathPattern::parse("/dns/:domains").unwrap();
        assert!(dns.captures("/dns").is_none());
    }

    #[test]
    fn test_segments_are_percent_decoded() {
        let pattern = PathPattern::parse("/cookie_set/:name/:cookie").unwrap();
        let params = pattern.captures("/cookie_set/foo/hello%20world").unwrap();
        assert_eq!(params.get("cookie"), Some("hello world"));

        let dns = PathPattern::parse("/dns/:domains").unwrap();
        let params = dns.captures("/dns/a.com%2Cb.com").unwrap();
        assert_eq!(params.get("domains"), Some("a.com,b.com"));

        // An encoded slash does not split the segment.
        let params = dns.captures("/dns/a%2Fb").unwrap();
        assert_eq!(params.get("domains"), Some("a/b"));

        let ping = PathPattern::parse("/ping").unwrap();
        assert!(ping.captures("/p%69ng").is_some());
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            PathPattern::parse("ping"),
            Err(PatternError::MissingLeadingSlash("ping".into()))
        );
        assert!(matches!(
            PathPattern::parse("/a/:/b"),
            Err(PatternError::EmptyParamName(_))
        ));
        assert!(matches!(
            PathPattern::parse("/:x/:x"),
            Err(PatternError::DuplicateParam { .. })
        ));
    }
}
