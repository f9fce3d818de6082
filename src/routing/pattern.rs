//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a pattern string into segments at prepare time
//! - Match a request path, binding named captures
//! - Reject malformed patterns before they reach the route table
//!
//! # Design Decisions
//! - Patterns are compiled once; matching allocates only for captures
//! - `:name` binds a single segment, `*name` binds the remaining path
//! - No regex in the hot path (segment comparison only)

use std::collections::HashMap;

use super::RouteDefinitionError;

/// One compiled segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must equal the request segment exactly (case-sensitive).
    Literal(String),
    /// Binds the request segment under the given name.
    Capture(String),
}

/// A compiled path pattern.
///
/// Built from strings like `/users/:id/posts/*rest`. Literal segments
/// match exactly, `:name` segments bind one path segment, and a trailing
/// `*name` binds whatever remains (possibly nothing).
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    wildcard: Option<String>,
}

impl PathPattern {
    /// Compile a pattern string, validating its shape.
    pub fn compile(pattern: &str) -> Result<Self, RouteDefinitionError> {
        if !pattern.starts_with('/') {
            return Err(RouteDefinitionError::MissingLeadingSlash(
                pattern.to_string(),
            ));
        }

        let mut segments = Vec::new();
        let mut wildcard = None;
        let mut seen = Vec::new();

        let parts: Vec<&str> = pattern
            .split('/')
            .filter(|part| !part.is_empty())
            .collect();

        for (i, part) in parts.iter().enumerate() {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(RouteDefinitionError::EmptyCapture(pattern.to_string()));
                }
                if seen.contains(&name) {
                    return Err(RouteDefinitionError::DuplicateCapture {
                        name: name.to_string(),
                        pattern: pattern.to_string(),
                    });
                }
                seen.push(name);
                segments.push(Segment::Capture(name.to_string()));
            } else if let Some(name) = part.strip_prefix('*') {
                if name.is_empty() {
                    return Err(RouteDefinitionError::EmptyCapture(pattern.to_string()));
                }
                if i != parts.len() - 1 {
                    // Anything after a wildcard could never be reached.
                    return Err(RouteDefinitionError::WildcardNotLast(pattern.to_string()));
                }
                if seen.contains(&name) {
                    return Err(RouteDefinitionError::DuplicateCapture {
                        name: name.to_string(),
                        pattern: pattern.to_string(),
                    });
                }
                seen.push(name);
                wildcard = Some(name.to_string());
            } else {
                segments.push(Segment::Literal((*part).to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
            wildcard,
        })
    }

    /// The pattern as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning bound captures on success.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();

        match &self.wildcard {
            None => {
                if parts.len() != self.segments.len() {
                    return None;
                }
            }
            Some(_) => {
                if parts.len() < self.segments.len() {
                    return None;
                }
            }
        }

        let mut captures = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts.iter()) {
            match segment {
                Segment::Literal(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    captures.insert(name.clone(), (*part).to_string());
                }
            }
        }

        if let Some(name) = &self.wildcard {
            let rest = parts[self.segments.len()..].join("/");
            captures.insert(name.clone(), rest);
        }

        Some(captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exact_path() {
        let pattern = PathPattern::compile("/old/location").unwrap();
        assert!(pattern.matches("/old/location").is_some());
        assert!(pattern.matches("/old/location/").is_some());
        assert!(pattern.matches("/old").is_none());
        assert!(pattern.matches("/old/location/extra").is_none());
    }

    #[test]
    fn root_pattern_matches_root_only() {
        let pattern = PathPattern::compile("/").unwrap();
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/anything").is_none());
    }

    #[test]
    fn capture_binds_segment() {
        let pattern = PathPattern::compile("/users/:id").unwrap();
        let captures = pattern.matches("/users/42").unwrap();
        assert_eq!(captures.get("id").map(String::as_str), Some("42"));
        assert!(pattern.matches("/users").is_none());
    }

    #[test]
    fn wildcard_binds_remaining_path() {
        let pattern = PathPattern::compile("/files/*rest").unwrap();
        let captures = pattern.matches("/files/a/b/c").unwrap();
        assert_eq!(captures.get("rest").map(String::as_str), Some("a/b/c"));

        let captures = pattern.matches("/files").unwrap();
        assert_eq!(captures.get("rest").map(String::as_str), Some(""));
    }

    #[test]
    fn captures_compose_with_literals() {
        let pattern = PathPattern::compile("/:handler/:action").unwrap();
        let captures = pattern.matches("/pages/show").unwrap();
        assert_eq!(captures.get("handler").map(String::as_str), Some("pages"));
        assert_eq!(captures.get("action").map(String::as_str), Some("show"));
    }

    #[test]
    fn malformed_patterns_rejected() {
        assert!(matches!(
            PathPattern::compile("no-slash"),
            Err(RouteDefinitionError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathPattern::compile("/users/:"),
            Err(RouteDefinitionError::EmptyCapture(_))
        ));
        assert!(matches!(
            PathPattern::compile("/files/*rest/more"),
            Err(RouteDefinitionError::WildcardNotLast(_))
        ));
        assert!(matches!(
            PathPattern::compile("/:id/:id"),
            Err(RouteDefinitionError::DuplicateCapture { .. })
        ));
    }
}
