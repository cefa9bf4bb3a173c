//! Route pattern compilation.
//!
//! A pattern is a path with `{name}` placeholders, e.g. `/users/{id}/posts/{post_id}`.
//! Each placeholder matches one or more characters other than `/`; literal text
//! matches exactly and case-sensitively. The whole path must match: there is no
//! prefix matching and no trailing-slash normalization.
use regex::Regex;

use crate::core::{error::PatternError, params::PathParams};

const PLACEHOLDER_CAPTURE: &str = "([^/]+)";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    names: Vec<String>,
    regex: Regex,
}

impl PathPattern {
    /// Parse and compile `pattern`, rejecting malformed input.
    pub fn new(pattern: impl Into<String>) -> Result<Self, PatternError> {
        let pattern = pattern.into();
        let segments = parse(&pattern)?;

        let mut source = String::with_capacity(pattern.len() + 8);
        let mut names = Vec::new();
        source.push('^');
        for segment in segments {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(&text)),
                Segment::Placeholder(name) => {
                    source.push_str(PLACEHOLDER_CAPTURE);
                    names.push(name);
                }
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::Compile {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern,
            names,
            regex,
        })
    }

    /// Match the whole of `path`, returning the placeholder values by name.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let captures = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, capture)| Some((name.as_str(), capture?.as_str())))
                .collect(),
        )
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Placeholder names in order of appearance.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn parse(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    if !pattern.starts_with('/') {
        return Err(PatternError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        });
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                let rest = &pattern[position + 1..];
                let Some(len) = rest.find('}') else {
                    return Err(PatternError::UnclosedPlaceholder {
                        pattern: pattern.to_string(),
                        position,
                    });
                };
                let name = &rest[..len];
                if !is_valid_name(name) {
                    return Err(PatternError::InvalidPlaceholderName {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }

                if literal.is_empty() {
                    if let Some(Segment::Placeholder(previous)) = segments.last() {
                        return Err(PatternError::AdjacentPlaceholders {
                            pattern: pattern.to_string(),
                            first: previous.clone(),
                            second: name.to_string(),
                        });
                    }
                } else {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }

                let duplicate = segments
                    .iter()
                    .any(|segment| matches!(segment, Segment::Placeholder(n) if n == name));
                if duplicate {
                    return Err(PatternError::DuplicatePlaceholder {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                segments.push(Segment::Placeholder(name.to_string()));

                // Skip the name and the closing brace; both are ASCII.
                for _ in 0..=len {
                    chars.next();
                }
            }
            '}' => {
                return Err(PatternError::UnexpectedClosingBrace {
                    pattern: pattern.to_string(),
                    position,
                });
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(p: &str) -> PathPattern {
        PathPattern::new(p).unwrap()
    }

    #[test]
    fn test_static_path() {
        let matcher = pattern("/users");
        assert!(matcher.matches("/users"));
        assert!(!matcher.matches("/users/"));
        assert!(!matcher.matches("/Users"));
        assert!(matcher.match_path("/users").unwrap().is_empty());
    }

    #[test]
    fn test_root_path() {
        let matcher = pattern("/");
        assert!(matcher.matches("/"));
        assert!(!matcher.matches(""));
        assert!(!matcher.matches("/a"));
    }

    #[test]
    fn test_single_placeholder() {
        let matcher = pattern("/users/{id}");
        let params = matcher.match_path("/users/123").unwrap();
        assert_eq!(params.string("id"), Some("123"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_multiple_placeholders() {
        let matcher = pattern("/users/{userId}/posts/{postId}");
        let params = matcher.match_path("/users/7/posts/99").unwrap();
        assert_eq!(params.string("userId"), Some("7"));
        assert_eq!(params.string("postId"), Some("99"));
        assert_eq!(matcher.names(), ["userId", "postId"]);
    }

    #[test]
    fn test_placeholder_inside_segment() {
        let matcher = pattern("/files/{name}.{ext}");
        let params = matcher.match_path("/files/report.pdf").unwrap();
        assert_eq!(params.string("name"), Some("report"));
        assert_eq!(params.string("ext"), Some("pdf"));
    }

    #[test]
    fn test_placeholder_value_with_special_characters() {
        let matcher = pattern("/items/{id}");
        let params = matcher.match_path("/items/a-b_c.d~e").unwrap();
        assert_eq!(params.string("id"), Some("a-b_c.d~e"));
    }

    #[test]
    fn test_literal_regex_metacharacters_are_escaped() {
        let matcher = pattern("/api/v1.0/(x)+");
        assert!(matcher.matches("/api/v1.0/(x)+"));
        assert!(!matcher.matches("/api/v1x0/xx"));
    }

    #[test]
    fn test_wrong_segment_count_never_matches() {
        let matcher = pattern("/users/{id}");
        assert!(matcher.match_path("/users/1/extra").is_none());
        assert!(matcher.match_path("/users").is_none());
        assert!(matcher.match_path("/users/").is_none());
        assert!(!matcher.matches("/prefix/users/1"));
    }

    #[test]
    fn test_adjacent_placeholders_rejected() {
        let error = PathPattern::new("/{a}{b}").unwrap_err();
        assert_eq!(
            error,
            PatternError::AdjacentPlaceholders {
                pattern: "/{a}{b}".to_string(),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_patterns_rejected() {
        assert!(matches!(
            PathPattern::new("users"),
            Err(PatternError::MissingLeadingSlash { .. })
        ));
        assert!(matches!(
            PathPattern::new("/users/{id"),
            Err(PatternError::UnclosedPlaceholder { position: 7, .. })
        ));
        assert!(matches!(
            PathPattern::new("/users/id}"),
            Err(PatternError::UnexpectedClosingBrace { position: 9, .. })
        ));
        assert!(matches!(
            PathPattern::new("/users/{}"),
            Err(PatternError::InvalidPlaceholderName { .. })
        ));
        assert!(matches!(
            PathPattern::new("/users/{user-id}"),
            Err(PatternError::InvalidPlaceholderName { .. })
        ));
        assert!(matches!(
            PathPattern::new("/a/{id}/b/{id}"),
            Err(PatternError::DuplicatePlaceholder { .. })
        ));
    }

    #[test]
    fn test_display_shows_source_pattern() {
        assert_eq!(pattern("/users/{id}").to_string(), "/users/{id}");
    }
}
