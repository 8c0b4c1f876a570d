//! Route pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse path templates (`/v1/page/:pageId`, `*`, `/files/*rest`)
//! - Match a request path against a template, extracting named params
//! - Match the request method against a verb or wildcard
//!
//! # Design Decisions
//! - Static segments match literally (case-sensitive)
//! - Empty path segments are ignored, so a trailing slash still matches
//! - A wildcard is only allowed as the last segment and matches any suffix, including empty
//! - Captured values never contain `.`/`..` segments (plain or percent-encoded)
//! - No regex to guarantee O(n) matching

use axum::http::Method;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Parameters captured from a matched path, keyed by segment name.
pub type Params = HashMap<String, String>;

/// Errors raised while parsing a route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("route pattern `{0}` must start with `/` or be `*`")]
    MissingLeadingSlash(String),

    #[error("route pattern `{0}` has an unnamed parameter")]
    EmptyParam(String),

    #[error("route pattern `{0}` has a wildcard before its last segment")]
    WildcardNotLast(String),
}

/// Which request methods a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Any method.
    Any,
    /// Exactly this method.
    Only(Method),
}

impl MethodFilter {
    /// Returns true if `method` is accepted.
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(expected) => expected == method,
        }
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        MethodFilter::Only(method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    /// Trailing wildcard, optionally capturing the suffix under a name.
    Wildcard(Option<String>),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    template: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a template such as `/v1/user/:userId`.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        if template != "*" && !template.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(template.to_string()));
        }

        let raw: Vec<&str> = split_path(template).collect();
        let mut segments = Vec::with_capacity(raw.len());

        for (i, part) in raw.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParam(template.to_string()));
                }
                Segment::Param(name.to_string())
            } else if let Some(name) = part.strip_prefix('*') {
                if i + 1 != raw.len() {
                    return Err(PatternError::WildcardNotLast(template.to_string()));
                }
                Segment::Wildcard((!name.is_empty()).then(|| name.to_string()))
            } else {
                Segment::Static((*part).to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// True if the pattern ends in a wildcard (a catch-all of some prefix).
    pub fn is_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }

    /// Match `path`, returning the captured params on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = split_path(path).collect();
        let mut params = Params::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard(name) => {
                    if let Some(name) = name {
                        let rest = parts.get(i..).unwrap_or_default();
                        if rest.iter().any(|part| is_dot_segment(part)) {
                            return None;
                        }
                        params.insert(name.clone(), rest.join("/"));
                    }
                    return Some(params);
                }
                Segment::Static(expected) => {
                    if parts.get(i) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(i)?;
                    if is_dot_segment(value) {
                        return None;
                    }
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// Substitute `params` into the template, producing a concrete path.
    ///
    /// Missing params render as empty segments; wildcards render their captured suffix.
    pub fn render(&self, params: &Params) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            let part = match segment {
                Segment::Static(s) => s.as_str(),
                Segment::Param(name) => params.get(name).map(String::as_str).unwrap_or_default(),
                Segment::Wildcard(Some(name)) => {
                    params.get(name).map(String::as_str).unwrap_or_default()
                }
                Segment::Wildcard(None) => continue,
            };
            path.push('/');
            path.push_str(part);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// True for `.` and `..`, including `%2e` spellings, which URL parsers resolve away.
pub fn is_dot_segment(segment: &str) -> bool {
    let normalized = segment.to_ascii_lowercase().replace("%2e", ".");
    normalized == "." || normalized == ".."
}
