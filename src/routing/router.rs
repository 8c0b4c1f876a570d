//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the first route matching method + path
//! - Return matched handler and params, or explicit no-match
//!
//! # Design Decisions
//! - Built once before traffic starts, immutable afterwards (shared via Arc without locks)
//! - O(n) scan in registration order; first match wins, no specificity scoring
//! - Explicit `None` rather than silent default

use axum::http::Method;

use crate::routing::matcher::{MethodFilter, Params, PatternError, RoutePattern};

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub method: MethodFilter,
    pub pattern: RoutePattern,
    pub handler: H,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub handler: &'a H,
    pub params: Params,
    pub pattern: &'a RoutePattern,
}

/// Ordered route table.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: Vec<Route<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier registrations take precedence.
    pub fn register(
        &mut self,
        method: impl Into<MethodFilter>,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, PatternError> {
        self.routes.push(Route {
            method: method.into(),
            pattern: RoutePattern::parse(pattern)?,
            handler,
        });
        Ok(self)
    }

    pub fn get(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.register(Method::GET, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.register(Method::OPTIONS, pattern, handler)
    }

    /// Find the first route accepting `method` whose pattern matches `path`.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.routes
            .iter()
            .filter(|route| route.method.matches(method))
            .find_map(|route| {
                route.pattern.matches(path).map(|params| RouteMatch {
                    handler: &route.handler,
                    params,
                    pattern: &route.pattern,
                })
            })
    }

    /// Templates of every non-wildcard route, in registration order.
    pub fn templates(&self) -> Vec<String> {
        self.routes
            .iter()
            .filter(|route| !route.pattern.is_wildcard())
            .map(|route| route.pattern.template().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
