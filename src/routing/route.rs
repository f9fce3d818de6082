//! Routes, behaviors, and the fluent route builder.
//!
//! # Responsibilities
//! - Represent one registered route: pattern + conditions + behavior
//! - Fix the behavior as a closed enum at construction time
//! - Build routes through a fluent chain finalized exactly once
//!
//! # Design Decisions
//! - A route is immutable once registered; the builder is the only way
//!   to make one, and it registers nothing until finalized
//! - `Behavior` is a tagged union, not an open object: a route can never
//!   hold both a dispatch target and a redirect

use axum::http::{HeaderValue, Method};

use super::matcher::Condition;
use super::pattern::PathPattern;
use super::{RouteDefinitionError, RouteSet};
use crate::http::Protocol;

/// What a matched route does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// Invoke the named action on the named handler. `action` is a
    /// default; a path capture named `action` overrides it at dispatch.
    Dispatch { target: String, action: String },
    /// Short-circuit to a redirect response; no handler runs.
    Redirect { location: String, permanent: bool },
}

impl Behavior {
    /// True iff this behavior is a redirect.
    pub fn redirects(&self) -> bool {
        matches!(self, Behavior::Redirect { .. })
    }
}

/// An immutable registered route.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    conditions: Vec<Condition>,
    behavior: Behavior,
}

impl Route {
    pub(super) fn new(pattern: PathPattern, conditions: Vec<Condition>, behavior: Behavior) -> Self {
        Self {
            pattern,
            conditions,
            behavior,
        }
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }
}

/// Accumulates one route's pattern and conditions until a behavior
/// finalizes it into the owning [`RouteSet`].
///
/// Dropping a builder without calling [`to`](Self::to) or
/// [`redirect`](Self::redirect) registers nothing, so a half-specified
/// route can never enter the table.
#[derive(Debug)]
pub struct RouteBuilder<'a> {
    set: &'a mut RouteSet,
    pattern: String,
    conditions: Vec<Condition>,
}

impl<'a> RouteBuilder<'a> {
    pub(super) fn new(set: &'a mut RouteSet, pattern: String) -> Self {
        Self {
            set,
            pattern,
            conditions: Vec::new(),
        }
    }

    /// Require the given HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.conditions.push(Condition::Method(method));
        self
    }

    /// Require the given transport protocol.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.conditions.push(Condition::Protocol(protocol));
        self
    }

    /// Require a header to be present with exactly the given value.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.conditions.push(Condition::Header {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Finalize as a dispatch route. `action` is the default action
    /// name, overridden by an `:action` capture when the pattern has one.
    pub fn to(self, target: &str, action: &str) -> Result<(), RouteDefinitionError> {
        let behavior = Behavior::Dispatch {
            target: target.to_string(),
            action: action.to_string(),
        };
        self.finish(behavior)
    }

    /// Finalize as a redirect route. The location must be sendable as a
    /// `Location` header; catching that here keeps it a startup failure
    /// instead of a redirect with no target at runtime.
    pub fn redirect(self, location: &str, permanent: bool) -> Result<(), RouteDefinitionError> {
        if HeaderValue::from_str(location).is_err() {
            return Err(RouteDefinitionError::InvalidRedirectLocation(
                location.to_string(),
            ));
        }
        let behavior = Behavior::Redirect {
            location: location.to_string(),
            permanent,
        };
        self.finish(behavior)
    }

    fn finish(self, behavior: Behavior) -> Result<(), RouteDefinitionError> {
        let pattern = PathPattern::compile(&self.pattern)?;
        self.set.push(Route::new(pattern, self.conditions, behavior));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_behavior_reports_redirects() {
        let behavior = Behavior::Redirect {
            location: "/new/location".to_string(),
            permanent: true,
        };
        assert!(behavior.redirects());

        let behavior = Behavior::Dispatch {
            target: "pages".to_string(),
            action: "show".to_string(),
        };
        assert!(!behavior.redirects());
    }

    #[test]
    fn unfinalized_builder_registers_nothing() {
        let mut set = RouteSet::default();
        let builder = RouteBuilder::new(&mut set, "/dangling".to_string());
        drop(builder);
        assert!(set.is_empty());
    }

    #[test]
    fn unsendable_redirect_location_fails_at_finalize() {
        let mut set = RouteSet::default();
        let result =
            RouteBuilder::new(&mut set, "/old".to_string()).redirect("/new\nlocation", true);
        assert!(matches!(
            result,
            Err(RouteDefinitionError::InvalidRedirectLocation(_))
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_pattern_fails_at_finalize() {
        let mut set = RouteSet::default();
        let result = RouteBuilder::new(&mut set, "bad".to_string()).to("pages", "show");
        assert!(matches!(
            result,
            Err(RouteDefinitionError::MissingLeadingSlash(_))
        ));
        assert!(set.is_empty());
    }
}
