//! Route table and first-match-wins lookup.
//!
//! # Responsibilities
//! - Hold the ordered route table
//! - Replace the table wholesale via `prepare`
//! - Look up the first matching route for a request
//!
//! # Design Decisions
//! - Table lives in an `ArcSwap`: lookups are lock-free snapshots and
//!   never observe a half-built table
//! - `prepare` is serialized by a mutex and swaps only on success
//! - Insertion order is match priority; no specificity scoring
//! - Explicit `None` rather than a silent default on no match

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use super::route::{Behavior, Route, RouteBuilder};
use super::RouteDefinitionError;
use crate::http::RequestHead;

/// Ordered collection of routes being assembled during `prepare`.
#[derive(Debug, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
}

impl RouteSet {
    /// Start building a route for the given path pattern. The returned
    /// builder registers the route only when finalized with
    /// [`to`](RouteBuilder::to) or [`redirect`](RouteBuilder::redirect).
    pub fn route(&mut self, pattern: &str) -> RouteBuilder<'_> {
        RouteBuilder::new(self, pattern.to_string())
    }

    pub(super) fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub(super) fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A successful route lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Index of the matched route in the current table.
    pub index: usize,
    /// Captures bound by the path pattern.
    pub captures: HashMap<String, String>,
    /// The matched route's behavior.
    pub behavior: Behavior,
}

/// Holds the live route table and answers lookups.
pub struct Router {
    table: ArcSwap<Vec<Route>>,
    prepare_lock: Mutex<()>,
}

impl Router {
    /// A router with an empty table; every lookup misses until
    /// [`prepare`](Self::prepare) installs routes.
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(Vec::new()),
            prepare_lock: Mutex::new(()),
        }
    }

    /// Replace the entire route table.
    ///
    /// The builder callback registers routes against a fresh [`RouteSet`];
    /// on success the new table is swapped in atomically, on error the
    /// live table is left untouched. Concurrent `prepare` calls are
    /// serialized; in-flight lookups keep the snapshot they started with.
    pub fn prepare<F>(&self, build: F) -> Result<(), RouteDefinitionError>
    where
        F: FnOnce(&mut RouteSet) -> Result<(), RouteDefinitionError>,
    {
        let _guard = self
            .prepare_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut set = RouteSet::default();
        build(&mut set)?;
        let count = set.routes.len();
        self.table.store(Arc::new(set.routes));
        tracing::debug!(routes = count, "Route table prepared");
        Ok(())
    }

    /// Find the first route whose pattern and conditions both match.
    ///
    /// Absence of a match is a normal outcome, not an error.
    pub fn match_request(&self, request: &RequestHead) -> Option<RouteMatch> {
        let table = self.table.load();
        for (index, route) in table.iter().enumerate() {
            let Some(captures) = route.pattern().matches(&request.path) else {
                continue;
            };
            if super::matcher::all_hold(route.conditions(), request) {
                return Some(RouteMatch {
                    index,
                    captures,
                    behavior: route.behavior().clone(),
                });
            }
        }
        None
    }

    /// Snapshot of the current table, index-addressable, for
    /// introspection and tests.
    pub fn routes(&self) -> Arc<Vec<Route>> {
        self.table.load_full()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.load().len())
            .finish()
    }
}
