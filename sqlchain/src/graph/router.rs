//! Named routing functions and the conditional edges that use them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RoutingError;

use super::Next;

/// A named routing function: inspects the state and returns an outcome key.
///
/// The key is looked up in the mapping of the `ConditionalEdge` it is bound to.
pub struct Router<S> {
    name: String,
    route: Arc<dyn Fn(&S) -> String + Send + Sync>,
}

impl<S> Router<S> {
    pub fn new<F>(name: impl Into<String>, route: F) -> Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            route: Arc::new(route),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the routing function.
    pub fn route(&self, state: &S) -> String {
        (self.route)(state)
    }
}

impl<S> Clone for Router<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            route: Arc::clone(&self.route),
        }
    }
}

impl<S> fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("name", &self.name).finish()
    }
}

/// Transition whose target is computed from the state at run time.
///
/// `router` produces an outcome key; `path_map` maps it to a node or `END`.
pub struct ConditionalEdge<S> {
    pub(super) source: String,
    pub(super) router: Router<S>,
    pub(super) path_map: BTreeMap<String, Next>,
}

impl<S> ConditionalEdge<S> {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn router(&self) -> &Router<S> {
        &self.router
    }

    /// Outcome keys this edge knows, sorted.
    pub fn outcomes(&self) -> Vec<String> {
        self.path_map.keys().cloned().collect()
    }

    /// Applies the router and looks the outcome up in the mapping.
    ///
    /// Fails with `RoutingError` naming the source node when the outcome is unmapped.
    pub fn resolve(&self, state: &S) -> Result<(String, Next), RoutingError> {
        let outcome = self.router.route(state);
        match self.path_map.get(&outcome) {
            Some(next) => Ok((outcome, next.clone())),
            None => Err(RoutingError::new(
                self.source.clone(),
                outcome,
                self.outcomes(),
            )),
        }
    }
}

impl<S> fmt::Debug for ConditionalEdge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEdge")
            .field("source", &self.source)
            .field("router", &self.router)
            .field("path_map", &self.path_map)
            .finish()
    }
}
