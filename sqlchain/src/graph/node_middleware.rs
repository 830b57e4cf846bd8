//! Middleware wrapping every node invocation of a compiled graph.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::GraphState;

/// Boxed future returned by the wrapped node call.
pub type NodeFuture<U> = Pin<Box<dyn Future<Output = Result<U, AgentError>> + Send>>;

/// Around-advice for node execution (logging, metrics, fault injection in tests).
///
/// `inner` runs the node; implementations may inspect or replace the state passed in
/// and the update returned.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: GraphState,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: Box<dyn FnOnce(S) -> NodeFuture<S::Update> + Send>,
    ) -> Result<S::Update, AgentError>;
}
