//! Logging middleware that reports node enter/exit around each step.

use async_trait::async_trait;

use sqlchain::graph::NodeFuture;
use sqlchain::{AgentError, NodeMiddleware, PipelineState, PipelineUpdate};

/// Middleware that logs node enter/exit around each node.run call.
///
/// Writes to stderr so the answer on stdout can be redirected separately. On exit it
/// reports how many messages the step appended and the routing decision, if any.
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub(crate) fn describe_exit(node_id: &str, result: &Result<PipelineUpdate, AgentError>) -> String {
        match result {
            Ok(update) => match &update.next {
                Some(next) => format!("[node] exit node={} next={}", node_id, next),
                None => format!(
                    "[node] exit node={} messages+={}",
                    node_id,
                    update.messages.len()
                ),
            },
            Err(e) => format!("[node] exit node={} error={}", node_id, e),
        }
    }
}

#[async_trait]
impl NodeMiddleware<PipelineState> for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: PipelineState,
        inner: Box<dyn FnOnce(PipelineState) -> NodeFuture<PipelineUpdate> + Send>,
    ) -> Result<PipelineUpdate, AgentError> {
        eprintln!("[node] enter node={}", node_id);
        let result = inner(state).await;
        eprintln!("{}", Self::describe_exit(node_id, &result));
        result
    }
}
