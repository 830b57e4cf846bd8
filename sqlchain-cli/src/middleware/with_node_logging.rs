//! Extension trait for fluent API: attach node logging middleware to a pipeline.
//!
//! Interacts with [`SqlChain`](sqlchain::SqlChain) and
//! [`LoggingMiddleware`](super::logging::LoggingMiddleware).

use std::sync::Arc;

use sqlchain::SqlChain;

use super::logging::LoggingMiddleware;

/// Returns the same pipeline with `LoggingMiddleware` attached.
pub trait WithNodeLogging {
    fn with_node_logging(self) -> Self;
}

impl WithNodeLogging for SqlChain {
    fn with_node_logging(self) -> Self {
        self.with_middleware(Arc::new(LoggingMiddleware))
    }
}
