//! Per-run logging context.
//!
//! Every log line the pipeline emits carries the run id and category from
//! this value as explicit `tracing` fields.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: Uuid,
    pub category: String,
}

impl RunContext {
    /// Creates a context with a fresh random run id.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            category: category.into(),
        }
    }
}
