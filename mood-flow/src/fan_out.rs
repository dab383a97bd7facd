use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::debug;

use crate::{
    context::Context,
    error::{GraphError, Result},
    task::{NextAction, Task, TaskResult},
};

/// Runs independent branch tasks concurrently on the same context and
/// continues once all of them are done.
///
/// Branches must not depend on each other's output. The first branch error
/// aborts the remaining branches and fails the fan-out. Branch next actions
/// are ignored; the fan-out itself always continues along its own edge.
pub struct FanOutTask {
    id: String,
    branches: Vec<Arc<dyn Task>>,
}

impl FanOutTask {
    pub fn new(id: impl Into<String>, branches: Vec<Arc<dyn Task>>) -> Self {
        Self {
            id: id.into(),
            branches,
        }
    }

    pub fn branch_ids(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.id()).collect()
    }
}

#[async_trait]
impl Task for FanOutTask {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let mut branches = JoinSet::new();
        for branch in &self.branches {
            let branch = Arc::clone(branch);
            let context = context.clone();
            branches.spawn(async move {
                let id = branch.id().to_string();
                (id, branch.run(context).await)
            });
        }

        while let Some(joined) = branches.join_next().await {
            let (branch_id, result) = joined.map_err(|e| {
                GraphError::TaskExecutionFailed(format!("fan-out branch did not finish: {e}"))
            })?;
            result?;
            debug!(fan_out = %self.id, branch = %branch_id, "Branch finished");
        }

        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
