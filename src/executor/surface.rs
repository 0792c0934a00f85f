use async_trait::async_trait;
use serde_json::{Map, Value};

use super::errors::SurfaceResult;
use crate::planner::Statement;

/// One result row, column name to JSON value
pub type Row = Map<String, Value>;

/// Executes parametrized statements
#[async_trait]
pub trait QuerySurface: Send + Sync {
    /// Short name used in query failure logs
    fn name(&self) -> &'static str;

    async fn query(&self, statement: &Statement) -> SurfaceResult<Vec<Row>>;

    /// Runs dependent statements. Implementations backed by a connection
    /// share one connection across the batch.
    async fn query_batch(&self, statements: &[Statement]) -> SurfaceResult<Vec<Vec<Row>>> {
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            results.push(self.query(statement).await?);
        }
        Ok(results)
    }
}
