//! In-process query surface
//!
//! Evaluates the structured `StatementShape` of each statement against
//! fixture tables instead of parsing SQL.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::errors::{SurfaceError, SurfaceResult};
use super::filters::PredicateFilter;
use super::sorter::ResultSorter;
use super::surface::{QuerySurface, Row};
use crate::planner::{QueryPlan, Statement, StatementShape};
use crate::schema::Resource;

#[derive(Debug, Default)]
pub struct InMemorySurface {
    tables: HashMap<String, Vec<Row>>,
    catalogs: HashMap<String, Vec<(String, String)>>,
    unavailable: bool,
    executed: Mutex<Vec<Statement>>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose every query fails with a connection error
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Registers a table with its `(column, data_type)` catalog and rows.
    /// Non-object rows are skipped.
    pub fn with_table(mut self, table: &str, columns: &[(&str, &str)], rows: Vec<Value>) -> Self {
        self.catalogs.insert(
            table.to_string(),
            columns
                .iter()
                .map(|(c, t)| (c.to_string(), t.to_string()))
                .collect(),
        );
        self.tables.insert(
            table.to_string(),
            rows.into_iter()
                .filter_map(|r| match r {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
        );
        self
    }

    /// Statements executed so far, in order
    pub fn executed(&self) -> Vec<Statement> {
        self.executed
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn rows(&self, table: &str) -> SurfaceResult<&[Row]> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| SurfaceError::query(format!("relation \"{}\" does not exist", table)))
    }

    fn select(&self, plan: &QueryPlan) -> SurfaceResult<Vec<Row>> {
        let mut rows: Vec<Row> = self
            .rows(plan.resource.table_name())?
            .iter()
            .filter(|row| PredicateFilter::matches(row, &plan.predicates))
            .cloned()
            .collect();

        ResultSorter::sort(&mut rows, &plan.order_by);

        if let Some(limit) = plan.limit {
            rows.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    fn crew_on_flight(&self, flight_no: &str) -> SurfaceResult<Vec<Row>> {
        let crew_ids: HashSet<String> = self
            .rows(Resource::CrewAssignments.table_name())?
            .iter()
            .filter(|a| {
                a.get("flight_no")
                    .and_then(Value::as_str)
                    .is_some_and(|f| f.to_uppercase() == flight_no)
            })
            .filter_map(|a| a.get("crew_id").map(id_key))
            .collect();

        Ok(self
            .rows(Resource::Crew.table_name())?
            .iter()
            .filter(|c| c.get("crew_id").is_some_and(|id| crew_ids.contains(&id_key(id))))
            .cloned()
            .collect())
    }

    fn routes(&self) -> SurfaceResult<Vec<Row>> {
        let mut counts: BTreeMap<(String, String), i64> = BTreeMap::new();
        for flight in self.rows(Resource::Flights.table_name())? {
            let field = |name: &str| {
                flight
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            *counts.entry((field("origin"), field("destination"))).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|((origin, destination), count)| {
                object(json!({
                    "origin": origin,
                    "destination": destination,
                    "flight_count": count,
                }))
            })
            .collect())
    }

    fn evaluate(&self, statement: &Statement) -> SurfaceResult<Vec<Row>> {
        match &statement.shape {
            StatementShape::Select(plan) => self.select(plan),
            StatementShape::Count { resource } => {
                let count = self.rows(resource.table_name())?.len();
                Ok(vec![object(json!({ "count": count }))])
            }
            StatementShape::Columns { table } => Ok(self
                .catalogs
                .get(table)
                .map(|columns| {
                    columns
                        .iter()
                        .map(|(name, data_type)| {
                            object(json!({ "column_name": name, "data_type": data_type }))
                        })
                        .collect()
                })
                .unwrap_or_default()),
            StatementShape::CrewOnFlight { flight_no } => self.crew_on_flight(flight_no),
            StatementShape::Routes => self.routes(),
        }
    }
}

#[async_trait]
impl QuerySurface for InMemorySurface {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, statement: &Statement) -> SurfaceResult<Vec<Row>> {
        if self.unavailable {
            return Err(SurfaceError::connection("in-memory surface marked unavailable"));
        }
        if let Ok(mut log) = self.executed.lock() {
            log.push(statement.clone());
        }
        self.evaluate(statement)
    }
}

fn id_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{BoundValue, Predicate, QueryAssembler};

    fn surface() -> InMemorySurface {
        InMemorySurface::new()
            .with_table(
                "flights",
                &[("flight_no", "text"), ("origin", "text"), ("destination", "text")],
                vec![
                    json!({"flight_no": "AI101", "origin": "DEL", "destination": "BOM", "departure_time": "2025-03-01T10:00:00"}),
                    json!({"flight_no": "AI202", "origin": "DEL", "destination": "BOM", "departure_time": "2025-03-01T08:00:00"}),
                    json!({"flight_no": "6E5", "origin": "BLR", "destination": "DEL", "departure_time": "2025-03-01T09:00:00"}),
                ],
            )
            .with_table(
                "crew",
                &[("crew_id", "text")],
                vec![json!({"crew_id": "C1"}), json!({"crew_id": "C2"})],
            )
            .with_table(
                "crew_assignments",
                &[("assignment_id", "text")],
                vec![json!({"assignment_id": "A1", "crew_id": "C2", "flight_no": "AI101"})],
            )
    }

    #[tokio::test]
    async fn test_select_filters_sorts_and_limits() {
        let s = surface();
        let stmt = QueryAssembler::new().search(
            Resource::Flights,
            vec![Predicate::eq("origin", BoundValue::text("DEL"))],
            Some(1),
        );
        let rows = s.query(&stmt).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["flight_no"], "AI202");
        assert_eq!(s.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_count_and_columns() {
        let s = surface();
        let a = QueryAssembler::new();
        let count = s.query(&a.count(Resource::Flights)).await.unwrap();
        assert_eq!(count[0]["count"], 3);
        let columns = s.query(&a.columns("flights")).await.unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0]["column_name"], "flight_no");
        assert!(s.query(&a.columns("unknown")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crew_on_flight_and_routes() {
        let s = surface();
        let a = QueryAssembler::new();
        let crew = s.query(&a.crew_on_flight("ai101")).await.unwrap();
        assert_eq!(crew.len(), 1);
        assert_eq!(crew[0]["crew_id"], "C2");

        let routes = s.query(&a.routes()).await.unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0]["origin"], "BLR");
        assert_eq!(routes[1]["flight_count"], 2);
    }

    #[tokio::test]
    async fn test_unavailable_surface() {
        let s = InMemorySurface::unavailable();
        let err = s.query(&QueryAssembler::new().routes()).await.unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_missing_table_is_query_error() {
        let s = InMemorySurface::new();
        let err = s
            .query(&QueryAssembler::new().count(Resource::Passengers))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FLIGHTDESK_SURFACE_QUERY");
    }
}
