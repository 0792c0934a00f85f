//! Statement assembly
//!
//! Every statement produced here carries its literal values as bound
//! parameters. Table names come from the fixed `Resource` mapping and
//! column names from the registry or rule tables.

use crate::schema::Resource;

use super::ast::{BoundValue, Predicate, QueryPlan, SortKey, Statement, StatementShape};

/// Fixed result ordering per resource
pub fn ordering_for(resource: Resource) -> Vec<SortKey> {
    match resource {
        Resource::Flights => vec![SortKey::asc("departure_time")],
        Resource::Crew => vec![
            SortKey::asc("next_legal_availability"),
            SortKey::asc("duty_hours_last_7d"),
        ],
        Resource::CrewAssignments => vec![SortKey::desc("flight_date")],
        Resource::Passengers => vec![SortKey::desc("passenger_priority_score")],
    }
}

/// Deterministic statement builder
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryAssembler;

impl QueryAssembler {
    pub fn new() -> Self {
        Self
    }

    /// `SELECT * FROM <table> [WHERE ...] ORDER BY <fixed> [LIMIT $n]`
    pub fn search(
        &self,
        resource: Resource,
        predicates: Vec<Predicate>,
        limit: Option<i64>,
    ) -> Statement {
        self.select(QueryPlan {
            resource,
            predicates,
            order_by: ordering_for(resource),
            limit,
        })
    }

    /// Renders a plan. Placeholders are numbered in predicate order and the
    /// limit, when present, takes the last number.
    pub fn select(&self, plan: QueryPlan) -> Statement {
        let mut text = format!("SELECT * FROM {}", plan.resource.table_name());
        let mut next = 1usize;

        if !plan.predicates.is_empty() {
            let clauses: Vec<String> = plan
                .predicates
                .iter()
                .map(|p| number_placeholders(p.template(), &mut next))
                .collect();
            text.push_str(" WHERE ");
            text.push_str(&clauses.join(" AND "));
        }

        if !plan.order_by.is_empty() {
            let keys: Vec<String> = plan
                .order_by
                .iter()
                .map(|k| format!("{} {}", k.column, k.direction.as_str()))
                .collect();
            text.push_str(" ORDER BY ");
            text.push_str(&keys.join(", "));
        }

        if plan.limit.is_some() {
            text.push_str(&format!(" LIMIT ${}", next));
        }

        Statement {
            text,
            params: plan.parameters(),
            shape: StatementShape::Select(plan),
        }
    }

    /// Case-insensitive point lookup by the resource's identifier column
    pub fn lookup(&self, resource: Resource, id: &str) -> Statement {
        self.select(QueryPlan {
            resource,
            predicates: vec![id_predicate(resource.id_column(), id)],
            order_by: Vec::new(),
            limit: Some(1),
        })
    }

    /// All rows whose `column` matches `value` case-insensitively, in the
    /// resource's fixed ordering
    pub fn lookup_all(&self, resource: Resource, column: &str, value: &str) -> Statement {
        self.select(QueryPlan {
            resource,
            predicates: vec![id_predicate(column, value)],
            order_by: ordering_for(resource),
            limit: None,
        })
    }

    pub fn count(&self, resource: Resource) -> Statement {
        Statement {
            text: format!("SELECT COUNT(*) AS count FROM {}", resource.table_name()),
            params: Vec::new(),
            shape: StatementShape::Count { resource },
        }
    }

    /// Column catalog introspection for one table
    pub fn columns(&self, table: &str) -> Statement {
        Statement {
            text: "SELECT column_name, data_type FROM information_schema.columns \
                   WHERE table_name = $1 ORDER BY ordinal_position"
                .to_string(),
            params: vec![BoundValue::text(table)],
            shape: StatementShape::Columns {
                table: table.to_string(),
            },
        }
    }

    /// Crew rows referenced by the assignments of one flight
    pub fn crew_on_flight(&self, flight_no: &str) -> Statement {
        let flight_no = flight_no.to_uppercase();
        Statement {
            text: format!(
                "SELECT * FROM {} WHERE crew_id IN (SELECT crew_id FROM {} WHERE UPPER(flight_no) = $1)",
                Resource::Crew.table_name(),
                Resource::CrewAssignments.table_name()
            ),
            params: vec![BoundValue::Text(flight_no.clone())],
            shape: StatementShape::CrewOnFlight { flight_no },
        }
    }

    pub fn routes(&self) -> Statement {
        Statement {
            text: "SELECT origin, destination, COUNT(*) AS flight_count FROM flights \
                   GROUP BY origin, destination ORDER BY origin, destination"
                .to_string(),
            params: Vec::new(),
            shape: StatementShape::Routes,
        }
    }
}

fn id_predicate(column: &str, value: &str) -> Predicate {
    Predicate::compare(
        column,
        super::ast::CompareOp::Eq,
        super::ast::ColumnFold::Upper,
        BoundValue::Text(value.to_uppercase()),
    )
}

fn number_placeholders(template: &str, next: &mut usize) -> String {
    let mut out = String::with_capacity(template.len() + 4);
    for ch in template.chars() {
        if ch == '?' {
            out.push('$');
            out.push_str(&next.to_string());
            *next += 1;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{ColumnFold, CompareOp};

    #[test]
    fn test_empty_search_has_only_ordering() {
        let stmt = QueryAssembler::new().search(Resource::Flights, Vec::new(), None);
        assert_eq!(stmt.text, "SELECT * FROM flights ORDER BY departure_time ASC");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_placeholders_follow_predicate_order() {
        let predicates = vec![
            Predicate::eq("origin", BoundValue::text("DEL")),
            Predicate::compare("available_seats", CompareOp::Gte, ColumnFold::None, BoundValue::Int(2)),
            Predicate::compare("status", CompareOp::NotEq, ColumnFold::None, BoundValue::text("CANCELLED")),
        ];
        let stmt = QueryAssembler::new().search(Resource::Flights, predicates, Some(10));
        assert_eq!(
            stmt.text,
            "SELECT * FROM flights WHERE origin = $1 AND available_seats >= $2 AND status != $3 \
             ORDER BY departure_time ASC LIMIT $4"
        );
        assert_eq!(stmt.params.len(), 4);
        assert_eq!(stmt.params[3], BoundValue::Int(10));
        assert_eq!(stmt.placeholder_count(), stmt.params.len());
    }

    #[test]
    fn test_any_of_consumes_two_placeholders() {
        let predicates = vec![
            Predicate::any_of(&["base_airport", "current_location"], ColumnFold::Upper, BoundValue::text("DEL")),
            Predicate::compare("role", CompareOp::Eq, ColumnFold::Upper, BoundValue::text("PILOT")),
        ];
        let stmt = QueryAssembler::new().search(Resource::Crew, predicates, Some(50));
        assert!(stmt
            .text
            .contains("(UPPER(base_airport) = $1 OR UPPER(current_location) = $2) AND UPPER(role) = $3"));
        assert!(stmt
            .text
            .ends_with("ORDER BY next_legal_availability ASC, duty_hours_last_7d ASC LIMIT $4"));
        assert_eq!(stmt.placeholder_count(), 4);
    }

    #[test]
    fn test_lookup_uppercases_identifier() {
        let stmt = QueryAssembler::new().lookup(Resource::Flights, "ai101");
        assert_eq!(stmt.text, "SELECT * FROM flights WHERE UPPER(flight_no) = $1 LIMIT $2");
        assert_eq!(stmt.params, vec![BoundValue::text("AI101"), BoundValue::Int(1)]);
    }

    #[test]
    fn test_lookup_all_orders_by_resource() {
        let stmt = QueryAssembler::new().lookup_all(Resource::Passengers, "pnr", "abc123");
        assert_eq!(
            stmt.text,
            "SELECT * FROM passengers WHERE UPPER(pnr) = $1 ORDER BY passenger_priority_score DESC"
        );
    }

    #[test]
    fn test_fixed_statements() {
        let a = QueryAssembler::new();
        assert_eq!(a.count(Resource::Crew).text, "SELECT COUNT(*) AS count FROM crew");
        assert_eq!(a.columns("crew").params, vec![BoundValue::text("crew")]);
        let roster = a.crew_on_flight("ai101");
        assert_eq!(roster.params, vec![BoundValue::text("AI101")]);
        assert!(roster.text.contains("FROM crew_assignments WHERE UPPER(flight_no) = $1"));
        assert!(a.routes().text.contains("GROUP BY origin, destination"));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let build = || {
            QueryAssembler::new().search(
                Resource::Passengers,
                vec![Predicate::eq("pnr", BoundValue::text("X1"))],
                Some(100),
            )
        };
        assert_eq!(build(), build());
    }
}
