use std::sync::Arc;

use serde_json::Value;

use crate::filter::{FilterResult, FilterTranslator, SearchProfile};
use crate::planner::{QueryAssembler, Statement};
use crate::schema::SchemaRegistry;

/// Translate-then-assemble, without execution. Shared by the HTTP service
/// and the offline `plan` command.
pub struct SearchPlanner {
    translator: FilterTranslator,
    assembler: QueryAssembler,
}

impl SearchPlanner {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            translator: FilterTranslator::new(registry),
            assembler: QueryAssembler::new(),
        }
    }

    pub fn plan(&self, profile: SearchProfile, payload: &Value) -> FilterResult<Statement> {
        let translation = self.translator.translate(profile, payload)?;
        Ok(self
            .assembler
            .search(profile.resource(), translation.predicates, translation.limit))
    }

    pub fn assembler(&self) -> &QueryAssembler {
        &self.assembler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::BoundValue;
    use crate::schema::{Resource, SemanticType};
    use serde_json::json;

    #[test]
    fn test_plan_flight_search() {
        let registry = SchemaRegistry::builder()
            .column(Resource::Flights, "origin", SemanticType::Text)
            .build();
        let planner = SearchPlanner::new(Arc::new(registry));
        let stmt = planner
            .plan(SearchProfile::Flights, &json!({"origin": "del", "limit": "3"}))
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT * FROM flights WHERE origin = $1 ORDER BY departure_time ASC LIMIT $2"
        );
        assert_eq!(stmt.params, vec![BoundValue::text("DEL"), BoundValue::Int(3)]);
    }
}
