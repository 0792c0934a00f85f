//! Filter payload → ordered predicates
//!
//! Output order:
//! 1. fixed leading predicates of the profile (status allow-list)
//! 2. generic and override fields, in payload order
//! 3. exclusions, in list order
//! 4. time-of-day bounds, in rule order
//! 5. the trailing duty-hours ceiling, when the profile has one
//!
//! Unknown fields and null values are skipped without error. A rule whose
//! target column is missing from the catalog counts as unknown.

use std::sync::Arc;

use serde_json::Value;

use super::errors::{FilterError, FilterResult};
use super::normalize::{normalize, scalar_string};
use super::payload::FilterPayload;
use super::rules::{
    FieldRule, ResourceRules, SearchProfile, DUTY_COLUMN, MAX_DUTY_FIELD, STATUS_COLUMN,
};
use crate::planner::{BoundValue, ColumnFold, CompareOp, Predicate};
use crate::schema::{SchemaRegistry, SemanticType};

/// Predicates and effective limit for one search request
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub predicates: Vec<Predicate>,
    pub limit: Option<i64>,
}

impl Translation {
    /// Number of bound values across all predicates, excluding the limit
    pub fn parameter_count(&self) -> usize {
        self.predicates.iter().map(|p| p.bound_values().len()).sum()
    }
}

pub struct FilterTranslator {
    registry: Arc<SchemaRegistry>,
}

impl FilterTranslator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn translate(&self, profile: SearchProfile, raw: &Value) -> FilterResult<Translation> {
        let rules = profile.rules();
        let payload = FilterPayload::parse(raw, rules)?;
        self.translate_payload(rules, &payload)
    }

    pub fn translate_payload(
        &self,
        rules: &ResourceRules,
        payload: &FilterPayload,
    ) -> FilterResult<Translation> {
        let mut predicates = Vec::new();

        if !rules.status_in.is_empty() {
            predicates.push(Predicate::in_list(
                STATUS_COLUMN,
                rules.status_in.iter().map(|s| BoundValue::text(*s)).collect(),
            ));
        }

        let mut duty_ceiling = rules.duty_ceiling.map(BoundValue::Float);

        for (field, value) in &payload.fields {
            if value.is_null() {
                continue;
            }

            if rules.duty_ceiling.is_some() && field == MAX_DUTY_FIELD {
                duty_ceiling = Some(normalize(field, value, SemanticType::Numeric)?);
                continue;
            }

            if let Some(rule) = rules.override_for(field) {
                if self.knows_all(rules, rule.columns()) {
                    predicates.push(override_predicate(field, value, rule)?);
                } else {
                    tracing::debug!(resource = %rules.resource, field = %field, "ignoring filter on uncatalogued column");
                }
                continue;
            }

            match self.registry.resolve(rules.resource, field) {
                Some(column) => {
                    let fold = match column.semantic_type {
                        SemanticType::Text => rules.text_fold,
                        _ => ColumnFold::None,
                    };
                    let bound = normalize(field, value, column.semantic_type)?;
                    predicates.push(Predicate::compare(&column.name, CompareOp::Eq, fold, bound));
                }
                None => {
                    tracing::debug!(resource = %rules.resource, field = %field, "ignoring unknown filter field");
                }
            }
        }

        if let Some(exclusion) = rules
            .exclusion
            .filter(|e| self.knows_all(rules, &[e.column]))
        {
            for value in &payload.exclusions {
                predicates.push(Predicate::compare(
                    exclusion.column,
                    CompareOp::NotEq,
                    ColumnFold::None,
                    BoundValue::text(value.clone()),
                ));
            }
        }

        for bound in &payload.time_bounds {
            if !self.knows_all(rules, &[bound.rule.column]) {
                continue;
            }
            predicates.push(Predicate::time_of_day(bound.rule.column, bound.rule.op, bound.at));
        }

        if let Some(ceiling) = duty_ceiling {
            predicates.push(Predicate::compare(
                DUTY_COLUMN,
                CompareOp::Lt,
                ColumnFold::None,
                ceiling,
            ));
        }

        Ok(Translation {
            predicates,
            limit: payload.limit.or(rules.default_limit),
        })
    }

    fn knows_all(&self, rules: &ResourceRules, columns: &[&str]) -> bool {
        columns
            .iter()
            .all(|column| self.registry.resolve(rules.resource, column).is_some())
    }
}

fn override_predicate(field: &str, value: &Value, rule: &FieldRule) -> FilterResult<Predicate> {
    match *rule {
        FieldRule::Compare {
            column,
            op,
            fold,
            semantic_type,
        } => Ok(Predicate::compare(
            column,
            op,
            fold,
            normalize(field, value, semantic_type)?,
        )),
        FieldRule::CasedText { column, fold } => {
            let text = scalar_text(field, value)?;
            Ok(Predicate::compare(
                column,
                CompareOp::Eq,
                fold,
                BoundValue::Text(fold.apply(&text)),
            ))
        }
        FieldRule::Contains { column } => {
            let text = scalar_text(field, value)?.to_uppercase();
            Ok(Predicate::compare(
                column,
                CompareOp::Like,
                ColumnFold::Upper,
                BoundValue::Text(format!("%{}%", escape_like(&text))),
            ))
        }
        FieldRule::AnyOf { columns } => Ok(Predicate::any_of(
            columns,
            ColumnFold::Upper,
            normalize(field, value, SemanticType::Text)?,
        )),
    }
}

fn scalar_text(field: &str, value: &Value) -> FilterResult<String> {
    match value {
        Value::Array(_) | Value::Object(_) => {
            Err(FilterError::invalid_value(field, "expected a scalar value"))
        }
        other => Ok(scalar_string(other)),
    }
}

/// Escapes LIKE metacharacters so the value matches literally
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Resource;
    use serde_json::json;

    fn registry() -> Arc<SchemaRegistry> {
        Arc::new(
            SchemaRegistry::builder()
                .column(Resource::Flights, "flight_no", SemanticType::Text)
                .column(Resource::Flights, "origin", SemanticType::Text)
                .column(Resource::Flights, "destination", SemanticType::Text)
                .column(Resource::Flights, "status", SemanticType::Text)
                .column(Resource::Flights, "available_seats", SemanticType::Integer)
                .column(Resource::Flights, "meal_service_available", SemanticType::Boolean)
                .column(Resource::Flights, "departure_time", SemanticType::Timestamp)
                .column(Resource::Flights, "arrival_time", SemanticType::Timestamp)
                .column(Resource::Crew, "role", SemanticType::Text)
                .column(Resource::Crew, "current_status", SemanticType::Text)
                .column(Resource::Crew, "certifications", SemanticType::Text)
                .column(Resource::Crew, "base_airport", SemanticType::Text)
                .column(Resource::Crew, "current_location", SemanticType::Text)
                .column(Resource::Crew, "duty_hours_last_7d", SemanticType::Numeric)
                .column(Resource::Crew, "next_legal_availability", SemanticType::Timestamp)
                .column(Resource::Passengers, "loyalty_tier", SemanticType::Text)
                .column(Resource::Passengers, "email", SemanticType::Text)
                .column(Resource::Passengers, "phone", SemanticType::Text)
                .column(Resource::Passengers, "age", SemanticType::Integer)
                .column(Resource::Passengers, "wheelchair_or_medical_time_required", SemanticType::Boolean)
                .build(),
        )
    }

    fn templates(t: &Translation) -> Vec<&str> {
        t.predicates.iter().map(|p| p.template()).collect()
    }

    #[test]
    fn test_flight_search_order() {
        let t = FilterTranslator::new(registry())
            .translate(
                SearchProfile::Flights,
                &json!({
                    "departure_after": "18:00",
                    "exclude_status": ["cancelled"],
                    "origin": "del",
                    "available_seats": 2,
                    "destination": "bom"
                }),
            )
            .unwrap();

        assert_eq!(
            templates(&t),
            vec![
                "origin = ?",
                "available_seats >= ?",
                "destination = ?",
                "status != ?",
                "CAST(departure_time AS TIME) >= ?",
            ]
        );
        assert_eq!(t.limit, None);
        assert_eq!(t.parameter_count(), 5);
        assert_eq!(t.predicates[0].bound_values(), &[BoundValue::text("DEL")]);
        assert_eq!(t.predicates[3].bound_values(), &[BoundValue::text("CANCELLED")]);
    }

    #[test]
    fn test_unknown_and_null_fields_skipped() {
        let t = FilterTranslator::new(registry())
            .translate(
                SearchProfile::Flights,
                &json!({"gate_color": "red", "origin": null, "meal_service_available": "yes"}),
            )
            .unwrap();
        assert_eq!(templates(&t), vec!["meal_service_available = ?"]);
        assert_eq!(t.predicates[0].bound_values(), &[BoundValue::Bool(true)]);
    }

    #[test]
    fn test_bad_integer_rejected() {
        let err = FilterTranslator::new(registry())
            .translate(SearchProfile::Flights, &json!({"available_seats": "many"}))
            .unwrap_err();
        assert_eq!(err.field(), Some("available_seats"));
    }

    #[test]
    fn test_crew_overrides() {
        let t = FilterTranslator::new(registry())
            .translate(
                SearchProfile::Crew,
                &json!({
                    "role": "pilot",
                    "certifications": "a320",
                    "location": "del",
                    "max_duty_hours": 40,
                    "available_after": "2025-03-01T08:00:00Z"
                }),
            )
            .unwrap();

        assert_eq!(
            templates(&t),
            vec![
                "UPPER(role) = ?",
                "UPPER(certifications) LIKE ?",
                "(UPPER(base_airport) = ? OR UPPER(current_location) = ?)",
                "duty_hours_last_7d < ?",
                "next_legal_availability <= ?",
            ]
        );
        assert_eq!(t.predicates[1].bound_values(), &[BoundValue::text("%A320%")]);
        assert_eq!(t.predicates[2].bound_values().len(), 2);
        assert_eq!(t.predicates[3].bound_values(), &[BoundValue::Float(40.0)]);
        assert_eq!(t.limit, Some(50));
    }

    #[test]
    fn test_crew_availability_wraps_predicates() {
        let t = FilterTranslator::new(registry())
            .translate(SearchProfile::CrewAvailability, &json!({"role": "cabin crew"}))
            .unwrap();
        assert_eq!(
            templates(&t),
            vec![
                "current_status IN (?, ?, ?)",
                "UPPER(role) = ?",
                "duty_hours_last_7d < ?",
            ]
        );
        assert_eq!(t.predicates[2].bound_values(), &[BoundValue::Float(50.0)]);
        assert_eq!(t.limit, Some(20));

        let custom = FilterTranslator::new(registry())
            .translate(SearchProfile::CrewAvailability, &json!({"max_duty_hours": "35.5"}))
            .unwrap();
        assert_eq!(custom.predicates.len(), 2);
        assert_eq!(custom.predicates[1].bound_values(), &[BoundValue::Float(35.5)]);
    }

    #[test]
    fn test_passenger_cased_fields() {
        let t = FilterTranslator::new(registry())
            .translate(
                SearchProfile::Passengers,
                &json!({
                    "email": "Ann@Example.com",
                    "phone": "+91-98x",
                    "loyalty_tier": "gold",
                    "min_age": "65",
                    "limit": 10
                }),
            )
            .unwrap();
        assert_eq!(
            templates(&t),
            vec!["LOWER(email) = ?", "phone = ?", "UPPER(loyalty_tier) = ?", "age >= ?"]
        );
        assert_eq!(t.predicates[0].bound_values(), &[BoundValue::text("ann@example.com")]);
        assert_eq!(t.predicates[1].bound_values(), &[BoundValue::text("+91-98x")]);
        assert_eq!(t.predicates[3].bound_values(), &[BoundValue::Int(65)]);
        assert_eq!(t.limit, Some(10));
    }

    #[test]
    fn test_rule_columns_missing_from_catalog_are_skipped() {
        let empty = FilterTranslator::new(Arc::new(SchemaRegistry::builder().build()));
        let t = empty
            .translate(
                SearchProfile::Flights,
                &json!({"available_seats": 2, "departure_after": "06:00", "exclude_status": ["delayed"]}),
            )
            .unwrap();
        assert!(t.predicates.is_empty());

        let crew = empty
            .translate(
                SearchProfile::Crew,
                &json!({"location": "del", "certifications": "a320", "max_duty_hours": 40}),
            )
            .unwrap();
        assert!(crew.predicates.is_empty());

        let partial = FilterTranslator::new(Arc::new(
            SchemaRegistry::builder()
                .column(Resource::Crew, "base_airport", SemanticType::Text)
                .build(),
        ));
        let t = partial
            .translate(SearchProfile::Crew, &json!({"location": "del"}))
            .unwrap();
        assert!(t.predicates.is_empty());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("A3_0%"), "A3\\_0\\%");
        assert_eq!(escape_like("B737"), "B737");
    }

    #[test]
    fn test_empty_flight_payload_rejected() {
        assert!(FilterTranslator::new(registry())
            .translate(SearchProfile::Flights, &json!({}))
            .is_err());
    }
}
