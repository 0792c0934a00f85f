//! Filter Translation Properties
//!
//! - Unknown keys never change the predicate list
//! - Text filters bind upper-cased input
//! - `available_seats` always compares with `>=`
//! - Bound parameters come in the order: fields, exclusions, time bounds

mod common;

use std::sync::Arc;

use flightdesk::filter::{FilterTranslator, SearchProfile};
use flightdesk::planner::{BoundValue, CompareOp};
use flightdesk::schema::{Resource, SchemaRegistry};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn registry() -> Arc<SchemaRegistry> {
    let tables = [
        (Resource::Flights, common::FLIGHT_COLUMNS),
        (Resource::Crew, common::CREW_COLUMNS),
        (Resource::CrewAssignments, common::ASSIGNMENT_COLUMNS),
        (Resource::Passengers, common::PASSENGER_COLUMNS),
    ];
    let mut builder = SchemaRegistry::builder();
    for (resource, columns) in tables {
        for (name, data_type) in columns {
            builder = builder.catalog_column(resource, name, data_type);
        }
    }
    Arc::new(builder.build())
}

fn translator() -> FilterTranslator {
    FilterTranslator::new(registry())
}

fn profiles() -> impl Strategy<Value = SearchProfile> {
    prop_oneof![
        Just(SearchProfile::Flights),
        Just(SearchProfile::Crew),
        Just(SearchProfile::CrewAvailability),
        Just(SearchProfile::Assignments),
        Just(SearchProfile::Passengers),
    ]
}

/// Field names no catalog or rule table knows about
fn unknown_keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("zz_[a-z]{1,8}", 1..4)
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,10}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn unknown_keys_never_change_predicates(
        profile in profiles(),
        keys in unknown_keys(),
        values in prop::collection::vec(scalar(), 4),
    ) {
        let base = json!({"limit": 5, "role": "pilot", "origin": "del"});
        let mut noisy: Map<String, Value> = base.as_object().cloned().unwrap();
        for (key, value) in keys.iter().zip(values.iter().cycle()) {
            noisy.insert(key.clone(), value.clone());
        }

        let t = translator();
        let expected = t.translate(profile, &base).unwrap();
        let actual = t.translate(profile, &Value::Object(noisy)).unwrap();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn text_filters_bind_upper_cased_input(origin in "[a-z][a-zA-Z0-9]{0,7}") {
        let t = translator()
            .translate(SearchProfile::Flights, &json!({"origin": origin.clone()}))
            .unwrap();
        prop_assert_eq!(t.predicates.len(), 1);
        prop_assert_eq!(
            t.predicates[0].bound_values(),
            &[BoundValue::Text(origin.to_uppercase())][..]
        );
    }

    #[test]
    fn crew_text_filters_bind_upper_cased_input(role in "[a-z ]{1,12}") {
        let t = translator()
            .translate(SearchProfile::Crew, &json!({"role": role.clone()}))
            .unwrap();
        prop_assert_eq!(t.predicates[0].template(), "UPPER(role) = ?");
        prop_assert_eq!(
            t.predicates[0].bound_values(),
            &[BoundValue::Text(role.to_uppercase())][..]
        );
    }

    #[test]
    fn available_seats_is_a_lower_bound(seats in 0i64..500) {
        let t = translator()
            .translate(SearchProfile::Flights, &json!({"available_seats": seats}))
            .unwrap();
        prop_assert_eq!(t.predicates[0].op(), Some(CompareOp::Gte));
        prop_assert_eq!(t.predicates[0].template(), "available_seats >= ?");
        prop_assert_eq!(t.predicates[0].bound_values(), &[BoundValue::Int(seats)][..]);
    }

    #[test]
    fn parameters_follow_fields_exclusions_time_bounds(
        excluded in prop::collection::vec("[a-z]{3,9}", 0..4),
        with_origin in any::<bool>(),
        with_departure in any::<bool>(),
    ) {
        let mut payload = Map::new();
        payload.insert("exclude_status".into(), json!(excluded.clone()));
        if with_origin {
            payload.insert("origin".into(), json!("del"));
        }
        if with_departure {
            payload.insert("departure_after".into(), json!("06:30"));
        }
        prop_assume!(with_origin || with_departure || !excluded.is_empty());

        let t = translator()
            .translate(SearchProfile::Flights, &Value::Object(payload))
            .unwrap();

        let generic = usize::from(with_origin);
        let bounds = usize::from(with_departure);
        prop_assert_eq!(t.parameter_count(), generic + excluded.len() + bounds);

        let params: Vec<&BoundValue> = t.predicates.iter().flat_map(|p| p.bound_values()).collect();
        if with_origin {
            prop_assert_eq!(params[0], &BoundValue::text("DEL"));
        }
        for (i, status) in excluded.iter().enumerate() {
            prop_assert_eq!(params[generic + i], &BoundValue::Text(status.to_uppercase()));
        }
        if with_departure {
            prop_assert!(matches!(params[params.len() - 1], BoundValue::Time(_)));
        }
    }
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_flight_search_requires_a_filter() {
    let t = translator();
    assert!(t.translate(SearchProfile::Flights, &json!({})).is_err());
    assert!(t.translate(SearchProfile::Flights, &Value::Null).is_err());
    assert!(t.translate(SearchProfile::Flights, &json!(["origin"])).is_err());
}

#[test]
fn test_other_profiles_accept_empty_payload() {
    let t = translator();
    let crew = t.translate(SearchProfile::Crew, &json!({})).unwrap();
    assert!(crew.predicates.is_empty());
    assert_eq!(crew.limit, Some(50));

    let passengers = t.translate(SearchProfile::Passengers, &Value::Null).unwrap();
    assert_eq!(passengers.limit, Some(100));
}

#[test]
fn test_negative_limit_rejected() {
    let err = translator()
        .translate(SearchProfile::Crew, &json!({"limit": -1}))
        .unwrap_err();
    assert_eq!(err.field(), Some("limit"));
}
