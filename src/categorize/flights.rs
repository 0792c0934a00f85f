//! Flight presentation and grouping

use serde::Serialize;
use serde_json::{Map, Value};

use crate::executor::Row;
use crate::filter::truthy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightPresentation {
    pub title: String,
    pub body: String,
}

/// Document-style title and body for one flight row. Missing fields render
/// as `N/A`.
pub fn format_flight(row: &Row) -> FlightPresentation {
    let field = |name: &str| display(row.get(name));
    let meal = if row.get("meal_service_available").is_some_and(truthy) {
        "Yes"
    } else {
        "No"
    };

    FlightPresentation {
        title: format!(
            "{} | {} → {}",
            field("flight_no"),
            field("origin"),
            field("destination")
        ),
        body: format!(
            "Flight {} from {} to {}. Status: {}. Seats Available: {}. Gate: {}, Terminal: {}. Meal Service: {}.",
            field("flight_no"),
            field("origin"),
            field("destination"),
            field("status"),
            field("available_seats"),
            field("gate"),
            field("terminal"),
            meal
        ),
    }
}

/// Search result entry: `title`, `body`, then every row field
pub fn present_flight(row: &Row) -> Row {
    let FlightPresentation { title, body } = format_flight(row);
    let mut out = Map::with_capacity(row.len() + 2);
    out.insert("title".to_string(), Value::String(title));
    out.insert("body".to_string(), Value::String(body));
    for (key, value) in row {
        out.insert(key.clone(), value.clone());
    }
    out
}

/// Rows keyed by `status`, in first-seen order. Rows without a status go
/// under `UNKNOWN`.
pub fn status_groups(rows: &[Row]) -> Map<String, Value> {
    let mut groups = Map::new();
    for row in rows {
        let status = row
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_string();
        if let Value::Array(items) = groups
            .entry(status)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            items.push(Value::Object(row.clone()));
        }
    }
    groups
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ai101() -> Row {
        json!({
            "flight_no": "AI101",
            "origin": "DEL",
            "destination": "BOM",
            "status": "ON_TIME",
            "available_seats": 3,
            "gate": "A4",
            "terminal": "T3",
            "meal_service_available": true
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_format_flight() {
        let p = format_flight(&ai101());
        assert_eq!(p.title, "AI101 | DEL → BOM");
        assert_eq!(
            p.body,
            "Flight AI101 from DEL to BOM. Status: ON_TIME. Seats Available: 3. \
             Gate: A4, Terminal: T3. Meal Service: Yes."
        );
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let mut row = ai101();
        row.remove("gate");
        row.insert("meal_service_available".into(), Value::Null);
        let p = format_flight(&row);
        assert!(p.body.contains("Gate: N/A"));
        assert!(p.body.ends_with("Meal Service: No."));
    }

    #[test]
    fn test_present_flight_keeps_row_fields() {
        let presented = present_flight(&ai101());
        let keys: Vec<&String> = presented.keys().take(3).collect();
        assert_eq!(keys, vec!["title", "body", "flight_no"]);
        assert_eq!(presented["available_seats"], 3);
    }

    #[test]
    fn test_status_groups() {
        let mut delayed = ai101();
        delayed.insert("status".into(), json!("DELAYED"));
        let groups = status_groups(&[ai101(), delayed, ai101()]);
        assert_eq!(groups["ON_TIME"].as_array().unwrap().len(), 2);
        assert_eq!(groups["DELAYED"].as_array().unwrap().len(), 1);
    }
}
