//! Passenger buckets and priority ordering

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use super::{row_number, row_str};
use crate::executor::Row;
use crate::filter::truthy;

const ELDERLY_AGE: f64 = 65.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierBuckets {
    #[serde(rename = "Platinum")]
    pub platinum: Vec<Row>,
    #[serde(rename = "Gold")]
    pub gold: Vec<Row>,
    #[serde(rename = "Silver")]
    pub silver: Vec<Row>,
    #[serde(rename = "None")]
    pub none: Vec<Row>,
}

/// Passengers sharing one PNR
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyGroup {
    pub pnr: String,
    pub passenger_count: usize,
    pub passengers: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassengerCategories {
    pub total_count: usize,
    pub by_tier: TierBuckets,
    /// Rows with a non-empty needs list, each carrying `needs_list`
    pub special_needs: Vec<Row>,
    pub elderly: Vec<Row>,
    pub families: Vec<FamilyGroup>,
    pub wheelchair_required: Vec<Row>,
    /// Every passenger once, tagged with `priority_category`
    pub priority_order: Vec<Row>,
}

pub fn categorize_passengers(passengers: &[Row]) -> PassengerCategories {
    let mut out = PassengerCategories {
        total_count: passengers.len(),
        ..Default::default()
    };
    // (row index, entry) pairs so priority dedup can fall back to position
    let mut wheelchair = Vec::new();
    let mut platinum = Vec::new();
    let mut elderly = Vec::new();
    let mut gold = Vec::new();
    let mut special = Vec::new();
    let mut silver = Vec::new();
    let mut standard = Vec::new();
    let mut pnr_groups: Vec<(String, Vec<Row>)> = Vec::new();

    for (index, passenger) in passengers.iter().enumerate() {
        match tier_of(passenger) {
            Tier::Platinum => platinum.push(index),
            Tier::Gold => gold.push(index),
            Tier::Silver => silver.push(index),
            Tier::None => standard.push(index),
        }

        let needs = needs_list(passenger.get("special_needs"));
        if !needs.is_empty() {
            let mut entry = passenger.clone();
            entry.insert("needs_list".to_string(), Value::Array(needs));
            special.push((index, entry));
        }

        if row_number(passenger.get("age")).is_some_and(|age| age >= ELDERLY_AGE) {
            elderly.push(index);
        }

        if passenger
            .get("wheelchair_or_medical_time_required")
            .is_some_and(truthy)
        {
            wheelchair.push(index);
        }

        if let Some(pnr) = row_str(passenger.get("pnr")).filter(|p| !p.is_empty()) {
            match pnr_groups.iter_mut().find(|(key, _)| key == pnr) {
                Some((_, group)) => group.push(passenger.clone()),
                None => pnr_groups.push((pnr.to_string(), vec![passenger.clone()])),
            }
        }
    }

    let rows = |indices: &[usize]| -> Vec<(usize, Row)> {
        indices.iter().map(|&i| (i, passengers[i].clone())).collect()
    };

    let buckets: [(&str, Vec<(usize, Row)>); 7] = [
        ("Wheelchair/Medical", rows(&wheelchair)),
        ("Platinum Tier", rows(&platinum)),
        ("Elderly (65+)", rows(&elderly)),
        ("Gold Tier", rows(&gold)),
        ("Special Needs", special.clone()),
        ("Silver Tier", rows(&silver)),
        ("Standard", rows(&standard)),
    ];

    let mut seen = HashSet::new();
    for (category, bucket) in buckets {
        for (index, mut entry) in bucket {
            if !seen.insert(identity(&passengers[index], index)) {
                continue;
            }
            entry.insert(
                "priority_category".to_string(),
                Value::String(category.to_string()),
            );
            out.priority_order.push(entry);
        }
    }

    out.by_tier = TierBuckets {
        platinum: rows(&platinum).into_iter().map(|(_, r)| r).collect(),
        gold: rows(&gold).into_iter().map(|(_, r)| r).collect(),
        silver: rows(&silver).into_iter().map(|(_, r)| r).collect(),
        none: rows(&standard).into_iter().map(|(_, r)| r).collect(),
    };
    out.special_needs = special.into_iter().map(|(_, r)| r).collect();
    out.elderly = rows(&elderly).into_iter().map(|(_, r)| r).collect();
    out.wheelchair_required = rows(&wheelchair).into_iter().map(|(_, r)| r).collect();
    out.families = pnr_groups
        .into_iter()
        .filter(|(_, group)| group.len() >= 2)
        .map(|(pnr, group)| FamilyGroup {
            pnr,
            passenger_count: group.len(),
            passengers: group,
        })
        .collect();

    out
}

enum Tier {
    Platinum,
    Gold,
    Silver,
    None,
}

fn tier_of(passenger: &Row) -> Tier {
    match row_str(passenger.get("loyalty_tier"))
        .map(|t| t.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("platinum") => Tier::Platinum,
        Some("gold") => Tier::Gold,
        Some("silver") => Tier::Silver,
        _ => Tier::None,
    }
}

/// `passenger_id`, or the row position when the id is missing
fn identity(passenger: &Row, index: usize) -> String {
    match passenger.get("passenger_id") {
        Some(Value::String(id)) => format!("id:{}", id),
        Some(Value::Number(id)) => format!("id:{}", id),
        _ => format!("row:{}", index),
    }
}

/// Native JSON list, or a string holding one. Anything else is empty.
fn needs_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
