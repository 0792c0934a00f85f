//! Declarative per-resource filter rules
//!
//! Each search profile names its table, the fold applied to generic text
//! columns, field overrides, the reserved exclusion key, time-of-day
//! bounds and limits. Columns named here are static identifiers; every
//! other column must come from the schema registry.

use crate::planner::{ColumnFold, CompareOp};
use crate::schema::{Resource, SemanticType};

/// The search endpoints, each with its own rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchProfile {
    Flights,
    Crew,
    CrewAvailability,
    Assignments,
    Passengers,
}

impl SearchProfile {
    pub fn rules(&self) -> &'static ResourceRules {
        match self {
            SearchProfile::Flights => &FLIGHTS,
            SearchProfile::Crew => &CREW,
            SearchProfile::CrewAvailability => &CREW_AVAILABILITY,
            SearchProfile::Assignments => &ASSIGNMENTS,
            SearchProfile::Passengers => &PASSENGERS,
        }
    }

    pub fn resource(&self) -> Resource {
        self.rules().resource
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "flights" | "flight" => Some(SearchProfile::Flights),
            "crew" => Some(SearchProfile::Crew),
            "crew_available" | "crew_availability" | "available_crew" => {
                Some(SearchProfile::CrewAvailability)
            }
            "assignments" | "crew_assignments" => Some(SearchProfile::Assignments),
            "passengers" | "passenger" => Some(SearchProfile::Passengers),
            _ => None,
        }
    }
}

/// How one override field becomes a predicate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRule {
    /// `<fold(column)> <op> ?`, value coerced to `semantic_type`
    Compare {
        column: &'static str,
        op: CompareOp,
        fold: ColumnFold,
        semantic_type: SemanticType,
    },
    /// Text bound with its own case. `Lower` binds lower-case, `None` verbatim.
    CasedText {
        column: &'static str,
        fold: ColumnFold,
    },
    /// `UPPER(column) LIKE ?` bound to `%VALUE%`
    Contains { column: &'static str },
    /// Equality against any of the columns, value bound once per column
    AnyOf { columns: &'static [&'static str] },
}

impl FieldRule {
    /// Catalog columns the rule reads
    pub fn columns(&self) -> &[&'static str] {
        match self {
            FieldRule::Compare { column, .. }
            | FieldRule::CasedText { column, .. }
            | FieldRule::Contains { column } => std::slice::from_ref(column),
            FieldRule::AnyOf { columns } => *columns,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOverride {
    pub field: &'static str,
    pub rule: FieldRule,
}

/// Reserved list key producing `<column> != ?` per element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionRule {
    pub key: &'static str,
    pub column: &'static str,
}

/// Reserved key producing `CAST(<column> AS TIME) <op> ?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBoundRule {
    pub key: &'static str,
    pub column: &'static str,
    pub op: CompareOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRules {
    pub resource: Resource,
    /// Fold applied to generic TEXT columns
    pub text_fold: ColumnFold,
    pub overrides: &'static [FieldOverride],
    pub exclusion: Option<ExclusionRule>,
    /// Applied in this order after all other predicates
    pub time_bounds: &'static [TimeBoundRule],
    pub default_limit: Option<i64>,
    /// Reject a payload with no keys at all
    pub requires_filters: bool,
    /// Leading `current_status IN (...)` predicate
    pub status_in: &'static [&'static str],
    /// Trailing `duty_hours_last_7d < ?`, with the fallback ceiling
    pub duty_ceiling: Option<f64>,
}

impl ResourceRules {
    pub fn override_for(&self, field: &str) -> Option<&FieldRule> {
        self.overrides
            .iter()
            .find(|o| o.field == field)
            .map(|o| &o.rule)
    }

    /// True for keys consumed before generic field matching
    pub fn is_reserved(&self, key: &str) -> bool {
        key == "limit"
            || self.exclusion.is_some_and(|e| e.key == key)
            || self.time_bounds.iter().any(|b| b.key == key)
    }
}

pub const MAX_DUTY_FIELD: &str = "max_duty_hours";
pub const STATUS_COLUMN: &str = "current_status";
pub const DUTY_COLUMN: &str = "duty_hours_last_7d";

const CREW_OVERRIDES: &[FieldOverride] = &[
    FieldOverride {
        field: "certifications",
        rule: FieldRule::Contains {
            column: "certifications",
        },
    },
    FieldOverride {
        field: "certifications_required",
        rule: FieldRule::Contains {
            column: "certifications",
        },
    },
    FieldOverride {
        field: MAX_DUTY_FIELD,
        rule: FieldRule::Compare {
            column: DUTY_COLUMN,
            op: CompareOp::Lt,
            fold: ColumnFold::None,
            semantic_type: SemanticType::Numeric,
        },
    },
    FieldOverride {
        field: "location",
        rule: FieldRule::AnyOf {
            columns: &["base_airport", "current_location"],
        },
    },
    FieldOverride {
        field: "available_after",
        rule: FieldRule::Compare {
            column: "next_legal_availability",
            op: CompareOp::Lte,
            fold: ColumnFold::None,
            semantic_type: SemanticType::Timestamp,
        },
    },
    FieldOverride {
        field: "available_before",
        rule: FieldRule::Compare {
            column: "next_legal_availability",
            op: CompareOp::Gte,
            fold: ColumnFold::None,
            semantic_type: SemanticType::Timestamp,
        },
    },
];

const CREW_EXCLUSION: ExclusionRule = ExclusionRule {
    key: "exclude_status",
    column: STATUS_COLUMN,
};

pub static FLIGHTS: ResourceRules = ResourceRules {
    resource: Resource::Flights,
    text_fold: ColumnFold::None,
    overrides: &[FieldOverride {
        field: "available_seats",
        rule: FieldRule::Compare {
            column: "available_seats",
            op: CompareOp::Gte,
            fold: ColumnFold::None,
            semantic_type: SemanticType::Integer,
        },
    }],
    exclusion: Some(ExclusionRule {
        key: "exclude_status",
        column: "status",
    }),
    time_bounds: &[
        TimeBoundRule {
            key: "departure_after",
            column: "departure_time",
            op: CompareOp::Gte,
        },
        TimeBoundRule {
            key: "departure_before",
            column: "departure_time",
            op: CompareOp::Lte,
        },
        TimeBoundRule {
            key: "arrival_after",
            column: "arrival_time",
            op: CompareOp::Gte,
        },
        TimeBoundRule {
            key: "arrival_before",
            column: "arrival_time",
            op: CompareOp::Lte,
        },
    ],
    default_limit: None,
    requires_filters: true,
    status_in: &[],
    duty_ceiling: None,
};

pub static CREW: ResourceRules = ResourceRules {
    resource: Resource::Crew,
    text_fold: ColumnFold::Upper,
    overrides: CREW_OVERRIDES,
    exclusion: Some(CREW_EXCLUSION),
    time_bounds: &[],
    default_limit: Some(50),
    requires_filters: false,
    status_in: &[],
    duty_ceiling: None,
};

pub static CREW_AVAILABILITY: ResourceRules = ResourceRules {
    resource: Resource::Crew,
    text_fold: ColumnFold::Upper,
    overrides: CREW_OVERRIDES,
    exclusion: Some(CREW_EXCLUSION),
    time_bounds: &[],
    default_limit: Some(20),
    requires_filters: false,
    status_in: &["AVAILABLE", "STANDBY_AIRPORT", "STANDBY_HOME"],
    duty_ceiling: Some(50.0),
};

pub static ASSIGNMENTS: ResourceRules = ResourceRules {
    resource: Resource::CrewAssignments,
    text_fold: ColumnFold::Upper,
    overrides: &[
        FieldOverride {
            field: "flight_date_after",
            rule: FieldRule::Compare {
                column: "flight_date",
                op: CompareOp::Gte,
                fold: ColumnFold::None,
                semantic_type: SemanticType::Timestamp,
            },
        },
        FieldOverride {
            field: "flight_date_before",
            rule: FieldRule::Compare {
                column: "flight_date",
                op: CompareOp::Lte,
                fold: ColumnFold::None,
                semantic_type: SemanticType::Timestamp,
            },
        },
    ],
    exclusion: None,
    time_bounds: &[],
    default_limit: Some(100),
    requires_filters: false,
    status_in: &[],
    duty_ceiling: None,
};

pub static PASSENGERS: ResourceRules = ResourceRules {
    resource: Resource::Passengers,
    text_fold: ColumnFold::Upper,
    overrides: &[
        FieldOverride {
            field: "min_age",
            rule: FieldRule::Compare {
                column: "age",
                op: CompareOp::Gte,
                fold: ColumnFold::None,
                semantic_type: SemanticType::Integer,
            },
        },
        FieldOverride {
            field: "email",
            rule: FieldRule::CasedText {
                column: "email",
                fold: ColumnFold::Lower,
            },
        },
        FieldOverride {
            field: "phone",
            rule: FieldRule::CasedText {
                column: "phone",
                fold: ColumnFold::None,
            },
        },
    ],
    exclusion: None,
    time_bounds: &[],
    default_limit: Some(100),
    requires_filters: false,
    status_in: &[],
    duty_ceiling: None,
};
