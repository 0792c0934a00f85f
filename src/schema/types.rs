//! Schema type definitions
//!
//! Semantic types (the coercion target of a filter value):
//! - TEXT: canonicalized to upper case
//! - BOOLEAN: native or tolerant string mapping
//! - INTEGER: number or numeric string, truncated toward zero
//! - NUMERIC: floating point
//! - TIMESTAMP: ISO-8601 date or date-time

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized category a filter value is coerced to before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SemanticType {
    Text,
    Boolean,
    Integer,
    Numeric,
    Timestamp,
}

impl SemanticType {
    /// Maps an `information_schema.columns.data_type` string.
    ///
    /// Types without a dedicated coercion (json, arrays, time, user defined)
    /// fall back to TEXT.
    pub fn from_data_type(data_type: &str) -> Self {
        let dt = data_type.trim().to_ascii_lowercase();

        if dt.starts_with("timestamp") || dt == "date" {
            SemanticType::Timestamp
        } else if dt == "boolean" || dt == "bool" {
            SemanticType::Boolean
        } else if matches!(dt.as_str(), "smallint" | "integer" | "bigint" | "int" | "int2" | "int4" | "int8")
        {
            SemanticType::Integer
        } else if dt.starts_with("numeric")
            || dt.starts_with("decimal")
            || dt == "real"
            || dt.starts_with("double")
            || dt == "float4"
            || dt == "float8"
        {
            SemanticType::Numeric
        } else {
            SemanticType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Text => "TEXT",
            SemanticType::Boolean => "BOOLEAN",
            SemanticType::Integer => "INTEGER",
            SemanticType::Numeric => "NUMERIC",
            SemanticType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table-like entity with its own schema and search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Flights,
    Crew,
    CrewAssignments,
    Passengers,
}

impl Resource {
    /// All resources, in startup load order
    pub const ALL: [Resource; 4] = [
        Resource::Flights,
        Resource::Crew,
        Resource::CrewAssignments,
        Resource::Passengers,
    ];

    /// Fixed resource-to-table mapping. The only source of table names in
    /// generated SQL.
    pub fn table_name(&self) -> &'static str {
        match self {
            Resource::Flights => "flights",
            Resource::Crew => "crew",
            Resource::CrewAssignments => "crew_assignments",
            Resource::Passengers => "passengers",
        }
    }

    /// Primary identifier column
    pub fn id_column(&self) -> &'static str {
        match self {
            Resource::Flights => "flight_no",
            Resource::Crew => "crew_id",
            Resource::CrewAssignments => "assignment_id",
            Resource::Passengers => "passenger_id",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// One catalogued column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub semantic_type: SemanticType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}

/// Column catalog of a single resource, in ordinal order
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    resource: Resource,
    columns: Vec<ColumnSchema>,
    by_name: HashMap<String, usize>,
}

impl ResourceSchema {
    pub fn new(resource: Resource, columns: Vec<ColumnSchema>) -> Self {
        let by_name = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self {
            resource,
            columns,
            by_name,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.by_name.get(name).map(|&i| &self.columns[i])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
