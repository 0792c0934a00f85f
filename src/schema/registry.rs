//! Read-only schema registry
//!
//! Holds one `ResourceSchema` per resource. Constructed once by
//! `SchemaLoader` (or the builder in tests) and shared behind an `Arc`;
//! there is no interior mutability, so concurrent reads need no locking.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::types::{ColumnSchema, Resource, ResourceSchema, SemanticType};

/// Plain lower-case SQL identifiers only
fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("static identifier pattern"))
}

/// Returns true if `name` may be interpolated into SQL text as an identifier
pub fn is_safe_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

/// Immutable column catalog for every resource
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<Resource, ResourceSchema>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Semantic type of `column`, or `None` when the column is not catalogued.
    pub fn type_of(&self, resource: Resource, column: &str) -> Option<SemanticType> {
        self.schemas
            .get(&resource)
            .and_then(|s| s.column(column))
            .map(|c| c.semantic_type)
    }

    /// Resolves a caller-supplied field name to the registry-owned column
    /// identifier. SQL text is only ever built from the returned value.
    pub fn resolve(&self, resource: Resource, column: &str) -> Option<&ColumnSchema> {
        self.schemas.get(&resource).and_then(|s| s.column(column))
    }

    pub fn schema(&self, resource: Resource) -> Option<&ResourceSchema> {
        self.schemas.get(&resource)
    }

    pub fn contains(&self, resource: Resource) -> bool {
        self.schemas.contains_key(&resource)
    }

    /// Number of resources with a catalog
    pub fn resource_count(&self) -> usize {
        self.schemas.len()
    }
}

/// Builder used by the loader and by tests
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: HashMap<Resource, Vec<ColumnSchema>>,
    rejected: Vec<(Resource, String)>,
}

impl SchemaRegistryBuilder {
    /// Adds a column. Names that are not plain identifiers are recorded as
    /// rejected and never become filterable.
    pub fn column(mut self, resource: Resource, name: &str, semantic_type: SemanticType) -> Self {
        self.push(resource, name, semantic_type);
        self
    }

    /// Adds a column from an `information_schema` data type string
    pub fn catalog_column(mut self, resource: Resource, name: &str, data_type: &str) -> Self {
        self.push(resource, name, SemanticType::from_data_type(data_type));
        self
    }

    fn push(&mut self, resource: Resource, name: &str, semantic_type: SemanticType) {
        if !is_safe_identifier(name) {
            self.rejected.push((resource, name.to_string()));
            return;
        }
        let columns = self.schemas.entry(resource).or_default();
        if columns.iter().all(|c| c.name != name) {
            columns.push(ColumnSchema::new(name, semantic_type));
        }
    }

    /// Columns skipped because their names are not safe identifiers
    pub fn rejected(&self) -> &[(Resource, String)] {
        &self.rejected
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self
                .schemas
                .into_iter()
                .map(|(resource, columns)| (resource, ResourceSchema::new(resource, columns)))
                .collect(),
        }
    }
}
