//! Schema loading
//!
//! At startup the registry is built from `information_schema.columns`
//! through the query surface. The offline `plan` command builds it from a
//! catalog file instead:
//!
//! ```json
//! { "flights": { "flight_no": "character varying", "available_seats": "integer" } }
//! ```
//!
//! A resource table without columns is fatal in both paths.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::registry::{SchemaRegistry, SchemaRegistryBuilder};
use super::types::Resource;
use crate::executor::QuerySurface;
use crate::observability::Event;
use crate::planner::QueryAssembler;

pub struct SchemaLoader;

impl SchemaLoader {
    /// Introspects every resource table. Runs once before serving.
    pub async fn load(surface: &dyn QuerySurface) -> SchemaResult<SchemaRegistry> {
        let assembler = QueryAssembler::new();
        let mut builder = SchemaRegistry::builder();

        for resource in Resource::ALL {
            let table = resource.table_name();
            let rows = surface
                .query(&assembler.columns(table))
                .await
                .map_err(|e| SchemaError::load_failed(table, e.to_string()))?;

            if rows.is_empty() {
                return Err(SchemaError::empty(table));
            }

            for row in &rows {
                let name = row.get("column_name").and_then(Value::as_str);
                let data_type = row.get("data_type").and_then(Value::as_str);
                match (name, data_type) {
                    (Some(name), Some(data_type)) => {
                        builder = builder.catalog_column(resource, name, data_type);
                    }
                    _ => {
                        return Err(SchemaError::load_failed(
                            table,
                            "catalog row without column_name/data_type",
                        ))
                    }
                }
            }

            tracing::info!(event = %Event::SchemaLoaded, table, columns = rows.len());
        }

        Ok(finish(builder))
    }
}

/// Offline column catalog
pub struct CatalogFile;

impl CatalogFile {
    pub fn load(path: &Path) -> SchemaResult<SchemaRegistry> {
        let display = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| SchemaError::malformed(&display, e.to_string()))?;
        Self::parse(&display, &content)
    }

    /// Parses catalog JSON. Unknown table names are ignored; tables that
    /// are absent simply have no filterable columns.
    pub fn parse(source: &str, content: &str) -> SchemaResult<SchemaRegistry> {
        let root: Value =
            serde_json::from_str(content).map_err(|e| SchemaError::malformed(source, e.to_string()))?;
        let tables = root
            .as_object()
            .ok_or_else(|| SchemaError::malformed(source, "top level must be an object"))?;

        let mut builder = SchemaRegistry::builder();
        for (table, columns) in tables {
            let Some(resource) = Resource::ALL.into_iter().find(|r| r.table_name() == table) else {
                tracing::warn!(table = %table, "ignoring unknown table in catalog file");
                continue;
            };
            let columns = columns.as_object().ok_or_else(|| {
                SchemaError::malformed(source, format!("'{}' must map column names to data types", table))
            })?;
            if columns.is_empty() {
                return Err(SchemaError::empty(table.as_str()));
            }
            for (name, data_type) in columns {
                let data_type = data_type.as_str().ok_or_else(|| {
                    SchemaError::malformed(source, format!("data type of '{}.{}' must be a string", table, name))
                })?;
                builder = builder.catalog_column(resource, name, data_type);
            }
        }

        Ok(finish(builder))
    }
}

fn finish(builder: SchemaRegistryBuilder) -> SchemaRegistry {
    for (resource, column) in builder.rejected() {
        tracing::warn!(event = %Event::SchemaColumnRejected, table = %resource, column = %column);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::InMemorySurface;
    use crate::schema::{SchemaErrorCode, SemanticType};

    fn full_surface() -> InMemorySurface {
        InMemorySurface::new()
            .with_table(
                "flights",
                &[("flight_no", "character varying"), ("available_seats", "integer")],
                vec![],
            )
            .with_table("crew", &[("crew_id", "text"), ("duty_hours_last_7d", "numeric")], vec![])
            .with_table("crew_assignments", &[("flight_date", "date")], vec![])
            .with_table(
                "passengers",
                &[("pnr", "text"), ("Bad Column", "text"), ("age", "integer")],
                vec![],
            )
    }

    #[tokio::test]
    async fn test_load_all_resources() {
        let registry = SchemaLoader::load(&full_surface()).await.unwrap();
        assert_eq!(registry.resource_count(), 4);
        assert_eq!(
            registry.type_of(Resource::CrewAssignments, "flight_date"),
            Some(SemanticType::Timestamp)
        );
        assert_eq!(registry.type_of(Resource::Passengers, "Bad Column"), None);
        assert_eq!(registry.type_of(Resource::Passengers, "age"), Some(SemanticType::Integer));
    }

    #[tokio::test]
    async fn test_empty_table_is_fatal() {
        let surface = InMemorySurface::new().with_table("flights", &[("flight_no", "text")], vec![]);
        let err = SchemaLoader::load(&surface).await.unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaEmpty);
        assert_eq!(err.table(), Some("crew"));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_fatal() {
        let err = SchemaLoader::load(&InMemorySurface::unavailable()).await.unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaLoadFailed);
    }

    #[test]
    fn test_catalog_file_parse() {
        let registry = CatalogFile::parse(
            "inline",
            r#"{"flights": {"origin": "text", "available_seats": "integer"}, "gates": {"x": "text"}}"#,
        )
        .unwrap();
        assert_eq!(registry.type_of(Resource::Flights, "available_seats"), Some(SemanticType::Integer));
        assert!(!registry.contains(Resource::Crew));
    }

    #[test]
    fn test_catalog_file_errors() {
        assert_eq!(
            CatalogFile::parse("inline", "[]").unwrap_err().code(),
            SchemaErrorCode::SchemaMalformed
        );
        assert_eq!(
            CatalogFile::parse("inline", r#"{"crew": {}}"#).unwrap_err().code(),
            SchemaErrorCode::SchemaEmpty
        );
        assert_eq!(
            CatalogFile::parse("inline", r#"{"crew": {"role": 3}}"#).unwrap_err().code(),
            SchemaErrorCode::SchemaMalformed
        );
    }

    #[test]
    fn test_catalog_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"passengers": {"pnr": "text"}}"#).unwrap();
        let registry = CatalogFile::load(&path).unwrap();
        assert!(registry.contains(Resource::Passengers));
        assert!(CatalogFile::load(&dir.path().join("missing.json")).is_err());
    }
}
