//! PostgreSQL query surface
//!
//! Opens one connection per request (or per batch) and drops it when the
//! request finishes. TLS through rustls is used when the connection string
//! asks for `sslmode=require`.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, Config, NoTls};
use tokio_postgres_rustls::MakeRustlsConnect;

use super::errors::{SurfaceError, SurfaceResult};
use super::surface::{QuerySurface, Row};
use crate::planner::{BoundValue, Statement};

type Param = Box<dyn ToSql + Sync + Send>;

pub struct PostgresSurface {
    config: Config,
    tls: Option<MakeRustlsConnect>,
}

impl PostgresSurface {
    /// Parses the connection string. No connection is opened here.
    pub fn new(database_url: &str) -> SurfaceResult<Self> {
        let config: Config = database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| SurfaceError::connection(e.to_string()))?;

        let tls = match config.get_ssl_mode() {
            SslMode::Require => Some(rustls_connector()?),
            _ => None,
        };

        Ok(Self { config, tls })
    }

    pub fn uses_tls(&self) -> bool {
        self.tls.is_some()
    }

    async fn connect(&self) -> SurfaceResult<Client> {
        match &self.tls {
            Some(tls) => {
                let (client, connection) = self
                    .config
                    .connect(tls.clone())
                    .await
                    .map_err(|e| SurfaceError::connection(e.to_string()))?;
                drive(connection);
                Ok(client)
            }
            None => {
                let (client, connection) = self
                    .config
                    .connect(NoTls)
                    .await
                    .map_err(|e| SurfaceError::connection(e.to_string()))?;
                drive(connection);
                Ok(client)
            }
        }
    }

    async fn execute(client: &Client, statement: &Statement) -> SurfaceResult<Vec<Row>> {
        let prepared = client.prepare(&statement.text).await?;

        if prepared.params().len() != statement.params.len() {
            return Err(SurfaceError::bind(
                statement.params.len(),
                format!(
                    "statement expects {} parameters, {} bound",
                    prepared.params().len(),
                    statement.params.len()
                ),
            ));
        }

        let params: Vec<Param> = statement
            .params
            .iter()
            .zip(prepared.params())
            .enumerate()
            .map(|(i, (value, ty))| to_param(i + 1, value, ty))
            .collect::<SurfaceResult<_>>()?;
        let refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        client
            .query(&prepared, &refs)
            .await?
            .iter()
            .map(decode_row)
            .collect()
    }
}

#[async_trait]
impl QuerySurface for PostgresSurface {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn query(&self, statement: &Statement) -> SurfaceResult<Vec<Row>> {
        let client = self.connect().await?;
        Self::execute(&client, statement).await
    }

    async fn query_batch(&self, statements: &[Statement]) -> SurfaceResult<Vec<Vec<Row>>> {
        let client = self.connect().await?;
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            results.push(Self::execute(&client, statement).await?);
        }
        Ok(results)
    }
}

fn rustls_connector() -> SurfaceResult<MakeRustlsConnect> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| SurfaceError::connection(format!("tls setup: {}", e)))?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(MakeRustlsConnect::new(config))
}

/// Runs the connection task until the client is dropped
fn drive<F>(connection: F)
where
    F: Future<Output = Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!(error = %super::errors::redact_credentials(&e.to_string()), "postgres connection closed with error");
        }
    });
}

fn to_param(index: usize, value: &BoundValue, ty: &Type) -> SurfaceResult<Param> {
    let mismatch = || SurfaceError::bind(index, format!("cannot bind {:?} as {}", value, ty.name()));

    let param: Param = match (value, ty) {
        (BoundValue::Bool(b), &Type::BOOL) => Box::new(*b),
        (BoundValue::Int(i), &Type::INT2) => Box::new(i16::try_from(*i).map_err(|_| mismatch())?),
        (BoundValue::Int(i), &Type::INT4) => Box::new(i32::try_from(*i).map_err(|_| mismatch())?),
        (BoundValue::Int(i), &Type::INT8) => Box::new(*i),
        (BoundValue::Int(i), &Type::FLOAT4) => Box::new(*i as f32),
        (BoundValue::Int(i), &Type::FLOAT8) => Box::new(*i as f64),
        (BoundValue::Int(i), &Type::NUMERIC) => Box::new(Decimal::from(*i)),
        (BoundValue::Float(f), &Type::FLOAT4) => Box::new(*f as f32),
        (BoundValue::Float(f), &Type::FLOAT8) => Box::new(*f),
        (BoundValue::Float(f), &Type::NUMERIC) => Box::new(numeric(*f).ok_or_else(mismatch)?),
        (BoundValue::Float(f), &Type::INT2 | &Type::INT4 | &Type::INT8) if f.fract() == 0.0 => {
            return to_param(index, &BoundValue::Int(*f as i64), ty);
        }
        (BoundValue::Timestamp(ts), &Type::TIMESTAMP) => Box::new(*ts),
        (BoundValue::Timestamp(ts), &Type::TIMESTAMPTZ) => Box::new(ts.and_utc()),
        (BoundValue::Timestamp(ts), &Type::DATE) => Box::new(ts.date()),
        (BoundValue::Time(t), &Type::TIME) => Box::new(*t),
        (BoundValue::Text(s), _) => Box::new(s.clone()),
        _ => return Err(mismatch()),
    };
    Ok(param)
}

/// Shortest decimal text of the float, so `40.1` binds as exactly `40.1`.
fn numeric(f: f64) -> Option<Decimal> {
    f.to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(f))
}

fn decode_row(row: &tokio_postgres::Row) -> SurfaceResult<Row> {
    let mut out = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let decode_err = |e: tokio_postgres::Error| SurfaceError::decode(column.name(), e.to_string());
        let ty = column.type_();

        let value = match *ty {
            Type::BOOL => row.try_get::<_, Option<bool>>(i).map_err(decode_err)?.map(Value::from),
            Type::INT2 => row.try_get::<_, Option<i16>>(i).map_err(decode_err)?.map(Value::from),
            Type::INT4 => row.try_get::<_, Option<i32>>(i).map_err(decode_err)?.map(Value::from),
            Type::INT8 => row.try_get::<_, Option<i64>>(i).map_err(decode_err)?.map(Value::from),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(i)
                .map_err(decode_err)?
                .map(|f| Value::from(f as f64)),
            Type::FLOAT8 => row.try_get::<_, Option<f64>>(i).map_err(decode_err)?.map(Value::from),
            Type::NUMERIC => row
                .try_get::<_, Option<Decimal>>(i)
                .map_err(decode_err)?
                .and_then(|d| d.to_f64())
                .map(Value::from),
            Type::TIMESTAMP => row
                .try_get::<_, Option<NaiveDateTime>>(i)
                .map_err(decode_err)?
                .map(|ts| Value::String(ts.format("%Y-%m-%dT%H:%M:%S").to_string())),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<DateTime<Utc>>>(i)
                .map_err(decode_err)?
                .map(|ts| Value::String(ts.to_rfc3339_opts(SecondsFormat::Secs, true))),
            Type::DATE => row
                .try_get::<_, Option<NaiveDate>>(i)
                .map_err(decode_err)?
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
            Type::TIME => row
                .try_get::<_, Option<NaiveTime>>(i)
                .map_err(decode_err)?
                .map(|t| Value::String(t.format("%H:%M:%S").to_string())),
            Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(i).map_err(decode_err)?,
            Type::TEXT_ARRAY | Type::VARCHAR_ARRAY => row
                .try_get::<_, Option<Vec<Option<String>>>>(i)
                .map_err(decode_err)?
                .map(|items| Value::Array(items.into_iter().map(|s| s.map_or(Value::Null, Value::String)).collect())),
            _ => row
                .try_get::<_, Option<String>>(i)
                .map_err(decode_err)?
                .map(Value::String),
        };

        out.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Ok(out)
}
