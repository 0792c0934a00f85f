//! Request pipeline per resource
//!
//! translate → assemble → execute → categorize. Each public method is one
//! endpoint's worth of work and returns its response body.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde_json::Value;

use super::errors::{ServiceError, ServiceResult};
use super::lookup::Lookup;
use super::planner::SearchPlanner;
use super::responses::{
    AssignmentSearch, AvailableCrew, CrewDetail, CrewSearch, FlightCategories, FlightCrew,
    FlightPassengers, FlightSearch, Health, PassengerSearch, PnrGroup, RouteList,
};
use crate::categorize::{
    build_roster, categorize_availability, categorize_crew, categorize_passengers, present_flight,
    status_groups,
};
use crate::executor::{QuerySurface, Row};
use crate::filter::SearchProfile;
use crate::observability::Event;
use crate::planner::Statement;
use crate::schema::{Resource, SchemaRegistry};

pub struct SearchService {
    registry: Arc<SchemaRegistry>,
    surface: Arc<dyn QuerySurface>,
    planner: SearchPlanner,
}

impl SearchService {
    pub fn new(registry: Arc<SchemaRegistry>, surface: Arc<dyn QuerySurface>) -> Self {
        Self {
            planner: SearchPlanner::new(Arc::clone(&registry)),
            registry,
            surface,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    // ==================
    // Flights
    // ==================

    pub async fn search_flights(&self, payload: &Value) -> ServiceResult<FlightSearch> {
        let rows = self.search(SearchProfile::Flights, payload).await?;
        let categorized = FlightCategories {
            by_status: status_groups(&rows),
        };
        Ok(FlightSearch {
            count: rows.len(),
            message: rows
                .is_empty()
                .then(|| "No matching flights found".to_string()),
            search_results: rows.iter().map(present_flight).collect(),
            categorized,
        })
    }

    pub async fn flight(&self, flight_no: &str) -> ServiceResult<Lookup<Row>> {
        let statement = self.planner.assembler().lookup(Resource::Flights, flight_no);
        let row = self.run(&statement).await?.into_iter().next();
        Ok(self.found(Resource::Flights, flight_no, row))
    }

    pub async fn routes(&self) -> ServiceResult<RouteList> {
        let routes = self.run(&self.planner.assembler().routes()).await?;
        Ok(RouteList {
            count: routes.len(),
            routes,
        })
    }

    // ==================
    // Crew
    // ==================

    pub async fn search_crew(&self, payload: &Value) -> ServiceResult<CrewSearch> {
        let crew = self.search(SearchProfile::Crew, payload).await?;
        Ok(CrewSearch {
            search_criteria: payload.clone(),
            count: crew.len(),
            categorized: categorize_crew(&crew, now()),
            crew,
        })
    }

    pub async fn available_crew(&self, payload: &Value) -> ServiceResult<AvailableCrew> {
        let crew = self.search(SearchProfile::CrewAvailability, payload).await?;
        Ok(AvailableCrew {
            search_criteria: payload.clone(),
            count: crew.len(),
            categorized: categorize_availability(&crew, now()),
            available_crew: crew,
        })
    }

    /// Crew member plus all of their assignments, newest first
    pub async fn crew_detail(&self, crew_id: &str) -> ServiceResult<Lookup<CrewDetail>> {
        let assembler = self.planner.assembler();
        let mut results = self
            .run_batch(&[
                assembler.lookup(Resource::Crew, crew_id),
                assembler.lookup_all(Resource::CrewAssignments, "crew_id", crew_id),
            ])
            .await?
            .into_iter();

        let crew = results.next().and_then(|rows| rows.into_iter().next());
        let assignments = results.next().unwrap_or_default();

        Ok(self
            .found(Resource::Crew, crew_id, crew)
            .map(|crew| CrewDetail {
                crew,
                assignment_count: assignments.len(),
                assignments,
            }))
    }

    /// Roster of one flight with certification checks against its aircraft
    pub async fn flight_crew(&self, flight_no: &str) -> ServiceResult<FlightCrew> {
        let assembler = self.planner.assembler();
        let mut results = self
            .run_batch(&[
                assembler.lookup(Resource::Flights, flight_no),
                assembler.lookup_all(Resource::CrewAssignments, "flight_no", flight_no),
                assembler.crew_on_flight(flight_no),
            ])
            .await?
            .into_iter();

        let flight = results.next().and_then(|rows| rows.into_iter().next());
        let assignments = results.next().unwrap_or_default();
        let crew = results.next().unwrap_or_default();

        let roster = build_roster(flight.as_ref(), &assignments, &crew);
        tracing::info!(
            event = %Event::LookupComplete,
            resource = "crew_roster",
            flight_no,
            count = roster.crew.len()
        );

        Ok(FlightCrew {
            flight_no: flight_no.to_string(),
            flight_details: flight,
            message: roster
                .crew
                .is_empty()
                .then(|| "No crew assigned to this flight".to_string()),
            count: roster.crew.len(),
            crew: roster.crew,
            by_role: roster.by_role,
            certification_status: roster.certification_status,
        })
    }

    pub async fn search_assignments(&self, payload: &Value) -> ServiceResult<AssignmentSearch> {
        let assignments = self.search(SearchProfile::Assignments, payload).await?;
        Ok(AssignmentSearch {
            search_criteria: payload.clone(),
            count: assignments.len(),
            assignments,
        })
    }

    // ==================
    // Passengers
    // ==================

    pub async fn search_passengers(&self, payload: &Value) -> ServiceResult<PassengerSearch> {
        let passengers = self.search(SearchProfile::Passengers, payload).await?;
        Ok(PassengerSearch {
            search_criteria: payload.clone(),
            count: passengers.len(),
            categorized: categorize_passengers(&passengers),
            passengers,
        })
    }

    pub async fn flight_passengers(&self, flight_no: &str) -> ServiceResult<FlightPassengers> {
        let statement = self
            .planner
            .assembler()
            .lookup_all(Resource::Passengers, "flight_no", flight_no);
        let passengers = self.run(&statement).await?;
        Ok(FlightPassengers {
            flight_no: flight_no.to_string(),
            message: passengers
                .is_empty()
                .then(|| "No passengers found for this flight".to_string()),
            categorized: categorize_passengers(&passengers),
            passengers,
        })
    }

    /// All passengers on one booking. An unknown PNR is `NotFound`.
    pub async fn pnr(&self, pnr: &str) -> ServiceResult<Lookup<PnrGroup>> {
        let statement = self
            .planner
            .assembler()
            .lookup_all(Resource::Passengers, "pnr", pnr);
        let passengers = self.run(&statement).await?;
        let group = (!passengers.is_empty()).then(|| PnrGroup {
            pnr: pnr.to_string(),
            passenger_count: passengers.len(),
            is_group_booking: passengers.len() > 1,
            passengers,
        });
        Ok(self.found(Resource::Passengers, pnr, group))
    }

    // ==================
    // Health
    // ==================

    /// Row counts of every table. Never fails; a database error reports
    /// the service as unhealthy.
    pub async fn health(&self) -> Health {
        let assembler = self.planner.assembler();
        let statements: Vec<Statement> = Resource::ALL.iter().map(|r| assembler.count(*r)).collect();

        match self.surface.query_batch(&statements).await {
            Ok(results) => {
                let counts: Vec<Option<i64>> = results
                    .iter()
                    .map(|rows| {
                        rows.first()
                            .and_then(|r| r.get("count"))
                            .and_then(Value::as_i64)
                    })
                    .collect();
                let count = |i: usize| counts.get(i).copied().flatten();
                Health {
                    status: "healthy",
                    database: "connected",
                    total_flights: count(0),
                    total_crew: count(1),
                    total_assignments: count(2),
                    total_passengers: count(3),
                }
            }
            Err(e) => {
                tracing::warn!(event = %Event::HealthDegraded, code = e.code(), error = %e);
                Health {
                    status: "unhealthy",
                    database: "disconnected",
                    total_flights: None,
                    total_crew: None,
                    total_assignments: None,
                    total_passengers: None,
                }
            }
        }
    }

    async fn search(&self, profile: SearchProfile, payload: &Value) -> ServiceResult<Vec<Row>> {
        let statement = self.planner.plan(profile, payload).map_err(|e| {
            tracing::warn!(event = %Event::FilterRejected, code = e.code().code(), error = %e);
            ServiceError::from(e)
        })?;

        let rows = self.run(&statement).await?;
        tracing::info!(
            event = %Event::SearchComplete,
            resource = %profile.resource(),
            params = statement.params.len(),
            count = rows.len()
        );
        Ok(rows)
    }

    async fn run(&self, statement: &Statement) -> ServiceResult<Vec<Row>> {
        tracing::debug!(event = %Event::QueryPlanned, sql = %statement.text, params = statement.params.len());
        self.surface.query(statement).await.map_err(|e| {
            tracing::error!(event = %Event::QueryFailed, surface = self.surface.name(), code = e.code(), error = %e);
            ServiceError::from(e)
        })
    }

    async fn run_batch(&self, statements: &[Statement]) -> ServiceResult<Vec<Vec<Row>>> {
        for statement in statements {
            tracing::debug!(event = %Event::QueryPlanned, sql = %statement.text, params = statement.params.len());
        }
        self.surface.query_batch(statements).await.map_err(|e| {
            tracing::error!(event = %Event::QueryFailed, surface = self.surface.name(), code = e.code(), error = %e);
            ServiceError::from(e)
        })
    }

    fn found<T>(&self, resource: Resource, id: &str, value: Option<T>) -> Lookup<T> {
        match value {
            Some(v) => {
                tracing::info!(event = %Event::LookupComplete, resource = %resource, id);
                Lookup::Found(v)
            }
            None => {
                tracing::info!(event = %Event::LookupNotFound, resource = %resource, id);
                Lookup::NotFound
            }
        }
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
