//! Filter translation subsystem
//!
//! Converts a loosely typed JSON filter payload into an ordered list of
//! parametrized predicates, using the schema registry for column types and
//! a declarative rule table per search profile for everything else.

mod errors;
mod normalize;
mod payload;
mod rules;
mod translator;

pub use errors::{FilterError, FilterErrorCode, FilterResult};
pub use normalize::{parse_time_of_day, parse_timestamp, truthy};
pub use payload::{FilterPayload, TimeBound};
pub use rules::{ExclusionRule, FieldOverride, FieldRule, ResourceRules, SearchProfile, TimeBoundRule};
pub use translator::{escape_like, FilterTranslator, Translation};
