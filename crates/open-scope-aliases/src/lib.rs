//! # open-scope-aliases
//!
//! Text alias expansion and dynamic variable substitution for radar
//! client command lines.
//!
//! Controllers type dot commands like `.ho` that expand to canned
//! phraseology, with `$1`..`$n` placeholders filled from the command
//! line and `$variable` references resolved against live client state
//! (flight plans, weather, staffed positions, radar targets).
//!
//! - [`table`]: alias definition parsing and lookup.
//! - [`expand`]: token-level alias expansion.
//! - [`variables`]: the dynamic variable catalogue and resolver.
//! - [`parser`]: the [`AliasParser`] facade.
//! - [`bridge`]: traits the host client implements.
//! - [`io`]: alias definition sources.

#![forbid(unsafe_code)]

pub mod bridge;
pub mod error;
pub mod expand;
pub mod format;
pub mod geo;
pub mod io;
pub mod parser;
pub mod table;
pub mod tokens;
pub mod variables;

pub use bridge::{
    Airport, FlightPlan, FlightPlanRepository, GeneralSettings, Metar, MetarRepository,
    MockEnvironment, NavDataRepository, OpenPositionRepository, PositionInfo, SessionProvider,
    TargetContext, TargetContextProvider,
};
pub use error::{ParseError, Result};
pub use expand::{expand_aliases, MAX_EXPANSION_PASSES};
pub use format::{DATA_MISSING, TRANSITION_ALTITUDE};
pub use geo::GeoPoint;
pub use io::{AliasSource, FileAliasSource};
pub use parser::AliasParser;
pub use table::{AliasDefinition, AliasTable};
pub use variables::Variable;
