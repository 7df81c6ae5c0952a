//! # Dynamic variables
//!
//! Substitutes `$name` and `$name(argument)` variables in expanded
//! command text with live values from the client environment:
//!
//! - A leading `$context(ID)` directive retargets the command at a
//!   specific aircraft.
//! - Plain variables resolve first, then variables taking arguments.
//! - A variable that cannot be resolved reads as `----`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

use crate::bridge::{
    FlightPlan, FlightPlanRepository, GeneralSettings, Metar, MetarRepository, NavDataRepository,
    OpenPositionRepository, SessionProvider, TargetContext, TargetContextProvider,
};
use crate::format::{self, DATA_MISSING};

const UNKNOWN_WINDS: &str = "unknown";

static CONTEXT_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\$context\((.+?)\)\s+(.+)$").expect("valid context directive pattern")
});

// ─────────────────────── Catalogue ───────────────────────

/// The dynamic variables the parser recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    Squawk,
    Arrival,
    Departure,
    Cruise,
    CurrentAltitude,
    Callsign,
    Com1,
    MyRealName,
    Winds,
    MyRw,
    MyPvtRw,
    Time,
    Altitude,
    TemporaryAltitude,
    Aircraft,
    Route,
    AtisCode,
    Metar,
    Altimeter,
    Wind,
    RadioName,
    Frequency,
    Distance,
    Bearing,
    OClock,
    FutureTime,
    Type,
    AtcCallsign,
    Uppercase,
    Lowercase,
}

impl Variable {
    /// Every variable, in substitution order. Plain variables resolve
    /// before the ones that take arguments.
    pub const CATALOGUE: [Variable; 30] = [
        Variable::Squawk,
        Variable::Arrival,
        Variable::Departure,
        Variable::Cruise,
        Variable::CurrentAltitude,
        Variable::Callsign,
        Variable::Com1,
        Variable::MyRealName,
        Variable::Winds,
        Variable::MyRw,
        Variable::MyPvtRw,
        Variable::Time,
        Variable::Altitude,
        Variable::TemporaryAltitude,
        Variable::Aircraft,
        Variable::Route,
        Variable::AtisCode,
        Variable::Metar,
        Variable::Altimeter,
        Variable::Wind,
        Variable::RadioName,
        Variable::Frequency,
        Variable::Distance,
        Variable::Bearing,
        Variable::OClock,
        Variable::FutureTime,
        Variable::Type,
        Variable::AtcCallsign,
        Variable::Uppercase,
        Variable::Lowercase,
    ];

    /// The `$name` text that invokes the variable.
    pub const fn name(self) -> &'static str {
        match self {
            Variable::Squawk => "$squawk",
            Variable::Arrival => "$arr",
            Variable::Departure => "$dep",
            Variable::Cruise => "$cruise",
            Variable::CurrentAltitude => "$calt",
            Variable::Callsign => "$callsign",
            Variable::Com1 => "$com1",
            Variable::MyRealName => "$myrealname",
            Variable::Winds => "$winds",
            Variable::MyRw => "$myrw",
            Variable::MyPvtRw => "$mypvtrw",
            Variable::Time => "$time",
            Variable::Altitude => "$alt",
            Variable::TemporaryAltitude => "$temp",
            Variable::Aircraft => "$aircraft",
            Variable::Route => "$route",
            Variable::AtisCode => "$atiscode",
            Variable::Metar => "$metar",
            Variable::Altimeter => "$altim",
            Variable::Wind => "$wind",
            Variable::RadioName => "$radioname",
            Variable::Frequency => "$freq",
            Variable::Distance => "$dist",
            Variable::Bearing => "$bear",
            Variable::OClock => "$oclock",
            Variable::FutureTime => "$ftime",
            Variable::Type => "$type",
            Variable::AtcCallsign => "$atccallsign",
            Variable::Uppercase => "$uc",
            Variable::Lowercase => "$lc",
        }
    }

    /// Whether the variable takes a parenthesized argument.
    pub const fn takes_argument(self) -> bool {
        matches!(
            self,
            Variable::Metar
                | Variable::Altimeter
                | Variable::Wind
                | Variable::RadioName
                | Variable::Frequency
                | Variable::Distance
                | Variable::Bearing
                | Variable::OClock
                | Variable::FutureTime
                | Variable::Type
                | Variable::AtcCallsign
                | Variable::Uppercase
                | Variable::Lowercase
        )
    }
}

struct CompiledVariable {
    variable: Variable,
    matcher: Matcher,
}

enum Matcher {
    /// Plain variables match when followed by a non-word character, and
    /// separately at the end of the text.
    Plain { trailing: Regex, at_end: Regex },
    WithArgument(Regex),
}

static COMPILED: Lazy<Vec<CompiledVariable>> = Lazy::new(|| {
    Variable::CATALOGUE
        .iter()
        .map(|&variable| {
            let name = regex::escape(variable.name());
            let matcher = if variable.takes_argument() {
                Matcher::WithArgument(
                    Regex::new(&format!(r"({name})\((.*?)\)")).expect("valid variable pattern"),
                )
            } else {
                Matcher::Plain {
                    trailing: Regex::new(&format!(r"({name})(\W)"))
                        .expect("valid variable pattern"),
                    at_end: Regex::new(&format!(r"{name}$")).expect("valid variable pattern"),
                }
            };
            CompiledVariable { variable, matcher }
        })
        .collect()
});

// ─────────────────────── Resolver ───────────────────────

/// Target and flight plan snapshots resolved once per command.
#[derive(Debug, Default)]
struct ParseContext {
    target: Option<TargetContext>,
    flight_plan: Option<FlightPlan>,
}

/// Resolves dynamic variables against the client environment.
pub(crate) struct VariableResolver {
    session: Arc<dyn SessionProvider>,
    flight_plans: Arc<dyn FlightPlanRepository>,
    settings: GeneralSettings,
    metars: Arc<dyn MetarRepository>,
    nav_data: Arc<dyn NavDataRepository>,
    open_positions: Arc<dyn OpenPositionRepository>,
    contexts: Arc<dyn TargetContextProvider>,
}

impl VariableResolver {
    pub(crate) fn new(
        session: Arc<dyn SessionProvider>,
        flight_plans: Arc<dyn FlightPlanRepository>,
        settings: GeneralSettings,
        metars: Arc<dyn MetarRepository>,
        nav_data: Arc<dyn NavDataRepository>,
        open_positions: Arc<dyn OpenPositionRepository>,
        contexts: Arc<dyn TargetContextProvider>,
    ) -> Self {
        Self {
            session,
            flight_plans,
            settings,
            metars,
            nav_data,
            open_positions,
            contexts,
        }
    }

    /// Substitute every recognized variable in `input`.
    ///
    /// A leading `$context(ID)` directive overrides `aircraft_id` and is
    /// stripped from the output.
    pub(crate) fn resolve(&self, input: &str, aircraft_id: Option<&str>) -> String {
        let mut text;
        let context;
        if let Some(captures) = CONTEXT_DIRECTIVE.captures(input) {
            let directed_id = captures[1].to_uppercase();
            text = captures[2].to_string();
            context = self.build_context(Some(&directed_id));
        } else {
            text = input.to_string();
            context = self.build_context(aircraft_id);
        }

        for entry in COMPILED.iter() {
            let Matcher::Plain { trailing, at_end } = &entry.matcher else {
                continue;
            };
            if trailing.is_match(&text) {
                text = trailing
                    .replace_all(&text, |captures: &Captures<'_>| {
                        self.evaluate(entry.variable, "", &context) + &captures[2]
                    })
                    .into_owned();
            }
            if at_end.is_match(&text) {
                let value = self.evaluate(entry.variable, "", &context);
                text = at_end.replace(&text, NoExpand(&value)).into_owned();
            }
        }

        for entry in COMPILED.iter() {
            let Matcher::WithArgument(pattern) = &entry.matcher else {
                continue;
            };
            if pattern.is_match(&text) {
                text = pattern
                    .replace_all(&text, |captures: &Captures<'_>| {
                        self.evaluate(entry.variable, &captures[2], &context)
                    })
                    .into_owned();
            }
        }

        text
    }

    /// Fetch the target snapshot for an aircraft and the flight plan
    /// filed under the id the snapshot reports.
    fn build_context(&self, aircraft_id: Option<&str>) -> ParseContext {
        let target = aircraft_id
            .filter(|id| !id.is_empty())
            .and_then(|id| self.contexts.request(id));
        let flight_plan = target
            .as_ref()
            .and_then(|target| self.flight_plans.get(&target.aircraft_id));
        ParseContext {
            target,
            flight_plan,
        }
    }

    fn evaluate(&self, variable: Variable, argument: &str, context: &ParseContext) -> String {
        self.try_evaluate(variable, argument, context)
            .unwrap_or_else(|| DATA_MISSING.to_string())
    }

    fn try_evaluate(
        &self,
        variable: Variable,
        argument: &str,
        context: &ParseContext,
    ) -> Option<String> {
        match variable {
            Variable::Squawk => {
                let code = context.flight_plan.as_ref()?.assigned_beacon_code?;
                Some(format!("{code:04}"))
            }
            Variable::Arrival => {
                let destination = context.flight_plan.as_ref()?.destination.clone();
                (!destination.trim().is_empty()).then_some(destination)
            }
            Variable::Departure => {
                let departure = context.flight_plan.as_ref()?.departure.clone();
                (!departure.trim().is_empty()).then_some(departure)
            }
            Variable::Cruise => Some(format::format_flight_plan_altitude(
                &context.flight_plan.as_ref()?.altitude,
            )),
            Variable::CurrentAltitude => {
                Some(format::format_altitude(context.target.as_ref()?.altitude?))
            }
            Variable::Callsign => self.session.callsign(),
            Variable::Com1 => Some(format::format_frequency(
                self.session.primary_position()?.frequency?,
            )),
            Variable::MyRealName => Some(self.settings.real_name.clone()),
            Variable::Winds => {
                let report = context.target.as_ref().and_then(|target| {
                    let stated_airport = target
                        .airport_id
                        .as_deref()
                        .filter(|id| !id.trim().is_empty());
                    match stated_airport {
                        Some(airport_id) => self.wind_report(airport_id),
                        None => {
                            let plan = context.flight_plan.as_ref()?;
                            let station = format::nearest_station_id(
                                plan,
                                &target.location,
                                self.nav_data.as_ref(),
                            )?;
                            self.wind_report(&station)
                        }
                    }
                });
                Some(report.unwrap_or_else(|| UNKNOWN_WINDS.to_string()))
            }
            Variable::MyRw => Some(String::new()),
            Variable::MyPvtRw => Some("$".to_string()),
            Variable::Time => Some(Utc::now().format("%H:%M").to_string()),
            Variable::Altitude => {
                let temporary = context
                    .target
                    .as_ref()
                    .and_then(|target| target.temporary_altitude);
                match temporary {
                    Some(feet) if feet < 100_000 => Some(format::format_altitude(feet)),
                    _ => context
                        .flight_plan
                        .as_ref()
                        .map(|plan| format::format_flight_plan_altitude(&plan.altitude)),
                }
            }
            Variable::TemporaryAltitude => {
                let feet = context.target.as_ref()?.temporary_altitude?;
                (feet < 100_000).then(|| format::format_altitude(feet))
            }
            Variable::Aircraft => self.session.selected_aircraft_id(),
            Variable::Route => {
                let route = context.flight_plan.as_ref()?.route.clone();
                let stripped = route.strip_prefix('+').unwrap_or(&route);
                Some(stripped.to_string())
            }
            Variable::AtisCode => None,
            Variable::Metar => Some(self.station_metar(&argument.to_uppercase())?.raw_text),
            Variable::Altimeter => self.station_metar(&argument.to_uppercase())?.altimeter,
            Variable::Wind => {
                let report = self.wind_report(&argument.to_uppercase());
                Some(report.unwrap_or_else(|| UNKNOWN_WINDS.to_string()))
            }
            Variable::RadioName => {
                if argument.is_empty() {
                    if !self.session.is_server_session_started() {
                        return None;
                    }
                    self.session.primary_position()?.radio_name
                } else {
                    let position = self
                        .open_positions
                        .find_by_handoff_string(&argument.to_uppercase())?;
                    Some(position.radio_name.unwrap_or(position.callsign))
                }
            }
            Variable::Frequency => {
                if argument.is_empty() {
                    if !self.session.is_server_session_active() {
                        return None;
                    }
                    Some(format::format_frequency(
                        self.session.primary_position()?.frequency?,
                    ))
                } else {
                    let position = self
                        .open_positions
                        .find_by_handoff_string(&argument.to_uppercase())?;
                    Some(format::format_frequency(position.frequency?))
                }
            }
            Variable::Distance => {
                if argument.is_empty() {
                    return None;
                }
                let target = context.target.as_ref()?;
                let point = self
                    .nav_data
                    .locate_airport_or_nearest_fix(&argument.to_uppercase(), &target.location)?;
                let distance = point.distance_to(&target.location);
                Some((distance.round() as i64).to_string())
            }
            Variable::Bearing => {
                if argument.is_empty() {
                    return None;
                }
                let target = context.target.as_ref()?;
                let point = self
                    .nav_data
                    .locate_airport_or_nearest_fix(&argument.to_uppercase(), &target.location)?;
                Some(format::compass_point(target.location.bearing_to(&point)).to_string())
            }
            Variable::OClock => {
                if argument.is_empty() {
                    return None;
                }
                let target = context.target.as_ref()?;
                let track = target.true_ground_track?;
                let point = self
                    .nav_data
                    .locate_airport_or_nearest_fix(&argument.to_uppercase(), &target.location)?;
                let mut relative = target.location.bearing_to(&point) - track;
                if relative < 0.0 {
                    relative += 360.0;
                }
                Some(format::clock_position(relative).to_string())
            }
            Variable::FutureTime => {
                let minutes = if argument.is_empty() {
                    0
                } else {
                    i64::from(argument.trim().parse::<i32>().ok()?)
                };
                let eta = Utc::now() + Duration::minutes(minutes);
                Some(eta.format("%H:%M").to_string())
            }
            Variable::Type => Some(self.flight_plans.get(&argument.to_uppercase())?.aircraft_type),
            Variable::AtcCallsign => Some(
                self.open_positions
                    .find_by_handoff_string(&argument.to_uppercase())?
                    .callsign,
            ),
            Variable::Uppercase => Some(argument.to_uppercase()),
            Variable::Lowercase => Some(argument.to_lowercase()),
        }
    }

    /// Weather for an airport id, resolved through its ICAO station.
    fn station_metar(&self, airport_id: &str) -> Option<Metar> {
        let airport = self.nav_data.airport(airport_id)?;
        let icao_id = airport.icao_id.as_deref().filter(|id| !id.trim().is_empty())?;
        self.metars.metar(icao_id)
    }

    fn wind_report(&self, airport_id: &str) -> Option<String> {
        self.station_metar(airport_id)
            .map(|metar| format::format_wind(&metar))
    }
}

// ─────────────────────── Tests ───────────────────────
