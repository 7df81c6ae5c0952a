//! # Client environment bridge
//!
//! The traits the parser consumes to reach live client state, the data
//! snapshots those traits hand back, and a mock environment so the
//! parser can run in tests without a live client.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

// ─────────────────────── Collaborator traits ───────────────────────

/// Connection and controller session state.
pub trait SessionProvider: Send + Sync {
    /// Callsign the controller is signed in under.
    fn callsign(&self) -> Option<String>;

    /// The position the controller is working.
    fn primary_position(&self) -> Option<PositionInfo>;

    /// Aircraft currently selected on the scope.
    fn selected_aircraft_id(&self) -> Option<String>;

    /// Whether the server session has been started.
    fn is_server_session_started(&self) -> bool;

    /// Whether the server session is active.
    fn is_server_session_active(&self) -> bool;
}

/// Read access to filed flight plans.
pub trait FlightPlanRepository: Send + Sync {
    /// Look up the flight plan filed for an aircraft id.
    fn get(&self, aircraft_id: &str) -> Option<FlightPlan>;
}

/// Read access to weather reports, keyed by ICAO station id.
pub trait MetarRepository: Send + Sync {
    fn metar(&self, icao_id: &str) -> Option<Metar>;
}

/// Read access to airports and fixes.
pub trait NavDataRepository: Send + Sync {
    /// Look up an airport by any of its identifiers.
    fn airport(&self, airport_id: &str) -> Option<Airport>;

    /// Resolve an identifier to an airport location, or to the matching
    /// fix nearest `near` when no airport carries the identifier.
    fn locate_airport_or_nearest_fix(&self, id: &str, near: &GeoPoint) -> Option<GeoPoint>;
}

/// Read access to positions currently staffed on the network.
pub trait OpenPositionRepository: Send + Sync {
    /// Find a staffed position by its handoff shorthand.
    fn find_by_handoff_string(&self, handoff: &str) -> Option<PositionInfo>;
}

/// Supplies kinematic snapshots of radar targets on request.
pub trait TargetContextProvider: Send + Sync {
    fn request(&self, aircraft_id: &str) -> Option<TargetContext>;
}

// ─────────────────────── Data snapshots ───────────────────────

/// A filed flight plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPlan {
    /// Aircraft callsign the plan is filed under.
    pub aircraft_id: String,
    /// Departure airport id.
    pub departure: String,
    /// Destination airport id.
    pub destination: String,
    /// Filed altitude, as entered ("350", "35000", "VFR").
    pub altitude: String,
    /// Assigned transponder code.
    pub assigned_beacon_code: Option<u16>,
    /// Filed route.
    pub route: String,
    /// Aircraft type designator.
    pub aircraft_type: String,
}

/// Decoded fields of a weather report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metar {
    /// The report as received.
    pub raw_text: String,
    /// Altimeter setting, if reported.
    pub altimeter: Option<String>,
    /// Wind direction in degrees true; absent for variable winds.
    pub wind_direction: Option<u16>,
    /// Sustained wind speed in knots.
    pub wind_speed: u16,
    /// Gust speed in knots; zero when not gusting.
    pub wind_gusts: u16,
    /// Upper bound of a variable wind direction range.
    pub wind_direction_variability: Option<u16>,
}

/// An airport record from nav data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// ICAO identifier, when assigned.
    pub icao_id: Option<String>,
    /// Local identifier.
    pub local_id: String,
    /// Field location.
    pub location: GeoPoint,
}

/// A staffed position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Position callsign.
    pub callsign: String,
    /// Spoken radio name, when configured.
    pub radio_name: Option<String>,
    /// Voice frequency in hertz.
    pub frequency: Option<u32>,
}

/// Kinematic snapshot of a radar target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetContext {
    /// Aircraft callsign.
    pub aircraft_id: String,
    /// Airport the target is associated with, when known.
    pub airport_id: Option<String>,
    /// Target position.
    pub location: GeoPoint,
    /// Current altitude in feet.
    pub altitude: Option<i32>,
    /// Assigned temporary altitude in feet.
    pub temporary_altitude: Option<i32>,
    /// Track over the ground in degrees true.
    pub true_ground_track: Option<f64>,
}

/// Client settings the parser reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Controller real name, as configured by the user.
    pub real_name: String,
}

// ─────────────────────── Mock environment ───────────────────────

/// A mock client environment for testing.
///
/// Implements every collaborator trait over in-memory maps so the parser
/// can be driven end to end without a live client.
#[derive(Default)]
pub struct MockEnvironment {
    callsign: Mutex<Option<String>>,
    primary_position: Mutex<Option<PositionInfo>>,
    selected_aircraft_id: Mutex<Option<String>>,
    server_session_started: Mutex<bool>,
    server_session_active: Mutex<bool>,
    flight_plans: Mutex<HashMap<String, FlightPlan>>,
    metars: Mutex<HashMap<String, Metar>>,
    airports: Mutex<HashMap<String, Airport>>,
    fixes: Mutex<HashMap<String, GeoPoint>>,
    positions: Mutex<HashMap<String, PositionInfo>>,
    contexts: Mutex<HashMap<String, TargetContext>>,
}

impl MockEnvironment {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callsign(&self, callsign: &str) {
        if let Ok(mut slot) = self.callsign.lock() {
            *slot = Some(callsign.to_string());
        }
    }

    pub fn set_primary_position(&self, position: PositionInfo) {
        if let Ok(mut slot) = self.primary_position.lock() {
            *slot = Some(position);
        }
    }

    pub fn set_selected_aircraft_id(&self, aircraft_id: &str) {
        if let Ok(mut slot) = self.selected_aircraft_id.lock() {
            *slot = Some(aircraft_id.to_string());
        }
    }

    /// Set the server session flags.
    pub fn set_server_session(&self, started: bool, active: bool) {
        if let Ok(mut slot) = self.server_session_started.lock() {
            *slot = started;
        }
        if let Ok(mut slot) = self.server_session_active.lock() {
            *slot = active;
        }
    }

    /// Register a flight plan, keyed by its aircraft id.
    pub fn add_flight_plan(&self, flight_plan: FlightPlan) {
        if let Ok(mut plans) = self.flight_plans.lock() {
            plans.insert(flight_plan.aircraft_id.to_uppercase(), flight_plan);
        }
    }

    /// Register a weather report for an ICAO station.
    pub fn add_metar(&self, icao_id: &str, metar: Metar) {
        if let Ok(mut metars) = self.metars.lock() {
            metars.insert(icao_id.to_uppercase(), metar);
        }
    }

    /// Register an airport under both its ICAO and local identifiers.
    pub fn add_airport(&self, airport: Airport) {
        if let Ok(mut airports) = self.airports.lock() {
            if let Some(icao_id) = &airport.icao_id {
                airports.insert(icao_id.to_uppercase(), airport.clone());
            }
            airports.insert(airport.local_id.to_uppercase(), airport);
        }
    }

    /// Register a fix location.
    pub fn add_fix(&self, id: &str, location: GeoPoint) {
        if let Ok(mut fixes) = self.fixes.lock() {
            fixes.insert(id.to_uppercase(), location);
        }
    }

    /// Register a staffed position under its handoff shorthand.
    pub fn add_position(&self, handoff: &str, position: PositionInfo) {
        if let Ok(mut positions) = self.positions.lock() {
            positions.insert(handoff.to_uppercase(), position);
        }
    }

    /// Register a target snapshot, keyed by its aircraft id.
    pub fn add_target_context(&self, context: TargetContext) {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.insert(context.aircraft_id.to_uppercase(), context);
        }
    }
}

impl SessionProvider for MockEnvironment {
    fn callsign(&self) -> Option<String> {
        self.callsign.lock().ok()?.clone()
    }

    fn primary_position(&self) -> Option<PositionInfo> {
        self.primary_position.lock().ok()?.clone()
    }

    fn selected_aircraft_id(&self) -> Option<String> {
        self.selected_aircraft_id.lock().ok()?.clone()
    }

    fn is_server_session_started(&self) -> bool {
        self.server_session_started
            .lock()
            .map(|flag| *flag)
            .unwrap_or(false)
    }

    fn is_server_session_active(&self) -> bool {
        self.server_session_active
            .lock()
            .map(|flag| *flag)
            .unwrap_or(false)
    }
}

impl FlightPlanRepository for MockEnvironment {
    fn get(&self, aircraft_id: &str) -> Option<FlightPlan> {
        self.flight_plans
            .lock()
            .ok()?
            .get(&aircraft_id.to_uppercase())
            .cloned()
    }
}

impl MetarRepository for MockEnvironment {
    fn metar(&self, icao_id: &str) -> Option<Metar> {
        self.metars.lock().ok()?.get(&icao_id.to_uppercase()).cloned()
    }
}

impl NavDataRepository for MockEnvironment {
    fn airport(&self, airport_id: &str) -> Option<Airport> {
        self.airports
            .lock()
            .ok()?
            .get(&airport_id.to_uppercase())
            .cloned()
    }

    fn locate_airport_or_nearest_fix(&self, id: &str, _near: &GeoPoint) -> Option<GeoPoint> {
        if let Some(airport) = self.airport(id) {
            return Some(airport.location);
        }
        self.fixes.lock().ok()?.get(&id.to_uppercase()).copied()
    }
}

impl OpenPositionRepository for MockEnvironment {
    fn find_by_handoff_string(&self, handoff: &str) -> Option<PositionInfo> {
        self.positions
            .lock()
            .ok()?
            .get(&handoff.to_uppercase())
            .cloned()
    }
}

impl TargetContextProvider for MockEnvironment {
    fn request(&self, aircraft_id: &str) -> Option<TargetContext> {
        self.contexts
            .lock()
            .ok()?
            .get(&aircraft_id.to_uppercase())
            .cloned()
    }
}

// ─────────────────────── Tests ───────────────────────
