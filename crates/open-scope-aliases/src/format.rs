//! # Readback formatting
//!
//! Phrase and number formatting shared by the variable handlers:
//!
//! - Altitudes read in feet below the transition altitude and as flight
//!   levels at or above it.
//! - Wind groups rendered as spoken phrases.
//! - Compass points and clock positions from bearings.
//! - Voice frequencies in megahertz.

use crate::bridge::{Airport, FlightPlan, Metar, NavDataRepository};
use crate::geo::GeoPoint;

/// Placeholder emitted when a variable cannot be resolved.
pub const DATA_MISSING: &str = "----";

/// Altitude in feet at and above which altitudes read as flight levels.
pub const TRANSITION_ALTITUDE: i32 = 18_000;

/// Range in nautical miles within which a flight plan airport counts as
/// the aircraft's local weather station.
pub const NEAR_AIRPORT_MAX_DISTANCE: f64 = 25.0;

// ─────────────────────── Altitudes ───────────────────────

/// Format an altitude in feet for readback.
///
/// The altitude is rounded to the nearest hundred feet first, so a value
/// a few feet shy of the transition altitude still reads as a flight
/// level once rounding carries it there.
pub fn format_altitude(feet: i32) -> String {
    let hundreds = (f64::from(feet) / 100.0).round() as i32;
    let rounded = hundreds * 100;
    if rounded < TRANSITION_ALTITUDE {
        rounded.to_string()
    } else {
        format!("FL{hundreds}")
    }
}

/// Format the altitude field of a flight plan.
///
/// Three characters or fewer is the flight strip short form and scales
/// by a hundred. Text that does not parse ("VFR") is kept as filed, and
/// a blank field reads as missing data.
pub fn format_flight_plan_altitude(raw: &str) -> String {
    match raw.trim().parse::<i32>() {
        Ok(value) if raw.len() <= 3 => format_altitude(value * 100),
        Ok(value) => format_altitude(value),
        Err(_) if raw.trim().is_empty() => DATA_MISSING.to_string(),
        Err(_) => raw.to_string(),
    }
}

// ─────────────────────── Winds ───────────────────────

/// Render the wind group of a weather report as a spoken phrase.
pub fn format_wind(metar: &Metar) -> String {
    let direction = metar
        .wind_direction
        .map(|degrees| format!("{degrees:03}"))
        .unwrap_or_default();
    if let Some(variability) = metar.wind_direction_variability {
        if metar.wind_gusts > 0 {
            format!(
                "variable {direction}-{variability:03} at {} gusts {}",
                metar.wind_speed, metar.wind_gusts
            )
        } else {
            format!("variable {direction}-{variability:03} at {}", metar.wind_speed)
        }
    } else if metar.wind_direction.is_none() {
        format!("variable at {}", metar.wind_speed)
    } else if metar.wind_speed < 3 {
        "calm".to_string()
    } else if metar.wind_gusts > 0 {
        format!("{direction} at {} gusts {}", metar.wind_speed, metar.wind_gusts)
    } else {
        format!("{direction} at {}", metar.wind_speed)
    }
}

// ─────────────────────── Bearings ───────────────────────

/// Name the compass point a bearing falls in.
pub fn compass_point(bearing: f64) -> &'static str {
    match bearing {
        b if b >= 337.5 || b < 22.5 => "north",
        b if b < 67.5 => "northeast",
        b if b < 112.5 => "east",
        b if b < 157.5 => "southeast",
        b if b < 202.5 => "south",
        b if b < 247.5 => "southwest",
        b if b < 292.5 => "west",
        _ => "northwest",
    }
}

/// Name the clock position of a bearing relative to the nose.
pub fn clock_position(relative_bearing: f64) -> &'static str {
    match relative_bearing {
        b if b >= 345.0 || b < 15.0 => "twelve o'clock",
        b if b < 45.0 => "one o'clock",
        b if b < 75.0 => "two o'clock",
        b if b < 105.0 => "three o'clock",
        b if b < 135.0 => "four o'clock",
        b if b < 165.0 => "five o'clock",
        b if b < 195.0 => "six o'clock",
        b if b < 225.0 => "seven o'clock",
        b if b < 255.0 => "eight o'clock",
        b if b < 285.0 => "nine o'clock",
        b if b < 315.0 => "ten o'clock",
        _ => "eleven o'clock",
    }
}

// ─────────────────────── Frequencies ───────────────────────

/// Format a frequency in hertz as megahertz with three decimals.
pub fn format_frequency(hertz: u32) -> String {
    format!("{}.{:03}", hertz / 1_000_000, (hertz / 1_000) % 1_000)
}

// ─────────────────────── Station selection ───────────────────────

/// Pick the weather station for an aircraft from its flight plan.
///
/// Considers the departure and destination airports and returns the id
/// of whichever lies within [`NEAR_AIRPORT_MAX_DISTANCE`] of the
/// aircraft. When both qualify the closer wins, with ties going to the
/// departure.
pub(crate) fn nearest_station_id(
    flight_plan: &FlightPlan,
    location: &GeoPoint,
    nav_data: &dyn NavDataRepository,
) -> Option<String> {
    let departure = named_airport(nav_data, &flight_plan.departure);
    let destination = named_airport(nav_data, &flight_plan.destination);
    let departure_distance = departure
        .as_ref()
        .map(|airport| airport.location.distance_to(location));
    let destination_distance = destination
        .as_ref()
        .map(|airport| airport.location.distance_to(location));
    let departure_near = departure_distance.map_or(false, |d| d <= NEAR_AIRPORT_MAX_DISTANCE);
    let destination_near = destination_distance.map_or(false, |d| d <= NEAR_AIRPORT_MAX_DISTANCE);

    match (departure_near, destination_near) {
        (true, true) => {
            if departure_distance <= destination_distance {
                departure.map(|airport| station_id(&airport))
            } else {
                destination.map(|airport| station_id(&airport))
            }
        }
        (true, false) => departure.map(|airport| station_id(&airport)),
        (false, true) => destination.map(|airport| station_id(&airport)),
        (false, false) => None,
    }
}

fn named_airport(nav_data: &dyn NavDataRepository, airport_id: &str) -> Option<Airport> {
    if airport_id.trim().is_empty() {
        return None;
    }
    nav_data.airport(airport_id)
}

fn station_id(airport: &Airport) -> String {
    airport
        .icao_id
        .clone()
        .unwrap_or_else(|| airport.local_id.clone())
}

// ─────────────────────── Tests ───────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MockEnvironment;

    #[test]
    fn test_altitude_below_transition_reads_in_feet() {
        assert_eq!(format_altitude(4_500), "4500");
        assert_eq!(format_altitude(12_049), "12000");
    }

    #[test]
    fn test_altitude_at_transition_reads_as_flight_level() {
        assert_eq!(format_altitude(18_000), "FL180");
        assert_eq!(format_altitude(35_000), "FL350");
    }

    #[test]
    fn test_altitude_rounding_carries_across_transition() {
        assert_eq!(format_altitude(17_960), "FL180");
        assert_eq!(format_altitude(17_940), "17900");
    }

    #[test]
    fn test_flight_plan_altitude_short_form_scales() {
        assert_eq!(format_flight_plan_altitude("350"), "FL350");
        assert_eq!(format_flight_plan_altitude("035"), "3500");
    }

    #[test]
    fn test_flight_plan_altitude_full_form() {
        assert_eq!(format_flight_plan_altitude("35000"), "FL350");
        assert_eq!(format_flight_plan_altitude("4500"), "4500");
    }

    #[test]
    fn test_flight_plan_altitude_blank_is_missing() {
        assert_eq!(format_flight_plan_altitude(""), DATA_MISSING);
        assert_eq!(format_flight_plan_altitude("   "), DATA_MISSING);
    }

    #[test]
    fn test_flight_plan_altitude_keeps_unparsed_text() {
        assert_eq!(format_flight_plan_altitude("VFR"), "VFR");
    }

    #[test]
    fn test_wind_calm_below_three_knots() {
        let metar = Metar {
            wind_direction: Some(180),
            wind_speed: 2,
            ..Default::default()
        };
        assert_eq!(format_wind(&metar), "calm");
    }

    #[test]
    fn test_wind_steady_and_gusting() {
        let mut metar = Metar {
            wind_direction: Some(190),
            wind_speed: 14,
            ..Default::default()
        };
        assert_eq!(format_wind(&metar), "190 at 14");

        metar.wind_gusts = 22;
        assert_eq!(format_wind(&metar), "190 at 14 gusts 22");
    }

    #[test]
    fn test_wind_with_no_direction_reads_variable() {
        let metar = Metar {
            wind_direction: None,
            wind_speed: 5,
            ..Default::default()
        };
        assert_eq!(format_wind(&metar), "variable at 5");
    }

    #[test]
    fn test_wind_variable_range() {
        let mut metar = Metar {
            wind_direction: Some(10),
            wind_speed: 8,
            wind_direction_variability: Some(70),
            ..Default::default()
        };
        assert_eq!(format_wind(&metar), "variable 010-070 at 8");

        metar.wind_gusts = 15;
        assert_eq!(format_wind(&metar), "variable 010-070 at 8 gusts 15");

        metar.wind_direction = None;
        metar.wind_gusts = 0;
        metar.wind_direction_variability = Some(20);
        metar.wind_speed = 10;
        assert_eq!(format_wind(&metar), "variable -020 at 10");
    }

    #[test]
    fn test_compass_point_sectors() {
        assert_eq!(compass_point(0.0), "north");
        assert_eq!(compass_point(337.5), "north");
        assert_eq!(compass_point(22.5), "northeast");
        assert_eq!(compass_point(90.0), "east");
        assert_eq!(compass_point(180.0), "south");
        assert_eq!(compass_point(300.0), "northwest");
    }

    #[test]
    fn test_clock_position_sectors() {
        assert_eq!(clock_position(0.0), "twelve o'clock");
        assert_eq!(clock_position(350.0), "twelve o'clock");
        assert_eq!(clock_position(15.0), "one o'clock");
        assert_eq!(clock_position(100.0), "three o'clock");
        assert_eq!(clock_position(180.0), "six o'clock");
        assert_eq!(clock_position(320.0), "eleven o'clock");
    }

    #[test]
    fn test_frequency_formats_as_megahertz() {
        assert_eq!(format_frequency(118_325_000), "118.325");
        assert_eq!(format_frequency(121_900_000), "121.900");
        assert_eq!(format_frequency(134_000_000), "134.000");
    }

    fn boston_area_env() -> MockEnvironment {
        let env = MockEnvironment::new();
        env.add_airport(Airport {
            icao_id: Some("KBOS".to_string()),
            local_id: "BOS".to_string(),
            location: GeoPoint::new(42.3656, -71.0096),
        });
        env.add_airport(Airport {
            icao_id: Some("KJFK".to_string()),
            local_id: "JFK".to_string(),
            location: GeoPoint::new(40.6413, -73.7781),
        });
        env
    }

    fn plan(departure: &str, destination: &str) -> FlightPlan {
        FlightPlan {
            departure: departure.to_string(),
            destination: destination.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nearest_station_picks_the_airport_in_range() {
        let env = boston_area_env();
        let near_boston = GeoPoint::new(42.5, -71.0);
        let station = nearest_station_id(&plan("KBOS", "KJFK"), &near_boston, &env);
        assert_eq!(station, Some("KBOS".to_string()));
    }

    #[test]
    fn test_nearest_station_none_when_both_out_of_range() {
        let env = boston_area_env();
        let mid_enroute = GeoPoint::new(41.5, -72.4);
        assert_eq!(nearest_station_id(&plan("KBOS", "KJFK"), &mid_enroute, &env), None);
    }

    #[test]
    fn test_nearest_station_tie_goes_to_departure() {
        let env = MockEnvironment::new();
        let field = GeoPoint::new(42.0, -71.0);
        env.add_airport(Airport {
            icao_id: Some("KAAA".to_string()),
            local_id: "AAA".to_string(),
            location: field,
        });
        env.add_airport(Airport {
            icao_id: Some("KBBB".to_string()),
            local_id: "BBB".to_string(),
            location: field,
        });
        let station = nearest_station_id(&plan("KAAA", "KBBB"), &field, &env);
        assert_eq!(station, Some("KAAA".to_string()));
    }

    #[test]
    fn test_nearest_station_skips_blank_plan_fields() {
        let env = boston_area_env();
        let near_kennedy = GeoPoint::new(40.7, -73.8);
        let station = nearest_station_id(&plan("", "KJFK"), &near_kennedy, &env);
        assert_eq!(station, Some("KJFK".to_string()));
    }

    #[test]
    fn test_nearest_station_falls_back_to_local_id() {
        let env = MockEnvironment::new();
        let field = GeoPoint::new(44.0, -70.0);
        env.add_airport(Airport {
            icao_id: None,
            local_id: "3B1".to_string(),
            location: field,
        });
        let station = nearest_station_id(&plan("3B1", ""), &field, &env);
        assert_eq!(station, Some("3B1".to_string()));
    }
}
