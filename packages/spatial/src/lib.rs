#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Distance, response-time estimates, and nearest-station resolution.
//!
//! Distances are ellipsoidal (WGS-84 geodesic) and computed by the `geo`
//! crate. Station sets are tiny (a few dozen points at most), so the
//! resolver is a plain linear scan rather than a spatial index.

use geo::{Distance, Geodesic, Point};
use iridm_geography_models::{Coordinate, Station};
use thiserror::Error;

/// Illustrative average fire-truck speed used for ETA estimates.
pub const DEFAULT_SPEED_KMPH: f64 = 40.0;

/// Errors from distance estimation and station resolution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimateError {
    /// The resolver was given no candidate stations.
    #[error("No candidate stations to choose from")]
    EmptyInput,

    /// The configured travel speed is zero, negative, or not a number.
    #[error("Invalid response speed {0} km/h: must be a positive number")]
    InvalidSpeed(f64),

    /// The distance passed to the ETA estimate is negative or not a number.
    #[error("Invalid distance {0} km: must be a non-negative number")]
    InvalidDistance(f64),
}

/// A validated average travel speed in km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseSpeed(f64);

impl ResponseSpeed {
    /// Validates a speed value.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidSpeed`] unless `kmph` is finite and
    /// strictly positive.
    pub fn new(kmph: f64) -> Result<Self, EstimateError> {
        if kmph.is_finite() && kmph > 0.0 {
            Ok(Self(kmph))
        } else {
            Err(EstimateError::InvalidSpeed(kmph))
        }
    }

    /// Returns the speed in km/h.
    #[must_use]
    pub const fn kmph(self) -> f64 {
        self.0
    }
}

impl Default for ResponseSpeed {
    fn default() -> Self {
        Self(DEFAULT_SPEED_KMPH)
    }
}

/// Great-circle (geodesic) distance between two coordinates in kilometres,
/// rounded to 2 decimal places.
#[must_use]
pub fn distance_km(p1: Coordinate, p2: Coordinate) -> f64 {
    let a = Point::new(p1.longitude, p1.latitude);
    let b = Point::new(p2.longitude, p2.latitude);
    let meters = Geodesic.distance(a, b);
    round_2dp(meters / 1000.0)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimated minutes to cover `distance_km` at `speed_kmph`, rounded down.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidSpeed`] for a non-positive or non-finite
/// speed and [`EstimateError::InvalidDistance`] for a negative or
/// non-finite distance.
pub fn eta_minutes(distance_km: f64, speed_kmph: f64) -> Result<u32, EstimateError> {
    let speed = ResponseSpeed::new(speed_kmph)?;
    eta_minutes_at(distance_km, speed)
}

/// Same as [`eta_minutes`] with an already validated speed.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidDistance`] for a negative or non-finite
/// distance.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eta_minutes_at(distance_km: f64, speed: ResponseSpeed) -> Result<u32, EstimateError> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(EstimateError::InvalidDistance(distance_km));
    }
    let minutes = (distance_km / speed.kmph() * 60.0).floor();
    Ok(minutes.min(f64::from(u32::MAX)) as u32)
}

/// The closest station to an incident point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStation<'a> {
    /// The selected station.
    pub station: &'a Station,
    /// Rounded geodesic distance to the station in kilometres.
    pub distance_km: f64,
}

/// Selects the station closest to `point`.
///
/// Distances are compared after rounding, so stations that are equidistant
/// at that precision resolve to whichever appears first in `stations`.
///
/// # Errors
///
/// Returns [`EstimateError::EmptyInput`] if `stations` is empty.
pub fn nearest(point: Coordinate, stations: &[Station]) -> Result<NearestStation<'_>, EstimateError> {
    let mut best: Option<NearestStation<'_>> = None;

    for station in stations {
        let distance = distance_km(point, station.coordinate());
        log::trace!("{} is {distance} km from {point}", station.name);

        match &best {
            None => {
                best = Some(NearestStation {
                    station,
                    distance_km: distance,
                });
            }
            Some(current) if distance < current.distance_km => {
                best = Some(NearestStation {
                    station,
                    distance_km: distance,
                });
            }
            _ => {}
        }
    }

    let best = best.ok_or(EstimateError::EmptyInput)?;
    log::debug!(
        "Nearest station to {point}: {} ({} km)",
        best.station.name,
        best.distance_km
    );
    Ok(best)
}

/// Returns every station paired with its distance, closest first.
///
/// The sort is stable, so ties keep input order (the head of the result is
/// always the same station [`nearest`] picks).
#[must_use]
pub fn rank(point: Coordinate, stations: &[Station]) -> Vec<NearestStation<'_>> {
    let mut ranked: Vec<NearestStation<'_>> = stations
        .iter()
        .map(|station| NearestStation {
            station,
            distance_km: distance_km(point, station.coordinate()),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kengeri() -> Station {
        Station::new("Kengeri", 12.9133, 77.4488, "+918022851049")
    }

    fn ram_nagar() -> Station {
        Station::new("Ram Nagar", 12.9225, 77.5051, "+918022917567")
    }

    const ADMIN_BLOCK: Coordinate = Coordinate::new(12.9079, 77.4332);

    #[test]
    fn distance_to_self_is_zero() {
        for point in [
            ADMIN_BLOCK,
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(89.9, -179.9),
        ] {
            assert!(distance_km(point, point).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let points = [
            ADMIN_BLOCK,
            kengeri().coordinate(),
            ram_nagar().coordinate(),
            Coordinate::new(28.6139, 77.2090),
        ];
        for a in points {
            for b in points {
                assert!(
                    (distance_km(a, b) - distance_km(b, a)).abs() < f64::EPSILON,
                    "asymmetric distance between {a} and {b}"
                );
            }
        }
    }

    #[test]
    fn distance_is_rounded_to_two_decimals() {
        let d = distance_km(ADMIN_BLOCK, kengeri().coordinate());
        assert!(d > 0.0);
        assert!(((d * 100.0).round() - d * 100.0).abs() < 1e-9);
    }

    #[test]
    fn distance_matches_known_scale() {
        // One degree of latitude near the equator is about 110.6 km.
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 110.57).abs() < 0.05, "got {d}");
    }

    #[test]
    fn eta_is_floor_of_minutes() {
        assert_eq!(eta_minutes(0.0, 40.0).unwrap(), 0);
        assert_eq!(eta_minutes(10.0, 40.0).unwrap(), 15);
        assert_eq!(eta_minutes(1.79, 40.0).unwrap(), 2);
        assert_eq!(eta_minutes(0.66, 40.0).unwrap(), 0);
    }

    #[test]
    fn eta_rejects_bad_speed_and_distance() {
        assert_eq!(eta_minutes(5.0, 0.0), Err(EstimateError::InvalidSpeed(0.0)));
        assert_eq!(
            eta_minutes(5.0, -10.0),
            Err(EstimateError::InvalidSpeed(-10.0))
        );
        assert!(matches!(
            eta_minutes(5.0, f64::NAN),
            Err(EstimateError::InvalidSpeed(_))
        ));
        assert_eq!(
            eta_minutes(-1.0, 40.0),
            Err(EstimateError::InvalidDistance(-1.0))
        );
    }

    #[test]
    fn eta_is_non_negative_for_non_negative_distance() {
        for distance in [0.0, 0.01, 1.5, 42.0, 1000.0] {
            for speed in [1.0, 40.0, 120.0] {
                let eta = eta_minutes(distance, speed).unwrap();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let expected = (distance / speed * 60.0).floor() as u32;
                assert_eq!(eta, expected);
            }
        }
    }

    #[test]
    fn resolves_kengeri_for_admin_block() {
        let stations = vec![kengeri(), ram_nagar()];
        let result = nearest(ADMIN_BLOCK, &stations).unwrap();

        assert_eq!(result.station.name, "Kengeri");
        assert!(result.distance_km > 0.0);
        assert!(
            (result.distance_km - distance_km(ADMIN_BLOCK, kengeri().coordinate())).abs()
                < f64::EPSILON
        );

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected_eta = (result.distance_km / 40.0 * 60.0).floor() as u32;
        assert_eq!(eta_minutes(result.distance_km, 40.0).unwrap(), expected_eta);
    }

    #[test]
    fn nearest_distance_is_the_minimum() {
        let stations = vec![
            ram_nagar(),
            kengeri(),
            Station::new("Far", 13.5, 78.0, "101"),
        ];
        let result = nearest(ADMIN_BLOCK, &stations).unwrap();
        let min = stations
            .iter()
            .map(|s| distance_km(ADMIN_BLOCK, s.coordinate()))
            .fold(f64::INFINITY, f64::min);
        assert!((result.distance_km - min).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_resolve_to_first_station() {
        let origin = Coordinate::new(0.0, 0.0);
        let stations = vec![
            Station::new("North", 0.01, 0.0, "1"),
            Station::new("South", -0.01, 0.0, "2"),
        ];
        for _ in 0..10 {
            assert_eq!(nearest(origin, &stations).unwrap().station.name, "North");
        }

        let reversed: Vec<Station> = stations.into_iter().rev().collect();
        assert_eq!(nearest(origin, &reversed).unwrap().station.name, "South");
    }

    #[test]
    fn empty_station_list_is_an_error() {
        assert_eq!(nearest(ADMIN_BLOCK, &[]), Err(EstimateError::EmptyInput));
    }

    #[test]
    fn rank_orders_by_distance_and_agrees_with_nearest() {
        let stations = vec![ram_nagar(), kengeri()];
        let ranked = rank(ADMIN_BLOCK, &stations);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].station.name, "Kengeri");
        assert_eq!(ranked[1].station.name, "Ram Nagar");
        assert_eq!(
            ranked[0].station,
            nearest(ADMIN_BLOCK, &stations).unwrap().station
        );
    }

    #[test]
    fn response_speed_defaults_to_forty() {
        assert!((ResponseSpeed::default().kmph() - 40.0).abs() < f64::EPSILON);
        assert!(ResponseSpeed::new(0.0).is_err());
    }
}
