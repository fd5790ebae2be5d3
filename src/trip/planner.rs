//! Route planning and directions assembly.

use super::map::{Direction, EuclideanDistancer, RoadMap};
use super::TripError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One numbered step of the directions: a stretch of a single road
/// driven in a single direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Road name.
    pub road: String,
    /// Travel direction.
    pub direction: Direction,
    /// Length in miles, summed over collapsed segments.
    pub length: f64,
    /// Set on the final leg reaching a requested stop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// A planned trip: the starting location and the legs to drive.
///
/// `Display` renders the directions in their user-facing form:
///
/// ```text
/// From A:
///
/// 1. Take main north for 30.0 miles to C.
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// First requested stop.
    pub start: String,
    /// Driving legs across all requested stops, in order.
    pub legs: Vec<Leg>,
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From {}:", self.start)?;
        writeln!(f)?;
        for (number, leg) in self.legs.iter().enumerate() {
            write!(
                f,
                "{}. Take {} {} for {:.1} miles",
                number + 1,
                leg.road,
                leg.direction,
                leg.length
            )?;
            match &leg.destination {
                Some(destination) => writeln!(f, " to {destination}.")?,
                None => writeln!(f, ".")?,
            }
        }
        Ok(())
    }
}

/// Plans routes over a parsed [`RoadMap`].
#[derive(Debug)]
pub struct RoutePlanner {
    map: RoadMap,
}

impl RoutePlanner {
    /// Create a planner over `map`.
    pub fn new(map: RoadMap) -> Self {
        Self { map }
    }

    /// The map this planner routes over.
    pub fn map(&self) -> &RoadMap {
        &self.map
    }

    /// Split a comma-separated request into stop names.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::BadRequest`] for fewer than two stops.
    pub fn parse_request(request: &str) -> Result<Vec<String>, TripError> {
        let stops: Vec<String> = request
            .split(',')
            .map(|stop| stop.trim().to_string())
            .filter(|stop| !stop.is_empty())
            .collect();
        if stops.len() < 2 {
            return Err(TripError::BadRequest);
        }
        Ok(stops)
    }

    /// Plan a trip visiting `stops` in order.
    ///
    /// Consecutive stops are routed independently with the Euclidean
    /// heuristic and the results concatenated. Within each routed pair,
    /// consecutive segments of the same road in the same direction
    /// collapse into one leg with summed length; the pair's final leg
    /// carries the destination name.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::BadRequest`] for fewer than two stops,
    /// [`TripError::UnknownLocation`] for an undefined stop name, and
    /// [`TripError::NoRoute`] when no road sequence connects a pair.
    pub fn plan(&mut self, stops: &[String]) -> Result<Trip, TripError> {
        if stops.len() < 2 {
            return Err(TripError::BadRequest);
        }
        let mut legs = Vec::new();
        for pair in stops.windows(2) {
            self.route_pair(&pair[0], &pair[1], &mut legs)?;
        }
        info!("Planned trip through {} stops, {} legs", stops.len(), legs.len());
        Ok(Trip {
            start: stops[0].clone(),
            legs,
        })
    }

    fn route_pair(
        &mut self,
        from_name: &str,
        to_name: &str,
        legs: &mut Vec<Leg>,
    ) -> Result<(), TripError> {
        let from = self
            .map
            .location(from_name)
            .ok_or_else(|| TripError::UnknownLocation(from_name.to_string()))?;
        let to = self
            .map
            .location(to_name)
            .ok_or_else(|| TripError::UnknownLocation(to_name.to_string()))?;

        debug!("Routing {from_name} -> {to_name}");
        let path = self
            .map
            .graph_mut()
            .shortest_path_weighted(from, to, &EuclideanDistancer)?
            .ok_or_else(|| TripError::NoRoute {
                from: from_name.to_string(),
                to: to_name.to_string(),
            })?;

        let mut segments: Vec<Leg> = Vec::new();
        for edge in &path.edges {
            let road = self.map.graph().edge_label(*edge)?;
            match segments.last_mut() {
                Some(last) if last.road == road.name && last.direction == road.direction => {
                    last.length += road.length;
                }
                _ => segments.push(Leg {
                    road: road.name.clone(),
                    direction: road.direction,
                    length: road.length,
                    destination: None,
                }),
            }
        }
        if let Some(last) = segments.last_mut() {
            last.destination = Some(to_name.to_string());
        }
        legs.extend(segments);
        Ok(())
    }
}
