//! Road map ingestion.
//!
//! The map format is line-oriented. A location line names a point with
//! Cartesian coordinates:
//!
//! ```text
//! L NAME X Y
//! ```
//!
//! A road line connects two already defined locations:
//!
//! ```text
//! R START NAME LENGTH DIRECTION END
//! ```
//!
//! `DIRECTION` is the travel direction from `START` to `END`: `NS` is
//! south, `SN` north, `EW` west, `WE` east. Every road is drivable both
//! ways, so one line inserts two directed edges, the return edge carrying
//! the opposite direction. Blank lines and `#` comments are skipped.

use super::TripError;
use crate::graph::{Distancer, LabeledGraph, VertexId, Weightable, Weighted};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

// Line patterns compiled once; matching is anchored per line.
static RE_IGNORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:#.*)?$").unwrap());
static RE_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*L\s+(\w+)\s+(\d+)\s+(\d+)\s*$").unwrap());
static RE_ROAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*R\s+(\w+)\s+(\w+)\s+(\d+)\s+(NS|EW|WE|SN)\s+(\w+)\s*$").unwrap()
});

/// A compass travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward increasing north.
    North,
    /// Toward increasing south.
    South,
    /// Toward increasing east.
    East,
    /// Toward increasing west.
    West,
}

impl Direction {
    /// The direction of the return trip.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "SN" => Some(Direction::North),
            "NS" => Some(Direction::South),
            "WE" => Some(Direction::East),
            "EW" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{s}")
    }
}

/// A named point on the map.
///
/// Carries a tentative route distance so the planner can run the
/// weight-capable-label path search directly over the map graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Location name.
    pub name: String,
    /// West-east coordinate.
    pub x: f64,
    /// South-north coordinate.
    pub y: f64,
    // Tentative route distance written by the path search.
    distance: f64,
}

impl Location {
    /// Create a location at `(x, y)`.
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            distance: f64::INFINITY,
        }
    }

    /// Straight-line distance to `other`.
    pub fn distance_to(&self, other: &Location) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Weighted for Location {
    fn weight(&self) -> f64 {
        self.distance
    }
}

impl Weightable for Location {
    fn set_weight(&mut self, weight: f64) {
        self.distance = weight;
    }
}

/// One drivable road segment in one travel direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Road name, shared by consecutive segments of the same road.
    pub name: String,
    /// Travel direction of this segment.
    pub direction: Direction,
    /// Segment length in miles.
    pub length: f64,
}

impl Weighted for Road {
    fn weight(&self) -> f64 {
        self.length
    }
}

/// Straight-line distance between two locations.
///
/// Admissible and consistent whenever every road is at least as long as
/// the straight line between its endpoints, which road maps satisfy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistancer;

impl Distancer<Location> for EuclideanDistancer {
    fn dist(&self, a: &Location, b: &Location) -> f64 {
        a.distance_to(b)
    }
}

/// A parsed road map: the directed road graph plus a name index.
#[derive(Debug)]
pub struct RoadMap {
    graph: LabeledGraph<Location, Road>,
    index: HashMap<String, VertexId>,
}

impl RoadMap {
    /// Parse map text into a road map.
    ///
    /// A location line for an already defined name updates its
    /// coordinates in place.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::Syntax`] carrying the offending line for a
    /// line matching no part of the grammar, and
    /// [`TripError::UnknownLocation`] for a road endpoint no location
    /// line defined.
    pub fn parse(text: &str) -> Result<Self, TripError> {
        let mut map = Self {
            graph: LabeledGraph::directed(),
            index: HashMap::new(),
        };

        for line in text.lines() {
            if RE_IGNORE.is_match(line) {
                continue;
            }
            if let Some(captures) = RE_LOCATION.captures(line) {
                let name = captures[1].to_string();
                let x: f64 = parse_number(&captures[2], line)?;
                let y: f64 = parse_number(&captures[3], line)?;
                match map.index.get(&name) {
                    Some(&v) => {
                        let label = map.graph.vertex_label_mut(v)?;
                        label.x = x;
                        label.y = y;
                    }
                    None => {
                        debug!("Location {name} at ({x}, {y})");
                        let v = map.graph.add_vertex(Location::new(name.clone(), x, y));
                        map.index.insert(name, v);
                    }
                }
                continue;
            }
            if let Some(captures) = RE_ROAD.captures(line) {
                let length: f64 = parse_number(&captures[3], line)?;
                let direction =
                    Direction::from_token(&captures[4]).ok_or_else(|| TripError::Syntax {
                        line: line.to_string(),
                    })?;
                let from = map.resolve(&captures[1])?;
                let to = map.resolve(&captures[5])?;
                let name = captures[2].to_string();
                debug!("Road {name}: {} {direction} for {length}", &captures[1]);
                map.graph.add_edge(
                    from,
                    to,
                    Road {
                        name: name.clone(),
                        direction,
                        length,
                    },
                )?;
                map.graph.add_edge(
                    to,
                    from,
                    Road {
                        name,
                        direction: direction.opposite(),
                        length,
                    },
                )?;
                continue;
            }
            return Err(TripError::Syntax {
                line: line.to_string(),
            });
        }

        info!(
            "Parsed map: {} locations, {} road segments",
            map.graph.vertex_count(),
            map.graph.edge_count()
        );
        Ok(map)
    }

    /// The underlying road graph.
    pub fn graph(&self) -> &LabeledGraph<Location, Road> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut LabeledGraph<Location, Road> {
        &mut self.graph
    }

    /// The vertex of the named location, if defined.
    pub fn location(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    fn resolve(&self, name: &str) -> Result<VertexId, TripError> {
        self.location(name)
            .ok_or_else(|| TripError::UnknownLocation(name.to_string()))
    }
}

fn parse_number(digits: &str, line: &str) -> Result<f64, TripError> {
    digits.parse().map_err(|_| TripError::Syntax {
        line: line.to_string(),
    })
}
