//! Core types for the grid traffic simulation
//!
//! Identifiers, small enums and the tuning constants shared by every module.

/// A unique identifier for simulation entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for intersection IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId(pub SimId);

/// A wrapper type for car IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub SimId);

/// Axis a car travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Travels along a row (east/west)
    Horizontal,
    /// Travels along a column (north/south)
    Vertical,
}

impl Orientation {
    pub fn perpendicular(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Sense of travel along the normalized road position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Increasing position
    Forward,
    /// Decreasing position
    Backward,
}

impl Direction {
    /// The direction as `+1.0` / `-1.0`
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Turn chosen when crossing an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnKind {
    Left,
    Right,
    Straight,
}

/// Decision state of a car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CarState {
    #[default]
    Cruising,
    /// Slowing for an intersection that currently holds it
    ApproachingStop,
    /// Held at a stop line with zero speed
    Stopped,
    /// Committed to crossing the intersection ahead
    ClearingIntersection,
}

/// Normalized distance ahead of an intersection at which a car evaluates its control
pub const STOP_DISTANCE: f32 = 0.04;

/// Normalized distance from the intersection centre where held cars come to rest
pub const STOP_LINE_DISTANCE: f32 = 0.035;

/// Normalized radius around an intersection centre in which a turn is resolved
pub const CAPTURE_RADIUS: f32 = 0.03;

/// Closest normalized gap a car may close to its leader
pub const MIN_STANDOFF: f32 = 0.01;

/// Acceleration toward a higher target speed (units/s²)
pub const ACCELERATION: f32 = 30.0;

/// Deceleration toward a lower target speed (units/s²)
pub const DECELERATION: f32 = 60.0;

/// Fraction of max speed allowed while approaching an intersection that holds the car
pub const APPROACH_SPEED_FACTOR: f32 = 0.5;

/// Shortest randomized stop-sign wait (seconds)
pub const STOP_SIGN_MIN_WAIT: f32 = 0.8;

/// Longest randomized stop-sign wait (seconds)
pub const STOP_SIGN_MAX_WAIT: f32 = 1.5;

/// Probability of a left turn at an intersection
pub const LEFT_TURN_CHANCE: f32 = 0.25;

/// Probability of a right turn at an intersection
pub const RIGHT_TURN_CHANCE: f32 = 0.25;

/// Wrap a normalized position into `[0, 1)`
pub fn wrap_unit(value: f32) -> f32 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
