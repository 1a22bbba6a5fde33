//! Grid traffic simulation core
//!
//! A lattice of two-lane roads, stop-sign and stop-light intersections and a
//! fixed population of cars. Rendering, input and scheduling belong to the
//! host; the core only takes a time step and exposes the world state.

mod car;
mod config;
mod following;
mod grid;
mod intersection;
mod random;
mod signal;
mod stats;
mod turn;
mod types;
mod world;

pub use car::{choose_turn, CarDecision, RoadView, SimCar};
pub use config::SimConfig;
pub use following::{find_leader, following_speed, same_lane, Leader};
pub use grid::{circular_distance, forward_distance, GridTopology};
pub use intersection::{
    ApproachControl, IntersectionControl, IntersectionKind, IntersectionView, SimIntersection,
};
pub use random::{FixedSequence, RandomSource};
pub use signal::{
    SignalEvent, SignalGroup, SignalPair, SignalState, GREEN_DURATION, YELLOW_DURATION,
};
pub use stats::WorldStats;
pub use turn::{compute_turn, CarKinematics};
pub use types::{
    wrap_unit, CarId, CarState, Direction, IntersectionId, Orientation, SimId, TurnKind,
    ACCELERATION, APPROACH_SPEED_FACTOR, CAPTURE_RADIUS, DECELERATION, LEFT_TURN_CHANCE,
    MIN_STANDOFF, RIGHT_TURN_CHANCE, STOP_DISTANCE, STOP_LINE_DISTANCE, STOP_SIGN_MAX_WAIT,
    STOP_SIGN_MIN_WAIT,
};
pub use world::SimWorld;
