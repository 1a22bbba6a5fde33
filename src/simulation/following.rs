//! Collision avoidance by following the car ahead
//!
//! Reads only a snapshot of the previous tick, so the result does not depend
//! on the order in which cars are processed.

use ordered_float::OrderedFloat;

use super::car::SimCar;
use super::grid::forward_distance;

/// The nearest car ahead in the same lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leader {
    /// Index of the leader in the snapshot
    pub index: usize,
    /// Normalized forward gap to the leader
    pub gap: f32,
    pub stopped: bool,
}

/// Whether `a` and `b` share orientation, road, lane and direction
pub fn same_lane(a: &SimCar, b: &SimCar) -> bool {
    a.orientation == b.orientation
        && a.road == b.road
        && a.lane == b.lane
        && a.direction == b.direction
}

/// Find the nearest car ahead of `cars[index]`, wrapping across the road end
///
/// Of two cars on the same spot, the one with the higher index leads.
pub fn find_leader(cars: &[SimCar], index: usize) -> Option<Leader> {
    let car = &cars[index];
    let sign = car.direction.sign();
    cars.iter()
        .enumerate()
        .filter(|(other_index, other)| *other_index != index && same_lane(car, other))
        .map(|(other_index, other)| Leader {
            index: other_index,
            gap: forward_distance(car.pos, other.pos, sign),
            stopped: other.stopped,
        })
        .filter(|leader| leader.gap > 0.0 || leader.index > index)
        .min_by_key(|leader| (OrderedFloat(leader.gap), leader.index))
}

/// Speed cap imposed by `leader`, or `None` when it is outside the safety distance
pub fn following_speed(
    max_speed: f32,
    leader: &Leader,
    safety_distance: f32,
    min_follow_speed: f32,
) -> Option<f32> {
    if leader.gap >= safety_distance {
        return None;
    }
    if leader.stopped {
        return Some(0.0);
    }
    let scaled = max_speed * (leader.gap / safety_distance);
    Some(scaled.max(min_follow_speed).min(max_speed))
}
