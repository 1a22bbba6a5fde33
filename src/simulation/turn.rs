//! Turn resolution at intersections
//!
//! Maps a car's lane, direction and position onto the crossing road after a
//! left or right turn. The Left and Right rows take the new road index from
//! different intersection axes; that mapping is kept as-is because existing
//! scenarios depend on it.

use super::intersection::SimIntersection;
use super::types::{Direction, Orientation, TurnKind};

/// The part of a car's state a turn rewrites
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarKinematics {
    pub orientation: Orientation,
    pub direction: Direction,
    pub road: usize,
    pub lane: u8,
    pub pos: f32,
}

/// Where a car ends up after taking `turn` at `intersection`
pub fn compute_turn(
    car: CarKinematics,
    intersection: &SimIntersection,
    turn: TurnKind,
    grid_size: usize,
) -> CarKinematics {
    let (x, y) = (intersection.x, intersection.y);
    let n = grid_size as f32;
    match (turn, car.orientation) {
        (TurnKind::Straight, _) => car,
        (TurnKind::Left, Orientation::Horizontal) => CarKinematics {
            orientation: Orientation::Vertical,
            direction: car.direction.flipped(),
            road: y,
            lane: car.lane,
            pos: y as f32 / n,
        },
        (TurnKind::Right, Orientation::Horizontal) => CarKinematics {
            orientation: Orientation::Vertical,
            direction: car.direction,
            road: x,
            lane: 1,
            pos: y as f32 / n,
        },
        (TurnKind::Left, Orientation::Vertical) => CarKinematics {
            orientation: Orientation::Horizontal,
            direction: car.direction.flipped(),
            road: x,
            lane: car.lane,
            pos: x as f32 / n,
        },
        (TurnKind::Right, Orientation::Vertical) => CarKinematics {
            orientation: Orientation::Horizontal,
            direction: car.direction,
            road: y,
            lane: 0,
            pos: x as f32 / n,
        },
    }
}
