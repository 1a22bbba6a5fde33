//! Car agent for the traffic simulation
//!
//! A car's tick is split in two. [`SimCar::observe`] reads the previous
//! tick's snapshot and produces a [`CarDecision`]; [`SimCar::apply`] then
//! integrates speed and position and resolves turns.

use log::{debug, warn};
use ordered_float::OrderedFloat;

use super::config::SimConfig;
use super::following::{find_leader, following_speed};
use super::grid::{circular_distance, forward_distance, GridTopology};
use super::intersection::{ApproachControl, SimIntersection};
use super::random::RandomSource;
use super::signal::SignalState;
use super::turn::{compute_turn, CarKinematics};
use super::types::{
    wrap_unit, CarId, CarState, Direction, IntersectionId, Orientation, TurnKind, ACCELERATION,
    APPROACH_SPEED_FACTOR, CAPTURE_RADIUS, DECELERATION, LEFT_TURN_CHANCE, MIN_STANDOFF,
    RIGHT_TURN_CHANCE, STOP_DISTANCE, STOP_LINE_DISTANCE, STOP_SIGN_MAX_WAIT,
    STOP_SIGN_MIN_WAIT,
};

/// Travel limits below this normalized distance bring the car to rest
const REST_EPSILON: f32 = 1e-5;

/// Read-only view of the road layout a car reasons about
#[derive(Debug, Clone, Copy)]
pub struct RoadView<'a> {
    pub grid: GridTopology,
    pub intersections: &'a [SimIntersection],
    pub config: &'a SimConfig,
}

/// What a car decided to do this tick, computed from the snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarDecision {
    pub target_speed: f32,
    pub approach: Option<IntersectionId>,
    pub wait_timer: f32,
    pub stop_wait: f32,
    pub clearing_intersection: bool,
    /// Held by a stop sign or light inside the stop distance
    pub held: bool,
    /// Slowing for an intersection that would hold it
    pub approaching_stop: bool,
    /// Furthest normalized distance the car may travel this tick
    pub travel_limit: Option<f32>,
}

/// A car in the traffic simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimCar {
    pub id: CarId,
    pub orientation: Orientation,
    /// Row index for horizontal cars, column index for vertical cars
    pub road: usize,
    pub lane: u8,
    pub direction: Direction,
    /// Normalized position along the road, in `[0, 1)`
    pub pos: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub target_speed: f32,
    pub stopped: bool,
    /// Seconds since arriving at the current stop
    pub wait_timer: f32,
    /// Randomized wait required at the current stop sign
    pub stop_wait: f32,
    pub clearing_intersection: bool,
    pub has_turned: bool,
    /// Intersection the last turn decision was drawn at
    pub turned_at: Option<IntersectionId>,
    /// Intersection inside the stop distance the flags above refer to
    pub approach: Option<IntersectionId>,
    pub state: CarState,
    pub turns_taken: u32,
}

impl SimCar {
    pub fn new(id: CarId, kinematics: CarKinematics, max_speed: f32) -> Self {
        Self {
            id,
            orientation: kinematics.orientation,
            road: kinematics.road,
            lane: kinematics.lane,
            direction: kinematics.direction,
            pos: wrap_unit(kinematics.pos),
            speed: 0.0,
            max_speed,
            target_speed: max_speed,
            stopped: true,
            wait_timer: 0.0,
            stop_wait: 0.0,
            clearing_intersection: false,
            has_turned: false,
            turned_at: None,
            approach: None,
            state: CarState::Cruising,
            turns_taken: 0,
        }
    }

    pub fn kinematics(&self) -> CarKinematics {
        CarKinematics {
            orientation: self.orientation,
            direction: self.direction,
            road: self.road,
            lane: self.lane,
            pos: self.pos,
        }
    }

    fn set_kinematics(&mut self, kinematics: CarKinematics) {
        self.orientation = kinematics.orientation;
        self.direction = kinematics.direction;
        self.road = kinematics.road;
        self.lane = kinematics.lane;
        self.pos = wrap_unit(kinematics.pos);
    }

    /// Position in grid units, `(x, y)`
    pub fn grid_position(&self, grid_size: usize) -> (f32, f32) {
        let along = self.pos * grid_size as f32;
        match self.orientation {
            Orientation::Horizontal => (along, self.road as f32),
            Orientation::Vertical => (self.road as f32, along),
        }
    }

    /// World length of the road the car is on
    pub fn road_extent(&self, config: &SimConfig) -> f32 {
        match self.orientation {
            Orientation::Horizontal => config.width,
            Orientation::Vertical => config.height,
        }
    }

    /// Nearest intersection ahead on the current road and its forward distance
    pub fn nearest_ahead<'a>(&self, view: &RoadView<'a>) -> Option<(&'a SimIntersection, f32)> {
        let sign = self.direction.sign();
        on_road(self.orientation, self.road, view.intersections)
            .map(|intersection| {
                let centre = centre_along(&view.grid, self.orientation, intersection);
                (intersection, forward_distance(self.pos, centre, sign))
            })
            .min_by_key(|(_, distance)| OrderedFloat(*distance))
    }

    /// Intersection whose centre lies within the capture radius, if any
    pub fn intersection_in_capture<'a>(&self, view: &RoadView<'a>) -> Option<&'a SimIntersection> {
        on_road(self.orientation, self.road, view.intersections)
            .map(|intersection| {
                let centre = centre_along(&view.grid, self.orientation, intersection);
                (intersection, circular_distance(self.pos, centre))
            })
            .filter(|(_, distance)| *distance <= CAPTURE_RADIUS)
            .min_by_key(|(_, distance)| OrderedFloat(*distance))
            .map(|(intersection, _)| intersection)
    }

    /// Decide this tick's target speed and stop state from the snapshot
    ///
    /// `snapshot[index]` must be this car as of the previous tick.
    pub fn observe<R: RandomSource>(
        &self,
        index: usize,
        snapshot: &[SimCar],
        view: &RoadView<'_>,
        dt: f32,
        rng: &mut R,
    ) -> CarDecision {
        let mut decision = CarDecision {
            target_speed: self.max_speed,
            approach: self.approach,
            wait_timer: self.wait_timer,
            stop_wait: self.stop_wait,
            clearing_intersection: self.clearing_intersection,
            held: false,
            approaching_stop: false,
            travel_limit: None,
        };

        match self.nearest_ahead(view) {
            Some((intersection, distance)) if distance <= STOP_DISTANCE => {
                if decision.approach == Some(intersection.id) {
                    decision.wait_timer += dt;
                } else {
                    decision.approach = Some(intersection.id);
                    decision.wait_timer = 0.0;
                    decision.clearing_intersection = false;
                    decision.stop_wait = match intersection.approach(self.orientation) {
                        ApproachControl::StopSign => {
                            rng.range(STOP_SIGN_MIN_WAIT, STOP_SIGN_MAX_WAIT)
                        }
                        ApproachControl::Light(_) => 0.0,
                    };
                }

                if !decision.clearing_intersection {
                    decision.clearing_intersection = match intersection.approach(self.orientation) {
                        ApproachControl::StopSign => {
                            let released = decision.wait_timer >= decision.stop_wait;
                            if released {
                                debug!(
                                    "car {:?} released from stop sign {:?} after {:.2}s",
                                    self.id, intersection.id, decision.wait_timer
                                );
                            }
                            released
                        }
                        ApproachControl::Light(state) => state == SignalState::Green,
                    };
                }

                if !decision.clearing_intersection {
                    decision.held = true;
                    decision.target_speed = 0.0;
                    decision.travel_limit = Some((distance - STOP_LINE_DISTANCE).max(0.0));
                }
            }
            nearest => {
                decision.approach = None;
                decision.wait_timer = 0.0;
                decision.stop_wait = 0.0;
                decision.clearing_intersection = false;

                if let Some((intersection, distance)) = nearest {
                    let holds = !matches!(
                        intersection.approach(self.orientation),
                        ApproachControl::Light(SignalState::Green)
                    );
                    if holds && distance <= view.config.approach_distance {
                        decision.approaching_stop = true;
                        decision.target_speed = self.max_speed * APPROACH_SPEED_FACTOR;
                        decision.travel_limit = Some((distance - STOP_LINE_DISTANCE).max(0.0));
                    }
                }
            }
        }

        if let Some(leader) = find_leader(snapshot, index) {
            if let Some(cap) = following_speed(
                self.max_speed,
                &leader,
                view.config.safety_distance,
                view.config.min_follow_speed,
            ) {
                decision.target_speed = decision.target_speed.min(cap);
            }
            let room = (leader.gap - MIN_STANDOFF).max(0.0);
            decision.travel_limit = Some(decision.travel_limit.map_or(room, |limit| limit.min(room)));
        }

        decision
    }

    /// Apply a decision: integrate speed and position, then resolve turns
    pub fn apply<R: RandomSource>(
        &mut self,
        decision: &CarDecision,
        view: &RoadView<'_>,
        dt: f32,
        rng: &mut R,
    ) {
        self.approach = decision.approach;
        self.wait_timer = decision.wait_timer;
        self.stop_wait = decision.stop_wait;
        self.clearing_intersection = decision.clearing_intersection;
        self.target_speed = decision.target_speed.clamp(0.0, self.max_speed);

        if self.speed < self.target_speed {
            self.speed = (self.speed + ACCELERATION * dt).min(self.target_speed);
        } else {
            self.speed = (self.speed - DECELERATION * dt).max(self.target_speed);
        }
        self.speed = self.speed.clamp(0.0, self.max_speed);

        let extent = self.road_extent(view.config);
        let mut travel = self.speed * dt / extent;
        if let Some(limit) = decision.travel_limit {
            if travel > limit {
                if limit <= REST_EPSILON {
                    travel = 0.0;
                    self.speed = 0.0;
                } else {
                    travel = limit;
                    if dt > 0.0 {
                        self.speed = (limit * extent / dt).min(self.speed);
                    }
                }
            }
        }
        self.pos = wrap_unit(self.pos + self.direction.sign() * travel);
        self.stopped = self.speed <= 0.0;

        if !decision.held {
            self.resolve_turn(view, rng);
        }

        self.state = if self.clearing_intersection {
            CarState::ClearingIntersection
        } else if decision.held && self.stopped {
            CarState::Stopped
        } else if decision.held || decision.approaching_stop {
            CarState::ApproachingStop
        } else {
            CarState::Cruising
        };
    }

    fn is_in_capture(&self, view: &RoadView<'_>, id: IntersectionId) -> bool {
        on_road(self.orientation, self.road, view.intersections)
            .filter(|intersection| intersection.id == id)
            .any(|intersection| {
                let centre = centre_along(&view.grid, self.orientation, intersection);
                circular_distance(self.pos, centre) <= CAPTURE_RADIUS
            })
    }

    fn resolve_turn<R: RandomSource>(&mut self, view: &RoadView<'_>, rng: &mut R) {
        if let Some(previous) = self.turned_at {
            if self.is_in_capture(view, previous) {
                return;
            }
            self.turned_at = None;
            self.has_turned = false;
        }
        let Some(intersection) = self.intersection_in_capture(view) else {
            return;
        };
        self.turned_at = Some(intersection.id);
        self.has_turned = true;

        let turn = choose_turn(rng);
        if turn == TurnKind::Straight {
            return;
        }
        let turned = compute_turn(self.kinematics(), intersection, turn, view.grid.size());
        // Backstop: the turn table only yields interior roads
        if !view.grid.is_interior(turned.road) {
            warn!(
                "car {:?} cannot turn {:?} onto road {} at {:?}, going straight",
                self.id, turn, turned.road, intersection.id
            );
            return;
        }

        debug!(
            "car {:?} turns {:?} at ({}, {}) onto {:?} road {}",
            self.id, turn, intersection.x, intersection.y, turned.orientation, turned.road
        );
        self.set_kinematics(turned);
        self.turns_taken += 1;

        // Committed to the intersection the car now sits on
        let landed = self.intersection_in_capture(view).map(|landed| landed.id);
        self.turned_at = landed;
        self.has_turned = landed.is_some();
        self.approach = landed;
        self.wait_timer = 0.0;
        self.stop_wait = 0.0;
        self.clearing_intersection = true;
    }
}

fn on_road(
    orientation: Orientation,
    road: usize,
    intersections: &[SimIntersection],
) -> impl Iterator<Item = &SimIntersection> {
    intersections.iter().filter(move |intersection| {
        GridTopology::road_through(orientation, intersection.x, intersection.y) == road
    })
}

/// Normalized position of `intersection` along a road of `orientation`
fn centre_along(grid: &GridTopology, orientation: Orientation, intersection: &SimIntersection) -> f32 {
    grid.normalized(GridTopology::crossing_coord(
        orientation,
        intersection.x,
        intersection.y,
    ))
}

/// Weighted turn choice: a quarter left, a quarter right, otherwise straight
pub fn choose_turn<R: RandomSource>(rng: &mut R) -> TurnKind {
    let roll = rng.next_unit();
    if roll < LEFT_TURN_CHANCE {
        TurnKind::Left
    } else if roll < LEFT_TURN_CHANCE + RIGHT_TURN_CHANCE {
        TurnKind::Right
    } else {
        TurnKind::Straight
    }
}
