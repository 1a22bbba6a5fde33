//! Intersection logic for the traffic simulation

use super::signal::{SignalEvent, SignalPair, SignalState};
use super::types::{IntersectionId, Orientation};

/// Right-of-way control at an intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntersectionControl {
    /// Every car stops and waits a short randomized time
    StopSign,
    /// Paired signal groups
    StopLight(SignalPair),
}

/// Kind of control, without the signal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    StopSign,
    StopLight,
}

/// What an approaching car sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachControl {
    StopSign,
    Light(SignalState),
}

/// An intersection in the traffic simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimIntersection {
    pub id: IntersectionId,
    pub x: usize,
    pub y: usize,
    pub control: IntersectionControl,
}

impl SimIntersection {
    pub fn stop_sign(id: IntersectionId, x: usize, y: usize) -> Self {
        Self {
            id,
            x,
            y,
            control: IntersectionControl::StopSign,
        }
    }

    /// A stop light whose group serving `green` starts active
    pub fn stop_light(id: IntersectionId, x: usize, y: usize, green: Orientation) -> Self {
        Self {
            id,
            x,
            y,
            control: IntersectionControl::StopLight(SignalPair::new(green)),
        }
    }

    pub fn kind(&self) -> IntersectionKind {
        match self.control {
            IntersectionControl::StopSign => IntersectionKind::StopSign,
            IntersectionControl::StopLight(_) => IntersectionKind::StopLight,
        }
    }

    /// Control seen by a car travelling along `orientation`
    pub fn approach(&self, orientation: Orientation) -> ApproachControl {
        match &self.control {
            IntersectionControl::StopSign => ApproachControl::StopSign,
            IntersectionControl::StopLight(pair) => {
                ApproachControl::Light(pair.state_for(orientation))
            }
        }
    }

    pub fn signals(&self) -> Option<&SignalPair> {
        match &self.control {
            IntersectionControl::StopSign => None,
            IntersectionControl::StopLight(pair) => Some(pair),
        }
    }

    /// Advance the signal clocks; stop signs hold no state
    pub fn advance(&mut self, dt: f32) -> Vec<SignalEvent> {
        match &mut self.control {
            IntersectionControl::StopSign => Vec::new(),
            IntersectionControl::StopLight(pair) => pair.advance(dt),
        }
    }
}

/// Resolved view of an intersection for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionView {
    pub id: IntersectionId,
    pub x: usize,
    pub y: usize,
    pub kind: IntersectionKind,
    /// Control seen from the north and south
    pub north_south: ApproachControl,
    /// Control seen from the east and west
    pub east_west: ApproachControl,
}

impl From<&SimIntersection> for IntersectionView {
    fn from(intersection: &SimIntersection) -> Self {
        Self {
            id: intersection.id,
            x: intersection.x,
            y: intersection.y,
            kind: intersection.kind(),
            north_south: intersection.approach(Orientation::Vertical),
            east_west: intersection.approach(Orientation::Horizontal),
        }
    }
}
