//! Aggregate statistics over the world state

use std::fmt;

use super::car::SimCar;
use super::intersection::{IntersectionKind, SimIntersection};
use super::signal::SignalState;
use super::types::{CarState, Orientation};

/// Snapshot of simulation-wide metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldStats {
    pub time: f32,
    pub ticks: u64,
    pub cars: usize,
    pub stopped_cars: usize,
    pub clearing_cars: usize,
    pub mean_speed: f32,
    pub turns_taken: u64,
    pub stop_signs: usize,
    pub stop_lights: usize,
    /// Lights currently green for north/south traffic
    pub green_ns: usize,
    /// Lights currently green for east/west traffic
    pub green_ew: usize,
}

impl WorldStats {
    pub fn collect(
        time: f32,
        ticks: u64,
        cars: &[SimCar],
        intersections: &[SimIntersection],
    ) -> Self {
        let mean_speed = if cars.is_empty() {
            0.0
        } else {
            cars.iter().map(|car| car.speed).sum::<f32>() / cars.len() as f32
        };

        let green_for = |orientation: Orientation| {
            intersections
                .iter()
                .filter_map(|intersection| intersection.signals())
                .filter(|pair| pair.state_for(orientation) == SignalState::Green)
                .count()
        };

        Self {
            time,
            ticks,
            cars: cars.len(),
            stopped_cars: cars.iter().filter(|car| car.stopped).count(),
            clearing_cars: cars
                .iter()
                .filter(|car| car.state == CarState::ClearingIntersection)
                .count(),
            mean_speed,
            turns_taken: cars.iter().map(|car| u64::from(car.turns_taken)).sum(),
            stop_signs: intersections
                .iter()
                .filter(|intersection| intersection.kind() == IntersectionKind::StopSign)
                .count(),
            stop_lights: intersections
                .iter()
                .filter(|intersection| intersection.kind() == IntersectionKind::StopLight)
                .count(),
            green_ns: green_for(Orientation::Vertical),
            green_ew: green_for(Orientation::Horizontal),
        }
    }
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.1}s ticks={} cars={} stopped={} clearing={} mean_speed={:.1} turns={} lights={} (ns green {}, ew green {}) stop_signs={}",
            self.time,
            self.ticks,
            self.cars,
            self.stopped_cars,
            self.clearing_cars,
            self.mean_speed,
            self.turns_taken,
            self.stop_lights,
            self.green_ns,
            self.green_ew,
            self.stop_signs
        )
    }
}
