//! Simulation configuration

use anyhow::{ensure, Result};

/// Everything needed to (re)build a world
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Grid size; roads run at indices `1..=grid_size-2`
    pub grid_size: usize,
    /// Number of cars placed at reset
    pub car_count: usize,
    /// Seed for reproducible resets; `None` draws from the OS entropy source
    pub seed: Option<u64>,
    /// World extent along the horizontal axis (units)
    pub width: f32,
    /// World extent along the vertical axis (units)
    pub height: f32,
    /// Lower bound of the per-car max speed draw (units/s)
    pub min_max_speed: f32,
    /// Upper bound of the per-car max speed draw (units/s)
    pub max_max_speed: f32,
    /// Share of intersections controlled by lights rather than stop signs
    pub stop_light_ratio: f32,
    /// Normalized gap inside which a car follows its leader
    pub safety_distance: f32,
    /// Normalized distance inside which a car slows for an intersection that holds it
    pub approach_distance: f32,
    /// Floor for the following speed behind a moving leader (units/s)
    pub min_follow_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 7,
            car_count: 40,
            seed: None,
            width: 800.0,
            height: 600.0,
            min_max_speed: 60.0,
            max_max_speed: 90.0,
            stop_light_ratio: 0.5,
            safety_distance: 0.06,
            approach_distance: 0.08,
            min_follow_speed: 5.0,
        }
    }
}

impl SimConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_size >= 3,
            "grid size must be at least 3, got {}",
            self.grid_size
        );
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "world extents must be positive, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.min_max_speed > 0.0 && self.min_max_speed <= self.max_max_speed,
            "invalid max speed range {}..{}",
            self.min_max_speed,
            self.max_max_speed
        );
        ensure!(
            (0.0..=1.0).contains(&self.stop_light_ratio),
            "stop light ratio must be within 0..=1, got {}",
            self.stop_light_ratio
        );
        ensure!(
            self.safety_distance > 0.0 && self.safety_distance < 1.0,
            "safety distance must be within (0, 1), got {}",
            self.safety_distance
        );
        ensure!(
            self.approach_distance >= 0.0 && self.approach_distance < 1.0,
            "approach distance must be within [0, 1), got {}",
            self.approach_distance
        );
        ensure!(
            self.min_follow_speed >= 0.0,
            "minimum follow speed must not be negative, got {}",
            self.min_follow_speed
        );
        Ok(())
    }
}
