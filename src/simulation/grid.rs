//! Grid topology
//!
//! Roads and intersections are derived from a single grid size. Border
//! indices carry no road.

use anyhow::{ensure, Result};

use super::types::{wrap_unit, Orientation};

/// Road and intersection layout for a given grid size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTopology {
    size: usize,
}

impl GridTopology {
    pub fn new(size: usize) -> Result<Self> {
        ensure!(size >= 3, "grid size must be at least 3, got {}", size);
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Indices of the roads along either axis
    pub fn road_indices(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.size - 2
    }

    /// Number of roads along each axis
    pub fn road_count(&self) -> usize {
        self.size - 2
    }

    /// Whether `road` is an interior road index
    pub fn is_interior(&self, road: usize) -> bool {
        self.road_indices().contains(&road)
    }

    /// All intersection coordinates, row-major
    pub fn intersection_coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.road_indices()
            .flat_map(move |y| self.road_indices().map(move |x| (x, y)))
    }

    /// Normalized position of grid coordinate `coord` along any road
    pub fn normalized(&self, coord: usize) -> f32 {
        coord as f32 / self.size as f32
    }

    /// Coordinate along a road of `orientation` at which the crossing road `(x, y)` sits
    pub fn crossing_coord(orientation: Orientation, x: usize, y: usize) -> usize {
        match orientation {
            Orientation::Horizontal => x,
            Orientation::Vertical => y,
        }
    }

    /// Index of the road of `orientation` that passes through `(x, y)`
    pub fn road_through(orientation: Orientation, x: usize, y: usize) -> usize {
        match orientation {
            Orientation::Horizontal => y,
            Orientation::Vertical => x,
        }
    }
}

/// Forward distance from `from` to `to` along a wrapping unit road
pub fn forward_distance(from: f32, to: f32, direction_sign: f32) -> f32 {
    wrap_unit((to - from) * direction_sign)
}

/// Shortest distance between two normalized positions on a wrapping road
pub fn circular_distance(a: f32, b: f32) -> f32 {
    let d = wrap_unit(a - b);
    d.min(1.0 - d)
}
