//! Grid Traffic Simulation Library
//!
//! A headless traffic simulation over a grid of signalized and unsignalized
//! intersections, driven one tick at a time by a host.

pub mod simulation;
