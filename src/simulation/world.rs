//! Main simulation world that ties everything together
//!
//! The world owns every intersection and car. A host drives it with
//! [`SimWorld::step`] and reads it back for rendering.

use anyhow::{ensure, Context, Result};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::car::{CarDecision, RoadView, SimCar};
use super::config::SimConfig;
use super::following::same_lane;
use super::grid::{circular_distance, GridTopology};
use super::intersection::{IntersectionControl, IntersectionView, SimIntersection};
use super::random::RandomSource;
use super::stats::WorldStats;
use super::turn::CarKinematics;
use super::types::{CarId, Direction, IntersectionId, Orientation, SimId, STOP_DISTANCE};

/// Placement attempts per car before the last candidate is accepted
const SPAWN_ATTEMPTS: usize = 32;

/// The main simulation world
#[derive(Debug, Clone)]
pub struct SimWorld {
    config: SimConfig,
    grid: GridTopology,
    intersections: Vec<SimIntersection>,
    cars: Vec<SimCar>,
    /// Simulation time
    time: f32,
    ticks: u64,
    next_id: usize,
    rng: StdRng,
}

impl SimWorld {
    /// Build a world from `config`, placing intersections and cars at random
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        let grid = GridTopology::new(config.grid_size)?;
        let mut world = Self {
            rng: Self::make_rng(config.seed),
            config,
            grid,
            intersections: Vec::new(),
            cars: Vec::new(),
            time: 0.0,
            ticks: 0,
            next_id: 0,
        };
        world.populate();
        Ok(world)
    }

    /// Build a world from explicit intersections and cars
    ///
    /// The random source for later steps is seeded from `config.seed`.
    pub fn from_parts(
        config: SimConfig,
        intersections: Vec<SimIntersection>,
        cars: Vec<SimCar>,
    ) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        let grid = GridTopology::new(config.grid_size)?;

        for intersection in &intersections {
            ensure!(
                grid.is_interior(intersection.x) && grid.is_interior(intersection.y),
                "intersection {:?} at ({}, {}) is outside the grid",
                intersection.id,
                intersection.x,
                intersection.y
            );
        }
        for car in &cars {
            Self::check_car(&grid, car)?;
        }

        let next_id = intersections
            .iter()
            .map(|intersection| intersection.id.0 .0 + 1)
            .chain(cars.iter().map(|car| car.id.0 .0 + 1))
            .max()
            .unwrap_or(0);

        Ok(Self {
            rng: Self::make_rng(config.seed),
            config,
            grid,
            intersections,
            cars,
            time: 0.0,
            ticks: 0,
            next_id,
        })
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Re-randomize intersections and car placement from the stored config
    ///
    /// With a seeded config this reproduces the initial state exactly.
    pub fn reset(&mut self) -> Result<()> {
        self.config.validate().context("Invalid simulation config")?;
        self.grid = GridTopology::new(self.config.grid_size)?;
        self.rng = Self::make_rng(self.config.seed);
        self.intersections.clear();
        self.cars.clear();
        self.time = 0.0;
        self.ticks = 0;
        self.next_id = 0;
        self.populate();
        Ok(())
    }

    fn populate(&mut self) {
        let coords: Vec<(usize, usize)> = self.grid.intersection_coords().collect();
        for (x, y) in coords {
            let id = IntersectionId(self.next_sim_id());
            let intersection = if self.rng.chance(self.config.stop_light_ratio) {
                let green = if self.rng.chance(0.5) {
                    Orientation::Vertical
                } else {
                    Orientation::Horizontal
                };
                SimIntersection::stop_light(id, x, y, green)
            } else {
                SimIntersection::stop_sign(id, x, y)
            };
            self.intersections.push(intersection);
        }

        for _ in 0..self.config.car_count {
            let id = CarId(self.next_sim_id());
            let car = self.spawn_car(id);
            self.cars.push(car);
        }

        info!(
            "Reset {}x{} grid: {} intersections ({} lights), {} cars",
            self.grid.size(),
            self.grid.size(),
            self.intersections.len(),
            self.intersections
                .iter()
                .filter(|intersection| intersection.signals().is_some())
                .count(),
            self.cars.len()
        );
    }

    fn spawn_car(&mut self, id: CarId) -> SimCar {
        let mut candidate = self.random_car(id);
        for attempt in 1..SPAWN_ATTEMPTS {
            if self.is_clear_spawn(&candidate) {
                return candidate;
            }
            trace!("spawn attempt {} for car {:?} rejected", attempt, id);
            candidate = self.random_car(id);
        }
        if !self.is_clear_spawn(&candidate) {
            debug!("car {:?} placed without clearance after {} attempts", id, SPAWN_ATTEMPTS);
        }
        candidate
    }

    fn random_car(&mut self, id: CarId) -> SimCar {
        let rng = &mut self.rng;
        let orientation = if rng.chance(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let road = 1 + rng.index(self.grid.road_count());
        let lane = rng.index(2) as u8;
        let direction = if rng.chance(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let pos = rng.next_unit();
        let max_speed = rng.range(self.config.min_max_speed, self.config.max_max_speed);

        SimCar::new(
            id,
            CarKinematics {
                orientation,
                direction,
                road,
                lane,
                pos,
            },
            max_speed,
        )
    }

    /// Clear of every intersection's stop distance and of other cars in the lane
    fn is_clear_spawn(&self, candidate: &SimCar) -> bool {
        let near_intersection = self.intersections.iter().any(|intersection| {
            GridTopology::road_through(candidate.orientation, intersection.x, intersection.y)
                == candidate.road
                && circular_distance(
                    candidate.pos,
                    self.grid.normalized(GridTopology::crossing_coord(
                        candidate.orientation,
                        intersection.x,
                        intersection.y,
                    )),
                ) <= STOP_DISTANCE
        });
        let near_car = self.cars.iter().any(|car| {
            same_lane(car, candidate)
                && circular_distance(car.pos, candidate.pos) < self.config.safety_distance
        });
        !near_intersection && !near_car
    }

    fn check_car(grid: &GridTopology, car: &SimCar) -> Result<()> {
        ensure!(
            car.road <= grid.size() - 2,
            "car {:?} is on road {} outside 0..={}",
            car.id,
            car.road,
            grid.size() - 2
        );
        ensure!(car.lane <= 1, "car {:?} has invalid lane {}", car.id, car.lane);
        ensure!(
            (0.0..1.0).contains(&car.pos),
            "car {:?} has position {} outside [0, 1)",
            car.id,
            car.pos
        );
        ensure!(
            car.max_speed >= 0.0 && (0.0..=car.max_speed).contains(&car.speed),
            "car {:?} has speed {} outside 0..={}",
            car.id,
            car.speed,
            car.max_speed
        );
        Ok(())
    }

    /// Advance the world by `dt` seconds using the world's own random source
    pub fn step(&mut self, dt: f32) -> Result<()> {
        let mut rng = std::mem::replace(&mut self.rng, StdRng::from_seed([0; 32]));
        let result = self.step_with(dt, &mut rng);
        self.rng = rng;
        result
    }

    /// Advance the world by `dt` seconds drawing decisions from `rng`
    ///
    /// Signals advance first. Every car then decides from the same snapshot of
    /// the previous tick before any car moves. The tick is built on copies and
    /// committed only if every car passes validation, so an `Err` leaves the
    /// world as it was.
    pub fn step_with<R: RandomSource>(&mut self, dt: f32, rng: &mut R) -> Result<()> {
        ensure!(
            dt.is_finite() && dt >= 0.0,
            "time step must be finite and non-negative, got {}",
            dt
        );

        let mut intersections = self.intersections.clone();
        for intersection in &mut intersections {
            for event in intersection.advance(dt) {
                trace!("intersection {:?}: {:?}", intersection.id, event);
            }
        }

        let snapshot = self.cars.clone();
        let view = RoadView {
            grid: self.grid,
            intersections: &intersections,
            config: &self.config,
        };

        let decisions: Vec<CarDecision> = snapshot
            .iter()
            .enumerate()
            .map(|(index, car)| car.observe(index, &snapshot, &view, dt, &mut *rng))
            .collect();

        let mut cars = snapshot.clone();
        for (car, decision) in cars.iter_mut().zip(&decisions) {
            car.apply(decision, &view, dt, &mut *rng);
        }

        for car in &cars {
            Self::check_car(&self.grid, car)
                .with_context(|| format!("tick {} left the world inconsistent", self.ticks + 1))?;
        }

        self.intersections = intersections;
        self.cars = cars;
        self.time += dt;
        self.ticks += 1;
        Ok(())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> GridTopology {
        self.grid
    }

    pub fn intersections(&self) -> &[SimIntersection] {
        &self.intersections
    }

    /// Intersections with the signal resolved per approach
    pub fn intersection_views(&self) -> Vec<IntersectionView> {
        self.intersections.iter().map(IntersectionView::from).collect()
    }

    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats::collect(self.time, self.ticks, &self.cars, &self.intersections)
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Grid Traffic Summary ===");
        println!("{}", self.stats());
        for car in &self.cars {
            println!(
                "  Car {:?}: {:?} road={} lane={} dir={:+} pos={:.3} speed={:.1}/{:.1} state={:?}",
                car.id.0 .0,
                car.orientation,
                car.road,
                car.lane,
                car.direction.sign(),
                car.pos,
                car.speed,
                car.max_speed,
                car.state
            );
        }
    }

    /// Render the world as a terminal map
    ///
    /// `s` stop sign, `|` / `-` stop light green for north/south or east/west,
    /// `#` light all red, arrows are cars.
    pub fn render_map(&self) -> String {
        const COLS_PER_UNIT: usize = 4;
        const ROWS_PER_UNIT: usize = 2;

        let n = self.grid.size();
        let width = n * COLS_PER_UNIT + 1;
        let height = n * ROWS_PER_UNIT + 1;
        let mut canvas = vec![vec![' '; width]; height];

        for road in self.grid.road_indices() {
            for cell in canvas[road * ROWS_PER_UNIT].iter_mut() {
                *cell = '.';
            }
            for row in canvas.iter_mut() {
                row[road * COLS_PER_UNIT] = '.';
            }
        }

        for intersection in &self.intersections {
            let glyph = match &intersection.control {
                IntersectionControl::StopSign => 's',
                IntersectionControl::StopLight(pair) if pair.ns.is_active() => '|',
                IntersectionControl::StopLight(pair) if pair.ew.is_active() => '-',
                IntersectionControl::StopLight(_) => '#',
            };
            canvas[intersection.y * ROWS_PER_UNIT][intersection.x * COLS_PER_UNIT] = glyph;
        }

        for car in &self.cars {
            let (x, y) = car.grid_position(n);
            let col = ((x * COLS_PER_UNIT as f32).round() as usize).min(width - 1);
            let row = ((y * ROWS_PER_UNIT as f32).round() as usize).min(height - 1);
            canvas[row][col] = match (car.orientation, car.direction) {
                (Orientation::Horizontal, Direction::Forward) => '>',
                (Orientation::Horizontal, Direction::Backward) => '<',
                (Orientation::Vertical, Direction::Forward) => 'v',
                (Orientation::Vertical, Direction::Backward) => '^',
            };
        }

        canvas
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        println!("\n=== World Map ===");
        println!("Legend: s=Stop sign, |/-=Light green N-S/E-W, #=All red, ><v^=Car");
        println!();
        println!("{}", self.render_map());
        println!();
    }
}
