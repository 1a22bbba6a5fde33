//! World reset, stepping and invariants

use grid_traffic::simulation::{
    CarId, CarKinematics, Direction, IntersectionId, IntersectionKind, Orientation, SimCar,
    SimConfig, SimId, SimIntersection, SimWorld, STOP_DISTANCE,
};

#[test]
fn test_reset_is_idempotent_with_seed() {
    let first = SimWorld::new(SimConfig::seeded(42)).expect("valid config");
    let second = SimWorld::new(SimConfig::seeded(42)).expect("valid config");
    assert_eq!(first.intersections(), second.intersections());
    assert_eq!(first.cars(), second.cars());

    let mut stepped = SimWorld::new(SimConfig::seeded(42)).expect("valid config");
    for _ in 0..100 {
        stepped.step(0.05).expect("step should succeed");
    }
    stepped.reset().expect("reset should succeed");
    assert_eq!(stepped.intersections(), first.intersections());
    assert_eq!(stepped.cars(), first.cars());
    assert_eq!(stepped.ticks(), 0);
    assert_eq!(stepped.time(), 0.0);
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let mut first = SimWorld::new(SimConfig::seeded(9)).expect("valid config");
    let mut second = SimWorld::new(SimConfig::seeded(9)).expect("valid config");
    for _ in 0..500 {
        first.step(0.05).expect("step should succeed");
        second.step(0.05).expect("step should succeed");
    }
    assert_eq!(first.cars(), second.cars());
    assert_eq!(first.intersections(), second.intersections());
}

#[test]
fn test_reset_layout() {
    let config = SimConfig {
        grid_size: 9,
        car_count: 25,
        ..SimConfig::seeded(4)
    };
    let world = SimWorld::new(config).expect("valid config");

    assert_eq!(world.intersections().len(), 7 * 7);
    assert_eq!(world.cars().len(), 25);
    for intersection in world.intersections() {
        assert!((1..=7).contains(&intersection.x));
        assert!((1..=7).contains(&intersection.y));
    }
    for car in world.cars() {
        assert!((1..=7).contains(&car.road));
        assert!(car.lane <= 1);
        assert_eq!(car.speed, 0.0);
        assert!((60.0..=90.0).contains(&car.max_speed));
    }
}

#[test]
fn test_spawn_keeps_clear_of_intersections() {
    let world = SimWorld::new(SimConfig::seeded(11)).expect("valid config");
    let n = world.grid().size() as f32;
    for car in world.cars() {
        for coord in world.grid().road_indices() {
            let centre = coord as f32 / n;
            let d = (car.pos - centre).abs();
            let d = d.min(1.0 - d);
            assert!(d > STOP_DISTANCE - 1e-5, "car {:?} spawned {} from a centre", car.id, d);
        }
    }
}

#[test]
fn test_stop_light_ratio_extremes() {
    let all_lights = SimConfig {
        stop_light_ratio: 1.0,
        ..SimConfig::seeded(1)
    };
    let world = SimWorld::new(all_lights).expect("valid config");
    assert!(world
        .intersections()
        .iter()
        .all(|intersection| intersection.kind() == IntersectionKind::StopLight));

    let all_signs = SimConfig {
        stop_light_ratio: 0.0,
        ..SimConfig::seeded(1)
    };
    let world = SimWorld::new(all_signs).expect("valid config");
    assert!(world
        .intersections()
        .iter()
        .all(|intersection| intersection.kind() == IntersectionKind::StopSign));
    assert_eq!(world.stats().stop_signs, world.intersections().len());
}

#[test]
fn test_invariants_hold_over_long_run() {
    let config = SimConfig {
        grid_size: 7,
        car_count: 60,
        ..SimConfig::seeded(2024)
    };
    let mut world = SimWorld::new(config).expect("valid config");

    for _ in 0..3_000 {
        world.step(1.0 / 60.0).expect("step should succeed");

        for car in world.cars() {
            assert!(
                car.speed >= 0.0 && car.speed <= car.max_speed,
                "speed out of bounds: {:?}",
                car
            );
            assert!(car.pos >= 0.0 && car.pos < 1.0, "position out of domain: {:?}", car);
            assert!(car.road <= world.grid().size() - 2, "road out of grid: {:?}", car);
        }

        for intersection in world.intersections() {
            if let Some(pair) = intersection.signals() {
                let active = [pair.ns, pair.ew]
                    .iter()
                    .filter(|group| group.is_active())
                    .count();
                assert_eq!(active, 1, "signal coupling broken at {:?}", intersection);
            }
        }
    }

    assert!(world.stats().turns_taken > 0, "nobody ever turned");
    assert!(world.time() > 49.0);
}

#[test]
fn test_intersection_views_match_intersections() {
    let world = SimWorld::new(SimConfig::seeded(8)).expect("valid config");
    let views = world.intersection_views();
    assert_eq!(views.len(), world.intersections().len());
    for (view, intersection) in views.iter().zip(world.intersections()) {
        assert_eq!(view.id, intersection.id);
        assert_eq!(view.kind, intersection.kind());
        assert_eq!(view.east_west, intersection.approach(Orientation::Horizontal));
        assert_eq!(view.north_south, intersection.approach(Orientation::Vertical));
    }
}

#[test]
fn test_rejects_small_grid() {
    let config = SimConfig {
        grid_size: 2,
        ..SimConfig::default()
    };
    let error = SimWorld::new(config).expect_err("grid size 2 must be rejected");
    assert!(format!("{:#}", error).contains("grid size must be at least 3"));
}

#[test]
fn test_rejects_invalid_config_values() {
    let inverted_speeds = SimConfig {
        min_max_speed: 90.0,
        max_max_speed: 60.0,
        ..SimConfig::default()
    };
    assert!(SimWorld::new(inverted_speeds).is_err());

    let bad_ratio = SimConfig {
        stop_light_ratio: 1.5,
        ..SimConfig::default()
    };
    assert!(SimWorld::new(bad_ratio).is_err());

    let no_width = SimConfig {
        width: 0.0,
        ..SimConfig::default()
    };
    assert!(SimWorld::new(no_width).is_err());
}

#[test]
fn test_rejects_negative_and_non_finite_dt() {
    let mut world = SimWorld::new(SimConfig::seeded(5)).expect("valid config");
    let before = world.cars().to_vec();

    assert!(world.step(-0.1).is_err());
    assert!(world.step(f32::NAN).is_err());
    assert!(world.step(f32::INFINITY).is_err());
    assert_eq!(world.cars(), before.as_slice());
    assert_eq!(world.ticks(), 0);

    world.step(0.0).expect("zero dt is allowed");
    assert_eq!(world.ticks(), 1);
}

#[test]
fn test_failed_step_leaves_world_untouched() {
    let config = SimConfig {
        grid_size: 5,
        car_count: 0,
        ..SimConfig::seeded(1)
    };
    let light = SimIntersection::stop_light(
        IntersectionId(SimId(0)),
        2,
        3,
        Orientation::Vertical,
    );
    let mut cruiser = SimCar::new(
        CarId(SimId(1)),
        CarKinematics {
            orientation: Orientation::Horizontal,
            direction: Direction::Forward,
            road: 1,
            lane: 0,
            pos: 0.5,
        },
        60.0,
    );
    cruiser.speed = 60.0;
    cruiser.stopped = false;
    let mut world =
        SimWorld::from_parts(config, vec![light], vec![cruiser]).expect("valid scenario");
    let cars = world.cars().to_vec();
    let intersections = world.intersections().to_vec();

    // Travel overflows to infinity and the position cannot be wrapped
    let error = world.step(f32::MAX).expect_err("non-finite position must fail");
    assert!(format!("{:#}", error).contains("inconsistent"));
    assert_eq!(world.cars(), cars.as_slice());
    assert_eq!(world.intersections(), intersections.as_slice());
    assert_eq!(world.ticks(), 0);
    assert_eq!(world.time(), 0.0);

    world.step(0.05).expect("world still steps after a failed tick");
    assert_eq!(world.ticks(), 1);
}

#[test]
fn test_from_parts_rejects_car_off_grid() {
    let config = SimConfig {
        grid_size: 5,
        car_count: 0,
        ..SimConfig::seeded(1)
    };
    let stray = SimCar::new(
        CarId(SimId(0)),
        CarKinematics {
            orientation: Orientation::Horizontal,
            direction: Direction::Forward,
            road: 4,
            lane: 0,
            pos: 0.5,
        },
        60.0,
    );
    let error = SimWorld::from_parts(config, Vec::new(), vec![stray])
        .expect_err("road 4 is outside a 5 grid");
    assert!(error.to_string().contains("outside"));
}

#[test]
fn test_render_map_shows_every_car() {
    let config = SimConfig {
        grid_size: 5,
        car_count: 3,
        ..SimConfig::seeded(17)
    };
    let world = SimWorld::new(config).expect("valid config");
    let map = world.render_map();
    let cars = map.chars().filter(|c| matches!(c, '>' | '<' | 'v' | '^')).count();
    assert!(cars >= 1 && cars <= 3);
    assert_eq!(map.lines().count(), 5 * 2 + 1);
}

#[test]
fn test_render_map_intersection_glyphs() {
    let config = SimConfig {
        grid_size: 5,
        car_count: 0,
        ..SimConfig::seeded(3)
    };
    let intersections = vec![
        SimIntersection::stop_light(IntersectionId(SimId(0)), 2, 1, Orientation::Vertical),
        SimIntersection::stop_light(IntersectionId(SimId(1)), 1, 3, Orientation::Horizontal),
        SimIntersection::stop_sign(IntersectionId(SimId(2)), 3, 3),
    ];
    let world = SimWorld::from_parts(config, intersections, Vec::new()).expect("valid scenario");
    let map: Vec<Vec<char>> = world
        .render_map()
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    assert_eq!(map[2][8], '|');
    assert_eq!(map[6][4], '-');
    assert_eq!(map[6][12], 's');
}
