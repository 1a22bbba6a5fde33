//! Signal controller behaviour

use grid_traffic::simulation::{
    ApproachControl, IntersectionId, IntersectionKind, IntersectionView, Orientation, SignalEvent,
    SignalPair, SignalState, SimId, SimIntersection, GREEN_DURATION, YELLOW_DURATION,
};

fn active_groups(pair: &SignalPair) -> usize {
    [pair.ns, pair.ew]
        .iter()
        .filter(|group| group.is_active())
        .count()
}

#[test]
fn test_initial_state_one_green() {
    let pair = SignalPair::new(Orientation::Vertical);
    assert_eq!(pair.ns.state, SignalState::Green);
    assert_eq!(pair.ew.state, SignalState::Red);

    let pair = SignalPair::new(Orientation::Horizontal);
    assert_eq!(pair.ns.state, SignalState::Red);
    assert_eq!(pair.ew.state, SignalState::Green);
}

#[test]
fn test_exactly_one_group_active() {
    let mut pair = SignalPair::new(Orientation::Vertical);
    for _ in 0..20_000 {
        pair.advance(0.05);
        assert_eq!(active_groups(&pair), 1, "pair {:?}", pair);
        assert!(
            !(pair.ns.state == SignalState::Green && pair.ew.state == SignalState::Green),
            "both groups green: {:?}",
            pair
        );
    }
}

#[test]
fn test_cycle_lengths() {
    let dt = 0.1;
    let mut pair = SignalPair::new(Orientation::Vertical);

    let mut elapsed = 0.0;
    while pair.ns.state == SignalState::Green {
        pair.advance(dt);
        elapsed += dt;
        assert!(elapsed < 20.0, "green never ended");
    }
    assert_eq!(pair.ns.state, SignalState::Yellow);
    assert!(
        (elapsed - GREEN_DURATION).abs() <= dt + 1e-3,
        "green lasted {}",
        elapsed
    );

    let mut elapsed = 0.0;
    while pair.ns.state == SignalState::Yellow {
        pair.advance(dt);
        elapsed += dt;
        assert!(elapsed < 20.0, "yellow never ended");
    }
    assert_eq!(pair.ns.state, SignalState::Red);
    assert_eq!(pair.ew.state, SignalState::Green);
    assert!(
        (elapsed - YELLOW_DURATION).abs() <= dt + 1e-3,
        "yellow lasted {}",
        elapsed
    );
    assert_eq!(pair.ew.timer, 0.0);
}

#[test]
fn test_handover_event() {
    let mut pair = SignalPair::new(Orientation::Horizontal);
    let events = pair.advance(GREEN_DURATION + 0.5);
    assert_eq!(events, vec![SignalEvent::Yellow(Orientation::Horizontal)]);

    let events = pair.advance(YELLOW_DURATION + 0.5);
    assert_eq!(
        events,
        vec![SignalEvent::Handover {
            to: Orientation::Vertical
        }]
    );
    assert_eq!(pair.state_for(Orientation::Vertical), SignalState::Green);
    assert_eq!(pair.state_for(Orientation::Horizontal), SignalState::Red);
}

#[test]
fn test_red_holds_until_handover() {
    let mut pair = SignalPair::new(Orientation::Vertical);
    pair.advance(5.0);
    assert_eq!(pair.ew.state, SignalState::Red);
    assert_eq!(pair.ns.state, SignalState::Green);
}

#[test]
fn test_stop_sign_has_no_signal_state() {
    let mut sign = SimIntersection::stop_sign(IntersectionId(SimId(0)), 1, 1);
    assert!(sign.advance(100.0).is_empty());
    assert!(sign.signals().is_none());
    assert_eq!(sign.approach(Orientation::Horizontal), ApproachControl::StopSign);
}

#[test]
fn test_intersection_view_resolves_approaches() {
    let light = SimIntersection::stop_light(IntersectionId(SimId(3)), 2, 1, Orientation::Vertical);
    let view = IntersectionView::from(&light);
    assert_eq!(view.kind, IntersectionKind::StopLight);
    assert_eq!(view.north_south, ApproachControl::Light(SignalState::Green));
    assert_eq!(view.east_west, ApproachControl::Light(SignalState::Red));
    assert_eq!((view.x, view.y), (2, 1));
}
