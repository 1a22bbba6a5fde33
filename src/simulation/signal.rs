//! Signal controller for stop-light intersections
//!
//! Each light carries two coupled signal groups: one for north/south
//! approaches and one for east/west approaches. Exactly one group is
//! active (green or yellow) at a time.

use super::types::Orientation;

/// Time a group stays green before turning yellow (seconds)
pub const GREEN_DURATION: f32 = 7.0;

/// Time a group stays yellow before turning red (seconds)
pub const YELLOW_DURATION: f32 = 1.5;

/// Color of a signal group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

/// One signal group and the time spent in its current state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalGroup {
    pub state: SignalState,
    pub timer: f32,
}

impl SignalGroup {
    pub fn new(state: SignalState) -> Self {
        Self { state, timer: 0.0 }
    }

    fn switch_to(&mut self, state: SignalState) {
        self.state = state;
        self.timer = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.state != SignalState::Red
    }
}

/// A signal group transition that fired during [`SignalPair::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// The named group turned yellow
    Yellow(Orientation),
    /// The named group turned red and the other group turned green
    Handover { to: Orientation },
}

/// The coupled north/south and east/west groups of one light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPair {
    /// Serves north/south (vertical) approaches
    pub ns: SignalGroup,
    /// Serves east/west (horizontal) approaches
    pub ew: SignalGroup,
}

impl SignalPair {
    /// A fresh pair with the group serving `green` active
    pub fn new(green: Orientation) -> Self {
        match green {
            Orientation::Vertical => Self {
                ns: SignalGroup::new(SignalState::Green),
                ew: SignalGroup::new(SignalState::Red),
            },
            Orientation::Horizontal => Self {
                ns: SignalGroup::new(SignalState::Red),
                ew: SignalGroup::new(SignalState::Green),
            },
        }
    }

    /// The group serving cars travelling along `orientation`
    pub fn group_for(&self, orientation: Orientation) -> &SignalGroup {
        match orientation {
            Orientation::Horizontal => &self.ew,
            Orientation::Vertical => &self.ns,
        }
    }

    fn group_mut(&mut self, orientation: Orientation) -> &mut SignalGroup {
        match orientation {
            Orientation::Horizontal => &mut self.ew,
            Orientation::Vertical => &mut self.ns,
        }
    }

    /// State shown to cars travelling along `orientation`
    pub fn state_for(&self, orientation: Orientation) -> SignalState {
        self.group_for(orientation).state
    }

    /// Advance both timers by `dt` and fire at most one transition per group
    pub fn advance(&mut self, dt: f32) -> Vec<SignalEvent> {
        self.ns.timer += dt;
        self.ew.timer += dt;

        let mut events = Vec::new();
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            if let Some(event) = self.advance_group(orientation) {
                events.push(event);
            }
        }
        events
    }

    fn advance_group(&mut self, orientation: Orientation) -> Option<SignalEvent> {
        let group = self.group_mut(orientation);
        match group.state {
            SignalState::Green if group.timer > GREEN_DURATION => {
                group.switch_to(SignalState::Yellow);
                Some(SignalEvent::Yellow(orientation))
            }
            SignalState::Yellow if group.timer > YELLOW_DURATION => {
                group.switch_to(SignalState::Red);
                let other = orientation.perpendicular();
                self.group_mut(other).switch_to(SignalState::Green);
                Some(SignalEvent::Handover { to: other })
            }
            _ => None,
        }
    }
}
