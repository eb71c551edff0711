//! # Input Model
//!
//! Key and mouse handlers never touch the simulation. They push
//! [`InputEvent`]s through an [`InputHandle`]; the loop drains the queue
//! once at the start of each frame into [`InputState`] and hands the tick an
//! immutable [`TickInput`] snapshot.
//!
//! Held actions (thrust, turn, laser) are level-triggered. `Interact` is
//! edge-triggered: one press requests one docking check.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// A logical player action. Key bindings map onto these elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Forward thrust.
    ThrustForward,
    /// Reverse thrust (half strength).
    ThrustBack,
    /// Rotate counter-clockwise.
    TurnLeft,
    /// Rotate clockwise.
    TurnRight,
    /// Mining laser.
    FireLaser,
    /// Dock with the station.
    Interact,
}

impl Action {
    /// Every action.
    pub const ALL: [Self; 6] = [
        Self::ThrustForward,
        Self::ThrustBack,
        Self::TurnLeft,
        Self::TurnRight,
        Self::FireLaser,
        Self::Interact,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A discrete input transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Key or button went down.
    Pressed(Action),
    /// Key or button went up.
    Released(Action),
}

/// Queue between input handlers and the loop.
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// A cloneable handle for input handlers.
    #[must_use]
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            sender: self.sender.clone(),
        }
    }

    /// Events queued since the last drain, in arrival order.
    pub fn drain(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.receiver.try_iter()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of the input queue.
#[derive(Clone)]
pub struct InputHandle {
    sender: Sender<InputEvent>,
}

impl InputHandle {
    /// Queues a transition. Ignored once the loop is gone.
    #[inline]
    pub fn send(&self, event: InputEvent) {
        let _ = self.sender.send(event);
    }

    /// Queues a press.
    #[inline]
    pub fn press(&self, action: Action) {
        self.send(InputEvent::Pressed(action));
    }

    /// Queues a release.
    #[inline]
    pub fn release(&self, action: Action) {
        self.send(InputEvent::Released(action));
    }
}

/// Held actions sampled for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Forward thrust held.
    pub thrust_forward: bool,
    /// Reverse thrust held.
    pub thrust_back: bool,
    /// Turn left held.
    pub turn_left: bool,
    /// Turn right held.
    pub turn_right: bool,
    /// Laser held.
    pub fire_laser: bool,
}

/// Accumulated input state between frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    held: u8,
    interact_requested: bool,
}

impl InputState {
    /// Applies one transition.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(action) => {
                if action == Action::Interact && !self.is_held(action) {
                    self.interact_requested = true;
                }
                self.held |= action.bit();
            }
            InputEvent::Released(action) => self.held &= !action.bit(),
        }
    }

    /// Applies every queued transition. Returns how many were applied.
    pub fn drain_from(&mut self, queue: &InputQueue) -> usize {
        let mut applied = 0;
        for event in queue.drain() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// True while `action` is held.
    #[inline]
    #[must_use]
    pub const fn is_held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    /// Consumes a pending interact press.
    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact_requested)
    }

    /// Releases everything and forgets pending presses.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot for the coming tick.
    #[must_use]
    pub const fn snapshot(&self) -> TickInput {
        TickInput {
            thrust_forward: self.is_held(Action::ThrustForward),
            thrust_back: self.is_held(Action::ThrustBack),
            turn_left: self.is_held(Action::TurnLeft),
            turn_right: self.is_held(Action::TurnRight),
            fire_laser: self.is_held(Action::FireLaser),
        }
    }
}
