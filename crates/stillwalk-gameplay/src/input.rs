//! Input handling.
//!
//! The host pushes raw key events into an [`InputHub`]. Each consumer
//! registers an [`InputListener`], which folds those events into one
//! [`InputSnapshot`] per tick. The simulation only ever sees snapshots.

use std::fmt;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use glam::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur in input handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Key already bound to another action
    #[error("key {key:?} already bound to action: {action}")]
    KeyAlreadyBound {
        /// The key that's already bound
        key: KeyCode,
        /// The action it's bound to
        action: Action,
    },
}

// ============================================================================
// Directions
// ============================================================================

/// One of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Toward the top of the screen (negative y)
    Up,
    /// Toward the bottom of the screen (positive y)
    #[default]
    Down,
    /// Negative x
    Left,
    /// Positive x
    Right,
}

impl Direction {
    /// All directions in priority order: horizontal before vertical.
    pub const PRIORITY: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Unit vector for this direction.
    #[must_use]
    pub const fn to_vec2(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Lowercase name used in animation labels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Facing for a velocity. Horizontal wins when both axes move.
    #[must_use]
    pub fn from_velocity(velocity: Vec2) -> Option<Self> {
        if velocity.x > 0.0 {
            Some(Self::Right)
        } else if velocity.x < 0.0 {
            Some(Self::Left)
        } else if velocity.y > 0.0 {
            Some(Self::Down)
        } else if velocity.y < 0.0 {
            Some(Self::Up)
        } else {
            None
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Up => 0b0001,
            Self::Down => 0b0010,
            Self::Left => 0b0100,
            Self::Right => 0b1000,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of held directions.
///
/// Iteration always follows [`Direction::PRIORITY`], regardless of the order
/// keys were pressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Creates a set from a list of directions.
    #[must_use]
    pub fn from_slice(directions: &[Direction]) -> Self {
        directions.iter().fold(Self::EMPTY, |set, &d| set.with(d))
    }

    /// Returns the set with `direction` added.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.bit())
    }

    /// Adds a direction.
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    /// Removes a direction.
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// Checks membership.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Checks if nothing is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates in priority order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::PRIORITY
            .into_iter()
            .filter(move |d| self.contains(*d))
    }

    /// Sum of the held unit vectors. Opposing directions cancel.
    #[must_use]
    pub fn axis(self) -> Vec2 {
        self.iter().map(Direction::to_vec2).sum()
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

// ============================================================================
// Per-tick snapshot
// ============================================================================

/// Everything the simulation needs to know about input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Directions currently held
    pub held: DirectionSet,
    /// Sprint modifier held
    pub sprint: bool,
    /// Attack was pressed since the previous snapshot
    pub attack: bool,
    /// Restart was pressed since the previous snapshot
    pub restart: bool,
}

impl InputSnapshot {
    /// A snapshot with nothing held.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            held: DirectionSet::EMPTY,
            sprint: false,
            attack: false,
            restart: false,
        }
    }

    /// A snapshot holding the given directions.
    #[must_use]
    pub fn holding(directions: &[Direction]) -> Self {
        Self {
            held: DirectionSet::from_slice(directions),
            ..Self::idle()
        }
    }

    /// Sets the sprint modifier.
    #[must_use]
    pub const fn sprinting(mut self, sprint: bool) -> Self {
        self.sprint = sprint;
        self
    }

    /// Sets the attack edge.
    #[must_use]
    pub const fn attacking(mut self) -> Self {
        self.attack = true;
        self
    }
}

// ============================================================================
// Key bindings
// ============================================================================

/// Keys the prototype reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// J key
    J,
    /// R key
    R,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Left shift
    ShiftLeft,
    /// Right shift
    ShiftRight,
    /// Space bar
    Space,
    /// Enter
    Enter,
}

/// Game actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk in a direction
    Move(Direction),
    /// Sprint modifier
    Sprint,
    /// Fire the equipped weapon
    Attack,
    /// Restart after game over
    Restart,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(dir) => write!(f, "move {dir}"),
            Self::Sprint => f.write_str("sprint"),
            Self::Attack => f.write_str("attack"),
            Self::Restart => f.write_str("restart"),
        }
    }
}

/// Key to action mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: AHashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = [
            (KeyCode::W, Action::Move(Direction::Up)),
            (KeyCode::ArrowUp, Action::Move(Direction::Up)),
            (KeyCode::S, Action::Move(Direction::Down)),
            (KeyCode::ArrowDown, Action::Move(Direction::Down)),
            (KeyCode::A, Action::Move(Direction::Left)),
            (KeyCode::ArrowLeft, Action::Move(Direction::Left)),
            (KeyCode::D, Action::Move(Direction::Right)),
            (KeyCode::ArrowRight, Action::Move(Direction::Right)),
            (KeyCode::ShiftLeft, Action::Sprint),
            (KeyCode::ShiftRight, Action::Sprint),
            (KeyCode::Space, Action::Attack),
            (KeyCode::J, Action::Attack),
            (KeyCode::R, Action::Restart),
            (KeyCode::Enter, Action::Restart),
        ];
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }
}

impl KeyBindings {
    /// Action bound to a key.
    #[must_use]
    pub fn action(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// Binds a key. Fails if the key already triggers a different action.
    pub fn bind(&mut self, key: KeyCode, action: Action) -> Result<(), InputError> {
        match self.bindings.get(&key) {
            Some(&existing) if existing != action => Err(InputError::KeyAlreadyBound {
                key,
                action: existing,
            }),
            _ => {
                self.bindings.insert(key, action);
                Ok(())
            },
        }
    }

    /// Removes a key binding, returning the action it had.
    pub fn unbind(&mut self, key: KeyCode) -> Option<Action> {
        self.bindings.remove(&key)
    }

    /// Keys bound to an action.
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| **bound == action)
            .map(|(key, _)| *key)
    }
}

// ============================================================================
// Hub and listeners
// ============================================================================

/// A raw key transition from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    /// Key went down (auto-repeat may send this again while held)
    Pressed(KeyCode),
    /// Key went up
    Released(KeyCode),
}

/// Key events a listener can hold between polls.
pub const LISTENER_QUEUE_CAPACITY: usize = 256;

/// Sending side of one listener's queue.
///
/// Keeps a receiver handle so a full queue can shed its oldest event.
#[derive(Debug)]
struct ListenerQueue {
    sender: Sender<KeyEvent>,
    oldest: Receiver<KeyEvent>,
}

impl ListenerQueue {
    fn push(&self, id: u64, event: KeyEvent) {
        if let Err(TrySendError::Full(event)) = self.sender.try_send(event) {
            let dropped = self.oldest.try_recv().ok();
            debug!("Input listener {id} is full, dropped {dropped:?}");
            let _ = self.sender.try_send(event);
        }
    }
}

#[derive(Debug, Default)]
struct HubRegistry {
    next_id: u64,
    listeners: AHashMap<u64, ListenerQueue>,
}

/// Process-wide key event dispatcher.
///
/// Cloning yields another handle to the same registry, so a windowing thread
/// can dispatch while the simulation owner polls its listener.
#[derive(Debug, Clone, Default)]
pub struct InputHub {
    registry: Arc<Mutex<HubRegistry>>,
}

impl InputHub {
    /// Creates a hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener using the given key bindings.
    ///
    /// The registration lasts until [`InputListener::teardown`] is called or
    /// the listener is dropped. The listener must be polled regularly: once
    /// [`LISTENER_QUEUE_CAPACITY`] events are waiting, the oldest are dropped.
    pub fn register(&self, bindings: KeyBindings) -> InputListener {
        let (sender, receiver) = bounded(LISTENER_QUEUE_CAPACITY);
        let queue = ListenerQueue {
            sender,
            oldest: receiver.clone(),
        };
        let id = {
            let mut registry = self.registry.lock();
            registry.next_id += 1;
            let id = registry.next_id;
            registry.listeners.insert(id, queue);
            id
        };
        debug!("Registered input listener {id}");

        InputListener {
            id,
            registry: Some(Arc::clone(&self.registry)),
            receiver,
            bindings,
            held_keys: AHashSet::new(),
            attack: false,
            restart: false,
        }
    }

    /// Sends a key event to every registered listener.
    pub fn dispatch(&self, event: KeyEvent) {
        let registry = self.registry.lock();
        for (id, queue) in &registry.listeners {
            queue.push(*id, event);
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

/// A scoped registration with an [`InputHub`].
#[derive(Debug)]
pub struct InputListener {
    id: u64,
    registry: Option<Arc<Mutex<HubRegistry>>>,
    receiver: Receiver<KeyEvent>,
    bindings: KeyBindings,
    held_keys: AHashSet<KeyCode>,
    attack: bool,
    restart: bool,
}

impl InputListener {
    /// Drains pending key events and returns this tick's snapshot.
    ///
    /// Attack and restart are edges: they are reported once per physical
    /// press, and auto-repeat while held does not retrigger them.
    pub fn poll(&mut self) -> InputSnapshot {
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                KeyEvent::Pressed(key) => {
                    let fresh = self.held_keys.insert(key);
                    if fresh {
                        match self.bindings.action(key) {
                            Some(Action::Attack) => self.attack = true,
                            Some(Action::Restart) => self.restart = true,
                            _ => {},
                        }
                    }
                },
                KeyEvent::Released(key) => {
                    self.held_keys.remove(&key);
                },
            }
        }

        let mut snapshot = InputSnapshot {
            attack: std::mem::take(&mut self.attack),
            restart: std::mem::take(&mut self.restart),
            ..InputSnapshot::idle()
        };
        for key in &self.held_keys {
            match self.bindings.action(*key) {
                Some(Action::Move(dir)) => snapshot.held.insert(dir),
                Some(Action::Sprint) => snapshot.sprint = true,
                _ => {},
            }
        }
        snapshot
    }

    /// Forgets every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held_keys.clear();
        self.attack = false;
        self.restart = false;
    }

    /// Checks whether this listener is still registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registry.is_some()
    }

    /// Removes the registration from the hub.
    pub fn teardown(mut self) {
        self.unregister();
    }

    fn unregister(&mut self) {
        if let Some(registry) = self.registry.take() {
            registry.lock().listeners.remove(&self.id);
            debug!("Unregistered input listener {}", self.id);
        }
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.unregister();
    }
}
