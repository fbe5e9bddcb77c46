//! Scripted keyboard input.
//!
//! A script is a list of key transitions stamped with the frame they happen
//! on, authored as RON:
//!
//! ```ron
//! (
//!     steps: [
//!         (frame: 0, event: Pressed(D)),
//!         (frame: 30, event: Released(D)),
//!     ],
//! )
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stillwalk_common::{StillwalkError, StillwalkResult};
use stillwalk_gameplay::{InputHub, KeyCode, KeyEvent};
use tracing::{debug, info};

/// A key transition at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Frame number, counted from 0
    pub frame: u32,
    /// Transition to dispatch
    pub event: KeyEvent,
}

/// An ordered key track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    /// Creates a script, sorting the steps by frame.
    #[must_use]
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|step| step.frame);
        Self { steps }
    }

    /// Parses a script from RON text.
    pub fn from_ron_str(text: &str) -> StillwalkResult<Self> {
        let script: Self =
            ron::from_str(text).map_err(|e| StillwalkError::Serialization(e.to_string()))?;
        Ok(Self::new(script.steps))
    }

    /// Reads and parses a RON script file.
    pub fn load<P: AsRef<Path>>(path: P) -> StillwalkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let script = Self::from_ron_str(&text)?;
        info!("Loaded {} input steps from {}", script.len(), path.display());
        Ok(script)
    }

    /// Walks right, sprints up, fires once and asks for a restart.
    #[must_use]
    pub fn demo() -> Self {
        let press = |frame, key| ScriptStep {
            frame,
            event: KeyEvent::Pressed(key),
        };
        let release = |frame, key| ScriptStep {
            frame,
            event: KeyEvent::Released(key),
        };

        Self::new(vec![
            press(0, KeyCode::D),
            release(40, KeyCode::D),
            press(40, KeyCode::ShiftLeft),
            press(40, KeyCode::W),
            release(120, KeyCode::W),
            release(120, KeyCode::ShiftLeft),
            press(130, KeyCode::Space),
            release(132, KeyCode::Space),
            press(140, KeyCode::ArrowLeft),
            release(220, KeyCode::ArrowLeft),
            press(500, KeyCode::R),
            release(502, KeyCode::R),
        ])
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// All steps in frame order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

/// Plays an [`InputScript`] into an [`InputHub`] frame by frame.
#[derive(Debug)]
pub struct ScriptPlayer {
    script: InputScript,
    cursor: usize,
}

impl ScriptPlayer {
    /// Starts at the first step.
    #[must_use]
    pub fn new(script: InputScript) -> Self {
        Self { script, cursor: 0 }
    }

    /// Dispatches every step due at or before `frame`. Returns how many were sent.
    pub fn play(&mut self, frame: u32, hub: &InputHub) -> usize {
        let pending = &self.script.steps()[self.cursor..];
        let due = pending
            .iter()
            .take_while(|step| step.frame <= frame)
            .count();

        for step in &pending[..due] {
            debug!("Frame {frame}: {:?}", step.event);
            hub.dispatch(step.event);
        }
        self.cursor += due;
        due
    }

    /// Checks whether every step has been dispatched.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stillwalk_gameplay::{Direction, KeyBindings};

    #[test]
    fn test_parse_sorts_steps() {
        let script = InputScript::from_ron_str(
            "(steps: [(frame: 5, event: Released(D)), (frame: 0, event: Pressed(D))])",
        )
        .expect("script parses");
        assert_eq!(script.len(), 2);
        assert_eq!(script.steps()[0].event, KeyEvent::Pressed(KeyCode::D));
    }

    #[test]
    fn test_parse_error() {
        let result = InputScript::from_ron_str("(steps: [(frame: -1)])");
        assert!(matches!(result, Err(StillwalkError::Serialization(_))));
    }

    #[test]
    fn test_player_dispatches_due_steps() {
        let hub = InputHub::new();
        let mut listener = hub.register(KeyBindings::default());
        let mut player = ScriptPlayer::new(InputScript::demo());

        assert_eq!(player.play(0, &hub), 1);
        assert!(listener.poll().held.contains(Direction::Right));

        // Catches up on everything up to frame 40
        assert_eq!(player.play(40, &hub), 3);
        let snapshot = listener.poll();
        assert!(snapshot.held.contains(Direction::Up));
        assert!(!snapshot.held.contains(Direction::Right));
        assert!(snapshot.sprint);

        player.play(10_000, &hub);
        assert!(player.finished());
        assert_eq!(player.play(10_001, &hub), 0);
    }
}
