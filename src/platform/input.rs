//! Input bindings
//!
//! Every game command is reachable from the keyboard and from an on-screen
//! button (mouse and touch share the same button IDs).

use crate::sim::Command;

/// What an input event asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Game(Command),
    /// Host-only: audio on/off
    ToggleMute,
}

/// On-screen buttons and the action each one triggers
pub const CONTROLS: &[(&str, InputAction)] = &[
    ("left-btn", InputAction::Game(Command::MoveLeft)),
    ("right-btn", InputAction::Game(Command::MoveRight)),
    ("pause-btn", InputAction::Game(Command::TogglePause)),
    ("restart-btn", InputAction::Game(Command::Restart)),
    ("mute-btn", InputAction::ToggleMute),
];

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<InputAction> {
    let action = match key {
        "ArrowLeft" | "a" | "A" => InputAction::Game(Command::MoveLeft),
        "ArrowRight" | "d" | "D" => InputAction::Game(Command::MoveRight),
        "p" | "P" | "Escape" => InputAction::Game(Command::TogglePause),
        "Enter" | " " | "r" | "R" => InputAction::Game(Command::Restart),
        "m" | "M" => InputAction::ToggleMute,
        _ => return None,
    };
    Some(action)
}

/// Map an on-screen button ID to an action
pub fn action_for_control(id: &str) -> Option<InputAction> {
    CONTROLS
        .iter()
        .find(|(control, _)| *control == id)
        .map(|(_, action)| *action)
}
