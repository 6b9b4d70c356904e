//! Mapping raw input (keys, swipes) to game commands.

use serde::{Deserialize, Serialize};

use crate::engine::Move;

/// Minimum travel, in pixels along the dominant axis, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 20.0;

/// A request from the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Move),
    Undo,
    NewGame,
}

impl Command {
    /// Parse one line of keyboard input.
    ///
    /// Accepts arrow-key escape sequences, `wasd`, `hjkl`, direction names,
    /// `u`/`undo` and `n`/`new`. Matching ignores case and surrounding whitespace.
    ///
    /// ```
    /// use game_2048::engine::Move;
    /// use game_2048::input::Command;
    /// assert_eq!(Command::from_key("W"), Some(Command::Move(Move::Up)));
    /// assert_eq!(Command::from_key("\u{1b}[D"), Some(Command::Move(Move::Left)));
    /// assert_eq!(Command::from_key("x"), None);
    /// ```
    pub fn from_key(key: &str) -> Option<Command> {
        let key = key.trim().to_ascii_lowercase();
        let command = match key.as_str() {
            "\u{1b}[a" | "w" | "k" | "up" => Command::Move(Move::Up),
            "\u{1b}[b" | "s" | "j" | "down" => Command::Move(Move::Down),
            "\u{1b}[d" | "a" | "h" | "left" => Command::Move(Move::Left),
            "\u{1b}[c" | "d" | "l" | "right" => Command::Move(Move::Right),
            "u" | "undo" => Command::Undo,
            "n" | "new" => Command::NewGame,
            _ => return None,
        };
        Some(command)
    }

    /// Classify a touch gesture by its displacement (screen coordinates, y grows downwards).
    ///
    /// Returns `None` when the travel along the dominant axis does not exceed
    /// [`SWIPE_THRESHOLD`].
    pub fn from_swipe(dx: f32, dy: f32) -> Option<Command> {
        if dx.abs().max(dy.abs()) <= SWIPE_THRESHOLD {
            return None;
        }
        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 { Move::Right } else { Move::Left }
        } else if dy > 0.0 {
            Move::Down
        } else {
            Move::Up
        };
        Some(Command::Move(direction))
    }
}
