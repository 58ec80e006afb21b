//! Keyboard mapping for physical keys and the on-screen keyboard.
use upgradle_game::GameAction;

pub const ENTER_KEY: &str = "ENTER";
pub const BACKSPACE_KEY: &str = "BACKSPACE";

/// On-screen keyboard layout, top row first.
pub const KEYBOARD_ROWS: [&[&str]; 3] = [
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &[
        ENTER_KEY,
        "Z",
        "X",
        "C",
        "V",
        "B",
        "N",
        "M",
        BACKSPACE_KEY,
    ],
];

fn single_letter(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

/// Map a `KeyboardEvent.key` value to an action. Unmapped keys return `None`
/// and should be left to the browser.
#[must_use]
pub fn physical_key_action(key: &str) -> Option<GameAction> {
    match key {
        "Enter" => Some(GameAction::SubmitGuess),
        "Backspace" => Some(GameAction::RemoveLetter),
        _ => single_letter(key).map(|c| GameAction::InputLetter(c.to_ascii_uppercase())),
    }
}

/// Map an on-screen key label to an action.
#[must_use]
pub fn virtual_key_action(key: &str) -> Option<GameAction> {
    match key {
        ENTER_KEY => Some(GameAction::SubmitGuess),
        BACKSPACE_KEY => Some(GameAction::RemoveLetter),
        _ => single_letter(key)
            .filter(char::is_ascii_uppercase)
            .map(GameAction::InputLetter),
    }
}
