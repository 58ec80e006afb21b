//! Puzzle lifecycle: starting rounds and building a playable initial state.
use rand::RngCore;

use crate::WordSource;
use crate::state::{GameState, WordLength};

/// Begin a new puzzle of `length` with a freshly picked target.
///
/// Clears the board, input, hint reveals and terminal flags, bumps the puzzle counter
/// and optionally logs `message`. The target may repeat the previous one.
pub fn start_puzzle<W>(
    state: &mut GameState,
    length: WordLength,
    message: Option<&str>,
    words: &W,
    rng: &mut dyn RngCore,
) where
    W: WordSource + ?Sized,
{
    state.current_word = words.pick_word(length, rng);
    state.selected_length = length;
    state.guesses.clear();
    state.current_input.clear();
    state.puzzle_complete = false;
    state.solved = false;
    state.puzzle_status = None;
    state.hint_reveals.clear();
    state.puzzle_number = state.puzzle_number.saturating_add(1);
    if let Some(message) = message {
        state.push_log(message);
    }
    log::info!(
        "puzzle #{} started ({length} letters)",
        state.puzzle_number
    );
}

/// Banner shown once `state` has finished its puzzle.
#[must_use]
pub fn finished_status(state: &GameState) -> String {
    if state.solved {
        format!("Solved in {} guesses.", state.guesses.len())
    } else {
        format!("Word collapsed. The answer was {}.", state.current_word)
    }
}

/// A brand-new save with the first 5-letter puzzle already running.
#[must_use]
pub fn new_game<W>(words: &W, rng: &mut dyn RngCore) -> GameState
where
    W: WordSource + ?Sized,
{
    let mut state = GameState::default();
    let length = state.selected_length;
    start_puzzle(
        &mut state,
        length,
        Some(&format!("New {length}-letter word active.")),
        words,
        rng,
    );
    state
}
