//! Snapshot encoding and restore.
//!
//! Snapshots are the JSON form of [`GameState`]. Restoring overlays the stored
//! top-level fields onto a fresh game, so saves written before a field existed
//! still load, then repairs anything that would leave the board unplayable.
use rand::RngCore;
use serde_json::Value;
use thiserror::Error;

use crate::WordSource;
use crate::constants::LOG_LIMIT;
use crate::puzzle::{finished_status, new_game, start_puzzle};
use crate::state::{GameState, WordLength};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot is not a JSON object")]
    NotAnObject,
}

/// Serialize `state` for storage.
///
/// # Errors
///
/// Returns an error if a float field cannot be represented in JSON.
pub fn encode_snapshot(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

/// Shallow-merge the fields in `snapshot` over `fresh`.
///
/// Keys the snapshot omits keep their fresh values; keys it carries replace them
/// wholesale.
///
/// # Errors
///
/// Returns an error if the snapshot is not a JSON object or the merged document
/// no longer describes a valid state.
pub fn merge_snapshot(fresh: &GameState, snapshot: &str) -> Result<GameState, SnapshotError> {
    let Value::Object(stored) = serde_json::from_str::<Value>(snapshot)? else {
        return Err(SnapshotError::NotAnObject);
    };
    let Value::Object(mut merged) = serde_json::to_value(fresh)? else {
        return Err(SnapshotError::NotAnObject);
    };
    merged.extend(stored);
    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Repair a merged state so it is safe to play.
pub fn sanitize<W>(state: &mut GameState, words: &W, rng: &mut dyn RngCore)
where
    W: WordSource + ?Sized,
{
    state.log.truncate(LOG_LIMIT);
    state.unlocked_lengths.insert(WordLength::Five);
    if !state.unlocked_lengths.contains(&state.selected_length) {
        log::warn!(
            "snapshot selected locked length {}, resetting",
            state.selected_length
        );
        state.selected_length = WordLength::Five;
        state.current_word.clear();
    }
    if state.guess_limit == 0 {
        state.guess_limit = 1;
    }

    let letters = state.selected_length.letters();
    state
        .current_input
        .retain(|c| c.is_ascii_uppercase());
    state.current_input.truncate(letters);

    let target_ok = state.current_word.len() == letters
        && state.current_word.chars().all(|c| c.is_ascii_uppercase());
    if !target_ok {
        log::warn!("snapshot target unusable, starting a new puzzle");
        let length = state.selected_length;
        start_puzzle(state, length, None, words, rng);
    }
    state
        .hint_reveals
        .retain(|slot, letter| state.current_word.chars().nth(*slot) == Some(*letter));
    if state.puzzle_complete && state.puzzle_status.is_none() {
        state.puzzle_status = Some(finished_status(state));
    }
}

/// Rebuild a playable state from an optional stored snapshot.
///
/// Missing or corrupt snapshots fall back to a brand-new game with a warning.
#[must_use]
pub fn restore_state<W>(snapshot: Option<&str>, words: &W, rng: &mut dyn RngCore) -> GameState
where
    W: WordSource + ?Sized,
{
    let fresh = new_game(words, rng);
    let Some(snapshot) = snapshot else {
        return fresh;
    };
    match merge_snapshot(&fresh, snapshot) {
        Ok(mut state) => {
            sanitize(&mut state, words, rng);
            state
        }
        Err(err) => {
            log::warn!("Failed to restore saved game, starting fresh: {err}");
            fresh
        }
    }
}
