//! The pure state transition function.
//!
//! Every player or timer event is a [`GameAction`]; [`reduce`] maps the current
//! state plus an action to the next state. Rejected actions return an unchanged
//! copy (or one carrying only an explanatory log line) rather than an error.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::WordSource;
use crate::catalog::Catalog;
use crate::constants::{LOG_NEED_FULL_WORD, LOG_UNKNOWN_WORD, tier_requirement};
use crate::effects::apply_upgrade_effect;
use crate::evaluator::evaluate_guess;
use crate::math::{generator_cost, passive_income, total_upgrade_levels, upgrade_cost};
use crate::numbers::u64_to_f64;
use crate::puzzle::{finished_status, new_game, start_puzzle};
use crate::state::{GameState, GuessRow, WordLength};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum GameAction {
    SetLength(WordLength),
    InputLetter(char),
    RemoveLetter,
    SubmitGuess,
    StartNextPuzzle,
    BuyUpgrade(String),
    BuyGenerator(String),
    Tick,
    /// Wipe all progress and start a brand-new game.
    Reset,
}

/// Collaborators a transition may consult.
pub struct ReduceContext<'a> {
    pub catalog: &'a Catalog,
    pub words: &'a dyn WordSource,
    pub rng: &'a mut dyn RngCore,
    /// Probability that a valid submission reveals one hidden slot.
    pub hint_chance: f64,
}

/// Compute the state that follows `action`.
#[must_use]
pub fn reduce(state: &GameState, action: &GameAction, ctx: &mut ReduceContext<'_>) -> GameState {
    if *action == GameAction::Reset {
        log::info!("game reset after {} puzzles", state.puzzle_number);
        return new_game(ctx.words, ctx.rng);
    }
    let mut next = state.clone();
    match action {
        GameAction::SetLength(length) => set_length(&mut next, *length, ctx),
        GameAction::InputLetter(letter) => input_letter(&mut next, *letter),
        GameAction::RemoveLetter => {
            if next.is_active() {
                next.current_input.pop();
            }
        }
        GameAction::SubmitGuess => submit_guess(&mut next, ctx),
        GameAction::StartNextPuzzle => {
            let length = next.selected_length;
            start_puzzle(
                &mut next,
                length,
                Some(&format!("New {length}-letter word ready.")),
                ctx.words,
                ctx.rng,
            );
        }
        GameAction::BuyUpgrade(id) => buy_upgrade(&mut next, id, ctx.catalog),
        GameAction::BuyGenerator(id) => buy_generator(&mut next, id, ctx.catalog),
        GameAction::Tick => {
            let income = passive_income(&next, &ctx.catalog.generators);
            if income > 0.0 {
                next.credit(income);
            }
        }
        GameAction::Reset => {}
    }
    next
}

fn set_length(state: &mut GameState, length: WordLength, ctx: &mut ReduceContext<'_>) {
    if !state.unlocked_lengths.contains(&length) {
        log::debug!("length {length} is still locked");
        return;
    }
    start_puzzle(
        state,
        length,
        Some(&format!("Switched to {length}-letter words.")),
        ctx.words,
        ctx.rng,
    );
}

fn input_letter(state: &mut GameState, letter: char) {
    if !state.is_active() || !letter.is_ascii_alphabetic() {
        return;
    }
    if state.current_input.len() >= state.selected_length.letters() {
        return;
    }
    state.current_input.push(letter.to_ascii_uppercase());
}

fn submit_guess(state: &mut GameState, ctx: &mut ReduceContext<'_>) {
    if !state.is_active() {
        return;
    }
    let length = state.selected_length;
    let guess = state.current_input.clone();
    if guess.len() != length.letters() {
        log::debug!("rejected short guess `{guess}`");
        state.push_log(LOG_NEED_FULL_WORD);
        return;
    }
    if !ctx.words.is_valid_word(&guess, length) {
        log::debug!("rejected unknown word `{guess}`");
        state.push_log(LOG_UNKNOWN_WORD);
        return;
    }

    roll_hint(state, ctx);

    let evaluation = evaluate_guess(&guess, &state.current_word);
    let payout =
        (f64::from(evaluation.base_payout) + state.payout_bonus) * state.payout_multiplier;
    let row = GuessRow {
        id: format!("{}-{}", state.puzzle_number, state.guesses.len()),
        word: guess.clone(),
        marks: evaluation.marks,
        payout,
    };
    state.guesses.push(row);
    state.credit(payout);
    state.push_log(format!("Guess {guess} minted ${:.0}.", payout.round()));
    state.current_input.clear();

    if evaluation.solved {
        let reward = length.word_reward();
        let guesses = state.guesses.len();
        state.puzzle_complete = true;
        state.solved = true;
        state.puzzles_solved = state.puzzles_solved.saturating_add(1);
        state.words = state.words.saturating_add(reward);
        state.puzzle_status = Some(finished_status(state));
        let plural = if reward == 1 { "" } else { "s" };
        state.push_log(format!(
            "Word minted! Earned {reward} word{plural}. Bank the payout and grab another."
        ));
        log::info!("puzzle #{} solved in {guesses}", state.puzzle_number);
    } else if state.guesses_left() == 0 {
        let answer = state.current_word.clone();
        state.puzzle_complete = true;
        state.puzzle_status = Some(finished_status(state));
        state.push_log(format!("Word revealed: {answer}."));
        log::info!("puzzle #{} failed", state.puzzle_number);
    }
}

fn roll_hint(state: &mut GameState, ctx: &mut ReduceContext<'_>) {
    if ctx.hint_chance <= 0.0 || ctx.rng.r#gen::<f64>() >= ctx.hint_chance {
        return;
    }
    let hidden: Vec<(usize, char)> = state
        .current_word
        .chars()
        .enumerate()
        .filter(|(slot, _)| !state.hint_reveals.contains_key(slot))
        .collect();
    if hidden.is_empty() {
        return;
    }
    let (slot, letter) = hidden[ctx.rng.gen_range(0..hidden.len())];
    state.hint_reveals.insert(slot, letter);
    state.push_log(format!(
        "Lucky spark! slot {} revealed as {letter}.",
        slot + 1
    ));
}

fn buy_upgrade(state: &mut GameState, id: &str, catalog: &Catalog) {
    let Some(upgrade) = catalog.find_upgrade(id) else {
        log::debug!("unknown upgrade `{id}`");
        return;
    };
    let level = state.upgrade_level(id);
    if upgrade.max_level.is_some_and(|max| level >= max) {
        log::debug!("upgrade `{id}` already maxed");
        return;
    }
    if let Some(requires) = &upgrade.requires
        && state.upgrade_level(requires) == 0
    {
        log::debug!("upgrade `{id}` needs `{requires}` first");
        return;
    }
    let needed = tier_requirement(upgrade.tier);
    if total_upgrade_levels(state) < needed {
        log::debug!("tier {} locked until {needed} total levels", upgrade.tier);
        return;
    }
    let cost = u64_to_f64(upgrade_cost(upgrade, level));
    if state.money < cost {
        log::debug!("cannot afford `{id}` at {cost}");
        return;
    }
    let word_cost = upgrade.word_cost.unwrap_or(0);
    if state.words < word_cost {
        log::debug!("upgrade `{id}` needs {word_cost} words");
        return;
    }

    state.money -= cost;
    state.words -= word_cost;
    let new_level = level + 1;
    state.upgrade_levels.insert(upgrade.id.clone(), new_level);
    state.push_log(format!("Tiered {} to Lv.{new_level}.", upgrade.name));
    log::info!("bought upgrade `{id}` level {new_level} for {cost}");
    apply_upgrade_effect(state, upgrade, level);
}

fn buy_generator(state: &mut GameState, id: &str, catalog: &Catalog) {
    let Some(generator) = catalog.find_generator(id) else {
        log::debug!("unknown generator `{id}`");
        return;
    };
    if let Some(requires) = &generator.requires
        && state.generator_level(requires) == 0
    {
        log::debug!("generator `{id}` needs `{requires}` first");
        return;
    }
    let owned = state.generator_level(id);
    let cost = u64_to_f64(generator_cost(generator, owned));
    if state.money < cost {
        log::debug!("cannot afford `{id}` at {cost}");
        return;
    }
    state.money -= cost;
    state.generator_levels.insert(generator.id.clone(), owned + 1);
    state.push_log(format!("Expanded {}.", generator.name));
    log::info!("bought generator `{id}` #{} for {cost}", owned + 1);
}
