//! Guess scoring: Wordle marks plus the base payout for a submission.
use std::collections::HashMap;

use crate::constants::{
    PAYOUT_BASE, PAYOUT_CORRECT, PAYOUT_CORRECT_BONUS, PAYOUT_MISS, PAYOUT_PRESENT,
    PAYOUT_SOLVE_BASE, PAYOUT_SOLVE_PER_LETTER,
};
use crate::state::LetterMark;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub marks: Vec<LetterMark>,
    pub base_payout: u32,
    pub solved: bool,
}

impl Evaluation {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.marks
            .iter()
            .filter(|m| **m == LetterMark::Correct)
            .count()
    }
}

/// Score `guess` against `target`.
///
/// Exact positional matches are marked first; each remaining target letter can then
/// satisfy at most one `Present` mark, scanning left to right. Positions the guess does
/// not reach are marked `Miss`.
#[must_use]
pub fn evaluate_guess(guess: &str, target: &str) -> Evaluation {
    let guess: Vec<char> = guess.chars().collect();
    let target_chars: Vec<char> = target.chars().collect();
    let mut marks = vec![LetterMark::Miss; target_chars.len()];
    let mut remaining: HashMap<char, u32> = HashMap::new();

    for (i, t) in target_chars.iter().enumerate() {
        if guess.get(i) == Some(t) {
            marks[i] = LetterMark::Correct;
        } else {
            *remaining.entry(*t).or_insert(0) += 1;
        }
    }

    for (i, mark) in marks.iter_mut().enumerate() {
        if *mark == LetterMark::Correct {
            continue;
        }
        let Some(letter) = guess.get(i) else {
            continue;
        };
        if let Some(count) = remaining.get_mut(letter)
            && *count > 0
        {
            *mark = LetterMark::Present;
            *count -= 1;
        }
    }

    let mut base_payout = PAYOUT_BASE;
    let mut correct_count = 0_u32;
    for mark in &marks {
        base_payout += match mark {
            LetterMark::Correct => {
                correct_count += 1;
                PAYOUT_CORRECT
            }
            LetterMark::Present => PAYOUT_PRESENT,
            LetterMark::Miss => PAYOUT_MISS,
        };
    }

    let solved = guess == target_chars;
    if solved {
        let letters = u32::try_from(target_chars.len()).unwrap_or(u32::MAX);
        base_payout += PAYOUT_SOLVE_BASE + PAYOUT_SOLVE_PER_LETTER * letters;
    }
    // Correct letters score twice.
    base_payout += correct_count * PAYOUT_CORRECT_BONUS;

    Evaluation {
        marks,
        base_payout,
        solved,
    }
}
