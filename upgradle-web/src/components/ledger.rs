use std::rc::Rc;

use upgradle_game::{GameState, finished_status};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub state: Rc<GameState>,
}

#[function_component(Stats)]
pub fn stats(props: &Props) -> Html {
    let state = &props.state;
    html! {
        <header class="stats">
            <span class="stat stat--money">{ format!("${:.0}", state.money.floor()) }</span>
            <span class="stat">{ format!("{} words", state.words) }</span>
            <span class="stat">{ format!("Solved {}", state.puzzles_solved) }</span>
            <span class="stat">{ format!("Earned ${:.0}", state.total_earned.floor()) }</span>
            <span class="stat">{ format!("x{:.2}", state.payout_multiplier) }</span>
        </header>
    }
}

#[function_component(LogPanel)]
pub fn log_panel(props: &Props) -> Html {
    html! {
        <ol class="log" aria-live="polite">
            { for props.state.log.iter().map(|line| html! { <li>{ line.clone() }</li> }) }
        </ol>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct StatusProps {
    pub state: Rc<GameState>,
    pub on_next: Callback<MouseEvent>,
}

/// Remaining guesses while playing; the result and a "Next word" button once finished.
#[function_component(PuzzleStatus)]
pub fn puzzle_status(props: &StatusProps) -> Html {
    let state = &props.state;
    if !state.puzzle_complete {
        return html! { <p class="status">{ format!("{} guesses left", state.guesses_left()) }</p> };
    }
    let banner = state
        .puzzle_status
        .clone()
        .unwrap_or_else(|| finished_status(state));
    html! {
        <div class="status">
            <p>{ banner }</p>
            <button type="button" class="next" onclick={props.on_next.clone()}>{ "Next word" }</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn stats_floor_money() {
        let mut state = GameState::default();
        state.money = 41.9;
        state.words = 3;
        let props = Props {
            state: Rc::new(state),
        };
        let html = block_on(LocalServerRenderer::<Stats>::with_props(props).render());
        assert!(html.contains("$41"));
        assert!(html.contains("3 words"));
    }

    #[test]
    fn log_lists_newest_first() {
        let mut state = GameState::default();
        state.push_log("second");
        let props = Props {
            state: Rc::new(state),
        };
        let html = block_on(LocalServerRenderer::<LogPanel>::with_props(props).render());
        let second = html.find("second").unwrap();
        let welcome = html.find("Welcome to Upgradle").unwrap();
        assert!(second < welcome);
    }

    #[test]
    fn finished_puzzle_without_banner_offers_next_word() {
        let mut state = GameState::default();
        state.current_word = "CRANE".to_string();
        state.puzzle_complete = true;
        state.puzzle_status = None;
        let props = StatusProps {
            state: Rc::new(state),
            on_next: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<PuzzleStatus>::with_props(props).render());
        assert!(html.contains("The answer was CRANE"));
        assert!(html.contains("Next word"));
    }

    #[test]
    fn active_puzzle_shows_guesses_left() {
        let state = GameState::default();
        let left = state.guesses_left();
        let props = StatusProps {
            state: Rc::new(state),
            on_next: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<PuzzleStatus>::with_props(props).render());
        assert!(html.contains(&format!("{left} guesses left")));
        assert!(!html.contains("Next word"));
    }
}
