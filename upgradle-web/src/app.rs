use std::cell::RefCell;
use std::rc::Rc;

use upgradle_game::{
    Catalog, EngineConfig, GameAction, GameEngine, GameState, WordBank, WordLength, board_rows,
    keyboard_state,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use crate::components::board::Board;
use crate::components::keyboard::Keyboard;
use crate::components::ledger::{LogPanel, PuzzleStatus, Stats};
use crate::components::shop::{GeneratorShop, UpgradeShop};
use crate::dom::{console_warn, entropy_seed, js_error_message, window};
use crate::input::{physical_key_action, virtual_key_action};
use crate::storage::WebGameStorage;
use crate::words::load_dictionary;

pub type WebEngine = GameEngine<WordBank, WebGameStorage>;

fn build_engine(rerender: UseForceUpdateHandle) -> WebEngine {
    let mut engine = GameEngine::restore_or_new(
        load_dictionary(),
        WebGameStorage,
        Catalog::load_from_static(),
        EngineConfig::default(),
        entropy_seed(),
    );
    engine.subscribe(Box::new(
        move |_: &GameState, _: &GameState, _: &GameAction| rerender.force_update(),
    ));
    engine
}

/// Register the passive-income timer and the physical keyboard listener,
/// returning the teardown steps for each one that was installed.
fn install_listeners(
    engine: &RefCell<WebEngine>,
    dispatch: Callback<GameAction>,
) -> Vec<Box<dyn FnOnce()>> {
    let mut teardown: Vec<Box<dyn FnOnce()>> = Vec::new();
    let Ok(win) = window() else {
        console_warn("no window; timers and keyboard disabled");
        return teardown;
    };

    let tick_ms = i32::try_from(engine.borrow().config().tick_interval_ms).unwrap_or(i32::MAX);
    let tick_dispatch = dispatch.clone();
    let tick = Closure::wrap(Box::new(move || tick_dispatch.emit(GameAction::Tick)) as Box<dyn FnMut()>);
    let registered = win
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), tick_ms);
    match registered {
        Ok(id) => {
            let win = win.clone();
            teardown.push(Box::new(move || {
                win.clear_interval_with_handle(id);
                drop(tick);
            }));
        }
        Err(err) => console_warn(&format!("tick timer failed: {}", js_error_message(&err))),
    }

    let keydown = Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
        if e.ctrl_key() || e.meta_key() || e.alt_key() {
            return;
        }
        if let Some(action) = physical_key_action(&e.key()) {
            e.prevent_default();
            dispatch.emit(action);
        }
    }) as Box<dyn FnMut(_)>);
    let registered =
        win.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
    match registered {
        Ok(()) => {
            teardown.push(Box::new(move || {
                let _ = win.remove_event_listener_with_callback(
                    "keydown",
                    keydown.as_ref().unchecked_ref(),
                );
            }));
        }
        Err(err) => console_warn(&format!("keyboard listener failed: {}", js_error_message(&err))),
    }

    teardown
}

#[function_component(App)]
pub fn app() -> Html {
    let rerender = use_force_update();
    let engine = use_mut_ref(move || build_engine(rerender));

    let dispatch = {
        let engine = engine.clone();
        Callback::from(move |action: GameAction| {
            engine.borrow_mut().dispatch(&action);
        })
    };

    {
        let engine = engine.clone();
        let dispatch = dispatch.clone();
        use_effect_with((), move |_| {
            let teardown = install_listeners(&engine, dispatch);
            move || teardown.into_iter().for_each(|step| step())
        });
    }

    let (state, catalog) = {
        let engine = engine.borrow();
        (Rc::new(engine.state().clone()), Rc::new(engine.catalog().clone()))
    };

    let on_key = {
        let dispatch = dispatch.clone();
        Callback::from(move |key: &'static str| {
            if let Some(action) = virtual_key_action(key) {
                dispatch.emit(action);
            }
        })
    };
    let on_buy_upgrade = dispatch.reform(GameAction::BuyUpgrade);
    let on_buy_generator = dispatch.reform(GameAction::BuyGenerator);
    let on_next = dispatch.reform(|_: MouseEvent| GameAction::StartNextPuzzle);
    let on_reset = {
        let engine = engine.clone();
        Callback::from(move |_: MouseEvent| {
            let confirmed = window()
                .and_then(|w| w.confirm_with_message("Wipe the ledger and start over?"))
                .unwrap_or_else(|err| {
                    log::warn!("reset confirmation unavailable: {}", js_error_message(&err));
                    false
                });
            if confirmed {
                engine.borrow_mut().reset();
            }
        })
    };

    html! {
        <main class="upgradle">
            <Stats state={state.clone()} />
            <nav class="lengths">
                { for WordLength::ALL.into_iter().map(|length| {
                    let unlocked = state.unlocked_lengths.contains(&length);
                    let active = state.selected_length == length;
                    let onclick = dispatch.reform(move |_: MouseEvent| GameAction::SetLength(length));
                    html! {
                        <button type="button"
                            class={classes!("length", active.then_some("length--active"))}
                            disabled={!unlocked || active}
                            {onclick}>
                            { format!("{length} letters") }
                        </button>
                    }
                }) }
            </nav>
            <Board
                rows={board_rows(&state)}
                target={AttrValue::from(state.current_word.clone())}
                show_hot_cold={state.show_hot_cold}
            />
            if !state.hint_reveals.is_empty() {
                <p class="hints">
                    { for state.hint_reveals.iter().map(|(slot, letter)| format!("#{}={letter} ", slot + 1)) }
                </p>
            }
            <PuzzleStatus state={state.clone()} {on_next} />
            if state.show_hot_cold {
                <p class="note">{ "Thermal hints replace colors: hot tiles mean close alphabetically." }</p>
            }
            <Keyboard key_state={keyboard_state(&state)} {on_key} />
            <UpgradeShop state={state.clone()} catalog={catalog.clone()} on_buy_upgrade={on_buy_upgrade.clone()} on_buy_generator={on_buy_generator.clone()} />
            <GeneratorShop state={state.clone()} {catalog} {on_buy_upgrade} {on_buy_generator} />
            <LogPanel {state} />
            <button type="button" class="reset" onclick={on_reset}>{ "Reset" }</button>
        </main>
    }
}
