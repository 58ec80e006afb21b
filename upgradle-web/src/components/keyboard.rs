use std::collections::BTreeMap;

use upgradle_game::LetterMark;
use yew::prelude::*;

use crate::input::{BACKSPACE_KEY, ENTER_KEY, KEYBOARD_ROWS};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub key_state: BTreeMap<char, LetterMark>,
    pub on_key: Callback<&'static str>,
}

fn key_label(key: &str) -> &str {
    match key {
        BACKSPACE_KEY => "⌫",
        ENTER_KEY => "Enter",
        _ => key,
    }
}

#[function_component(Keyboard)]
pub fn keyboard(props: &Props) -> Html {
    html! {
        <div class="keyboard">
            { for KEYBOARD_ROWS.iter().map(|row| html! {
                <div class="keyboard-row">
                    { for row.iter().map(|key| {
                        let key: &'static str = *key;
                        let mark = key.chars().next().filter(|_| key.len() == 1).and_then(|c| props.key_state.get(&c));
                        let class = classes!(
                            "key",
                            (key.len() > 1).then_some("key--wide"),
                            mark.map(|m| format!("key--{}", m.as_str())),
                        );
                        let onclick = props.on_key.reform(move |_: MouseEvent| key);
                        html! { <button type="button" {class} {onclick}>{ key_label(key) }</button> }
                    }) }
                </div>
            }) }
        </div>
    }
}
