use upgradle_game::{BoardRow, RowKind, heat_class};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub rows: Vec<BoardRow>,
    /// Target word; only consulted for hot/cold tiles.
    pub target: AttrValue,
    #[prop_or_default]
    pub show_hot_cold: bool,
}

fn tile_class(row: &BoardRow, index: usize, letter: char, props: &Props) -> Classes {
    let mut classes = classes!("tile");
    if row.kind != RowKind::Guess {
        if letter != ' ' {
            classes.push("tile--filled");
        }
        return classes;
    }
    if props.show_hot_cold {
        classes.push(heat_class(Some(letter), props.target.chars().nth(index)).css_class());
    } else if let Some(mark) = row.marks.get(index) {
        classes.push(format!("tile--{}", mark.as_str()));
    }
    classes
}

#[function_component(Board)]
pub fn board(props: &Props) -> Html {
    html! {
        <div class="board" role="grid">
            { for props.rows.iter().map(|row| html! {
                <div key={row.id.clone()} class={classes!("board-row", (row.kind == RowKind::Current).then_some("board-row--current"))}>
                    { for row.word.chars().enumerate().map(|(i, letter)| html! {
                        <span class={tile_class(row, i, letter, props)}>{ letter.to_string() }</span>
                    }) }
                    if row.kind == RowKind::Guess {
                        <span class="row-payout">{ format!("${:.0}", row.payout) }</span>
                    }
                </div>
            }) }
        </div>
    }
}
