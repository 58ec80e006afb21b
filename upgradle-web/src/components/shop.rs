use std::rc::Rc;

use upgradle_game::constants::tier_requirement;
use upgradle_game::{
    Catalog, GameState, generator_available, generator_cost, passive_income, sorted_upgrades,
    total_upgrade_levels, upgrade_available, upgrade_cost, upgrade_tier_order,
    visible_generator_tiers,
};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub state: Rc<GameState>,
    pub catalog: Rc<Catalog>,
    pub on_buy_upgrade: Callback<String>,
    pub on_buy_generator: Callback<String>,
}

#[function_component(UpgradeShop)]
pub fn upgrade_shop(props: &Props) -> Html {
    let state = &props.state;
    let sorted = sorted_upgrades(&props.catalog);
    let total_levels = total_upgrade_levels(state);

    html! {
        <section class="shop shop--upgrades">
            <h2>{ "Upgrades" }</h2>
            { for upgrade_tier_order(&props.catalog).into_iter().map(|tier| {
                let needed = tier_requirement(tier);
                let locked = total_levels < needed;
                html! {
                    <div class={classes!("tier", locked.then_some("tier--locked"))}>
                        <h3>{ format!("Tier {tier}") }</h3>
                        if locked {
                            <p class="tier-gate">{ format!("Requires {needed} total upgrade levels ({total_levels}/{needed}).") }</p>
                        }
                        { for sorted.iter().filter(|u| u.tier == tier).map(|upgrade| {
                            let level = state.upgrade_level(&upgrade.id);
                            let maxed = upgrade.max_level.is_some_and(|max| level >= max);
                            let cost = upgrade_cost(upgrade, level);
                            let id = upgrade.id.clone();
                            let onclick = props.on_buy_upgrade.reform(move |_: MouseEvent| id.clone());
                            let level_label = upgrade.max_level.map_or_else(
                                || format!("Lv.{level}"),
                                |max| format!("Lv.{level}/{max}"),
                            );
                            html! {
                                <div class="shop-item" key={upgrade.id.clone()}>
                                    <div class="shop-item__head">
                                        <strong>{ upgrade.name.clone() }</strong>
                                        <span class="shop-item__level">{ level_label }</span>
                                    </div>
                                    <p>{ upgrade.description.clone() }</p>
                                    if let Some(req) = upgrade.requires.as_ref().and_then(|r| props.catalog.find_upgrade(r)) {
                                        <p class="shop-item__req">{ format!("Needs {}", req.name) }</p>
                                    }
                                    <button type="button" class="buy" disabled={maxed || !upgrade_available(state, upgrade)} {onclick}>
                                        if maxed {
                                            { "Maxed" }
                                        } else {
                                            { format!("${cost}") }
                                            if let Some(words) = upgrade.word_cost {
                                                { format!(" + {words}w") }
                                            }
                                        }
                                    </button>
                                </div>
                            }
                        }) }
                    </div>
                }
            }) }
        </section>
    }
}

#[function_component(GeneratorShop)]
pub fn generator_shop(props: &Props) -> Html {
    let state = &props.state;
    let visible = visible_generator_tiers(state, &props.catalog);
    let income = passive_income(state, &props.catalog.generators);

    html! {
        <section class="shop shop--generators">
            <h2>{ "Generators" }</h2>
            <p class="income">{ format!("Passive income: ${income:.1}/tick") }</p>
            { for props.catalog.generators.iter().filter(|g| visible.contains(&g.tier)).map(|generator| {
                let owned = state.generator_level(&generator.id);
                let cost = generator_cost(generator, owned);
                let id = generator.id.clone();
                let onclick = props.on_buy_generator.reform(move |_: MouseEvent| id.clone());
                html! {
                    <div class="shop-item" key={generator.id.clone()}>
                        <div class="shop-item__head">
                            <strong>{ generator.name.clone() }</strong>
                            <span class="shop-item__level">{ format!("x{owned}") }</span>
                        </div>
                        <p>{ generator.description.clone() }</p>
                        <button type="button" class="buy" disabled={!generator_available(state, generator)} {onclick}>
                            { format!("${cost}") }
                        </button>
                    </div>
                }
            }) }
        </section>
    }
}
