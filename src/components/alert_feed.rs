use dioxus::prelude::*;

use crate::dashboard::{AlertCard, Dashboard};

#[allow(non_snake_case)]
#[component]
pub fn AlertFeed(dashboard: Signal<Dashboard>) -> Element {
    let cards: Vec<AlertCard> = dashboard.read().alerts().to_vec();

    rsx! {
        div { class: "rounded-2xl border border-slate-800 bg-slate-900/60 shadow-xl p-6 space-y-3",
            h2 { class: "text-lg font-medium text-slate-200", "On-chain alerts" }
            div { id: "chainList", class: "space-y-2",
                for (i, card) in cards.into_iter().enumerate() {
                    AlertCardView { key: "{i}", card: card }
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn AlertCardView(card: AlertCard) -> Element {
    rsx! {
        div { class: "rounded-lg bg-slate-800/70 px-3 py-2",
            div { class: "text-sm text-slate-200",
                strong { class: "text-amber-300", "{card.alert_type}" }
                " — {card.device_id} @ {card.timestamp} "
                if let Some(url) = &card.tx_url {
                    a { class: "link text-sky-400 hover:underline", href: "{url}", target: "_blank", "[tx]" }
                }
            }
            div { class: "text-xs text-slate-400 font-mono break-all", "hash: {card.hash}" }
        }
    }
}
