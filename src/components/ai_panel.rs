use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use crate::api::ApiClient;

#[allow(non_snake_case)]
#[component]
pub fn AiPanel() -> Element {
    let api = use_context::<ApiClient>();
    let mut question = use_signal(String::new);
    let mut answer = use_signal(String::new);

    let ask = move |_: MouseEvent| {
        // Empty input: no request, no feedback.
        let q = question.read().clone();
        if q.is_empty() {
            return;
        }
        let api = api.clone();
        spawn(async move {
            match api.ask(&q).await {
                Ok(Some(text)) => answer.set(text),
                Ok(None) => {}
                Err(e) => warn!("[ai] question failed: {:#}", e),
            }
        });
    };

    rsx! {
        div { class: "rounded-2xl border border-slate-800 bg-slate-900/60 shadow-xl p-6 space-y-3",
            h2 { class: "text-lg font-medium text-slate-200", "Ask the assistant" }
            div { class: "flex gap-2",
                input {
                    id: "aiQuestion",
                    class: "flex-1 rounded-lg bg-slate-800 px-3 py-2 text-sm text-slate-100 placeholder-slate-500",
                    r#type: "text",
                    placeholder: "Were there readings above 8°C today?",
                    value: "{question}",
                    oninput: move |evt| question.set(evt.value()),
                }
                button {
                    id: "askBtn",
                    class: "rounded-lg bg-emerald-500 px-4 py-2 text-sm font-medium text-slate-950 hover:bg-emerald-400",
                    onclick: ask,
                    "Ask"
                }
            }
            div { id: "aiAnswer", class: "whitespace-pre-wrap text-sm text-slate-300", "{answer}" }
        }
    }
}
