use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::components::{AiPanel, AlertFeed, DeviceTable, LineChartView};
use crate::config::DashboardConfig;
use crate::dashboard::{ChartKind, Dashboard};
use crate::scheduler::use_refresh_loop;
use crate::{FAVICON, TAILWIND_CSS};

#[allow(non_snake_case)]
#[component]
pub fn App() -> Element {
    let config = use_hook(DashboardConfig::resolve);
    let api = use_context_provider(|| ApiClient::from_config(&config));
    let dashboard = use_signal(Dashboard::default);

    use_refresh_loop(dashboard, api, config.refresh_interval_ms);

    rsx! {
        document::Link { rel: "icon", href: FAVICON }
        document::Stylesheet { href: TAILWIND_CSS }
        document::Meta { name: "theme-color", content: "#020618" } // slate-950
        document::Meta { name: "color-scheme", content: "dark" }
        document::Title { "Cold-Chain Monitor" }
        // Page container
        div { class: "min-h-screen bg-slate-950 text-slate-100 p-6 space-y-6",
            h1 { class: "w-full max-w-5xl mx-auto text-2xl font-semibold tracking-tight text-slate-200", "Cold-Chain Monitor" }
            // Charts side by side on wide screens
            div { class: "w-full max-w-5xl mx-auto grid gap-6 md:grid-cols-2",
                LineChartView { dashboard: dashboard, kind: ChartKind::Temperature }
                LineChartView { dashboard: dashboard, kind: ChartKind::Humidity }
            }
            div { class: "w-full max-w-5xl mx-auto",
                DeviceTable { dashboard: dashboard }
            }
            div { class: "w-full max-w-5xl mx-auto grid gap-6 md:grid-cols-2",
                AlertFeed { dashboard: dashboard }
                AiPanel {}
            }
        }
    }
}
