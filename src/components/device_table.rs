use dioxus::prelude::*;

use crate::dashboard::{Dashboard, DeviceRow};

#[allow(non_snake_case)]
#[component]
pub fn DeviceTable(dashboard: Signal<Dashboard>) -> Element {
    let rows: Vec<DeviceRow> = dashboard.read().devices().to_vec();

    rsx! {
        div { class: "rounded-2xl border border-slate-800 bg-slate-900/60 shadow-xl p-6 space-y-3",
            h2 { class: "text-lg font-medium text-slate-200", "Devices" }
            div { class: "w-full overflow-x-auto",
                table { id: "deviceTable", class: "w-full text-sm text-left tabular-nums",
                    thead { class: "text-xs uppercase text-slate-400",
                        tr {
                            th { class: "py-2 pr-4", "Device" }
                            th { class: "py-2 pr-4", "Temp (°C)" }
                            th { class: "py-2 pr-4", "Humidity (%)" }
                            th { class: "py-2 pr-4", "Battery (V)" }
                            th { class: "py-2 pr-4", "Door" }
                            th { class: "py-2", "Proof" }
                        }
                    }
                    tbody {
                        for row in rows {
                            DeviceRowView { key: "{row.device_id}", row: row }
                        }
                    }
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn DeviceRowView(row: DeviceRow) -> Element {
    let flagged = row.is_flagged();
    let tone = if flagged {
        "bg-red-950/60 text-red-300"
    } else {
        "text-slate-200"
    };
    let temp_class = if flagged {
        "py-2 pr-4 font-semibold"
    } else {
        "py-2 pr-4"
    };
    let title = row.alert_summary();

    rsx! {
        tr { class: "{row.row_class()} border-t border-slate-800 {tone}", title: "{title}",
            td { class: "py-2 pr-4 font-mono", "{row.device_id}" }
            td { class: "{temp_class}", "{row.temperature}" }
            td { class: "py-2 pr-4", "{row.humidity}" }
            td { class: "py-2 pr-4", "{row.battery}" }
            td { class: "py-2 pr-4", "{row.door}" }
            td { class: "py-2",
                if let Some(url) = &row.tx_url {
                    a { class: "link text-sky-400 hover:underline", href: "{url}", target: "_blank", "tx" }
                }
            }
        }
    }
}
