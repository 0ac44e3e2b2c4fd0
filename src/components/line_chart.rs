use dioxus::prelude::*;

use crate::dashboard::{ChartKind, ChartPoint, Dashboard};
use crate::utils::format::format_clock;

const WIDTH: f32 = 640.0;
const HEIGHT: f32 = 200.0;
const PADDING: f32 = 28.0;

/// Plot coordinates for a series, in data order. A flat or single-point
/// series is centred instead of dividing by a zero range.
pub fn layout(points: &[ChartPoint], width: f32, height: f32, padding: f32) -> Vec<(f32, f32)> {
    if points.is_empty() {
        return vec![];
    }
    let t_min = points.iter().map(|p| p.t_ms).min().unwrap_or(0);
    let t_max = points.iter().map(|p| p.t_ms).max().unwrap_or(0);
    let y_min = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let inner_w = width - padding * 2.0;
    let inner_h = height - padding * 2.0;
    points
        .iter()
        .map(|p| {
            let fx = if t_max > t_min {
                (p.t_ms - t_min) as f32 / (t_max - t_min) as f32
            } else {
                0.5
            };
            let fy = if y_max > y_min {
                ((p.y - y_min) / (y_max - y_min)) as f32
            } else {
                0.5
            };
            (padding + fx * inner_w, padding + (1.0 - fy) * inner_h)
        })
        .collect()
}

fn path_d(coords: &[(f32, f32)]) -> String {
    coords
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd} {x:.2} {y:.2}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[allow(non_snake_case)]
#[component]
pub fn LineChartView(dashboard: Signal<Dashboard>, kind: ChartKind) -> Element {
    let mut hovered = use_signal(|| Option::<usize>::None);

    let dash = dashboard.read();
    let Some(chart) = dash.chart(kind) else {
        return rsx! {
            div { class: "animate-pulse h-52 bg-slate-800/60 rounded-xl" }
        };
    };
    let chart_id = chart.id;
    let points: Vec<ChartPoint> = chart.points.clone();
    drop(dash);

    let coords = layout(&points, WIDTH, HEIGHT, PADDING);
    let d = path_d(&coords);
    let view_box = format!("0 0 {} {}", WIDTH, HEIGHT);
    let stroke_class = match kind {
        ChartKind::Temperature => "text-sky-400",
        ChartKind::Humidity => "text-emerald-400",
    };
    let y_range = points
        .iter()
        .map(|p| p.y)
        .fold(None, |acc: Option<(f64, f64)>, y| match acc {
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            None => Some((y, y)),
        });
    let first_clock = points.first().map(|p| format_clock(p.t_ms)).unwrap_or_default();
    let last_clock = points.last().map(|p| format_clock(p.t_ms)).unwrap_or_default();

    // Keyed by instance id so a rebuilt chart replaces the old node
    let plot = rsx! {
        svg { key: "{chart_id}", class: "block w-full", view_box: "{view_box}",
            line { x1: "{PADDING}", y1: "{HEIGHT - PADDING}", x2: "{WIDTH - PADDING}", y2: "{HEIGHT - PADDING}", stroke: "#1f2937", stroke_width: "1" }
            if let Some((lo, hi)) = y_range {
                text { x: "2", y: "{PADDING + 4.0}", class: "fill-current text-[10px] text-slate-500", "{hi}" }
                text { x: "2", y: "{HEIGHT - PADDING}", class: "fill-current text-[10px] text-slate-500", "{lo}" }
            }
            text { x: "{PADDING}", y: "{HEIGHT - 8.0}", class: "fill-current text-[10px] text-slate-500", "{first_clock}" }
            text { x: "{WIDTH - PADDING - 48.0}", y: "{HEIGHT - 8.0}", class: "fill-current text-[10px] text-slate-500", "{last_clock}" }
            path { class: "{stroke_class}", d: "{d}", fill: "none", stroke: "currentColor", stroke_width: "2", stroke_linejoin: "round" }
            {
                coords.iter().enumerate().map(|(i, (x, y))| {
                    rsx! { circle {
                        key: "{i}", class: "{stroke_class}", cx: "{x}", cy: "{y}", r: "3", fill: "currentColor",
                        onmouseenter: move |_| *hovered.write() = Some(i),
                        onmouseleave: move |_| *hovered.write() = None,
                        ontouchstart: move |_| *hovered.write() = Some(i),
                        ontouchend: move |_| *hovered.write() = None,
                    }}
                })
            }
            {
                match *hovered.read() {
                    Some(i) if i < points.len() => {
                        let (x, y) = coords[i];
                        let clock = format_clock(points[i].t_ms);
                        let value = points[i].y;
                        let tip_w = 92.0f32;
                        let tip_h = 36.0f32;
                        let tip_x = (x - tip_w / 2.0).clamp(PADDING, WIDTH - PADDING - tip_w);
                        let tip_y = (y - 10.0 - tip_h).max(4.0);
                        rsx! { g { key: "tooltip",
                            rect { x: "{tip_x}", y: "{tip_y}", width: "{tip_w}", height: "{tip_h}", rx: "6", fill: "#0f172a", stroke: "#334155", stroke_width: "1" }
                            text { x: "{tip_x + 8.0}", y: "{tip_y + 16.0}", class: "fill-current text-[11px] text-slate-300", "{clock}" }
                            text { x: "{tip_x + 8.0}", y: "{tip_y + 30.0}", class: "fill-current text-[11px] text-slate-200", "{value}" }
                        }}
                    }
                    _ => rsx! { Fragment {} },
                }
            }
        }
    };

    rsx! {
        div { class: "rounded-2xl border border-slate-800 bg-slate-900/60 shadow-xl p-4 space-y-2",
            h2 { class: "text-sm font-medium text-slate-300", "{kind.label()}" }
            {plot}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(t_ms: i64, y: f64) -> ChartPoint {
        ChartPoint { t_ms, y }
    }

    #[test]
    fn spans_the_plot_area() {
        let c = layout(&[p(0, 0.0), p(10, 5.0), p(20, 10.0)], 100.0, 60.0, 10.0);
        assert_eq!(c, vec![(10.0, 50.0), (50.0, 30.0), (90.0, 10.0)]);
    }

    #[test]
    fn flat_series_is_centred() {
        let c = layout(&[p(5, 4.0)], 100.0, 60.0, 10.0);
        assert_eq!(c, vec![(50.0, 30.0)]);
        assert!(layout(&[], 100.0, 60.0, 10.0).is_empty());
    }

    #[test]
    fn path_moves_then_lines() {
        assert_eq!(path_d(&[(1.0, 2.0), (3.0, 4.0)]), "M 1.00 2.00 L 3.00 4.00");
    }
}
