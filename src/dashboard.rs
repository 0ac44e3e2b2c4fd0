//! Dashboard controller.
//!
//! Owns everything a refresh cycle rebuilds: the two history charts, the
//! device rows and the chain alert cards. Nothing here touches the DOM; the
//! components in [`crate::components`] render whatever the controller holds.

use anyhow::Result;
use dioxus::logger::tracing::debug;

use crate::api::{ApiClient, Transport};
use crate::shared::types::{AlertKind, ChainAlert, Device, HistoryPoint};
use crate::utils::format::{format_cell, parse_timestamp, tx_url};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub t_ms: i64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Temperature,
    Humidity,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Temperature => "Temperature (°C)",
            ChartKind::Humidity => "Humidity (%)",
        }
    }
}

/// One live chart instance. Not `Clone`: the controller is the only owner and
/// disposing consumes it.
#[derive(Debug, PartialEq)]
pub struct LineChart {
    pub id: u64,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
}

impl LineChart {
    fn dispose(self, lifecycle: &mut ChartLifecycle) {
        lifecycle.disposed += 1;
        debug!("[dashboard] disposed chart #{} ({:?})", self.id, self.kind);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartLifecycle {
    pub created: u64,
    pub disposed: u64,
}

impl ChartLifecycle {
    pub fn live(&self) -> u64 {
        self.created - self.disposed
    }
}

#[derive(Debug, PartialEq)]
pub struct ChartPair {
    pub temperature: LineChart,
    pub humidity: LineChart,
}

impl ChartPair {
    pub fn get(&self, kind: ChartKind) -> &LineChart {
        match kind {
            ChartKind::Temperature => &self.temperature,
            ChartKind::Humidity => &self.humidity,
        }
    }
}

/// Splits history into the temperature and humidity series. Points with an
/// unreadable timestamp are dropped from both; a missing value leaves a gap
/// in its own series only.
pub fn project(history: &[HistoryPoint]) -> (Vec<ChartPoint>, Vec<ChartPoint>) {
    let mut temps = Vec::with_capacity(history.len());
    let mut hums = Vec::with_capacity(history.len());
    for h in history {
        let Some(t_ms) = parse_timestamp(&h.timestamp).map(|dt| dt.timestamp_millis()) else {
            continue;
        };
        if let Some(y) = h.temperature_c {
            temps.push(ChartPoint { t_ms, y });
        }
        if let Some(y) = h.humidity_percent {
            hums.push(ChartPoint { t_ms, y });
        }
    }
    (temps, hums)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub device_id: String,
    pub temperature: String,
    pub humidity: String,
    pub battery: String,
    pub door: String,
    pub tx_url: Option<String>,
    pub alerts: Vec<AlertKind>,
}

impl DeviceRow {
    pub fn is_flagged(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn row_class(&self) -> &'static str {
        if self.is_flagged() {
            "alert"
        } else {
            ""
        }
    }

    pub fn alert_summary(&self) -> String {
        self.alerts
            .iter()
            .map(AlertKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let r = d.latest.clone().unwrap_or_default();
        Self {
            device_id: d.device_id.clone(),
            temperature: format_cell(r.temperature_c),
            humidity: format_cell(r.humidity_percent),
            battery: format_cell(r.battery_voltage),
            door: r.door_state.clone().unwrap_or_default(),
            tx_url: tx_url(r.tx_hash.as_deref()),
            alerts: r.alerts(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertCard {
    pub alert_type: String,
    pub device_id: String,
    pub timestamp: String,
    pub tx_url: Option<String>,
    pub hash: String,
}

impl From<&ChainAlert> for AlertCard {
    fn from(a: &ChainAlert) -> Self {
        Self {
            alert_type: a.alert_type.clone(),
            device_id: a.device_id.clone(),
            timestamp: a.timestamp.to_string(),
            tx_url: tx_url(a.tx_hash.as_deref()),
            hash: a.hash().to_string(),
        }
    }
}

/// One fetched resource, applied to the controller as soon as it arrives.
#[derive(Debug)]
pub enum CycleStep {
    History(Vec<HistoryPoint>),
    Devices(Vec<Device>),
    Alerts(Vec<ChainAlert>),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    charts: Option<ChartPair>,
    lifecycle: ChartLifecycle,
    next_chart_id: u64,
    devices: Vec<DeviceRow>,
    alerts: Vec<AlertCard>,
}

impl Dashboard {
    pub fn apply(&mut self, step: CycleStep) {
        match step {
            CycleStep::History(history) => self.rebuild_charts(&history),
            CycleStep::Devices(devices) => {
                self.devices = devices.iter().map(DeviceRow::from).collect();
            }
            CycleStep::Alerts(alerts) => {
                self.alerts = alerts.iter().map(AlertCard::from).collect();
            }
        }
    }

    /// Old instances are disposed before the new pair is created.
    pub fn rebuild_charts(&mut self, history: &[HistoryPoint]) {
        if let Some(old) = self.charts.take() {
            old.temperature.dispose(&mut self.lifecycle);
            old.humidity.dispose(&mut self.lifecycle);
        }
        let (temps, hums) = project(history);
        let temperature = self.create_chart(ChartKind::Temperature, temps);
        let humidity = self.create_chart(ChartKind::Humidity, hums);
        self.charts = Some(ChartPair {
            temperature,
            humidity,
        });
        debug!(
            "[dashboard] charts rebuilt from {} points ({} live)",
            history.len(),
            self.lifecycle.live()
        );
    }

    fn create_chart(&mut self, kind: ChartKind, points: Vec<ChartPoint>) -> LineChart {
        self.next_chart_id += 1;
        self.lifecycle.created += 1;
        LineChart {
            id: self.next_chart_id,
            kind,
            points,
        }
    }

    pub fn chart(&self, kind: ChartKind) -> Option<&LineChart> {
        self.charts.as_ref().map(|c| c.get(kind))
    }

    pub fn lifecycle(&self) -> ChartLifecycle {
        self.lifecycle
    }

    pub fn devices(&self) -> &[DeviceRow] {
        &self.devices
    }

    pub fn alerts(&self) -> &[AlertCard] {
        &self.alerts
    }
}

/// One refresh cycle: history, then devices, then chain alerts, strictly in
/// sequence. Each result is handed to `apply` before the next request starts;
/// the first failure ends the cycle.
pub async fn refresh_cycle<T: Transport>(
    api: &ApiClient<T>,
    mut apply: impl FnMut(CycleStep),
) -> Result<()> {
    let history = api.history().await?;
    apply(CycleStep::History(history));

    let devices = api.devices().await?;
    apply(CycleStep::Devices(devices));

    let alerts = api.chain_alerts().await?;
    apply(CycleStep::Alerts(alerts));
    Ok(())
}
