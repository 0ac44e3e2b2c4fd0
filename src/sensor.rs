#![cfg(feature = "desktop")]
//! Mock cold-chain sensor: posts a random reading to `/api/data` on a fixed
//! cadence so the dashboard has something to show without hardware.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use dioxus::logger::tracing::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::shared::types::Reading;

pub const DEFAULT_DEVICE_ID: &str = "simulated_coldchain_01";
pub const SEND_INTERVAL: Duration = Duration::from_secs(10);
pub const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Body accepted by `POST /api/data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorPayload {
    pub device_id: String,
    pub timestamp: String,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub battery_voltage: f64,
    pub door_state: String,
}

impl SensorPayload {
    pub fn reading(&self) -> Reading {
        Reading {
            temperature_c: Some(self.temperature_c),
            humidity_percent: Some(self.humidity_percent),
            battery_voltage: Some(self.battery_voltage),
            door_state: Some(self.door_state.clone()),
            tx_hash: None,
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Temperatures span both alert thresholds; the door is open 5% of the time.
pub fn fake_reading<R: Rng + ?Sized>(rng: &mut R, device_id: &str) -> SensorPayload {
    SensorPayload {
        device_id: device_id.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        temperature_c: round2(rng.gen_range(-5.0..=10.0)),
        humidity_percent: round2(rng.gen_range(60.0..=95.0)),
        battery_voltage: round2(rng.gen_range(3.3..=4.2)),
        door_state: if rng.gen_bool(0.05) { "open" } else { "closed" }.to_string(),
    }
}

async fn send(client: &reqwest::Client, url: &str, payload: &SensorPayload) -> Result<()> {
    let res = client
        .post(url)
        .json(payload)
        .send()
        .await
        .with_context(|| format!("sending POST {url}"))?;
    let status = res.status();
    let text = res
        .text()
        .await
        .with_context(|| format!("reading reply from POST {url}"))?;
    if !status.is_success() {
        return Err(anyhow!("POST {} failed with status {}: {}", url, status, text));
    }
    info!("[sensor] sent ({}): {}", status, text);
    Ok(())
}

pub async fn run(config: DashboardConfig, device_id: String) -> Result<()> {
    let url = format!("{}/data", config.api_root);
    let client = reqwest::Client::builder()
        .timeout(SEND_TIMEOUT)
        .build()
        .context("building HTTP client")?;
    info!("[sensor] {} sending to {} every {:?}", device_id, url, SEND_INTERVAL);

    let mut interval = tokio::time::interval(SEND_INTERVAL);
    loop {
        interval.tick().await;
        let payload = fake_reading(&mut rand::thread_rng(), &device_id);
        let alerts = payload.reading().alerts();
        if !alerts.is_empty() {
            let kinds: Vec<&str> = alerts.iter().map(|a| a.as_str()).collect();
            info!("[sensor] reading should raise {}", kinds.join(", "));
        }
        if let Err(e) = send(&client, &url, &payload).await {
            warn!("[sensor] send error: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::AlertKind;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn readings_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let r = fake_reading(&mut rng, DEFAULT_DEVICE_ID);
            assert!((-5.0..=10.0).contains(&r.temperature_c));
            assert!((60.0..=95.0).contains(&r.humidity_percent));
            assert!((3.3..=4.2).contains(&r.battery_voltage));
            assert!(r.door_state == "open" || r.door_state == "closed");
            assert_eq!(round2(r.temperature_c), r.temperature_c);
            assert!(r.timestamp.ends_with('Z'));
        }
    }

    #[test]
    fn payload_alerts_match_the_dashboard_rule() {
        let mut p = fake_reading(&mut StdRng::seed_from_u64(7), "d1");
        p.temperature_c = 9.5;
        p.door_state = "open".into();
        assert_eq!(
            p.reading().alerts(),
            vec![AlertKind::HighTemp, AlertKind::DoorOpen]
        );
        let body = serde_json::to_value(&p).unwrap();
        assert_eq!(body["device_id"], "d1");
        assert_eq!(body["temperature_c"], 9.5);
    }
}
