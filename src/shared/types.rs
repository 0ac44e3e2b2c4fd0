use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Numbers and numeric strings; anything else (null, bool, junk) is `None`.
fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Any scalar as display text. `null` is `None`.
fn scalar_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn text_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_text(d)?.unwrap_or_default())
}

// The backend stores history before validating it, so any field may be off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub device_id: String,
    #[serde(default)]
    pub latest: Option<Reading>,
}

// Every field is optional: the backend stores whatever the sensor posted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub battery_voltage: Option<f64>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub door_state: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub tx_hash: Option<String>,
}

/// Alert kinds raised by the cold-chain thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    HighTemp,
    LowTemp,
    DoorOpen,
}

impl AlertKind {
    pub const HIGH_TEMP_C: f64 = 8.0;
    pub const LOW_TEMP_C: f64 = -5.0;

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::HighTemp => "HIGH_TEMP",
            AlertKind::LowTemp => "LOW_TEMP",
            AlertKind::DoorOpen => "DOOR_OPEN",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Reading {
    /// Thresholds are exclusive: exactly 8 °C or -5 °C is fine.
    pub fn alerts(&self) -> Vec<AlertKind> {
        let mut out = Vec::new();
        if let Some(t) = self.temperature_c {
            if t > AlertKind::HIGH_TEMP_C {
                out.push(AlertKind::HighTemp);
            }
            if t < AlertKind::LOW_TEMP_C {
                out.push(AlertKind::LowTemp);
            }
        }
        if self.door_state.as_deref() == Some("open") {
            out.push(AlertKind::DoorOpen);
        }
        out
    }
}

/// On-chain alerts carry the timestamp the backend stored, which is either the
/// sensor's ISO string or a number depending on the contract version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertTimestamp {
    Text(String),
    Unix(i64),
    Float(f64),
    #[default]
    Missing,
    // bools, arrays, objects: shown as raw JSON
    Other(Value),
}

impl fmt::Display for AlertTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTimestamp::Text(s) => f.write_str(s),
            AlertTimestamp::Unix(n) => write!(f, "{n}"),
            AlertTimestamp::Float(n) => write!(f, "{n}"),
            AlertTimestamp::Missing => Ok(()),
            AlertTimestamp::Other(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainAlert {
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub alert_type: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub device_id: String,
    #[serde(default)]
    pub timestamp: AlertTimestamp,
    #[serde(default, deserialize_with = "scalar_text")]
    pub tx_hash: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub data_hash: Option<String>,
    // Older backends emit the contract's camelCase name.
    #[serde(default, rename = "dataHash", deserialize_with = "scalar_text")]
    pub data_hash_camel: Option<String>,
}

impl ChainAlert {
    /// First non-empty of `data_hash` and `dataHash`.
    pub fn hash(&self) -> &str {
        [&self.data_hash, &self.data_hash_camel]
            .into_iter()
            .filter_map(|h| h.as_deref())
            .find(|h| !h.is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temp: Option<f64>, door: Option<&str>) -> Reading {
        Reading {
            temperature_c: temp,
            door_state: door.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(reading(Some(9.0), None).alerts(), vec![AlertKind::HighTemp]);
        assert_eq!(reading(Some(-6.0), None).alerts(), vec![AlertKind::LowTemp]);
        assert!(reading(Some(8.0), None).alerts().is_empty());
        assert!(reading(Some(-5.0), None).alerts().is_empty());
        assert!(reading(None, None).alerts().is_empty());
    }

    #[test]
    fn door_must_be_exactly_open() {
        assert_eq!(
            reading(Some(4.0), Some("open")).alerts(),
            vec![AlertKind::DoorOpen]
        );
        assert!(reading(Some(4.0), Some("OPEN")).alerts().is_empty());
        assert!(reading(Some(4.0), Some("closed")).alerts().is_empty());
    }

    #[test]
    fn device_without_latest_decodes() {
        let devices: Vec<Device> =
            serde_json::from_str(r#"[{"device_id":"a"},{"device_id":"b","latest":null}]"#)
                .unwrap();
        assert!(devices.iter().all(|d| d.latest.is_none()));
    }

    #[test]
    fn history_ignores_extra_fields() {
        let h: Vec<HistoryPoint> = serde_json::from_str(
            r#"[{"device_id":"x","timestamp":"2024-05-01T10:00:00Z","temperature_c":4.5,"humidity_percent":71,"door_state":"closed"}]"#,
        )
        .unwrap();
        assert_eq!(h[0].temperature_c, Some(4.5));
        assert_eq!(h[0].humidity_percent, Some(71.0));
    }

    #[test]
    fn loose_history_values_decode() {
        let h: Vec<HistoryPoint> = serde_json::from_str(
            r#"[
                {"timestamp":"2024-05-01T10:00:00Z","temperature_c":"9.5","humidity_percent":null},
                {"timestamp":null,"temperature_c":true,"humidity_percent":"n/a"},
                {"temperature_c":3}
            ]"#,
        )
        .unwrap();
        assert_eq!(h[0].temperature_c, Some(9.5));
        assert_eq!(h[0].humidity_percent, None);
        assert_eq!(h[1].timestamp, "");
        assert_eq!(h[1].temperature_c, None);
        assert_eq!(h[1].humidity_percent, None);
        assert_eq!(h[2].timestamp, "");
    }

    #[test]
    fn loose_reading_still_raises_alerts() {
        let r: Reading = serde_json::from_str(
            r#"{"temperature_c":"9.5","humidity_percent":" 70 ","battery_voltage":null,"door_state":true}"#,
        )
        .unwrap();
        assert_eq!(r.temperature_c, Some(9.5));
        assert_eq!(r.humidity_percent, Some(70.0));
        assert_eq!(r.battery_voltage, None);
        assert_eq!(r.door_state.as_deref(), Some("true"));
        assert_eq!(r.alerts(), vec![AlertKind::HighTemp]);
    }

    #[test]
    fn alert_timestamp_accepts_any_scalar() {
        let show = |json: &str| {
            serde_json::from_str::<ChainAlert>(json)
                .unwrap()
                .timestamp
                .to_string()
        };
        assert_eq!(show(r#"{"timestamp":1714557600.5}"#), "1714557600.5");
        assert_eq!(show(r#"{"timestamp":null}"#), "");
        assert_eq!(show(r#"{"timestamp":false}"#), "false");

        let a: ChainAlert =
            serde_json::from_str(r#"{"device_id":null,"alert_type":7,"tx_hash":null}"#).unwrap();
        assert_eq!(a.device_id, "");
        assert_eq!(a.alert_type, "7");
        assert_eq!(a.tx_hash, None);
    }

    #[test]
    fn alert_hash_falls_back_to_camel_case() {
        let a: ChainAlert = serde_json::from_str(
            r#"{"alert_type":"HIGH_TEMP","device_id":"d1","timestamp":"t","dataHash":"abc"}"#,
        )
        .unwrap();
        assert_eq!(a.hash(), "abc");

        let b: ChainAlert = serde_json::from_str(
            r#"{"alert_type":"HIGH_TEMP","device_id":"d1","timestamp":1714557600,"data_hash":"","dataHash":"def"}"#,
        )
        .unwrap();
        assert_eq!(b.hash(), "def");
        assert_eq!(b.timestamp.to_string(), "1714557600");

        let c: ChainAlert = serde_json::from_str(r#"{"alert_type":"DOOR_OPEN"}"#).unwrap();
        assert_eq!(c.hash(), "");
    }
}
