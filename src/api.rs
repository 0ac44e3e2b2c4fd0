use anyhow::{anyhow, Context, Result};
use dioxus::logger::tracing::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::DashboardConfig;
use crate::shared::types::{AskRequest, ChainAlert, Device, HistoryPoint};

pub const HISTORY_PATH: &str = "/history";
pub const DEVICES_PATH: &str = "/devices";
pub const CHAIN_ALERTS_PATH: &str = "/blockchain/alerts";
pub const AI_PATH: &str = "/ai";

/// Status and raw body of a finished request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The HTTP seam. Paths are relative to the API root.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, path: &str) -> Result<HttpReply>;
    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    api_root: String,
}

impl ReqwestTransport {
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_root: api_root.into(),
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder, what: &str) -> Result<HttpReply> {
        let res = req
            .header("Cache-Control", "no-store")
            .send()
            .await
            .with_context(|| format!("sending {what}"))?;
        let status = res.status().as_u16();
        let body = res
            .bytes()
            .await
            .with_context(|| format!("reading body from {what}"))?;
        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, path: &str) -> Result<HttpReply> {
        let url = format!("{}{}", self.api_root, path);
        debug!("[api] GET {}", url);
        self.send(self.client.get(&url), &format!("GET {url}")).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<HttpReply> {
        let url = format!("{}{}", self.api_root, path);
        debug!("[api] POST {}", url);
        self.send(self.client.post(&url).json(body), &format!("POST {url}"))
            .await
    }
}

fn decode<T: DeserializeOwned>(what: &str, reply: &HttpReply) -> Result<T> {
    serde_json::from_slice(&reply.body).map_err(|e| {
        let snip = String::from_utf8_lossy(&reply.body);
        let snip = snip.chars().take(300).collect::<String>();
        anyhow!(
            "decoding JSON from {} (status {}) failed: {}\nBody snippet: {}",
            what,
            reply.status,
            e,
            snip
        )
    })
}

/// Picks what the answer box shows: a truthy `answer` as-is, otherwise the
/// whole response serialized.
pub fn answer_text(response: &Value) -> String {
    match response.get("answer") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(v @ (Value::Array(_) | Value::Object(_))) => v.to_string(),
        _ => response.to_string(),
    }
}

/// Typed client over the four dashboard endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(ReqwestTransport::new(config.api_root.clone()))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // Status is not checked; a non-array body fails to decode instead.
    pub async fn history(&self) -> Result<Vec<HistoryPoint>> {
        let reply = self.transport.get(HISTORY_PATH).await?;
        decode(HISTORY_PATH, &reply)
    }

    pub async fn devices(&self) -> Result<Vec<Device>> {
        let reply = self.transport.get(DEVICES_PATH).await?;
        decode(DEVICES_PATH, &reply)
    }

    /// Any non-200 reply degrades to an empty list.
    pub async fn chain_alerts(&self) -> Result<Vec<ChainAlert>> {
        let reply = self.transport.get(CHAIN_ALERTS_PATH).await?;
        if reply.status != 200 {
            debug!(
                "[api] chain alerts unavailable (status {}); showing none",
                reply.status
            );
            return Ok(vec![]);
        }
        decode(CHAIN_ALERTS_PATH, &reply)
    }

    /// Returns `None` without touching the network when `question` is empty.
    pub async fn ask(&self, question: &str) -> Result<Option<String>> {
        if question.is_empty() {
            return Ok(None);
        }
        let body = serde_json::to_value(AskRequest {
            question: question.to_string(),
        })?;
        let reply = self.transport.post_json(AI_PATH, &body).await?;
        let response: Value = decode(AI_PATH, &reply)?;
        Ok(Some(answer_text(&response)))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn chain_alerts_server_error_is_empty() {
        let api = ApiClient::new(FakeTransport::default().reply(
            CHAIN_ALERTS_PATH,
            500,
            r#"{"status":"error","message":"blockchain not configured"}"#,
        ));
        assert!(api.chain_alerts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chain_alerts_decode_on_ok() {
        let api = ApiClient::new(FakeTransport::default().reply(
            CHAIN_ALERTS_PATH,
            200,
            r#"[{"index":0,"device_id":"d1","alert_type":"LOW_TEMP","timestamp":"2024-05-01T10:00:00Z","data_hash":"aa"}]"#,
        ));
        let alerts = api.chain_alerts().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, "LOW_TEMP");
    }

    #[tokio::test]
    async fn history_error_body_fails_to_decode() {
        let api = ApiClient::new(FakeTransport::default().reply(
            HISTORY_PATH,
            500,
            "<html>Internal Server Error</html>",
        ));
        let err = api.history().await.unwrap_err().to_string();
        assert!(err.contains("/history"), "{err}");
        assert!(err.contains("status 500"), "{err}");
    }

    #[tokio::test]
    async fn empty_question_makes_no_request() {
        let api = ApiClient::new(FakeTransport::default());
        assert_eq!(api.ask("").await.unwrap(), None);
        assert!(api.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn ask_posts_question_and_returns_answer() {
        let api = ApiClient::new(FakeTransport::default().reply(AI_PATH, 200, r#"{"answer":"y"}"#));
        assert_eq!(api.ask("x").await.unwrap().as_deref(), Some("y"));
        assert_eq!(api.transport().calls(), vec!["POST /ai".to_string()]);
        assert_eq!(
            api.transport().posted.borrow()[0],
            json!({ "question": "x" })
        );
    }

    #[tokio::test]
    async fn ask_without_answer_shows_raw_json() {
        let api = ApiClient::new(FakeTransport::default().reply(AI_PATH, 200, "{}"));
        assert_eq!(api.ask("x").await.unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn answer_text_follows_truthiness() {
        assert_eq!(answer_text(&json!({"answer": ""})), r#"{"answer":""}"#);
        assert_eq!(answer_text(&json!({"answer": null})), r#"{"answer":null}"#);
        assert_eq!(answer_text(&json!({"answer": 0})), r#"{"answer":0}"#);
        assert_eq!(answer_text(&json!({"answer": 42})), "42");
        // insertion order is kept
        assert_eq!(
            answer_text(&json!({"status": "error", "message": "no question provided"})),
            r#"{"status":"error","message":"no question provided"}"#
        );
    }
}
