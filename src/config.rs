use dioxus::logger::tracing::warn;

/// Dashboard cadence.
pub const REFRESH_INTERVAL_MS: u32 = 5_000;

pub const EXPLORER_TX_BASE: &str = "https://sepolia.etherscan.io/tx/";

#[cfg(feature = "desktop")]
pub const DEFAULT_ORIGIN: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_root: String,
    pub refresh_interval_ms: u32,
}

impl DashboardConfig {
    pub fn from_origin(origin: &str) -> Self {
        let config = Self {
            api_root: format!("{}/api", origin.trim_end_matches('/')),
            refresh_interval_ms: REFRESH_INTERVAL_MS,
        };
        if !config.has_absolute_root() {
            warn!(
                "[config] origin {:?} has no scheme; API root {:?} is relative and every request will fail",
                origin, config.api_root
            );
        }
        config
    }

    /// The HTTP client only accepts absolute URLs.
    pub fn has_absolute_root(&self) -> bool {
        self.api_root.contains("://")
    }

    /// The API lives next to the page that served the bundle.
    #[cfg(feature = "web")]
    pub fn resolve() -> Self {
        let origin = page_origin().unwrap_or_else(|| {
            warn!("[config] window.location.origin unavailable");
            String::new()
        });
        Self::from_origin(&origin)
    }

    #[cfg(all(feature = "desktop", not(feature = "web")))]
    pub fn resolve() -> Self {
        dotenvy::dotenv().ok();
        let origin =
            std::env::var("COLDCHAIN_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
        Self::from_origin(&origin)
    }

    // Relative root; only useful for server-side prerendering.
    #[cfg(not(any(feature = "web", feature = "desktop")))]
    pub fn resolve() -> Self {
        Self::from_origin("")
    }
}

#[cfg(feature = "web")]
fn page_origin() -> Option<String> {
    use js_sys::{global, Reflect};
    use wasm_bindgen::JsValue;

    let location = Reflect::get(&global(), &JsValue::from_str("location")).ok()?;
    Reflect::get(&location, &JsValue::from_str("origin"))
        .ok()?
        .as_string()
}
