use dioxus::prelude::*;

mod api;
mod app;
mod components;
mod config;
mod dashboard;
mod scheduler;
mod shared;
mod utils;

#[cfg(feature = "desktop")]
mod sensor;

pub const FAVICON: Asset = asset!("/assets/favicon.svg");
pub const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

#[cfg(feature = "desktop")]
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=off,reqwest=off"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() {
    #[cfg(feature = "desktop")]
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "mock-sensor" {
                init_tracing();
                let device_id = args
                    .next()
                    .unwrap_or_else(|| sensor::DEFAULT_DEVICE_ID.to_string());
                let config = config::DashboardConfig::resolve();
                let rt = tokio::runtime::Runtime::new().expect("rt");
                if let Err(e) = rt.block_on(sensor::run(config, device_id)) {
                    eprintln!("mock-sensor: {e:#}");
                    std::process::exit(1);
                }
                return;
            }
            eprintln!("unknown command: {cmd} (expected: mock-sensor [device_id])");
            std::process::exit(2);
        }
    }
    dioxus::launch(app::App);
}
