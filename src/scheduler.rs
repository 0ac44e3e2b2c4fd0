use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;

use crate::api::{ApiClient, Transport};
use crate::dashboard::{refresh_cycle, CycleStep, Dashboard};

/// At most one refresh cycle in flight. A tick that finds the gate closed is
/// dropped rather than queued.
#[derive(Debug, Clone, Default)]
pub struct CycleGate {
    busy: Rc<Cell<bool>>,
}

impl CycleGate {
    pub fn try_begin(&self) -> Option<CycleGuard> {
        if self.busy.replace(true) {
            return None;
        }
        Some(CycleGuard {
            busy: self.busy.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// Reopens the gate when dropped, including when the cycle task is cancelled.
#[derive(Debug)]
pub struct CycleGuard {
    busy: Rc<Cell<bool>>,
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// Counter bumped every `interval_ms`. Starts at 0 so the first read doubles
/// as the startup tick. The timer is cancelled when the owning component
/// unmounts.
pub fn use_refresh_ticker(interval_ms: u32) -> Signal<u64> {
    #[allow(unused_mut)]
    let mut tick = use_signal(|| 0u64);

    #[cfg(not(any(feature = "web", feature = "desktop")))]
    let _ = interval_ms;

    #[cfg(feature = "web")]
    {
        use dioxus::logger::tracing::info;
        use gloo_timers::callback::Interval;

        let timer_handle: Signal<Option<Interval>> = use_signal(|| None);

        use_drop({
            let mut timer_handle = timer_handle.clone();
            move || {
                if let Some(h) = timer_handle.write().take() {
                    h.cancel();
                }
            }
        });

        use_effect({
            let mut timer_handle = timer_handle.clone();
            move || {
                if let Some(prev) = timer_handle.write().take() {
                    prev.cancel();
                }
                info!("[scheduler] refreshing every {} ms", interval_ms);
                let handle = Interval::new(interval_ms, move || {
                    *tick.write() += 1;
                });
                timer_handle.set(Some(handle));
            }
        });
    }

    #[cfg(all(feature = "desktop", not(feature = "web")))]
    {
        use dioxus::logger::tracing::info;

        use_future(move || async move {
            use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

            info!("[scheduler] refreshing every {} ms", interval_ms);
            let period = Duration::from_millis(interval_ms as u64);
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                *tick.write() += 1;
            }
        });
    }

    tick
}

/// Claims the gate for tick `n` and returns the cycle to run, or `None` when
/// the previous cycle still holds it. The gate is held from this call until
/// the returned future completes or is dropped.
pub fn begin_cycle<T: Transport>(
    gate: &CycleGate,
    api: ApiClient<T>,
    n: u64,
    apply: impl FnMut(CycleStep),
) -> Option<impl Future<Output = ()>> {
    let Some(guard) = gate.try_begin() else {
        debug!("[refresh] tick {} skipped; previous cycle still running", n);
        return None;
    };
    Some(async move {
        let _guard = guard;
        match refresh_cycle(&api, apply).await {
            Ok(()) => debug!("[refresh] cycle {} complete", n),
            Err(e) => warn!("[refresh] cycle {} failed: {:#}", n, e),
        }
    })
}

/// Runs a refresh cycle at startup and on every tick, applying each fetched
/// resource to `dashboard` as it lands.
pub fn use_refresh_loop(mut dashboard: Signal<Dashboard>, api: ApiClient, interval_ms: u32) {
    let gate = use_hook(CycleGate::default);
    let tick = use_refresh_ticker(interval_ms);

    use_effect(move || {
        let n = *tick.read();
        if let Some(cycle) = begin_cycle(&gate, api.clone(), n, move |step| {
            dashboard.write().apply(step)
        }) {
            spawn(cycle);
        }
    });
}
