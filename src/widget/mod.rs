pub mod target;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::market_data::source::MarketDataSource;
use crate::metrics::prometheus::{record_fetch_latency, record_refresh};
use crate::render::{render_error, render_loading, render_snapshot};
use target::RenderTarget;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Loading,
    Rendered,
    Errored,
}

impl WidgetState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => WidgetState::Loading,
            2 => WidgetState::Rendered,
            3 => WidgetState::Errored,
            _ => WidgetState::Idle,
        }
    }
}

/// What a single `refresh` did. Informational only: failures have already
/// been rendered and logged by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered { commodities: usize },
    Errored,
    Unmounted,
}

impl RefreshOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RefreshOutcome::Rendered { .. } => "rendered",
            RefreshOutcome::Errored => "errored",
            RefreshOutcome::Unmounted => "unmounted",
        }
    }
}

/// Polls a [`MarketDataSource`] and mirrors each snapshot into a
/// [`RenderTarget`].
///
/// Clones share the same source, target and lifecycle state.
#[derive(Clone)]
pub struct MarketDataWidget {
    source: Arc<dyn MarketDataSource>,
    target: Option<Arc<dyn RenderTarget>>,
    refresh_interval: Duration,
    state: Arc<AtomicU8>,
}

impl MarketDataWidget {
    /// `target` is `None` when the host has no container for the widget;
    /// the widget then stays inert instead of failing.
    pub fn new(source: Arc<dyn MarketDataSource>, target: Option<Arc<dyn RenderTarget>>) -> Self {
        Self {
            source,
            target,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            state: Arc::new(AtomicU8::new(WidgetState::Idle as u8)),
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!(default_secs = DEFAULT_REFRESH_INTERVAL.as_secs(), "zero refresh interval, keeping default");
        } else {
            self.refresh_interval = interval;
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Reflects the most recent transition. With overlapping cycles an older
    /// request finishing reports `Rendered`/`Errored` even while a newer one
    /// is still pending.
    pub fn state(&self) -> WidgetState {
        WidgetState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: WidgetState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Checks that a render target was provided. Absence is logged, not fatal.
    pub fn initialize(&self) -> bool {
        if self.target.is_none() {
            warn!(source = self.source.name(), "market data render target not found");
            return false;
        }
        debug!(source = self.source.name(), "market data widget mounted");
        true
    }

    /// One fetch-and-render cycle. Never fails: errors end up as the error
    /// markup in the target and a log line.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(target) = self.target.as_deref() else {
            warn!(source = self.source.name(), "market data render target not found, skipping refresh");
            record_refresh(RefreshOutcome::Unmounted.label());
            return RefreshOutcome::Unmounted;
        };

        // Placeholder only until something real has been shown
        let first_cycle = self
            .state
            .compare_exchange(
                WidgetState::Idle as u8,
                WidgetState::Loading as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if first_cycle {
            target.replace_contents(&render_loading());
        } else {
            self.set_state(WidgetState::Loading);
        }

        debug!(source = self.source.name(), "fetching market data");
        let started = Instant::now();
        let result = self.source.fetch().await;
        record_fetch_latency(self.source.name(), started.elapsed().as_secs_f64() * 1_000.0);

        let outcome = match result {
            Ok(snapshot) => {
                target.replace_contents(&render_snapshot(&snapshot));
                self.set_state(WidgetState::Rendered);
                debug!(commodities = snapshot.len(), "market data rendered");
                RefreshOutcome::Rendered { commodities: snapshot.len() }
            }
            Err(err) => {
                warn!(source = self.source.name(), error = %err, "error fetching market data");
                target.replace_contents(&render_error());
                self.set_state(WidgetState::Errored);
                RefreshOutcome::Errored
            }
        };

        record_refresh(outcome.label());
        outcome
    }

    /// Refreshes right away, then once per refresh interval until the
    /// returned handle is stopped or dropped. Must be called from within a
    /// tokio runtime.
    pub fn start(&self) -> WidgetHandle {
        info!(
            source = self.source.name(),
            interval_secs = self.refresh_interval.as_secs_f64(),
            "market data widget starting"
        );
        WidgetHandle {
            task: tokio::spawn(run_ticker(self.clone())),
        }
    }
}

/// Each tick spawns its own refresh: a slow request never holds back the
/// next tick, and whichever finishes last owns the target.
async fn run_ticker(widget: MarketDataWidget) {
    let mut ticker = time::interval(widget.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            // First tick completes immediately
            _ = ticker.tick() => {
                let widget = widget.clone();
                in_flight.spawn(async move { widget.refresh().await });
            }
            Some(res) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = res {
                    if err.is_panic() {
                        warn!(error = %err, "market data refresh panicked");
                    }
                }
            }
        }
    }
}

/// Lifecycle of a started widget. Stopping (or dropping) the handle cancels
/// the timer and every refresh still in flight.
#[derive(Debug)]
pub struct WidgetHandle {
    task: JoinHandle<()>,
}

impl WidgetHandle {
    pub fn stop(&self) {
        if !self.task.is_finished() {
            info!("market data widget stopping");
        }
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
