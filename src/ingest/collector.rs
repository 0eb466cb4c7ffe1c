use std::time::Duration;

use axum::body::Bytes;
use reqwest::{Client, StatusCode};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{config::SyncConfig, ingest::feed::decode_feed, services::ProductService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Fetching,
    Decoding,
    Saving,
    Cancelled,
}

/// How a single tick ended. Every failure waits for the next tick; nothing is retried early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Saved(usize),
    Empty,
    FetchFailed,
    BadStatus(StatusCode),
    DecodeFailed,
    SaveFailed,
    Cancelled,
}

/// Pulls the external feed on a fixed interval and writes each snapshot as one batch.
pub struct CatalogCollector {
    client: Client,
    feed_url: String,
    interval: Duration,
    products: ProductService,
    state: watch::Sender<JobState>,
}

impl CatalogCollector {
    pub fn new(config: &SyncConfig, products: ProductService) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let (state, _) = watch::channel(JobState::Idle);
        Ok(Self {
            client,
            feed_url: config.feed_url.clone(),
            interval: config.interval,
            products,
            state,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Ticks every `interval` (first tick one interval after start) until `shutdown` fires.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(feed = %self.feed_url, interval_secs = self.interval.as_secs(), "catalog sync started");

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick(&shutdown).await;
                }
            }
        }

        self.set_state(JobState::Cancelled);
        info!("catalog sync stopped");
    }

    /// Runs one fetch-decode-save pass. A save that has started is never
    /// interrupted; cancellation is honoured only before it.
    #[tracing::instrument(skip_all, fields(op = "collector.tick"))]
    pub async fn tick(&self, shutdown: &CancellationToken) -> TickOutcome {
        info!("collecting products");
        self.set_state(JobState::Fetching);

        let fetched = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return self.cancelled(),
            fetched = self.fetch() => fetched,
        };
        let body = match fetched {
            Ok(body) => body,
            Err(outcome) => return self.finish(outcome),
        };

        if shutdown.is_cancelled() {
            return self.cancelled();
        }

        self.set_state(JobState::Decoding);
        let products = match decode_feed(&body) {
            Ok(products) => products,
            Err(err) => {
                error!(error = %err, "failed to decode feed");
                return self.finish(TickOutcome::DecodeFailed);
            }
        };

        if products.is_empty() {
            info!("feed is empty, nothing to save");
            return self.finish(TickOutcome::Empty);
        }

        if shutdown.is_cancelled() {
            return self.cancelled();
        }

        self.set_state(JobState::Saving);
        let outcome = match self.products.add_products(&products).await {
            Ok(()) => {
                info!(count = products.len(), "products collected");
                TickOutcome::Saved(products.len())
            }
            Err(err) => {
                error!(error = %err, "failed to save products from feed");
                TickOutcome::SaveFailed
            }
        };
        self.finish(outcome)
    }

    async fn fetch(&self) -> Result<Bytes, TickOutcome> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "feed request failed");
                TickOutcome::FetchFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "feed returned an error status");
            return Err(TickOutcome::BadStatus(status));
        }

        response.bytes().await.map_err(|err| {
            error!(error = %err, "failed to read feed body");
            TickOutcome::FetchFailed
        })
    }

    fn finish(&self, outcome: TickOutcome) -> TickOutcome {
        self.set_state(JobState::Idle);
        outcome
    }

    fn cancelled(&self) -> TickOutcome {
        warn!("tick abandoned, shutdown requested");
        self.set_state(JobState::Cancelled);
        TickOutcome::Cancelled
    }

    fn set_state(&self, next: JobState) {
        self.state.send_replace(next);
    }
}
