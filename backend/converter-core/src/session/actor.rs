use super::{ActorMessage, SessionCommand};
use crate::catalog::load_catalog;
use crate::conversion::{ConversionState, CurrencyPair, fetch_rate};
use crate::error::FetchError;
use crate::rates_client::RatesClient;

use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

struct RateRequest {
    generation: u64,
    pair: CurrencyPair,
    task: JoinHandle<()>,
}

/// Owns the session state and processes messages sequentially.
pub(crate) struct SessionActor {
    session_id: Uuid,
    client: RatesClient,
    // Weak so the channel closes once every handle is dropped
    message_tx: mpsc::WeakSender<ActorMessage>,
    state_tx: watch::Sender<ConversionState>,
    state: ConversionState,
    catalog_pending: bool,
    rate_request: Option<RateRequest>,
    next_generation: u64,
}

impl SessionActor {
    pub(crate) fn new(
        session_id: Uuid,
        client: RatesClient,
        message_tx: mpsc::WeakSender<ActorMessage>,
        state_tx: watch::Sender<ConversionState>,
    ) -> Self {
        Self {
            session_id,
            client,
            message_tx,
            state_tx,
            state: ConversionState::new(),
            catalog_pending: false,
            rate_request: None,
            next_generation: 0,
        }
    }

    pub(super) async fn run(mut self, mut message_rx: mpsc::Receiver<ActorMessage>) {
        info!("Session actor {} started", self.session_id);

        self.start_catalog_load();
        self.publish();

        while let Some(message) = message_rx.recv().await {
            let ack = self.handle(message);
            self.publish();
            if let Some(ack) = ack {
                // Caller stopped waiting
                let _ = ack.send(());
            }
        }

        if let Some(request) = self.rate_request.take() {
            request.task.abort();
        }
        info!("Session actor {} stopped", self.session_id);
    }

    /// Apply one message. Returns the acknowledgement to send once the
    /// resulting state is published.
    pub(crate) fn handle(&mut self, message: ActorMessage) -> Option<oneshot::Sender<()>> {
        match message {
            ActorMessage::Command { cmd, ack } => {
                self.handle_command(cmd);
                return Some(ack);
            }
            ActorMessage::CatalogLoaded(result) => {
                self.catalog_pending = false;
                match result {
                    Ok(catalog) => {
                        if let Some(pair) = self.state.apply_catalog(catalog) {
                            self.start_rate_refresh(pair);
                        }
                    }
                    Err(e) => {
                        warn!("Catalog load failed: {e}");
                        self.state.record_error(&e);
                    }
                }
            }
            ActorMessage::RateFetched {
                generation,
                pair,
                result,
            } => self.handle_rate(generation, pair, result),
        }
        None
    }

    fn handle_command(&mut self, cmd: SessionCommand) {
        debug!("Session {} command: {cmd:?}", self.session_id);

        let changed_pair = match cmd {
            SessionCommand::SetFromAmount(raw) => {
                self.state.set_from_amount(&raw);
                None
            }
            SessionCommand::SetToAmount(raw) => {
                self.state.set_to_amount(&raw);
                None
            }
            SessionCommand::SetFromCurrency(code) => self.state.set_from_currency(code),
            SessionCommand::SetToCurrency(code) => self.state.set_to_currency(code),
            SessionCommand::Swap => self.state.swap(),
        };

        if let Some(pair) = changed_pair {
            self.start_rate_refresh(pair);
        }
    }

    fn handle_rate(
        &mut self,
        generation: u64,
        pair: CurrencyPair,
        result: Result<f64, FetchError>,
    ) {
        let is_current = self
            .rate_request
            .as_ref()
            .is_some_and(|request| request.generation == generation);

        if !is_current {
            debug!("Discarding stale rate response for {pair} (generation {generation})");
            return;
        }
        self.rate_request = None;

        match result {
            Ok(rate) => {
                info!("Rate {pair} = {rate}");
                self.state.apply_rate(rate);
            }
            Err(e) => {
                warn!("Rate refresh for {pair} failed: {e}");
                self.state.record_error(&e);
            }
        }
    }

    fn start_catalog_load(&mut self) {
        let Some(tx) = self.message_tx.upgrade() else {
            return;
        };

        let client = self.client.clone();
        self.catalog_pending = true;
        tokio::spawn(async move {
            let result = load_catalog(&client).await;
            // Receiver gone means the session ended
            let _ = tx.send(ActorMessage::CatalogLoaded(result)).await;
        });
    }

    fn start_rate_refresh(&mut self, pair: CurrencyPair) {
        let Some(tx) = self.message_tx.upgrade() else {
            return;
        };

        if let Some(superseded) = self.rate_request.take() {
            debug!(
                "Cancelling rate request for {} (generation {})",
                superseded.pair, superseded.generation
            );
            superseded.task.abort();
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let client = self.client.clone();
        let task_pair = pair.clone();

        info!("Refreshing rate for {pair} (generation {generation})");
        let task = tokio::spawn(async move {
            let result = fetch_rate(&client, &task_pair).await;
            let _ = tx
                .send(ActorMessage::RateFetched {
                    generation,
                    pair: task_pair,
                    result,
                })
                .await;
        });

        self.rate_request = Some(RateRequest {
            generation,
            pair,
            task,
        });
    }

    pub(crate) fn publish(&mut self) {
        self.state.loading = self.catalog_pending || self.rate_request.is_some();
        self.state_tx.send_replace(self.state.clone());
    }
}
