//! Conversion session using the actor pattern.
//!
//! A session owns one [`ConversionState`]. All mutations go through a
//! dedicated task:
//! - User input arrives as [`SessionCommand`]s over an mpsc channel
//! - Catalog and rate fetches run in their own tasks and report back on the
//!   same channel
//! - Each processed message publishes a state snapshot on a `watch` channel,
//!   so reads never wait on the actor
//! - A command is acknowledged only after its state has been published, so a
//!   caller that awaited [`ConverterHandle::update`] reads its own write
//!
//! Rate requests are tagged with a generation number. A response whose
//! generation is no longer current is dropped, so a slow reply for an old
//! pair can never overwrite the rate of the pair now selected.

pub(crate) mod actor;

use crate::catalog::CurrencyCatalog;
use crate::conversion::{ConversionState, CurrencyPair};
use crate::error::FetchError;
use crate::error::session::SessionError;
use crate::rates_client::RatesClient;

use common::{CurrencyCode, ErrorLocation};

use std::panic::Location;

use log::info;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

const COMMAND_CHANNEL_CAPACITY: usize = 100;

/// User-initiated state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SetFromAmount(String),
    SetToAmount(String),
    SetFromCurrency(CurrencyCode),
    SetToCurrency(CurrencyCode),
    Swap,
}

/// Everything the actor consumes: user commands plus fetch completions.
#[derive(Debug)]
pub(crate) enum ActorMessage {
    Command {
        cmd: SessionCommand,
        ack: oneshot::Sender<()>,
    },
    CatalogLoaded(Result<CurrencyCatalog, FetchError>),
    RateFetched {
        generation: u64,
        pair: CurrencyPair,
        result: Result<f64, FetchError>,
    },
}

/// Read model for a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionView {
    pub from_amount: f64,
    pub to_amount: f64,
    pub from_currency: Option<CurrencyCode>,
    pub to_currency: Option<CurrencyCode>,
    pub exchange_rate: f64,
    pub loading: bool,
    pub error: Option<String>,
    pub currency_options: Vec<CurrencyCode>,
    pub summary: String,
}

impl From<&ConversionState> for ConversionView {
    fn from(state: &ConversionState) -> Self {
        let amounts = state.amounts();
        Self {
            from_amount: amounts.from_amount,
            to_amount: amounts.to_amount,
            from_currency: state.from_currency.clone(),
            to_currency: state.to_currency.clone(),
            exchange_rate: state.exchange_rate,
            loading: state.loading,
            error: state.error.clone(),
            currency_options: state.currency_options().to_vec(),
            summary: state.summary(),
        }
    }
}

/// Handle to a running session.
///
/// Cheap to clone; all clones drive the same session. The actor stops once
/// every handle is dropped and no fetch is outstanding.
#[derive(Clone)]
pub struct ConverterHandle {
    session_id: Uuid,
    command_tx: mpsc::Sender<ActorMessage>,
    state_rx: watch::Receiver<ConversionState>,
}

/// Start a session: spawns the actor and begins loading the catalog.
///
/// Must be called from within a tokio runtime.
pub fn start_session(client: RatesClient) -> ConverterHandle {
    let session_id = Uuid::new_v4();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    // The catalog load is issued as soon as the actor runs
    let initial_state = ConversionState {
        loading: true,
        ..ConversionState::new()
    };
    let (state_tx, state_rx) = watch::channel(initial_state);

    let session_actor =
        actor::SessionActor::new(session_id, client, command_tx.downgrade(), state_tx);
    tokio::spawn(session_actor.run(command_rx));
    info!("Conversion session {session_id} started");

    ConverterHandle {
        session_id,
        command_tx,
        state_rx,
    }
}

impl ConverterHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Send a command to the session actor and wait until it is applied.
    ///
    /// On return, [`state`](Self::state) reflects the command. Fetches it
    /// triggers may still be in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ActorStopped`] if the actor is gone.
    pub async fn update(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(ActorMessage::Command { cmd, ack: ack_tx })
            .await
            .map_err(|e| SessionError::ActorStopped {
                message: format!("Session actor died: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        ack_rx.await.map_err(|_| SessionError::ActorStopped {
            message: "Session actor stopped before applying the command".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    pub async fn set_from_amount(&self, raw: impl Into<String>) -> Result<(), SessionError> {
        self.update(SessionCommand::SetFromAmount(raw.into())).await
    }

    pub async fn set_to_amount(&self, raw: impl Into<String>) -> Result<(), SessionError> {
        self.update(SessionCommand::SetToAmount(raw.into())).await
    }

    pub async fn set_from_currency(&self, code: CurrencyCode) -> Result<(), SessionError> {
        self.update(SessionCommand::SetFromCurrency(code)).await
    }

    pub async fn set_to_currency(&self, code: CurrencyCode) -> Result<(), SessionError> {
        self.update(SessionCommand::SetToCurrency(code)).await
    }

    pub async fn swap(&self) -> Result<(), SessionError> {
        self.update(SessionCommand::Swap).await
    }

    /// Latest published state.
    pub fn state(&self) -> ConversionState {
        self.state_rx.borrow().clone()
    }

    pub fn view(&self) -> ConversionView {
        ConversionView::from(&*self.state_rx.borrow())
    }

    /// Receiver notified after every processed message.
    pub fn subscribe(&self) -> watch::Receiver<ConversionState> {
        self.state_rx.clone()
    }
}
