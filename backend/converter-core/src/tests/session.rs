// Unit tests for the session actor's message handling

use crate::conversion::{ConversionState, CurrencyPair};
use crate::rates_client::RatesClient;
use crate::session::actor::SessionActor;
use crate::session::{ActorMessage, SessionCommand};

use common::CurrencyCode;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

// Nothing listens here; spawned fetches fail without reaching the network
const UNREACHABLE_API_BASE: &str = "http://127.0.0.1:9/";

fn code(raw: &str) -> CurrencyCode {
    CurrencyCode::parse(raw).unwrap()
}

fn command(cmd: SessionCommand) -> ActorMessage {
    let (ack, _ack_rx) = oneshot::channel();
    ActorMessage::Command { cmd, ack }
}

struct ActorFixture {
    actor: SessionActor,
    state_rx: watch::Receiver<ConversionState>,
    // Keeps the weak sender upgradable so rate refreshes are issued
    _message_tx: mpsc::Sender<ActorMessage>,
    _message_rx: mpsc::Receiver<ActorMessage>,
}

fn actor_fixture() -> ActorFixture {
    let client = RatesClient::new(UNREACHABLE_API_BASE, Duration::from_millis(200)).unwrap();
    let (message_tx, message_rx) = mpsc::channel(16);
    let (state_tx, state_rx) = watch::channel(ConversionState::new());
    let actor = SessionActor::new(Uuid::new_v4(), client, message_tx.downgrade(), state_tx);

    ActorFixture {
        actor,
        state_rx,
        _message_tx: message_tx,
        _message_rx: message_rx,
    }
}

fn apply(fixture: &mut ActorFixture, message: ActorMessage) -> ConversionState {
    fixture.actor.handle(message);
    fixture.actor.publish();
    fixture.state_rx.borrow().clone()
}

/// **VALUE**: Verifies a rate completion from a superseded request is dropped
/// even when it reaches the actor.
///
/// **WHY THIS MATTERS**: Aborting the old task does not help once its reply is
/// already queued. The generation check is the only thing standing between a
/// slow reply for the old pair and the rate shown for the new one.
///
/// **BUG THIS CATCHES**: Would catch the actor applying any `RateFetched`
/// regardless of generation, or clearing the outstanding request (and
/// `loading`) on a stale reply.
#[tokio::test]
async fn given_superseded_generation_when_rate_arrives_then_rate_and_loading_unchanged() {
    // GIVEN: Pair usd -> eur (generation 1), then swapped (generation 2)
    let mut fixture = actor_fixture();
    apply(&mut fixture, command(SessionCommand::SetFromCurrency(code("usd"))));
    apply(&mut fixture, command(SessionCommand::SetToCurrency(code("eur"))));
    let state = apply(&mut fixture, command(SessionCommand::Swap));
    assert!(state.loading);

    // WHEN: The generation 1 reply lands after the swap
    let state = apply(
        &mut fixture,
        ActorMessage::RateFetched {
            generation: 1,
            pair: CurrencyPair::new(code("usd"), code("eur")),
            result: Ok(0.92),
        },
    );

    // THEN: It is discarded and the swapped request is still outstanding
    assert_eq!(state.exchange_rate, 1.0);
    assert!(state.loading);

    // WHEN: The generation 2 reply lands
    let state = apply(
        &mut fixture,
        ActorMessage::RateFetched {
            generation: 2,
            pair: CurrencyPair::new(code("eur"), code("usd")),
            result: Ok(1.087),
        },
    );

    // THEN: It is applied and nothing is in flight
    assert_eq!(state.exchange_rate, 1.087);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

/// **VALUE**: Verifies commands hand back their acknowledgement and rate
/// completions do not.
///
/// **BUG THIS CATCHES**: Would catch a handle waiting forever because the
/// actor dropped the acknowledgement of a command it applied.
#[tokio::test]
async fn given_command_when_handled_then_acknowledgement_returned() {
    let mut fixture = actor_fixture();

    let ack = fixture
        .actor
        .handle(command(SessionCommand::SetFromAmount("10".to_string())));
    let rate_ack = fixture.actor.handle(ActorMessage::RateFetched {
        generation: 7,
        pair: CurrencyPair::new(code("usd"), code("eur")),
        result: Ok(0.5),
    });

    assert!(ack.is_some());
    assert!(rate_ack.is_none());
}
