//! Wall-Clock Driver Tests
//!
//! Runs on tokio's paused clock, so the full sequence takes no real time.

#![cfg(feature = "realtime")]

use std::time::Duration;

use tokio::sync::mpsc;

use greeting_card::config::CardConfig;
use greeting_card::engine::{SequenceState, OPEN_FINAL};
use greeting_card::input::{InputEvent, Key};
use greeting_card::runtime::run_realtime;
use greeting_card::scene::{ElementId, Scene};
use greeting_card::timeline::CardEvent;
use greeting_card::GreetingCard;

fn card() -> GreetingCard {
    let config = CardConfig {
        seed: Some(5),
        ..CardConfig::default()
    };
    GreetingCard::new(config, Scene::full()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_sequence_runs_in_wall_time() {
    let mut card = card();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(InputEvent::click(ElementId::OpenControl)).unwrap();
    drop(tx);

    let mut seen = Vec::new();
    run_realtime(&mut card, rx, Duration::from_secs(21), |entry| {
        seen.push(entry.clone())
    })
    .await;

    assert_eq!(card.sequence_state(), SequenceState::Finished);
    assert!(card.scene().has_class(ElementId::Card, OPEN_FINAL));
    assert_eq!(card.now(), Duration::from_secs(21));
    assert_eq!(seen.len(), card.timeline().len());

    let periodic: Vec<u64> = seen
        .iter()
        .filter(|e| matches!(e.event, CardEvent::Burst { requested: 12, .. }))
        .map(|e| e.at_ms)
        .collect();
    assert_eq!(periodic, vec![11860, 20860]);
}

#[tokio::test(start_paused = true)]
async fn test_input_arrives_while_waiting() {
    let mut card = card();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(InputEvent::click(ElementId::OpenControl)).unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(2000)).await;
        tx.send(InputEvent::key(None, Key::Escape)).unwrap();
    });

    run_realtime(&mut card, rx, Duration::from_secs(4), |_| {}).await;

    assert_eq!(card.sequence_state(), SequenceState::Finished);
    assert!(!card.audio().unwrap().is_playing());
    let paused_at = card
        .timeline()
        .first_at(|e| matches!(e, CardEvent::EscapePaused))
        .unwrap();
    assert!((2000..2100).contains(&paused_at), "paused at {}", paused_at);
}

#[tokio::test(start_paused = true)]
async fn test_no_input_no_sequence() {
    let mut card = card();
    let (tx, rx) = mpsc::unbounded_channel::<InputEvent>();
    drop(tx);

    run_realtime(&mut card, rx, Duration::from_secs(10), |_| {}).await;

    assert_eq!(card.sequence_state(), SequenceState::Idle);
    assert!(card.timeline().is_empty());
}
