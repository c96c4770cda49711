//! Wall-clock driver
//!
//! Runs a card on a tokio event loop: the loop sleeps until the card's
//! next timer, wakes early for user input, and maps elapsed wall time onto
//! the card's virtual clock. Everything runs on one task, so the card is
//! never touched concurrently.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::card::GreetingCard;
use crate::input::InputEvent;
use crate::timeline::TimelineEntry;

/// Drive `card` in wall time until its clock reads `limit`.
///
/// Inputs received on `inputs` are dispatched as they arrive; the channel
/// closing just means no more input. `on_event` sees every new timeline
/// entry once, in order.
pub async fn run_realtime<F>(
    card: &mut GreetingCard,
    mut inputs: mpsc::UnboundedReceiver<InputEvent>,
    limit: Duration,
    mut on_event: F,
) where
    F: FnMut(&TimelineEntry),
{
    let start = Instant::now() - card.now();
    let end = start + limit;
    let mut inputs_open = true;
    let mut reported = card.timeline().len();

    loop {
        let wake = card
            .next_deadline()
            .map(|deadline| start + deadline)
            .unwrap_or(end)
            .min(end);

        tokio::select! {
            received = inputs.recv(), if inputs_open => match received {
                Some(event) => {
                    card.advance_to(Instant::now().duration_since(start));
                    card.handle_input(event);
                }
                None => {
                    debug!("[REALTIME] Input channel closed");
                    inputs_open = false;
                }
            },
            _ = sleep_until(wake) => {
                card.advance_to(wake.duration_since(start));
            }
        }

        for entry in &card.timeline().entries()[reported..] {
            on_event(entry);
        }
        reported = card.timeline().len();

        if Instant::now() >= end {
            break;
        }
    }

    card.advance_to(limit);
    for entry in &card.timeline().entries()[reported..] {
        on_event(entry);
    }
}
