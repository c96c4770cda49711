//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::time::Duration;

use log::info;

use super::CardArgs;
use crate::audio::SimulatedAudio;
use crate::card::GreetingCard;
use crate::config::CardConfig;
use crate::error::{CardError, Result};
use crate::input::{InputEvent, Key};
use crate::scene::{ElementId, Scene};

/// Build a card from command-line options.
pub fn build_card(args: &CardArgs) -> Result<GreetingCard> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config: {}", path.display());
            CardConfig::from_file(path)?
        }
        None => CardConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_audio {
        config.audio.enabled = false;
    }

    let mut scene = Scene::full();
    for dom_id in &args.without {
        let id = ElementId::from_dom_id(dom_id.trim()).ok_or_else(|| {
            CardError::InvalidConfig {
                reason: format!("unknown element id '{}'", dom_id),
            }
        })?;
        scene = scene.without(id);
    }

    let backend = SimulatedAudio::new(args.autoplay.into());
    GreetingCard::with_backend(config, scene, Box::new(backend))
}

/// Feed timed inputs to a card and run it until `duration`.
///
/// Inputs are dispatched at their timestamps, in timestamp order.
pub fn run_scripted(
    card: &mut GreetingCard,
    mut inputs: Vec<(Duration, InputEvent)>,
    duration: Duration,
) {
    inputs.sort_by_key(|(at, _)| *at);
    for (at, event) in inputs {
        if at > duration {
            break;
        }
        card.advance_to(at);
        card.handle_input(event);
    }
    card.advance_to(duration);
}

/// Run a card on the virtual clock and print what happened.
pub fn simulate(
    args: &CardArgs,
    seconds: f64,
    open_at_ms: u64,
    no_click: bool,
    escape_at_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let duration = parse_seconds(seconds)?;
    let mut card = build_card(args)?;

    let mut inputs = Vec::new();
    if !no_click {
        inputs.push((
            Duration::from_millis(open_at_ms),
            InputEvent::click(ElementId::OpenControl),
        ));
    }
    if let Some(at) = escape_at_ms {
        inputs.push((Duration::from_millis(at), InputEvent::key(None, Key::Escape)));
    }

    info!("Simulating {:?}", duration);
    run_scripted(&mut card, inputs, duration);

    if json {
        println!("{}", serde_json::to_string_pretty(card.timeline())?);
        return Ok(());
    }

    for entry in card.timeline().entries() {
        println!("{}", entry);
    }
    println!();
    println!("Sequence: {}", card.sequence_state());
    println!(
        "Confetti: {} live, {} spawned",
        card.particles().live_count(),
        card.particles().total_spawned()
    );
    if let Some(audio) = card.audio() {
        println!(
            "Audio: {}{}",
            if audio.is_playing() { "playing" } else { "paused" },
            if audio.is_muted() { " (muted)" } else { "" }
        );
    }

    Ok(())
}

/// Print the default configuration.
pub fn print_default_config() -> Result<()> {
    println!("{}", CardConfig::default().to_json_pretty()?);
    Ok(())
}

/// Run a card in wall time, clicking the open control straight away.
#[cfg(feature = "realtime")]
pub fn live(args: &CardArgs, seconds: f64) -> Result<()> {
    let duration = parse_seconds(seconds)?;
    let mut card = build_card(args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    // receiver outlives the send, it cannot be closed yet
    let _ = tx.send(InputEvent::click(ElementId::OpenControl));
    drop(tx);

    runtime.block_on(crate::runtime::run_realtime(
        &mut card,
        rx,
        duration,
        |entry| println!("{}", entry),
    ));
    Ok(())
}

fn parse_seconds(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|_| CardError::InvalidConfig {
        reason: format!("duration must be a non-negative number of seconds, got {}", seconds),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AutoplayArg;
    use crate::engine::SequenceState;

    fn args() -> CardArgs {
        CardArgs {
            config: None,
            seed: Some(3),
            without: Vec::new(),
            no_audio: false,
            autoplay: AutoplayArg::Allow,
        }
    }

    #[test]
    fn test_build_card_without_elements() {
        let mut args = args();
        args.without = vec!["flap".to_string(), " bg-music".to_string()];
        let card = build_card(&args).unwrap();
        assert!(!card.scene().contains(ElementId::Flap));
        assert!(card.audio().is_none());
    }

    #[test]
    fn test_build_card_unknown_element() {
        let mut args = args();
        args.without = vec!["nope".to_string()];
        let err = build_card(&args).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_build_card_no_audio() {
        let mut args = args();
        args.no_audio = true;
        let card = build_card(&args).unwrap();
        assert!(!card.capabilities().audio);
    }

    #[test]
    fn test_run_scripted_orders_inputs() {
        let mut card = build_card(&args()).unwrap();
        run_scripted(
            &mut card,
            vec![
                (Duration::from_secs(2), InputEvent::key(None, Key::Escape)),
                (Duration::ZERO, InputEvent::click(ElementId::OpenControl)),
            ],
            Duration::from_secs(4),
        );
        assert_eq!(card.sequence_state(), SequenceState::Finished);
        assert!(!card.audio().unwrap().is_playing());
        assert_eq!(card.now(), Duration::from_secs(4));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds(1.5).unwrap(), Duration::from_millis(1500));
        assert!(parse_seconds(-1.0).is_err());
        assert!(parse_seconds(f64::NAN).is_err());
    }
}
