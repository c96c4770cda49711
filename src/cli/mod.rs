//! CLI Module
//!
//! Command-line interface for running greeting cards headlessly.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::audio::PlaybackPolicy;

/// Greeting Card - envelope opening choreography
#[derive(Parser, Debug)]
#[command(name = "greeting-card")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a card on a virtual clock and print its timeline
    #[command(name = "simulate")]
    Simulate {
        #[command(flatten)]
        card: CardArgs,

        /// Simulated duration in seconds
        #[arg(long, default_value_t = 30.0)]
        seconds: f64,

        /// When the open control is clicked, in milliseconds
        #[arg(long, default_value_t = 0)]
        open_at_ms: u64,

        /// Never click the open control
        #[arg(long)]
        no_click: bool,

        /// Press Escape at this time, in milliseconds
        #[arg(long)]
        escape_at_ms: Option<u64>,

        /// Print the timeline as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    #[command(name = "config")]
    Config,

    /// Run a card against the wall clock, printing events as they happen
    #[cfg(feature = "realtime")]
    #[command(name = "live")]
    Live {
        #[command(flatten)]
        card: CardArgs,

        /// How long to run, in seconds
        #[arg(long, default_value_t = 15.0)]
        seconds: f64,
    },
}

/// Options shared by every command that builds a card
#[derive(Args, Debug, Clone)]
pub struct CardArgs {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for confetti randomness
    #[arg(long)]
    pub seed: Option<u64>,

    /// Leave elements out of the page, by DOM id (e.g. flap,card)
    #[arg(long, value_delimiter = ',')]
    pub without: Vec<String>,

    /// Build the card without background audio
    #[arg(long)]
    pub no_audio: bool,

    /// How the platform answers play requests
    #[arg(long, value_enum, default_value_t = AutoplayArg::Allow)]
    pub autoplay: AutoplayArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayArg {
    Allow,
    Block,
    Unavailable,
}

impl From<AutoplayArg> for PlaybackPolicy {
    fn from(arg: AutoplayArg) -> Self {
        match arg {
            AutoplayArg::Allow => PlaybackPolicy::Allow,
            AutoplayArg::Block => PlaybackPolicy::BlockAutoplay,
            AutoplayArg::Unavailable => PlaybackPolicy::Unavailable,
        }
    }
}
