//! datasong CLI - Turn data into multi-track MIDI
//!
//! This binary maps a function, an image, a text file or plain randomness onto
//! note pitches, writes the result as a MIDI file and can play it through
//! fluidsynth.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use datasong_cli::commands;
use datasong_cli::commands::generate::GenerateOverrides;
use datasong_core::config::{
    DEFAULT_MIN_PITCH, DEFAULT_NUMBER_OF_TRACKS, DEFAULT_PITCH_RANGE, DEFAULT_SOUNDBANK,
};
use datasong_core::SourceConfig;

/// datasong - Data sonification to MIDI
#[derive(Parser)]
#[command(name = "datasong")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a MIDI file from a data source
    Generate {
        /// JSON config file; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output MIDI file (default: sin.mid)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Notes per track (default: 70)
        #[arg(short, long)]
        notes: Option<usize>,

        /// Number of tracks (default: 1)
        #[arg(short, long)]
        tracks: Option<usize>,

        /// Lowest pitch of the global range (default: 50)
        #[arg(long, allow_hyphen_values = true)]
        min_pitch: Option<i32>,

        /// Width of the global pitch range (default: 30)
        #[arg(long, allow_hyphen_values = true)]
        pitch_range: Option<f64>,

        /// Sample a built-in function (sine)
        #[arg(long, conflicts_with_all = ["image", "text", "random"])]
        function: Option<String>,

        /// Average the pixels of an image file
        #[arg(long, conflicts_with_all = ["text", "random"])]
        image: Option<PathBuf>,

        /// Read a text file as one large number
        #[arg(long, conflicts_with = "random")]
        text: Option<PathBuf>,

        /// Draw pitches at random
        #[arg(long)]
        random: bool,

        /// Seed for volume jitter and random pitches (default: drawn and reported)
        #[arg(long)]
        seed: Option<u32>,

        /// Play the file with fluidsynth after writing it
        #[arg(long)]
        play: bool,

        /// Soundbank used for playback (default: FluidR3_GM.sf2)
        #[arg(long)]
        soundbank: Option<PathBuf>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Play an existing MIDI file with fluidsynth
    Play {
        /// Path to the MIDI file
        midi: PathBuf,

        /// Soundbank used for playback
        #[arg(long, default_value = DEFAULT_SOUNDBANK)]
        soundbank: PathBuf,
    },

    /// Print the pitch band each track is assigned
    Bands {
        /// Number of tracks
        #[arg(short, long, default_value_t = DEFAULT_NUMBER_OF_TRACKS)]
        tracks: usize,

        /// Lowest pitch of the global range
        #[arg(long, default_value_t = DEFAULT_MIN_PITCH, allow_hyphen_values = true)]
        min_pitch: i32,

        /// Width of the global pitch range
        #[arg(long, default_value_t = DEFAULT_PITCH_RANGE, allow_hyphen_values = true)]
        pitch_range: f64,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

/// Picks the source from the mutually exclusive source flags.
fn source_override(
    function: Option<String>,
    image: Option<PathBuf>,
    text: Option<PathBuf>,
    random: bool,
) -> Option<SourceConfig> {
    if let Some(name) = function {
        Some(SourceConfig::Function { name })
    } else if let Some(path) = image {
        Some(SourceConfig::Image { path })
    } else if let Some(path) = text {
        Some(SourceConfig::Text { path })
    } else if random {
        Some(SourceConfig::Random)
    } else {
        None
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            config,
            output,
            notes,
            tracks,
            min_pitch,
            pitch_range,
            function,
            image,
            text,
            random,
            seed,
            play,
            soundbank,
            json,
        } => {
            let overrides = GenerateOverrides {
                output,
                notes_limit: notes,
                number_of_tracks: tracks,
                min_pitch,
                pitch_range,
                source: source_override(function, image, text, random),
                seed,
                play,
                soundbank,
            };
            commands::generate::run(config.as_deref(), overrides, json)
        }
        Commands::Play { midi, soundbank } => commands::play::run(&midi, &soundbank),
        Commands::Bands {
            tracks,
            min_pitch,
            pitch_range,
            json,
        } => commands::bands::run(tracks, min_pitch, pitch_range, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(commands::exit_status(&e))
        }
    }
}
