// Errors for the melody half of the pipeline.
//
// Simulator failures pass through unchanged inside `MusicError::Sim` so a
// caller can still match on `SimError::InvalidQubitIndex` and friends.

use std::path::PathBuf;

use quantum_melody_sim::SimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MusicError {
    #[error(transparent)]
    Sim(#[from] SimError),

    /// A `MelodyConfig` value outside its legal range.
    #[error("invalid melody config: {0}")]
    Config(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("MIDI write failed: {0}")]
    Midi(std::io::Error),
}

pub type Result<T> = std::result::Result<T, MusicError>;
