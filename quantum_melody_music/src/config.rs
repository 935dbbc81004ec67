// Tunable parameters for one melody generation run.
//
// `MelodyConfig::default()` reproduces the stock behavior: 16 shots mapped
// to a 16-note melody of half-beat notes at 120 BPM on an acoustic piano.
// The CLI and server can load overrides from a JSON file; any field left
// out of the file keeps its default. The core pipeline never reads files
// itself; it receives a config value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};
use crate::midi::MIN_TEMPO_BPM;

/// Upper bound on `target_length`; a few minutes of half-beat notes.
pub const MAX_TARGET_LENGTH: usize = 4096;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelodyConfig {
    /// Measurement draws per request.
    pub shots: u32,
    /// Maximum melody length after expansion.
    pub target_length: usize,
    /// Duration of every note, in quarter-note beats.
    pub note_beats: f64,
    pub tempo_bpm: u16,
    /// MIDI note-on velocity (0–127).
    pub velocity: u8,
    /// General MIDI program number (0–127). 0 is acoustic grand piano.
    pub program: u8,
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self {
            shots: 16,
            target_length: 16,
            note_beats: 0.5,
            tempo_bpm: 120,
            velocity: 80,
            program: 0,
        }
    }
}

impl MelodyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| MusicError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MelodyConfig =
            serde_json::from_str(&data).map_err(|source| MusicError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks that serde cannot express. Shot count is left to the
    /// simulator, which reports it as `SimError::InvalidConfig`.
    pub fn validate(&self) -> Result<()> {
        if !(self.note_beats.is_finite() && self.note_beats > 0.0) {
            return Err(MusicError::Config(format!(
                "note_beats must be a positive number, got {}",
                self.note_beats
            )));
        }
        if self.target_length > MAX_TARGET_LENGTH {
            return Err(MusicError::Config(format!(
                "target_length must be at most {MAX_TARGET_LENGTH}, got {}",
                self.target_length
            )));
        }
        if self.tempo_bpm < MIN_TEMPO_BPM {
            return Err(MusicError::Config(format!(
                "tempo_bpm must be at least {MIN_TEMPO_BPM}, got {}",
                self.tempo_bpm
            )));
        }
        if self.velocity > 127 {
            return Err(MusicError::Config(format!(
                "velocity must be at most 127, got {}",
                self.velocity
            )));
        }
        if self.program > 127 {
            return Err(MusicError::Config(format!(
                "program must be at most 127, got {}",
                self.program
            )));
        }
        Ok(())
    }
}
