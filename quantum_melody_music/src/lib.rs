// quantum_melody_music: turns sampled quantum outcomes into music.
//
// Takes the histogram produced by `quantum_melody_sim` and expands it into a
// short melody over a fixed eight-pitch alphabet, then renders that melody
// to a Standard MIDI File. `pipeline.rs` ties the two crates together into
// the single request/response operation used by the CLI and the server.
//
// Module overview:
// - `note.rs`:     `Pitch` alphabet and the 3-bit `NoteTable`.
// - `mapper.rs`:   `map_to_melody`: ordered expansion + truncation.
// - `midi.rs`:     `MidiRenderer` trait and the `midly`-backed `SmfRenderer`.
// - `config.rs`:   `MelodyConfig`: shots, length, note duration, tempo.
// - `pipeline.rs`: `generate` / `generate_melody`, request and response types.
// - `error.rs`:    `MusicError`, wrapping `SimError`.
// - `logging.rs`:  `init_tracing` for binaries.
//
// Randomness is never global: every entry point takes `&mut ShotRng`.

pub mod config;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod midi;
pub mod note;
pub mod pipeline;

pub use config::MelodyConfig;
pub use error::{MusicError, Result};
pub use mapper::{Melody, TARGET_LENGTH, map_to_melody};
pub use midi::{MidiRenderer, SmfRenderer, write_midi};
pub use note::{NoteTable, Pitch};
pub use pipeline::{Generation, MelodyRequest, MelodyResponse, generate, generate_melody};
