// quantum_melody_server: JSON-over-HTTP front end for the melody pipeline.
//
// One endpoint, `POST /generate_music`, taking `{"emotion": "..."}` and
// returning `{"melody": [...], "midi_base64": "...", "message": "..."}`.
// There is no routing layer beyond that single path check.
//
// Module overview:
// - `handler.rs`: Pure request → (status, JSON body) mapping. No sockets,
//                 so it is unit-testable directly.
// - `server.rs`:  `tiny_http` listener with a fixed pool of worker threads
//                 and a stop handle, mirroring an embeddable relay-style
//                 `start_*` API.
//
// Every request builds its own `ShotRng`; workers share only the
// read-only `MelodyConfig`.

pub mod handler;
pub mod server;

pub use server::{ServerConfig, ServerHandle, start_server};
