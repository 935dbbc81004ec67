// Request handling, independent of the transport.
//
// `handle` takes the method, URL, and body text of an HTTP request and
// returns a status code with a JSON body. Outcomes:
//
// - POST /generate_music, valid body → 200, `MelodyResponse`
// - empty body                      → treated as `{}` (emotion "happy")
// - body that is not a JSON object with an optional string `emotion` → 400
// - pipeline failure                 → 500
// - other path                       → 404
// - other method on the endpoint     → 405
//
// Errors are reported as `{"error": "..."}`.

use quantum_melody_music::pipeline::{MelodyRequest, generate};
use quantum_melody_music::{MelodyConfig, MidiRenderer};
use quantum_melody_sim::prng::ShotRng;
use serde::Serialize;
use tracing::{debug, warn};

pub const ENDPOINT: &str = "/generate_music";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(500, &format!("failed to encode response: {e}")),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
        Self { status, body }
    }
}

pub fn handle(
    method: Method,
    url: &str,
    body: &str,
    config: &MelodyConfig,
    renderer: &dyn MidiRenderer,
    rng: &mut ShotRng,
) -> Reply {
    let path = url.split('?').next().unwrap_or(url);
    if path != ENDPOINT {
        return Reply::error(404, &format!("no such endpoint: {path}"));
    }
    if method != Method::Post {
        return Reply::error(405, "use POST");
    }

    let request: MelodyRequest = if body.trim().is_empty() {
        MelodyRequest::default()
    } else {
        match serde_json::from_str(body) {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "rejected request body");
                return Reply::error(400, &format!("invalid request body: {e}"));
            }
        }
    };

    match generate(&request, config, rng, renderer) {
        Ok(response) => Reply::json(200, &response),
        Err(e) => {
            warn!(emotion = %request.emotion, error = %e, "generation failed");
            Reply::error(500, &e.to_string())
        }
    }
}
