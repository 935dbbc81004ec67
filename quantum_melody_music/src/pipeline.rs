// End-to-end generation: emotion label → circuit → histogram → melody →
// MIDI → response.
//
// This is the glue the CLI and the HTTP server both call. It owns no state:
// the caller supplies the config, the random source, and the renderer, and
// gets back plain values. A failure anywhere aborts this one request and
// surfaces as `MusicError`.
//
// The response shape mirrors the JSON the server returns:
//
//   { "melody": ["G4", ...], "midi_base64": "TVRoZA...", "message": "..." }

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use quantum_melody_sim::prng::ShotRng;
use quantum_melody_sim::{Circuit, Histogram, build_circuit};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MelodyConfig;
use crate::error::Result;
use crate::mapper::{Melody, map_to_melody};
use crate::midi::MidiRenderer;
use crate::note::NoteTable;

/// Label used when a request leaves `emotion` out.
pub const DEFAULT_EMOTION: &str = "happy";

fn default_emotion() -> String {
    DEFAULT_EMOTION.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodyRequest {
    #[serde(default = "default_emotion")]
    pub emotion: String,
}

impl Default for MelodyRequest {
    fn default() -> Self {
        Self {
            emotion: default_emotion(),
        }
    }
}

impl MelodyRequest {
    pub fn new(emotion: impl Into<String>) -> Self {
        Self {
            emotion: emotion.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodyResponse {
    pub melody: Melody,
    pub midi_base64: String,
    pub message: String,
}

/// Everything computed before rendering, for callers that want to show
/// the intermediate steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
    pub circuit: Circuit,
    pub histogram: Histogram,
    pub melody: Melody,
}

/// Simulate the circuit for `emotion` and map the sampled outcomes to a
/// melody. No rendering.
pub fn generate_melody(
    emotion: &str,
    config: &MelodyConfig,
    rng: &mut ShotRng,
) -> Result<Generation> {
    let circuit = build_circuit(emotion);
    let state = circuit.prepare()?;
    let histogram = state.sample_shots(config.shots, rng)?;
    let melody = map_to_melody(&histogram, &NoteTable::default(), config.target_length);
    Ok(Generation {
        circuit,
        histogram,
        melody,
    })
}

/// Full request handling: melody plus base64 MIDI and a message.
pub fn generate(
    request: &MelodyRequest,
    config: &MelodyConfig,
    rng: &mut ShotRng,
    renderer: &dyn MidiRenderer,
) -> Result<MelodyResponse> {
    config.validate()?;
    let generation = generate_melody(&request.emotion, config, rng)?;
    let midi = renderer.render(&generation.melody, config.note_beats)?;
    info!(
        emotion = %request.emotion,
        notes = generation.melody.len(),
        midi_bytes = midi.len(),
        "generated melody"
    );
    Ok(MelodyResponse {
        melody: generation.melody,
        midi_base64: STANDARD.encode(&midi),
        message: response_message(&request.emotion),
    })
}

pub fn response_message(emotion: &str) -> String {
    format!("Quantum music generated for '{emotion}' emotion")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MusicError;
    use crate::midi::SmfRenderer;
    use crate::note::Pitch;
    use quantum_melody_sim::SimError;

    /// Renderer that records nothing and returns a fixed payload.
    struct FixedRenderer(Vec<u8>);

    impl MidiRenderer for FixedRenderer {
        fn render(&self, _melody: &[Pitch], _note_beats: f64) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn sad_yields_sixteen_g4() {
        let mut rng = ShotRng::new(1);
        let g = generate_melody("sad", &MelodyConfig::default(), &mut rng).unwrap();
        assert_eq!(g.histogram.count(0b100), 16);
        assert_eq!(g.melody, vec![Pitch::G4; 16]);
    }

    #[test]
    fn calm_only_plays_c4_and_e4() {
        let mut rng = ShotRng::new(8);
        let g = generate_melody("calm", &MelodyConfig::default(), &mut rng).unwrap();
        assert_eq!(g.melody.len(), 16);
        assert!(g.melody.iter().all(|&p| p == Pitch::C4 || p == Pitch::E4));
        // Ascending outcome order puts every C4 before every E4.
        let first_e4 = g.melody.iter().position(|&p| p == Pitch::E4).unwrap_or(16);
        assert!(g.melody[first_e4..].iter().all(|&p| p == Pitch::E4));
    }

    #[test]
    fn unknown_label_uses_default_circuit() {
        let mut rng = ShotRng::new(3);
        let g = generate_melody("unknown_label", &MelodyConfig::default(), &mut rng).unwrap();
        assert_eq!(g.circuit.gates.len(), 2);
        assert_eq!(g.histogram.shots(), 16);
        assert!(g.histogram.iter().all(|(b, _)| b.value == 0b001 || b.value == 0b101));
        assert!(g.melody.iter().all(|&p| p == Pitch::D4 || p == Pitch::A4));
    }

    #[test]
    fn same_seed_same_melody() {
        let config = MelodyConfig::default();
        let a = generate_melody("happy", &config, &mut ShotRng::new(77)).unwrap();
        let b = generate_melody("happy", &config, &mut ShotRng::new(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn response_carries_message_and_base64_midi() {
        let mut rng = ShotRng::new(5);
        let renderer = FixedRenderer(b"MThd".to_vec());
        let response = generate(
            &MelodyRequest::new("sad"),
            &MelodyConfig::default(),
            &mut rng,
            &renderer,
        )
        .unwrap();
        assert_eq!(response.midi_base64, "TVRoZA==");
        assert_eq!(response.message, "Quantum music generated for 'sad' emotion");
        assert_eq!(response.melody.len(), 16);
    }

    #[test]
    fn message_echoes_raw_label() {
        let mut rng = ShotRng::new(5);
        let response = generate(
            &MelodyRequest::new("Furious"),
            &MelodyConfig::default(),
            &mut rng,
            &SmfRenderer::default(),
        )
        .unwrap();
        assert_eq!(
            response.message,
            "Quantum music generated for 'Furious' emotion"
        );
        let midi = STANDARD.decode(&response.midi_base64).unwrap();
        assert_eq!(&midi[..4], b"MThd");
    }

    #[test]
    fn zero_shots_aborts_with_sim_error() {
        let config = MelodyConfig {
            shots: 0,
            ..Default::default()
        };
        let err = generate(
            &MelodyRequest::default(),
            &config,
            &mut ShotRng::new(0),
            &SmfRenderer::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MusicError::Sim(SimError::InvalidConfig(_))));
    }

    #[test]
    fn request_defaults_to_happy() {
        let request: MelodyRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.emotion, "happy");
        assert_eq!(MelodyRequest::default(), request);
    }

    #[test]
    fn response_json_shape() {
        let response = MelodyResponse {
            melody: vec![Pitch::C4, Pitch::C5],
            midi_base64: "AA==".into(),
            message: response_message("calm"),
        };
        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["melody"], serde_json::json!(["C4", "C5"]));
        assert_eq!(json["midi_base64"], "AA==");
        assert_eq!(json["message"], "Quantum music generated for 'calm' emotion");
    }
}
