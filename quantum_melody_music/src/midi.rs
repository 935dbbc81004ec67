// MIDI rendering of a finished melody.
//
// The pipeline treats rendering as an injected collaborator: anything that
// implements `MidiRenderer` can turn a pitch sequence plus a fixed per-note
// duration into bytes. `SmfRenderer` is the stock implementation, writing a
// single-track Standard MIDI File (format 0) with the `midly` crate:
//
//   delta 0  Tempo
//   delta 0  TrackName
//   delta 0  ProgramChange
//   for each pitch: NoteOn at the previous note's end, NoteOff one note later
//   delta 0  EndOfTrack
//
// Notes are strictly sequential (a monophonic line), so every NoteOn lands
// at delta 0 after the preceding NoteOff.

use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::config::MelodyConfig;
use crate::error::{MusicError, Result};
use crate::note::Pitch;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

const CHANNEL: u8 = 0;

/// Largest delta time a MIDI variable-length quantity can hold.
const MAX_DELTA: u32 = (1 << 28) - 1;

const MICROS_PER_MINUTE: u32 = 60_000_000;

/// Slowest tempo whose microseconds-per-quarter fits the 24-bit tempo field.
pub const MIN_TEMPO_BPM: u16 = 4;

/// Turns an ordered pitch sequence into a MIDI byte stream.
pub trait MidiRenderer {
    fn render(&self, melody: &[Pitch], note_beats: f64) -> Result<Vec<u8>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmfRenderer {
    pub tempo_bpm: u16,
    pub velocity: u8,
    pub program: u8,
}

impl Default for SmfRenderer {
    fn default() -> Self {
        Self::from_config(&MelodyConfig::default())
    }
}

impl SmfRenderer {
    pub fn from_config(config: &MelodyConfig) -> Self {
        Self {
            tempo_bpm: config.tempo_bpm,
            velocity: config.velocity,
            program: config.program,
        }
    }

    fn melody_to_smf(&self, melody: &[Pitch], note_beats: f64) -> Result<Smf<'static>> {
        if !(note_beats.is_finite() && note_beats > 0.0) {
            return Err(MusicError::Config(format!(
                "note duration must be positive, got {note_beats}"
            )));
        }
        if self.tempo_bpm < MIN_TEMPO_BPM {
            return Err(MusicError::Config(format!(
                "tempo_bpm must be at least {MIN_TEMPO_BPM}, got {}",
                self.tempo_bpm
            )));
        }
        let note_ticks = (note_beats * TICKS_PER_QUARTER as f64).round().max(1.0) as u32;
        if note_ticks > MAX_DELTA {
            return Err(MusicError::Config(format!(
                "note duration of {note_beats} beats is too long for MIDI"
            )));
        }

        let channel = u4::new(CHANNEL);
        let mut track: Track<'static> = Vec::with_capacity(melody.len() * 2 + 4);

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(
                MICROS_PER_MINUTE / self.tempo_bpm as u32,
            ))),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Quantum Melody")),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(self.program.min(127)),
                },
            },
        });

        for pitch in melody {
            let key = u7::new(pitch.midi_key());
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key,
                        vel: u7::new(self.velocity.min(127)),
                    },
                },
            });
            track.push(TrackEvent {
                delta: u28::new(note_ticks),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key,
                        vel: u7::new(0),
                    },
                },
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));
        smf.tracks.push(track);
        Ok(smf)
    }
}

impl MidiRenderer for SmfRenderer {
    fn render(&self, melody: &[Pitch], note_beats: f64) -> Result<Vec<u8>> {
        let smf = self.melody_to_smf(melody, note_beats)?;
        let mut buf = Vec::new();
        smf.write_std(&mut buf).map_err(MusicError::Midi)?;
        Ok(buf)
    }
}

/// Render with `renderer` and write the bytes to `path`.
pub fn write_midi(
    renderer: &dyn MidiRenderer,
    melody: &[Pitch],
    note_beats: f64,
    path: &Path,
) -> Result<()> {
    let bytes = renderer.render(melody, note_beats)?;
    std::fs::write(path, &bytes).map_err(MusicError::Midi)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(bytes: &[u8]) -> Smf<'_> {
        Smf::parse(bytes).unwrap()
    }

    #[test]
    fn renders_parseable_single_track_file() {
        let melody = vec![Pitch::C4, Pitch::E4, Pitch::G4];
        let bytes = SmfRenderer::default().render(&melody, 0.5).unwrap();
        assert_eq!(&bytes[..4], b"MThd");

        let smf = parse(&bytes);
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(
            smf.header.timing,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER))
        );
    }

    #[test]
    fn one_note_on_per_pitch_in_order() {
        let melody = vec![Pitch::G4, Pitch::A4, Pitch::C5];
        let bytes = SmfRenderer::default().render(&melody, 0.5).unwrap();
        let smf = parse(&bytes);
        let keys: Vec<u8> = smf.tracks[0]
            .iter()
            .filter_map(|e| match &e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => Some(key.as_int()),
                _ => None,
            })
            .collect();
        assert_eq!(keys, vec![67, 69, 72]);
    }

    #[test]
    fn half_beat_notes_last_240_ticks() {
        let bytes = SmfRenderer::default().render(&[Pitch::D4; 4], 0.5).unwrap();
        let smf = parse(&bytes);
        let total: u32 = smf.tracks[0].iter().map(|e| e.delta.as_int()).sum();
        assert_eq!(total, 4 * 240);
        for event in smf.tracks[0].iter() {
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOff { .. },
                ..
            } = &event.kind
            {
                assert_eq!(event.delta.as_int(), 240);
            }
        }
    }

    #[test]
    fn tempo_event_matches_config() {
        let renderer = SmfRenderer {
            tempo_bpm: 60,
            ..Default::default()
        };
        let bytes = renderer.render(&[Pitch::C4], 1.0).unwrap();
        let smf = parse(&bytes);
        let tempo = smf.tracks[0].iter().find_map(|e| match &e.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(1_000_000));
    }

    #[test]
    fn slowest_tempo_fits_tempo_field() {
        for tempo_bpm in [0, 1, MIN_TEMPO_BPM - 1] {
            let renderer = SmfRenderer {
                tempo_bpm,
                ..Default::default()
            };
            assert!(
                matches!(renderer.render(&[Pitch::C4], 1.0), Err(MusicError::Config(_))),
                "accepted tempo {tempo_bpm}"
            );
        }

        let renderer = SmfRenderer {
            tempo_bpm: MIN_TEMPO_BPM,
            ..Default::default()
        };
        let bytes = renderer.render(&[Pitch::C4], 1.0).unwrap();
        let tempo = parse(&bytes).tracks[0].iter().find_map(|e| match &e.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(15_000_000));
    }

    #[test]
    fn empty_melody_still_renders() {
        let bytes = SmfRenderer::default().render(&[], 0.5).unwrap();
        let smf = parse(&bytes);
        assert!(matches!(
            smf.tracks[0].last().map(|e| &e.kind),
            Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
        ));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let r = SmfRenderer::default();
        assert!(matches!(r.render(&[Pitch::C4], 0.0), Err(MusicError::Config(_))));
        assert!(matches!(r.render(&[Pitch::C4], -1.0), Err(MusicError::Config(_))));
    }

    #[test]
    fn write_midi_creates_file() {
        let path = std::env::temp_dir().join(format!("qm_midi_test_{}.mid", std::process::id()));
        write_midi(&SmfRenderer::default(), &[Pitch::B4; 2], 0.5, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(parse(&bytes).tracks.len(), 1);
        std::fs::remove_file(&path).unwrap();
    }
}
