// Pitch alphabet and the 3-bit note table.
//
// Outcomes are mapped to pitches by their last three bits:
//
//   000 C4   001 D4   010 E4   011 F4
//   100 G4   101 A4   110 B4   111 C5
//
// That is a C major scale from middle C up one octave. `NoteTable` is a
// value rather than a constant so callers can supply their own mapping; a
// code with no entry falls back to whatever the table maps `000` to (C4 if
// that slot is empty too). With the default table every code is covered and
// the fallback never fires.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of trailing outcome bits used as the table key.
pub const CODE_BITS: usize = 3;

/// Pitches reachable from the note table. Serialized by name ("C4").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pitch {
    C4,
    D4,
    E4,
    F4,
    G4,
    A4,
    B4,
    C5,
}

impl Pitch {
    pub const ALL: [Pitch; 8] = [
        Pitch::C4,
        Pitch::D4,
        Pitch::E4,
        Pitch::F4,
        Pitch::G4,
        Pitch::A4,
        Pitch::B4,
        Pitch::C5,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pitch::C4 => "C4",
            Pitch::D4 => "D4",
            Pitch::E4 => "E4",
            Pitch::F4 => "F4",
            Pitch::G4 => "G4",
            Pitch::A4 => "A4",
            Pitch::B4 => "B4",
            Pitch::C5 => "C5",
        }
    }

    /// MIDI key number (middle C = 60).
    pub fn midi_key(self) -> u8 {
        match self {
            Pitch::C4 => 60,
            Pitch::D4 => 62,
            Pitch::E4 => 64,
            Pitch::F4 => 65,
            Pitch::G4 => 67,
            Pitch::A4 => 69,
            Pitch::B4 => 71,
            Pitch::C5 => 72,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown pitch '{s}'"))
    }
}

/// 3-bit code → pitch. Slots may be empty in a custom table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTable {
    entries: [Option<Pitch>; 1 << CODE_BITS],
}

impl NoteTable {
    pub fn empty() -> Self {
        Self {
            entries: [None; 1 << CODE_BITS],
        }
    }

    /// Set the pitch for a code. Codes wider than `CODE_BITS` are masked.
    pub fn with_entry(mut self, code: usize, pitch: Pitch) -> Self {
        self.entries[code & ((1 << CODE_BITS) - 1)] = Some(pitch);
        self
    }

    pub fn get(&self, code: usize) -> Option<Pitch> {
        self.entries.get(code).copied().flatten()
    }

    /// The pitch used when a code has no entry.
    pub fn fallback(&self) -> Pitch {
        self.get(0).unwrap_or(Pitch::C4)
    }

    pub fn lookup(&self, code: usize) -> Pitch {
        self.get(code).unwrap_or_else(|| self.fallback())
    }
}

impl Default for NoteTable {
    fn default() -> Self {
        Pitch::ALL
            .into_iter()
            .enumerate()
            .fold(NoteTable::empty(), |table, (code, pitch)| {
                table.with_entry(code, pitch)
            })
    }
}
