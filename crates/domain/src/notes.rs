use std::fmt;

use serde::{Deserialize, Serialize};

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const PATTERN_NAMES: [&str; 12] = [
    "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

const A4_MIDI: f32 = 69.0;
const A4_HZ: f32 = 440.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// Index 0 = C .. 11 = B; larger indices wrap.
    pub fn from_index(index: usize) -> Self {
        use PitchClass::*;
        const CLASSES: [PitchClass; 12] = [C, Cs, D, Ds, E, F, Fs, G, Gs, A, As, B];
        CLASSES[index % 12]
    }

    pub fn index(&self) -> usize {
        use PitchClass::*;
        match self {
            C => 0,
            Cs => 1,
            D => 2,
            Ds => 3,
            E => 4,
            F => 5,
            Fs => 6,
            G => 7,
            Gs => 8,
            A => 9,
            As => 10,
            B => 11,
        }
    }

    pub fn name(&self) -> &'static str {
        NAMES[self.index()]
    }

    /// Lowercase spelling used in pattern code ("c#", not "C#").
    pub fn pattern_name(&self) -> &'static str {
        PATTERN_NAMES[self.index()]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named note: pitch class plus octave (middle C = c4).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NoteName {
    pub class: PitchClass,
    pub octave: i32,
}

impl NoteName {
    pub fn from_midi(midi: u8) -> Self {
        Self {
            class: PitchClass::from_index(midi as usize % 12),
            octave: midi as i32 / 12 - 1,
        }
    }

    /// Nearest-semitone conversion. Returns `None` for unvoiced values
    /// (`NaN`, infinite, or ≤ 0 Hz).
    pub fn from_hz(hz: f32) -> Option<Self> {
        if !hz.is_finite() || hz <= 0.0 {
            return None;
        }
        let midi = (A4_MIDI + 12.0 * (hz / A4_HZ).log2()).round();
        Some(Self::from_midi(midi.clamp(0.0, 127.0) as u8))
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.pattern_name(), self.octave)
    }
}

/// A note attributed to the onset that produced it. The note sequence for a
/// signal may be shorter than its onset list because unvoiced onsets are
/// dropped.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NoteEvent {
    pub name: NoteName,
    pub onset_index: usize,
}

impl NoteEvent {
    pub fn new(name: NoteName, onset_index: usize) -> Self {
        Self { name, onset_index }
    }
}
