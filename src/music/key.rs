// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key signatures and enharmonic spelling.
//!
//! Navigation works on three 12-element cycles: the circle of fifths (sharp
//! keys), the circle of fourths (flat keys) and the chromatic scale. Spelling
//! normalization rewrites a pitch class to the sharp or flat member of its
//! enharmonic pair.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{TheoryError, TheoryResult};
use crate::music::note::Note;
use crate::music::pitch::PitchClass;

/// Most accidentals a key signature can carry
pub const MAX_ACCIDENTALS: u8 = 7;

/// Positions between a major key and its relative minor on either circle
const RELATIVE_MINOR_OFFSET: usize = 3;

/// Whether chromatic notes are spelled with sharps or flats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellingContext {
    /// Sharp spelling (`C#`, `F#`)
    #[default]
    Normal,
    /// Flat spelling (`Db`, `Gb`)
    Flat,
}

impl SpellingContext {
    /// Spelling used by a key rooted on `tonic`: flat for flat-spelled
    /// tonics and for F, sharp otherwise.
    pub fn for_key(tonic: PitchClass) -> Self {
        if tonic.is_flat() || tonic == PitchClass::F {
            SpellingContext::Flat
        } else {
            SpellingContext::Normal
        }
    }
}

/// Major or minor key mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
}

impl KeyMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" | "maj" => Some(KeyMode::Major),
            "minor" | "min" => Some(KeyMode::Minor),
            _ => None,
        }
    }
}

/// Which accidental a key signature uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accidental {
    Sharps,
    Flats,
}

impl Accidental {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sharps" | "sharp" | "#" => Some(Accidental::Sharps),
            "flats" | "flat" | "b" => Some(Accidental::Flats),
            _ => None,
        }
    }

    /// The spelling context matching this accidental
    pub fn context(self) -> SpellingContext {
        match self {
            Accidental::Sharps => SpellingContext::Normal,
            Accidental::Flats => SpellingContext::Flat,
        }
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accidental::Sharps => write!(f, "sharps"),
            Accidental::Flats => write!(f, "flats"),
        }
    }
}

/// A 12-element navigation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cycle {
    Fifths,
    Fourths,
    Chromatic,
}

impl Cycle {
    pub fn pitches(self) -> &'static [PitchClass; 12] {
        match self {
            Cycle::Fifths => &CIRCLE_OF_FIFTHS,
            Cycle::Fourths => &CIRCLE_OF_FOURTHS,
            Cycle::Chromatic => &CHROMATIC,
        }
    }

    /// Position of a pitch class in this cycle, matched by chroma
    pub fn position(self, pc: PitchClass) -> usize {
        // Every cycle holds each chroma exactly once
        self.pitches()
            .iter()
            .position(|p| p.chroma() == pc.chroma())
            .unwrap_or(0)
    }
}

/// Major keys by ascending fifth (sharp keys)
pub const CIRCLE_OF_FIFTHS: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::G,
    PitchClass::D,
    PitchClass::A,
    PitchClass::E,
    PitchClass::B,
    PitchClass::Fs,
    PitchClass::Cs,
    PitchClass::Gs,
    PitchClass::Ds,
    PitchClass::As,
    PitchClass::F,
];

/// Major keys by ascending fourth (flat keys)
pub const CIRCLE_OF_FOURTHS: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::F,
    PitchClass::Bb,
    PitchClass::Eb,
    PitchClass::Ab,
    PitchClass::Db,
    PitchClass::Gb,
    PitchClass::B,
    PitchClass::E,
    PitchClass::A,
    PitchClass::D,
    PitchClass::G,
];

/// One octave of semitones from C
pub const CHROMATIC: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::Cs,
    PitchClass::D,
    PitchClass::Ds,
    PitchClass::E,
    PitchClass::F,
    PitchClass::Fs,
    PitchClass::G,
    PitchClass::Gs,
    PitchClass::A,
    PitchClass::As,
    PitchClass::B,
];

/// Tonic of the key with `count` sharps or flats.
///
/// Minor keys sit three positions from their relative major: forward on the
/// circle of fifths, backward on the circle of fourths.
pub fn key_for_signature(
    mode: KeyMode,
    count: u8,
    accidental: Accidental,
) -> TheoryResult<PitchClass> {
    if count > MAX_ACCIDENTALS {
        return Err(TheoryError::InvalidKeySignature { count, accidental });
    }

    let count = count as usize;
    let index = match (mode, accidental) {
        (KeyMode::Major, _) => count,
        (KeyMode::Minor, Accidental::Sharps) => count + RELATIVE_MINOR_OFFSET,
        (KeyMode::Minor, Accidental::Flats) => count + 12 - RELATIVE_MINOR_OFFSET,
    } % 12;

    let cycle = match accidental {
        Accidental::Sharps => Cycle::Fifths,
        Accidental::Flats => Cycle::Fourths,
    };
    let tonic = normalize_spelling(cycle.pitches()[index], accidental.context());
    trace!(?mode, count, %accidental, %tonic, "resolved key signature");
    Ok(tonic)
}

/// Key signature of a key: the accidental count and type, preferring the
/// signature with fewer accidentals. Returns `None` when neither fits in
/// seven accidentals.
pub fn signature_of(tonic: PitchClass, mode: KeyMode) -> Option<(u8, Accidental)> {
    let candidates = (0..=MAX_ACCIDENTALS).flat_map(|count| {
        [Accidental::Sharps, Accidental::Flats]
            .into_iter()
            .map(move |accidental| (count, accidental))
    });

    let mut fallback = None;
    for (count, accidental) in candidates {
        let Ok(key) = key_for_signature(mode, count, accidental) else {
            continue;
        };
        if key == tonic {
            return Some((count, accidental));
        }
        if fallback.is_none() && key.is_enharmonic(tonic) {
            fallback = Some((count, accidental));
        }
    }
    fallback
}

/// Rewrite a pitch class to its spelling in `context`. Idempotent.
pub fn normalize_spelling(pc: PitchClass, context: SpellingContext) -> PitchClass {
    PitchClass::from_chroma(pc.chroma(), context)
}

/// Advance a note one position along `cycle`. Wrapping past the end of the
/// cycle returns to its first entry one octave higher. Attributes carry over.
pub fn next_by_interval(note: Note, cycle: Cycle) -> Note {
    let pitches = cycle.pitches();
    let next = cycle.position(note.pitch()) + 1;
    if next == pitches.len() {
        note.with_pitch(pitches[0]).shift_octave(1)
    } else {
        note.with_pitch(pitches[next])
    }
}
