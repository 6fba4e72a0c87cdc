// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled pitch classes.
//!
//! A pitch class is one of the 12 chroma values, but unlike a raw chroma it
//! remembers how it was spelled: `C#` and `Db` share chroma 1 and compare
//! unequal. Spelling is chosen by context (see [`SpellingContext`]), never
//! inherent to the chroma.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TheoryError, TheoryResult};
use crate::music::key::SpellingContext;

/// Pitch class with its spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    #[serde(rename = "C#")]
    Cs,
    #[serde(rename = "Db")]
    Db,
    D,
    #[serde(rename = "D#")]
    Ds,
    #[serde(rename = "Eb")]
    Eb,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    #[serde(rename = "Gb")]
    Gb,
    G,
    #[serde(rename = "G#")]
    Gs,
    #[serde(rename = "Ab")]
    Ab,
    A,
    #[serde(rename = "A#")]
    As,
    #[serde(rename = "Bb")]
    Bb,
    B,
}

/// Sharp (normal) spelling of each chroma
const SHARP_SPELLING: [PitchClass; 12] = [
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

/// Flat spelling of each chroma
const FLAT_SPELLING: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::Db,
    PitchClass::D,
    PitchClass::Eb,
    PitchClass::E,
    PitchClass::F,
    PitchClass::Gb,
    PitchClass::G,
    PitchClass::Ab,
    PitchClass::A,
    PitchClass::Bb,
    PitchClass::B,
];

impl PitchClass {
    /// Every spelling, naturals first within each chroma
    pub const ALL: [PitchClass; 17] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::Gb,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::As,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Semitone offset from C (0-11). Enharmonic spellings share a chroma.
    pub fn chroma(self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::Cs | PitchClass::Db => 1,
            PitchClass::D => 2,
            PitchClass::Ds | PitchClass::Eb => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::Fs | PitchClass::Gb => 6,
            PitchClass::G => 7,
            PitchClass::Gs | PitchClass::Ab => 8,
            PitchClass::A => 9,
            PitchClass::As | PitchClass::Bb => 10,
            PitchClass::B => 11,
        }
    }

    /// Spell a chroma in the given context. Chroma wraps modulo 12.
    pub fn from_chroma(chroma: u8, context: SpellingContext) -> Self {
        let idx = (chroma % 12) as usize;
        match context {
            SpellingContext::Normal => SHARP_SPELLING[idx],
            SpellingContext::Flat => FLAT_SPELLING[idx],
        }
    }

    /// Letter name without accidental (`'C'` for `C#`)
    pub fn letter(self) -> char {
        match self {
            PitchClass::C | PitchClass::Cs => 'C',
            PitchClass::Db | PitchClass::D | PitchClass::Ds => 'D',
            PitchClass::Eb | PitchClass::E => 'E',
            PitchClass::F | PitchClass::Fs => 'F',
            PitchClass::Gb | PitchClass::G | PitchClass::Gs => 'G',
            PitchClass::Ab | PitchClass::A | PitchClass::As => 'A',
            PitchClass::Bb | PitchClass::B => 'B',
        }
    }

    pub fn is_flat(self) -> bool {
        matches!(
            self,
            PitchClass::Db | PitchClass::Eb | PitchClass::Gb | PitchClass::Ab | PitchClass::Bb
        )
    }

    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As
        )
    }

    pub fn is_natural(self) -> bool {
        !self.is_flat() && !self.is_sharp()
    }

    /// Same physical pitch class, regardless of spelling
    pub fn is_enharmonic(self, other: PitchClass) -> bool {
        self.chroma() == other.chroma()
    }

    /// Transpose by semitones, spelling the result in `context`
    pub fn transpose(self, semitones: i32, context: SpellingContext) -> Self {
        let chroma = (self.chroma() as i32 + semitones).rem_euclid(12) as u8;
        PitchClass::from_chroma(chroma, context)
    }

    /// Ascending interval in semitones to another pitch class (0-11)
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.chroma() as i16 - self.chroma() as i16).rem_euclid(12) as u8
    }

    /// Canonical spelling (`C#`, `Bb`, ...)
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    /// Parse `C`, `c#`, `Db`, `Cs`, `B♭`. Spellings outside the 17 supported
    /// (`Cb`, `E#`, double accidentals) are rejected.
    fn from_str(s: &str) -> TheoryResult<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| TheoryError::InvalidPitchClass(s.to_string()))?
            .to_ascii_uppercase();
        let accidental: String = chars.collect();

        let sharp = matches!(accidental.as_str(), "#" | "s" | "S" | "♯");
        let flat = matches!(accidental.as_str(), "b" | "♭");
        if !accidental.is_empty() && !sharp && !flat {
            return Err(TheoryError::InvalidPitchClass(s.to_string()));
        }

        let pc = match (letter, sharp, flat) {
            ('C', false, false) => PitchClass::C,
            ('C', true, _) => PitchClass::Cs,
            ('D', _, true) => PitchClass::Db,
            ('D', false, false) => PitchClass::D,
            ('D', true, _) => PitchClass::Ds,
            ('E', _, true) => PitchClass::Eb,
            ('E', false, false) => PitchClass::E,
            ('F', false, false) => PitchClass::F,
            ('F', true, _) => PitchClass::Fs,
            ('G', _, true) => PitchClass::Gb,
            ('G', false, false) => PitchClass::G,
            ('G', true, _) => PitchClass::Gs,
            ('A', _, true) => PitchClass::Ab,
            ('A', false, false) => PitchClass::A,
            ('A', true, _) => PitchClass::As,
            ('B', _, true) => PitchClass::Bb,
            ('B', false, false) => PitchClass::B,
            _ => return Err(TheoryError::InvalidPitchClass(s.to_string())),
        };
        Ok(pc)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
