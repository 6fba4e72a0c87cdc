// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for theory operations.

use thiserror::Error;

use crate::music::key::Accidental;

/// Errors that can occur while building or analyzing musical values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TheoryError {
    /// Accidental count outside the 0..=7 range of a key signature
    #[error("Invalid key signature: {count} {accidental} (expected 0-7)")]
    InvalidKeySignature { count: u8, accidental: Accidental },

    /// Pitch class symbol not in the 12-class vocabulary
    #[error("Invalid pitch class: {0:?}")]
    InvalidPitchClass(String),

    /// Note text that is not a pitch class followed by an optional octave
    #[error("Invalid note: {0:?}")]
    InvalidNote(String),

    /// Interval formula that does not start at 0 or is not strictly increasing
    #[error("Invalid interval formula: {0:?}")]
    InvalidFormula(Vec<u8>),

    /// Chord quality symbol not recognized
    #[error("Unknown chord quality: {0:?}")]
    UnknownQuality(String),

    /// Roman numeral symbol not in the symbol table
    #[error("Unknown roman numeral: {0:?}")]
    UnknownNumeral(String),

    /// Scale degree beyond the length of the scale it indexes
    #[error("Scale degree {degree} out of range for a {len}-note scale")]
    DegreeOutOfRange { degree: usize, len: usize },

    /// Chord inference called without notes
    #[error("Cannot analyze an empty note set")]
    EmptyNoteSet,

    /// No chord fingerprint matched the supplied notes
    #[error("No chord quality matches notes: {0}")]
    UnrecognizedChord(String),

    /// Stored notes that do not match the formula they claim
    #[error("Notes do not match their formula: {0}")]
    InconsistentNotes(String),

    /// Scale name not known to the registry
    #[error("Unknown scale: {0:?}")]
    UnknownScale(String),

    /// Transition table that cannot drive a progression
    #[error("Invalid progression: {0}")]
    InvalidProgression(String),
}

/// Result type for theory operations
pub type TheoryResult<T> = Result<T, TheoryError>;
