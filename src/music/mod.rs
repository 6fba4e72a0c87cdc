// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory core for chordsmith.
//!
//! Spelled pitch classes and notes, key signatures, scales, chords, chord
//! recognition and roman-numeral resolution. Everything here is a pure
//! function of its inputs.

pub mod analysis;
pub mod chord;
pub mod element;
pub mod key;
pub mod note;
pub mod pitch;
pub mod roman;
pub mod scale;

pub use analysis::{analyze, identify, ChordAnalysis};
pub use chord::{build_chord, invert, Chord, ChordQuality};
pub use element::{Arpeggio, Element, Rest};
pub use key::{key_for_signature, normalize_spelling, Accidental, Cycle, KeyMode, SpellingContext};
pub use note::{Duration, Note};
pub use pitch::PitchClass;
pub use roman::{resolve, resolve_sequence, ResolvedChord};
pub use scale::{IntervalFormula, Mode, Scale, ScaleRegistry, ScaleType};
