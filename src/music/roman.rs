// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Roman-numeral chord symbols resolved against a key.
//!
//! Uppercase numerals are major-based, lowercase minor-based. Suffixes pick
//! the rest of the qualities: `0`/`°` diminished, `+` augmented, `7`,
//! `maj7`, `07`/`°7` diminished seventh, `ø7` half-diminished seventh,
//! `+7` and `+maj7`.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TheoryError, TheoryResult};
use crate::music::chord::{Chord, ChordQuality};
use crate::music::note::Note;
use crate::music::pitch::PitchClass;
use crate::music::scale::{Scale, ScaleType};

const UPPER: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
const LOWER: [&str; 7] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];

/// Suffix table for uppercase numerals
const MAJOR_SUFFIXES: [(&str, ChordQuality); 11] = [
    ("", ChordQuality::Major),
    ("0", ChordQuality::Diminished),
    ("°", ChordQuality::Diminished),
    ("+", ChordQuality::Augmented),
    ("7", ChordQuality::DominantSeventh),
    ("maj7", ChordQuality::MajorSeventh),
    ("07", ChordQuality::DiminishedSeventh),
    ("°7", ChordQuality::DiminishedSeventh),
    ("ø7", ChordQuality::HalfDiminishedSeventh),
    ("+7", ChordQuality::AugmentedSeventh),
    ("+maj7", ChordQuality::AugmentedMajorSeventh),
];

/// Suffix table for lowercase numerals
const MINOR_SUFFIXES: [(&str, ChordQuality); 11] = [
    ("", ChordQuality::Minor),
    ("0", ChordQuality::Diminished),
    ("°", ChordQuality::Diminished),
    ("+", ChordQuality::Augmented),
    ("7", ChordQuality::MinorSeventh),
    ("maj7", ChordQuality::MinorMajorSeventh),
    ("07", ChordQuality::DiminishedSeventh),
    ("°7", ChordQuality::DiminishedSeventh),
    ("ø7", ChordQuality::HalfDiminishedSeventh),
    ("+7", ChordQuality::AugmentedSeventh),
    ("+maj7", ChordQuality::AugmentedMajorSeventh),
];

/// Symbol -> (zero-based degree, quality)
static SYMBOLS: LazyLock<HashMap<String, (usize, ChordQuality)>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for (numerals, suffixes) in [(UPPER, MAJOR_SUFFIXES), (LOWER, MINOR_SUFFIXES)] {
        for (degree, numeral) in numerals.iter().enumerate() {
            for (suffix, quality) in suffixes {
                table.insert(format!("{numeral}{suffix}"), (degree, quality));
            }
        }
    }
    table
});

/// Zero-based scale degree and quality of a numeral symbol
pub fn lookup(symbol: &str) -> TheoryResult<(usize, ChordQuality)> {
    SYMBOLS
        .get(symbol.trim())
        .copied()
        .ok_or_else(|| TheoryError::UnknownNumeral(symbol.to_string()))
}

pub fn is_known(symbol: &str) -> bool {
    SYMBOLS.contains_key(symbol.trim())
}

/// Every known symbol, sorted
pub fn symbols() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = SYMBOLS.keys().map(String::as_str).collect();
    all.sort_unstable();
    all
}

/// A numeral resolved to a concrete chord root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedChord {
    pub symbol: String,
    pub root: PitchClass,
    pub octave: i8,
    pub quality: ChordQuality,
}

impl ResolvedChord {
    pub fn root_note(&self) -> Note {
        Note::new(self.root, self.octave)
    }

    /// Build the root-position chord
    pub fn to_chord(&self) -> Chord {
        Chord::new(self.root, self.quality, self.octave)
    }
}

impl fmt::Display for ResolvedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}{}", self.symbol, self.root, self.quality.symbol())
    }
}

/// Resolve a numeral in `key`: build the scale at `octave` and pair the
/// numeral's degree with its quality
pub fn resolve(
    symbol: &str,
    key: PitchClass,
    octave: i8,
    scale_type: ScaleType,
) -> TheoryResult<ResolvedChord> {
    resolve_in(symbol, &Scale::new(key, scale_type, octave))
}

/// Resolve a numeral against an already built scale
pub fn resolve_in(symbol: &str, scale: &Scale) -> TheoryResult<ResolvedChord> {
    let (degree, quality) = lookup(symbol)?;
    let note = scale
        .notes()
        .get(degree)
        .ok_or(TheoryError::DegreeOutOfRange {
            degree: degree + 1,
            len: scale.len(),
        })?;
    debug!(symbol, scale = %scale, root = %note, %quality, "resolved numeral");
    Ok(ResolvedChord {
        symbol: symbol.trim().to_string(),
        root: note.pitch(),
        octave: note.octave(),
        quality,
    })
}

/// Resolve a progression in order, stopping at the first bad symbol
pub fn resolve_sequence<S: AsRef<str>>(
    symbols: &[S],
    key: PitchClass,
    octave: i8,
    scale_type: ScaleType,
) -> TheoryResult<Vec<ResolvedChord>> {
    let scale = Scale::new(key, scale_type, octave);
    symbols
        .iter()
        .map(|symbol| resolve_in(symbol.as_ref(), &scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_seventh_in_g() {
        let chord = resolve("V7", PitchClass::G, 0, ScaleType::Major).unwrap();
        assert_eq!(chord.root, PitchClass::D);
        assert_eq!(chord.octave, 1);
        assert_eq!(chord.quality, ChordQuality::DominantSeventh);
    }

    #[test]
    fn test_case_selects_quality() {
        assert_eq!(lookup("IV"), Ok((3, ChordQuality::Major)));
        assert_eq!(lookup("iv"), Ok((3, ChordQuality::Minor)));
        assert_eq!(lookup("ii7"), Ok((1, ChordQuality::MinorSeventh)));
        assert_eq!(lookup("Imaj7"), Ok((0, ChordQuality::MajorSeventh)));
        assert_eq!(lookup("imaj7"), Ok((0, ChordQuality::MinorMajorSeventh)));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(lookup("vii0"), Ok((6, ChordQuality::Diminished)));
        assert_eq!(lookup("vii°"), Ok((6, ChordQuality::Diminished)));
        assert_eq!(lookup("viiø7"), Ok((6, ChordQuality::HalfDiminishedSeventh)));
        assert_eq!(lookup("vii°7"), Ok((6, ChordQuality::DiminishedSeventh)));
        assert_eq!(lookup("III+"), Ok((2, ChordQuality::Augmented)));
        assert_eq!(lookup("III+maj7"), Ok((2, ChordQuality::AugmentedMajorSeventh)));
    }

    #[test]
    fn test_unknown_numeral() {
        assert_eq!(lookup("VIII"), Err(TheoryError::UnknownNumeral("VIII".to_string())));
        assert!(!is_known("Vsus4"));
        assert!(is_known(" V "));
    }

    #[test]
    fn test_degree_out_of_range() {
        let result = resolve("VI", PitchClass::C, 4, ScaleType::MajorPentatonic);
        assert_eq!(result, Err(TheoryError::DegreeOutOfRange { degree: 6, len: 5 }));
    }

    #[test]
    fn test_resolve_in_minor_key() {
        let chord = resolve("III", PitchClass::A, 3, ScaleType::NaturalMinor).unwrap();
        assert_eq!(chord.root, PitchClass::C);
        assert_eq!(chord.octave, 4);
        assert_eq!(chord.quality, ChordQuality::Major);
    }

    #[test]
    fn test_resolve_sequence_preserves_order() {
        let chords = resolve_sequence(&["ii7", "V7", "Imaj7"], PitchClass::C, 4, ScaleType::Major).unwrap();
        let roots: Vec<PitchClass> = chords.iter().map(|c| c.root).collect();
        assert_eq!(roots, [PitchClass::D, PitchClass::G, PitchClass::C]);
        assert_eq!(chords[1].to_chord().to_string(), "G7");
    }

    #[test]
    fn test_resolve_sequence_fails_fast() {
        let result = resolve_sequence(&["I", "X", "V"], PitchClass::C, 4, ScaleType::Major);
        assert_eq!(result, Err(TheoryError::UnknownNumeral("X".to_string())));
    }

    #[test]
    fn test_flat_key_spelling() {
        let chord = resolve("IV", PitchClass::F, 4, ScaleType::Major).unwrap();
        assert_eq!(chord.root, PitchClass::Bb);
        assert_eq!(chord.to_string(), "IV = Bb");
    }

    #[test]
    fn test_symbol_table_size() {
        assert_eq!(symbols().len(), 7 * 2 * MAJOR_SUFFIXES.len());
    }
}
