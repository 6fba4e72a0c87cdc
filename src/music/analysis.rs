// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord recognition from a set of notes.
//!
//! The notes are deduplicated by pitch class, then rotated the same way
//! [`invert`] builds inversions. Each rotation is reduced to zero-based
//! semitone offsets and looked up in a table of root-position fingerprints.
//! The first rotation that matches names the root; a chord supplied out of
//! stacked order is retried after sorting by pitch.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{TheoryError, TheoryResult};
use crate::music::chord::{invert, ChordQuality};
use crate::music::note::Note;
use crate::music::pitch::PitchClass;

/// Root-position offsets of every quality
static FINGERPRINTS: LazyLock<HashMap<Vec<i32>, ChordQuality>> = LazyLock::new(|| {
    ChordQuality::ALL
        .iter()
        .map(|&quality| {
            let offsets = quality.intervals().iter().map(|&i| i as i32).collect();
            (offsets, quality)
        })
        .collect()
});

/// Quality whose root-position offsets are exactly `offsets`
pub fn fingerprint(offsets: &[i32]) -> Option<ChordQuality> {
    FINGERPRINTS.get(offsets).copied()
}

/// Result of analyzing a note set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordAnalysis {
    root: Note,
    quality: ChordQuality,
    rotation: usize,
    inversion: usize,
    notes: Vec<Note>,
    fallback: bool,
}

impl ChordAnalysis {
    pub fn root(&self) -> PitchClass {
        self.root.pitch()
    }

    /// Octave of the root-position chord the input voices
    pub fn octave(&self) -> i8 {
        self.root.octave()
    }

    /// Root as a note, carrying the first analyzed note's attributes
    pub fn root_note(&self) -> Note {
        self.root
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// Rotation of the deduplicated input that matched a fingerprint. For
    /// E-G-C this is 2: two notes had to wrap before C came first.
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// Inversion degree in the sense of [`invert`]: the number of chord tones
    /// moved above the root. For E-G-C this is 1, so rebuilding the chord
    /// and inverting by this degree gives the input voicing back.
    pub fn inversion(&self) -> usize {
        self.inversion
    }

    /// The matching rotation, root first
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// True when nothing matched and the major default was used
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl fmt::Display for ChordAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root.pitch(), self.quality.name())?;
        if self.inversion > 0 {
            write!(f, " (inversion {})", self.inversion)?;
        }
        if self.fallback {
            write!(f, " [unrecognized]")?;
        }
        Ok(())
    }
}

/// Keep the first note of each pitch class, in input order
fn dedup_by_pitch_class(notes: &[Note]) -> Vec<Note> {
    let mut seen = [false; 12];
    notes
        .iter()
        .filter(|n| {
            let chroma = n.pitch().chroma() as usize;
            !std::mem::replace(&mut seen[chroma], true)
        })
        .copied()
        .collect()
}

/// Zero-based semitone offsets of a voicing
fn offsets(notes: &[Note]) -> Vec<i32> {
    let lowest = notes
        .iter()
        .map(|n| n.absolute_semitone())
        .min()
        .unwrap_or(0);
    notes.iter().map(|n| n.absolute_semitone() - lowest).collect()
}

/// First rotation of `notes` whose offsets are a known fingerprint
fn match_rotation(notes: &[Note]) -> Option<(usize, ChordQuality, Vec<Note>)> {
    (0..notes.len()).find_map(|r| {
        let rotated = invert(notes, r);
        let offsets = offsets(&rotated);
        trace!(rotation = r, ?offsets, "trying rotation");
        fingerprint(&offsets).map(|quality| (r, quality, rotated))
    })
}

fn matched(rotation: usize, quality: ChordQuality, rotated: Vec<Note>) -> ChordAnalysis {
    let len = rotated.len();
    let inversion = (len - rotation) % len;
    // Wrapped notes gained an octave; undo it so the root sits where an
    // uninverted build would put it
    let lift = if inversion > 0 { 1 } else { 0 };
    let root = rotated[0].shift_octave(-lift);
    ChordAnalysis {
        root,
        quality,
        rotation,
        inversion,
        notes: rotated,
        fallback: false,
    }
}

fn search(notes: &[Note]) -> TheoryResult<Option<ChordAnalysis>> {
    let unique = dedup_by_pitch_class(notes);
    if unique.is_empty() {
        return Err(TheoryError::EmptyNoteSet);
    }

    if let Some((r, quality, rotated)) = match_rotation(&unique) {
        return Ok(Some(matched(r, quality, rotated)));
    }

    let mut sorted = unique;
    sorted.sort_by_key(|n| n.absolute_semitone());
    Ok(match_rotation(&sorted).map(|(r, quality, rotated)| matched(r, quality, rotated)))
}

/// Analyze a note set, falling back to a major chord on the first note when
/// nothing matches. The fallback is logged and flagged on the result.
/// Only an empty note set is an error.
pub fn analyze(notes: &[Note]) -> TheoryResult<ChordAnalysis> {
    if let Some(result) = search(notes)? {
        return Ok(result);
    }

    let unique = dedup_by_pitch_class(notes);
    let Some(&first) = unique.first() else {
        return Err(TheoryError::EmptyNoteSet);
    };
    warn!(
        notes = %describe(notes),
        root = %first.pitch(),
        "no chord fingerprint matched, assuming major"
    );
    Ok(ChordAnalysis {
        root: first,
        quality: ChordQuality::Major,
        rotation: 0,
        inversion: 0,
        notes: unique,
        fallback: true,
    })
}

/// Analyze a note set, failing when no chord matches
pub fn identify(notes: &[Note]) -> TheoryResult<ChordAnalysis> {
    search(notes)?.ok_or_else(|| TheoryError::UnrecognizedChord(describe(notes)))
}

fn describe(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::chord::build_chord;

    fn notes(text: &str) -> Vec<Note> {
        text.split_whitespace().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn test_root_position() {
        let result = analyze(&notes("C4 E4 G4")).unwrap();
        assert_eq!(result.root(), PitchClass::C);
        assert_eq!(result.quality(), ChordQuality::Major);
        assert_eq!(result.inversion(), 0);
        assert_eq!(result.rotation(), 0);
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_stacked_first_inversion() {
        let result = analyze(&notes("E4 G4 C5")).unwrap();
        assert_eq!(result.root(), PitchClass::C);
        assert_eq!(result.quality(), ChordQuality::Major);
        assert_eq!(result.rotation(), 2);
        assert_eq!(result.inversion(), 1);
        assert_eq!(result.octave(), 4);
        assert_eq!(result.notes(), notes("C5 E5 G5").as_slice());
    }

    #[test]
    fn test_doublings_ignored() {
        let result = analyze(&notes("A3 C4 E4 A4 C5")).unwrap();
        assert_eq!(result.root(), PitchClass::A);
        assert_eq!(result.quality(), ChordQuality::Minor);
        assert_eq!(result.inversion(), 0);
    }

    #[test]
    fn test_unsorted_input_is_sorted_and_retried() {
        let result = analyze(&notes("G4 C4 E4")).unwrap();
        assert_eq!(result.root(), PitchClass::C);
        assert_eq!(result.quality(), ChordQuality::Major);
        assert_eq!(result.inversion(), 0);
    }

    #[test]
    fn test_sevenths() {
        let result = analyze(&notes("G3 B3 D4 F4")).unwrap();
        assert_eq!(result.root(), PitchClass::G);
        assert_eq!(result.quality(), ChordQuality::DominantSeventh);

        let result = analyze(&notes("B3 D4 F4 A4")).unwrap();
        assert_eq!(result.quality(), ChordQuality::HalfDiminishedSeventh);
    }

    #[test]
    fn test_every_quality_in_root_position() {
        for quality in ChordQuality::ALL {
            for root in PitchClass::ALL {
                let result = analyze(&build_chord(root, quality, 0)).unwrap();
                assert_eq!(result.quality(), quality, "{root} {quality}");
                assert!(result.root().is_enharmonic(root), "{root} {quality}");
                assert_eq!(result.inversion(), 0);
            }
        }
    }

    #[test]
    fn test_fallback_for_clusters() {
        let result = analyze(&notes("C4 C#4 D4")).unwrap();
        assert!(result.is_fallback());
        assert_eq!(result.root(), PitchClass::C);
        assert_eq!(result.quality(), ChordQuality::Major);
        assert_eq!(result.inversion(), 0);

        let single = analyze(&notes("F#3")).unwrap();
        assert!(single.is_fallback());
        assert_eq!(single.root(), PitchClass::Fs);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(analyze(&[]), Err(TheoryError::EmptyNoteSet));
        assert_eq!(identify(&[]), Err(TheoryError::EmptyNoteSet));
    }

    #[test]
    fn test_identify_is_strict() {
        assert_eq!(
            identify(&notes("C4 D4")),
            Err(TheoryError::UnrecognizedChord("C4 D4".to_string()))
        );
        assert_eq!(identify(&notes("D4 F#4 A4")).unwrap().root(), PitchClass::D);
    }

    #[test]
    fn test_fingerprint_lookup() {
        assert_eq!(fingerprint(&[0, 4, 7]), Some(ChordQuality::Major));
        assert_eq!(fingerprint(&[0, 3, 6, 9]), Some(ChordQuality::DiminishedSeventh));
        assert_eq!(fingerprint(&[0, 5, 7]), None);
    }
    #[test]
    fn test_analysis_yaml_round_trip() {
        let result = analyze(&notes("Bb3 D4 F4 G#4")).unwrap();
        let yaml = serde_yaml::to_string(&result).unwrap();
        let parsed: ChordAnalysis = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, result);
    }
}
