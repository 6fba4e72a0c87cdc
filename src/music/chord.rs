// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord construction, inversion and voicing.
//!
//! Chords are built with the same machinery as scales: the quality's interval
//! table is picked out of the chromatic octaves above the root. A [`Chord`]
//! value carries its root-position notes plus inversion, slash bass,
//! additions and omissions; [`Chord::to_notes`] resolves them into the final
//! voicing. Every modifier returns a new value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{TheoryError, TheoryResult};
use crate::music::analysis::{self, ChordAnalysis};
use crate::music::key::SpellingContext;
use crate::music::note::Note;
use crate::music::pitch::PitchClass;
use crate::music::scale::{note_names, realize};

/// Seventh intervals stacked on a triad
pub const MINOR_SEVENTH: u8 = 10;
pub const MAJOR_SEVENTH: u8 = 11;
pub const DIMINISHED_SEVENTH: u8 = 9;

const TRIAD_DEGREES: [u8; 3] = [1, 3, 5];
const SEVENTH_DEGREES: [u8; 4] = [1, 3, 5, 7];

const LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Chord qualities: four triads and eight seventh chords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    HalfDiminishedSeventh,
    DiminishedSeventh,
    MinorMajorSeventh,
    AugmentedMajorSeventh,
    AugmentedSeventh,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 12] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::DominantSeventh,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::HalfDiminishedSeventh,
        ChordQuality::DiminishedSeventh,
        ChordQuality::MinorMajorSeventh,
        ChordQuality::AugmentedMajorSeventh,
        ChordQuality::AugmentedSeventh,
    ];

    /// Semitone offsets from the root in root position
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::DominantSeventh => &[0, 4, 7, MINOR_SEVENTH],
            ChordQuality::MajorSeventh => &[0, 4, 7, MAJOR_SEVENTH],
            ChordQuality::MinorSeventh => &[0, 3, 7, MINOR_SEVENTH],
            ChordQuality::HalfDiminishedSeventh => &[0, 3, 6, MINOR_SEVENTH],
            ChordQuality::DiminishedSeventh => &[0, 3, 6, DIMINISHED_SEVENTH],
            ChordQuality::MinorMajorSeventh => &[0, 3, 7, MAJOR_SEVENTH],
            ChordQuality::AugmentedMajorSeventh => &[0, 4, 8, MAJOR_SEVENTH],
            ChordQuality::AugmentedSeventh => &[0, 4, 8, MINOR_SEVENTH],
        }
    }

    /// The triad a seventh chord is stacked on (itself for triads)
    pub fn triad(self) -> ChordQuality {
        match self {
            ChordQuality::DominantSeventh | ChordQuality::MajorSeventh => ChordQuality::Major,
            ChordQuality::MinorSeventh | ChordQuality::MinorMajorSeventh => ChordQuality::Minor,
            ChordQuality::HalfDiminishedSeventh | ChordQuality::DiminishedSeventh => {
                ChordQuality::Diminished
            }
            ChordQuality::AugmentedMajorSeventh | ChordQuality::AugmentedSeventh => {
                ChordQuality::Augmented
            }
            triad => triad,
        }
    }

    /// The seventh interval above the root, for seventh chords
    pub fn seventh(self) -> Option<u8> {
        self.intervals().get(3).copied()
    }

    pub fn is_seventh(self) -> bool {
        self.seventh().is_some()
    }

    /// Number of chord tones
    pub fn len(self) -> usize {
        self.intervals().len()
    }

    /// Scale degree of each chord tone: `[1, 3, 5]` or `[1, 3, 5, 7]`
    pub fn degrees(self) -> &'static [u8] {
        if self.is_seventh() {
            &SEVENTH_DEGREES
        } else {
            &TRIAD_DEGREES
        }
    }

    /// Chord-symbol suffix (`""`, `m`, `dim`, `maj7`, ...)
    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::HalfDiminishedSeventh => "m7b5",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::MinorMajorSeventh => "mM7",
            ChordQuality::AugmentedMajorSeventh => "augmaj7",
            ChordQuality::AugmentedSeventh => "aug7",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            ChordQuality::DominantSeventh => "dominant seventh",
            ChordQuality::MajorSeventh => "major seventh",
            ChordQuality::MinorSeventh => "minor seventh",
            ChordQuality::HalfDiminishedSeventh => "half-diminished seventh",
            ChordQuality::DiminishedSeventh => "diminished seventh",
            ChordQuality::MinorMajorSeventh => "minor-major seventh",
            ChordQuality::AugmentedMajorSeventh => "augmented major seventh",
            ChordQuality::AugmentedSeventh => "augmented seventh",
        }
    }

    /// Parse a quality symbol, falling back to major for anything unknown.
    /// The fallback is reported as a warning.
    pub fn from_symbol_or_major(symbol: &str) -> ChordQuality {
        symbol.parse().unwrap_or_else(|_| {
            warn!(symbol, "unrecognized chord quality, using major");
            ChordQuality::Major
        })
    }
}

impl FromStr for ChordQuality {
    type Err = TheoryError;

    /// Strict parse. Symbols are case-sensitive (`M7` is major seventh,
    /// `m7` minor seventh); spelled-out names are not.
    fn from_str(s: &str) -> TheoryResult<Self> {
        let quality = match s.trim() {
            "" | "M" | "maj" => ChordQuality::Major,
            "m" | "min" | "-" => ChordQuality::Minor,
            "dim" | "o" | "°" => ChordQuality::Diminished,
            "aug" | "+" => ChordQuality::Augmented,
            "7" | "dom7" => ChordQuality::DominantSeventh,
            "maj7" | "M7" | "Δ7" | "Δ" => ChordQuality::MajorSeventh,
            "m7" | "min7" | "-7" => ChordQuality::MinorSeventh,
            "m7b5" | "ø7" | "ø" | "min7b5" => ChordQuality::HalfDiminishedSeventh,
            "dim7" | "o7" | "°7" => ChordQuality::DiminishedSeventh,
            "mM7" | "mmaj7" | "minmaj7" | "m(maj7)" => ChordQuality::MinorMajorSeventh,
            "augmaj7" | "+maj7" | "maj7#5" | "+M7" => ChordQuality::AugmentedMajorSeventh,
            "aug7" | "+7" | "7#5" => ChordQuality::AugmentedSeventh,
            other => {
                let normalized = other.to_lowercase().replace([' ', '-'], "_");
                match normalized.as_str() {
                    "major" => ChordQuality::Major,
                    "minor" => ChordQuality::Minor,
                    "diminished" => ChordQuality::Diminished,
                    "augmented" => ChordQuality::Augmented,
                    "dominant_seventh" | "dominant7" => ChordQuality::DominantSeventh,
                    "major_seventh" | "major7" => ChordQuality::MajorSeventh,
                    "minor_seventh" | "minor7" => ChordQuality::MinorSeventh,
                    "half_diminished_seventh" | "half_diminished7" => {
                        ChordQuality::HalfDiminishedSeventh
                    }
                    "diminished_seventh" | "diminished7" => ChordQuality::DiminishedSeventh,
                    "minor_major_seventh" | "minor_major7" => ChordQuality::MinorMajorSeventh,
                    "augmented_major_seventh" | "augmented_major7" => {
                        ChordQuality::AugmentedMajorSeventh
                    }
                    "augmented_seventh" | "augmented7" => ChordQuality::AugmentedSeventh,
                    _ => return Err(TheoryError::UnknownQuality(s.to_string())),
                }
            }
        };
        Ok(quality)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Spelling for a chord on `root`. An accidental on the root decides it;
/// for natural roots the context that spells more tones on their stacked
/// letter wins (C minor takes Eb over D#), ties going to the root's key.
fn chord_spelling(root: PitchClass, quality: ChordQuality) -> SpellingContext {
    if root.is_sharp() {
        return SpellingContext::Normal;
    }
    if root.is_flat() {
        return SpellingContext::Flat;
    }

    let root_letter = LETTERS.iter().position(|&l| l == root.letter()).unwrap_or(0);
    let stacked = |context: SpellingContext| {
        quality
            .intervals()
            .iter()
            .zip(quality.degrees())
            .filter(|&(&offset, &degree)| {
                let pc = PitchClass::from_chroma(root.chroma() + offset, context);
                pc.letter() == LETTERS[(root_letter + degree as usize - 1) % 7]
            })
            .count()
    };

    let preferred = SpellingContext::for_key(root);
    let other = match preferred {
        SpellingContext::Normal => SpellingContext::Flat,
        SpellingContext::Flat => SpellingContext::Normal,
    };
    if stacked(other) > stacked(preferred) {
        other
    } else {
        preferred
    }
}

/// Root-position chord tones for `quality` on `root` at `octave`
pub fn build_chord(root: PitchClass, quality: ChordQuality, octave: i8) -> Vec<Note> {
    build_chord_from(Note::new(root, octave), quality)
}

/// Root-position chord tones above a root note, keeping its attributes
pub fn build_chord_from(root: Note, quality: ChordQuality) -> Vec<Note> {
    let context = chord_spelling(root.pitch(), quality);
    let notes = realize(root, quality.intervals(), context);
    debug!(root = %root, %quality, ?context, "built chord");
    notes
}

/// Invert a voicing: the first `degree` notes move to the top, each one
/// octave higher. `degree` 0 is the identity; degrees past the note count
/// keep cycling, lifting every note another octave per full turn.
pub fn invert(notes: &[Note], degree: usize) -> Vec<Note> {
    if notes.is_empty() {
        return Vec::new();
    }
    // Octaves saturate at the top of the i8 range
    let turns = i8::try_from(degree / notes.len()).unwrap_or(i8::MAX);
    let split = degree % notes.len();
    notes[split..]
        .iter()
        .map(|n| n.shift_octave(turns))
        .chain(notes[..split].iter().map(|n| n.shift_octave(turns.saturating_add(1))))
        .collect()
}

/// A chord: root, quality and root-position tones, plus voicing modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChordData")]
pub struct Chord {
    root: PitchClass,
    quality: ChordQuality,
    notes: Vec<Note>,
    inversion: usize,
    bass: Option<Note>,
    additions: Vec<Note>,
    omissions: Vec<u8>,
}

/// Unchecked chord fields as read from a document
#[derive(Deserialize)]
struct ChordData {
    root: PitchClass,
    quality: ChordQuality,
    notes: Vec<Note>,
    #[serde(default)]
    inversion: usize,
    #[serde(default)]
    bass: Option<Note>,
    #[serde(default)]
    additions: Vec<Note>,
    #[serde(default)]
    omissions: Vec<u8>,
}

impl TryFrom<ChordData> for Chord {
    type Error = TheoryError;

    /// Root-position tones must spell the quality's intervals above the root
    fn try_from(data: ChordData) -> TheoryResult<Self> {
        let intervals = data.quality.intervals();
        let consistent = data.notes.first().map(|n| n.pitch()) == Some(data.root)
            && data.notes.len() == intervals.len()
            && data.notes.iter().zip(intervals).all(|(note, &interval)| {
                note.absolute_semitone() - data.notes[0].absolute_semitone() == interval as i32
            });
        if !consistent {
            return Err(TheoryError::InconsistentNotes(note_names(&data.notes)));
        }
        Ok(Chord {
            root: data.root,
            quality: data.quality,
            notes: data.notes,
            inversion: data.inversion,
            bass: data.bass,
            additions: data.additions,
            omissions: data.omissions,
        })
    }
}

impl Chord {
    /// Root-position chord of `quality` on `root` at `octave`
    pub fn new(root: PitchClass, quality: ChordQuality, octave: i8) -> Self {
        Chord::from_root_note(Note::new(root, octave), quality)
    }

    /// Root-position chord above a root note, keeping its attributes
    pub fn from_root_note(root: Note, quality: ChordQuality) -> Self {
        let notes = build_chord_from(root, quality);
        Self {
            root: notes.first().map(|n| n.pitch()).unwrap_or(root.pitch()),
            quality,
            notes,
            inversion: 0,
            bass: None,
            additions: Vec::new(),
            omissions: Vec::new(),
        }
    }

    /// Chord from a quality symbol; unknown symbols build a major chord
    pub fn named(root: PitchClass, symbol: &str, octave: i8) -> Self {
        Chord::new(root, ChordQuality::from_symbol_or_major(symbol), octave)
    }

    /// Infer the chord a set of notes spells. Unmatched note sets become the
    /// documented major fallback on the first note.
    pub fn from_notes(notes: &[Note]) -> TheoryResult<Self> {
        analysis::analyze(notes).map(|result| Chord::from_analysis(&result))
    }

    /// Rebuild the chord an analysis describes, inverted as analyzed
    pub fn from_analysis(result: &ChordAnalysis) -> Self {
        Chord::from_root_note(result.root_note(), result.quality()).with_inversion(result.inversion())
    }

    /// Parse a chord symbol such as `C`, `F#m7`, `Bbmaj7`, `Am/E`.
    /// The root sits at `octave`; a slash bass one octave below.
    pub fn parse(symbol: &str, octave: i8) -> TheoryResult<Self> {
        let trimmed = symbol.trim();
        let (head, bass) = match trimmed.split_once('/') {
            Some((head, bass)) => (head, Some(bass)),
            None => (trimmed, None),
        };

        let root_len = root_prefix_len(head)
            .ok_or_else(|| TheoryError::InvalidPitchClass(head.to_string()))?;
        let root: PitchClass = head[..root_len].parse()?;
        let quality: ChordQuality = head[root_len..].parse()?;

        let chord = Chord::new(root, quality, octave);
        match bass {
            Some(bass) => {
                let bass: PitchClass = bass.parse()?;
                Ok(chord.with_bass(Note::new(bass, octave.saturating_sub(1))))
            }
            None => Ok(chord),
        }
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// Root-position tones, exactly the quality's interval table
    pub fn base_notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn inversion(&self) -> usize {
        self.inversion
    }

    pub fn bass(&self) -> Option<Note> {
        self.bass
    }

    pub fn additions(&self) -> &[Note] {
        &self.additions
    }

    pub fn omissions(&self) -> &[u8] {
        &self.omissions
    }

    pub fn with_inversion(&self, inversion: usize) -> Self {
        Self {
            inversion,
            ..self.clone()
        }
    }

    pub fn with_bass(&self, bass: Note) -> Self {
        Self {
            bass: Some(bass),
            ..self.clone()
        }
    }

    pub fn with_additions(&self, additions: &[Note]) -> Self {
        Self {
            additions: additions.to_vec(),
            ..self.clone()
        }
    }

    /// Drop chord tones by scale degree (`5` removes the fifth)
    pub fn with_omissions(&self, degrees: &[u8]) -> Self {
        Self {
            omissions: degrees.to_vec(),
            ..self.clone()
        }
    }

    /// Resolve the final voicing.
    ///
    /// Omitted degrees are dropped from the root-position tones, the rest
    /// are inverted, a slash bass is placed at the bottom, and additions are
    /// appended last.
    pub fn to_notes(&self) -> Vec<Note> {
        let degrees = self.quality.degrees();
        for degree in &self.omissions {
            if !degrees.contains(degree) {
                debug!(degree, quality = %self.quality, "omitted degree not in chord");
            }
        }

        let kept: Vec<Note> = self
            .notes
            .iter()
            .zip(degrees)
            .filter(|(_, degree)| !self.omissions.contains(degree))
            .map(|(note, _)| *note)
            .collect();

        let mut voiced = invert(&kept, self.inversion);
        if let Some(bass) = self.bass {
            voiced = place_bass(voiced, bass);
        }
        voiced.extend(self.additions.iter().copied());
        voiced
    }
}

/// Length of the root spelling at the start of a chord symbol
fn root_prefix_len(head: &str) -> Option<usize> {
    let mut chars = head.char_indices();
    let (_, letter) = chars.next()?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    match chars.next() {
        Some((i, c)) if matches!(c, '#' | 'b' | '♯' | '♭') => Some(i + c.len_utf8()),
        Some((i, _)) => Some(i),
        None => Some(head.len()),
    }
}

/// Put `bass` at the bottom of a voicing. A bass that is a chord tone is
/// reached by inverting, then the voicing moves by whole octaves so that
/// tone sounds at the bass note's pitch; any other bass is prepended below
/// the lowest tone.
fn place_bass(notes: Vec<Note>, bass: Note) -> Vec<Note> {
    if let Some(position) = notes.iter().position(|n| n.pitch().is_enharmonic(bass.pitch())) {
        let voiced = invert(&notes, position);
        let lift = voiced.first().map_or(0, |lowest| {
            (bass.absolute_semitone() - lowest.absolute_semitone()).div_euclid(12)
        });
        let lift = lift.clamp(i8::MIN as i32, i8::MAX as i32) as i8;
        return voiced.into_iter().map(|n| n.shift_octave(lift)).collect();
    }

    let Some(lowest) = notes.iter().map(|n| n.absolute_semitone()).min() else {
        return vec![bass];
    };
    let mut placed = bass;
    while placed.absolute_semitone() >= lowest {
        placed = placed.shift_octave(-1);
    }
    while placed.absolute_semitone() + 12 < lowest {
        placed = placed.shift_octave(1);
    }

    let mut voiced = Vec::with_capacity(notes.len() + 1);
    voiced.push(placed);
    voiced.extend(notes);
    voiced
}

impl fmt::Display for Chord {
    /// Chord symbol; the slash shows an explicit bass, or the bottom tone of
    /// an inverted voicing
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality.symbol())?;
        let slash = match self.bass {
            Some(bass) => Some(bass.pitch()),
            None if self.inversion % self.notes.len().max(1) != 0 => {
                self.to_notes().first().map(|n| n.pitch())
            }
            None => None,
        };
        match slash {
            Some(pc) => write!(f, "/{pc}"),
            None => Ok(()),
        }
    }
}
