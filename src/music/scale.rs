// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale construction from interval formulas.
//!
//! A scale is realized by walking one chromatic octave up from the root and
//! picking the formula's offsets out of it; offsets of 12 or more land in the
//! following octaves. The result is then spelled consistently with sharps or
//! flats. Modes are derived from the major formula by rotation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TheoryError, TheoryResult};
use crate::music::key::{next_by_interval, Cycle, SpellingContext};
use crate::music::note::Note;
use crate::music::pitch::PitchClass;

/// The major (Ionian) formula every diatonic mode rotates from
pub const MAJOR_FORMULA: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Semitone offsets from a root: starts at 0, strictly increasing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct IntervalFormula(Vec<u8>);

impl IntervalFormula {
    /// Validate and wrap a list of offsets
    pub fn new(offsets: Vec<u8>) -> TheoryResult<Self> {
        let starts_at_zero = offsets.first() == Some(&0);
        let increasing = offsets.windows(2).all(|w| w[0] < w[1]);
        if !starts_at_zero || !increasing {
            return Err(TheoryError::InvalidFormula(offsets));
        }
        Ok(IntervalFormula(offsets))
    }

    /// Wrap a formula known to be valid
    pub(crate) fn from_static(offsets: &[u8]) -> Self {
        IntervalFormula(offsets.to_vec())
    }

    pub fn offsets(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Octave span the formula occupies (12 for single-octave formulas)
    fn span(&self) -> u8 {
        let last = self.0.last().copied().unwrap_or(0);
        (last / 12 + 1).saturating_mul(12)
    }

    /// Rotate left by `degree` positions and re-zero.
    ///
    /// Offsets that wrap to the back gain one span (an octave for
    /// single-octave formulas), then the new first offset is subtracted from
    /// all of them. Rotating the major formula by 1 gives Dorian, by 5 the
    /// natural minor.
    pub fn rotate_zero(&self, degree: usize) -> IntervalFormula {
        if self.0.is_empty() {
            return self.clone();
        }
        let degree = degree % self.0.len();
        let span = self.span() as u16;
        let rotated: Vec<u16> = self.0[degree..]
            .iter()
            .map(|&o| o as u16)
            .chain(self.0[..degree].iter().map(|&o| o as u16 + span))
            .collect();
        let first = rotated[0];
        IntervalFormula(rotated.iter().map(|&o| (o - first) as u8).collect())
    }
}

impl TryFrom<Vec<u8>> for IntervalFormula {
    type Error = TheoryError;

    fn try_from(offsets: Vec<u8>) -> TheoryResult<Self> {
        IntervalFormula::new(offsets)
    }
}

impl From<IntervalFormula> for Vec<u8> {
    fn from(formula: IntervalFormula) -> Vec<u8> {
        formula.0
    }
}

/// Rotate a formula left by `degree`, wrapped offsets gaining an octave,
/// and re-zero it. See [`IntervalFormula::rotate_zero`].
pub fn rotate_zero(formula: &[u8], degree: usize) -> TheoryResult<Vec<u8>> {
    IntervalFormula::new(formula.to_vec()).map(|f| f.rotate_zero(degree).0)
}

/// The seven diatonic modes, indexed by rotation of the major formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Rotation index into the major formula (Ionian = 0, Aeolian = 5)
    pub fn index(self) -> usize {
        match self {
            Mode::Ionian => 0,
            Mode::Dorian => 1,
            Mode::Phrygian => 2,
            Mode::Lydian => 3,
            Mode::Mixolydian => 4,
            Mode::Aeolian => 5,
            Mode::Locrian => 6,
        }
    }

    pub fn formula(self) -> IntervalFormula {
        IntervalFormula::from_static(&MAJOR_FORMULA).rotate_zero(self.index())
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ionian" | "major" => Some(Mode::Ionian),
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "aeolian" | "minor" => Some(Mode::Aeolian),
            "locrian" => Some(Mode::Locrian),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }

    /// Spelling for this mode on `key`, taken from its parent major key.
    /// An accidental on the tonic itself wins.
    fn spelling(self, key: PitchClass) -> SpellingContext {
        if key.is_sharp() {
            return SpellingContext::Normal;
        }
        if key.is_flat() {
            return SpellingContext::Flat;
        }
        let parent = (key.chroma() + 12 - MAJOR_FORMULA[self.index()]) % 12;
        // Db, Eb, F, Ab and Bb major
        if matches!(parent, 1 | 3 | 5 | 8 | 10) {
            SpellingContext::Flat
        } else {
            SpellingContext::Normal
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Scale types supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    // Major scale and modes
    Major,        // Ionian
    Dorian,       // Minor with raised 6th
    Phrygian,     // Minor with lowered 2nd
    Lydian,       // Major with raised 4th
    Mixolydian,   // Major with lowered 7th
    NaturalMinor, // Aeolian
    Locrian,      // Diminished

    // Other minor scales
    HarmonicMinor,
    MelodicMinor, // Ascending form

    // Pentatonic scales
    MajorPentatonic,
    MinorPentatonic,

    // Blues
    Blues,
    MajorBlues,

    // Other common scales
    WholeTone,
    Diminished,   // Half-whole
    DiminishedWH, // Whole-half
    Chromatic,
}

impl ScaleType {
    pub const ALL: [ScaleType; 17] = [
        ScaleType::Major,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::NaturalMinor,
        ScaleType::Locrian,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
        ScaleType::MajorPentatonic,
        ScaleType::MinorPentatonic,
        ScaleType::Blues,
        ScaleType::MajorBlues,
        ScaleType::WholeTone,
        ScaleType::Diminished,
        ScaleType::DiminishedWH,
        ScaleType::Chromatic,
    ];

    /// The diatonic mode this type rotates from, if any
    pub fn mode(self) -> Option<Mode> {
        match self {
            ScaleType::Major => Some(Mode::Ionian),
            ScaleType::Dorian => Some(Mode::Dorian),
            ScaleType::Phrygian => Some(Mode::Phrygian),
            ScaleType::Lydian => Some(Mode::Lydian),
            ScaleType::Mixolydian => Some(Mode::Mixolydian),
            ScaleType::NaturalMinor => Some(Mode::Aeolian),
            ScaleType::Locrian => Some(Mode::Locrian),
            _ => None,
        }
    }

    /// Get the interval formula for this scale type
    pub fn formula(self) -> IntervalFormula {
        if let Some(mode) = self.mode() {
            return mode.formula();
        }
        let offsets: &[u8] = match self {
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            ScaleType::MajorPentatonic => &[0, 2, 4, 7, 9],
            ScaleType::MinorPentatonic => &[0, 3, 5, 7, 10],
            ScaleType::Blues => &[0, 3, 5, 6, 7, 10],
            ScaleType::MajorBlues => &[0, 2, 3, 4, 7, 9],
            ScaleType::WholeTone => &[0, 2, 4, 6, 8, 10],
            ScaleType::Diminished => &[0, 1, 3, 4, 6, 7, 9, 10],
            ScaleType::DiminishedWH => &[0, 2, 3, 5, 6, 8, 9, 11],
            _ => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        };
        IntervalFormula::from_static(offsets)
    }

    /// Parse scale type from string
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" | "ionian" => Some(ScaleType::Major),
            "dorian" => Some(ScaleType::Dorian),
            "phrygian" => Some(ScaleType::Phrygian),
            "lydian" => Some(ScaleType::Lydian),
            "mixolydian" => Some(ScaleType::Mixolydian),
            "minor" | "naturalminor" | "aeolian" => Some(ScaleType::NaturalMinor),
            "locrian" => Some(ScaleType::Locrian),
            "harmonicminor" => Some(ScaleType::HarmonicMinor),
            "melodicminor" => Some(ScaleType::MelodicMinor),
            "majorpentatonic" | "pentatonicmajor" | "pentatonic" => {
                Some(ScaleType::MajorPentatonic)
            }
            "minorpentatonic" | "pentatonicminor" => Some(ScaleType::MinorPentatonic),
            "blues" | "minorblues" => Some(ScaleType::Blues),
            "majorblues" => Some(ScaleType::MajorBlues),
            "wholetone" => Some(ScaleType::WholeTone),
            "diminished" | "octatonic" | "halfwhole" => Some(ScaleType::Diminished),
            "diminishedwh" | "wholehalf" => Some(ScaleType::DiminishedWH),
            "chromatic" => Some(ScaleType::Chromatic),
            _ => None,
        }
    }

    /// Lookup name, as accepted by [`ScaleType::from_str`] and config files
    pub fn id(self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Dorian => "dorian",
            ScaleType::Phrygian => "phrygian",
            ScaleType::Lydian => "lydian",
            ScaleType::Mixolydian => "mixolydian",
            ScaleType::NaturalMinor => "minor",
            ScaleType::Locrian => "locrian",
            ScaleType::HarmonicMinor => "harmonic_minor",
            ScaleType::MelodicMinor => "melodic_minor",
            ScaleType::MajorPentatonic => "major_pentatonic",
            ScaleType::MinorPentatonic => "minor_pentatonic",
            ScaleType::Blues => "blues",
            ScaleType::MajorBlues => "major_blues",
            ScaleType::WholeTone => "whole_tone",
            ScaleType::Diminished => "diminished",
            ScaleType::DiminishedWH => "diminished_wh",
            ScaleType::Chromatic => "chromatic",
        }
    }

    /// Get a human-readable name for this scale type
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Dorian => "Dorian",
            ScaleType::Phrygian => "Phrygian",
            ScaleType::Lydian => "Lydian",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::NaturalMinor => "Natural Minor",
            ScaleType::Locrian => "Locrian",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::MelodicMinor => "Melodic Minor",
            ScaleType::MajorPentatonic => "Major Pentatonic",
            ScaleType::MinorPentatonic => "Minor Pentatonic",
            ScaleType::Blues => "Blues",
            ScaleType::MajorBlues => "Major Blues",
            ScaleType::WholeTone => "Whole Tone",
            ScaleType::Diminished => "Diminished",
            ScaleType::DiminishedWH => "Diminished (W-H)",
            ScaleType::Chromatic => "Chromatic",
        }
    }

    /// Get the parallel minor/major scale type
    pub fn parallel(self) -> Option<Self> {
        match self {
            ScaleType::Major => Some(ScaleType::NaturalMinor),
            ScaleType::NaturalMinor => Some(ScaleType::Major),
            ScaleType::MajorPentatonic => Some(ScaleType::MinorPentatonic),
            ScaleType::MinorPentatonic => Some(ScaleType::MajorPentatonic),
            _ => None,
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One octave of consecutive semitones starting at `root`.
///
/// The root keeps its own spelling; the rest follow the root's key
/// (flats above flat-spelled roots and F). Crossing B raises the octave.
pub fn chromatic_scale(root: Note) -> [Note; 12] {
    let context = SpellingContext::for_key(root.pitch());
    let mut notes = [root; 12];
    for i in 1..notes.len() {
        notes[i] = next_by_interval(notes[i - 1], Cycle::Chromatic).respell(context);
    }
    notes
}

/// Pick `offsets` out of the chromatic octaves above `root` and spell the
/// result in `context`. Shared by scale and chord construction.
pub(crate) fn realize(root: Note, offsets: &[u8], context: SpellingContext) -> Vec<Note> {
    let chromatic = chromatic_scale(root);
    offsets
        .iter()
        .map(|&offset| {
            let note = chromatic[(offset % 12) as usize];
            note.shift_octave((offset / 12) as i8).respell(context)
        })
        .collect()
}

/// A realized scale: one note per formula degree, strictly ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleData")]
pub struct Scale {
    root: PitchClass,
    scale_type: Option<ScaleType>,
    formula: IntervalFormula,
    notes: Vec<Note>,
}

/// Unchecked scale fields as read from a document
#[derive(Deserialize)]
struct ScaleData {
    root: PitchClass,
    scale_type: Option<ScaleType>,
    formula: IntervalFormula,
    notes: Vec<Note>,
}

impl TryFrom<ScaleData> for Scale {
    type Error = TheoryError;

    /// Accept only notes that sit exactly on the formula above the root
    fn try_from(data: ScaleData) -> TheoryResult<Self> {
        let consistent = data.scale_type.map_or(true, |st| st.formula() == data.formula)
            && data.notes.first().map(|n| n.pitch()) == Some(data.root)
            && data.notes.len() == data.formula.len()
            && data.notes.iter().zip(data.formula.offsets()).all(|(note, &offset)| {
                note.absolute_semitone() - data.notes[0].absolute_semitone() == offset as i32
            });
        if !consistent {
            return Err(TheoryError::InconsistentNotes(note_names(&data.notes)));
        }
        Ok(Scale {
            root: data.root,
            scale_type: data.scale_type,
            formula: data.formula,
            notes: data.notes,
        })
    }
}

/// Space-separated note names for error messages
pub(crate) fn note_names(notes: &[Note]) -> String {
    notes.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
}

impl Scale {
    /// Build a scale of a given type
    pub fn new(root: PitchClass, scale_type: ScaleType, octave: i8) -> Self {
        Scale::of_type(Note::new(root, octave), scale_type)
    }

    /// Build a scale of a given type from a root note, keeping its attributes
    pub fn of_type(root: Note, scale_type: ScaleType) -> Self {
        let context = match scale_type.mode() {
            Some(mode) => mode.spelling(root.pitch()),
            None => SpellingContext::for_key(root.pitch()),
        };
        Scale::spelled(root, scale_type.formula(), context, Some(scale_type))
    }

    /// Build a scale from any formula; spelled flat when the root is a flat
    /// key (a flat-spelled root, or F)
    pub fn build(root: PitchClass, formula: &IntervalFormula, octave: i8) -> Self {
        Scale::from_note(Note::new(root, octave), formula)
    }

    /// Like [`Scale::build`], starting from a root note whose duration,
    /// velocity and channel carry into every degree
    pub fn from_note(root: Note, formula: &IntervalFormula) -> Self {
        let context = SpellingContext::for_key(root.pitch());
        Scale::spelled(root, formula.clone(), context, None)
    }

    fn spelled(
        root: Note,
        formula: IntervalFormula,
        context: SpellingContext,
        scale_type: Option<ScaleType>,
    ) -> Self {
        let notes = realize(root, formula.offsets(), context);
        debug!(
            root = %root,
            formula = ?formula.offsets(),
            ?context,
            "built scale"
        );
        Self {
            root: notes.first().map(|n| n.pitch()).unwrap_or(root.pitch()),
            scale_type,
            formula,
            notes,
        }
    }

    pub fn major(key: PitchClass, octave: i8) -> Self {
        Scale::new(key, ScaleType::Major, octave)
    }

    /// Natural minor
    pub fn minor(key: PitchClass, octave: i8) -> Self {
        Scale::new(key, ScaleType::NaturalMinor, octave)
    }

    /// Diatonic mode on `key`, spelled by the mode's parent major key
    pub fn modal(key: PitchClass, mode: Mode, octave: i8) -> Self {
        let root = Note::new(key, octave);
        Scale::spelled(root, mode.formula(), mode.spelling(key), Some(mode_scale_type(mode)))
    }

    /// Major pentatonic
    pub fn pentatonic(key: PitchClass, octave: i8) -> Self {
        Scale::new(key, ScaleType::MajorPentatonic, octave)
    }

    pub fn minor_pentatonic(key: PitchClass, octave: i8) -> Self {
        Scale::new(key, ScaleType::MinorPentatonic, octave)
    }

    pub fn blues(key: PitchClass, octave: i8) -> Self {
        Scale::new(key, ScaleType::Blues, octave)
    }

    /// Parse a scale from strings (e.g., "C", "major")
    pub fn parse(root_str: &str, scale_str: &str, octave: i8) -> TheoryResult<Self> {
        let root: PitchClass = root_str.parse()?;
        let scale_type = ScaleType::from_str(scale_str)
            .ok_or_else(|| TheoryError::UnknownScale(scale_str.to_string()))?;
        Ok(Scale::new(root, scale_type, octave))
    }

    /// Get the root pitch class
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Get the scale type (`None` for formulas built directly)
    pub fn scale_type(&self) -> Option<ScaleType> {
        self.scale_type
    }

    pub fn formula(&self) -> &IntervalFormula {
        &self.formula
    }

    /// Get the notes in this scale
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.notes.iter().map(|n| n.pitch()).collect()
    }

    /// Get the number of notes in this scale
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Check if a pitch class is in this scale, under any spelling
    pub fn contains(&self, pc: PitchClass) -> bool {
        self.notes.iter().any(|n| n.pitch().is_enharmonic(pc))
    }

    /// Get the scale degree (1-based) for a pitch class, if it's in the scale
    pub fn degree_of(&self, pc: PitchClass) -> Option<usize> {
        self.notes
            .iter()
            .position(|n| n.pitch().is_enharmonic(pc))
            .map(|i| i + 1)
    }

    /// Get the note at a given scale degree (1-based)
    pub fn note_at_degree(&self, degree: usize) -> Option<Note> {
        if degree == 0 {
            return None;
        }
        self.notes.get(degree - 1).copied()
    }

    /// Get the parallel scale (major <-> minor)
    pub fn parallel(&self) -> Option<Scale> {
        let octave = self.notes.first()?.octave();
        let parallel = self.scale_type?.parallel()?;
        Some(Scale::new(self.root, parallel, octave))
    }

    /// Get the relative scale (e.g., C major -> A minor)
    pub fn relative(&self) -> Option<Scale> {
        let octave = self.notes.first()?.octave();
        let (mode, target, target_type) = match self.scale_type? {
            ScaleType::Major => (Mode::Ionian, Mode::Aeolian, ScaleType::NaturalMinor),
            ScaleType::NaturalMinor => (Mode::Aeolian, Mode::Ionian, ScaleType::Major),
            _ => return None,
        };
        let root = equivalent_key(self.root, mode, target);
        Some(Scale::new(root, target_type, octave))
    }
}

fn mode_scale_type(mode: Mode) -> ScaleType {
    match mode {
        Mode::Ionian => ScaleType::Major,
        Mode::Dorian => ScaleType::Dorian,
        Mode::Phrygian => ScaleType::Phrygian,
        Mode::Lydian => ScaleType::Lydian,
        Mode::Mixolydian => ScaleType::Mixolydian,
        Mode::Aeolian => ScaleType::NaturalMinor,
        Mode::Locrian => ScaleType::Locrian,
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scale_type {
            Some(scale_type) => write!(f, "{} {}", self.root, scale_type),
            None => write!(f, "{} {:?}", self.root, self.formula.offsets()),
        }
    }
}

/// The tonic of the `target` mode sharing `mode`-on-`key`'s notes.
///
/// `equivalent_key(D, Dorian, Ionian)` is C: D Dorian and C major use the
/// same pitch classes.
pub fn equivalent_key(key: PitchClass, mode: Mode, target: Mode) -> PitchClass {
    let scale = Scale::modal(key, mode, 4);
    let degree = (target.index() as i32 - mode.index() as i32).rem_euclid(7) as usize;
    scale.notes()[degree].pitch()
}

/// Custom scale definitions that can be loaded from config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomScaleDefinition {
    /// Name of the scale
    pub name: String,
    /// Intervals from root (semitones)
    pub intervals: Vec<u8>,
}

impl CustomScaleDefinition {
    pub fn formula(&self) -> TheoryResult<IntervalFormula> {
        IntervalFormula::new(self.intervals.clone())
    }

    /// Create a scale from this definition
    pub fn to_scale(&self, root: PitchClass, octave: i8) -> TheoryResult<Scale> {
        Ok(Scale::build(root, &self.formula()?, octave))
    }
}

/// Registry for custom scale definitions
#[derive(Debug, Clone, Default)]
pub struct ScaleRegistry {
    custom_scales: HashMap<String, IntervalFormula>,
}

impl ScaleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom scale, rejecting invalid formulas
    pub fn register(&mut self, def: &CustomScaleDefinition) -> TheoryResult<()> {
        let formula = def.formula()?;
        self.custom_scales.insert(def.name.clone(), formula);
        Ok(())
    }

    /// Get a scale by name (checks custom first, then built-in)
    pub fn get_scale(&self, root: PitchClass, name: &str, octave: i8) -> TheoryResult<Scale> {
        // Check custom scales first
        if let Some(formula) = self.custom_scales.get(name) {
            return Ok(Scale::build(root, formula, octave));
        }

        // Fall back to built-in
        ScaleType::from_str(name)
            .map(|st| Scale::new(root, st, octave))
            .ok_or_else(|| TheoryError::UnknownScale(name.to_string()))
    }

    /// List all available scale names
    pub fn available_scales(&self) -> Vec<String> {
        let mut names: Vec<String> = self.custom_scales.keys().cloned().collect();
        names.extend(ScaleType::ALL.iter().map(|st| st.id().to_string()));
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::note::Duration;

    fn spelled(scale: &Scale) -> Vec<String> {
        scale.notes().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_formula_validation() {
        assert!(IntervalFormula::new(vec![0, 4, 7]).is_ok());
        assert_eq!(
            IntervalFormula::new(vec![1, 4, 7]),
            Err(TheoryError::InvalidFormula(vec![1, 4, 7]))
        );
        assert!(IntervalFormula::new(vec![0, 7, 4]).is_err());
        assert!(IntervalFormula::new(vec![0, 4, 4]).is_err());
        assert!(IntervalFormula::new(vec![]).is_err());
    }

    #[test]
    fn test_rotate_zero_modes() {
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 0), Ok(MAJOR_FORMULA.to_vec()));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 1), Ok(vec![0, 2, 3, 5, 7, 9, 10]));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 2), Ok(vec![0, 1, 3, 5, 7, 8, 10]));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 3), Ok(vec![0, 2, 4, 6, 7, 9, 11]));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 4), Ok(vec![0, 2, 4, 5, 7, 9, 10]));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 5), Ok(vec![0, 2, 3, 5, 7, 8, 10]));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 6), Ok(vec![0, 1, 3, 5, 6, 8, 10]));
        assert_eq!(rotate_zero(&MAJOR_FORMULA, 7), Ok(MAJOR_FORMULA.to_vec()));
    }

    #[test]
    fn test_rotate_zero_chord_formula() {
        assert_eq!(rotate_zero(&[0, 4, 7], 1), Ok(vec![0, 3, 8]));
        assert_eq!(rotate_zero(&[0, 4, 7], 2), Ok(vec![0, 5, 9]));
        // Two-octave formulas wrap by two octaves and stay ascending
        assert_eq!(rotate_zero(&[0, 4, 7, 14], 1), Ok(vec![0, 3, 10, 20]));
    }

    #[test]
    fn test_rotate_zero_rejects_unordered_offsets() {
        assert_eq!(
            rotate_zero(&[7, 0, 4], 0),
            Err(TheoryError::InvalidFormula(vec![7, 0, 4]))
        );
        assert!(rotate_zero(&[0, 4, 4], 1).is_err());
        assert!(rotate_zero(&[], 1).is_err());
    }

    #[test]
    fn test_chromatic_scale() {
        let notes = chromatic_scale(Note::new(PitchClass::A, 3));
        let names: Vec<String> = notes.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            names,
            ["A3", "A#3", "B3", "C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4"]
        );

        let flats = chromatic_scale(Note::new(PitchClass::Db, 4));
        assert_eq!(flats[0].pitch(), PitchClass::Db);
        assert_eq!(flats[2].pitch(), PitchClass::Eb);
    }

    #[test]
    fn test_c_major_octave_zero() {
        let scale = Scale::major(PitchClass::C, 0);
        assert_eq!(spelled(&scale), ["C0", "D0", "E0", "F0", "G0", "A0", "B0"]);
    }

    #[test]
    fn test_f_major_spelled_flat() {
        let scale = Scale::major(PitchClass::F, 0);
        assert_eq!(spelled(&scale), ["F0", "G0", "A0", "Bb0", "C1", "D1", "E1"]);
    }

    #[test]
    fn test_minor_spelled_by_parent_key() {
        let d_minor = Scale::minor(PitchClass::D, 4);
        assert_eq!(spelled(&d_minor), ["D4", "E4", "F4", "G4", "A4", "Bb4", "C5"]);

        let b_minor = Scale::minor(PitchClass::B, 3);
        assert_eq!(spelled(&b_minor), ["B3", "C#4", "D4", "E4", "F#4", "G4", "A4"]);
    }

    #[test]
    fn test_scale_strictly_ascending() {
        for scale_type in [
            ScaleType::Major,
            ScaleType::Locrian,
            ScaleType::HarmonicMinor,
            ScaleType::Blues,
            ScaleType::Chromatic,
        ] {
            for pc in PitchClass::ALL {
                let scale = Scale::new(pc, scale_type, 2);
                assert!(scale
                    .notes()
                    .windows(2)
                    .all(|w| w[0].absolute_semitone() < w[1].absolute_semitone()));
            }
        }
    }

    #[test]
    fn test_offsets_past_octave() {
        let formula = IntervalFormula::new(vec![0, 4, 7, 14]).unwrap();
        let scale = Scale::build(PitchClass::C, &formula, 3);
        assert_eq!(spelled(&scale), ["C3", "E3", "G3", "D4"]);
    }

    #[test]
    fn test_attributes_carry_through() {
        let root = Note::new(PitchClass::G, 2)
            .with_duration(Duration::EIGHTH)
            .with_velocity(64)
            .with_channel(3);
        let scale = Scale::from_note(root, &ScaleType::Major.formula());
        for note in scale.notes() {
            assert_eq!(note.duration(), Duration::EIGHTH);
            assert_eq!(note.velocity(), 64);
            assert_eq!(note.channel(), 3);
        }
    }

    #[test]
    fn test_mode_equivalence() {
        let mut dorian: Vec<u8> = Scale::modal(PitchClass::D, Mode::Dorian, 4)
            .notes()
            .iter()
            .map(|n| n.pitch().chroma())
            .collect();
        let mut major: Vec<u8> = Scale::major(PitchClass::C, 4)
            .notes()
            .iter()
            .map(|n| n.pitch().chroma())
            .collect();
        dorian.sort();
        major.sort();
        assert_eq!(dorian, major);
    }

    #[test]
    fn test_equivalent_key() {
        assert_eq!(equivalent_key(PitchClass::D, Mode::Dorian, Mode::Ionian), PitchClass::C);
        assert_eq!(equivalent_key(PitchClass::A, Mode::Aeolian, Mode::Ionian), PitchClass::C);
        assert_eq!(equivalent_key(PitchClass::C, Mode::Ionian, Mode::Aeolian), PitchClass::A);
        assert_eq!(equivalent_key(PitchClass::G, Mode::Mixolydian, Mode::Ionian), PitchClass::C);
        assert_eq!(equivalent_key(PitchClass::D, Mode::Aeolian, Mode::Ionian), PitchClass::F);
    }

    #[test]
    fn test_scale_type_intervals() {
        assert_eq!(ScaleType::Major.formula().offsets(), &[0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(ScaleType::NaturalMinor.formula().offsets(), &[0, 2, 3, 5, 7, 8, 10]);
        assert_eq!(ScaleType::MinorPentatonic.formula().offsets(), &[0, 3, 5, 7, 10]);
    }

    #[test]
    fn test_scale_type_from_str() {
        assert_eq!(ScaleType::from_str("major"), Some(ScaleType::Major));
        assert_eq!(ScaleType::from_str("Minor"), Some(ScaleType::NaturalMinor));
        assert_eq!(ScaleType::from_str("dorian"), Some(ScaleType::Dorian));
        assert_eq!(ScaleType::from_str("harmonic_minor"), Some(ScaleType::HarmonicMinor));
        assert_eq!(ScaleType::from_str("unknown"), None);
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            spelled(&Scale::pentatonic(PitchClass::C, 4)),
            ["C4", "D4", "E4", "G4", "A4"]
        );
        assert_eq!(
            spelled(&Scale::blues(PitchClass::A, 3)),
            ["A3", "C4", "D4", "D#4", "E4", "G4"]
        );
    }

    #[test]
    fn test_scale_degree() {
        let c_major = Scale::major(PitchClass::C, 4);
        assert_eq!(c_major.degree_of(PitchClass::C), Some(1));
        assert_eq!(c_major.degree_of(PitchClass::E), Some(3));
        assert_eq!(c_major.degree_of(PitchClass::Fs), None);
        assert_eq!(c_major.note_at_degree(5).map(|n| n.pitch()), Some(PitchClass::G));
        assert_eq!(c_major.note_at_degree(0), None);
        assert_eq!(c_major.note_at_degree(8), None);
        assert!(c_major.contains(PitchClass::B));
        assert!(!c_major.contains(PitchClass::Bb));
    }

    #[test]
    fn test_scale_relative_and_parallel() {
        let c_major = Scale::major(PitchClass::C, 4);
        let relative = c_major.relative().unwrap();
        assert_eq!(relative.root(), PitchClass::A);
        assert_eq!(relative.scale_type(), Some(ScaleType::NaturalMinor));

        let parallel = c_major.parallel().unwrap();
        assert_eq!(parallel.root(), PitchClass::C);
        assert_eq!(parallel.scale_type(), Some(ScaleType::NaturalMinor));
    }

    #[test]
    fn test_scale_registry() {
        let mut registry = ScaleRegistry::new();

        registry
            .register(&CustomScaleDefinition {
                name: "super_locrian".to_string(),
                intervals: vec![0, 1, 3, 4, 6, 8, 10],
            })
            .unwrap();

        let custom = registry.get_scale(PitchClass::C, "super_locrian", 4).unwrap();
        assert_eq!(custom.len(), 7);
        assert_eq!(custom.scale_type(), None);

        let major = registry.get_scale(PitchClass::C, "major", 4).unwrap();
        assert_eq!(major.scale_type(), Some(ScaleType::Major));

        assert_eq!(
            registry.get_scale(PitchClass::C, "nope", 4),
            Err(TheoryError::UnknownScale("nope".to_string()))
        );

        let bad = CustomScaleDefinition {
            name: "bad".to_string(),
            intervals: vec![0, 5, 3],
        };
        assert!(registry.register(&bad).is_err());
        assert!(registry.available_scales().contains(&"super_locrian".to_string()));
    }

    #[test]
    fn test_available_scales_cover_every_type() {
        let registry = ScaleRegistry::new();
        let names = registry.available_scales();
        assert_eq!(names.len(), ScaleType::ALL.len());
        assert!(names.contains(&"diminished_wh".to_string()));
        for name in &names {
            assert!(registry.get_scale(PitchClass::C, name, 4).is_ok(), "{name}");
        }
        for scale_type in ScaleType::ALL {
            assert_eq!(ScaleType::from_str(scale_type.id()), Some(scale_type));
        }
    }

    #[test]
    fn test_scale_yaml_round_trip() {
        let scale = Scale::modal(PitchClass::D, Mode::Dorian, 3);
        let yaml = serde_yaml::to_string(&scale).unwrap();
        let parsed: Scale = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, scale);
    }

    #[test]
    fn test_scale_deserialize_rejects_inconsistent_notes() {
        // C E G does not sit on a minor-third formula
        let yaml = r#"
root: C
scale_type: null
formula: [0, 3, 7]
notes:
  - { pitch: C, octave: 4 }
  - { pitch: E, octave: 4 }
  - { pitch: G, octave: 4 }
"#;
        assert!(serde_yaml::from_str::<Scale>(yaml).is_err());

        let yaml = r#"
root: C
scale_type: major
formula: [0, 4, 7]
notes:
  - { pitch: C, octave: 4 }
  - { pitch: E, octave: 4 }
  - { pitch: G, octave: 4 }
"#;
        assert!(serde_yaml::from_str::<Scale>(yaml).is_err());

        let yaml = r#"
root: C
scale_type: null
formula: [0, 4, 7]
notes:
  - { pitch: C, octave: 4 }
  - { pitch: E, octave: 4 }
  - { pitch: G, octave: 4 }
"#;
        let scale: Scale = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scale.len(), 3);
    }
}
