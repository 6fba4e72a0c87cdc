// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Notes: a spelled pitch class at an octave, plus pass-through
//! performance attributes.
//!
//! Duration, velocity and channel mean nothing to the theory code; they are
//! carried unchanged through every build, rotation and inversion so that
//! renderers and exporters receive what the caller put in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TheoryError, TheoryResult};
use crate::music::key::SpellingContext;
use crate::music::pitch::PitchClass;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Default velocity for notes built without one
pub const DEFAULT_VELOCITY: u8 = 100;

/// Octave used when note text omits one
pub const DEFAULT_OCTAVE: i8 = 4;

const EPSILON: f64 = 1e-9;

/// Note length as a fraction of a whole note (`0.25` = quarter)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(f64);

impl Duration {
    pub const ZERO: Duration = Duration(0.0);
    pub const WHOLE: Duration = Duration(1.0);
    pub const HALF: Duration = Duration(0.5);
    pub const QUARTER: Duration = Duration(0.25);
    pub const EIGHTH: Duration = Duration(0.125);
    pub const SIXTEENTH: Duration = Duration(0.0625);

    /// Create a duration; negative values clamp to zero
    pub fn new(whole_notes: f64) -> Self {
        Duration(whole_notes.max(0.0))
    }

    /// Length in whole notes
    pub fn value(self) -> f64 {
        self.0
    }

    /// Dotted form (1.5x)
    pub fn dotted(self) -> Self {
        Duration(self.0 * 1.5)
    }

    /// Repeat this duration `count` times
    pub fn times(self, count: usize) -> Self {
        Duration(self.0 * count as f64)
    }

    /// Notation duration token: `1`, `2`, `4` ... `64`, dotted forms with a
    /// trailing `.`, and the raw whole-note fraction for anything else.
    pub fn notation_token(self) -> String {
        for division in [1u32, 2, 4, 8, 16, 32, 64] {
            let plain = 1.0 / division as f64;
            if (self.0 - plain).abs() < EPSILON {
                return division.to_string();
            }
            if (self.0 - plain * 1.5).abs() < EPSILON {
                return format!("{division}.");
            }
        }
        format!("{}", self.0)
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::QUARTER
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

/// A pitch class at an octave. Octave 4 holds middle C (C4 = MIDI 60).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pitch: PitchClass,
    octave: i8,
    #[serde(default)]
    duration: Duration,
    #[serde(default = "default_velocity")]
    velocity: u8,
    #[serde(default)]
    channel: u8,
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Note {
    /// Create a quarter note at default velocity on channel 0
    pub fn new(pitch: PitchClass, octave: i8) -> Self {
        Self {
            pitch,
            octave,
            duration: Duration::default(),
            velocity: DEFAULT_VELOCITY,
            channel: 0,
        }
    }

    /// The note at an absolute semitone number (60 = C4). Octaves beyond
    /// the i8 range saturate.
    pub fn from_semitone(semitone: i32, context: SpellingContext) -> Self {
        let pitch = PitchClass::from_chroma(semitone.rem_euclid(12) as u8, context);
        let octave = (semitone.div_euclid(12) - 1).clamp(i8::MIN as i32, i8::MAX as i32);
        Note::new(pitch, octave as i8)
    }

    pub fn pitch(&self) -> PitchClass {
        self.pitch
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Absolute semitone number: `chroma + 12 * (octave + 1)`, so C4 = 60.
    /// Enharmonic spellings at the same octave share a number.
    pub fn absolute_semitone(&self) -> i32 {
        self.pitch.chroma() as i32 + 12 * (self.octave as i32 + 1)
    }

    /// MIDI note number, if within 0-127
    pub fn midi_number(&self) -> Option<MidiNote> {
        u8::try_from(self.absolute_semitone())
            .ok()
            .filter(|n| *n <= 127)
    }

    /// Same physical pitch (ignores spelling and attributes)
    pub fn same_pitch(&self, other: &Note) -> bool {
        self.absolute_semitone() == other.absolute_semitone()
    }

    pub fn with_pitch(mut self, pitch: PitchClass) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_octave(mut self, octave: i8) -> Self {
        self.octave = octave;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.min(127);
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel.min(15);
        self
    }

    /// Shift by whole octaves, keeping spelling and attributes
    pub fn shift_octave(self, octaves: i8) -> Self {
        let octave = self.octave.saturating_add(octaves);
        self.with_octave(octave)
    }

    /// Rewrite the spelling for `context`, keeping the absolute pitch
    pub fn respell(self, context: SpellingContext) -> Self {
        self.with_pitch(PitchClass::from_chroma(self.pitch.chroma(), context))
    }

    /// Transpose by semitones, keeping attributes
    pub fn transpose(self, semitones: i32, context: SpellingContext) -> Self {
        let moved = Note::from_semitone(self.absolute_semitone() + semitones, context);
        self.with_pitch(moved.pitch).with_octave(moved.octave)
    }
}

impl FromStr for Note {
    type Err = TheoryError;

    /// Parse `C#4`, `Bb-1`, `E` (octave defaults to 4)
    fn from_str(s: &str) -> TheoryResult<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        let (pitch_text, octave_text) = trimmed.split_at(split);

        let pitch: PitchClass = pitch_text
            .parse()
            .map_err(|_| TheoryError::InvalidNote(s.to_string()))?;
        let octave = if octave_text.is_empty() {
            DEFAULT_OCTAVE
        } else {
            octave_text
                .parse::<i8>()
                .map_err(|_| TheoryError::InvalidNote(s.to_string()))?
        };
        Ok(Note::new(pitch, octave))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_semitone() {
        assert_eq!(Note::new(PitchClass::C, 4).absolute_semitone(), 60);
        assert_eq!(Note::new(PitchClass::A, 4).absolute_semitone(), 69);
        assert_eq!(Note::new(PitchClass::C, -1).absolute_semitone(), 0);
        assert_eq!(
            Note::new(PitchClass::Cs, 3).absolute_semitone(),
            Note::new(PitchClass::Db, 3).absolute_semitone()
        );
    }

    #[test]
    fn test_midi_number_range() {
        assert_eq!(Note::new(PitchClass::C, 4).midi_number(), Some(60));
        assert_eq!(Note::new(PitchClass::G, 9).midi_number(), Some(127));
        assert_eq!(Note::new(PitchClass::Gs, 9).midi_number(), None);
        assert_eq!(Note::new(PitchClass::B, -2).midi_number(), None);
    }

    #[test]
    fn test_from_semitone() {
        let note = Note::from_semitone(61, SpellingContext::Flat);
        assert_eq!(note.pitch(), PitchClass::Db);
        assert_eq!(note.octave(), 4);

        let low = Note::from_semitone(-1, SpellingContext::Normal);
        assert_eq!(low.pitch(), PitchClass::B);
        assert_eq!(low.octave(), -2);

        // Octaves outside i8 saturate instead of wrapping
        let high = Note::from_semitone(10_000, SpellingContext::Normal);
        assert_eq!(high.octave(), i8::MAX);
        let deep = Note::from_semitone(-10_000, SpellingContext::Normal);
        assert_eq!(deep.octave(), i8::MIN);

        let moved = Note::new(PitchClass::C, 120).transpose(1_200, SpellingContext::Normal);
        assert_eq!(moved.octave(), i8::MAX);
    }

    #[test]
    fn test_parse_note() {
        assert_eq!("C#4".parse(), Ok(Note::new(PitchClass::Cs, 4)));
        assert_eq!("Bb-1".parse(), Ok(Note::new(PitchClass::Bb, -1)));
        assert_eq!("E".parse(), Ok(Note::new(PitchClass::E, 4)));
        assert_eq!("g0".parse(), Ok(Note::new(PitchClass::G, 0)));
        assert!("X4".parse::<Note>().is_err());
        assert!("C4x".parse::<Note>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Note::new(PitchClass::Eb, 3).to_string(), "Eb3");
        assert_eq!(Note::new(PitchClass::A, -1).to_string(), "A-1");
    }

    #[test]
    fn test_transpose_keeps_attributes() {
        let note = Note::new(PitchClass::B, 3)
            .with_duration(Duration::EIGHTH)
            .with_velocity(80)
            .with_channel(2);
        let moved = note.transpose(1, SpellingContext::Normal);
        assert_eq!(moved.pitch(), PitchClass::C);
        assert_eq!(moved.octave(), 4);
        assert_eq!(moved.duration(), Duration::EIGHTH);
        assert_eq!(moved.velocity(), 80);
        assert_eq!(moved.channel(), 2);
    }

    #[test]
    fn test_attribute_clamping() {
        let note = Note::new(PitchClass::C, 4).with_velocity(200).with_channel(20);
        assert_eq!(note.velocity(), 127);
        assert_eq!(note.channel(), 15);
    }

    #[test]
    fn test_notation_tokens() {
        assert_eq!(Duration::WHOLE.notation_token(), "1");
        assert_eq!(Duration::QUARTER.notation_token(), "4");
        assert_eq!(Duration::EIGHTH.dotted().notation_token(), "8.");
        assert_eq!(Duration::HALF.dotted().notation_token(), "2.");
        assert_eq!(Duration::new(0.2).notation_token(), "0.2");
    }

    #[test]
    fn test_duration_arithmetic() {
        assert_eq!(Duration::QUARTER + Duration::QUARTER, Duration::HALF);
        assert_eq!(Duration::EIGHTH.times(4), Duration::HALF);
        assert_eq!(Duration::new(-1.0), Duration::ZERO);
    }
}
