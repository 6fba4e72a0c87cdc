// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! chordsmith: a music-theory computation engine.
//!
//! Key signatures, scales and modes, chord construction and inversion,
//! chord recognition from notes, and roman-numeral resolution, all over
//! spelled pitch classes.
//!
//! ```
//! use chordsmith::music::{analyze, Chord, ChordQuality, PitchClass};
//!
//! let chord = Chord::new(PitchClass::C, ChordQuality::Major, 4).with_inversion(1);
//! let result = analyze(&chord.to_notes()).unwrap();
//! assert_eq!(result.root(), PitchClass::C);
//! assert_eq!(result.inversion(), 1);
//! ```

pub mod config;
pub mod error;
pub mod generators;
pub mod music;

pub use config::TheoryConfig;
pub use error::{TheoryError, TheoryResult};
