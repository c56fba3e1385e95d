//! Password generation from configurable alphabets.
//!
//! A [`GenerationConfig`] selects character sets and constraints, an [`Alphabet`] is built from
//! it once, and a [`Generator`] then draws passwords from the alphabet with a cryptographically
//! secure RNG, rejecting candidates that break the configured constraints.

use std::fmt;

mod alphabet;
pub mod codepoint;
mod config;
pub mod format;
pub mod password_generation;
pub mod validate;

pub use alphabet::{Alphabet, CharacterSet};
pub use config::{
    CharsetDefinitions, CharsetTag, GenerationConfig, GenerationConfigBuilder,
    DEFAULT_MAX_ATTEMPTS,
};
pub use password_generation::{Generator, Passwords};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid Unicode codepoint {0:?} (expected hexadecimal in 0-10ffff)")]
    InvalidCodepoint(String),
    #[error("invalid codepoint range {token:?}: {problem}")]
    InvalidRange { token: String, problem: RangeProblem },
    #[error("no such character set: {0:?}")]
    UnknownCharsetTag(char),
    #[error("no characters in the {0} set")]
    EmptyCharacterSet(CharsetTag),
    #[error("no characters in selected sets")]
    EmptyAlphabet,
    #[error("impossible constraint: {0}")]
    ImpossibleConstraint(Impossible),
    #[error("invalid password length: {0}")]
    InvalidLength(usize),
    #[error("invalid password count: {0}")]
    InvalidCount(usize),
    #[error("invalid attempt limit: {0}")]
    InvalidAttempts(u64),
    #[error("no password satisfied the constraints after {attempts} attempts")]
    GenerationUnachievable { attempts: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeProblem {
    #[error("empty codepoint or range")]
    Empty,
    #[error("first codepoint {first:x} greater than last one {last:x}")]
    Reversed { first: u32, last: u32 },
    #[error("more than one hyphen")]
    TooManyHyphens,
}

/// Why a configuration can never produce a valid password.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Impossible {
    #[error(
        "a password of length {length} cannot contain a character from each of the {sets} \
         selected sets"
    )]
    TooShortForAllSets { length: usize, sets: usize },
    #[error(
        "a password of length {length} drawn from a single character always repeats it three \
         times in a row"
    )]
    RepeatWithSingleCharacter { length: usize },
}

/// A generated password.
///
/// The `Debug` impl is opaque, so a password can't leak through a stray `{:?}` in a log line.
#[derive(Clone, Eq, PartialEq)]
pub struct Password(String);

opaque_debug::implement!(Password);

impl Password {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The length in characters (not bytes).
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<Vec<char>> for Password {
    fn from(chars: Vec<char>) -> Password {
        Password(chars.into_iter().collect())
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
