// Copyright 2025 Logroll Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Severity levels and their file naming.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An enum representing the available severity levels, from the most verbose
/// to the most severe.
///
/// Each level writes to its own file; the level name is the file prefix.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    /// Designates lower priority information.
    Debug,
    /// Designates useful information.
    Info,
    /// Designates hazardous situations.
    Warn,
    /// Designates very serious errors.
    Error,
    /// Designates errors after which the program cannot continue.
    Fatal,
    /// Designates errors that abort the current call stack.
    Panic,
}

impl Level {
    /// The number of severity levels.
    pub const COUNT: usize = 6;

    /// All levels, from the most verbose to the most severe.
    pub const fn all() -> [Level; Level::COUNT] {
        [
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Fatal,
            Level::Panic,
        ]
    }

    /// Return the string representation of the `Level`.
    ///
    /// This is also the filename prefix of the level's log files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
        }
    }

    /// The position of this level in [`Level::all`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::all() {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return Ok(level);
            }
        }
        Err(Error::new("unknown level").with_context("level", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_index_matches_all() {
        for (i, level) in Level::all().iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("PANIC".parse::<Level>().unwrap(), Level::Panic);
        assert!("verbose".parse::<Level>().is_err());
    }
}
