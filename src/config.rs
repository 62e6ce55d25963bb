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

//! Rotation policy and router configuration.

use std::path::PathBuf;

use crate::Level;

/// The shortest rotation period accepted, in seconds.
pub const MIN_ROTATE_SECONDS: u64 = 5;

/// The default rotation period: one day.
pub const DEFAULT_ROTATE_SECONDS: u64 = 86400;

/// The default filename suffix template.
pub const DEFAULT_TEMPLATE: &str = "-{{yyyy}}{{mm}}{{dd}}-{{HH}}{{MM}}{{SS}}-{{pid}}";

/// Immutable rotation policy plus the router's initial display settings.
///
/// Every recognized option is an explicit field with a default; values are
/// captured at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct RotateConfig {
    /// The directory holding all level files. Created if absent.
    pub dir: PathBuf,
    /// The filename suffix template; see [`crate::rotate::render`] for the
    /// recognized tokens.
    pub template: String,
    /// The rotation period in seconds. Values below [`MIN_ROTATE_SECONDS`]
    /// are raised to the floor.
    pub seconds: u64,
    /// Align rotation boundaries to local midnight when the period is a
    /// multiple of one day.
    pub natural_day: bool,
    /// Append retiring content into one persistent per-day file instead of
    /// creating sequence-numbered files.
    pub contact: bool,
    /// Reserved: item-count rotation threshold. Accepted but not enforced.
    pub max_items: u64,
    /// Reserved: byte-count rotation threshold. Accepted but not enforced.
    pub max_bytes: u64,
    /// Initial per-level display prefixes. Empty by default: with one file
    /// per level, the level name adds nothing to a line.
    pub prefixes: [String; Level::COUNT],
    /// Initial format flags, see [`crate::flags`].
    pub flags: u32,
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            template: DEFAULT_TEMPLATE.to_string(),
            seconds: DEFAULT_ROTATE_SECONDS,
            natural_day: false,
            contact: false,
            max_items: 0,
            max_bytes: 0,
            prefixes: Default::default(),
            flags: 0,
        }
    }
}

impl RotateConfig {
    /// Apply the documented defaults and floors so that the policy the engine
    /// captures is always valid.
    pub(crate) fn normalize(mut self) -> Self {
        self.seconds = self.seconds.max(MIN_ROTATE_SECONDS);
        if self.dir.as_os_str().is_empty() {
            self.dir = PathBuf::from("./");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_floor() {
        let config = RotateConfig {
            seconds: 1,
            ..Default::default()
        };
        assert_eq!(config.normalize().seconds, MIN_ROTATE_SECONDS);
    }

    #[test]
    fn test_empty_dir_becomes_cwd() {
        let config = RotateConfig {
            dir: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(config.normalize().dir, PathBuf::from("./"));
    }
}
