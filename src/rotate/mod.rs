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

//! The rotation engine and its parts.
//!
//! The engine owns one open file per severity level (one "generation"), a
//! scheduler thread that fires at rotation boundaries, and the finalize path
//! that turns in-progress files into immutable, deterministically named log
//! files. Startup first reclaims any in-progress files a crashed process left
//! behind.

pub use self::engine::Rotator;
pub use self::suffix::ProcessTags;
pub use self::suffix::render;

pub(crate) mod clock;
mod engine;
mod recover;
mod sequence;
mod suffix;

/// Reserved suffix marking a file as not yet finalized.
pub(crate) const INPROGRESS_SUFFIX: &str = ".tmp";

/// Marker preceding the sequence field in finalized filenames.
pub(crate) const SEQUENCE_MARKER: &str = ".seq";

/// Fixed width of the sequence field.
pub(crate) const SEQUENCE_WIDTH: usize = 3;

/// Extension of finalized files.
pub(crate) const LOG_SUFFIX: &str = ".log";

pub(crate) const SECONDS_PER_DAY: u64 = 86400;
