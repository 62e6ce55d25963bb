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

//! Generation sequence numbers.
//!
//! Sequence numbers are persisted only through filenames; after a restart the
//! next number for a date-suffix is recomputed from the directory listing.

use std::path::Path;

use crate::Error;
use crate::rotate::SEQUENCE_MARKER;
use crate::rotate::SEQUENCE_WIDTH;

/// Return the next sequence number for `date_suffix` in `dir`.
///
/// Scans finalized filenames containing the suffix, extracts the fixed-width
/// numeric field following the `.seq` marker from each, and returns one
/// greater than the maximum found, or 0 if none. Filenames without the marker
/// or with an unparseable field are skipped.
pub(crate) fn next_sequence(dir: &Path, date_suffix: &str) -> Result<u32, Error> {
    let entries = std::fs::read_dir(dir).map_err(|err| {
        Error::new("failed to read log directory")
            .with_context("dir", dir.display())
            .with_source(err)
    })?;

    let mut max = None;
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.contains(date_suffix) {
            continue;
        }

        let Some(pos) = name.find(SEQUENCE_MARKER) else {
            continue;
        };
        let field = &name[pos + SEQUENCE_MARKER.len()..];
        if field.len() < SEQUENCE_WIDTH {
            continue;
        }
        let Ok(seq) = field[..SEQUENCE_WIDTH].parse::<u32>() else {
            continue;
        };

        max = Some(max.map_or(seq, |m: u32| m.max(seq)));
    }

    Ok(max.map_or(0, |m| m + 1))
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_empty_directory_returns_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_sequence(dir.path(), "-20250307").unwrap(), 0);
    }

    #[test]
    fn test_returns_one_past_the_maximum() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "INFO-20250307.seq001.log");
        touch(dir.path(), "INFO-20250307.seq005.log");
        touch(dir.path(), "INFO-20250307.seq003.log");
        assert_eq!(next_sequence(dir.path(), "INFO-20250307").unwrap(), 6);
    }

    #[test]
    fn test_other_suffixes_are_ignored() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "INFO-20250306.seq009.log");
        touch(dir.path(), "INFO-20250307.seq002.log");
        assert_eq!(next_sequence(dir.path(), "INFO-20250307").unwrap(), 3);
    }

    #[test]
    fn test_markerless_and_garbled_names_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "INFO-20250307.log");
        touch(dir.path(), "INFO-20250307.seqXYZ.log");
        touch(dir.path(), "INFO-20250307.seq7.log");
        assert_eq!(next_sequence(dir.path(), "INFO-20250307").unwrap(), 0);
    }
}
