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

//! Crash recovery.
//!
//! An in-progress file still present on disk means a previous process exited
//! without finalizing it. Recovery runs once, synchronously, before the engine
//! opens its first generation, and finalizes every orphan it finds.

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use crate::Error;
use crate::Trap;
use crate::rotate::INPROGRESS_SUFFIX;
use crate::rotate::LOG_SUFFIX;
use crate::rotate::SEQUENCE_MARKER;
use crate::rotate::sequence::next_sequence;

/// Finalize every orphaned in-progress file in `dir`.
///
/// In contact mode an orphan's bytes are appended to the running file for its
/// date-suffix; failing to open either file is fatal to startup. In sequenced
/// mode the orphan is renamed to a finalized name bearing the next sequence
/// number; an unrecoverable rename loses the orphan rather than the startup
/// (reported through the trap).
///
/// Running this on a clean directory is a no-op. No particular enumeration
/// order is assumed.
pub(crate) fn recover(dir: &Path, contact: bool, trap: &dyn Trap) -> Result<(), Error> {
    let entries = fs::read_dir(dir).map_err(|err| {
        Error::new("failed to read log directory")
            .with_context("dir", dir.display())
            .with_source(err)
    })?;

    for entry in entries {
        let Ok(entry) = entry else { continue };
        // the engine only creates files, not directories or symlinks
        if !entry.metadata().is_ok_and(|m| m.is_file()) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name.strip_suffix(INPROGRESS_SUFFIX) else {
            continue;
        };

        let orphan = entry.path();
        if contact {
            append_into_running(dir, &orphan, stem)?;
            if let Err(err) = fs::remove_file(&orphan) {
                trap.trap(
                    &Error::new("failed to remove recovered in-progress file")
                        .with_context("path", orphan.display())
                        .with_source(err),
                );
            }
        } else {
            let seq = next_sequence(dir, stem)?;
            let target = dir.join(format!("{stem}{SEQUENCE_MARKER}{seq:03}{LOG_SUFFIX}"));
            if let Err(err) = fs::rename(&orphan, &target) {
                trap.trap(
                    &Error::new("failed to finalize orphaned in-progress file, dropping it")
                        .with_context("path", orphan.display())
                        .with_source(err),
                );
                let _ = fs::remove_file(&orphan);
            }
        }
    }

    Ok(())
}

/// Append the orphan's bytes to the running per-day file, creating it if
/// absent.
pub(crate) fn append_into_running(dir: &Path, orphan: &Path, stem: &str) -> Result<(), Error> {
    let target = dir.join(format!("{stem}{LOG_SUFFIX}"));

    let mut src = fs::File::open(orphan).map_err(|err| {
        Error::new("failed to open orphaned in-progress file")
            .with_context("path", orphan.display())
            .with_source(err)
    })?;
    let mut dst = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&target)
        .map_err(|err| {
            Error::new("failed to open running log file")
                .with_context("path", target.display())
                .with_source(err)
        })?;

    io::copy(&mut src, &mut dst).map_err(|err| {
        Error::new("failed to append orphaned content")
            .with_context("from", orphan.display())
            .with_context("to", target.display())
            .with_source(err)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::trap::DefaultTrap;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn test_sequenced_recovery_finalizes_every_orphan() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "INFO-20250307.tmp", "info");
        write(dir.path(), "ERROR-20250307.tmp", "error");
        write(dir.path(), "WARN-20250306.tmp", "warn");

        recover(dir.path(), false, &DefaultTrap::default()).unwrap();

        assert_eq!(
            names(dir.path()),
            vec![
                "ERROR-20250307.seq000.log",
                "INFO-20250307.seq000.log",
                "WARN-20250306.seq000.log",
            ]
        );
    }

    #[test]
    fn test_sequenced_recovery_continues_existing_sequence() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "INFO-20250307.seq002.log", "old");
        write(dir.path(), "INFO-20250307.tmp", "new");

        recover(dir.path(), false, &DefaultTrap::default()).unwrap();

        assert_eq!(
            names(dir.path()),
            vec!["INFO-20250307.seq002.log", "INFO-20250307.seq003.log"]
        );
    }

    #[test]
    fn test_recovery_is_a_noop_on_a_clean_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "INFO-20250307.seq001.log", "done");

        recover(dir.path(), false, &DefaultTrap::default()).unwrap();
        recover(dir.path(), false, &DefaultTrap::default()).unwrap();

        assert_eq!(names(dir.path()), vec!["INFO-20250307.seq001.log"]);
    }

    #[test]
    fn test_contact_recovery_appends_across_restarts() {
        let dir = TempDir::new().unwrap();

        for content in ["a", "b", "c"] {
            write(dir.path(), "INFO-20250307.tmp", content);
            recover(dir.path(), true, &DefaultTrap::default()).unwrap();
        }

        assert_eq!(names(dir.path()), vec!["INFO-20250307.log"]);
        let merged = fs::read_to_string(dir.path().join("INFO-20250307.log")).unwrap();
        assert_eq!(merged, "abc");
    }
}
