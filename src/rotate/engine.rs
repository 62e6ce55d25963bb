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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossbeam_channel::after;
use crossbeam_channel::bounded;
use crossbeam_channel::select;
use jiff::Span;
use jiff::Zoned;

use crate::Error;
use crate::Level;
use crate::Trap;
use crate::config::RotateConfig;
use crate::rotate::INPROGRESS_SUFFIX;
use crate::rotate::LOG_SUFFIX;
use crate::rotate::SECONDS_PER_DAY;
use crate::rotate::SEQUENCE_MARKER;
use crate::rotate::clock::Clock;
use crate::rotate::recover::recover;
use crate::rotate::sequence::next_sequence;
use crate::rotate::suffix::ProcessTags;
use crate::rotate::suffix::render;

/// One generation of open level files.
///
/// All levels share one suffix and, on finalization, one sequence number. The
/// set is owned by the engine and only ever replaced as a whole.
#[derive(Debug)]
struct OutputSet {
    suffix: String,
    files: [Option<File>; Level::COUNT],
}

/// The rotation engine.
///
/// Construction recovers orphaned in-progress files from a previous crash,
/// opens the first generation, and arms a scheduler thread that rotates at
/// each boundary. Writers and the scheduler serialize through one lock that
/// is held only for the duration of the generation swap, never during file
/// I/O or renaming.
///
/// Dropping the engine shuts it down.
#[derive(Debug)]
pub struct Rotator {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: Sender<()>,
    closed: AtomicBool,
}

impl Rotator {
    /// Create a rotation engine from the given policy.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The log directory cannot be created.
    /// * Crash recovery hits irrecoverable I/O (contact mode only).
    /// * The scheduler thread cannot be spawned.
    pub fn new(config: RotateConfig, trap: impl Into<Box<dyn Trap>>) -> Result<Rotator, Error> {
        Self::with_trap(config, Arc::from(trap.into()))
    }

    pub(crate) fn with_trap(config: RotateConfig, trap: Arc<dyn Trap>) -> Result<Rotator, Error> {
        Self::with_clock(config, Clock::DefaultClock, trap)
    }

    pub(crate) fn with_clock(
        config: RotateConfig,
        clock: Clock,
        trap: Arc<dyn Trap>,
    ) -> Result<Rotator, Error> {
        let config = config.normalize();

        fs::create_dir_all(&config.dir).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("dir", config.dir.display())
                .with_source(err)
        })?;
        recover(&config.dir, config.contact, trap.as_ref())?;

        let shared = Arc::new(Shared {
            dir: config.dir,
            template: config.template,
            seconds: config.seconds,
            natural_day: config.natural_day,
            contact: config.contact,
            tags: ProcessTags::resolve(),
            clock,
            trap,
            outputs: RwLock::new(None),
            rotate_guard: Mutex::new(()),
        });

        let suffix = render(&shared.template, &shared.clock.now(), &shared.tags);
        let first = shared.open_set(suffix);
        shared.outputs_write().replace(first);

        let (shutdown_tx, shutdown_rx) = bounded(1);
        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::Builder::new()
                .name("logroll-rotate".to_string())
                .spawn(move || {
                    loop {
                        let delay = shared.next_delay();
                        select! {
                            recv(after(delay)) -> _ => shared.rotate(),
                            recv(shutdown_rx) -> _ => break,
                        }
                    }
                })
                .map_err(|err| {
                    Error::new("failed to spawn the rotation scheduler thread").with_source(err)
                })?
        };

        Ok(Rotator {
            shared,
            worker: Mutex::new(Some(worker)),
            shutdown_tx,
            closed: AtomicBool::new(false),
        })
    }

    /// Write `bytes` to the current file of `level`.
    ///
    /// # Errors
    ///
    /// Return an error if the engine is shut down, if the level's file failed
    /// to open, or on an I/O failure. The handle stays open after an I/O
    /// failure; the next write may succeed.
    pub fn write(&self, level: Level, bytes: &[u8]) -> Result<(), Error> {
        self.shared.write(level, bytes)
    }

    /// Rotate immediately instead of waiting for the next boundary.
    ///
    /// A no-op after shutdown.
    pub fn rotate_now(&self) {
        self.shared.rotate();
    }

    /// Stop the scheduler and finalize the current generation.
    ///
    /// In-flight writes complete before their handles close. Idempotent:
    /// calling this more than once has no further effect.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let _ = self.shutdown_tx.send(());
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }

        self.shared.close();
    }
}

impl Drop for Rotator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug)]
struct Shared {
    dir: PathBuf,
    template: String,
    seconds: u64,
    natural_day: bool,
    contact: bool,
    tags: ProcessTags,
    clock: Clock,
    trap: Arc<dyn Trap>,

    /// The only shared mutable resource. `None` once the engine is closed.
    outputs: RwLock<Option<OutputSet>>,
    /// Serializes rotations against each other and against the final close.
    rotate_guard: Mutex<()>,
}

impl Shared {
    fn outputs_read(&self) -> RwLockReadGuard<'_, Option<OutputSet>> {
        self.outputs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn outputs_write(&self) -> RwLockWriteGuard<'_, Option<OutputSet>> {
        self.outputs.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Open one in-progress file per level for a new generation.
    ///
    /// A level that fails to open leaves a hole: the engine keeps serving the
    /// levels that opened, and writes to the failed level report an error.
    fn open_set(&self, suffix: String) -> OutputSet {
        let mut files: [Option<File>; Level::COUNT] = std::array::from_fn(|_| None);
        for level in Level::all() {
            let path = self
                .dir
                .join(format!("{}{}{}", level.as_str(), suffix, INPROGRESS_SUFFIX));
            match OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&path)
            {
                Ok(file) => files[level.index()] = Some(file),
                Err(err) => self.trap.trap(
                    &Error::new("failed to open level file")
                        .with_context("level", level)
                        .with_context("path", path.display())
                        .with_source(err),
                ),
            }
        }

        OutputSet { suffix, files }
    }

    fn write(&self, level: Level, bytes: &[u8]) -> Result<(), Error> {
        let outputs = self.outputs_read();
        let Some(set) = outputs.as_ref() else {
            return Err(Error::new("rotator is shut down"));
        };
        let Some(file) = set.files[level.index()].as_ref() else {
            return Err(Error::new("no open file for level").with_context("level", level));
        };

        let mut file = file;
        file.write_all(bytes).map_err(Error::from_io_error)
    }

    /// Swap in a fresh generation and finalize the retired one.
    ///
    /// A boundary that renders the same suffix as the current generation is
    /// skipped: opening the replacement would truncate the in-progress file
    /// the current generation still owns. The replacement is opened before
    /// the lock is taken and installed even if some levels failed to open:
    /// partial availability beats a gap in logging. Handles are closed and
    /// files renamed only after the lock is released.
    fn rotate(&self) {
        let _guard = self.rotate_guard.lock().unwrap_or_else(|e| e.into_inner());

        let suffix = render(&self.template, &self.clock.now(), &self.tags);
        {
            let outputs = self.outputs_read();
            let Some(set) = outputs.as_ref() else { return };
            if set.suffix == suffix {
                return;
            }
        }

        let replacement = self.open_set(suffix);
        let retired = self.outputs_write().replace(replacement);
        if let Some(set) = retired {
            self.finalize(set);
        }
    }

    /// Retire the current generation without opening a replacement.
    fn close(&self) {
        let _guard = self.rotate_guard.lock().unwrap_or_else(|e| e.into_inner());
        let retired = self.outputs_write().take();
        if let Some(set) = retired {
            self.finalize(set);
        }
    }

    /// Close and rename (or append, in contact mode) a retired generation.
    ///
    /// The sequence number is recomputed from the directory listing per
    /// suffix, so numbering continues where an earlier process (or an earlier
    /// generation with the same suffix) stopped and never renames over an
    /// existing finalized file. A rename or append failure leaves the
    /// in-progress file behind for the next startup's recovery pass; it is
    /// reported through the trap and never fails the running process.
    fn finalize(&self, mut set: OutputSet) {
        let sequenced = !self.contact && self.seconds < SECONDS_PER_DAY;
        let seq = if sequenced {
            match next_sequence(&self.dir, &set.suffix) {
                // live generations number from 1; 0 only ever comes from
                // recovering an orphan with no finalized siblings
                Ok(seq) => Some(seq.max(1)),
                Err(err) => {
                    self.trap.trap(&err);
                    None
                }
            }
        } else {
            None
        };

        for level in Level::all() {
            let Some(file) = set.files[level.index()].take() else {
                continue;
            };
            drop(file);

            let stem = format!("{}{}", level.as_str(), set.suffix);
            let tmp = self.dir.join(format!("{stem}{INPROGRESS_SUFFIX}"));

            if self.contact {
                match crate::rotate::recover::append_into_running(&self.dir, &tmp, &stem) {
                    Ok(()) => {
                        if let Err(err) = fs::remove_file(&tmp) {
                            self.trap.trap(
                                &Error::new("failed to remove appended in-progress file")
                                    .with_context("path", tmp.display())
                                    .with_source(err),
                            );
                        }
                    }
                    Err(err) => self.trap.trap(&err),
                }
                continue;
            }

            let target = if sequenced {
                // a failed directory scan leaves the orphans for recovery
                let Some(seq) = seq else { continue };
                self.dir
                    .join(format!("{stem}{SEQUENCE_MARKER}{seq:03}{LOG_SUFFIX}"))
            } else {
                self.dir.join(format!("{stem}{LOG_SUFFIX}"))
            };
            if let Err(err) = fs::rename(&tmp, &target) {
                self.trap.trap(
                    &Error::new("failed to finalize level file, leaving it for recovery")
                        .with_context("from", tmp.display())
                        .with_context("to", target.display())
                        .with_source(err),
                );
            }
        }
    }

    fn next_delay(&self) -> Duration {
        delay_until_rotation(&self.clock.now(), self.seconds, self.natural_day)
    }
}

/// Compute the delay until the next rotation boundary.
///
/// If the period is a multiple of one day and natural-day alignment is
/// requested, the boundary is the next local midnight; otherwise it is the
/// next multiple of the period measured from the Unix epoch. At an exact
/// boundary the delay is one full period, never zero.
pub(crate) fn delay_until_rotation(now: &Zoned, seconds: u64, natural_day: bool) -> Duration {
    if natural_day && seconds % SECONDS_PER_DAY == 0 {
        if let Some(delay) = delay_until_midnight(now) {
            return delay;
        }
    }

    let epoch = now.timestamp().as_second();
    let rem = epoch.rem_euclid(seconds as i64) as u64;
    Duration::from_secs(seconds - rem)
}

fn delay_until_midnight(now: &Zoned) -> Option<Duration> {
    let midnight = now
        .start_of_day()
        .ok()?
        .checked_add(Span::new().days(1))
        .ok()?;
    let secs = midnight.timestamp().as_second() - now.timestamp().as_second();
    (secs > 0).then(|| Duration::from_secs(secs as u64))
}
