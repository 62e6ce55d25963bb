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

//! The leveled facade in front of the rotation engine.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use jiff::Zoned;
use jiff::tz::TimeZone;

use crate::Error;
use crate::Level;
use crate::Trap;
use crate::config::RotateConfig;
use crate::flags;
use crate::rotate::Rotator;
use crate::trap::DefaultTrap;

/// The contract every leveled logging backend satisfies.
///
/// A router holds no state beyond the per-level display prefixes and the
/// format flags; everything else is the backend behind it.
pub trait Route: std::fmt::Debug + Send + Sync + 'static {
    /// Write a formatted message at the given level.
    fn write(&self, level: Level, message: &str) -> Result<(), Error>;

    /// The display prefix of the given level.
    fn prefix(&self, level: Level) -> String;

    /// Set the display prefix of the given level.
    fn set_prefix(&self, level: Level, prefix: &str);

    /// The current format flags, see [`crate::flags`].
    fn flags(&self) -> u32;

    /// Replace the format flags.
    fn set_flags(&self, flags: u32);

    /// Shut the backend down. Safe to call more than once.
    fn shutdown(&self);
}

/// A builder to configure and create a [`FileRouter`].
#[derive(Debug)]
pub struct FileRouterBuilder {
    config: RotateConfig,
    trap: Box<dyn Trap>,
}

impl FileRouterBuilder {
    /// Create a new file router builder logging into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::from_config(RotateConfig {
            dir: dir.into(),
            ..Default::default()
        })
    }

    /// Create a builder from a fully specified policy.
    pub fn from_config(config: RotateConfig) -> Self {
        Self {
            config,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the rotation period in seconds.
    pub fn rotate_seconds(mut self, seconds: u64) -> Self {
        self.config.seconds = seconds;
        self
    }

    /// Set the filename suffix template.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.config.template = template.into();
        self
    }

    /// Align rotation boundaries to local midnight.
    pub fn natural_day(mut self, natural_day: bool) -> Self {
        self.config.natural_day = natural_day;
        self
    }

    /// Append retiring content into one running per-day file.
    pub fn contact(mut self, contact: bool) -> Self {
        self.config.contact = contact;
        self
    }

    /// Set the initial display prefix of one level.
    pub fn prefix(mut self, level: Level, prefix: impl Into<String>) -> Self {
        self.config.prefixes[level.index()] = prefix.into();
        self
    }

    /// Set the initial format flags.
    pub fn flags(mut self, flags: u32) -> Self {
        self.config.flags = flags;
        self
    }

    /// Set the trap for errors the router cannot return to a caller.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the [`FileRouter`].
    ///
    /// # Errors
    ///
    /// Return an error if the rotation engine fails to start, see
    /// [`Rotator::new`].
    pub fn build(self) -> Result<FileRouter, Error> {
        let prefixes = self.config.prefixes.clone();
        let flags = self.config.flags;
        let trap: Arc<dyn Trap> = Arc::from(self.trap);
        let rotator = Rotator::with_trap(self.config, Arc::clone(&trap))?;
        Ok(FileRouter {
            rotator,
            trap,
            prefixes: RwLock::new(prefixes),
            flags: AtomicU32::new(flags),
        })
    }
}

/// A router that maps severities onto the rotation engine's per-level files.
#[derive(Debug)]
pub struct FileRouter {
    rotator: Rotator,
    trap: Arc<dyn Trap>,
    prefixes: RwLock<[String; Level::COUNT]>,
    flags: AtomicU32,
}

impl FileRouter {
    /// Create a file router with the default policy, logging into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<FileRouter, Error> {
        FileRouterBuilder::new(dir).build()
    }

    /// Write a message at [`Level::Debug`].
    pub fn debug(&self, message: &str) -> Result<(), Error> {
        Route::write(self, Level::Debug, message)
    }

    /// Write a message at [`Level::Info`].
    pub fn info(&self, message: &str) -> Result<(), Error> {
        Route::write(self, Level::Info, message)
    }

    /// Write a message at [`Level::Warn`].
    pub fn warn(&self, message: &str) -> Result<(), Error> {
        Route::write(self, Level::Warn, message)
    }

    /// Write a message at [`Level::Error`].
    pub fn error(&self, message: &str) -> Result<(), Error> {
        Route::write(self, Level::Error, message)
    }

    /// Write a message at [`Level::Fatal`].
    pub fn fatal(&self, message: &str) -> Result<(), Error> {
        Route::write(self, Level::Fatal, message)
    }

    /// Write a message at [`Level::Panic`].
    pub fn panic(&self, message: &str) -> Result<(), Error> {
        Route::write(self, Level::Panic, message)
    }

    pub(crate) fn trap(&self) -> &dyn Trap {
        self.trap.as_ref()
    }

    /// Install this router as the backend of the `log` crate macros.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl Route for FileRouter {
    fn write(&self, level: Level, message: &str) -> Result<(), Error> {
        let line = {
            let prefixes = self.prefixes.read().unwrap_or_else(|e| e.into_inner());
            render_line(
                &prefixes[level.index()],
                self.flags(),
                &Zoned::now(),
                message,
            )
        };
        self.rotator.write(level, line.as_bytes())
    }

    fn prefix(&self, level: Level) -> String {
        let prefixes = self.prefixes.read().unwrap_or_else(|e| e.into_inner());
        prefixes[level.index()].clone()
    }

    fn set_prefix(&self, level: Level, prefix: &str) {
        let mut prefixes = self.prefixes.write().unwrap_or_else(|e| e.into_inner());
        prefixes[level.index()] = prefix.to_string();
    }

    fn flags(&self) -> u32 {
        self.flags.load(Ordering::Relaxed)
    }

    fn set_flags(&self, flags: u32) {
        self.flags.store(flags, Ordering::Relaxed);
    }

    fn shutdown(&self) {
        self.rotator.shutdown();
    }
}

/// Render one log line: prefix, then the header the flags ask for, then the
/// message, newline-terminated.
fn render_line(prefix: &str, flags: u32, now: &Zoned, message: &str) -> String {
    let mut line = String::with_capacity(prefix.len() + message.len() + 32);
    line.push_str(prefix);

    let now = if flags & flags::UTC != 0 {
        now.clone().with_time_zone(TimeZone::UTC)
    } else {
        now.clone()
    };

    // SAFETY: write to a string always succeeds
    if flags & flags::DATE != 0 {
        write!(
            line,
            "{:04}/{:02}/{:02} ",
            now.year(),
            now.month(),
            now.day()
        )
        .unwrap();
    }
    if flags & (flags::TIME | flags::MICROSECONDS) != 0 {
        write!(
            line,
            "{:02}:{:02}:{:02}",
            now.hour(),
            now.minute(),
            now.second()
        )
        .unwrap();
        if flags & flags::MICROSECONDS != 0 {
            write!(line, ".{:06}", now.subsec_nanosecond() / 1000).unwrap();
        }
        line.push(' ');
    }

    line.push_str(message);
    if !message.ends_with('\n') {
        line.push('\n');
    }
    line
}
