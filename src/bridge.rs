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

//! Integration with the `log` crate macros.

use crate::Level;
use crate::Route;
use crate::router::FileRouter;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Debug,
        }
    }
}

impl log::Log for FileRouter {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let message = record.args().to_string();
        if let Err(err) = Route::write(self, record.level().into(), &message) {
            // the log contract has no error path; report through the trap
            self.trap().trap(&err);
        }
    }

    fn flush(&self) {
        // writes are unbuffered
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use crate::Level;
    use crate::Trap;
    use crate::router::FileRouterBuilder;

    #[derive(Debug, Clone, Default)]
    struct RecordingTrap {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Trap for RecordingTrap {
        fn trap(&self, err: &crate::Error) {
            self.seen.lock().unwrap().push(err.to_string());
        }
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(Level::from(log::Level::Error), Level::Error);
        assert_eq!(Level::from(log::Level::Trace), Level::Debug);
    }

    #[test]
    fn test_log_record_is_routed_to_the_level_file() {
        let dir = TempDir::new().unwrap();
        let router = FileRouterBuilder::new(dir.path())
            .template("-bridged")
            .rotate_seconds(3600)
            .build()
            .unwrap();

        let record = log::Record::builder()
            .args(format_args!("via the log crate"))
            .level(log::Level::Warn)
            .build();
        log::Log::log(&router, &record);
        crate::Route::shutdown(&router);

        let content = fs::read_to_string(dir.path().join("WARN-bridged.seq001.log")).unwrap();
        assert_eq!(content, "via the log crate\n");
    }

    #[test]
    fn test_write_failures_reach_the_configured_trap() {
        let dir = TempDir::new().unwrap();
        let trap = RecordingTrap::default();
        let router = FileRouterBuilder::new(dir.path())
            .trap(trap.clone())
            .build()
            .unwrap();
        crate::Route::shutdown(&router);

        let record = log::Record::builder()
            .args(format_args!("dropped"))
            .level(log::Level::Info)
            .build();
        log::Log::log(&router, &record);

        let seen = trap.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("shut down"));
    }
}
