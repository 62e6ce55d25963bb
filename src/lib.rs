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

//! Logroll is a leveled, rotating file-logging backend.
//!
//! # Overview
//!
//! Each severity level writes to its own file in one log directory. A
//! background scheduler rolls every level over to a new generation at each
//! rotation boundary; completed generations get deterministic, sequence
//! numbered (or per-day) filenames. Files a crashed process left behind are
//! finalized on the next startup, so no record is lost before, during, or
//! after a crash.
//!
//! # Examples
//!
//! ```no_run
//! use logroll::FileRouterBuilder;
//! use logroll::Route;
//! use logroll::flags;
//!
//! let router = FileRouterBuilder::new("./logs")
//!     .rotate_seconds(3600)
//!     .flags(flags::STD)
//!     .build()
//!     .unwrap();
//!
//! router.info("service started").unwrap();
//! router.shutdown();
//! ```
//!
//! Or behind the `log` crate macros:
//!
//! ```no_run
//! use logroll::FileRouter;
//!
//! FileRouter::new("./logs").unwrap().install().unwrap();
//!
//! log::info!("this lands in INFO-<suffix>.tmp");
//! ```

pub mod flags;
pub mod rotate;

mod bridge;
mod config;
mod error;
mod level;
mod router;
mod trap;

pub use config::DEFAULT_ROTATE_SECONDS;
pub use config::DEFAULT_TEMPLATE;
pub use config::MIN_ROTATE_SECONDS;
pub use config::RotateConfig;
pub use error::Error;
pub use level::Level;
pub use rotate::Rotator;
pub use router::FileRouter;
pub use router::FileRouterBuilder;
pub use router::Route;
pub use trap::DefaultTrap;
pub use trap::Trap;
