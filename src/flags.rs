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

//! Bit flags controlling the header rendered in front of each message.
//!
//! Flags are combined with bitwise or. With both [`DATE`] and [`TIME`] set, a
//! line looks like:
//!
//! ```text
//! 2025/08/30 12:34:56 starting worker pool
//! ```

/// Render the date of the local time zone: `2025/08/30`.
pub const DATE: u32 = 1 << 0;

/// Render the time of the local time zone: `12:34:56`.
pub const TIME: u32 = 1 << 1;

/// Render microsecond resolution: `12:34:56.123456`. Implies [`TIME`].
pub const MICROSECONDS: u32 = 1 << 2;

/// Use UTC rather than the local time zone for [`DATE`] and [`TIME`].
pub const UTC: u32 = 1 << 3;

/// The initial flags of the standard router: date and time.
pub const STD: u32 = DATE | TIME;
