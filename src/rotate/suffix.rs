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

//! Filename suffix rendering.
//!
//! A template like `"-{{yyyy}}{{mm}}{{dd}}-{{pid}}"` is rendered into the
//! concrete suffix of a generation's filenames at the instant the generation
//! opens. Rendering is pure: the same template and instant always produce the
//! same suffix.

use std::path::Path;

use jiff::Zoned;

/// Process-scoped identity resolved once at startup and passed explicitly,
/// rather than read from ambient globals at every render.
#[derive(Debug, Clone)]
pub struct ProcessTags {
    /// The program name: the basename of the running executable.
    pub program: String,
    /// The short hostname: truncated at the first `.`.
    pub host: String,
    /// The sanitized user name: path separators replaced with `_`.
    pub user: String,
    /// The process id.
    pub pid: u32,
}

impl ProcessTags {
    /// Resolve the tags from the environment.
    ///
    /// Missing pieces fall back to `unknownhost` / `unknownuser` rather than
    /// failing; a log filename is not worth refusing to start over.
    pub fn resolve() -> Self {
        let program = std::env::current_exe()
            .ok()
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());

        let host = std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.is_empty())
            .map(|h| short_hostname(&h).to_string())
            .unwrap_or_else(|| "unknownhost".to_string());

        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .filter(|u| !u.is_empty())
            .map(|u| sanitize_user(&u))
            .unwrap_or_else(|| "unknownuser".to_string());

        Self {
            program,
            host,
            user,
            pid: std::process::id(),
        }
    }
}

/// Truncate a hostname at the first period.
///
/// For instance, given `www.example.com` this returns `www`.
fn short_hostname(hostname: &str) -> &str {
    match hostname.find('.') {
        Some(i) => &hostname[..i],
        None => hostname,
    }
}

/// User names may contain filepath separators, e.g. `DOMAIN\user` on Windows.
fn sanitize_user(user: &str) -> String {
    user.replace(['\\', '/'], "_")
}

/// Render `template` at the given instant.
///
/// Recognized tokens:
///
/// | token          | substitution                     |
/// |----------------|----------------------------------|
/// | `{{program}}`  | program name                     |
/// | `{{host}}`     | short hostname                   |
/// | `{{username}}` | sanitized user name              |
/// | `{{yyyy}}`     | four-digit year                  |
/// | `{{mm}}`       | two-digit month                  |
/// | `{{dd}}`       | two-digit day                    |
/// | `{{HH}}`       | two-digit hour                   |
/// | `{{MM}}`       | two-digit minute                 |
/// | `{{SS}}`       | two-digit second                 |
/// | `{{pid}}`      | process id                       |
///
/// Unrecognized text passes through unchanged. An empty template renders to
/// an empty suffix.
pub fn render(template: &str, now: &Zoned, tags: &ProcessTags) -> String {
    if template.is_empty() {
        return String::new();
    }

    template
        .replace("{{program}}", &tags.program)
        .replace("{{host}}", &tags.host)
        .replace("{{username}}", &tags.user)
        .replace("{{yyyy}}", &format!("{:04}", now.year()))
        .replace("{{mm}}", &format!("{:02}", now.month()))
        .replace("{{dd}}", &format!("{:02}", now.day()))
        .replace("{{HH}}", &format!("{:02}", now.hour()))
        .replace("{{MM}}", &format!("{:02}", now.minute()))
        .replace("{{SS}}", &format!("{:02}", now.second()))
        .replace("{{pid}}", &tags.pid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> ProcessTags {
        ProcessTags {
            program: "myprog".to_string(),
            host: "worker1".to_string(),
            user: "alice".to_string(),
            pid: 4242,
        }
    }

    fn instant() -> Zoned {
        "2025-03-07T09:05:02[UTC]".parse().unwrap()
    }

    #[test]
    fn test_render_all_tokens() {
        let template = "{{program}}-{{host}}-{{username}}-{{yyyy}}{{mm}}{{dd}}-{{HH}}{{MM}}{{SS}}-{{pid}}";
        let suffix = render(template, &instant(), &tags());
        assert_eq!(suffix, "myprog-worker1-alice-20250307-090502-4242");
    }

    #[test]
    fn test_render_is_pure() {
        let template = "-{{yyyy}}{{mm}}{{dd}}-{{HH}}{{MM}}{{SS}}-{{pid}}";
        let now = instant();
        let t = tags();
        assert_eq!(render(template, &now, &t), render(template, &now, &t));
    }

    #[test]
    fn test_render_empty_template() {
        assert_eq!(render("", &instant(), &tags()), "");
    }

    #[test]
    fn test_unrecognized_text_passes_through() {
        let suffix = render("-{{nope}}.{{yyyy}}", &instant(), &tags());
        assert_eq!(suffix, "-{{nope}}.2025");
    }

    #[test]
    fn test_short_hostname() {
        assert_eq!(short_hostname("www.example.com"), "www");
        assert_eq!(short_hostname("standalone"), "standalone");
    }

    #[test]
    fn test_sanitize_user() {
        assert_eq!(sanitize_user(r"CORP\bob"), "CORP_bob");
        assert_eq!(sanitize_user("plain"), "plain");
    }
}
