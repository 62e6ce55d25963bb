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
use std::path::Path;
use std::time::Duration;

use logroll::FileRouterBuilder;
use logroll::Level;
use logroll::Route;
use tempfile::TempDir;

fn names(dir: &Path) -> Vec<String> {
    let mut names = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

#[test]
fn test_every_level_gets_its_own_finalized_file() {
    let dir = TempDir::new().unwrap();
    let router = FileRouterBuilder::new(dir.path())
        .template("-lifecycle")
        .rotate_seconds(3600)
        .build()
        .unwrap();

    for level in Level::all() {
        router.write(level, &format!("hello {level}")).unwrap();
    }
    router.shutdown();

    let names = names(dir.path());
    assert_eq!(names.len(), Level::COUNT);
    for level in Level::all() {
        let name = format!("{level}-lifecycle.seq001.log");
        assert!(names.contains(&name), "missing {name}");
        let content = fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(content, format!("hello {level}\n"));
    }
}

#[test]
fn test_timer_rotation_finalizes_the_previous_generation() {
    let dir = TempDir::new().unwrap();
    let router = FileRouterBuilder::new(dir.path())
        .rotate_seconds(5)
        .build()
        .unwrap();

    router.info("first").unwrap();
    // the next boundary is at most one full period away
    std::thread::sleep(Duration::from_millis(6500));
    router.info("second").unwrap();
    router.shutdown();

    let names = names(dir.path());
    assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    let info = names
        .iter()
        .filter(|n| n.starts_with("INFO"))
        .collect::<Vec<_>>();
    assert!(info.len() >= 2, "expected at least two generations: {info:?}");

    let mut merged = String::new();
    for name in info {
        merged.push_str(&fs::read_to_string(dir.path().join(name)).unwrap());
    }
    assert!(merged.contains("first"));
    assert!(merged.contains("second"));
}

#[test]
fn test_restart_does_not_overwrite_finalized_generations() {
    let dir = TempDir::new().unwrap();
    let build = || {
        FileRouterBuilder::new(dir.path())
            .template("-20250307")
            .rotate_seconds(3600)
            .build()
            .unwrap()
    };

    let router = build();
    router.info("first run").unwrap();
    router.shutdown();

    let router = build();
    router.info("second run").unwrap();
    router.shutdown();

    let first = fs::read_to_string(dir.path().join("INFO-20250307.seq001.log")).unwrap();
    let second = fs::read_to_string(dir.path().join("INFO-20250307.seq002.log")).unwrap();
    assert_eq!(first, "first run\n");
    assert_eq!(second, "second run\n");
}

#[test]
fn test_crash_recovery_merges_contact_mode_generations() {
    let dir = TempDir::new().unwrap();
    let build = || {
        FileRouterBuilder::new(dir.path())
            .template("-{{yyyy}}{{mm}}{{dd}}")
            .contact(true)
            .build()
            .unwrap()
    };

    for message in ["a", "b", "c"] {
        let router = build();
        router.info(message).unwrap();
        // simulate a crash: neither shutdown nor drop runs
        std::mem::forget(router);
    }

    let router = build();
    router.shutdown();

    let info = names(dir.path())
        .into_iter()
        .find(|n| n.starts_with("INFO") && n.ends_with(".log"))
        .expect("recovered INFO file");
    let merged = fs::read_to_string(dir.path().join(info)).unwrap();
    assert_eq!(merged, "a\nb\nc\n");
}
