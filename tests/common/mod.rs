//! Shared test utilities and fixtures
//!
//! Runs the `lattice` binary inside a throwaway home directory so logs and
//! config never touch the real one.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Config with a short reset delay so scripts can `wait 100` between gestures.
pub const FAST_CONFIG: &str = "[capture]\ndelay_between_capture_ms = 20\n";

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("write config");
    }

    pub fn write_script(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, content).expect("write script");
        path
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_lattice"))
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .env("LATTICE_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .output()
            .expect("run lattice binary")
    }
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Pixel center of a touch point on the default 900x900 surface.
pub fn center(ordinal: u8) -> (u32, u32) {
    let index = u32::from(ordinal - 1);
    let (row, col) = (index / 3, index % 3);
    ((1 + 3 * col) * 100 + 50, (1 + 3 * row) * 100 + 50)
}

/// Script lines that press on the first point and drag through the rest.
pub fn gesture(ordinals: &[u8]) -> String {
    let mut script = String::new();
    for (i, &ordinal) in ordinals.iter().enumerate() {
        let (x, y) = center(ordinal);
        let action = if i == 0 { "down" } else { "move" };
        let _ = writeln!(script, "{action} {x} {y}");
    }
    if let Some(&last) = ordinals.last() {
        let (x, y) = center(last);
        let _ = writeln!(script, "up {x} {y}");
    }
    script
}
