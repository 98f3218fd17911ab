//! Common test utilities for sheetsync integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch directory holding inputs, outputs and an isolated config home
#[allow(dead_code)]
pub struct TestDir {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the directory root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestDir {
    /// Create a new test directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file, creating parent directories
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file relative to the root
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists relative to the root
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// sheetsync command that never sees the user's config or token
    pub fn cmd(&self) -> Command {
        let mut cmd = sheetsync_cmd();
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", self.path.join("config-home"))
            .env("HOME", &self.path)
            .env_remove("SHEETSYNC_CONFIG")
            .env_remove("SHEETSYNC_API_TOKEN")
            .env_remove("SHEETSYNC_SHEET_ID")
            .env_remove("RUST_LOG");
        cmd
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn sheetsync_cmd() -> Command {
    Command::cargo_bin("sheetsync").unwrap()
}
