use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// Isolated `Content/` and `Binaries/Content/` trees
pub struct TestEnv {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    /// An environment whose source tree holds `settings` as `builder.settings`
    pub fn with_settings(settings: &str) -> Self {
        let env = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fs::create_dir_all(env.source()).unwrap();
        env.write_source("builder.settings", settings);
        env
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.dir.path().join("Content")
    }

    pub fn target(&self) -> PathBuf {
        self.dir.path().join("Binaries").join("Content")
    }

    pub fn write_source(&self, path: &str, content: &str) {
        let full = self.source().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    /// Push the modification time of a source file into the future
    pub fn touch_source(&self, path: &str) {
        let file = fs::File::options()
            .write(true)
            .open(self.source().join(path))
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
    }

    pub fn remove_source(&self, path: &str) {
        fs::remove_file(self.source().join(path)).unwrap();
    }

    pub fn read_target(&self, path: &str) -> String {
        fs::read_to_string(self.target().join(path)).unwrap()
    }

    pub fn target_exists(&self, path: &str) -> bool {
        self.target().join(path).exists()
    }

    pub fn metadata(&self, name: &str) -> serde_json::Value {
        let content = fs::read_to_string(self.source().join(".builder").join(name)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Run the `mason` binary against this environment
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_mason"))
            .current_dir(self.root())
            .env_remove("MASON_PROFILE")
            .env("RUST_LOG", "info")
            .args(args)
            .output()
            .unwrap()
    }
}
