//! Common test utilities: a throwaway repository with stub tools

#![allow(dead_code)]

use assert_cmd::cargo::CommandCargoExt;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_INGEST: &str = r#"#!/bin/sh
pwd -P > "$HARNESS_LOG_DIR/ingest.cwd"
printf '%s\n' "$PYTHONPATH" > "$HARNESS_LOG_DIR/ingest.pythonpath"
printf '%s\n' "$@" >> "$HARNESS_LOG_DIR/ingest.args"
echo ingest >> "$HARNESS_LOG_DIR/calls"
while [ $# -gt 0 ]; do
  case "$1" in
    --output-dir) mkdir -p "$2"; echo '[]' > "$2/book-war-and-peace-1p.txt.json"; shift ;;
    --work-dir) mkdir -p "$2/partitioned"; shift ;;
  esac
  shift
done
if [ -n "$FAKE_INGEST_SLEEP" ]; then
  exec sleep "$FAKE_INGEST_SLEEP"
fi
exit "${FAKE_INGEST_EXIT:-0}"
"#;

const FAKE_DIFF: &str = r#"#!/bin/sh
echo "diff $*" >> "$HARNESS_LOG_DIR/calls"
exit "${FAKE_DIFF_EXIT:-0}"
"#;

const FAKE_COPY: &str = r#"#!/bin/sh
echo "copy $*" >> "$HARNESS_LOG_DIR/calls"
exit "${FAKE_COPY_EXIT:-0}"
"#;

/// A temp tree laid out as `<root>/repo/test_e2e` with stub tools
pub struct StubRepo {
    temp: TempDir,
    pub repo_root: PathBuf,
    pub script_dir: PathBuf,
    pub ingest_program: PathBuf,
    pub log_dir: PathBuf,
}

impl StubRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().canonicalize().unwrap();
        let repo_root = base.join("repo");
        let script_dir = repo_root.join("test_e2e");
        let log_dir = base.join("logs");
        fs::create_dir_all(&script_dir).unwrap();
        fs::create_dir_all(&log_dir).unwrap();

        let ingest_program = base.join("bin").join("fake-ingest");
        fs::create_dir_all(ingest_program.parent().unwrap()).unwrap();
        write_executable(&ingest_program, FAKE_INGEST);
        write_executable(&script_dir.join("check-diff-expected-output.sh"), FAKE_DIFF);
        write_executable(&script_dir.join("evaluation-ingest-cp.sh"), FAKE_COPY);

        Self {
            temp,
            repo_root,
            script_dir,
            ingest_program,
            log_dir,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// The harness binary wired to this repo, with a clean environment
    pub fn command(&self) -> assert_cmd::Command {
        self.command_with_program(&self.ingest_program)
    }

    pub fn command_with_program(&self, ingest_program: &Path) -> assert_cmd::Command {
        assert_cmd::Command::from_std(self.std_command_with_program(ingest_program))
    }

    /// Same wiring as [`StubRepo::command`], for tests that spawn and signal the binary
    pub fn std_command(&self) -> std::process::Command {
        self.std_command_with_program(&self.ingest_program)
    }

    fn std_command_with_program(&self, ingest_program: &Path) -> std::process::Command {
        let mut cmd = std::process::Command::cargo_bin("ingest-e2e").unwrap();
        cmd.arg("--script-dir")
            .arg(&self.script_dir)
            .arg("--ingest-program")
            .arg(ingest_program)
            .env("HARNESS_LOG_DIR", &self.log_dir)
            .env_remove("OCTOAI_API_KEY")
            .env_remove("OUTPUT_ROOT")
            .env_remove("MAX_PROCESSES")
            .env_remove("PYTHONPATH")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn output_dir(&self) -> PathBuf {
        self.script_dir.join("structured-output").join("embed-octoai")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.script_dir.join("workdir").join("embed-octoai")
    }

    /// Raw log contents, for runs that log non-UTF-8 paths
    pub fn log_bytes(&self, name: &str) -> Vec<u8> {
        fs::read(self.log_dir.join(name)).unwrap_or_default()
    }

    pub fn log(&self, name: &str) -> String {
        fs::read_to_string(self.log_dir.join(name)).unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.log("calls").lines().map(str::to_string).collect()
    }

    pub fn ingest_args(&self) -> Vec<String> {
        self.log("ingest.args").lines().map(str::to_string).collect()
    }

    pub fn ingest_arg(&self, flag: &str) -> Option<String> {
        let args = self.ingest_args();
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    }
}

fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}
