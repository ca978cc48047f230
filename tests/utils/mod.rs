// Integration test utilities
//
// Builds a throwaway kernel tree, compilation database and fake extraction
// tool inside a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch area holding everything one declextract run needs
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(ws.kernel_dir()).unwrap();
        fs::create_dir_all(ws.path().join("outputs")).unwrap();
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn kernel_dir(&self) -> PathBuf {
        self.path().join("linux")
    }

    pub fn output_path(&self) -> PathBuf {
        self.path().join("out.txt")
    }

    pub fn compile_commands_path(&self) -> PathBuf {
        self.path().join("compile_commands.json")
    }

    pub fn tool_path(&self) -> PathBuf {
        self.path().join("fake-extract.sh")
    }

    /// Write a syscall table below `<kernel>/arch`
    pub fn write_table(&self, rel: &str, content: &str) {
        let path = self.kernel_dir().join("arch").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write a compilation database listing `files` in the given order
    pub fn write_compile_commands(&self, files: &[&str]) {
        let entries: Vec<serde_json::Value> = files
            .iter()
            .map(|f| {
                serde_json::json!({
                    "arguments": ["gcc", "-c", f],
                    "directory": self.kernel_dir(),
                    "file": f,
                    "output": f.replace(".c", ".o"),
                })
            })
            .collect();
        fs::write(
            self.compile_commands_path(),
            serde_json::to_string_pretty(&entries).unwrap(),
        )
        .unwrap();
    }

    /// Write a fake extraction tool answering per source file
    ///
    /// An output of `ERR:<text>` prints `<text>` to stderr and exits 1;
    /// `EXIT:<code>` exits with `<code>` and no output.
    pub fn write_tool(&self, outputs: &[(&str, &str)]) {
        let mut script = String::from("#!/bin/sh\n[ \"$1\" = \"-p\" ] || exit 64\ncase \"$3\" in\n");
        for (i, (file, out)) in outputs.iter().enumerate() {
            let arm = if let Some(err) = out.strip_prefix("ERR:") {
                let path = self.path().join("outputs").join(format!("{}.err", i));
                fs::write(&path, err).unwrap();
                format!("cat '{}' >&2; exit 1", path.display())
            } else if let Some(code) = out.strip_prefix("EXIT:") {
                format!("exit {}", code)
            } else {
                let path = self.path().join("outputs").join(format!("{}.txt", i));
                fs::write(&path, out).unwrap();
                format!("cat '{}'", path.display())
            };
            script.push_str(&format!("  {}) {} ;;\n", file, arm));
        }
        script.push_str("esac\n");

        let tool = self.tool_path();
        fs::write(&tool, script).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// declextract command pointed at this workspace
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("declextract");
        cmd.arg("--compile-commands")
            .arg(self.compile_commands_path())
            .arg("--binary")
            .arg(self.tool_path())
            .arg("--output")
            .arg(self.output_path())
            .arg("--kernel")
            .arg(self.kernel_dir());
        cmd
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.output_path()).unwrap()
    }
}
