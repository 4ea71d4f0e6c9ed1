//! Test utilities: a recording stub command runner and source fixtures.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::core::component::SourceComponent;
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

/// A successful, empty process result.
pub fn ok_output() -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(0),
        stdout: String::new(),
        stderr: String::new(),
    }
}

/// A failed process result with the given exit code.
pub fn failed_output(code: i32) -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: format!("stub failure (exit {})", code),
    }
}

/// Create executable stand-ins for a stage's compiler binaries.
pub fn fake_compiler_binaries(stage_dir: &Path) {
    let bin = stage_dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    for name in ["clang", "clang++"] {
        let path = bin.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }
}

/// Succeed, and when the command is a plain build, drop fake compiler
/// binaries into its working directory so the next stage's configure
/// finds them.
pub fn succeed_and_fake_toolchain(cmd: &ProcessBuilder) -> ProcessOutput {
    let args = cmd.get_args();
    let is_plain_build = cmd.get_program() == Path::new("make")
        && !args.iter().any(|a| a == "check-all" || a == "install");
    if is_plain_build {
        if let Some(cwd) = cmd.get_cwd() {
            fake_compiler_binaries(cwd);
        }
    }
    ok_output()
}

type Responder = Box<dyn Fn(&ProcessBuilder) -> ProcessOutput>;

/// A [`CommandRunner`] that records every call and answers from a
/// programmable responder instead of spawning processes.
pub struct StubRunner {
    calls: RefCell<Vec<ProcessBuilder>>,
    responder: Responder,
}

impl StubRunner {
    /// Every command succeeds; plain builds fake a produced toolchain.
    pub fn succeeding() -> Self {
        StubRunner::with_responder(succeed_and_fake_toolchain)
    }

    /// Every command fails with the given exit code.
    pub fn failing_with(code: i32) -> Self {
        StubRunner::with_responder(move |_| failed_output(code))
    }

    /// Custom behavior per command.
    pub fn with_responder(f: impl Fn(&ProcessBuilder) -> ProcessOutput + 'static) -> Self {
        StubRunner {
            calls: RefCell::new(Vec::new()),
            responder: Box::new(f),
        }
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<ProcessBuilder> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CommandRunner for StubRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        self.calls.borrow_mut().push(cmd.clone());
        Ok((self.responder)(cmd))
    }
}

/// Create an extracted-component directory with a marker file and return
/// its record.
pub fn extracted_component(parent: &Path, name: &str) -> SourceComponent {
    let path = parent.join(name);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("marker.txt"), name).unwrap();
    SourceComponent::new(name, path)
}
