use std::path::PathBuf;
use std::process::{Child, Command};
use tempfile::TempDir;

/// A lock path inside a fresh temporary directory. The file is not created.
pub(crate) fn temp_lock_path(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    (temp_dir, path)
}

/// PID of a child process that has already exited and been reaped.
pub(crate) fn reaped_pid() -> u32 {
    let mut child = Command::new("true")
        .spawn()
        .unwrap_or_else(|e| panic!("failed to spawn `true`: {}", e));
    let pid = child.id();
    child.wait().unwrap();
    pid
}

/// A running child process, killed and reaped on drop.
pub(crate) struct LiveProcess {
    child: Child,
}

impl LiveProcess {
    pub(crate) fn spawn() -> Self {
        let child = Command::new("sleep")
            .arg("60")
            .spawn()
            .unwrap_or_else(|e| panic!("failed to spawn `sleep`: {}", e));
        Self { child }
    }

    pub(crate) fn pid(&self) -> u32 {
        self.child.id()
    }
}

impl Drop for LiveProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
