//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without executing them,
//! allowing for CI-safe testing without root privileges or real hardware.

use super::{CommandSpec, MountOps, PartitionOps, ProcessOps};
use crate::path::partition_path;
use crate::{HalError, HalResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    IsMounted {
        path: PathBuf,
    },
    PartitionLookup {
        number: u32,
    },
    Command {
        program: PathBuf,
        args: Vec<String>,
        env: Vec<(String, String)>,
    },
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Currently mounted paths
    mounted_paths: HashSet<PathBuf>,
    /// Disk that partition lookups resolve against
    boot_disk: String,
    /// Exit code every command reports; `None` means success
    command_exit_code: Option<i32>,
}

impl Default for FakeHalState {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
            mounted_paths: HashSet::new(),
            boot_disk: "/dev/mmcblk0".to_string(),
            command_exit_code: None,
        }
    }
}

/// Fake HAL implementation that records operations without executing them.
///
/// This is designed for testing and CI environments where real system
/// operations would fail or be dangerous.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Recorded command invocations, in order.
    pub fn commands(&self) -> Vec<Operation> {
        self.operations()
            .into_iter()
            .filter(|op| matches!(op, Operation::Command { .. }))
            .collect()
    }

    /// Pretend `target` is mounted.
    pub fn add_mount(&self, target: impl Into<PathBuf>) {
        self.state.lock().unwrap().mounted_paths.insert(target.into());
    }

    pub fn set_boot_disk(&self, disk: impl Into<String>) {
        self.state.lock().unwrap().boot_disk = disk.into();
    }

    /// Make every subsequent command exit with `code`.
    pub fn fail_commands_with(&self, code: i32) {
        self.state.lock().unwrap().command_exit_code = Some(code);
    }

    fn record_operation(&self, op: Operation) {
        self.state.lock().unwrap().operations.push(op);
    }
}

impl MountOps for FakeHal {
    fn is_mounted(&self, path: &Path) -> HalResult<bool> {
        self.record_operation(Operation::IsMounted {
            path: path.to_path_buf(),
        });
        Ok(self.state.lock().unwrap().mounted_paths.contains(path))
    }
}

impl PartitionOps for FakeHal {
    fn partition_device(&self, number: u32) -> HalResult<PathBuf> {
        self.record_operation(Operation::PartitionLookup { number });
        let disk = self.state.lock().unwrap().boot_disk.clone();
        Ok(PathBuf::from(partition_path(&disk, number)))
    }
}

impl ProcessOps for FakeHal {
    fn run_inherited(&self, spec: &CommandSpec) -> HalResult<()> {
        self.record_operation(Operation::Command {
            program: spec.program.clone(),
            args: spec.args.clone(),
            env: spec.env.clone(),
        });
        match self.state.lock().unwrap().command_exit_code {
            None => Ok(()),
            Some(code) => Err(HalError::CommandFailed {
                command: spec.command_line(),
                code: Some(code),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_mounts_are_reported() {
        let hal = FakeHal::new();
        assert!(!hal.is_mounted(Path::new("/perm")).unwrap());
        hal.add_mount("/perm");
        assert!(hal.is_mounted(Path::new("/perm")).unwrap());
        assert_eq!(hal.operations().len(), 2);
    }

    #[test]
    fn fake_partition_lookup_uses_boot_disk() {
        let hal = FakeHal::new();
        assert_eq!(
            hal.partition_device(4).unwrap(),
            PathBuf::from("/dev/mmcblk0p4")
        );
        hal.set_boot_disk("/dev/sda");
        assert_eq!(hal.partition_device(4).unwrap(), PathBuf::from("/dev/sda4"));
    }

    #[test]
    fn fake_commands_are_recorded_and_can_fail() {
        let hal = FakeHal::new();
        let spec = CommandSpec::new("/bin/tool").arg("x");
        hal.run_inherited(&spec).unwrap();
        hal.fail_commands_with(1);
        let err = hal.run_inherited(&spec).unwrap_err();
        assert!(err.to_string().contains("/bin/tool x"));
        assert_eq!(hal.commands().len(), 2);
    }
}
