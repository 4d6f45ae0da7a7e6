//! Linux HAL implementation reading real kernel state and spawning real processes.

use super::{CommandSpec, MountOps, PartitionOps, ProcessOps};
use crate::path::{disk_of_partition, partition_path};
use crate::procfs::cmdline::{self, RootSpec};
use crate::procfs::mountinfo;
use crate::{HalError, HalResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const DEFAULT_MOUNTINFO: &str = "/proc/self/mountinfo";
const DEFAULT_CMDLINE: &str = "/proc/cmdline";
const DEFAULT_BY_PARTUUID: &str = "/dev/disk/by-partuuid";
/// Boot disk assumed when the kernel command line names no root device.
const DEFAULT_BOOT_DISK: &str = "/dev/mmcblk0";

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone)]
pub struct LinuxHal {
    mountinfo_path: PathBuf,
    cmdline_path: PathBuf,
    by_partuuid_dir: PathBuf,
}

impl Default for LinuxHal {
    fn default() -> Self {
        Self {
            mountinfo_path: PathBuf::from(DEFAULT_MOUNTINFO),
            cmdline_path: PathBuf::from(DEFAULT_CMDLINE),
            by_partuuid_dir: PathBuf::from(DEFAULT_BY_PARTUUID),
        }
    }
}

impl LinuxHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mountinfo(mut self, path: impl Into<PathBuf>) -> Self {
        self.mountinfo_path = path.into();
        self
    }

    pub fn with_cmdline(mut self, path: impl Into<PathBuf>) -> Self {
        self.cmdline_path = path.into();
        self
    }

    pub fn with_by_partuuid_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.by_partuuid_dir = path.into();
        self
    }

    fn partition_on_disk(disk_partition: &Path, number: u32) -> HalResult<PathBuf> {
        let raw = disk_partition.to_string_lossy();
        let disk = disk_of_partition(&raw).ok_or_else(|| {
            HalError::ValidationFailed(format!("{raw} is not a partition device"))
        })?;
        Ok(PathBuf::from(partition_path(&disk, number)))
    }
}

fn map_command_err(spec: &CommandSpec, err: std::io::Error) -> HalError {
    if err.kind() == std::io::ErrorKind::NotFound {
        return HalError::CommandNotFound(spec.command_line());
    }
    HalError::Spawn {
        command: spec.command_line(),
        source: err,
    }
}

impl MountOps for LinuxHal {
    fn is_mounted(&self, path: &Path) -> HalResult<bool> {
        let content = fs::read_to_string(&self.mountinfo_path)?;
        Ok(mountinfo::is_mounted_in(&content, path))
    }
}

impl PartitionOps for LinuxHal {
    fn partition_device(&self, number: u32) -> HalResult<PathBuf> {
        let content = fs::read_to_string(&self.cmdline_path)?;
        match cmdline::parse_root(&content)? {
            None => {
                log::debug!("no root= on kernel command line, assuming {DEFAULT_BOOT_DISK}");
                Ok(PathBuf::from(partition_path(DEFAULT_BOOT_DISK, number)))
            }
            Some(RootSpec::Device(dev)) => Self::partition_on_disk(Path::new(&dev), number),
            Some(RootSpec::MbrPartUuid { disk_signature, .. }) => Ok(self
                .by_partuuid_dir
                .join(format!("{disk_signature}-{number:02x}"))),
            Some(RootSpec::GptPartUuid(uuid)) => {
                let link = self.by_partuuid_dir.join(&uuid);
                let resolved = fs::canonicalize(&link)?;
                Self::partition_on_disk(&resolved, number)
            }
        }
    }
}

impl ProcessOps for LinuxHal {
    fn run_inherited(&self, spec: &CommandSpec) -> HalResult<()> {
        let status = Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| map_command_err(spec, e))?;

        if !status.success() {
            return Err(HalError::CommandFailed {
                command: spec.command_line(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PERM_PARTITION;
    use tempfile::tempdir;

    fn hal_with_cmdline(dir: &Path, cmdline: &str) -> LinuxHal {
        let path = dir.join("cmdline");
        fs::write(&path, cmdline).unwrap();
        LinuxHal::new()
            .with_cmdline(path)
            .with_by_partuuid_dir(dir.join("by-partuuid"))
    }

    #[test]
    fn is_mounted_reads_configured_mountinfo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mountinfo");
        fs::write(&path, "31 22 179:4 / /perm rw - ext4 /dev/mmcblk0p4 rw\n").unwrap();
        let hal = LinuxHal::new().with_mountinfo(&path);
        assert!(hal.is_mounted(Path::new("/perm")).unwrap());
        assert!(!hal.is_mounted(Path::new("/boot")).unwrap());
    }

    #[test]
    fn missing_mountinfo_is_an_io_error() {
        let dir = tempdir().unwrap();
        let hal = LinuxHal::new().with_mountinfo(dir.path().join("absent"));
        assert!(matches!(
            hal.is_mounted(Path::new("/perm")),
            Err(HalError::Io(_))
        ));
    }

    #[test]
    fn partition_from_root_device() {
        let dir = tempdir().unwrap();
        let hal = hal_with_cmdline(dir.path(), "root=/dev/mmcblk0p2 rootwait\n");
        assert_eq!(
            hal.partition_device(PERM_PARTITION).unwrap(),
            PathBuf::from("/dev/mmcblk0p4")
        );
    }

    #[test]
    fn partition_defaults_to_mmcblk0() {
        let dir = tempdir().unwrap();
        let hal = hal_with_cmdline(dir.path(), "console=tty1\n");
        assert_eq!(
            hal.partition_device(PERM_PARTITION).unwrap(),
            PathBuf::from("/dev/mmcblk0p4")
        );
    }

    #[test]
    fn partition_from_mbr_partuuid() {
        let dir = tempdir().unwrap();
        let hal = hal_with_cmdline(dir.path(), "root=PARTUUID=2e18c40c-02\n");
        assert_eq!(
            hal.partition_device(PERM_PARTITION).unwrap(),
            dir.path().join("by-partuuid").join("2e18c40c-04")
        );
    }

    #[cfg(unix)]
    #[test]
    fn partition_from_gpt_partuuid_follows_symlink() {
        let dir = tempdir().unwrap();
        let links = dir.path().join("by-partuuid");
        fs::create_dir_all(&links).unwrap();
        let target = dir.path().join("sdb2");
        fs::write(&target, b"").unwrap();
        let uuid = "60c24cc1-f3f9-427a-8199-76baa2d60002";
        std::os::unix::fs::symlink(&target, links.join(uuid)).unwrap();

        let hal = hal_with_cmdline(dir.path(), &format!("root=PARTUUID={uuid}\n"));
        let resolved = fs::canonicalize(&target).unwrap();
        let disk = resolved.to_string_lossy().trim_end_matches('2').to_string();
        assert_eq!(
            hal.partition_device(PERM_PARTITION).unwrap(),
            PathBuf::from(format!("{disk}4"))
        );
    }

    #[test]
    fn whole_disk_root_is_rejected() {
        let dir = tempdir().unwrap();
        let hal = hal_with_cmdline(dir.path(), "root=/dev/sda\n");
        assert!(matches!(
            hal.partition_device(PERM_PARTITION),
            Err(HalError::ValidationFailed(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn run_inherited_reports_success_and_failure() {
        let hal = LinuxHal::new();
        hal.run_inherited(&CommandSpec::new("true")).unwrap();

        let spec = CommandSpec::new("sh").arg("-c").arg("exit 3");
        match hal.run_inherited(&spec) {
            Err(HalError::CommandFailed { command, code }) => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn run_inherited_passes_extra_env() {
        let hal = LinuxHal::new();
        let spec = CommandSpec::new("sh")
            .arg("-c")
            .arg("test \"$PERMFS_PROBE\" = yes")
            .env("PERMFS_PROBE", "yes");
        hal.run_inherited(&spec).unwrap();
    }

    #[test]
    fn run_inherited_maps_missing_program() {
        let hal = LinuxHal::new();
        let spec = CommandSpec::new("/nonexistent/permfs-no-such-tool").arg("format");
        match hal.run_inherited(&spec) {
            Err(HalError::CommandNotFound(command)) => {
                assert_eq!(command, "/nonexistent/permfs-no-such-tool format");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn spawn_failure_keeps_command_line() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let loader = dir.path().join("ld.so");
        fs::write(&loader, b"not an executable").unwrap();
        fs::set_permissions(&loader, fs::Permissions::from_mode(0o644)).unwrap();

        let spec = CommandSpec::new(loader.clone())
            .arg(dir.path().join("bcachefs").display().to_string())
            .arg("format")
            .arg("--block_size=4096")
            .arg("/dev/mmcblk0p4");
        let err = LinuxHal::new().run_inherited(&spec).unwrap_err();
        assert!(matches!(err, HalError::Spawn { .. }), "{err:?}");
        let msg = err.to_string();
        assert!(msg.contains(&spec.command_line()), "{msg}");
        assert!(msg.contains("format --block_size=4096 /dev/mmcblk0p4"), "{msg}");
    }
}
