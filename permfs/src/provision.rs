//! The first-boot flow: check `/perm`, format the partition if needed, reboot.

use crate::device_api::Reboot;
use crate::errors::{PermfsError, PermfsResult};
use crate::formatter::{self, BCACHEFS_EXECUTABLE, DYNAMIC_LOADER};
use crate::payload::Payload;
use permfs_hal::{MountOps, PartitionOps, ProcessOps, PERM_PARTITION};
use std::path::{Path, PathBuf};

pub const DEFAULT_MOUNTPOINT: &str = "/perm";

/// What a provisioning run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mount point was already mounted; nothing was touched.
    AlreadyMounted,
    /// `device` was formatted and a reboot was requested.
    Formatted { device: PathBuf },
}

#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub mountpoint: PathBuf,
    /// Skips partition lookup when set.
    pub device: Option<PathBuf>,
    /// Parent directory for the unpacked tools.
    pub tmp_dir: PathBuf,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            mountpoint: PathBuf::from(DEFAULT_MOUNTPOINT),
            device: None,
            tmp_dir: std::env::temp_dir(),
        }
    }
}

pub struct Provisioner<'a> {
    pub mounts: &'a dyn MountOps,
    pub partitions: &'a dyn PartitionOps,
    pub process: &'a dyn ProcessOps,
    pub rebooter: &'a dyn Reboot,
    pub payload: &'a Payload,
}

impl Provisioner<'_> {
    pub fn run(&self, opts: &ProvisionOptions) -> PermfsResult<Outcome> {
        let mountpoint = opts.mountpoint.display();
        if self.mounts.is_mounted(&opts.mountpoint)? {
            log::info!("{mountpoint} file system already mounted, nothing to do");
            return Ok(Outcome::AlreadyMounted);
        }

        let device = self.target_device(opts)?;
        log::info!(
            "No {mountpoint} mountpoint found. Creating file system on {}",
            device.display()
        );
        self.format(&device, &opts.tmp_dir)?;
        log::info!("Success formatting rootdev perm partition!");

        // Mounting here would only affect this process's mount namespace;
        // after a reboot the mount is set up early for everyone.
        log::info!("triggering reboot to mount {mountpoint}");
        self.rebooter.reboot()?;

        Ok(Outcome::Formatted { device })
    }

    fn target_device(&self, opts: &ProvisionOptions) -> PermfsResult<PathBuf> {
        let device = match &opts.device {
            Some(device) => device.clone(),
            None => self.partitions.partition_device(PERM_PARTITION)?,
        };
        if device.as_os_str().is_empty() {
            return Err(PermfsError::EmptyDevice);
        }
        Ok(device)
    }

    fn format(&self, device: &Path, tmp_dir: &Path) -> PermfsResult<()> {
        self.payload.require(DYNAMIC_LOADER)?;
        self.payload.require(BCACHEFS_EXECUTABLE)?;

        log::debug!(
            "payload files: {:?}",
            self.payload.names().collect::<Vec<_>>()
        );
        let tools = self.payload.unpack_into(tmp_dir)?;
        log::info!(
            "Writing self-contained bcachefs-tools to {} ({} files)",
            tools.path().display(),
            self.payload.names().count()
        );
        formatter::format_device(self.process, &tools, device)
    }
}
