//! permfs: make sure the persistent `/perm` file system exists.
//!
//! On first boot the perm partition is empty. This crate formats it with a
//! bundled bcachefs toolchain and asks the device API to reboot, so that the
//! new file system is mounted early by init on the next boot.

pub mod cli;
pub mod config;
pub mod device_api;
pub mod errors;
pub mod formatter;
pub mod logging;
pub mod payload;
pub mod provision;

use anyhow::{Context, Result};
use cli::Cli;
use config::ConfigFiles;
use device_api::OnDeviceReboot;
use payload::Payload;
use permfs_hal::LinuxHal;
use provision::{Outcome, ProvisionOptions, Provisioner};
use std::time::Duration;

/// Exit status that tells the supervisor not to restart this one-shot service.
pub const SUPERVISOR_EXIT_CODE: i32 = 125;

pub fn run(cli: &Cli) -> Result<Outcome> {
    let hal = LinuxHal::new()
        .with_mountinfo(&cli.mountinfo)
        .with_cmdline(&cli.cmdline);
    let rebooter = OnDeviceReboot::new(ConfigFiles::default())
        .with_timeout(Duration::from_secs(cli.api_timeout_secs));
    let payload = Payload::embedded();

    let opts = ProvisionOptions {
        mountpoint: cli.mountpoint.clone(),
        device: cli.device.clone(),
        tmp_dir: cli.tmp_dir.clone().unwrap_or_else(std::env::temp_dir),
    };

    Provisioner {
        mounts: &hal,
        partitions: &hal,
        process: &hal,
        rebooter: &rebooter,
        payload: &payload,
    }
    .run(&opts)
    .with_context(|| format!("ensuring {} file system", cli.mountpoint.display()))
}
