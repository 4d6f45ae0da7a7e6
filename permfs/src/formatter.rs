//! Invocation of the unpacked `bcachefs format`.
//!
//! The tool is not linked against the host's libraries: it is started through
//! the dynamic loader shipped next to it, with `LD_LIBRARY_PATH` pointing at
//! the unpack directory.

use crate::errors::{PermfsError, PermfsResult};
use crate::payload::UnpackedTools;
use permfs_hal::{CommandSpec, ProcessOps};
use std::path::Path;

pub const BCACHEFS_EXECUTABLE: &str = "bcachefs";
pub const BLOCK_SIZE: u32 = 4096;

#[cfg(target_arch = "x86_64")]
pub const DYNAMIC_LOADER: &str = "ld-linux-x86-64.so.2";
#[cfg(not(target_arch = "x86_64"))]
pub const DYNAMIC_LOADER: &str = "ld-linux-aarch64.so.1";

/// Builds the `<loader> <bcachefs> format --block_size=4096 <device>` invocation.
pub fn format_command(tools: &UnpackedTools, device: &Path) -> PermfsResult<CommandSpec> {
    let device = device.to_string_lossy();
    if device.trim().is_empty() {
        return Err(PermfsError::EmptyDevice);
    }
    Ok(CommandSpec::new(tools.file(DYNAMIC_LOADER))
        .arg(tools.file(BCACHEFS_EXECUTABLE).display().to_string())
        .arg("format")
        .arg(format!("--block_size={BLOCK_SIZE}"))
        .arg(device)
        .env("LD_LIBRARY_PATH", tools.path().display().to_string()))
}

/// Formats `device` with bcachefs. Destroys whatever is on it.
pub fn format_device(
    process: &dyn ProcessOps,
    tools: &UnpackedTools,
    device: &Path,
) -> PermfsResult<()> {
    let spec = format_command(tools, device)?;
    log::info!("exec bcachefs with args: {}", spec.command_line());
    process.run_inherited(&spec)?;
    Ok(())
}
