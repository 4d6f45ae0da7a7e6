use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "permfs", version)]
#[command(about = "Create the persistent /perm file system on first boot, then reboot")]
pub struct Cli {
    /// Mount point that must carry the persistent file system
    #[arg(long, default_value = "/perm")]
    pub mountpoint: PathBuf,

    /// Mount table to scan
    #[arg(long, default_value = "/proc/self/mountinfo")]
    pub mountinfo: PathBuf,

    /// Kernel command line used to locate the boot disk
    #[arg(long, default_value = "/proc/cmdline")]
    pub cmdline: PathBuf,

    /// Format this device instead of the boot disk's perm partition
    #[arg(long)]
    pub device: Option<PathBuf>,

    /// Parent directory for the unpacked formatter (default: system temp dir)
    #[arg(long)]
    pub tmp_dir: Option<PathBuf>,

    /// Timeout for the reboot request to the device API
    #[arg(long, default_value_t = 30)]
    pub api_timeout_secs: u64,
}
