//! Partition lookup relative to the disk the system booted from.

use crate::HalResult;
use std::path::PathBuf;

/// Partition number of the persistent storage partition on the boot disk.
pub const PERM_PARTITION: u32 = 4;

pub trait PartitionOps {
    /// Return the device path of partition `number` on the boot disk.
    fn partition_device(&self, number: u32) -> HalResult<PathBuf>;
}
