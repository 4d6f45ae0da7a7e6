//! HAL trait definitions and implementations.
//!
//! This module defines the core traits for system operations and provides
//! both real (LinuxHal) and fake (FakeHal) implementations.

pub mod fake_hal;
pub mod linux_hal;
pub mod mount_ops;
pub mod partition_ops;
pub mod process_ops;

pub use fake_hal::{FakeHal, Operation};
pub use linux_hal::LinuxHal;
pub use mount_ops::MountOps;
pub use partition_ops::{PartitionOps, PERM_PARTITION};
pub use process_ops::{CommandSpec, ProcessOps};

