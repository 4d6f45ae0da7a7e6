//! permfs system abstraction layer.
//!
//! Everything that reads kernel state or spawns processes goes through the
//! traits in [`hal`], so the provisioning flow can be exercised against
//! [`FakeHal`] without root or a real block device.

pub mod error;
pub mod hal;
pub mod path;
pub mod procfs;

pub use error::{HalError, HalResult};
pub use hal::{
    CommandSpec, FakeHal, LinuxHal, MountOps, Operation, PartitionOps, ProcessOps, PERM_PARTITION,
};
