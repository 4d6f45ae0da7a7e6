//! Mount table queries.

use crate::HalResult;
use std::path::Path;

/// Trait for inspecting the mount table.
pub trait MountOps {
    /// Check if a path is currently a mount point.
    ///
    /// # Arguments
    /// * `path` - Mount point to look for (e.g., `/perm`)
    fn is_mounted(&self, path: &Path) -> HalResult<bool>;
}
