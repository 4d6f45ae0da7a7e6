//! Block device path helpers.

/// Partition path helper for block devices. Handles nvme/mmcblk/loop postfixing.
pub fn partition_path(disk: &str, num: u32) -> String {
    if needs_p_infix(disk) {
        format!("{}p{}", disk, num)
    } else {
        format!("{}{}", disk, num)
    }
}

/// Strips the partition suffix from a partition device path.
///
/// `/dev/mmcblk0p2` becomes `/dev/mmcblk0`, `/dev/sda2` becomes `/dev/sda`.
/// Returns `None` when the path carries no partition number.
pub fn disk_of_partition(partition: &str) -> Option<String> {
    let stem = partition.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == partition.len() {
        return None;
    }
    if let Some(disk) = stem.strip_suffix('p') {
        if needs_p_infix(disk) && disk.ends_with(|c: char| c.is_ascii_digit()) {
            return Some(disk.to_string());
        }
    }
    if needs_p_infix(stem) {
        // e.g. `/dev/mmcblk0` is already a whole disk.
        return None;
    }
    Some(stem.to_string())
}

fn needs_p_infix(disk: &str) -> bool {
    disk.contains("nvme") || disk.contains("mmcblk") || disk.contains("loop")
}
