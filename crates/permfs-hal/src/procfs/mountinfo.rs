//! Parsing helpers for `/proc/self/mountinfo` (and similar mountinfo files).
//!
//! Only the mount point (5th whitespace-separated field) is of interest.
//! Lines with fewer fields are skipped rather than treated as errors.

use std::path::{Path, PathBuf};

const MOUNT_POINT_FIELD: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    pub mount_point: PathBuf,
}

pub fn parse_mountinfo(content: &str) -> Vec<MountInfo> {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<MountInfo> {
    let raw = line.split_whitespace().nth(MOUNT_POINT_FIELD)?;
    Some(MountInfo {
        mount_point: PathBuf::from(unescape_mount_path(raw)),
    })
}

/// Scans mountinfo text for `target`, stopping at the first match.
pub fn is_mounted_in(content: &str, target: &Path) -> bool {
    let target = normalize_path(target);
    for entry in content.lines().filter_map(parse_line) {
        log::debug!("Found mountpoint {:?}", entry.mount_point);
        if normalize_path(&entry.mount_point) == target {
            return true;
        }
    }
    false
}

pub fn unescape_mount_path(raw: &str) -> String {
    raw.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}

fn normalize_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    if s.len() > 1 && s.ends_with('/') {
        s.trim_end_matches('/').to_string()
    } else {
        s.to_string()
    }
}
