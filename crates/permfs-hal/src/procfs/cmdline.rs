//! Parsing helpers for `/proc/cmdline`.

use crate::{HalError, HalResult};

/// How the kernel was told to find the root filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSpec {
    /// `root=/dev/mmcblk0p2` and friends.
    Device(String),
    /// `root=PARTUUID=2e18c40c-02`: MBR disk signature plus partition number.
    MbrPartUuid { disk_signature: String, partition: u32 },
    /// `root=PARTUUID=<uuid>` on a GPT disk.
    GptPartUuid(String),
}

/// Returns the value of the last `root=` parameter, if any.
pub fn root_param(cmdline: &str) -> Option<&str> {
    cmdline
        .split_whitespace()
        .filter_map(|param| param.strip_prefix("root="))
        .last()
}

pub fn parse_root(cmdline: &str) -> HalResult<Option<RootSpec>> {
    let Some(value) = root_param(cmdline) else {
        return Ok(None);
    };
    if value.is_empty() {
        return Err(HalError::Parse("empty root= parameter".to_string()));
    }
    let Some(uuid) = value.strip_prefix("PARTUUID=") else {
        return Ok(Some(RootSpec::Device(value.to_string())));
    };
    Ok(Some(parse_partuuid(uuid)?))
}

fn parse_partuuid(uuid: &str) -> HalResult<RootSpec> {
    if let Some((signature, part)) = uuid.split_once('-') {
        let is_mbr = signature.len() == 8
            && part.len() == 2
            && signature.chars().all(|c| c.is_ascii_hexdigit());
        if is_mbr {
            let partition = u32::from_str_radix(part, 16)
                .map_err(|e| HalError::Parse(format!("PARTUUID={uuid}: {e}")))?;
            return Ok(RootSpec::MbrPartUuid {
                disk_signature: signature.to_lowercase(),
                partition,
            });
        }
    }
    if uuid.len() == 36 && uuid.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Ok(RootSpec::GptPartUuid(uuid.to_lowercase()));
    }
    Err(HalError::Parse(format!("unrecognized PARTUUID={uuid}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_device_is_parsed() {
        let cmdline = "console=ttyS0 root=/dev/mmcblk0p2 rootwait panic=10\n";
        assert_eq!(
            parse_root(cmdline).unwrap(),
            Some(RootSpec::Device("/dev/mmcblk0p2".to_string()))
        );
    }

    #[test]
    fn mbr_partuuid_is_split() {
        let cmdline = "root=PARTUUID=2E18C40C-02 init=/gokrazy/init";
        assert_eq!(
            parse_root(cmdline).unwrap(),
            Some(RootSpec::MbrPartUuid {
                disk_signature: "2e18c40c".to_string(),
                partition: 2,
            })
        );
    }

    #[test]
    fn gpt_partuuid_is_kept_whole() {
        let cmdline = "root=PARTUUID=60c24cc1-f3f9-427a-8199-76baa2d60002";
        assert_eq!(
            parse_root(cmdline).unwrap(),
            Some(RootSpec::GptPartUuid(
                "60c24cc1-f3f9-427a-8199-76baa2d60002".to_string()
            ))
        );
    }

    #[test]
    fn last_root_parameter_wins() {
        assert_eq!(root_param("root=/dev/sda2 root=/dev/vda2"), Some("/dev/vda2"));
    }

    #[test]
    fn missing_root_is_none() {
        assert_eq!(parse_root("quiet splash").unwrap(), None);
    }

    #[test]
    fn garbage_partuuid_is_a_parse_error() {
        assert!(matches!(
            parse_root("root=PARTUUID=nope"),
            Err(HalError::Parse(_))
        ));
    }
}
