//! Client for the device management HTTP API running on the same machine.
//!
//! Only the reboot endpoint is needed. Credentials are bootstrapped from the
//! on-device config files the management daemon itself reads.

use crate::config::ConfigFiles;
use crate::errors::{PermfsError, PermfsResult};
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

pub const API_USER: &str = "gokrazy";
pub const PASSWORD_FILE: &str = "gokr-pw.txt";
pub const PORT_FILE: &str = "http-port.txt";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PORT: u16 = 80;
const REBOOT_PATH: &str = "update/reboot";

/// Something that can reboot the machine.
pub trait Reboot {
    fn reboot(&self) -> PermfsResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: Url, password: impl Into<String>) -> Self {
        Self {
            base_url,
            username: API_USER.to_string(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the API password (required) and port (default 80) from `files`.
    pub fn on_device(files: &ConfigFiles, host: &str) -> PermfsResult<Self> {
        let password = files.read(PASSWORD_FILE)?;
        let port = match files.read_optional(PORT_FILE)? {
            Some(raw) if !raw.is_empty() => {
                raw.parse::<u16>().map_err(|e| PermfsError::ConfigValue {
                    file: PORT_FILE.to_string(),
                    reason: format!("{raw:?}: {e}"),
                })?
            }
            _ => DEFAULT_PORT,
        };
        let base_url = Url::parse(&format!("http://{host}:{port}/"))
            .map_err(|e| PermfsError::Connect(e.to_string()))?;
        Ok(Self::new(base_url, password))
    }

    fn endpoint(&self, path: &str) -> PermfsResult<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| PermfsError::Connect(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> PermfsResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }
}

impl Reboot for ApiClient {
    fn reboot(&self) -> PermfsResult<()> {
        let url = self.config.endpoint(REBOOT_PATH)?;
        log::debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PermfsError::Api {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Connects to the local device API only when a reboot is actually requested.
#[derive(Debug, Clone)]
pub struct OnDeviceReboot {
    files: ConfigFiles,
    host: String,
    timeout: Duration,
}

impl Default for OnDeviceReboot {
    fn default() -> Self {
        Self::new(ConfigFiles::default())
    }
}

impl OnDeviceReboot {
    pub fn new(files: ConfigFiles) -> Self {
        Self {
            files,
            host: DEFAULT_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Reboot for OnDeviceReboot {
    fn reboot(&self) -> PermfsResult<()> {
        let config = ApiConfig::on_device(&self.files, &self.host)?.with_timeout(self.timeout);
        ApiClient::new(config)?.reboot()
    }
}
