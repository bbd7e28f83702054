use std::{
    collections::HashMap,
    fs::File,
    path::Path,
};

use serde::Deserialize;
use tracing::debug;

/// Host entries stored by the GitHub CLI in `hosts.yml`, keyed by host name.
#[derive(Debug, Default)]
pub struct GhHosts {
    pub hosts: HashMap<String, HostEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct HostEntry {
    pub user: Option<String>,
    pub oauth_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("XDG Directory error")]
    XDGError(#[from] xdg::BaseDirectoriesError),
    #[error("Unable to read file")]
    FileError(#[from] std::io::Error),
    #[error("Unable to parse hosts file")]
    YAMLError(#[from] serde_yaml::Error),
}

impl GhHosts {
    /// Load `hosts.yml` from the `gh` config directory, or from an explicit
    /// path. No file in the config directory is an empty host list, not an
    /// error.
    pub fn new(path_override: Option<&Path>) -> Result<Self, ParseError> {
        let cfgfile = match path_override {
            Some(file) => Some(file.to_path_buf()),
            None => {
                let bd = xdg::BaseDirectories::with_prefix("gh")?;
                bd.find_config_file("hosts.yml")
            }
        };
        let Some(cfgfile) = cfgfile else {
            debug!("No gh hosts file found, using an empty host list");
            return Ok(Self::default());
        };
        let hosts = serde_yaml::from_reader(File::open(cfgfile)?)?;
        Ok(Self { hosts })
    }

    /// Token for an API host. `gh` keys its entries by web host, so
    /// `api.github.com` falls back to the `github.com` entry.
    pub fn token_for(&self, host: &str) -> Option<&str> {
        let entry = self
            .hosts
            .get(host)
            .or_else(|| host.strip_prefix("api.").and_then(|h| self.hosts.get(h)))?;
        entry.oauth_token.as_deref()
    }
}
