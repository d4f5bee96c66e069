use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod manifest;
pub use manifest::AppManifest;

/// Header stored in front of the resource archive inside a bundled installer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedConfig {
    pub manifest: AppManifest,
    /// Size of the zipped resources that follow the header
    pub resource_size: u64,
}

/// Per-user locations the installer writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub home: PathBuf,
    pub desktop: PathBuf,
    pub applications: PathBuf,
    /// `APPDATA`, only set on Windows
    pub app_data: Option<PathBuf>,
}

impl HostPaths {
    /// Reads the home directory and `APPDATA` from the running environment.
    pub fn detect() -> Option<Self> {
        let home = dirs::home_dir()?;
        let mut paths = Self::under_home(home);
        paths.app_data = std::env::var_os("APPDATA").map(PathBuf::from);
        Some(paths)
    }

    pub fn under_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        HostPaths {
            desktop: home.join("Desktop"),
            applications: PathBuf::from("/Applications"),
            app_data: None,
            home,
        }
    }
}

pub trait DirTrait: std::io::Read + std::io::Seek {}

impl<T> DirTrait for T where T: std::io::Read + std::io::Seek {}
