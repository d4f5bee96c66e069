use std::path::Path;

use crate::{
    installer::{InstallError, post_copy},
    session::Session,
    shortcut::{self, ShortcutError},
};

/// Cleanup run after the resource bundles were extracted
pub type PostCopyAction = fn(&Session, &Path) -> Result<(), InstallError>;

/// Creates one kind of shortcut for the installation directory
pub type ShortcutAction = fn(&Session, &Path) -> Result<(), ShortcutError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

/// Everything the installer does differently per operating system.
///
/// A shortcut that is `None` does not exist on that platform and is never offered.
pub struct PlatformProfile {
    /// Directory inside the resource archive holding the OS specific files
    pub resource_prefix: &'static str,
    pub post_copy: PostCopyAction,
    pub desktop_shortcut: Option<ShortcutAction>,
    pub start_menu_shortcut: Option<ShortcutAction>,
    pub apps_dir_shortcut: Option<ShortcutAction>,
}

static WINDOWS: PlatformProfile = PlatformProfile {
    resource_prefix: "win/",
    post_copy: post_copy::windows,
    desktop_shortcut: Some(shortcut::windows::desktop),
    start_menu_shortcut: Some(shortcut::windows::start_menu),
    apps_dir_shortcut: None,
};

static MAC_OS: PlatformProfile = PlatformProfile {
    resource_prefix: "mac/",
    post_copy: post_copy::mac_os,
    desktop_shortcut: Some(shortcut::mac_os::desktop),
    start_menu_shortcut: None,
    apps_dir_shortcut: Some(shortcut::mac_os::applications),
};

static LINUX: PlatformProfile = PlatformProfile {
    resource_prefix: "linux/",
    post_copy: post_copy::linux,
    desktop_shortcut: None,
    start_menu_shortcut: None,
    apps_dir_shortcut: None,
};

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn profile(self) -> &'static PlatformProfile {
        match self {
            Platform::Windows => &WINDOWS,
            Platform::MacOs => &MAC_OS,
            Platform::Linux => &LINUX,
        }
    }

    pub fn separator(self) -> char {
        match self {
            Platform::Windows => '\\',
            Platform::MacOs | Platform::Linux => '/',
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_menu_only_exists_on_windows() {
        assert!(Platform::Windows.profile().start_menu_shortcut.is_some());
        assert!(Platform::MacOs.profile().start_menu_shortcut.is_none());
        assert!(Platform::Linux.profile().start_menu_shortcut.is_none());
    }

    #[test]
    fn applications_link_only_exists_on_mac_os() {
        assert!(Platform::MacOs.profile().apps_dir_shortcut.is_some());
        assert!(Platform::Windows.profile().apps_dir_shortcut.is_none());
        assert!(Platform::Linux.profile().apps_dir_shortcut.is_none());
    }

    #[test]
    fn resource_prefixes() {
        assert_eq!(Platform::Windows.profile().resource_prefix, "win/");
        assert_eq!(Platform::MacOs.profile().resource_prefix, "mac/");
        assert_eq!(Platform::Linux.profile().resource_prefix, "linux/");
    }
}
