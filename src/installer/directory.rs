use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{config::AppManifest, platform::Platform};

/// Absolute installation directory for the user's answer.
///
/// Blank input means the manifest's base name. `v<version>` is always appended.
/// Input starting with the separator, or on Windows with `<drive>:<separator>`,
/// is used as is; anything else is placed under `home`.
pub fn resolve_installation_dir(
    raw: &str,
    platform: Platform,
    home: &Path,
    manifest: &AppManifest,
) -> PathBuf {
    let separator = platform.separator();
    let root = if raw.trim().is_empty() {
        manifest.base_name.as_str()
    } else {
        raw
    };
    let suffix = format!("{root}{separator}v{}", manifest.version);

    if is_absolute(root, platform) {
        PathBuf::from(suffix)
    } else {
        let mut path = OsString::from(home.as_os_str());
        path.push(separator.to_string());
        path.push(suffix);
        PathBuf::from(path)
    }
}

fn is_absolute(root: &str, platform: Platform) -> bool {
    let separator = platform.separator();
    root.starts_with(separator)
        || (platform.is_windows()
            && root.find(':') == Some(1)
            && root.find(separator) == Some(2))
}
