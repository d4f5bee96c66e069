//! Platform cleanup after the resource bundles were extracted.

use std::{fs, io, path::Path};

use log::debug;

use crate::{
    installer::{InstallError, delete_matching},
    session::Session,
    shortcut::symlink::{Existing, create_symlink},
};

const BATCH_SCRIPTS: &str = r"^.*\.bat$";
const SHELL_SCRIPTS: &str = r"^.*\.sh$";

pub fn windows(_session: &Session, dir: &Path) -> Result<(), InstallError> {
    delete_matching(&dir.join("util"), SHELL_SCRIPTS)?;
    Ok(())
}

/// Points `<app>.app/Contents/MacOS/<base>` at the console launcher.
pub fn mac_os(session: &Session, dir: &Path) -> Result<(), InstallError> {
    let manifest = &session.manifest;
    delete_matching(&dir.join("util"), BATCH_SCRIPTS)?;

    let macos_dir = dir.join(manifest.app_bundle()).join("Contents").join("MacOS");
    debug!("going to create {}", macos_dir.display());
    fs::create_dir_all(&macos_dir)?;

    create_symlink(
        &macos_dir.join(&manifest.base_name),
        &dir.join(manifest.console_executable()),
        Existing::Replace,
    )?;
    Ok(())
}

pub fn linux(session: &Session, dir: &Path) -> Result<(), InstallError> {
    let manifest = &session.manifest;
    let console = dir.join(manifest.console_executable());
    let launcher = dir.join(manifest.linux_launcher());

    match fs::rename(&console, &launcher) {
        Ok(()) => debug!("renamed {} to {}", console.display(), launcher.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found, nothing to rename", console.display())
        }
        Err(err) => return Err(err.into()),
    }

    delete_matching(&dir.join("util"), BATCH_SCRIPTS)?;
    Ok(())
}
