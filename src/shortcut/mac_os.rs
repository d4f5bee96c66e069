use std::path::Path;

use crate::{
    session::Session,
    shortcut::{
        ShortcutError,
        symlink::{Existing, create_symlink},
    },
};

/// Links `~/Desktop/<name> <version>` to the installed bundle.
pub fn desktop(session: &Session, dir: &Path) -> Result<(), ShortcutError> {
    link_bundle(session, &session.host.desktop, dir)
}

/// Links `/Applications/<name> <version>` to the installed bundle.
pub fn applications(session: &Session, dir: &Path) -> Result<(), ShortcutError> {
    link_bundle(session, &session.host.applications, dir)
}

fn link_bundle(session: &Session, folder: &Path, dir: &Path) -> Result<(), ShortcutError> {
    let manifest = &session.manifest;
    create_symlink(
        &folder.join(manifest.shortcut_label()),
        &dir.join(manifest.app_bundle()),
        Existing::Replace,
    )?;
    Ok(())
}
