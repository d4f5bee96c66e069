use std::{fs, io, path::Path};

use log::debug;

/// What to do when something already exists where the link should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existing {
    Replace,
    Keep,
}

/// Creates `link` pointing at `target`. Returns `false` if an existing entry was kept.
///
/// Dangling links count as existing.
pub fn create_symlink(link: &Path, target: &Path, existing: Existing) -> io::Result<bool> {
    match fs::symlink_metadata(link) {
        Ok(metadata) => match existing {
            Existing::Replace => {
                debug!("deleting existing {}", link.display());
                if metadata.is_dir() {
                    fs::remove_dir_all(link)?;
                } else {
                    fs::remove_file(link)?;
                }
            }
            Existing::Keep => {
                debug!(
                    "{} exists, skipping linking it to {}",
                    link.display(),
                    target.display()
                );
                return Ok(false);
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    debug!(
        "going to create symlink {} pointing to {}",
        link.display(),
        target.display()
    );
    platform_symlink(target, link)?;
    Ok(true)
}

#[cfg(unix)]
fn platform_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn platform_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
