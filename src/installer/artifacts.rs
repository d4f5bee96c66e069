use std::{fs, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};
use regex::Regex;
use walkdir::WalkDir;

use crate::{installer::InstallError, messages::Msg, resources::ResourceError, session::Session};

/// Top level entries of the copied package that must not be installed:
/// dotfiles, `install.*`, `META-INF` and zip files.
pub const PACKAGING_ARTIFACTS: [&str; 4] =
    [r"^\..*$", r"^install\..*$", r"^META-INF$", r"^.*\.zip$"];

/// Resource groups extracted on every platform
const SHARED_RESOURCE_GROUPS: [&str; 2] = ["samples", "configs"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// An installation existed and the user chose to keep it
    Declined,
}

/// Copies the package into `dir`, replacing an existing installation after confirmation.
pub fn copy_artifacts(session: &mut Session, dir: &Path) -> Result<CopyOutcome, InstallError> {
    if dir.try_exists()? {
        let prompt = Msg::OverwritePrompt {
            name: &session.manifest.friendly_name,
            version: &session.manifest.version,
            dir,
        }
        .to_string();
        if !session.console.confirm(&prompt)? {
            debug!("keeping existing installation in {}", dir.display());
            return Ok(CopyOutcome::Declined);
        }
        session.console.say(Msg::DeletionInProgress {
            name: &session.manifest.friendly_name,
            version: &session.manifest.version,
        })?;
        debug!("going to delete {}", dir.display());
        fs::remove_dir_all(dir)?;
    }

    debug!("going to create {}", dir.display());
    fs::create_dir_all(dir)?;
    debug!(
        "going to copy contents of {} to {}",
        session.package_dir.display(),
        dir.display()
    );
    copy_tree(&session.package_dir, dir, session.installer_exe.as_deref())?;

    for pattern in PACKAGING_ARTIFACTS {
        debug!("going to delete {} from {}", pattern, dir.display());
        delete_matching(dir, pattern)?;
    }

    Ok(CopyOutcome::Copied)
}

/// Unpacks the shared and the platform specific resources, then runs the platform cleanup.
pub fn extract_bundled(session: &mut Session, dir: &Path) -> Result<(), InstallError> {
    let profile = session.platform.profile();
    let archive = session.resources.as_mut().ok_or(ResourceError::Missing)?;

    for group in SHARED_RESOURCE_GROUPS {
        archive.extract_dir(group, dir, false)?;
    }
    archive.extract_dir(profile.resource_prefix, dir, true)?;

    (profile.post_copy)(&*session, dir)
}

/// Deletes the entries directly inside `dir` whose name matches `pattern`.
///
/// A missing `dir` is not an error. An entry that cannot be removed is logged
/// and skipped. Returns the number of removed entries.
pub fn delete_matching(dir: &Path, pattern: &str) -> Result<usize, InstallError> {
    let pattern = Regex::new(pattern)?;
    if !dir.try_exists()? {
        debug!("{} does not exist, nothing to delete", dir.display());
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !pattern.is_match(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        let result = if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(err) => error!("Can't remove {}: {}", path.display(), err),
        }
    }

    Ok(removed)
}

/// Recursively copies the contents of `source` into `dest`, following symlinks.
///
/// `dest` itself is skipped when it lies inside `source`, and so is `installer_exe`.
fn copy_tree(
    source: &Path,
    dest: &Path,
    installer_exe: Option<&Path>,
) -> Result<usize, InstallError> {
    let dest_canonical = fs::canonicalize(dest)?;
    let installer_canonical = installer_exe.and_then(|exe| fs::canonicalize(exe).ok());
    let skipped = |entry: &walkdir::DirEntry| {
        let wanted = if entry.file_type().is_dir() {
            Some(&dest_canonical)
        } else {
            installer_canonical.as_ref()
        };
        wanted.is_some_and(|wanted| {
            fs::canonicalize(entry.path()).is_ok_and(|path| path == *wanted)
        })
    };
    let entries = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !skipped(entry))
        .collect::<Result<Vec<_>, _>>()?;

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut copied = 0;
    for entry in entries {
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| InstallError::IoError(std::io::Error::other(err)))?;
        let target = dest.join(relative);
        progress.set_message(relative.display().to_string());

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    debug!("copied {} files from {}", copied, source.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, sink};

    use log::LevelFilter;

    use super::*;
    use crate::{config::HostPaths, logging::Logger, platform::Platform, prompt::Console};

    fn session(package_dir: &Path, home: &Path, answers: &str) -> Session {
        Session::new(
            Platform::Linux,
            HostPaths::under_home(home),
            package_dir.to_path_buf(),
            Logger::new(LevelFilter::Off),
        )
        .with_console(Console::new(Cursor::new(answers.to_string()), sink()))
    }

    fn package(root: &Path) {
        fs::create_dir_all(root.join("util")).unwrap();
        fs::create_dir_all(root.join("META-INF")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join("util/util.sh"), "echo util").unwrap();
        fs::write(root.join("dataloader-60.0.jar"), "jar").unwrap();
        fs::write(root.join("META-INF/MANIFEST.MF"), "Manifest-Version: 1.0").unwrap();
        fs::write(root.join(".DS_Store"), "").unwrap();
        fs::write(root.join("install.command"), "installer").unwrap();
        fs::write(root.join("install.bat"), "installer").unwrap();
        fs::write(root.join("dataloader_v60.zip"), "zip").unwrap();
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn copies_package_without_packaging_artifacts() {
        let package_dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        package(package_dir.path());
        let target = home.path().join("dataloader/v60.0");

        let mut session = session(package_dir.path(), home.path(), "");
        let outcome = copy_artifacts(&mut session, &target).unwrap();

        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(names(&target), ["dataloader-60.0.jar", "util"]);
        assert_eq!(
            fs::read_to_string(target.join("util/util.sh")).unwrap(),
            "echo util"
        );
    }

    #[test]
    fn declined_overwrite_leaves_existing_installation() {
        let package_dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        package(package_dir.path());
        let target = home.path().join("dataloader/v60.0");

        copy_artifacts(&mut session(package_dir.path(), home.path(), ""), &target).unwrap();
        fs::write(target.join("dataloader-60.0.jar"), "first run").unwrap();
        fs::write(package_dir.path().join("new-file.txt"), "second run").unwrap();

        let mut session = session(package_dir.path(), home.path(), "maybe\nn\n");
        let outcome = copy_artifacts(&mut session, &target).unwrap();

        assert_eq!(outcome, CopyOutcome::Declined);
        assert_eq!(
            fs::read_to_string(target.join("dataloader-60.0.jar")).unwrap(),
            "first run"
        );
        assert!(!target.join("new-file.txt").exists());
    }

    #[test]
    fn confirmed_overwrite_replaces_existing_installation() {
        let package_dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        package(package_dir.path());
        let target = home.path().join("dl");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        let mut session = session(package_dir.path(), home.path(), "y\n");
        copy_artifacts(&mut session, &target).unwrap();

        assert!(!target.join("stale.txt").exists());
        assert!(target.join("dataloader-60.0.jar").exists());
    }

    #[test]
    fn copy_skips_target_inside_package() {
        let package_dir = tempfile::tempdir().unwrap();
        fs::write(package_dir.path().join("dataloader-60.0.jar"), "jar").unwrap();
        let target = package_dir.path().join("dataloader/v60.0");

        let mut session = session(package_dir.path(), package_dir.path(), "");
        copy_artifacts(&mut session, &target).unwrap();

        assert_eq!(names(&target), ["dataloader", "dataloader-60.0.jar"]);
        assert!(!target.join("dataloader/v60.0").exists());
    }

    #[test]
    fn running_installer_is_not_copied() {
        let package_dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        package(package_dir.path());
        let installer = package_dir.path().join("dataloader_installer");
        fs::write(&installer, "installer with bundled resources").unwrap();
        fs::write(package_dir.path().join("dataloader-installer"), "sibling").unwrap();
        let target = home.path().join("dataloader/v60.0");

        let mut session =
            session(package_dir.path(), home.path(), "").with_installer_exe(installer.clone());
        copy_artifacts(&mut session, &target).unwrap();

        assert_eq!(
            names(&target),
            ["dataloader-60.0.jar", "dataloader-installer", "util"]
        );
        assert!(installer.is_file());
    }

    #[test]
    fn delete_matching_only_touches_top_level_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.bat"), "").unwrap();
        fs::write(dir.path().join("a.sh"), "").unwrap();
        fs::write(dir.path().join("nested/b.bat"), "").unwrap();

        assert_eq!(delete_matching(dir.path(), r"^.*\.bat$").unwrap(), 1);
        assert_eq!(names(dir.path()), ["a.sh", "nested"]);
        assert!(dir.path().join("nested/b.bat").exists());
    }

    #[test]
    fn delete_matching_in_missing_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();

        let util = dir.path().join("util");

        assert_eq!(delete_matching(&util, r"^.*\.bat$").unwrap(), 0);
    }
}
