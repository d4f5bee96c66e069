//! The zipped resource bundles carried inside the installer.

use std::{
    fs::{self, File},
    io::{self, Read, Seek},
    path::{Component, Path, PathBuf},
};

use byteorder::{LE, ReadBytesExt};
use log::debug;
use thiserror::Error;
use zip::{ZipArchive, result::ZipError};

use crate::{
    config::{DirTrait, EmbeddedConfig},
    post_embed::{EmbeddedSection, search_for_embedded_data},
};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Zip error: {0}")]
    ZipError(#[from] ZipError),
    #[error("Config decode error: Postcard error: {0}")]
    PostcardError(#[from] postcard::Error),
    #[error("This installer does not carry any bundled resources")]
    Missing,
    #[error("Embedded config of {0} bytes does not fit into the data section")]
    ConfigTooLarge(u64),
    #[error("Resource entry {0:?} would be written outside the installation directory")]
    UnsafeEntry(String),
}

pub struct ResourceArchive {
    zip: ZipArchive<Box<dyn DirTrait + Send + Sync>>,
}

impl ResourceArchive {
    pub fn new(reader: impl Read + Seek + Send + Sync + 'static) -> Result<Self, ResourceError> {
        let reader: Box<dyn DirTrait + Send + Sync> = Box::new(reader);
        Ok(Self {
            zip: ZipArchive::new(reader)?,
        })
    }

    /// Reads the config header and opens the archive that follows it.
    pub fn from_section(
        mut section: EmbeddedSection,
    ) -> Result<(EmbeddedConfig, Self), ResourceError> {
        if section.is_empty() {
            return Err(ResourceError::Missing);
        }
        let config_len = section.read_u64::<LE>()?;
        if config_len > section.len() {
            return Err(ResourceError::ConfigTooLarge(config_len));
        }

        let mut config_bytes = vec![0u8; config_len as usize];
        section.read_exact(&mut config_bytes)?;
        let config: EmbeddedConfig = postcard::from_bytes(&config_bytes)?;

        section.move_start_to_current();
        Ok((config, Self::new(section)?))
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names()
    }

    /// Unpacks every entry below `prefix` into `target`.
    ///
    /// Entries keep their `prefix/` path component unless `flatten` is set.
    /// Returns the number of files written.
    pub fn extract_dir(
        &mut self,
        prefix: &str,
        target: &Path,
        flatten: bool,
    ) -> Result<usize, ResourceError> {
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        debug!(
            "going to extract {} into {} (flatten: {})",
            prefix,
            target.display(),
            flatten
        );

        let mut written = 0;
        for index in 0..self.zip.len() {
            let mut entry = self.zip.by_index(index)?;
            let name = entry.name().to_string();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let relative = if flatten { rest } else { name.as_str() };
            if relative.is_empty() {
                continue;
            }
            let relative = safe_relative_path(relative)
                .ok_or_else(|| ResourceError::UnsafeEntry(name.clone()))?;
            let out_path = target.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&out_path)?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut out_file = File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))?;
            }

            written += 1;
        }

        debug!("extracted {} files from {}", written, prefix);
        Ok(written)
    }
}

/// Opens the resources appended to the running executable, if there are any.
pub fn open_embedded() -> Result<Option<(EmbeddedConfig, ResourceArchive)>, ResourceError> {
    match search_for_embedded_data()? {
        Some(section) => ResourceArchive::from_section(section).map(Some),
        None => Ok(None),
    }
}

fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::{Cursor, Write};

    use zip::{ZipWriter, write::SimpleFileOptions};

    use super::*;

    /// Zips `(name, contents)` pairs into an in-memory archive.
    pub(crate) fn archive(entries: &[(&str, &str)]) -> ResourceArchive {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            zip.start_file(*name, SimpleFileOptions::default().unix_permissions(0o755))
                .unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        let cursor = zip.finish().unwrap();
        ResourceArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn keeps_prefix_unless_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = archive(&[
            ("samples/data/accounts.csv", "Id,Name"),
            ("configs/config.properties", "a=b"),
            ("linux/dataloader_console", "#!/bin/sh"),
            ("samplesbutnot/x", "x"),
        ]);

        assert_eq!(archive.extract_dir("samples", dir.path(), false).unwrap(), 1);
        assert_eq!(archive.extract_dir("linux/", dir.path(), true).unwrap(), 1);

        assert_eq!(
            fs::read_to_string(dir.path().join("samples/data/accounts.csv")).unwrap(),
            "Id,Name"
        );
        assert!(dir.path().join("dataloader_console").is_file());
        assert!(!dir.path().join("linux").exists());
        assert!(!dir.path().join("configs").exists());
        assert!(!dir.path().join("samplesbutnot").exists());
    }

    #[cfg(unix)]
    #[test]
    fn restores_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let mut archive = archive(&[("linux/dataloader_console", "#!/bin/sh")]);
        archive.extract_dir("linux", dir.path(), true).unwrap();

        let mode = fs::metadata(dir.path().join("dataloader_console"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn empty_section_carries_no_resources() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("installer");
        let bundle = dir.path().join("bundle");
        fs::write(&exe, b"exe").unwrap();
        crate::post_embed::append_data(&exe, &bundle)
            .unwrap()
            .finish()
            .unwrap();

        let section = crate::post_embed::find_embedded_data(&bundle)
            .unwrap()
            .unwrap();

        assert!(matches!(
            ResourceArchive::from_section(section),
            Err(ResourceError::Missing)
        ));
    }

    #[test]
    fn rejects_entries_escaping_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = archive(&[("mac/../../evil", "x")]);

        assert!(matches!(
            archive.extract_dir("mac", dir.path(), true),
            Err(ResourceError::UnsafeEntry(_))
        ));
    }
}
