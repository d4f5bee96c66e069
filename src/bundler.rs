//! Builds a self-installing package: the installer executable with the
//! resource bundles appended to it.

use std::{
    env::{self, consts::EXE_SUFFIX},
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use log::info;
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;
use zip::{ZipWriter, write::SimpleFileOptions};

use crate::{
    config::{AppManifest, EmbeddedConfig},
    post_embed::append_data,
};

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Cargo.toml error: {0}")]
    CargoTomlError(#[from] cargo_toml::Error),
    #[error("Zip error: {0}")]
    ZipError(#[from] zip::result::ZipError),
    #[error("Config encode error: Postcard error: {0}")]
    PostcardError(#[from] postcard::Error),
    #[error("Error while walking the resources: {0}")]
    WalkError(#[from] walkdir::Error),
    #[error("Cargo.toml has no [package] section")]
    MissingPackage,
    #[error("No version found in Cargo.toml")]
    MissingVersion,
    #[error("Resource directory {0} does not exist")]
    MissingResources(PathBuf),
    #[error("Couldn't find the installer executable at {0}")]
    InstallerMissing(PathBuf),
}

#[derive(Debug, clap::Parser)]
#[command(version, about = "Append bundled resources to the installer executable")]
pub struct BundleArgs {
    /// Directory holding samples/, configs/, mac/, win/ and linux/
    #[arg(short = 'r', long = "resources")]
    pub resources: PathBuf,
    /// Path to the Cargo.toml carrying [package.metadata.dataloader_installer]
    #[arg(short = 'm', long = "manifest", default_value = "./Cargo.toml")]
    pub cargo_manifest_path: PathBuf,
    /// Filename of the resulting installer
    #[arg(short = 'o', long = "out")]
    pub installer_name: Option<PathBuf>,
    /// Installer executable to bundle, defaults to the one next to this tool
    #[arg(short = 'i', long = "installer")]
    pub installer_exe: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
struct Metadata {
    dataloader_installer: Option<BundleMetadata>,
}

#[derive(Deserialize, Clone, Debug, Default)]
struct BundleMetadata {
    friendly_name: Option<String>,
    base_name: Option<String>,
    version: Option<String>,
    publisher: Option<String>,
}

/// Reads the manifest metadata from a Cargo.toml.
pub fn read_manifest(cargo_manifest_path: &Path) -> Result<AppManifest, BundleError> {
    let cargo_manifest =
        cargo_toml::Manifest::<Metadata>::from_path_with_metadata(cargo_manifest_path)?;
    let package = cargo_manifest
        .package
        .as_ref()
        .ok_or(BundleError::MissingPackage)?;

    let metadata = package
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.dataloader_installer.clone())
        .unwrap_or_default();

    let version = metadata
        .version
        .or_else(|| package.version.get().ok().cloned())
        .ok_or(BundleError::MissingVersion)?;
    let friendly_name = metadata
        .friendly_name
        .unwrap_or_else(|| package.name.clone());

    let mut manifest = AppManifest::build()
        .friendly_name(friendly_name)
        .version(version);
    if let Some(base_name) = metadata.base_name {
        manifest = manifest.base_name(base_name);
    }
    if let Some(publisher) = metadata.publisher {
        manifest = manifest.publisher(publisher);
    }
    Ok(manifest)
}

pub fn create_bundle(args: BundleArgs) -> Result<PathBuf, BundleError> {
    if !args.resources.is_dir() {
        return Err(BundleError::MissingResources(args.resources));
    }

    let manifest = read_manifest(&args.cargo_manifest_path)?;
    info!(
        "Building installer for {} {}",
        manifest.friendly_name, manifest.version
    );

    let installer_exe = match args.installer_exe {
        Some(path) => path,
        None => env::current_exe()?.with_file_name(format!("dataloader-installer{EXE_SUFFIX}")),
    };
    if !installer_exe.is_file() {
        return Err(BundleError::InstallerMissing(installer_exe));
    }
    let installer_name = args
        .installer_name
        .unwrap_or_else(|| PathBuf::from(format!("{}_installer{EXE_SUFFIX}", manifest.base_name)));

    bundle(&installer_exe, &args.resources, manifest, &installer_name)?;
    Ok(installer_name)
}

/// Writes `installer_exe` plus the embedded config and zipped `resources` to `out`.
pub fn bundle(
    installer_exe: &Path,
    resources: &Path,
    manifest: AppManifest,
    out: &Path,
) -> Result<(), BundleError> {
    let files = collect_files(resources)?;
    let resource_size = files
        .iter()
        .map(|path| path.metadata().map(|metadata| metadata.len()))
        .sum::<Result<u64, io::Error>>()?;

    let embedded_config = EmbeddedConfig {
        manifest,
        resource_size,
    };
    let config_bytes = postcard::to_stdvec(&embedded_config)?;

    info!("Embedding config");

    let mut append_writer = append_data(installer_exe, out)?;
    let length_bytes = (config_bytes.len() as u64).to_le_bytes();
    append_writer.write_all(&length_bytes)?;
    append_writer.write_all(&config_bytes)?;
    append_writer.move_start_to_current()?;

    info!("Zipping and embedding {} resource files", files.len());

    let mut zip = ZipWriter::new(append_writer);
    for path in files {
        let zip_path = path
            .strip_prefix(resources)
            .map_err(io::Error::other)?
            .to_string_lossy()
            .replace('\\', "/");

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Xz)
            .compression_level(Some(6i64))
            .unix_permissions(permissions(&path)?);
        zip.start_file(zip_path, options)?;

        let mut reader = BufReader::new(File::open(&path)?);
        io::copy(&mut reader, &mut zip)?;
    }

    info!("Flushing data");

    let append_writer = zip.finish()?;
    append_writer.finish()?;

    Ok(())
}

/// Recursively collect all files in a directory
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(unix)]
fn permissions(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;

    Ok(path.metadata()?.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permissions(_path: &Path) -> io::Result<u32> {
    Ok(0o644)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{post_embed::find_embedded_data, resources::ResourceArchive};

    #[test]
    fn reads_installer_metadata_from_cargo_toml() {
        let dir = tempfile::tempdir().unwrap();
        let cargo = dir.path().join("Cargo.toml");
        fs::write(
            &cargo,
            r#"
[package]
name = "dataloader_installer"
version = "60.0.0"

[package.metadata.dataloader_installer]
friendly_name = "DataLoader"
version = "60.0"
publisher = "Salesforce"
"#,
        )
        .unwrap();

        let manifest = read_manifest(&cargo).unwrap();

        assert_eq!(manifest, AppManifest::default());
    }

    #[test]
    fn bundle_can_be_read_back_by_the_installer() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        fs::create_dir_all(resources.join("configs")).unwrap();
        fs::create_dir_all(resources.join("mac/dataloader.app/Contents")).unwrap();
        fs::write(resources.join("configs/config.properties"), "loader=1").unwrap();
        fs::write(resources.join("mac/dataloader.app/Contents/Info.plist"), "<plist/>").unwrap();
        let exe = dir.path().join("dataloader-installer");
        fs::write(&exe, b"\x7fELF pretend").unwrap();
        let out = dir.path().join("dataloader_installer");

        bundle(&exe, &resources, AppManifest::default(), &out).unwrap();

        let section = find_embedded_data(&out).unwrap().unwrap();
        let (config, mut archive) = ResourceArchive::from_section(section).unwrap();
        assert_eq!(config.manifest, AppManifest::default());
        assert_eq!(config.resource_size, 16);

        let mut names = archive.entry_names().map(str::to_string).collect::<Vec<_>>();
        names.sort();
        assert_eq!(
            names,
            ["configs/config.properties", "mac/dataloader.app/Contents/Info.plist"]
        );

        let target = dir.path().join("install");
        archive.extract_dir("mac", &target, true).unwrap();
        assert_eq!(
            fs::read_to_string(target.join("dataloader.app/Contents/Info.plist")).unwrap(),
            "<plist/>"
        );
    }
}
