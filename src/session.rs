use std::{env::current_exe, io, path::PathBuf};

use log::debug;

use crate::{
    config::{AppManifest, HostPaths},
    installer::InstallError,
    logging::Logger,
    platform::Platform,
    prompt::Console,
    resources::{self, ResourceArchive},
    shortcut::windows::run_cmd,
};

/// Runs `cmd` with the given raw argument string and returns its exit code
pub type CommandRunner = Box<dyn Fn(&str) -> io::Result<i32>>;

/// Everything one installer run works with, resolved once at startup.
pub struct Session {
    pub platform: Platform,
    pub manifest: AppManifest,
    pub host: HostPaths,
    pub logger: Logger,
    /// Directory containing the running installer, copied into the installation
    pub package_dir: PathBuf,
    /// The running installer itself, left out of the copy
    pub installer_exe: Option<PathBuf>,
    pub console: Console,
    pub resources: Option<ResourceArchive>,
    pub runner: CommandRunner,
}

impl Session {
    pub fn new(platform: Platform, host: HostPaths, package_dir: PathBuf, logger: Logger) -> Self {
        Session {
            platform,
            manifest: AppManifest::default(),
            host,
            logger,
            package_dir,
            installer_exe: None,
            console: Console::stdio(),
            resources: None,
            runner: Box::new(run_cmd),
        }
    }

    /// Builds the session for the running process.
    pub fn detect(logger: Logger) -> Result<Self, InstallError> {
        let host = HostPaths::detect().ok_or(InstallError::HomeDirMissing)?;
        let exe = current_exe().map_err(InstallError::PackageLocation)?;
        let package_dir = exe.parent().map(PathBuf::from).ok_or_else(|| {
            InstallError::PackageLocation(io::Error::other("installer has no parent directory"))
        })?;
        debug!("running from {}", package_dir.display());

        let session = Session::new(Platform::current(), host, package_dir, logger)
            .with_installer_exe(exe);
        Ok(match resources::open_embedded()? {
            Some((config, archive)) => {
                debug!(
                    "found {} bytes of bundled resources for {} {}",
                    config.resource_size, config.manifest.friendly_name, config.manifest.version
                );
                session
                    .with_manifest(config.manifest)
                    .with_resources(archive)
            }
            None => {
                debug!("no embedded resources found, using the built in manifest");
                session
            }
        })
    }

    pub fn with_manifest(self, manifest: AppManifest) -> Self {
        Session { manifest, ..self }
    }

    pub fn with_installer_exe(self, installer_exe: PathBuf) -> Self {
        Session {
            installer_exe: Some(installer_exe),
            ..self
        }
    }

    pub fn with_console(self, console: Console) -> Self {
        Session { console, ..self }
    }

    pub fn with_resources(self, resources: ResourceArchive) -> Self {
        Session {
            resources: Some(resources),
            ..self
        }
    }

    pub fn with_runner(self, runner: impl Fn(&str) -> io::Result<i32> + 'static) -> Self {
        Session {
            runner: Box::new(runner),
            ..self
        }
    }
}
