use std::{io, path::PathBuf};

use clap::Parser;
use log::debug;
use thiserror::Error;

use crate::{
    messages::Msg, prompt::PromptError, resources::ResourceError, session::Session, shortcut,
};

mod artifacts;
mod directory;
pub(crate) mod post_copy;

pub use artifacts::{
    CopyOutcome, PACKAGING_ARTIFACTS, copy_artifacts, delete_matching, extract_bundled,
};
pub use directory::resolve_installation_dir;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Console error: {0}")]
    PromptError(#[from] PromptError),
    #[error("Resource error: {0}")]
    ResourceError(#[from] ResourceError),
    #[error("Error while walking the package directory: {0}")]
    WalkError(#[from] walkdir::Error),
    #[error("Invalid file pattern: {0}")]
    PatternError(#[from] regex::Error),
    #[error("Invalid command line: {0}")]
    ArgumentError(#[from] clap::Error),
    #[error("Unable to locate the running installer: {0}")]
    PackageLocation(io::Error),
    #[error("Unable to determine the user's home directory")]
    HomeDirMissing,
}

/// How a run ended when nothing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user declined to overwrite an existing installation
    Aborted,
}

const RECOGNIZED_FLAGS: [&str; 5] = ["-b", "-c", "-d", "-s", "-a"];

#[derive(Debug, clap::Parser)]
#[command(
    name = "dataloader-installer",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Flags {
    /// Do not print the banner
    #[arg(short = 'b')]
    hide_banner: bool,
    /// Do not copy or extract any artifacts
    #[arg(short = 'c')]
    skip_copy_artifacts: bool,
    /// Do not offer a desktop shortcut
    #[arg(short = 'd')]
    skip_desktop_shortcut: bool,
    /// Do not offer a start menu shortcut (Windows)
    #[arg(short = 's')]
    skip_start_menu_shortcut: bool,
    /// Do not offer an Applications folder shortcut (macOS)
    #[arg(short = 'a')]
    skip_apps_dir_shortcut: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationPlan {
    /// Used for the shortcuts when the copy step is skipped
    pub installation_dir: PathBuf,
    pub skip_copy_artifacts: bool,
    pub skip_desktop_shortcut: bool,
    pub skip_start_menu_shortcut: bool,
    pub skip_apps_dir_shortcut: bool,
    pub hide_banner: bool,
}

impl InstallationPlan {
    /// Parses the installer flags. Anything that is not a known flag is ignored.
    pub fn from_args<I, S>(args: I) -> Result<Self, InstallError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut recognized: Vec<&'static str> = Vec::new();
        for arg in args {
            if let Some(flag) = RECOGNIZED_FLAGS.iter().find(|flag| **flag == arg.as_ref()) {
                if !recognized.contains(flag) {
                    recognized.push(*flag);
                }
            }
        }

        let program = std::iter::once("dataloader-installer");
        let flags = Flags::try_parse_from(program.chain(recognized))?;
        Ok(flags.into_plan())
    }
}

impl Flags {
    fn into_plan(self) -> InstallationPlan {
        InstallationPlan {
            installation_dir: PathBuf::from("."),
            skip_copy_artifacts: self.skip_copy_artifacts,
            skip_desktop_shortcut: self.skip_desktop_shortcut,
            skip_start_menu_shortcut: self.skip_start_menu_shortcut,
            skip_apps_dir_shortcut: self.skip_apps_dir_shortcut,
            hide_banner: self.hide_banner,
        }
    }
}

/// Parses `args` (without the program name) and runs the installation.
pub fn install<I, S>(args: I, session: &mut Session) -> Result<Outcome, InstallError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let plan = InstallationPlan::from_args(args)?;
    run(&plan, session)
}

pub fn run(plan: &InstallationPlan, session: &mut Session) -> Result<Outcome, InstallError> {
    if !plan.hide_banner {
        debug!("going to show banner");
        show_banner(session)?;
    }

    let mut installation_dir = plan.installation_dir.clone();
    if !plan.skip_copy_artifacts {
        debug!("going to select installation directory");
        installation_dir = select_installation_dir(session)?;
        debug!("going to copy artifacts");
        if copy_artifacts(session, &installation_dir)? == CopyOutcome::Declined {
            return Ok(Outcome::Aborted);
        }
        extract_bundled(session, &installation_dir)?;
    }

    let profile = session.platform.profile();
    if !plan.skip_desktop_shortcut {
        if let Some(create) = profile.desktop_shortcut {
            debug!("going to create desktop shortcut");
            shortcut::offer(session, Msg::DesktopShortcutPrompt, |session| {
                create(session, &installation_dir)
            });
        }
    }
    if !plan.skip_start_menu_shortcut {
        if let Some(create) = profile.start_menu_shortcut {
            debug!("going to create start menu shortcut");
            shortcut::offer(session, Msg::StartMenuShortcutPrompt, |session| {
                create(session, &installation_dir)
            });
        }
    }
    if !plan.skip_apps_dir_shortcut {
        if let Some(create) = profile.apps_dir_shortcut {
            debug!("going to create Applications directory shortcut");
            shortcut::offer(session, Msg::ApplicationsDirShortcutPrompt, |session| {
                create(session, &installation_dir)
            });
        }
    }

    Ok(Outcome::Completed)
}

fn show_banner(session: &mut Session) -> Result<(), PromptError> {
    let title = format!(
        "{} v{}",
        session.manifest.friendly_name, session.manifest.version
    );
    let rule = "*".repeat(title.len() + 8);
    session.console.say(&rule)?;
    session.console.say(format!("*   {title}   *"))?;
    session.console.say(&rule)?;
    Ok(())
}

fn select_installation_dir(session: &mut Session) -> Result<PathBuf, InstallError> {
    let separator = session.platform.separator();
    session.console.say(Msg::Initial {
        name: &session.manifest.friendly_name,
        home: &session.host.home,
        separator,
    })?;
    let prompt = Msg::InstallationDirPrompt {
        default_name: &session.manifest.base_name,
    }
    .to_string();
    let raw = session.console.ask(&prompt)?;
    debug!("installation directory: {raw}");

    let installation_dir =
        resolve_installation_dir(&raw, session.platform, &session.host.home, &session.manifest);
    debug!(
        "installation directory absolute path: {}",
        installation_dir.display()
    );
    session.console.say(Msg::InstallationDirConfirmation {
        name: &session.manifest.friendly_name,
        version: &session.manifest.version,
        dir: &installation_dir,
    })?;
    Ok(installation_dir)
}
