//! English message table for everything the installer prints.

use std::{fmt, path::Path};

pub const YES: &str = "yes";
pub const NO: &str = "no";

/// Printed when the installer exits, including on Ctrl-C.
pub const EXIT_MESSAGE: &str = "Exiting the installer.";

#[derive(Debug, Clone, Copy)]
pub enum Msg<'a> {
    /// Fallback for an empty prompt
    DefaultPrompt,
    Initial {
        name: &'a str,
        home: &'a Path,
        separator: char,
    },
    InstallationDirPrompt {
        default_name: &'a str,
    },
    InstallationDirConfirmation {
        name: &'a str,
        version: &'a str,
        dir: &'a Path,
    },
    OverwritePrompt {
        name: &'a str,
        version: &'a str,
        dir: &'a Path,
    },
    DeletionInProgress {
        name: &'a str,
        version: &'a str,
    },
    Reprompt,
    ResponseReadError,
    ShortcutCreateError,
    DesktopShortcutPrompt,
    StartMenuShortcutPrompt,
    ApplicationsDirShortcutPrompt,
}

impl fmt::Display for Msg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Msg::DefaultPrompt => write!(f, "Provide input: "),
            Msg::Initial {
                name,
                home,
                separator,
            } => write!(
                f,
                "{name} installation creates a folder in your '{}{}' folder.",
                home.display(),
                separator
            ),
            Msg::InstallationDirPrompt { default_name } => write!(
                f,
                "Provide the installation directory [default: {default_name}] : "
            ),
            Msg::InstallationDirConfirmation { name, version, dir } => write!(
                f,
                "{name} v{version} will be installed in: {}",
                dir.display()
            ),
            Msg::OverwritePrompt { name, version, dir } => write!(
                f,
                "Do you want to overwrite the previously installed {name} v{version} in {}? \
                 [{YES}/{NO}] ",
                dir.display()
            ),
            Msg::DeletionInProgress { name, version } => {
                write!(f, "Deleting the existing {name} v{version}...")
            }
            Msg::Reprompt => write!(f, "Type {YES} or {NO}."),
            Msg::ResponseReadError => write!(f, "Unable to read your response."),
            Msg::ShortcutCreateError => write!(f, "Unable to create the shortcut."),
            Msg::DesktopShortcutPrompt => {
                write!(f, "Do you want to create a Desktop shortcut? [{YES}/{NO}] ")
            }
            Msg::StartMenuShortcutPrompt => {
                write!(f, "Do you want to create a Start menu shortcut? [{YES}/{NO}] ")
            }
            Msg::ApplicationsDirShortcutPrompt => write!(
                f,
                "Do you want to create a shortcut in the Applications folder? [{YES}/{NO}] "
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_arguments_into_messages() {
        let dir = Path::new("/opt/dl/v60.0");
        let text = Msg::InstallationDirConfirmation {
            name: "Data Loader",
            version: "60.0",
            dir,
        }
        .to_string();

        assert_eq!(text, "Data Loader v60.0 will be installed in: /opt/dl/v60.0");
    }

    #[test]
    fn product_name_comes_from_the_caller() {
        let text = Msg::OverwritePrompt {
            name: "Bulk Loader",
            version: "2.1",
            dir: Path::new("/opt/bl/v2.1"),
        }
        .to_string();

        assert_eq!(
            text,
            "Do you want to overwrite the previously installed Bulk Loader v2.1 in /opt/bl/v2.1? \
             [yes/no] "
        );
        assert!(!text.contains("Data Loader"));
    }
}
