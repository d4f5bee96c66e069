use std::{fs, io, path::Path};

use log::debug;

use crate::{session::Session, shortcut::ShortcutError};

pub const CREATE_DESKTOP_SHORTCUT: &str = ":createDesktopShortcut";
pub const CREATE_START_MENU_SHORTCUT: &str = ":createStartMenuShortcut";

pub fn desktop(session: &Session, dir: &Path) -> Result<(), ShortcutError> {
    run_helper(session, CREATE_DESKTOP_SHORTCUT, dir)
}

pub fn start_menu(session: &Session, dir: &Path) -> Result<(), ShortcutError> {
    let app_data = session
        .host
        .app_data
        .as_ref()
        .ok_or(ShortcutError::AppDataMissing)?;
    let programs = app_data
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join(&session.manifest.publisher);
    debug!("going to create {}", programs.display());
    fs::create_dir_all(&programs)?;

    run_helper(session, CREATE_START_MENU_SHORTCUT, dir)
}

/// Arguments for `cmd` that call `util\util.bat <subcommand> <dir>`
pub fn helper_arguments(dir: &Path, subcommand: &str, redirect_output: bool) -> String {
    let dir = dir.display();
    let mut arguments = format!("/c call \"{dir}\\util\\util.bat\" {subcommand} \"{dir}\"");
    if redirect_output {
        arguments.push_str(" > debug.txt 2>&1");
    }
    arguments
}

fn run_helper(
    session: &Session,
    subcommand: &'static str,
    dir: &Path,
) -> Result<(), ShortcutError> {
    let arguments = helper_arguments(dir, subcommand, session.logger.debug_enabled());
    debug!("going to execute windows command: cmd {arguments}");
    let code = (session.runner)(&arguments)?;
    debug!("windows command exited with exit code: {code}");
    if code != 0 {
        return Err(ShortcutError::HelperFailed { subcommand, code });
    }
    Ok(())
}

/// Runs `cmd` with `arguments` passed through unquoted and waits for it.
pub fn run_cmd(arguments: &str) -> io::Result<i32> {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;

        let status = std::process::Command::new("cmd").raw_arg(arguments).status()?;
        Ok(status.code().unwrap_or(-1))
    }
    #[cfg(not(windows))]
    {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot run `cmd {arguments}` outside of Windows"),
        ))
    }
}
