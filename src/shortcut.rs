//! Launcher shortcuts, each offered behind its own yes/no prompt.

use std::io;

use log::debug;
use thiserror::Error;

use crate::{logging::Severity, messages::Msg, prompt::PromptError, session::Session};

pub mod mac_os;
pub mod symlink;
pub mod windows;

#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("APPDATA is not set, cannot locate the Start Menu")]
    AppDataMissing,
    #[error("Shortcut helper `{subcommand}` exited with code {code}")]
    HelperFailed { subcommand: &'static str, code: i32 },
}

/// Asks `prompt` and runs `create` on yes.
///
/// Failures are reported to the log and never end the run.
pub fn offer(
    session: &mut Session,
    prompt: Msg<'_>,
    create: impl FnOnce(&Session) -> Result<(), ShortcutError>,
) {
    match session.console.confirm(&prompt.to_string()) {
        Ok(true) => {
            if let Err(err) = create(&*session) {
                eprintln!("{}", Msg::ShortcutCreateError);
                session.logger.report(Severity::Error, &err);
            }
        }
        Ok(false) => debug!("shortcut declined"),
        Err(err) => report_read_error(session, err),
    }
}

fn report_read_error(session: &Session, err: PromptError) {
    eprintln!("{}", Msg::ResponseReadError);
    session.logger.report(Severity::Error, &err);
}
