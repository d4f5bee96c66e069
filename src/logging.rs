use std::error::Error;

use log::{LevelFilter, error};

/// Environment variable holding the `env_logger` filter, e.g. `debug`
pub const LOG_ENV: &str = "DATALOADER_INSTALLER_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The failing step is skipped, the run continues
    Error,
    /// The run ends with a non-zero exit code
    Fatal,
}

/// Logging handle created once in `main` and carried by the [`Session`](crate::Session).
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    /// Installs `env_logger` as the global logger, defaulting to `info`.
    pub fn init() -> Self {
        let env = env_logger::Env::new().filter_or(LOG_ENV, "info");
        let logger = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .build();
        let level = logger.filter();

        log::set_max_level(level);
        // keeps a logger that was installed earlier
        let _ = log::set_boxed_logger(Box::new(logger));

        Logger { level }
    }

    /// A handle that does not touch the global logger.
    pub fn new(level: LevelFilter) -> Self {
        Logger { level }
    }

    pub fn debug_enabled(&self) -> bool {
        self.level >= LevelFilter::Debug
    }

    pub fn report(&self, severity: Severity, err: &dyn Error) {
        let chain = error_chain(err);
        match severity {
            Severity::Error => error!("Installer: {chain}"),
            Severity::Fatal => error!("FATAL Installer: {chain}"),
        }
    }
}

/// Renders an error followed by all of its sources.
pub fn error_chain(err: &dyn Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str("\n  caused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn chain_includes_sources() {
        let err = Outer(std::io::Error::other("disk on fire"));

        assert_eq!(error_chain(&err), "outer failure\n  caused by: disk on fire");
    }

    #[test]
    fn debug_redirect_follows_level() {
        assert!(Logger::new(LevelFilter::Debug).debug_enabled());
        assert!(Logger::new(LevelFilter::Trace).debug_enabled());
        assert!(!Logger::new(LevelFilter::Info).debug_enabled());
    }
}
