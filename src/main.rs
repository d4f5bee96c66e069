use std::process::ExitCode;

use dataloader_installer::{
    Session,
    farewell::Farewell,
    install,
    logging::{Logger, Severity},
};
use log::debug;

fn main() -> ExitCode {
    let logger = Logger::init();

    let _farewell = match Farewell::register() {
        Ok(farewell) => farewell,
        Err(err) => {
            logger.report(Severity::Fatal, &err);
            return ExitCode::FAILURE;
        }
    };

    let result = Session::detect(logger)
        .and_then(|mut session| install(std::env::args().skip(1), &mut session));

    match result {
        Ok(outcome) => {
            debug!("installer finished: {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            logger.report(Severity::Fatal, &err);
            ExitCode::FAILURE
        }
    }
}
