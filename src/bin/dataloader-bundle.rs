use std::process::ExitCode;

use clap::Parser;
use dataloader_installer::{
    bundler::{BundleArgs, create_bundle},
    logging::{Logger, Severity},
};

fn main() -> ExitCode {
    let logger = Logger::init();

    match create_bundle(BundleArgs::parse()) {
        Ok(installer_name) => {
            println!("Installer saved to {}", installer_name.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            logger.report(Severity::Fatal, &err);
            ExitCode::FAILURE
        }
    }
}
