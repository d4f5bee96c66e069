mod config;
pub mod bundler;
pub mod farewell;
pub mod installer;
pub mod logging;
pub mod messages;
pub mod platform;
pub mod post_embed;
pub mod prompt;
pub mod resources;
pub mod session;
pub mod shortcut;

pub use config::{AppManifest, DirTrait, EmbeddedConfig, HostPaths};
pub use installer::{InstallError, InstallationPlan, Outcome, install};
pub use platform::Platform;
pub use session::Session;
