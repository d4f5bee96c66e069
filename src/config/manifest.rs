use serde::{Deserialize, Serialize};

pub const DEFAULT_FRIENDLY_NAME: &str = "DataLoader";
pub const DEFAULT_BASE_NAME: &str = "dataloader";
pub const DEFAULT_VERSION: &str = "60.0";
pub const DEFAULT_PUBLISHER: &str = "Salesforce";

/// Identity of the application being installed.
///
/// `friendly_name` and `version` are required by the builder, everything else
/// falls back to the Data Loader defaults.
pub type AppManifest = AppManifestBuilder<String, String>;

impl AppManifest {
    pub fn build() -> AppManifestBuilder<(), ()> {
        AppManifestBuilder {
            friendly_name: (),
            version: (),
            base_name: DEFAULT_BASE_NAME.to_string(),
            publisher: DEFAULT_PUBLISHER.to_string(),
        }
    }

    /// Name of the macOS application bundle, e.g. `dataloader.app`
    pub fn app_bundle(&self) -> String {
        format!("{}.app", self.base_name)
    }

    /// Console-mode launcher shipped next to the bundle, e.g. `dataloader_console`
    pub fn console_executable(&self) -> String {
        format!("{}_console", self.base_name)
    }

    /// Name the console launcher gets on Linux, e.g. `dataloader.sh`
    pub fn linux_launcher(&self) -> String {
        format!("{}.sh", self.base_name)
    }

    /// Label used for desktop and Applications links, e.g. `DataLoader 60.0`
    pub fn shortcut_label(&self) -> String {
        format!("{} {}", self.friendly_name, self.version)
    }
}

impl Default for AppManifest {
    fn default() -> Self {
        AppManifest::build()
            .friendly_name(DEFAULT_FRIENDLY_NAME)
            .version(DEFAULT_VERSION)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifestBuilder<A, B> {
    pub friendly_name: A,
    pub version: B,
    pub base_name: String,
    pub publisher: String,
}

impl<A, B> AppManifestBuilder<A, B> {
    pub fn friendly_name(self, name: impl Into<String>) -> AppManifestBuilder<String, B> {
        AppManifestBuilder {
            friendly_name: name.into(),
            version: self.version,
            base_name: self.base_name,
            publisher: self.publisher,
        }
    }

    pub fn version(self, version: impl Into<String>) -> AppManifestBuilder<A, String> {
        AppManifestBuilder {
            friendly_name: self.friendly_name,
            version: version.into(),
            base_name: self.base_name,
            publisher: self.publisher,
        }
    }

    pub fn base_name(self, base_name: impl Into<String>) -> AppManifestBuilder<A, B> {
        AppManifestBuilder {
            base_name: base_name.into(),
            ..self
        }
    }

    pub fn publisher(self, publisher: impl Into<String>) -> AppManifestBuilder<A, B> {
        AppManifestBuilder {
            publisher: publisher.into(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_names_the_data_loader_artifacts() {
        let manifest = AppManifest::default();

        assert_eq!(manifest.app_bundle(), "dataloader.app");
        assert_eq!(manifest.console_executable(), "dataloader_console");
        assert_eq!(manifest.linux_launcher(), "dataloader.sh");
        assert_eq!(manifest.shortcut_label(), "DataLoader 60.0");
        assert_eq!(manifest.publisher, "Salesforce");
    }

    #[test]
    fn builder_overrides_optional_fields() {
        let manifest = AppManifest::build()
            .base_name("loader")
            .friendly_name("Loader")
            .publisher("Acme")
            .version("1.2");

        assert_eq!(manifest.app_bundle(), "loader.app");
        assert_eq!(manifest.shortcut_label(), "Loader 1.2");
        assert_eq!(manifest.publisher, "Acme");
    }
}
