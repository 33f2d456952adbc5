use serde::Deserialize;

use crate::types::{
    ExtensionProvider, MaterialDatabase, MaterialLookup, MotorDatabase, MotorFinder, PresetCatalog,
    PresetDatabase, StoredExtensions,
};

/// Loader behaviour switches.
///
/// ```toml
/// strict_version = true
/// keep_empty_branches = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    /// Refuse files of unsupported format versions instead of warning.
    pub strict_version: bool,
    /// Accept the flat attribute summary of `<flightdata>` when a file holds
    /// no data branches.
    pub legacy_flight_data_summary: bool,
    /// Keep data branches that contain no rows.
    pub keep_empty_branches: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            strict_version: false,
            legacy_flight_data_summary: true,
            keep_empty_branches: false,
        }
    }
}

impl ImportOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Databases and plug-ins the loader resolves file contents against.
pub struct ImportContext {
    pub materials: Box<dyn MaterialLookup>,
    pub presets: Box<dyn PresetDatabase>,
    pub motors: Box<dyn MotorFinder>,
    pub extensions: Box<dyn ExtensionProvider>,
    pub options: ImportOptions,
}

impl Default for ImportContext {
    fn default() -> Self {
        Self {
            materials: Box::new(MaterialDatabase::with_defaults()),
            presets: Box::new(PresetCatalog::default()),
            motors: Box::new(MotorDatabase::default()),
            extensions: Box::new(StoredExtensions),
            options: ImportOptions::default(),
        }
    }
}

impl ImportContext {
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_materials(mut self, materials: impl MaterialLookup + 'static) -> Self {
        self.materials = Box::new(materials);
        self
    }

    pub fn with_presets(mut self, presets: impl PresetDatabase + 'static) -> Self {
        self.presets = Box::new(presets);
        self
    }

    pub fn with_motors(mut self, motors: impl MotorFinder + 'static) -> Self {
        self.motors = Box::new(motors);
        self
    }

    pub fn with_extensions(mut self, extensions: impl ExtensionProvider + 'static) -> Self {
        self.extensions = Box::new(extensions);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let options = ImportOptions::from_toml_str("strict_version = true").unwrap();
        assert!(options.strict_version);
        assert!(options.legacy_flight_data_summary);
        assert!(!options.keep_empty_branches);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ImportOptions::from_toml_str("stict_version = true").is_err());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ImportOptions::from_toml_str("").unwrap(), ImportOptions::default());
    }
}
