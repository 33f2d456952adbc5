use std::collections::BTreeMap;

use super::{ConfigValue, Material, Rocket, Simulation};

/// A user-defined flight data type computed from other types.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomExpression {
    pub name: String,
    pub symbol: String,
    pub unit: String,
    pub expression: String,
}

/// How the document wants to be written back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StorageOptions {
    pub save_simulation_data: bool,
    /// The user chose the options; otherwise they are inferred on load.
    pub explicitly_set: bool,
}

/// Preferences stored with the document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentPreferences {
    pub entries: BTreeMap<String, ConfigValue>,
    /// Materials defined in this document only.
    pub materials: Vec<Material>,
}

/// Undo log of the host application. Loading always ends with it empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UndoHistory {
    entries: Vec<String>,
}

impl UndoHistory {
    pub fn push(&mut self, description: impl Into<String>) {
        self.entries.push(description.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A complete design: the rocket, its simulations and document settings.
#[derive(Debug, Default)]
pub struct DesignDocument {
    pub rocket: Rocket,
    pub simulations: Vec<Simulation>,
    pub custom_expressions: Vec<CustomExpression>,
    /// Rendering settings of the 3D photo view, as stored.
    pub photo_settings: BTreeMap<String, String>,
    pub preferences: DocumentPreferences,
    pub storage: StorageOptions,
    pub undo: UndoHistory,
    /// `major * 100 + minor` of the file format the document was read from.
    pub file_version: u32,
    frozen: bool,
}

impl DesignDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the document as fully loaded.
    pub fn freeze(&mut self) {
        self.undo.clear();
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn custom_expression(&self, name: &str) -> Option<&CustomExpression> {
        self.custom_expressions.iter().find(|e| e.name == name)
    }
}
