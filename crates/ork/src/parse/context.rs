use crate::ImportContext;
use crate::types::{ComponentIndex, DesignDocument, RocketComponent, WarningSet};

/// State shared by all handlers of one load.
pub(crate) struct LoadContext<'a> {
    pub doc: DesignDocument,
    pub warnings: WarningSet,
    pub env: &'a ImportContext,
    /// `major * 100 + minor`; 0 until the document element has been read.
    pub file_version: u32,
}

impl<'a> LoadContext<'a> {
    pub fn new(env: &'a ImportContext) -> Self {
        Self {
            doc: DesignDocument::new(),
            warnings: WarningSet::new(),
            env,
            file_version: 0,
        }
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.warnings.add_str(text);
    }

    pub fn component(&self, index: ComponentIndex) -> &RocketComponent {
        self.doc.rocket.component(index)
    }

    pub fn component_mut(&mut self, index: ComponentIndex) -> &mut RocketComponent {
        self.doc.rocket.component_mut(index)
    }
}
