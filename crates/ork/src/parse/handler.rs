use crate::Result;
use crate::types::{
    AtmosphereModel, ConfigValue, CustomExpression, Decal, FlightData,
    FlightDataBranch, Material, SimulationExtension, SimulationOptions, Warning, WindSettings,
};

use super::LoadContext;
use super::handlers::motor::{IgnitionOverlay, MotorElement};

/// Attributes of one element, in document order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn push(&mut self, key: String, value: String) {
        self.0.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The first of `keys` that is present.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, &str); N]> for Attributes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// What a handler wants done with a child element.
pub(crate) enum Open {
    /// Interpret the child's content with a new handler.
    Delegate(Box<dyn ElementHandler>),
    /// Collect the child's text and pass it to `close_element`.
    PlainText,
    /// Ignore the whole subtree.
    Skip,
}

/// The value a finished child handler hands back to its parent.
pub(crate) enum Built {
    Nothing,
    /// The `<openrocket>` element finished; whether it held a design.
    Document { rocket: bool },
    Motor(MotorElement),
    Ignition(IgnitionOverlay),
    Decal(Decal),
    Conditions(Box<SimulationOptions>),
    Wind(WindSettings),
    Atmosphere(AtmosphereModel),
    Expression(CustomExpression),
    Expressions(Vec<CustomExpression>),
    Extension(Box<dyn SimulationExtension>),
    List(Vec<ConfigValue>),
    Materials(Vec<Material>),
    FlightData(FlightData),
    Branch(FlightDataBranch),
    Warning(Warning),
}

/// Interprets the children of one element.
///
/// A handler lives from its own opening tag to its own closing tag.
/// `close_element` runs once per child, after the child's own handler (if
/// any) has finished; `end_handler` runs once when the handler's element
/// closes.
pub(crate) trait ElementHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open;

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        warn_unexpected_text(cx, element, content);
        Ok(())
    }

    fn end_handler(
        self: Box<Self>,
        _cx: &mut LoadContext<'_>,
        _attrs: &Attributes,
        _content: &str,
    ) -> Result<Built> {
        Ok(Built::Nothing)
    }
}

pub(crate) fn warn_unexpected_text(cx: &mut LoadContext<'_>, element: &str, content: &str) {
    if !content.is_empty() {
        cx.warn(format!("Unknown text in element '{element}', ignoring."));
    }
}

/// Warn about an element the current handler does not understand.
pub(crate) fn unknown_element(cx: &mut LoadContext<'_>, element: &str) -> Open {
    cx.warn(format!("Unknown element '{element}', ignoring."));
    Open::Skip
}
