//! The design tree: components, their parameters and fin planforms.

use crate::parse::factory;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::setters::{Resolved, SetterRegistry};
use crate::parse::values::parse_double;
use crate::parse::{Attributes, LoadContext};
use crate::types::{ComponentIndex, ComponentKind, FinPoint};
use crate::{OrkError, Result};

use super::appearance::AppearanceHandler;
use super::configuration::{DeploymentHandler, FlightConfigurationHandler, SeparationHandler};
use super::motor::MotorMountHandler;

/// Children of `<subcomponents>`: one element per component.
pub(crate) struct SubcomponentsHandler {
    parent: ComponentIndex,
}

impl ElementHandler for SubcomponentsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        let Some(component) = factory::construct(element) else {
            return unknown_element(cx, element);
        };
        log::trace!("new {:?} under {:?}", component.kind(), self.parent);
        let index = cx.doc.rocket.add_child(self.parent, component);
        Open::Delegate(Box::new(ComponentParameterHandler::new(cx, index)))
    }

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
}

/// Elements of a component that are not simple parameters.
const STRUCTURAL: &[&str] = &[
    "subcomponents",
    "motormount",
    "finpoints",
    "motorconfiguration",
    "flightconfiguration",
    "deploymentconfiguration",
    "separationconfiguration",
    "appearance",
    "insideappearance",
];

/// Reads the fields of one component.
///
/// Loading fields is not an edit, so a preset loaded from the file stays in
/// place while the remaining fields are read.
pub(crate) struct ComponentParameterHandler {
    index: ComponentIndex,
}

impl ComponentParameterHandler {
    pub fn new(cx: &mut LoadContext<'_>, index: ComponentIndex) -> Self {
        cx.component_mut(index).set_auto_clear_preset(false);
        Self { index }
    }

    fn refuse(&self, cx: &mut LoadContext<'_>, element: &str) -> Open {
        let kind = cx.component(self.index).kind();
        cx.warn(format!(
            "Element <{element}> is not allowed in {}, ignoring.",
            kind.display_name()
        ));
        Open::Skip
    }
}

impl ElementHandler for ComponentParameterHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        let component = cx.component(self.index);
        let kind = component.kind();
        let has_mount = component.motor_mount().is_some();
        let has_deployment = component.deployment().is_some();
        let has_separation = component.separation().is_some();
        let index = self.index;
        match element {
            "subcomponents" => Open::Delegate(Box::new(SubcomponentsHandler { parent: index })),
            "motormount" if has_mount => Open::Delegate(Box::new(MotorMountHandler::new(index))),
            "finpoints" if kind == ComponentKind::FreeformFinSet => {
                Open::Delegate(Box::new(FinPointsHandler::new(index)))
            }
            "motorconfiguration" | "flightconfiguration" if kind == ComponentKind::Rocket => {
                Open::Delegate(Box::<FlightConfigurationHandler>::default())
            }
            "deploymentconfiguration" if has_deployment => {
                Open::Delegate(Box::new(DeploymentHandler::new(index)))
            }
            "separationconfiguration" if has_separation => {
                Open::Delegate(Box::new(SeparationHandler::new(index)))
            }
            "appearance" => Open::Delegate(Box::new(AppearanceHandler::outside(index))),
            "insideappearance" if kind.has_inside_surface() => {
                Open::Delegate(Box::new(AppearanceHandler::inside(index)))
            }
            _ if STRUCTURAL.contains(&element) => self.refuse(cx, element),
            _ => Open::PlainText,
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        if STRUCTURAL.contains(&element) {
            return Ok(());
        }
        let kind = cx.component(self.index).kind();
        match SetterRegistry::global().resolve(kind, element) {
            Resolved::Setter(setter) => {
                let env = cx.env;
                let target = cx.doc.rocket.component_mut(self.index);
                setter
                    .apply(target, content, attrs, env, &mut cx.warnings)
                    .map_err(|_| OrkError::IncapableTarget {
                        kind,
                        element: element.to_string(),
                    })
            }
            Resolved::Absent | Resolved::Tombstoned => {
                cx.warn(format!(
                    "Unknown parameter type '{element}' for {}, ignoring.",
                    kind.display_name()
                ));
                Ok(())
            }
        }
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        cx.component_mut(self.index).set_auto_clear_preset(true);
        Ok(Built::Nothing)
    }
}

/// `<finpoints>` of a freeform fin set.
pub(crate) struct FinPointsHandler {
    index: ComponentIndex,
    points: Vec<FinPoint>,
}

impl FinPointsHandler {
    fn new(index: ComponentIndex) -> Self {
        Self {
            index,
            points: Vec::new(),
        }
    }
}

impl ElementHandler for FinPointsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "point" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        warn_unexpected_text(cx, element, content);
        let x = attrs.get("x").and_then(parse_double);
        let y = attrs.get("y").and_then(parse_double);
        match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                self.points.push(FinPoint { x, y })
            }
            _ => cx.warn("Illegal fin point specification, ignoring."),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let valid = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() >= 3 && first.y == 0.0 && last.y == 0.0,
            _ => false,
        };
        if !valid {
            cx.warn("Freeform fin set points are illegal, ignoring.");
            return Ok(Built::Nothing);
        }
        if cx.component_mut(self.index).set_fin_points(self.points).is_none() {
            cx.warn("Freeform fin set points are illegal, ignoring.");
        }
        Ok(Built::Nothing)
    }
}
