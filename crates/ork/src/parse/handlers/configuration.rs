//! Flight configurations and the per-configuration recovery and staging
//! overrides of components.

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::values::{parse_bool, parse_double};
use crate::parse::{Attributes, LoadContext};
use crate::types::{
    ComponentIndex, DeployEvent, DuplicateConfiguration, FlightConfiguration, FlightConfigurationId,
    SeparationEvent, Warning,
};

use super::{enumeration, number};

/// `<flightconfiguration>`, or `<motorconfiguration>` in older files.
#[derive(Default)]
pub(crate) struct FlightConfigurationHandler {
    name: Option<String>,
    stages: Vec<(u32, bool)>,
}

impl ElementHandler for FlightConfigurationHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "name" if self.name.is_none() => Open::PlainText,
            "stage" => Open::PlainText,
            _ => {
                cx.warnings.add(Warning::invalid_parameter());
                Open::Skip
            }
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
        match element {
            "name" => self.name = Some(content.to_string()),
            "stage" => {
                let number = attrs.get("number").and_then(|n| n.trim().parse::<u32>().ok());
                let active = attrs.get("active").and_then(parse_bool);
                match (number, active) {
                    (Some(number), Some(active)) => self.stages.push((number, active)),
                    _ => {
                        cx.warnings.add(Warning::invalid_parameter());
                    }
                }
            }
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let id = FlightConfigurationId::parse(attrs.get("configid"));
        if !id.is_valid() {
            cx.warnings.add(Warning::invalid_parameter());
            return Ok(Built::Nothing);
        }

        let mut configuration = FlightConfiguration::new(id.clone());
        configuration.name = self.name.filter(|name| !name.trim().is_empty());
        for (stage, active) in self.stages {
            configuration.defer_stage_activeness(stage, active);
        }

        let configurations = cx.doc.rocket.configurations_mut();
        if let Err(DuplicateConfiguration(id)) = configurations.declare(configuration) {
            cx.warn(format!("Duplicate flight configuration ID '{id}' used, ignoring."));
            return Ok(Built::Nothing);
        }
        if attrs.get("default").and_then(parse_bool) == Some(true) {
            configurations.set_default(id);
        }
        Ok(Built::Nothing)
    }
}

fn override_id(cx: &mut LoadContext<'_>, attrs: &Attributes, what: &str) -> Option<FlightConfigurationId> {
    let id = FlightConfigurationId::parse(attrs.get("configid"));
    if !id.is_valid() {
        cx.warn(format!("Illegal {what} configuration, ignoring."));
        return None;
    }
    Some(id)
}

/// `<deploymentconfiguration configid>` of a recovery device.
///
/// Fields not present keep the values of the component's default
/// deployment.
pub(crate) struct DeploymentHandler {
    index: ComponentIndex,
    event: Option<DeployEvent>,
    altitude: Option<f64>,
    delay: Option<f64>,
}

impl DeploymentHandler {
    pub fn new(index: ComponentIndex) -> Self {
        Self {
            index,
            event: None,
            altitude: None,
            delay: None,
        }
    }
}

impl ElementHandler for DeploymentHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "deployevent" | "deployaltitude" | "deploydelay" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        match element {
            "deployevent" => self.event = enumeration(cx, content),
            "deployaltitude" => self.altitude = number(cx, content),
            "deploydelay" => self.delay = number(cx, content),
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let Some(id) = override_id(cx, attrs, "deployment") else {
            return Ok(Built::Nothing);
        };
        if let Some(deployment) = cx.component_mut(self.index).deployment_mut() {
            let mut config = deployment.derive_default();
            if let Some(event) = self.event {
                config.event = event;
            }
            if let Some(altitude) = self.altitude {
                config.altitude = altitude;
            }
            if let Some(delay) = self.delay {
                config.delay = delay;
            }
            deployment.set(id, config);
        }
        Ok(Built::Nothing)
    }
}

/// `<separationconfiguration configid>` of a stage.
pub(crate) struct SeparationHandler {
    index: ComponentIndex,
    event: Option<SeparationEvent>,
    delay: Option<f64>,
}

impl SeparationHandler {
    pub fn new(index: ComponentIndex) -> Self {
        Self {
            index,
            event: None,
            delay: None,
        }
    }
}

impl ElementHandler for SeparationHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "separationevent" | "separationdelay" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        _built: Built,
    ) -> Result<()> {
        match element {
            "separationevent" => self.event = enumeration(cx, content),
            "separationdelay" => match parse_double(content) {
                Some(delay) => self.delay = Some(delay),
                None => cx.warn("Illegal separation delay specified, ignoring."),
            },
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let Some(id) = override_id(cx, attrs, "separation") else {
            return Ok(Built::Nothing);
        };
        if let Some(separation) = cx.component_mut(self.index).separation_mut() {
            let mut config = separation.derive_default();
            if let Some(event) = self.event {
                config.event = event;
            }
            if let Some(delay) = self.delay {
                config.delay = delay;
            }
            separation.set(id, config);
        }
        Ok(Built::Nothing)
    }
}
