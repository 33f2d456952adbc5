//! Stored simulations.

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::{Attributes, LoadContext};
use crate::types::{
    FlightData, Simulation, SimulationExtension, SimulationOptions, SimulationStatus, XmlEnum,
};

use super::conditions::ConditionsHandler;
use super::datatypes::{LegacyExpressionsHandler, add_expression};
use super::entries::EntryReader;
use super::flight_data::FlightDataHandler;

const KNOWN_SIMULATOR: &str = "RK4Simulator";
const KNOWN_CALCULATOR: &str = "BarrowmanCalculator";

/// `<simulations>`.
pub(crate) struct SimulationsHandler;

impl ElementHandler for SimulationsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "simulation" => Open::Delegate(Box::<SimulationHandler>::default()),
            _ => unknown_element(cx, element),
        }
    }
}

#[derive(Default)]
struct SimulationHandler {
    name: Option<String>,
    simulator: Option<String>,
    calculator: Option<String>,
    listeners: Vec<String>,
    options: Option<SimulationOptions>,
    extensions: Vec<Box<dyn SimulationExtension>>,
    flight_data: Option<FlightData>,
}

impl ElementHandler for SimulationHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "name" | "simulator" | "calculator" | "listener" => Open::PlainText,
            "conditions" => Open::Delegate(Box::<ConditionsHandler>::default()),
            "extension" => Open::Delegate(Box::<ExtensionHandler>::default()),
            "customexpressions" => Open::Delegate(Box::<LegacyExpressionsHandler>::default()),
            "flightdata" => Open::Delegate(Box::<FlightDataHandler>::default()),
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        _attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        match (element, built) {
            ("name", _) => self.name = Some(content.to_string()),
            ("simulator", _) => {
                if content == KNOWN_SIMULATOR {
                    self.simulator = Some(content.to_string());
                } else {
                    cx.warn(format!("Unknown simulator '{content}' specified, ignoring."));
                }
            }
            ("calculator", _) => {
                if content == KNOWN_CALCULATOR {
                    self.calculator = Some(content.to_string());
                } else {
                    cx.warn(format!("Unknown calculator '{content}' specified, ignoring."));
                }
            }
            ("listener", _) => {
                if !content.is_empty() {
                    self.listeners.push(content.to_string());
                }
            }
            ("conditions", Built::Conditions(options)) => self.options = Some(*options),
            ("extension", Built::Extension(extension)) => self.extensions.push(extension),
            // Flight data types may refer to these, so they are known before
            // the <flightdata> that follows.
            ("customexpressions", Built::Expressions(expressions)) => {
                for expression in expressions {
                    add_expression(cx, expression);
                }
            }
            ("flightdata", Built::FlightData(data)) => self.flight_data = Some(data),
            ("conditions" | "extension" | "customexpressions" | "flightdata", _) => {}
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let mut status = match attrs.get("status").and_then(SimulationStatus::from_xml) {
            Some(status) => status,
            None => {
                cx.warn("Simulation status unknown, assuming outdated.");
                SimulationStatus::Outdated
            }
        };
        if matches!(status, SimulationStatus::Loaded | SimulationStatus::UpToDate)
            && self.flight_data.is_none()
        {
            status = SimulationStatus::Outdated;
        }

        let options = match self.options {
            Some(options) => options,
            None => {
                cx.warn("Simulation conditions not defined, using defaults.");
                SimulationOptions::default()
            }
        };

        let mut simulation = Simulation::new(self.name.unwrap_or_else(|| "Simulation".to_string()), options);
        simulation.status = status;
        simulation.simulator = self.simulator;
        simulation.calculator = self.calculator;
        simulation.listeners = self.listeners;
        simulation.extensions = self.extensions;
        simulation.flight_data = self.flight_data;

        log::debug!("simulation '{}' ({:?})", simulation.name, simulation.status);
        cx.doc.simulations.push(simulation);
        Ok(Built::Nothing)
    }
}

/// `<extension extensionid>` with its typed configuration entries.
#[derive(Default)]
struct ExtensionHandler {
    entries: EntryReader,
}

impl ElementHandler for ExtensionHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        match element {
            "entry" => self.entries.open(cx, attrs),
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        _element: &str,
        attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        self.entries.close(cx, attrs, content, built);
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let Some(id) = attrs.get("extensionid").filter(|id| !id.is_empty()) else {
            cx.warn("Simulation extension without an id, ignoring.");
            return Ok(Built::Nothing);
        };
        let env = cx.env;
        match env.extensions.create(id, self.entries.finish()) {
            Some(extension) => Ok(Built::Extension(extension)),
            None => {
                cx.warn(format!("Simulation extension '{id}' is not available, ignoring."));
                Ok(Built::Nothing)
            }
        }
    }
}
