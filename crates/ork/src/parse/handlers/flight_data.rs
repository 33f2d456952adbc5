//! Stored simulation results.
//!
//! ```xml
//! <flightdata maxaltitude="312.4" ...>
//!   <warning type="LargeAOA" priority="normal"><parameter>0.31</parameter></warning>
//!   <databranch name="Sustainer" types="Time,Altitude,Total velocity">
//!     <event time="0.0" type="launch"/>
//!     <datapoint>0,0,0</datapoint>
//!   </databranch>
//! </flightdata>
//! ```

use uuid::Uuid;

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::values::parse_double;
use crate::parse::{Attributes, LoadContext};
use crate::types::{
    AbortCause, ComponentId, FlightData, FlightDataBranch, FlightDataSummary, FlightDataType,
    FlightEvent, FlightEventType, Priority, Warning, WarningKind, WarningSet, XmlEnum,
};

/// `<flightdata>` of one simulation.
#[derive(Default)]
pub(crate) struct FlightDataHandler {
    warnings: WarningSet,
    branches: Vec<FlightDataBranch>,
}

/// A column type by name: built in, then custom expression, then unknown.
fn data_type(cx: &LoadContext<'_>, name: &str) -> FlightDataType {
    if let Some(builtin) = FlightDataType::builtin(name) {
        return builtin;
    }
    if let Some(expression) = cx.doc.custom_expression(name) {
        return FlightDataType::custom(&expression.name, &expression.symbol, &expression.unit);
    }
    log::warn!("unknown flight data type '{name}', using it without symbol or unit");
    FlightDataType::unknown(name)
}

fn summary(attrs: &Attributes) -> FlightDataSummary {
    let value = |name: &str| attrs.get(name).and_then(parse_double).unwrap_or(f64::NAN);
    FlightDataSummary {
        max_altitude: value("maxaltitude"),
        max_velocity: value("maxvelocity"),
        max_acceleration: value("maxacceleration"),
        max_mach: value("maxmach"),
        time_to_apogee: value("timetoapogee"),
        flight_time: value("flighttime"),
        ground_hit_velocity: value("groundhitvelocity"),
        launch_rod_velocity: value("launchrodvelocity"),
        deployment_velocity: value("deploymentvelocity"),
        optimum_delay: value("optimumdelay"),
    }
}

impl ElementHandler for FlightDataHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        match element {
            "warning" if attrs.get("type").is_some() => {
                Open::Delegate(Box::new(WarningHandler::new(attrs)))
            }
            "warning" => Open::PlainText,
            "databranch" => {
                let (Some(name), Some(types)) = (attrs.get("name"), attrs.get("types")) else {
                    cx.warn("Illegal flight data definition, ignoring.");
                    return Open::Skip;
                };
                let types = types.split(',').map(|t| data_type(cx, t.trim())).collect();
                let mut branch = FlightDataBranch::new(name, types);
                if let Some(altitude) = attrs.get("optimumAltitude").and_then(parse_double) {
                    branch.optimum_altitude = altitude;
                }
                if let Some(time) = attrs.get("timeToOptimumAltitude").and_then(parse_double) {
                    branch.time_to_optimum_altitude = time;
                }
                Open::Delegate(Box::new(BranchHandler { branch }))
            }
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
            ("warning", Built::Warning(warning)) => {
                self.warnings.add_stored(warning);
            }
            ("warning", _) => {
                if !content.is_empty() {
                    self.warnings.add(Warning::message(content));
                }
            }
            ("databranch", Built::Branch(branch)) => {
                if branch.is_empty() && !cx.env.options.keep_empty_branches {
                    log::debug!("dropping empty data branch '{}'", branch.name());
                } else {
                    self.branches.push(branch);
                }
            }
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, attrs: &Attributes, _content: &str) -> Result<Built> {
        let data = if !self.branches.is_empty() || !cx.env.options.legacy_flight_data_summary {
            FlightData::from_branches(self.branches, self.warnings)
        } else {
            FlightData::from_summary(summary(attrs), self.warnings)
        };
        Ok(Built::FlightData(data))
    }
}

/// `<databranch>`: rows of values and the events between them.
struct BranchHandler {
    branch: FlightDataBranch,
}

impl BranchHandler {
    fn add_row(&mut self, cx: &mut LoadContext<'_>, content: &str) {
        let fields: Vec<&str> = content.split(',').collect();
        if fields.len() != self.branch.types().len() {
            cx.warn("Data point did not contain correct amount of values, ignoring point.");
            return;
        }
        let Some(values) = fields.iter().map(|f| parse_double(f)).collect::<Option<Vec<f64>>>() else {
            cx.warn("Data point format error, ignoring point.");
            return;
        };
        if let Err(mismatch) = self.branch.add_point(&values) {
            cx.warn(format!(
                "Data point has {} values instead of {}, ignoring point.",
                mismatch.actual, mismatch.expected
            ));
        }
    }

    fn add_event(&mut self, cx: &mut LoadContext<'_>, attrs: &Attributes) {
        let time = attrs.get("time").and_then(parse_double);
        let kind = attrs.get("type").and_then(FlightEventType::from_xml);
        let (Some(time), Some(kind)) = (time, kind) else {
            cx.warn("Illegal event specification, ignoring.");
            return;
        };

        let source = attrs.get("source").and_then(|id| {
            let found = cx.doc.rocket.find_by_id(id);
            if found.is_none() {
                cx.warn(format!("Event source component '{id}' not found, ignoring source."));
            }
            found.map(|index| cx.component(index).id.clone())
        });

        let abort_cause = attrs.get("cause").and_then(|cause| {
            let parsed = AbortCause::from_xml(cause);
            if parsed.is_none() {
                cx.warn(format!("Unknown abort cause '{cause}', ignoring."));
            }
            parsed
        });

        self.branch.add_event(FlightEvent {
            kind,
            time,
            source,
            abort_cause,
            warning_id: attrs.get("warnid").map(str::to_string),
        });
    }
}

impl ElementHandler for BranchHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "datapoint" | "event" => Open::PlainText,
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
        match element {
            "datapoint" => self.add_row(cx, content),
            "event" => {
                warn_unexpected_text(cx, element, content);
                self.add_event(cx, attrs);
            }
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::Branch(self.branch))
    }
}

/// A structured simulation warning.
struct WarningHandler {
    type_name: String,
    priority: Option<Priority>,
    id: Option<Uuid>,
    description: String,
    parameter: Option<f64>,
    sources: Vec<ComponentId>,
}

impl WarningHandler {
    fn new(attrs: &Attributes) -> Self {
        Self {
            type_name: attrs.get("type").unwrap_or_default().to_string(),
            priority: attrs.get("priority").and_then(Priority::from_xml),
            id: None,
            description: String::new(),
            parameter: None,
            sources: Vec::new(),
        }
    }
}

impl ElementHandler for WarningHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "id" | "description" | "parameter" | "source" | "priority" => Open::PlainText,
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
            "id" => self.id = Uuid::parse_str(content).ok(),
            "description" => self.description = content.to_string(),
            "parameter" => self.parameter = parse_double(content),
            "source" if !content.is_empty() => self.sources.push(ComponentId::from(content)),
            "priority" => self.priority = Priority::from_xml(content).or(self.priority),
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let kind = WarningKind::from_type_name(&self.type_name, &self.description);
        let mut warning = Warning::new(kind)
            .with_sources(self.sources)
            .with_priority(self.priority.unwrap_or_default());
        if let Some(parameter) = self.parameter {
            warning = warning.with_parameter(parameter);
        }
        if let Some(id) = self.id {
            warning.id = id;
        }
        Ok(Built::Warning(warning))
    }
}
