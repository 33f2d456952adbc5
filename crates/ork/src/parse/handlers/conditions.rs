//! Launch conditions of a simulation.

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::values::parse_double;
use crate::parse::{Attributes, LoadContext};
use crate::types::{
    AltitudeReference, AtmosphereModel, FlightConfigurationId, GeodeticMethod, SimulationOptions,
    WindLevel, WindModelType, WindSettings, XmlEnum,
};
use crate::units::to_radians;

/// A number for the named condition; NaN counts as missing.
fn condition(cx: &mut LoadContext<'_>, content: &str, what: &str) -> Option<f64> {
    let value = parse_double(content).filter(|v| !v.is_nan());
    if value.is_none() {
        cx.warn(format!("Illegal {what} defined, ignoring."));
    }
    value
}

/// `<conditions>`.
#[derive(Default)]
pub(crate) struct ConditionsHandler {
    options: SimulationOptions,
}

impl ElementHandler for ConditionsHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, attrs: &Attributes) -> Open {
        match element {
            "atmosphere" => Open::Delegate(Box::new(AtmosphereHandler::new(attrs.get("model")))),
            "wind" => match WindHandler::new(attrs, self.options.wind.clone()) {
                Some(handler) => Open::Delegate(Box::new(handler)),
                None => {
                    let model = attrs.get("model").unwrap_or_default();
                    cx.warn(format!("Unknown wind model '{model}', ignoring."));
                    Open::Skip
                }
            },
            "configid" | "launchrodlength" | "launchrodangle" | "launchroddirection"
            | "windaverage" | "windturbulence" | "winddirection" | "windmodeltype"
            | "launchaltitude" | "launchlatitude" | "launchlongitude" | "geodeticmethod"
            | "timestep" | "maxtime" => Open::PlainText,
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
        let options = &mut self.options;
        match (element, built) {
            ("atmosphere", Built::Atmosphere(atmosphere)) => options.atmosphere = atmosphere,
            ("wind", Built::Wind(wind)) => options.wind = wind,
            ("configid", _) => {
                options.configuration_id = (!content.is_empty())
                    .then(|| FlightConfigurationId::parse(Some(content)));
            }
            ("launchrodlength", _) => {
                if let Some(v) = condition(cx, content, "launch rod length") {
                    options.launch.rod_length = v;
                }
            }
            ("launchrodangle", _) => {
                if let Some(v) = condition(cx, content, "launch rod angle") {
                    options.launch.rod_angle = to_radians(v);
                }
            }
            ("launchroddirection", _) => {
                if let Some(v) = condition(cx, content, "launch rod direction") {
                    options.launch.rod_direction = to_radians(v);
                }
            }
            // Flat wind fields from before the wind models existed.
            ("windaverage", _) => {
                if let Some(v) = condition(cx, content, "average windspeed") {
                    options.wind.average.speed = v;
                }
            }
            ("windturbulence", _) => {
                if let Some(v) = condition(cx, content, "wind turbulence intensity") {
                    options.wind.average.turbulence_intensity = v;
                }
            }
            ("winddirection", _) => {
                if let Some(v) = condition(cx, content, "wind direction") {
                    options.wind.average.direction = v;
                }
            }
            ("windmodeltype", _) => match WindModelType::from_xml(content) {
                Some(model) => options.wind.model = model,
                None => cx.warn(format!("Unknown wind model type '{content}', ignoring.")),
            },
            ("launchaltitude", _) => {
                if let Some(v) = condition(cx, content, "launch altitude") {
                    options.launch.altitude = v;
                }
            }
            ("launchlatitude", _) => {
                if let Some(v) = condition(cx, content, "launch latitude") {
                    options.launch.latitude = v;
                }
            }
            ("launchlongitude", _) => {
                if let Some(v) = condition(cx, content, "launch longitude") {
                    options.launch.longitude = v;
                }
            }
            ("geodeticmethod", _) => match GeodeticMethod::from_xml(content) {
                Some(method) => options.launch.geodetic_method = method,
                None => cx.warn(format!(
                    "Unknown geodetic computation method '{content}', ignoring."
                )),
            },
            ("timestep", _) => {
                if let Some(v) = condition(cx, content, "time step") {
                    options.time_step = v;
                }
            }
            ("maxtime", _) => {
                if let Some(v) = condition(cx, content, "maximum simulation time") {
                    options.max_time = v;
                }
            }
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::Conditions(Box::new(self.options)))
    }
}

/// `<atmosphere model="isa|extendedisa">`.
struct AtmosphereHandler {
    model: Option<String>,
    temperature: Option<f64>,
    pressure: Option<f64>,
}

impl AtmosphereHandler {
    fn new(model: Option<&str>) -> Self {
        Self {
            model: model.map(str::to_string),
            temperature: None,
            pressure: None,
        }
    }
}

impl ElementHandler for AtmosphereHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "basetemperature" | "basepressure" => Open::PlainText,
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
            "basetemperature" => self.temperature = condition(cx, content, "base temperature"),
            "basepressure" => self.pressure = condition(cx, content, "base pressure"),
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let atmosphere = match self.model.as_deref() {
            Some("isa") => AtmosphereModel::Isa,
            Some("extendedisa") => AtmosphereModel::ExtendedIsa {
                base_temperature: self
                    .temperature
                    .unwrap_or(AtmosphereModel::STANDARD_TEMPERATURE),
                base_pressure: self.pressure.unwrap_or(AtmosphereModel::STANDARD_PRESSURE),
            },
            _ => {
                cx.warn("Unknown atmospheric model, using ISA.");
                AtmosphereModel::Isa
            }
        };
        Ok(Built::Atmosphere(atmosphere))
    }
}

/// `<wind model="average|multilevel">`; updates one of the two models of
/// the settings read so far.
struct WindHandler {
    model: WindModelType,
    wind: WindSettings,
    standard_deviation: Option<f64>,
}

impl WindHandler {
    fn new(attrs: &Attributes, wind: WindSettings) -> Option<Self> {
        let model = match attrs.get("model")? {
            "average" => WindModelType::Average,
            "multilevel" => WindModelType::Multilevel,
            _ => return None,
        };
        let mut handler = Self {
            model,
            wind,
            standard_deviation: None,
        };
        if model == WindModelType::Multilevel
            && let Some(reference) = attrs.get("altituderef").and_then(AltitudeReference::from_xml)
        {
            handler.wind.multilevel.altitude_reference = reference;
        }
        Some(handler)
    }

    fn level(&mut self, cx: &mut LoadContext<'_>, attrs: &Attributes) {
        let field = |name: &str| attrs.get(name).and_then(parse_double).filter(|v| !v.is_nan());
        match (field("altitude"), field("speed"), field("direction")) {
            (Some(altitude), Some(speed), Some(direction)) => {
                self.wind.multilevel.add_level(WindLevel {
                    altitude,
                    speed,
                    direction,
                    standard_deviation: field("standarddeviation").unwrap_or(0.0),
                })
            }
            _ => cx.warn("Illegal wind level specification, ignoring."),
        }
    }
}

impl ElementHandler for WindHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match (self.model, element) {
            (WindModelType::Average, "speed" | "direction" | "standarddeviation") => Open::PlainText,
            (WindModelType::Multilevel, "windlevel") => Open::PlainText,
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
            "speed" => {
                if let Some(v) = condition(cx, content, "wind speed") {
                    self.wind.average.speed = v;
                }
            }
            "direction" => {
                if let Some(v) = condition(cx, content, "wind direction") {
                    self.wind.average.direction = v;
                }
            }
            "standarddeviation" => {
                self.standard_deviation = condition(cx, content, "wind standard deviation")
            }
            "windlevel" => {
                warn_unexpected_text(cx, element, content);
                self.level(cx, attrs);
            }
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(mut self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        // Relative to the final speed, whatever the element order.
        if let Some(deviation) = self.standard_deviation {
            self.wind.average.set_standard_deviation(deviation);
        }
        Ok(Built::Wind(self.wind))
    }
}
