//! Motor mounts and the motors loaded into them.
//!
//! ```xml
//! <motormount>
//!   <ignitionevent>automatic</ignitionevent>
//!   <motor configid="a1">
//!     <manufacturer>Estes</manufacturer><designation>C6</designation>
//!     <delay>5</delay>
//!   </motor>
//!   <ignitionconfiguration configid="a1"><ignitiondelay>1.5</ignitiondelay></ignitionconfiguration>
//! </motormount>
//! ```

use std::collections::BTreeSet;

use crate::Result;
use crate::parse::handler::{Built, ElementHandler, Open, unknown_element, warn_unexpected_text};
use crate::parse::values::parse_double;
use crate::parse::{Attributes, LoadContext};
use crate::types::{
    ComponentIndex, FlightConfigurationId, IgnitionEvent, Motor, MotorMount, MotorSpec, MotorType,
    PLUGGED_DELAY, XmlEnum,
};

use super::number;
use super::root::FIRST_VERSION_WITH_MOTOR_DIGEST;

/// A resolved `<motor>` element.
pub(crate) struct MotorElement {
    pub motor: Option<Motor>,
    pub delay: f64,
}

/// Ignition fields of one `<ignitionconfiguration>`; absent fields keep
/// the values already registered.
#[derive(Default)]
pub(crate) struct IgnitionOverlay {
    pub event: Option<IgnitionEvent>,
    pub delay: Option<f64>,
}

fn ignition_event(cx: &mut LoadContext<'_>, content: &str) -> Option<IgnitionEvent> {
    let event = IgnitionEvent::from_xml(content);
    if event.is_none() {
        cx.warn(format!("Unknown ignition event type '{content}', ignoring."));
    }
    event
}

pub(crate) struct MotorMountHandler {
    index: ComponentIndex,
    /// Configurations with their own ignition settings.
    explicit_ignition: BTreeSet<FlightConfigurationId>,
}

impl MotorMountHandler {
    pub fn new(index: ComponentIndex) -> Self {
        Self {
            index,
            explicit_ignition: BTreeSet::new(),
        }
    }

    fn mount<'c>(&self, cx: &'c mut LoadContext<'_>) -> Option<&'c mut MotorMount> {
        cx.component_mut(self.index).motor_mount_mut()
    }

    fn add_motor(&mut self, cx: &mut LoadContext<'_>, attrs: &Attributes, element: MotorElement) {
        let id = FlightConfigurationId::parse(attrs.get("configid"));
        if !id.is_valid() {
            cx.warn("Illegal motor specification, ignoring.");
            return;
        }
        let Some(mount) = self.mount(cx) else {
            return;
        };
        let mut config = mount.motors.derive_default();
        config.motor = element.motor;
        config.ejection_delay = element.delay;
        mount.motors.set(id.clone(), config);
        cx.doc.rocket.configurations_mut().ensure(&id);
    }

    fn overlay_ignition(&mut self, cx: &mut LoadContext<'_>, attrs: &Attributes, overlay: IgnitionOverlay) {
        let id = FlightConfigurationId::parse(attrs.get("configid"));
        let found = self
            .mount(cx)
            .and_then(|mount| mount.motors.get_override_mut(&id))
            .map(|config| {
                if let Some(event) = overlay.event {
                    config.ignition_event = event;
                }
                if let Some(delay) = overlay.delay {
                    config.ignition_delay = delay;
                }
            });
        match found {
            Some(()) => {
                self.explicit_ignition.insert(id);
            }
            None => cx.warn(format!(
                "Ignition configuration for unknown motor configuration '{id}', ignoring."
            )),
        }
    }
}

impl ElementHandler for MotorMountHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "motor" => Open::Delegate(Box::<MotorHandler>::default()),
            "ignitionconfiguration" => Open::Delegate(Box::<IgnitionConfigurationHandler>::default()),
            "ignitionevent" | "ignitiondelay" | "overhang" => Open::PlainText,
            _ => unknown_element(cx, element),
        }
    }

    fn close_element(
        &mut self,
        cx: &mut LoadContext<'_>,
        element: &str,
        attrs: &Attributes,
        content: &str,
        built: Built,
    ) -> Result<()> {
        match (element, built) {
            ("motor", Built::Motor(motor)) => self.add_motor(cx, attrs, motor),
            ("ignitionconfiguration", Built::Ignition(overlay)) => {
                self.overlay_ignition(cx, attrs, overlay)
            }
            ("ignitionevent", _) => {
                if let Some(event) = ignition_event(cx, content)
                    && let Some(mount) = self.mount(cx)
                {
                    mount.motors.default_value_mut().ignition_event = event;
                }
            }
            ("ignitiondelay", _) => match parse_double(content) {
                Some(delay) => {
                    if let Some(mount) = self.mount(cx) {
                        mount.motors.default_value_mut().ignition_delay = delay;
                    }
                }
                None => cx.warn("Illegal ignition delay specified, ignoring."),
            },
            ("overhang", _) => match parse_double(content) {
                Some(overhang) => {
                    if let Some(mount) = self.mount(cx) {
                        mount.overhang = overhang;
                    }
                }
                None => cx.warn("Illegal overhang specified, ignoring."),
            },
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let Some(mount) = self.mount(cx) else {
            return Ok(Built::Nothing);
        };
        // Mount-level ignition may follow the motors it applies to.
        let default = mount.motors.derive_default();
        let inherit: Vec<FlightConfigurationId> = mount
            .motors
            .ids()
            .filter(|id| !self.explicit_ignition.contains(*id))
            .cloned()
            .collect();
        for id in &inherit {
            if let Some(config) = mount.motors.get_override_mut(id) {
                config.ignition_event = default.ignition_event;
                config.ignition_delay = default.ignition_delay;
            }
        }
        mount.active = true;
        Ok(Built::Nothing)
    }
}

/// One `<motor>`: the description used to look the motor up.
#[derive(Default)]
struct MotorHandler {
    spec: MotorSpec,
    delay: Option<f64>,
}

impl ElementHandler for MotorHandler {
    fn open_element(&mut self, _cx: &mut LoadContext<'_>, _element: &str, _attrs: &Attributes) -> Open {
        Open::PlainText
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
            "type" => {
                // Files before reloadable motors were supported say "disposable".
                self.spec.kind = if content.eq_ignore_ascii_case("disposable") {
                    Some(MotorType::Single)
                } else {
                    MotorType::from_xml(content)
                };
                if self.spec.kind.is_none() {
                    cx.warn(format!("Unknown motor type '{content}', ignoring."));
                }
            }
            "manufacturer" => self.spec.manufacturer = Some(content.to_string()),
            "designation" => self.spec.designation = Some(content.to_string()),
            "digest" => {
                if cx.file_version >= FIRST_VERSION_WITH_MOTOR_DIGEST {
                    self.spec.digest = Some(content.to_string());
                }
            }
            "diameter" => {
                self.spec.diameter = parse_double(content).filter(|d| !d.is_nan());
                if self.spec.diameter.is_none() {
                    cx.warn("Illegal motor diameter specified, ignoring.");
                }
            }
            "length" => {
                self.spec.length = parse_double(content).filter(|l| !l.is_nan());
                if self.spec.length.is_none() {
                    cx.warn("Illegal motor length specified, ignoring.");
                }
            }
            "delay" => {
                self.delay = if content == "none" {
                    Some(PLUGGED_DELAY)
                } else {
                    parse_double(content).filter(|d| !d.is_nan())
                };
                if self.delay.is_none() {
                    cx.warn("Illegal motor delay specified, ignoring.");
                }
            }
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        let env = cx.env;
        let motor = env.motors.find_motor(&self.spec, &mut cx.warnings);
        let delay = match self.delay {
            Some(delay) => delay,
            None => {
                cx.warn("Motor delay not specified, assuming no ejection charge.");
                PLUGGED_DELAY
            }
        };
        log::trace!(
            "motor {:?}: {}",
            self.spec.designation,
            if motor.is_some() { "found" } else { "not found" }
        );
        Ok(Built::Motor(MotorElement { motor, delay }))
    }
}

#[derive(Default)]
struct IgnitionConfigurationHandler {
    overlay: IgnitionOverlay,
}

impl ElementHandler for IgnitionConfigurationHandler {
    fn open_element(&mut self, cx: &mut LoadContext<'_>, element: &str, _attrs: &Attributes) -> Open {
        match element {
            "ignitionevent" | "ignitiondelay" => Open::PlainText,
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
            "ignitionevent" => self.overlay.event = ignition_event(cx, content),
            "ignitiondelay" => self.overlay.delay = number(cx, content),
            _ => warn_unexpected_text(cx, element, content),
        }
        Ok(())
    }

    fn end_handler(self: Box<Self>, _cx: &mut LoadContext<'_>, _attrs: &Attributes, _content: &str) -> Result<Built> {
        Ok(Built::Ignition(self.overlay))
    }
}
