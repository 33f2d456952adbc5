use std::fmt;

use uuid::Uuid;

use super::{ComponentId, Priority};

/// What a warning is about.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// Free-form text, used for most load problems.
    Other(String),
    /// A value in the design file could not be interpreted.
    FileInvalidParameter,
    /// The rocket flew at a large angle of attack; the parameter is the angle.
    LargeAngleOfAttack,
    /// A recovery device deployed at high speed; the parameter is the speed.
    HighSpeedDeployment,
    NoRecoveryDevice,
    /// A recovery device deployed while still on the launch rod.
    RecoveryLaunchRod,
    /// An event occurred after the rocket had landed.
    EventAfterLanding,
    /// A stage separated while its motor was still burning.
    SeparationDuringThrust,
    /// A simulation warning of a type this library does not know.
    Simulation { type_name: String, description: String },
}

impl WarningKind {
    /// Map the `type` attribute of a stored simulation warning.
    pub fn from_type_name(type_name: &str, description: &str) -> Self {
        match type_name {
            "Other" => Self::Other(description.to_string()),
            "LargeAOA" => Self::LargeAngleOfAttack,
            "HighSpeedDeployment" => Self::HighSpeedDeployment,
            "NoRecoveryDevice" => Self::NoRecoveryDevice,
            "RecoveryLaunchRod" => Self::RecoveryLaunchRod,
            "EventAfterLanding" => Self::EventAfterLanding,
            "SeparationDuringThrust" => Self::SeparationDuringThrust,
            "FileInvalidParameter" => Self::FileInvalidParameter,
            _ => Self::Simulation {
                type_name: type_name.to_string(),
                description: description.to_string(),
            },
        }
    }
}

/// A non-fatal, structured record of a recoverable problem.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub parameter: Option<f64>,
    pub sources: Vec<ComponentId>,
    pub id: Uuid,
    pub priority: Priority,
}

impl Warning {
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            parameter: None,
            sources: Vec::new(),
            id: Uuid::new_v4(),
            priority: Priority::default(),
        }
    }

    /// A free-text warning.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(WarningKind::Other(text.into()))
    }

    pub fn invalid_parameter() -> Self {
        Self::new(WarningKind::FileInvalidParameter)
    }

    pub fn with_parameter(mut self, parameter: f64) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn with_sources(mut self, sources: Vec<ComponentId>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    fn same_as(&self, other: &Warning) -> bool {
        let same_parameter = match (self.parameter, other.parameter) {
            (Some(a), Some(b)) => a == b || (a.is_nan() && b.is_nan()),
            (None, None) => true,
            _ => false,
        };
        self.kind == other.kind && same_parameter && self.sources == other.sources
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::Other(text) => f.write_str(text)?,
            WarningKind::FileInvalidParameter => {
                f.write_str("Invalid parameter encountered, ignoring.")?
            }
            WarningKind::LargeAngleOfAttack => f.write_str("Large angle of attack encountered")?,
            WarningKind::HighSpeedDeployment => {
                f.write_str("Recovery device deployment at high speed")?
            }
            WarningKind::NoRecoveryDevice => {
                f.write_str("No recovery device for simulation")?
            }
            WarningKind::RecoveryLaunchRod => {
                f.write_str("Recovery device deployed while on the launch guide")?
            }
            WarningKind::EventAfterLanding => f.write_str("Flight event occurred after landing")?,
            WarningKind::SeparationDuringThrust => {
                f.write_str("Stage separation occurred before burnout")?
            }
            WarningKind::Simulation {
                type_name,
                description,
            } => {
                if description.is_empty() {
                    f.write_str(type_name)?
                } else {
                    f.write_str(description)?
                }
            }
        }
        if let Some(parameter) = self.parameter
            && !parameter.is_nan()
        {
            write!(f, " ({parameter})")?;
        }
        Ok(())
    }
}

/// Ordered collection of warnings without duplicates.
///
/// Two warnings are duplicates when kind, parameter and sources agree; the
/// first one added is kept.
#[derive(Debug, Clone, Default)]
pub struct WarningSet {
    warnings: Vec<Warning>,
}

impl WarningSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an equivalent warning was already present.
    pub fn add(&mut self, warning: Warning) -> bool {
        if self.warnings.iter().any(|w| w.same_as(&warning)) {
            return false;
        }
        log::debug!("warning: {warning}");
        self.warnings.push(warning);
        true
    }

    /// Add a warning read from stored simulation results.
    ///
    /// Stored warnings are only duplicates when their ids agree too, so that
    /// events referring to a warning id still find it.
    pub fn add_stored(&mut self, warning: Warning) -> bool {
        if self
            .warnings
            .iter()
            .any(|w| w.id == warning.id && w.same_as(&warning))
        {
            return false;
        }
        self.warnings.push(warning);
        true
    }

    /// The warning with the given id.
    pub fn get(&self, id: &Uuid) -> Option<&Warning> {
        self.warnings.iter().find(|w| &w.id == id)
    }

    pub fn add_str(&mut self, text: impl Into<String>) -> bool {
        self.add(Warning::message(text))
    }

    pub fn extend(&mut self, other: WarningSet) {
        for warning in other.warnings {
            self.add(warning);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Whether any warning's message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.to_string().contains(needle))
    }
}

impl<'a> IntoIterator for &'a WarningSet {
    type Item = &'a Warning;
    type IntoIter = std::slice::Iter<'a, Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_dropped() {
        let mut set = WarningSet::new();
        assert!(set.add_str("Unknown element foo, ignoring."));
        assert!(!set.add_str("Unknown element foo, ignoring."));
        assert!(set.add_str("Unknown element bar, ignoring."));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn parameter_distinguishes_warnings() {
        let mut set = WarningSet::new();
        set.add(Warning::new(WarningKind::LargeAngleOfAttack).with_parameter(0.3));
        set.add(Warning::new(WarningKind::LargeAngleOfAttack).with_parameter(0.3));
        set.add(Warning::new(WarningKind::LargeAngleOfAttack).with_parameter(0.4));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn stored_warnings_with_distinct_ids_are_kept() {
        let mut set = WarningSet::new();
        let first = Warning::new(WarningKind::LargeAngleOfAttack).with_parameter(0.3);
        let second = Warning::new(WarningKind::LargeAngleOfAttack).with_parameter(0.3);
        let second_id = second.id;
        assert!(set.add_stored(first.clone()));
        assert!(set.add_stored(second));
        assert!(!set.add_stored(first));
        assert_eq!(set.len(), 2);
        assert!(set.get(&second_id).is_some());
    }

    #[test]
    fn unknown_type_keeps_description() {
        let kind = WarningKind::from_type_name("MotorIgnitionFailure", "Motor failed to ignite");
        let warning = Warning::new(kind);
        assert_eq!(warning.to_string(), "Motor failed to ignite");
    }
}
