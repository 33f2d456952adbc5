use crate::digest::{content_digest, digest_number};

use super::{MotorType, Warning, WarningSet, XmlEnum};

/// Ejection delay of a motor without an ejection charge.
pub const PLUGGED_DELAY: f64 = f64::INFINITY;

/// A motor from the motor database.
#[derive(Debug, Clone, PartialEq)]
pub struct Motor {
    pub kind: MotorType,
    pub manufacturer: String,
    pub designation: String,
    pub diameter: f64,
    pub length: f64,
    /// Standard ejection delays offered by the manufacturer.
    pub delays: Vec<f64>,
    digest: String,
}

impl Motor {
    pub fn new(
        kind: MotorType,
        manufacturer: impl Into<String>,
        designation: impl Into<String>,
        diameter: f64,
        length: f64,
        delays: Vec<f64>,
    ) -> Self {
        let manufacturer = manufacturer.into();
        let designation = designation.into();
        let digest = content_digest([
            kind.name().to_string(),
            manufacturer.clone(),
            designation.clone(),
            digest_number(diameter),
            digest_number(length),
        ]);
        Self {
            kind,
            manufacturer,
            designation,
            diameter,
            length,
            delays,
            digest,
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// What a design file says about a motor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotorSpec {
    pub kind: Option<MotorType>,
    pub manufacturer: Option<String>,
    pub designation: Option<String>,
    pub digest: Option<String>,
    pub diameter: Option<f64>,
    pub length: Option<f64>,
}

/// Finds the database motor described by a design file.
pub trait MotorFinder {
    /// Problems such as ambiguous or missing matches are reported as warnings.
    fn find_motor(&self, spec: &MotorSpec, warnings: &mut WarningSet) -> Option<Motor>;
}

/// In-memory motor database.
#[derive(Debug, Clone, Default)]
pub struct MotorDatabase {
    motors: Vec<Motor>,
}

impl MotorDatabase {
    pub fn new(motors: Vec<Motor>) -> Self {
        Self { motors }
    }

    pub fn push(&mut self, motor: Motor) {
        self.motors.push(motor);
    }

    pub fn motors(&self) -> &[Motor] {
        &self.motors
    }
}

// Dimensions in files are rounded; 1 mm is enough to tell motor classes apart.
const DIMENSION_TOLERANCE: f64 = 0.001;

fn close_enough(wanted: Option<f64>, actual: f64) -> bool {
    wanted.is_none_or(|w| (w - actual).abs() <= DIMENSION_TOLERANCE)
}

impl MotorFinder for MotorDatabase {
    fn find_motor(&self, spec: &MotorSpec, warnings: &mut WarningSet) -> Option<Motor> {
        let Some(designation) = spec.designation.as_deref() else {
            warnings.add(Warning::message("No motor specified, ignoring."));
            return None;
        };

        if let Some(digest) = spec.digest.as_deref()
            && let Some(found) = self.motors.iter().find(|m| m.digest() == digest)
        {
            return Some(found.clone());
        }

        let candidates: Vec<&Motor> = self
            .motors
            .iter()
            .filter(|m| m.designation.eq_ignore_ascii_case(designation))
            .filter(|m| {
                spec.manufacturer
                    .as_deref()
                    .is_none_or(|mfr| m.manufacturer.eq_ignore_ascii_case(mfr))
            })
            .filter(|m| spec.kind.is_none_or(|k| k == MotorType::Unknown || k == m.kind))
            .filter(|m| close_enough(spec.diameter, m.diameter) && close_enough(spec.length, m.length))
            .collect();

        match candidates.as_slice() {
            [] => {
                let manufacturer = spec.manufacturer.as_deref().unwrap_or("unknown");
                warnings.add(Warning::message(format!(
                    "No motor with designation '{designation}' for manufacturer '{manufacturer}' found."
                )));
                None
            }
            [only] => {
                if spec.digest.is_some() {
                    warnings.add(Warning::message(format!(
                        "Motor '{designation}' has changed since the design was saved; the current motor data is used."
                    )));
                }
                Some((*only).clone())
            }
            [first, ..] => {
                warnings.add(Warning::message(format!(
                    "Multiple motors with designation '{designation}' found, one chosen arbitrarily."
                )));
                Some((*first).clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> MotorDatabase {
        MotorDatabase::new(vec![
            Motor::new(MotorType::Single, "Estes", "C6", 0.018, 0.070, vec![0.0, 3.0, 5.0, 7.0]),
            Motor::new(MotorType::Reload, "AeroTech", "H128W", 0.029, 0.194, vec![6.0, 10.0, 14.0]),
        ])
    }

    #[test]
    fn digest_match_wins() {
        let db = db();
        let mut warnings = WarningSet::new();
        let spec = MotorSpec {
            designation: Some("whatever".into()),
            digest: Some(db.motors()[1].digest().to_string()),
            ..Default::default()
        };
        let motor = db.find_motor(&spec, &mut warnings).unwrap();
        assert_eq!(motor.designation, "H128W");
        assert!(warnings.is_empty());
    }

    #[test]
    fn designation_match() {
        let mut warnings = WarningSet::new();
        let spec = MotorSpec {
            manufacturer: Some("estes".into()),
            designation: Some("c6".into()),
            diameter: Some(0.018),
            ..Default::default()
        };
        let motor = db().find_motor(&spec, &mut warnings).unwrap();
        assert_eq!(motor.manufacturer, "Estes");
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_motor_warns() {
        let mut warnings = WarningSet::new();
        let spec = MotorSpec {
            designation: Some("Z9000".into()),
            ..Default::default()
        };
        assert!(db().find_motor(&spec, &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
    }
}
