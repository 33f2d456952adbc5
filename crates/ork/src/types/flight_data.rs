use once_cell::sync::Lazy;

use super::{AbortCause, ComponentId, FlightEventType, WarningSet};

/// A named, unit-typed column of simulation output.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightDataType {
    pub name: String,
    pub symbol: String,
    /// SI unit label; empty for dimensionless values.
    pub unit: String,
    /// One of the standard simulation outputs.
    pub builtin: bool,
}

impl FlightDataType {
    pub const TIME: &'static str = "Time";
    pub const ALTITUDE: &'static str = "Altitude";
    pub const TOTAL_VELOCITY: &'static str = "Total velocity";
    pub const TOTAL_ACCELERATION: &'static str = "Total acceleration";
    pub const MACH_NUMBER: &'static str = "Mach number";

    /// Look up a standard type by name, ignoring case.
    pub fn builtin(name: &str) -> Option<FlightDataType> {
        BUILTIN_TYPES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
    }

    pub fn custom(name: impl Into<String>, symbol: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            unit: unit.into(),
            builtin: false,
        }
    }

    /// A type nothing is known about besides its name.
    pub fn unknown(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            symbol: name.clone(),
            name,
            unit: String::new(),
            builtin: false,
        }
    }
}

static BUILTIN_TYPES: Lazy<Vec<FlightDataType>> = Lazy::new(|| {
    [
        ("Time", "t", "s"),
        ("Altitude", "h", "m"),
        ("Vertical velocity", "Vz", "m/s"),
        ("Vertical acceleration", "Az", "m/s²"),
        ("Total velocity", "Vt", "m/s"),
        ("Total acceleration", "At", "m/s²"),
        ("Position East of launch", "Px", "m"),
        ("Position North of launch", "Py", "m"),
        ("Lateral distance", "Pl", "m"),
        ("Lateral direction", "θl", "rad"),
        ("Lateral velocity", "Vl", "m/s"),
        ("Lateral acceleration", "Al", "m/s²"),
        ("Latitude", "φ", "rad"),
        ("Longitude", "λ", "rad"),
        ("Gravitational acceleration", "g", "m/s²"),
        ("Angle of attack", "α", "rad"),
        ("Roll rate", "dΦ", "rad/s"),
        ("Pitch rate", "dθ", "rad/s"),
        ("Yaw rate", "dΨ", "rad/s"),
        ("Mass", "m", "kg"),
        ("Motor mass", "mp", "kg"),
        ("Longitudinal moment of inertia", "Il", "kg·m²"),
        ("Rotational moment of inertia", "Ir", "kg·m²"),
        ("CP location", "Cp", "m"),
        ("CG location", "Cg", "m"),
        ("Stability margin calibers", "S", ""),
        ("Mach number", "M", ""),
        ("Reynolds number", "R", ""),
        ("Thrust", "Ft", "N"),
        ("Drag force", "Fd", "N"),
        ("Drag coefficient", "Cd", ""),
        ("Axial drag coefficient", "Cda", ""),
        ("Friction drag coefficient", "Cdf", ""),
        ("Pressure drag coefficient", "Cdp", ""),
        ("Base drag coefficient", "Cdb", ""),
        ("Normal force coefficient", "Cn", ""),
        ("Pitch moment coefficient", "Cm", ""),
        ("Yaw moment coefficient", "Cyaw", ""),
        ("Roll moment coefficient", "Cl", ""),
        ("Wind velocity", "Vw", "m/s"),
        ("Air temperature", "T", "K"),
        ("Air pressure", "P", "Pa"),
        ("Speed of sound", "Vs", "m/s"),
        ("Simulation time step", "dt", "s"),
        ("Computation time", "tc", "s"),
    ]
    .into_iter()
    .map(|(name, symbol, unit)| FlightDataType {
        name: name.to_string(),
        symbol: symbol.to_string(),
        unit: unit.to_string(),
        builtin: true,
    })
    .collect()
});

/// A discrete, time-stamped simulation event.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightEvent {
    pub kind: FlightEventType,
    pub time: f64,
    pub source: Option<ComponentId>,
    /// Set on abort events.
    pub abort_cause: Option<AbortCause>,
    /// Id of the simulation warning this event reports.
    pub warning_id: Option<String>,
}

/// Error returned when a row does not match the branch's column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWidthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// One named sequence of sampled simulation values.
///
/// The set of columns is fixed at construction; every row has exactly one
/// value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightDataBranch {
    name: String,
    types: Vec<FlightDataType>,
    columns: Vec<Vec<f64>>,
    events: Vec<FlightEvent>,
    pub optimum_altitude: f64,
    pub time_to_optimum_altitude: f64,
}

impl FlightDataBranch {
    pub fn new(name: impl Into<String>, types: Vec<FlightDataType>) -> Self {
        let columns = vec![Vec::new(); types.len()];
        Self {
            name: name.into(),
            types,
            columns,
            events: Vec::new(),
            optimum_altitude: f64::NAN,
            time_to_optimum_altitude: f64::NAN,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[FlightDataType] {
        &self.types
    }

    pub fn add_point(&mut self, values: &[f64]) -> Result<(), RowWidthMismatch> {
        if values.len() != self.types.len() {
            return Err(RowWidthMismatch {
                expected: self.types.len(),
                actual: values.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(*value);
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column of the type named `name`.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn add_event(&mut self, event: FlightEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[FlightEvent] {
        &self.events
    }

    fn max_of(&self, name: &str) -> Option<(usize, f64)> {
        self.get(name)?
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
    }
}

/// Key figures of a simulated flight. Unknown values are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightDataSummary {
    pub max_altitude: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub max_mach: f64,
    pub time_to_apogee: f64,
    pub flight_time: f64,
    pub ground_hit_velocity: f64,
    pub launch_rod_velocity: f64,
    pub deployment_velocity: f64,
    pub optimum_delay: f64,
}

impl Default for FlightDataSummary {
    fn default() -> Self {
        Self {
            max_altitude: f64::NAN,
            max_velocity: f64::NAN,
            max_acceleration: f64::NAN,
            max_mach: f64::NAN,
            time_to_apogee: f64::NAN,
            flight_time: f64::NAN,
            ground_hit_velocity: f64::NAN,
            launch_rod_velocity: f64::NAN,
            deployment_velocity: f64::NAN,
            optimum_delay: f64::NAN,
        }
    }
}

impl FlightDataSummary {
    fn from_branch(branch: &FlightDataBranch) -> Self {
        let mut summary = Self::default();
        let time = branch.get(FlightDataType::TIME);
        let value = |found: Option<(usize, f64)>| found.map_or(f64::NAN, |(_, v)| v);

        summary.max_altitude = value(branch.max_of(FlightDataType::ALTITUDE));
        summary.max_velocity = value(branch.max_of(FlightDataType::TOTAL_VELOCITY));
        summary.max_acceleration = value(branch.max_of(FlightDataType::TOTAL_ACCELERATION));
        summary.max_mach = value(branch.max_of(FlightDataType::MACH_NUMBER));
        if let (Some((i, _)), Some(time)) = (branch.max_of(FlightDataType::ALTITUDE), time) {
            summary.time_to_apogee = time[i];
        }
        if let Some(&last) = time.and_then(<[f64]>::last) {
            summary.flight_time = last;
        }
        if let Some(&last) = branch
            .get(FlightDataType::TOTAL_VELOCITY)
            .and_then(<[f64]>::last)
        {
            summary.ground_hit_velocity = last;
        }
        summary
    }
}

/// Results of one simulation run. Immutable once built.
#[derive(Debug, Clone)]
pub struct FlightData {
    branches: Vec<FlightDataBranch>,
    summary: FlightDataSummary,
    warnings: WarningSet,
}

impl FlightData {
    /// Results with sampled data; the summary is computed from the first
    /// branch.
    pub fn from_branches(branches: Vec<FlightDataBranch>, warnings: WarningSet) -> Self {
        let summary = branches
            .first()
            .map(FlightDataSummary::from_branch)
            .unwrap_or_default();
        Self {
            branches,
            summary,
            warnings,
        }
    }

    /// Results consisting only of stored key figures.
    pub fn from_summary(summary: FlightDataSummary, warnings: WarningSet) -> Self {
        Self {
            branches: Vec::new(),
            summary,
            warnings,
        }
    }

    pub fn branches(&self) -> &[FlightDataBranch] {
        &self.branches
    }

    pub fn branch(&self, index: usize) -> Option<&FlightDataBranch> {
        self.branches.get(index)
    }

    pub fn summary(&self) -> &FlightDataSummary {
        &self.summary
    }

    pub fn warnings(&self) -> &WarningSet {
        &self.warnings
    }

    /// Whether any branch holds sampled rows.
    pub fn has_samples(&self) -> bool {
        self.branches.iter().any(|b| !b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch() -> FlightDataBranch {
        let types = ["Time", "Altitude", "Total velocity"]
            .into_iter()
            .map(|n| FlightDataType::builtin(n).unwrap())
            .collect();
        FlightDataBranch::new("Sustainer", types)
    }

    #[test]
    fn builtin_lookup_ignores_case() {
        let t = FlightDataType::builtin("total VELOCITY").unwrap();
        assert_eq!(t.symbol, "Vt");
        assert!(FlightDataType::builtin("Flux capacitance").is_none());
    }

    #[test]
    fn row_width_is_enforced() {
        let mut b = branch();
        assert!(b.add_point(&[0.0, 0.0, 0.0]).is_ok());
        assert_eq!(
            b.add_point(&[0.1, 1.0]),
            Err(RowWidthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn summary_from_first_branch() {
        let mut b = branch();
        b.add_point(&[0.0, 0.0, 0.0]).unwrap();
        b.add_point(&[1.0, 50.0, 80.0]).unwrap();
        b.add_point(&[3.0, 120.0, 10.0]).unwrap();
        b.add_point(&[9.0, 0.0, 6.0]).unwrap();
        let data = FlightData::from_branches(vec![b], WarningSet::new());
        let s = data.summary();
        assert_eq!(s.max_altitude, 120.0);
        assert_eq!(s.time_to_apogee, 3.0);
        assert_eq!(s.max_velocity, 80.0);
        assert_eq!(s.flight_time, 9.0);
        assert_eq!(s.ground_hit_velocity, 6.0);
        assert!(s.max_mach.is_nan());
    }
}
