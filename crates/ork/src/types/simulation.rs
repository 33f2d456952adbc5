use std::collections::BTreeMap;
use std::fmt;

use super::{
    AltitudeReference, DesignDocument, FlightConfigurationId, FlightData, GeodeticMethod, ModId,
    SimulationStatus, WarningSet, WindModelType,
};

/// Launch site and launch guide.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchConditions {
    pub rod_length: f64,
    /// Radians from vertical.
    pub rod_angle: f64,
    /// Radians, compass direction the rod leans towards.
    pub rod_direction: f64,
    pub altitude: f64,
    /// Degrees.
    pub latitude: f64,
    /// Degrees.
    pub longitude: f64,
    pub geodetic_method: GeodeticMethod,
}

impl Default for LaunchConditions {
    fn default() -> Self {
        Self {
            rod_length: 1.0,
            rod_angle: 0.0,
            rod_direction: std::f64::consts::FRAC_PI_2,
            altitude: 0.0,
            latitude: 28.61,
            longitude: -80.6,
            geodetic_method: GeodeticMethod::Flat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AtmosphereModel {
    /// International Standard Atmosphere.
    #[default]
    Isa,
    /// ISA shifted to a custom launch-site temperature and pressure.
    ExtendedIsa {
        /// Kelvin.
        base_temperature: f64,
        /// Pascal.
        base_pressure: f64,
    },
}

impl AtmosphereModel {
    pub const STANDARD_TEMPERATURE: f64 = 288.15;
    pub const STANDARD_PRESSURE: f64 = 101_325.0;
}

/// Constant mean wind with turbulence.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageWind {
    pub speed: f64,
    /// Radians, direction the wind blows from.
    pub direction: f64,
    /// Standard deviation relative to the mean speed.
    pub turbulence_intensity: f64,
}

impl Default for AverageWind {
    fn default() -> Self {
        Self {
            speed: 2.0,
            direction: std::f64::consts::FRAC_PI_2,
            turbulence_intensity: 0.1,
        }
    }
}

impl AverageWind {
    pub fn standard_deviation(&self) -> f64 {
        self.speed * self.turbulence_intensity
    }

    /// Set the turbulence from an absolute standard deviation.
    pub fn set_standard_deviation(&mut self, deviation: f64) {
        self.turbulence_intensity = if self.speed > 0.0 {
            deviation / self.speed
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindLevel {
    pub altitude: f64,
    pub speed: f64,
    pub direction: f64,
    pub standard_deviation: f64,
}

/// Wind given at several altitudes, interpolated in between.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLevelWind {
    pub altitude_reference: AltitudeReference,
    /// Sorted by altitude.
    pub levels: Vec<WindLevel>,
}

impl MultiLevelWind {
    pub fn add_level(&mut self, level: WindLevel) {
        let at = self
            .levels
            .partition_point(|existing| existing.altitude <= level.altitude);
        self.levels.insert(at, level);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindSettings {
    /// Which of the two models is used.
    pub model: WindModelType,
    pub average: AverageWind,
    pub multilevel: MultiLevelWind,
}

/// Everything that determines a simulation besides the rocket itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    pub configuration_id: Option<FlightConfigurationId>,
    pub launch: LaunchConditions,
    pub atmosphere: AtmosphereModel,
    pub wind: WindSettings,
    pub time_step: f64,
    pub max_time: f64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            configuration_id: None,
            launch: LaunchConditions::default(),
            atmosphere: AtmosphereModel::default(),
            wind: WindSettings::default(),
            time_step: 0.05,
            max_time: 1200.0,
        }
    }
}

/// A typed value in extension configuration and document preferences.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    List(Vec<ConfigValue>),
}

pub type ExtensionConfig = BTreeMap<String, ConfigValue>;

/// A plug-in attached to a simulation.
pub trait SimulationExtension: fmt::Debug {
    fn id(&self) -> &str;

    fn config(&self) -> &ExtensionConfig;

    /// Called once with the finished document after a load.
    fn document_loaded(&mut self, _document: &DesignDocument, _warnings: &mut WarningSet) {}
}

/// Creates extensions from the id and configuration stored in a file.
pub trait ExtensionProvider {
    /// `None` if no extension with this id is available.
    fn create(&self, id: &str, config: ExtensionConfig) -> Option<Box<dyn SimulationExtension>>;
}

/// An extension kept as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredExtension {
    pub id: String,
    pub config: ExtensionConfig,
}

impl SimulationExtension for StoredExtension {
    fn id(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &ExtensionConfig {
        &self.config
    }
}

/// Provider that keeps every extension as [`StoredExtension`] data.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredExtensions;

impl ExtensionProvider for StoredExtensions {
    fn create(&self, id: &str, config: ExtensionConfig) -> Option<Box<dyn SimulationExtension>> {
        Some(Box::new(StoredExtension {
            id: id.to_string(),
            config,
        }))
    }
}

/// A simulation definition and, optionally, its stored results.
#[derive(Debug)]
pub struct Simulation {
    pub name: String,
    pub status: SimulationStatus,
    pub simulator: Option<String>,
    pub calculator: Option<String>,
    pub options: SimulationOptions,
    pub listeners: Vec<String>,
    pub extensions: Vec<Box<dyn SimulationExtension>>,
    pub flight_data: Option<FlightData>,
    simulated_mod_id: Option<ModId>,
}

impl Simulation {
    pub fn new(name: impl Into<String>, options: SimulationOptions) -> Self {
        Self {
            name: name.into(),
            status: SimulationStatus::NotSimulated,
            simulator: None,
            calculator: None,
            options,
            listeners: Vec::new(),
            extensions: Vec::new(),
            flight_data: None,
            simulated_mod_id: None,
        }
    }

    /// Modification stamp of the flight configuration these results belong to.
    pub fn simulated_mod_id(&self) -> Option<ModId> {
        self.simulated_mod_id
    }

    pub fn sync_mod_id(&mut self, mod_id: ModId) {
        self.simulated_mod_id = Some(mod_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_levels_stay_sorted() {
        let mut wind = MultiLevelWind::default();
        for altitude in [500.0, 0.0, 1000.0, 250.0] {
            wind.add_level(WindLevel {
                altitude,
                speed: 5.0,
                direction: 0.0,
                standard_deviation: 0.5,
            });
        }
        let altitudes: Vec<f64> = wind.levels.iter().map(|l| l.altitude).collect();
        assert_eq!(altitudes, vec![0.0, 250.0, 500.0, 1000.0]);
    }

    #[test]
    fn standard_deviation_relative_to_speed() {
        let mut wind = AverageWind {
            speed: 4.0,
            ..Default::default()
        };
        wind.set_standard_deviation(1.0);
        assert_eq!(wind.turbulence_intensity, 0.25);
        assert_eq!(wind.standard_deviation(), 1.0);
    }
}
