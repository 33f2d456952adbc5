use std::collections::{BTreeMap, BTreeSet};

use super::{DeployEvent, FlightConfigurationId, IgnitionEvent, ModId, Motor, SeparationEvent};

/// A default value plus per-flight-configuration overrides.
///
/// Lookups for a configuration without an override fall back to the
/// default. Overrides are always created from a clone of the default.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurableSet<T> {
    default: T,
    overrides: BTreeMap<FlightConfigurationId, T>,
}

impl<T: Clone> ConfigurableSet<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn default_value_mut(&mut self) -> &mut T {
        &mut self.default
    }

    /// The value for `id`, falling back to the default.
    pub fn get(&self, id: &FlightConfigurationId) -> &T {
        self.overrides.get(id).unwrap_or(&self.default)
    }

    pub fn get_override(&self, id: &FlightConfigurationId) -> Option<&T> {
        self.overrides.get(id)
    }

    pub fn get_override_mut(&mut self, id: &FlightConfigurationId) -> Option<&mut T> {
        self.overrides.get_mut(id)
    }

    /// A clone of the default, to be modified and stored with [`set`](Self::set).
    pub fn derive_default(&self) -> T {
        self.default.clone()
    }

    pub fn set(&mut self, id: FlightConfigurationId, value: T) {
        self.overrides.insert(id, value);
    }

    pub fn contains(&self, id: &FlightConfigurationId) -> bool {
        self.overrides.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &FlightConfigurationId> {
        self.overrides.keys()
    }

    /// Drop every override whose id fails `keep`, returning the dropped ids.
    pub fn retain_ids(
        &mut self,
        mut keep: impl FnMut(&FlightConfigurationId) -> bool,
    ) -> Vec<FlightConfigurationId> {
        let dropped: Vec<_> = self.overrides.keys().filter(|id| !keep(id)).cloned().collect();
        for id in &dropped {
            self.overrides.remove(id);
        }
        dropped
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

/// When a recovery device deploys.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentConfiguration {
    pub event: DeployEvent,
    /// Only meaningful for [`DeployEvent::Altitude`].
    pub altitude: f64,
    pub delay: f64,
}

impl Default for DeploymentConfiguration {
    fn default() -> Self {
        Self {
            event: DeployEvent::Ejection,
            altitude: 200.0,
            delay: 0.0,
        }
    }
}

/// When a stage separates from the stage below.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageSeparationConfiguration {
    pub event: SeparationEvent,
    pub delay: f64,
}

/// Motor loaded into a mount for one flight configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotorConfiguration {
    pub motor: Option<Motor>,
    pub ejection_delay: f64,
    pub ignition_event: IgnitionEvent,
    pub ignition_delay: f64,
}

/// A named, switchable combination of motors, active stages and recovery
/// settings.
#[derive(Debug, Clone)]
pub struct FlightConfiguration {
    id: FlightConfigurationId,
    pub name: Option<String>,
    mod_id: ModId,
    /// Activeness read from the file, applied once the stage count is known.
    pending_stages: BTreeMap<u32, bool>,
    active_stages: Option<BTreeSet<u32>>,
    declared: bool,
}

impl FlightConfiguration {
    pub fn new(id: FlightConfigurationId) -> Self {
        Self {
            id,
            name: None,
            mod_id: ModId::next(),
            pending_stages: BTreeMap::new(),
            active_stages: None,
            declared: false,
        }
    }

    pub fn id(&self) -> &FlightConfigurationId {
        &self.id
    }

    pub fn mod_id(&self) -> ModId {
        self.mod_id
    }

    /// Record stage activeness to be applied by [`apply_stage_activeness`](Self::apply_stage_activeness).
    pub fn defer_stage_activeness(&mut self, stage: u32, active: bool) {
        self.pending_stages.insert(stage, active);
    }

    pub fn pending_stages(&self) -> &BTreeMap<u32, bool> {
        &self.pending_stages
    }

    /// Resolve the deferred activeness against the final stage count.
    ///
    /// Stages without an entry are active. If entries exist but none of them
    /// is active, stage 0 is active. At least one stage stays active.
    pub fn apply_stage_activeness(&mut self, stage_count: u32) {
        if !self.pending_stages.is_empty() && !self.pending_stages.values().any(|active| *active) {
            log::debug!("flight configuration {}: no active stage, activating stage 0", self.id);
            self.pending_stages.insert(0, true);
        }
        for stage in self.pending_stages.keys().filter(|s| **s >= stage_count) {
            log::debug!(
                "flight configuration {}: no stage number {stage}, ignoring its activeness",
                self.id
            );
        }
        let mut active: BTreeSet<u32> = (0..stage_count)
            .filter(|stage| self.pending_stages.get(stage).copied().unwrap_or(true))
            .collect();
        if active.is_empty() && stage_count > 0 {
            active.insert(0);
        }
        self.active_stages = Some(active);
    }

    /// Whether `stage` is active. Before reconciliation this reflects the
    /// pending entries only.
    pub fn is_stage_active(&self, stage: u32) -> bool {
        match &self.active_stages {
            Some(active) => active.contains(&stage),
            None => self.pending_stages.get(&stage).copied().unwrap_or(true),
        }
    }

    pub fn active_stages(&self) -> Vec<u32> {
        self.active_stages
            .as_ref()
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Error returned when a configuration id is declared twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateConfiguration(pub FlightConfigurationId);

/// The rocket's flight configurations in declaration order, with one
/// optional default.
#[derive(Debug, Clone, Default)]
pub struct FlightConfigurationSet {
    configurations: Vec<FlightConfiguration>,
    default_id: Option<FlightConfigurationId>,
}

impl FlightConfigurationSet {
    pub fn get(&self, id: &FlightConfigurationId) -> Option<&FlightConfiguration> {
        self.configurations.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: &FlightConfigurationId) -> Option<&mut FlightConfiguration> {
        self.configurations.iter_mut().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: &FlightConfigurationId) -> bool {
        self.get(id).is_some()
    }

    /// The configuration for `id`, created if it does not exist yet.
    pub fn ensure(&mut self, id: &FlightConfigurationId) -> &mut FlightConfiguration {
        let index = match self.configurations.iter().position(|c| c.id() == id) {
            Some(index) => index,
            None => {
                self.configurations.push(FlightConfiguration::new(id.clone()));
                self.configurations.len() - 1
            }
        };
        &mut self.configurations[index]
    }

    /// Register a configuration read from a `<flightconfiguration>` element.
    ///
    /// A configuration implicitly created by [`ensure`](Self::ensure) is
    /// replaced; one declared before is an error.
    pub fn declare(&mut self, mut configuration: FlightConfiguration) -> Result<(), DuplicateConfiguration> {
        configuration.declared = true;
        match self.get_mut(configuration.id()) {
            Some(existing) if existing.declared => {
                Err(DuplicateConfiguration(configuration.id.clone()))
            }
            Some(existing) => {
                existing.name = configuration.name;
                existing.pending_stages = configuration.pending_stages;
                existing.declared = true;
                Ok(())
            }
            None => {
                self.configurations.push(configuration);
                Ok(())
            }
        }
    }

    pub fn set_default(&mut self, id: FlightConfigurationId) {
        self.default_id = Some(id);
    }

    /// The default configuration: the one marked default, else the first.
    pub fn default_configuration(&self) -> Option<&FlightConfiguration> {
        self.default_id
            .as_ref()
            .and_then(|id| self.get(id))
            .or_else(|| self.configurations.first())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlightConfiguration> {
        self.configurations.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FlightConfiguration> {
        self.configurations.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> FlightConfigurationId {
        FlightConfigurationId::parse(Some(s))
    }

    #[test]
    fn configurable_set_falls_back_to_default() {
        let mut set = ConfigurableSet::new(DeploymentConfiguration {
            event: DeployEvent::Apogee,
            altitude: 200.0,
            delay: 3.0,
        });
        let mut derived = set.derive_default();
        derived.delay = 5.0;
        set.set(id("a"), derived);

        assert_eq!(set.get(&id("a")).delay, 5.0);
        assert_eq!(set.get(&id("a")).event, DeployEvent::Apogee);
        assert_eq!(set.get(&id("b")).delay, 3.0);
    }

    #[test]
    fn retain_reports_dropped_ids() {
        let mut set = ConfigurableSet::new(StageSeparationConfiguration::default());
        set.set(id("a"), StageSeparationConfiguration::default());
        set.set(id("b"), StageSeparationConfiguration::default());
        let dropped = set.retain_ids(|i| i.as_str() == "a");
        assert_eq!(dropped, vec![id("b")]);
        assert_eq!(set.override_count(), 1);
    }

    #[test]
    fn stage_activeness_forces_one_active_stage() {
        let mut config = FlightConfiguration::new(id("a"));
        config.defer_stage_activeness(0, false);
        config.defer_stage_activeness(1, false);
        config.apply_stage_activeness(2);
        assert_eq!(config.active_stages(), vec![0]);

        let mut config = FlightConfiguration::new(id("b"));
        config.defer_stage_activeness(1, false);
        config.apply_stage_activeness(3);
        assert_eq!(config.active_stages(), vec![0, 2]);

        let mut config = FlightConfiguration::new(id("c"));
        config.defer_stage_activeness(0, false);
        config.apply_stage_activeness(2);
        assert_eq!(config.active_stages(), vec![0, 1]);
    }

    #[test]
    fn declare_rejects_duplicates_but_adopts_ensured() {
        let mut set = FlightConfigurationSet::default();
        set.ensure(&id("a"));
        let mut declared = FlightConfiguration::new(id("a"));
        declared.name = Some("Sport".into());
        assert!(set.declare(declared).is_ok());
        assert_eq!(set.get(&id("a")).unwrap().name.as_deref(), Some("Sport"));
        assert_eq!(set.len(), 1);

        assert!(set.declare(FlightConfiguration::new(id("a"))).is_err());
    }
}
