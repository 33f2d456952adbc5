use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Stable, opaque identifier of a rocket component.
///
/// Components read from a file keep the id written there so that events and
/// warnings can refer back to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const INVALID_CONFIGURATION_KEY: &str = "invalid-configuration";

/// Key of a flight configuration.
///
/// Wraps the id string found in the file. Missing or blank ids map to a
/// reserved sentinel that is never registered as a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightConfigurationId(String);

impl FlightConfigurationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn invalid() -> Self {
        Self(INVALID_CONFIGURATION_KEY.to_string())
    }

    /// Interpret an optional `configid` attribute.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self::invalid(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.0 != INVALID_CONFIGURATION_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FlightConfigurationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlightConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static NEXT_MOD_ID: AtomicU64 = AtomicU64::new(1);

/// Modification stamp. Every new stamp is greater than all earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModId(u64);

impl ModId {
    pub fn next() -> Self {
        Self(NEXT_MOD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_configuration_id_is_invalid() {
        assert!(!FlightConfigurationId::parse(None).is_valid());
        assert!(!FlightConfigurationId::parse(Some("   ")).is_valid());
        let id = FlightConfigurationId::parse(Some(" abc "));
        assert!(id.is_valid());
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn mod_ids_increase() {
        let a = ModId::next();
        let b = ModId::next();
        assert!(b > a);
    }
}
