use crate::digest::{content_digest, digest_number};

use super::{ComponentKind, Material, PresetType, TransitionShape, XmlEnum};

/// Geometry and mass a preset imposes on a component. Absent values leave
/// the component field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresetProperties {
    pub length: Option<f64>,
    pub outer_diameter: Option<f64>,
    pub inner_diameter: Option<f64>,
    pub fore_outer_diameter: Option<f64>,
    pub aft_outer_diameter: Option<f64>,
    pub thickness: Option<f64>,
    pub shape: Option<TransitionShape>,
    pub mass: Option<f64>,
    pub material: Option<Material>,
    /// Canopy diameter of parachutes.
    pub diameter: Option<f64>,
    pub line_count: Option<u32>,
    pub line_length: Option<f64>,
    pub strip_length: Option<f64>,
    pub strip_width: Option<f64>,
}

/// A catalogue part that can be loaded onto a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPreset {
    pub kind: PresetType,
    pub manufacturer: String,
    pub part_no: String,
    pub description: Option<String>,
    pub properties: PresetProperties,
    digest: String,
}

impl ComponentPreset {
    pub fn new(
        kind: PresetType,
        manufacturer: impl Into<String>,
        part_no: impl Into<String>,
        description: Option<String>,
        properties: PresetProperties,
    ) -> Self {
        let manufacturer = manufacturer.into();
        let part_no = part_no.into();
        let digest = preset_digest(kind, &manufacturer, &part_no, &properties);
        Self {
            kind,
            manufacturer,
            part_no,
            description,
            properties,
            digest,
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn preset_digest(
    kind: PresetType,
    manufacturer: &str,
    part_no: &str,
    props: &PresetProperties,
) -> String {
    let numbers = [
        props.length,
        props.outer_diameter,
        props.inner_diameter,
        props.fore_outer_diameter,
        props.aft_outer_diameter,
        props.thickness,
        props.mass,
        props.diameter,
        props.line_length,
        props.strip_length,
        props.strip_width,
    ];
    let mut fields = vec![
        kind.name().to_string(),
        manufacturer.to_string(),
        part_no.to_string(),
    ];
    fields.extend(
        numbers
            .iter()
            .map(|n| n.map(digest_number).unwrap_or_default()),
    );
    if let Some(shape) = props.shape {
        fields.push(shape.name().to_string());
    }
    if let Some(material) = &props.material {
        fields.push(material.name.clone());
        fields.push(digest_number(material.density));
    }
    content_digest(fields)
}

impl PresetType {
    /// The component kind presets of this type are loaded onto.
    pub fn component_kind(self) -> ComponentKind {
        match self {
            PresetType::BodyTube => ComponentKind::BodyTube,
            PresetType::NoseCone => ComponentKind::NoseCone,
            PresetType::Transition => ComponentKind::Transition,
            PresetType::TubeCoupler => ComponentKind::TubeCoupler,
            PresetType::Bulkhead => ComponentKind::Bulkhead,
            PresetType::CenteringRing => ComponentKind::CenteringRing,
            PresetType::EngineBlock => ComponentKind::EngineBlock,
            PresetType::LaunchLug => ComponentKind::LaunchLug,
            PresetType::RailButton => ComponentKind::RailButton,
            PresetType::Streamer => ComponentKind::Streamer,
            PresetType::Parachute => ComponentKind::Parachute,
        }
    }
}

/// Source of component presets, looked up by manufacturer and part number.
pub trait PresetDatabase {
    /// All presets with the given manufacturer and part number, in database
    /// order.
    fn find(&self, manufacturer: &str, part_no: &str) -> Vec<ComponentPreset>;
}

/// In-memory preset catalogue.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    presets: Vec<ComponentPreset>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<ComponentPreset>) -> Self {
        Self { presets }
    }

    pub fn push(&mut self, preset: ComponentPreset) {
        self.presets.push(preset);
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl PresetDatabase for PresetCatalog {
    fn find(&self, manufacturer: &str, part_no: &str) -> Vec<ComponentPreset> {
        self.presets
            .iter()
            .filter(|p| p.manufacturer.eq_ignore_ascii_case(manufacturer) && p.part_no == part_no)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tube(part_no: &str, od: f64) -> ComponentPreset {
        ComponentPreset::new(
            PresetType::BodyTube,
            "Estes",
            part_no,
            None,
            PresetProperties {
                outer_diameter: Some(od),
                ..Default::default()
            },
        )
    }

    #[test]
    fn digest_tracks_content() {
        assert_eq!(tube("BT-50", 0.0248).digest(), tube("BT-50", 0.0248).digest());
        assert_ne!(tube("BT-50", 0.0248).digest(), tube("BT-50", 0.0249).digest());
    }

    #[test]
    fn catalog_find() {
        let catalog = PresetCatalog::new(vec![tube("BT-50", 0.0248), tube("BT-55", 0.0337)]);
        assert_eq!(catalog.find("estes", "BT-55").len(), 1);
        assert!(catalog.find("Estes", "BT-60").is_empty());
    }
}
