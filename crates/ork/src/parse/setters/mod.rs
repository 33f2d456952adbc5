//! Typed converters from element text and attributes to component fields.

mod registry;

pub(crate) use registry::{Resolved, SetterRegistry};

use std::str::FromStr;

use crate::ImportContext;
use crate::types::{
    AngleMethod, AxialMethod, ClusterConfiguration, Color, Material, MaterialType, PresetType,
    RadiusMethod, RocketComponent, TabRelativePosition, Warning, WarningSet, XmlEnum,
};
use crate::units::DEGREES;

use super::Attributes;
use super::values::{parse_bool, parse_color, parse_double, parse_enum};

/// The target lacks the field a setter writes. Only possible when the
/// registry is inconsistent with the component model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Incapable;

pub(crate) type SetResult = std::result::Result<(), Incapable>;

/// Writes one field of a component from an element's text and attributes.
///
/// Unusable input is reported as a warning and leaves the component
/// unchanged.
pub(crate) trait Setter: Send + Sync {
    fn apply(
        &self,
        target: &mut RocketComponent,
        text: &str,
        attrs: &Attributes,
        env: &ImportContext,
        warnings: &mut WarningSet,
    ) -> SetResult;
}

/// Stores a value into a component; `None` if the component lacks the field.
pub(crate) type Mutator<T> = Box<dyn Fn(&mut RocketComponent, T) -> Option<()> + Send + Sync>;

/// Build a mutator from an accessor and a field assignment.
pub(crate) fn field<D: 'static, T: 'static>(
    access: fn(&mut RocketComponent) -> Option<&mut D>,
    set: fn(&mut D, T),
) -> Mutator<T> {
    Box::new(move |target, value| {
        set(access(target)?, value);
        Some(())
    })
}

pub(crate) fn mutator<T: 'static>(set: fn(&mut RocketComponent, T) -> Option<()>) -> Mutator<T> {
    Box::new(set)
}

pub(crate) struct StringSetter(pub Mutator<String>);

impl Setter for StringSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, _: &mut WarningSet) -> SetResult {
        (self.0)(target, text.to_string()).ok_or(Incapable)
    }
}

/// Integer fields; the target type decides the accepted range.
pub(crate) struct IntSetter<T>(pub Mutator<T>);

impl<T: FromStr + 'static> Setter for IntSetter<T> {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        match text.trim().parse::<T>() {
            Ok(value) => (self.0)(target, value).ok_or(Incapable),
            Err(_) => {
                warnings.add(Warning::invalid_parameter());
                Ok(())
            }
        }
    }
}

pub(crate) struct BoolSetter(pub Mutator<bool>);

impl Setter for BoolSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        match parse_bool(text) {
            Some(value) => (self.0)(target, value).ok_or(Incapable),
            None => {
                warnings.add(Warning::invalid_parameter());
                Ok(())
            }
        }
    }
}

/// Floating point fields, optionally scaled, optionally with a keyword
/// (`auto`, `filled`) that switches a companion flag on instead.
pub(crate) struct DoubleSetter {
    set: Mutator<f64>,
    multiplier: f64,
    special: Option<(&'static str, Mutator<bool>)>,
}

impl DoubleSetter {
    pub fn new(set: Mutator<f64>) -> Self {
        Self {
            set,
            multiplier: 1.0,
            special: None,
        }
    }

    pub fn scaled(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Setting a number clears the flag again.
    pub fn special(mut self, keyword: &'static str, flag: Mutator<bool>) -> Self {
        self.special = Some((keyword, flag));
        self
    }
}

impl Setter for DoubleSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        if let Some((keyword, flag)) = &self.special
            && text.trim().eq_ignore_ascii_case(keyword)
        {
            return flag(target, true).ok_or(Incapable);
        }
        let Some(value) = parse_double(text) else {
            warnings.add(Warning::invalid_parameter());
            return Ok(());
        };
        (self.set)(target, value * self.multiplier).ok_or(Incapable)?;
        if let Some((_, flag)) = &self.special {
            flag(target, false).ok_or(Incapable)?;
        }
        Ok(())
    }
}

/// Mass, CG and drag overrides: the value plus its enable flag.
pub(crate) struct OverrideSetter {
    pub value: Mutator<f64>,
    pub enable: Mutator<bool>,
}

impl Setter for OverrideSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        let Some(value) = parse_double(text) else {
            warnings.add(Warning::invalid_parameter());
            return Ok(());
        };
        (self.value)(target, value).ok_or(Incapable)?;
        (self.enable)(target, true).ok_or(Incapable)
    }
}

pub(crate) struct EnumSetter<E>(pub Mutator<E>);

impl<E: XmlEnum> Setter for EnumSetter<E> {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        match parse_enum::<E>(text) {
            Some(value) => (self.0)(target, value).ok_or(Incapable),
            None => {
                warnings.add(Warning::invalid_parameter());
                Ok(())
            }
        }
    }
}

pub(crate) struct ColorSetter(pub Mutator<Color>);

impl Setter for ColorSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, attrs: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        if !text.is_empty() {
            warnings.add(Warning::invalid_parameter());
        }
        match parse_color(attrs, warnings) {
            Some(color) => (self.0)(target, color).ok_or(Incapable),
            None => Ok(()),
        }
    }
}

/// A material named by the element text with a `density` attribute.
pub(crate) struct MaterialSetter {
    pub kind: MaterialType,
    pub set: Mutator<Material>,
}

impl Setter for MaterialSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, attrs: &Attributes, env: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        if let Some(kind) = attrs.get("type")
            && parse_enum::<MaterialType>(kind) != Some(self.kind)
        {
            warnings.add_str("Illegal material type specified, ignoring.");
            return Ok(());
        }
        let density = attrs.get("density").and_then(parse_double);
        let (Some(density), false) = (density, text.is_empty()) else {
            warnings.add_str("Illegal material specification, ignoring.");
            return Ok(());
        };
        if !(density > 0.0) {
            warnings.add_str("Illegal material density specified, ignoring.");
            return Ok(());
        }
        let material = env.materials.find_material(self.kind, text, density);
        (self.set)(target, material).ok_or(Incapable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Axial,
    Radial,
    Angular,
}

/// An offset with a `method` attribute (legacy `type`) selecting its
/// reference frame. Components without the positioning capability get a
/// warning.
pub(crate) struct PositionSetter(pub Axis);

impl Setter for PositionSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, attrs: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        let method = attrs.get_any(&["method", "type"]);
        let Some(value) = parse_double(text) else {
            warnings.add(Warning::invalid_parameter());
            return Ok(());
        };
        let unknown_method = |warnings: &mut WarningSet, method: &str| {
            warnings.add_str(format!("Unknown position method '{method}', ignoring."));
        };
        let applied = match self.0 {
            Axis::Axial => {
                let method = match method {
                    Some(m) => match parse_enum::<AxialMethod>(m) {
                        Some(method) => method,
                        None => {
                            unknown_method(warnings, m);
                            return Ok(());
                        }
                    },
                    None => AxialMethod::default(),
                };
                target.axial_mut().map(|axial| {
                    axial.method = method;
                    axial.offset = value;
                })
            }
            Axis::Radial => {
                let method = match method {
                    Some(m) => match parse_enum::<RadiusMethod>(m) {
                        Some(method) => method,
                        None => {
                            unknown_method(warnings, m);
                            return Ok(());
                        }
                    },
                    None => RadiusMethod::default(),
                };
                target.radial_mut().map(|radial| {
                    radial.method = method;
                    radial.offset = value;
                })
            }
            Axis::Angular => {
                let method = match method {
                    Some(m) => match parse_enum::<AngleMethod>(m) {
                        Some(method) => method,
                        None => {
                            unknown_method(warnings, m);
                            return Ok(());
                        }
                    },
                    None => AngleMethod::default(),
                };
                target.angular_mut().map(|angular| {
                    angular.method = method;
                    angular.offset = value * DEGREES;
                })
            }
        };
        if applied.is_none() {
            warnings.add_str(format!(
                "{} cannot be positioned {}, ignoring.",
                target.kind().display_name(),
                match self.0 {
                    Axis::Axial => "axially",
                    Axis::Radial => "radially",
                    Axis::Angular => "angularly",
                }
            ));
        }
        Ok(())
    }
}

/// Fin tab offset with its `relativeto` reference point.
pub(crate) struct FinTabPositionSetter;

impl Setter for FinTabPositionSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, attrs: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        let relative = match attrs.get("relativeto") {
            Some(value) => {
                let relative = TabRelativePosition::parse(value);
                if relative.is_none() {
                    warnings.add(Warning::invalid_parameter());
                }
                relative
            }
            None => {
                warnings.add(Warning::invalid_parameter());
                None
            }
        };
        let Some(offset) = parse_double(text) else {
            warnings.add(Warning::invalid_parameter());
            return Ok(());
        };
        let fins = target.fin_set_mut().ok_or(Incapable)?;
        if let Some(relative) = relative {
            fins.tab_relative_to = relative;
        }
        fins.tab_offset = offset;
        Ok(())
    }
}

pub(crate) struct ClusterConfigurationSetter;

impl Setter for ClusterConfigurationSetter {
    fn apply(&self, target: &mut RocketComponent, text: &str, _: &Attributes, _: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        match ClusterConfiguration::from_xml_name(text) {
            Some(configuration) => {
                target.cluster_mut().ok_or(Incapable)?.configuration = configuration;
                Ok(())
            }
            None => {
                warnings.add_str(format!("Unknown cluster configuration '{text}', ignoring."));
                Ok(())
            }
        }
    }
}

/// Loads a catalogue preset named by `manufacturer` and `partno`.
pub(crate) struct PresetSetter;

impl Setter for PresetSetter {
    fn apply(&self, target: &mut RocketComponent, _: &str, attrs: &Attributes, env: &ImportContext, warnings: &mut WarningSet) -> SetResult {
        let name = target.name.clone();
        let Some(manufacturer) = attrs.get("manufacturer") else {
            warnings.add_str(format!(
                "Invalid preset for component {name}, no manufacturer specified. Ignored"
            ));
            return Ok(());
        };
        let Some(part_no) = attrs.get("partno") else {
            warnings.add_str(format!(
                "Invalid preset for component {name}, no part number specified. Ignored"
            ));
            return Ok(());
        };
        let digest = attrs.get("digest");
        if digest.is_none() {
            warnings.add_str(format!("Invalid preset for component {name}, no digest specified."));
        }
        let preset_type = attrs.get("type");
        if preset_type.is_none() {
            warnings.add_str(format!("Invalid preset for component {name}, no type specified."));
        }

        let candidates = env.presets.find(manufacturer, part_no);
        let by_digest = digest.and_then(|d| candidates.iter().find(|p| p.digest() == d));
        let chosen = by_digest.or_else(|| match preset_type {
            Some(t) => {
                let wanted = PresetType::from_xml(t);
                candidates.iter().find(|p| Some(p.kind) == wanted)
            }
            None => candidates
                .iter()
                .find(|p| p.kind.component_kind() == target.kind()),
        });
        let Some(preset) = chosen else {
            warnings.add_str(format!(
                "No matching preset for component {name} found matching {manufacturer} {part_no}"
            ));
            return Ok(());
        };
        if let Some(digest) = digest
            && preset.digest() != digest
        {
            warnings.add_str(format!("Preset for component {name} has wrong digest"));
        }
        if !target.load_preset(preset) {
            warnings.add_str(format!(
                "Preset {manufacturer} {part_no} does not fit component {name}, ignoring."
            ));
            return Ok(());
        }
        target.name = name;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComponentKind, ComponentPreset, PresetCatalog, PresetDatabase, PresetProperties};

    fn apply(setter: &dyn Setter, target: &mut RocketComponent, text: &str, attrs: Attributes) -> (SetResult, WarningSet) {
        apply_with(setter, target, text, attrs, &ImportContext::default())
    }

    fn apply_with(
        setter: &dyn Setter,
        target: &mut RocketComponent,
        text: &str,
        attrs: Attributes,
        env: &ImportContext,
    ) -> (SetResult, WarningSet) {
        let mut warnings = WarningSet::new();
        let result = setter.apply(target, text, &attrs, env, &mut warnings);
        (result, warnings)
    }

    fn length_setter() -> DoubleSetter {
        DoubleSetter::new(field(RocketComponent::shell_mut, |s, v| s.length = v))
    }

    #[test]
    fn double_rejects_garbage_without_mutation() {
        let mut tube = RocketComponent::new(ComponentKind::BodyTube);
        let before = tube.clone();
        let (result, warnings) = apply(&length_setter(), &mut tube, "long", Attributes::default());
        assert!(result.is_ok());
        assert_eq!(warnings.len(), 1);
        assert_eq!(tube, before);
    }

    #[test]
    fn special_keyword_sets_flag() {
        let setter = DoubleSetter::new(field(RocketComponent::body_tube_mut, |t, v| t.outer_radius = v))
            .special("auto", field(RocketComponent::body_tube_mut, |t, v| t.outer_radius_auto = v));
        let mut tube = RocketComponent::new(ComponentKind::BodyTube);

        apply(&setter, &mut tube, "auto", Attributes::default()).0.unwrap();
        assert!(tube.body_tube_mut().unwrap().outer_radius_auto);

        apply(&setter, &mut tube, "0.02", Attributes::default()).0.unwrap();
        let data = tube.body_tube_mut().unwrap();
        assert!(!data.outer_radius_auto);
        assert_eq!(data.outer_radius, 0.02);
    }

    #[test]
    fn incapable_target_is_reported() {
        let mut ring = RocketComponent::new(ComponentKind::CenteringRing);
        let (result, _) = apply(&length_setter(), &mut ring, "0.1", Attributes::default());
        assert_eq!(result, Err(Incapable));
    }

    #[test]
    fn angular_position_converts_degrees() {
        let mut fins = RocketComponent::new(ComponentKind::TrapezoidFinSet);
        let attrs = Attributes::from([("method", "fixed")]);
        let (result, warnings) = apply(&PositionSetter(Axis::Angular), &mut fins, "90", attrs);
        assert!(result.is_ok());
        assert!(warnings.is_empty());
        let angular = fins.angular().unwrap();
        assert_eq!(angular.method, AngleMethod::Fixed);
        assert!((angular.offset - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn position_accepts_legacy_type_attribute() {
        let mut lug = RocketComponent::new(ComponentKind::LaunchLug);
        let attrs = Attributes::from([("type", "bottom")]);
        apply(&PositionSetter(Axis::Axial), &mut lug, "-0.01", attrs).0.unwrap();
        assert_eq!(lug.axial().unwrap().method, AxialMethod::Bottom);
        assert_eq!(lug.axial().unwrap().offset, -0.01);
    }

    #[test]
    fn position_on_incapable_kind_warns() {
        let mut stage = RocketComponent::new(ComponentKind::AxialStage);
        let (result, warnings) = apply(&PositionSetter(Axis::Axial), &mut stage, "0.1", Attributes::default());
        assert!(result.is_ok());
        assert!(warnings.mentions("cannot be positioned axially"));
    }

    #[test]
    fn material_requires_positive_density() {
        let setter = MaterialSetter {
            kind: MaterialType::Bulk,
            set: mutator(RocketComponent::set_material),
        };
        let mut tube = RocketComponent::new(ComponentKind::BodyTube);

        let (_, warnings) = apply(&setter, &mut tube, "Balsa", Attributes::from([("density", "-3")]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(tube.material().unwrap().name, "Cardboard");

        let (_, warnings) = apply(
            &setter,
            &mut tube,
            "Balsa",
            Attributes::from([("density", "170"), ("type", "surface")]),
        );
        assert!(warnings.mentions("Illegal material type"));

        let (_, warnings) = apply(
            &setter,
            &mut tube,
            "Balsa",
            Attributes::from([("density", "170"), ("type", "bulk")]),
        );
        assert!(warnings.is_empty());
        assert_eq!(tube.material().unwrap().name, "Balsa");
        assert!(!tube.material().unwrap().user_defined);
    }

    fn catalog() -> PresetCatalog {
        let tube = |desc: &str, od: f64| {
            ComponentPreset::new(
                PresetType::BodyTube,
                "Estes",
                "BT-50",
                Some(desc.to_string()),
                PresetProperties {
                    outer_diameter: Some(od),
                    ..Default::default()
                },
            )
        };
        PresetCatalog::new(vec![tube("first", 0.0248), tube("second", 0.0250)])
    }

    #[test]
    fn preset_prefers_digest_then_first_type_match() {
        let catalog = catalog();
        let second_digest = catalog.find("Estes", "BT-50")[1].digest().to_string();
        let env = ImportContext::default().with_presets(catalog);

        let mut tube = RocketComponent::new(ComponentKind::BodyTube);
        tube.name = "Main tube".into();
        let attrs = Attributes::from([
            ("manufacturer", "Estes"),
            ("partno", "BT-50"),
            ("type", "BODY_TUBE"),
            ("digest", second_digest.as_str()),
        ]);
        let (_, warnings) = apply_with(&PresetSetter, &mut tube, "", attrs, &env);
        assert!(warnings.is_empty());
        assert_eq!(tube.preset().unwrap().description.as_deref(), Some("second"));
        assert_eq!(tube.name, "Main tube");

        let mut tube = RocketComponent::new(ComponentKind::BodyTube);
        let attrs = Attributes::from([
            ("manufacturer", "Estes"),
            ("partno", "BT-50"),
            ("type", "BODY_TUBE"),
            ("digest", "stale"),
        ]);
        let (_, warnings) = apply_with(&PresetSetter, &mut tube, "", attrs, &env);
        assert_eq!(tube.preset().unwrap().description.as_deref(), Some("first"));
        assert!(warnings.mentions("wrong digest"));
    }

    #[test]
    fn preset_without_match_leaves_component() {
        let env = ImportContext::default().with_presets(catalog());
        let mut tube = RocketComponent::new(ComponentKind::BodyTube);
        let attrs = Attributes::from([("manufacturer", "Estes"), ("partno", "BT-80"), ("type", "BODY_TUBE"), ("digest", "x")]);
        let (_, warnings) = apply_with(&PresetSetter, &mut tube, "", attrs, &env);
        assert!(tube.preset().is_none());
        assert!(warnings.mentions("No matching preset"));
    }
}
