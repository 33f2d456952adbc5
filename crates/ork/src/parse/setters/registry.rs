//! The `(component kind, element name)` → setter table.
//!
//! Setters are declared on the most general kind that owns a field. At
//! startup every kind gets a flattened view of its ancestry, so lookups are
//! a single map probe and the most specific declaration wins.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::{
    ComponentId, ComponentKind, CrossSection, DeployEvent, Finish, LineStyle, MassComponentType,
    MaterialType, ReferenceType, RocketComponent, SeparationEvent, TransitionShape,
};
use crate::units::DEGREES;

use super::{
    Axis, BoolSetter, ClusterConfigurationSetter, ColorSetter, DoubleSetter, EnumSetter,
    FinTabPositionSetter, IntSetter, MaterialSetter, Mutator, OverrideSetter, PositionSetter,
    PresetSetter, Setter, StringSetter, field, mutator,
};

enum Entry {
    Setter(Box<dyn Setter>),
    /// Declared invalid for this kind although an ancestor has a setter.
    Tombstone,
}

#[derive(Clone, Copy)]
enum Slot {
    Owner(ComponentKind),
    Tombstone,
}

pub(crate) enum Resolved<'r> {
    Setter(&'r dyn Setter),
    Absent,
    Tombstoned,
}

pub(crate) struct SetterRegistry {
    declared: HashMap<ComponentKind, HashMap<&'static str, Entry>>,
    resolved: HashMap<ComponentKind, HashMap<&'static str, Slot>>,
}

static REGISTRY: Lazy<SetterRegistry> = Lazy::new(SetterRegistry::build);

impl SetterRegistry {
    pub fn global() -> &'static SetterRegistry {
        &REGISTRY
    }

    pub fn resolve(&self, kind: ComponentKind, element: &str) -> Resolved<'_> {
        let Some(slot) = self.resolved.get(&kind).and_then(|slots| slots.get(element)) else {
            return Resolved::Absent;
        };
        match slot {
            Slot::Tombstone => Resolved::Tombstoned,
            Slot::Owner(owner) => match self.declared.get(owner).and_then(|d| d.get(element)) {
                Some(Entry::Setter(setter)) => Resolved::Setter(setter.as_ref()),
                _ => Resolved::Absent,
            },
        }
    }

    fn put(&mut self, kind: ComponentKind, element: &'static str, setter: impl Setter + 'static) {
        let previous = self
            .declared
            .entry(kind)
            .or_default()
            .insert(element, Entry::Setter(Box::new(setter)));
        debug_assert!(previous.is_none(), "{kind:?}.{element} declared twice");
    }

    fn tombstone(&mut self, kind: ComponentKind, element: &'static str) {
        self.declared
            .entry(kind)
            .or_default()
            .insert(element, Entry::Tombstone);
    }

    fn flatten(&mut self) {
        for &kind in ComponentKind::ALL {
            let mut slots = HashMap::new();
            let mut chain: Vec<_> = kind.ancestry().collect();
            chain.reverse();
            for ancestor in chain {
                for (element, entry) in self.declared.get(&ancestor).into_iter().flatten() {
                    let slot = match entry {
                        Entry::Setter(_) => Slot::Owner(ancestor),
                        Entry::Tombstone => Slot::Tombstone,
                    };
                    slots.insert(*element, slot);
                }
            }
            self.resolved.insert(kind, slots);
        }
    }

    fn build() -> Self {
        use ComponentKind as K;

        let mut r = SetterRegistry {
            declared: HashMap::new(),
            resolved: HashMap::new(),
        };

        // every component
        r.put(K::RocketComponent, "name", StringSetter(mutator(|c, v| {
            c.name = v;
            Some(())
        })));
        r.put(K::RocketComponent, "id", StringSetter(mutator(|c, v: String| {
            c.id = ComponentId::from(v.as_str());
            Some(())
        })));
        r.put(K::RocketComponent, "comment", StringSetter(mutator(|c, v| {
            c.comment = v;
            Some(())
        })));
        r.put(K::RocketComponent, "color", ColorSetter(mutator(|c, v| {
            c.color = Some(v);
            Some(())
        })));
        r.put(K::RocketComponent, "linestyle", EnumSetter::<LineStyle>(mutator(|c, v| {
            c.line_style = Some(v);
            Some(())
        })));
        r.put(K::RocketComponent, "position", PositionSetter(Axis::Axial));
        r.put(K::RocketComponent, "axialoffset", PositionSetter(Axis::Axial));
        r.put(K::RocketComponent, "overridemass", OverrideSetter {
            value: mutator(|c, v| {
                c.overrides.mass.value = v;
                Some(())
            }),
            enable: mutator(|c, v| {
                c.overrides.mass.enabled = v;
                Some(())
            }),
        });
        r.put(K::RocketComponent, "overridecg", OverrideSetter {
            value: mutator(|c, v| {
                c.overrides.cg.value = v;
                Some(())
            }),
            enable: mutator(|c, v| {
                c.overrides.cg.enabled = v;
                Some(())
            }),
        });
        r.put(K::RocketComponent, "overridecd", OverrideSetter {
            value: mutator(|c, v| {
                c.overrides.cd.value = v;
                Some(())
            }),
            enable: mutator(|c, v| {
                c.overrides.cd.enabled = v;
                Some(())
            }),
        });
        r.put(K::RocketComponent, "overridesubcomponents", BoolSetter(mutator(|c, v| {
            c.overrides.subcomponents = v;
            Some(())
        })));
        r.put(K::RocketComponent, "preset", PresetSetter);

        // assemblies
        r.put(K::Rocket, "designer", StringSetter(field(RocketComponent::rocket_mut, |d, v| d.designer = v)));
        r.put(K::Rocket, "revision", StringSetter(field(RocketComponent::rocket_mut, |d, v| d.revision = v)));
        r.put(K::Rocket, "referencetype", EnumSetter::<ReferenceType>(field(RocketComponent::rocket_mut, |d, v| d.reference_type = v)));
        r.put(K::Rocket, "customreference", DoubleSetter::new(field(RocketComponent::rocket_mut, |d, v| d.custom_reference_length = v)));
        r.put(K::AxialStage, "separationevent", EnumSetter::<SeparationEvent>(field(RocketComponent::separation_mut, |s, v| s.default_value_mut().event = v)));
        r.put(K::AxialStage, "separationdelay", DoubleSetter::new(field(RocketComponent::separation_mut, |s, v| s.default_value_mut().delay = v)));
        for kind in [K::PodSet, K::ParallelStage] {
            r.put(kind, "instancecount", IntSetter::<u32>(field(RocketComponent::pods_mut, |p, v| p.instance_count = v)));
            r.put(kind, "radiusoffset", PositionSetter(Axis::Radial));
            r.put(kind, "angleoffset", PositionSetter(Axis::Angular));
        }

        // external components
        r.put(K::ExternalComponent, "finish", EnumSetter::<Finish>(mutator(|c, v| {
            *c.finish.as_mut()? = v;
            Some(())
        })));
        r.put(K::ExternalComponent, "material", bulk_material());

        r.put(K::BodyComponent, "length", DoubleSetter::new(field(RocketComponent::shell_mut, |s, v| s.length = v)));
        r.put(K::SymmetricComponent, "thickness", DoubleSetter::new(field(RocketComponent::shell_mut, |s, v| s.thickness = v))
            .special("filled", field(RocketComponent::shell_mut, |s, v| s.filled = v)));

        r.put(K::BodyTube, "radius", DoubleSetter::new(field(RocketComponent::body_tube_mut, |t, v| t.outer_radius = v))
            .special("auto", field(RocketComponent::body_tube_mut, |t, v| t.outer_radius_auto = v)));

        r.put(K::Transition, "shape", EnumSetter::<TransitionShape>(field(RocketComponent::transition_mut, |t, v| t.shape = v)));
        r.put(K::Transition, "shapeclipped", BoolSetter(field(RocketComponent::transition_mut, |t, v| t.clipped = v)));
        r.put(K::Transition, "shapeparameter", transition(|t, v| t.shape_parameter = v));
        r.put(K::Transition, "foreradius", transition(|t, v| t.fore_radius = v)
            .special("auto", field(RocketComponent::transition_mut, |t, v| t.fore_radius_auto = v)));
        r.put(K::Transition, "aftradius", transition(|t, v| t.aft_radius = v)
            .special("auto", field(RocketComponent::transition_mut, |t, v| t.aft_radius_auto = v)));
        r.put(K::Transition, "foreshoulderradius", transition(|t, v| t.fore_shoulder.radius = v));
        r.put(K::Transition, "foreshoulderlength", transition(|t, v| t.fore_shoulder.length = v));
        r.put(K::Transition, "foreshoulderthickness", transition(|t, v| t.fore_shoulder.thickness = v));
        r.put(K::Transition, "foreshouldercapped", BoolSetter(field(RocketComponent::transition_mut, |t, v| t.fore_shoulder.capped = v)));
        r.put(K::Transition, "aftshoulderradius", transition(|t, v| t.aft_shoulder.radius = v));
        r.put(K::Transition, "aftshoulderlength", transition(|t, v| t.aft_shoulder.length = v));
        r.put(K::Transition, "aftshoulderthickness", transition(|t, v| t.aft_shoulder.thickness = v));
        r.put(K::Transition, "aftshouldercapped", BoolSetter(field(RocketComponent::transition_mut, |t, v| t.aft_shoulder.capped = v)));
        for element in [
            "foreradius",
            "foreshoulderradius",
            "foreshoulderlength",
            "foreshoulderthickness",
            "foreshouldercapped",
        ] {
            r.tombstone(K::NoseCone, element);
        }

        r.put(K::FinSet, "fincount", IntSetter::<u32>(field(RocketComponent::fin_set_mut, |f, v| f.fin_count = v)));
        r.put(K::FinSet, "rotation", fins(|f, v| f.base_rotation = v).scaled(DEGREES));
        r.put(K::FinSet, "thickness", fins(|f, v| f.thickness = v));
        r.put(K::FinSet, "crosssection", EnumSetter::<CrossSection>(field(RocketComponent::fin_set_mut, |f, v| f.cross_section = v)));
        r.put(K::FinSet, "cant", fins(|f, v| f.cant_angle = v).scaled(DEGREES));
        r.put(K::FinSet, "tabheight", fins(|f, v| f.tab_height = v));
        r.put(K::FinSet, "tablength", fins(|f, v| f.tab_length = v));
        r.put(K::FinSet, "tabposition", FinTabPositionSetter);
        r.put(K::FinSet, "filletradius", fins(|f, v| f.fillet_radius = v));
        r.put(K::FinSet, "filletmaterial", MaterialSetter {
            kind: MaterialType::Bulk,
            set: field(RocketComponent::fin_set_mut, |f, v| f.fillet_material = v),
        });
        r.put(K::FinSet, "angleoffset", PositionSetter(Axis::Angular));
        r.put(K::TrapezoidFinSet, "rootchord", DoubleSetter::new(field(RocketComponent::trapezoid_mut, |s, v| s.root_chord = v)));
        r.put(K::TrapezoidFinSet, "tipchord", DoubleSetter::new(field(RocketComponent::trapezoid_mut, |s, v| s.tip_chord = v)));
        r.put(K::TrapezoidFinSet, "sweeplength", DoubleSetter::new(field(RocketComponent::trapezoid_mut, |s, v| s.sweep = v)));
        r.put(K::TrapezoidFinSet, "height", DoubleSetter::new(field(RocketComponent::trapezoid_mut, |s, v| s.height = v)));
        r.put(K::EllipticalFinSet, "rootchord", DoubleSetter::new(field(RocketComponent::elliptical_mut, |s, v| s.root_chord = v)));
        r.put(K::EllipticalFinSet, "height", DoubleSetter::new(field(RocketComponent::elliptical_mut, |s, v| s.height = v)));

        r.put(K::TubeFinSet, "fincount", IntSetter::<u32>(field(RocketComponent::tube_fin_set_mut, |f, v| f.fin_count = v)));
        r.put(K::TubeFinSet, "rotation", DoubleSetter::new(field(RocketComponent::tube_fin_set_mut, |f, v| f.base_rotation = v)).scaled(DEGREES));
        r.put(K::TubeFinSet, "thickness", DoubleSetter::new(field(RocketComponent::tube_fin_set_mut, |f, v| f.thickness = v)));
        r.put(K::TubeFinSet, "length", DoubleSetter::new(field(RocketComponent::tube_fin_set_mut, |f, v| f.length = v)));
        r.put(K::TubeFinSet, "radius", DoubleSetter::new(field(RocketComponent::tube_fin_set_mut, |f, v| f.outer_radius = v))
            .special("auto", field(RocketComponent::tube_fin_set_mut, |f, v| f.outer_radius_auto = v)));
        r.put(K::TubeFinSet, "angleoffset", PositionSetter(Axis::Angular));

        r.put(K::LaunchLug, "radius", DoubleSetter::new(field(RocketComponent::launch_lug_mut, |l, v| l.outer_radius = v)));
        r.put(K::LaunchLug, "length", DoubleSetter::new(field(RocketComponent::launch_lug_mut, |l, v| l.length = v)));
        r.put(K::LaunchLug, "thickness", DoubleSetter::new(field(RocketComponent::launch_lug_mut, |l, v| l.thickness = v)));
        r.put(K::LaunchLug, "instancecount", IntSetter::<u32>(field(RocketComponent::launch_lug_mut, |l, v| l.instance_count = v)));
        r.put(K::LaunchLug, "instanceseparation", DoubleSetter::new(field(RocketComponent::launch_lug_mut, |l, v| l.instance_separation = v)));
        r.put(K::LaunchLug, "radialdirection", PositionSetter(Axis::Angular));
        r.put(K::LaunchLug, "angleoffset", PositionSetter(Axis::Angular));
        r.put(K::LaunchLug, "radiusoffset", PositionSetter(Axis::Radial));

        r.put(K::RailButton, "outerdiameter", DoubleSetter::new(field(RocketComponent::rail_button_mut, |b, v| b.outer_diameter = v)));
        r.put(K::RailButton, "innerdiameter", DoubleSetter::new(field(RocketComponent::rail_button_mut, |b, v| b.inner_diameter = v)));
        r.put(K::RailButton, "height", DoubleSetter::new(field(RocketComponent::rail_button_mut, |b, v| b.height = v)));
        r.put(K::RailButton, "baseheight", DoubleSetter::new(field(RocketComponent::rail_button_mut, |b, v| b.base_height = v)));
        r.put(K::RailButton, "instancecount", IntSetter::<u32>(field(RocketComponent::rail_button_mut, |b, v| b.instance_count = v)));
        r.put(K::RailButton, "instanceseparation", DoubleSetter::new(field(RocketComponent::rail_button_mut, |b, v| b.instance_separation = v)));
        r.put(K::RailButton, "angleoffset", PositionSetter(Axis::Angular));
        r.put(K::RailButton, "radiusoffset", PositionSetter(Axis::Radial));

        // internal components
        r.put(K::StructuralComponent, "material", bulk_material());
        r.put(K::RingComponent, "length", ring(|d, v| d.length = v));
        r.put(K::RingComponent, "radialposition", PositionSetter(Axis::Radial));
        r.put(K::RingComponent, "radialdirection", PositionSetter(Axis::Angular));
        r.put(K::RingComponent, "radiusoffset", PositionSetter(Axis::Radial));
        r.put(K::RingComponent, "angleoffset", PositionSetter(Axis::Angular));
        r.put(K::ThicknessRingComponent, "thickness", ring(|d, v| d.thickness = v));
        r.put(K::RadiusRingComponent, "innerradius", ring(|d, v| d.inner_radius = v));
        for kind in [K::EngineBlock, K::TubeCoupler, K::Bulkhead, K::CenteringRing] {
            r.put(kind, "outerradius", ring(|d, v| d.outer_radius = v).special("auto", auto_outer_radius()));
        }
        r.put(K::CenteringRing, "innerradius", ring(|d, v| d.inner_radius = v)
            .special("auto", field(RocketComponent::ring_mut, |d, v| d.inner_radius_auto = v)));
        r.put(K::InnerTube, "outerradius", ring(|d, v| d.outer_radius = v));
        r.put(K::InnerTube, "clusterconfiguration", ClusterConfigurationSetter);
        r.put(K::InnerTube, "clusterscale", DoubleSetter::new(field(RocketComponent::cluster_mut, |c, v| c.scale = v)));
        r.put(K::InnerTube, "clusterrotation", DoubleSetter::new(field(RocketComponent::cluster_mut, |c, v| c.rotation = v)).scaled(DEGREES));

        r.put(K::MassObject, "packedlength", DoubleSetter::new(field(RocketComponent::mass_object_mut, |m, v| m.packed_length = v)));
        r.put(K::MassObject, "packedradius", DoubleSetter::new(field(RocketComponent::mass_object_mut, |m, v| m.packed_radius = v)));
        r.put(K::MassObject, "radialposition", PositionSetter(Axis::Radial));
        r.put(K::MassObject, "radialdirection", PositionSetter(Axis::Angular));
        r.put(K::MassObject, "radiusoffset", PositionSetter(Axis::Radial));
        r.put(K::MassObject, "angleoffset", PositionSetter(Axis::Angular));
        r.put(K::MassComponent, "mass", DoubleSetter::new(field(RocketComponent::mass_component_mut, |m, v| m.mass = v)));
        r.put(K::MassComponent, "masscomponenttype", EnumSetter::<MassComponentType>(field(RocketComponent::mass_component_mut, |m, v| m.mass_type = v)));
        r.put(K::ShockCord, "cordlength", DoubleSetter::new(field(RocketComponent::shock_cord_mut, |s, v| s.cord_length = v)));
        r.put(K::ShockCord, "material", MaterialSetter {
            kind: MaterialType::Line,
            set: mutator(RocketComponent::set_material),
        });

        r.put(K::RecoveryDevice, "cd", DoubleSetter::new(field(RocketComponent::recovery_mut, |d, v| d.cd = v))
            .special("auto", field(RocketComponent::recovery_mut, |d, v| d.cd_auto = v)));
        r.put(K::RecoveryDevice, "deployevent", EnumSetter::<DeployEvent>(field(RocketComponent::deployment_mut, |d, v| d.default_value_mut().event = v)));
        r.put(K::RecoveryDevice, "deployaltitude", DoubleSetter::new(field(RocketComponent::deployment_mut, |d, v| d.default_value_mut().altitude = v)));
        r.put(K::RecoveryDevice, "deploydelay", DoubleSetter::new(field(RocketComponent::deployment_mut, |d, v| d.default_value_mut().delay = v)));
        r.put(K::RecoveryDevice, "material", MaterialSetter {
            kind: MaterialType::Surface,
            set: mutator(RocketComponent::set_material),
        });
        r.put(K::Parachute, "diameter", DoubleSetter::new(field(RocketComponent::parachute_mut, |p, v| p.diameter = v)));
        r.put(K::Parachute, "linecount", IntSetter::<u32>(field(RocketComponent::parachute_mut, |p, v| p.line_count = v)));
        r.put(K::Parachute, "linelength", DoubleSetter::new(field(RocketComponent::parachute_mut, |p, v| p.line_length = v)));
        r.put(K::Parachute, "linematerial", MaterialSetter {
            kind: MaterialType::Line,
            set: field(RocketComponent::parachute_mut, |p, v| p.line_material = v),
        });
        r.put(K::Streamer, "striplength", DoubleSetter::new(field(RocketComponent::streamer_mut, |s, v| s.strip_length = v)));
        r.put(K::Streamer, "stripwidth", DoubleSetter::new(field(RocketComponent::streamer_mut, |s, v| s.strip_width = v)));

        r.flatten();
        r
    }
}

fn bulk_material() -> MaterialSetter {
    MaterialSetter {
        kind: MaterialType::Bulk,
        set: mutator(RocketComponent::set_material),
    }
}

fn transition(set: fn(&mut crate::types::TransitionData, f64)) -> DoubleSetter {
    DoubleSetter::new(field(RocketComponent::transition_mut, set))
}

fn fins(set: fn(&mut crate::types::FinSetData, f64)) -> DoubleSetter {
    DoubleSetter::new(field(RocketComponent::fin_set_mut, set))
}

fn ring(set: fn(&mut crate::types::RingData, f64)) -> DoubleSetter {
    DoubleSetter::new(field(RocketComponent::ring_mut, set))
}

fn auto_outer_radius() -> Mutator<bool> {
    field(RocketComponent::ring_mut, |d, v| d.outer_radius_auto = v)
}
