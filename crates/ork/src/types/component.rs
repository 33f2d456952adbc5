use super::{
    AngleMethod, Appearance, AxialMethod, ClusterConfiguration, Color, ComponentId, ComponentPreset,
    ConfigurableSet, CrossSection, DeploymentConfiguration, Finish, IgnitionEvent, InsideAppearance,
    LineStyle, MassComponentType, Material, MotorConfiguration, RadiusMethod, ReferenceType,
    StageSeparationConfiguration, TabRelativePosition, TransitionShape,
};

/// Every component variant, including the abstract kinds that only exist
/// to share fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    RocketComponent,
    ComponentAssembly,
    Rocket,
    AxialStage,
    ParallelStage,
    PodSet,
    ExternalComponent,
    BodyComponent,
    SymmetricComponent,
    BodyTube,
    Transition,
    NoseCone,
    FinSet,
    TrapezoidFinSet,
    EllipticalFinSet,
    FreeformFinSet,
    TubeFinSet,
    LaunchLug,
    RailButton,
    InternalComponent,
    StructuralComponent,
    RingComponent,
    ThicknessRingComponent,
    RadiusRingComponent,
    EngineBlock,
    InnerTube,
    TubeCoupler,
    Bulkhead,
    CenteringRing,
    MassObject,
    MassComponent,
    ShockCord,
    RecoveryDevice,
    Parachute,
    Streamer,
}

impl ComponentKind {
    pub const ALL: &'static [ComponentKind] = &[
        Self::RocketComponent,
        Self::ComponentAssembly,
        Self::Rocket,
        Self::AxialStage,
        Self::ParallelStage,
        Self::PodSet,
        Self::ExternalComponent,
        Self::BodyComponent,
        Self::SymmetricComponent,
        Self::BodyTube,
        Self::Transition,
        Self::NoseCone,
        Self::FinSet,
        Self::TrapezoidFinSet,
        Self::EllipticalFinSet,
        Self::FreeformFinSet,
        Self::TubeFinSet,
        Self::LaunchLug,
        Self::RailButton,
        Self::InternalComponent,
        Self::StructuralComponent,
        Self::RingComponent,
        Self::ThicknessRingComponent,
        Self::RadiusRingComponent,
        Self::EngineBlock,
        Self::InnerTube,
        Self::TubeCoupler,
        Self::Bulkhead,
        Self::CenteringRing,
        Self::MassObject,
        Self::MassComponent,
        Self::ShockCord,
        Self::RecoveryDevice,
        Self::Parachute,
        Self::Streamer,
    ];

    /// The next more general kind.
    pub fn parent(self) -> Option<ComponentKind> {
        use ComponentKind::*;
        Some(match self {
            Self::RocketComponent => return None,
            ComponentAssembly | ExternalComponent | InternalComponent => Self::RocketComponent,
            Rocket | AxialStage | PodSet => ComponentAssembly,
            ParallelStage => AxialStage,
            BodyComponent | FinSet | TubeFinSet | LaunchLug | RailButton => ExternalComponent,
            SymmetricComponent => BodyComponent,
            BodyTube | Transition => SymmetricComponent,
            NoseCone => Transition,
            TrapezoidFinSet | EllipticalFinSet | FreeformFinSet => FinSet,
            StructuralComponent | MassObject => InternalComponent,
            RingComponent => StructuralComponent,
            ThicknessRingComponent | RadiusRingComponent => RingComponent,
            EngineBlock | InnerTube | TubeCoupler => ThicknessRingComponent,
            Bulkhead | CenteringRing => RadiusRingComponent,
            MassComponent | ShockCord | RecoveryDevice => MassObject,
            Parachute | Streamer => RecoveryDevice,
        })
    }

    /// This kind followed by all of its ancestors, most specific first.
    pub fn ancestry(self) -> impl Iterator<Item = ComponentKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    pub fn is_a(self, other: ComponentKind) -> bool {
        self.ancestry().any(|kind| kind == other)
    }

    pub fn is_abstract(self) -> bool {
        use ComponentKind::*;
        matches!(
            self,
            Self::RocketComponent
                | ComponentAssembly
                | ExternalComponent
                | BodyComponent
                | SymmetricComponent
                | FinSet
                | InternalComponent
                | StructuralComponent
                | RingComponent
                | ThicknessRingComponent
                | RadiusRingComponent
                | MassObject
                | RecoveryDevice
        )
    }

    /// Human readable name, also the default component name.
    pub fn display_name(self) -> &'static str {
        use ComponentKind::*;
        match self {
            Self::RocketComponent => "Component",
            ComponentAssembly => "Assembly",
            Rocket => "Rocket",
            AxialStage => "Stage",
            ParallelStage => "Booster",
            PodSet => "Pods",
            ExternalComponent => "External component",
            BodyComponent => "Body component",
            SymmetricComponent => "Symmetric component",
            BodyTube => "Body tube",
            Transition => "Transition",
            NoseCone => "Nose cone",
            FinSet => "Fin set",
            TrapezoidFinSet => "Trapezoidal fin set",
            EllipticalFinSet => "Elliptical fin set",
            FreeformFinSet => "Freeform fin set",
            TubeFinSet => "Tube fin set",
            LaunchLug => "Launch lug",
            RailButton => "Rail button",
            InternalComponent => "Internal component",
            StructuralComponent => "Structural component",
            RingComponent => "Ring",
            ThicknessRingComponent => "Ring",
            RadiusRingComponent => "Ring",
            EngineBlock => "Engine block",
            InnerTube => "Inner tube",
            TubeCoupler => "Tube coupler",
            Bulkhead => "Bulkhead",
            CenteringRing => "Centering ring",
            MassObject => "Mass object",
            MassComponent => "Mass component",
            ShockCord => "Shock cord",
            RecoveryDevice => "Recovery device",
            Parachute => "Parachute",
            Streamer => "Streamer",
        }
    }

    pub fn is_stage(self) -> bool {
        self.is_a(ComponentKind::AxialStage)
    }

    pub fn is_motor_mount(self) -> bool {
        matches!(self, ComponentKind::BodyTube | ComponentKind::InnerTube)
    }

    /// Whether components of this kind have a separately rendered inner surface.
    pub fn has_inside_surface(self) -> bool {
        use ComponentKind::*;
        self.is_a(SymmetricComponent)
            || self.is_a(FinSet)
            || matches!(self, TubeFinSet | LaunchLug | InnerTube | TubeCoupler | EngineBlock)
    }

    fn has_axial_offset(self) -> bool {
        !matches!(self, ComponentKind::Rocket | ComponentKind::AxialStage)
    }

    fn has_radial_offset(self) -> bool {
        use ComponentKind::*;
        matches!(self, ParallelStage | PodSet | LaunchLug | RailButton)
            || self.is_a(RingComponent)
            || self.is_a(MassObject)
    }

    fn has_angular_offset(self) -> bool {
        self.has_radial_offset()
            || self.is_a(ComponentKind::FinSet)
            || self == ComponentKind::TubeFinSet
    }

    fn default_material(self) -> Option<Material> {
        use ComponentKind::*;
        if self.is_a(RecoveryDevice) {
            Some(Material::default_surface())
        } else if self == ShockCord {
            Some(Material::default_line())
        } else if self.is_a(ExternalComponent) || self.is_a(StructuralComponent) {
            Some(Material::default_bulk())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxialOffset {
    pub method: AxialMethod,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialOffset {
    pub method: RadiusMethod,
    pub offset: f64,
}

/// Angular position; the offset is in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularOffset {
    pub method: AngleMethod,
    pub offset: f64,
}

/// A value that replaces the computed one when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Override {
    pub value: f64,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassOverrides {
    pub mass: Override,
    pub cg: Override,
    pub cd: Override,
    /// The overrides also cover all subcomponents.
    pub subcomponents: bool,
}

/// Motor-holding capability of body tubes and inner tubes.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorMount {
    pub active: bool,
    pub overhang: f64,
    /// Per-configuration motors; the default carries the mount-level
    /// ignition settings.
    pub motors: ConfigurableSet<MotorConfiguration>,
}

impl Default for MotorMount {
    fn default() -> Self {
        Self {
            active: false,
            overhang: 0.0,
            motors: ConfigurableSet::new(MotorConfiguration {
                ignition_event: IgnitionEvent::Automatic,
                ..Default::default()
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RocketData {
    pub designer: String,
    pub revision: String,
    pub reference_type: ReferenceType,
    pub custom_reference_length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PodData {
    pub instance_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageData {
    pub separation: ConfigurableSet<StageSeparationConfiguration>,
    /// Present on parallel stages (boosters).
    pub pods: Option<PodData>,
}

/// Fields shared by body tubes, transitions and nose cones.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricShell {
    pub length: f64,
    pub thickness: f64,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyTubeData {
    pub shell: SymmetricShell,
    pub outer_radius: f64,
    pub outer_radius_auto: bool,
    pub mount: MotorMount,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shoulder {
    pub radius: f64,
    pub length: f64,
    pub thickness: f64,
    pub capped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionData {
    pub shell: SymmetricShell,
    pub shape: TransitionShape,
    pub clipped: bool,
    pub shape_parameter: f64,
    pub fore_radius: f64,
    pub fore_radius_auto: bool,
    pub aft_radius: f64,
    pub aft_radius_auto: bool,
    pub fore_shoulder: Shoulder,
    pub aft_shoulder: Shoulder,
}

/// Planform corner of a freeform fin, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrapezoidShape {
    pub root_chord: f64,
    pub tip_chord: f64,
    pub sweep: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalShape {
    pub root_chord: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FinShape {
    Trapezoid(TrapezoidShape),
    Elliptical(EllipticalShape),
    Freeform(Vec<FinPoint>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinSetData {
    pub fin_count: u32,
    pub base_rotation: f64,
    pub thickness: f64,
    pub cross_section: CrossSection,
    pub cant_angle: f64,
    pub tab_height: f64,
    pub tab_length: f64,
    pub tab_offset: f64,
    pub tab_relative_to: TabRelativePosition,
    pub fillet_radius: f64,
    pub fillet_material: Material,
    pub shape: FinShape,
}

impl FinSetData {
    pub fn points(&self) -> Option<&[FinPoint]> {
        match &self.shape {
            FinShape::Freeform(points) => Some(points),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TubeFinSetData {
    pub fin_count: u32,
    pub base_rotation: f64,
    pub thickness: f64,
    pub length: f64,
    pub outer_radius: f64,
    pub outer_radius_auto: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchLugData {
    pub outer_radius: f64,
    pub length: f64,
    pub thickness: f64,
    pub instance_count: u32,
    pub instance_separation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailButtonData {
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub height: f64,
    pub base_height: f64,
    pub instance_count: u32,
    pub instance_separation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterData {
    pub configuration: ClusterConfiguration,
    pub scale: f64,
    pub rotation: f64,
}

/// Engine blocks, inner tubes, tube couplers, bulkheads and centering rings.
#[derive(Debug, Clone, PartialEq)]
pub struct RingData {
    pub length: f64,
    pub outer_radius: f64,
    pub outer_radius_auto: bool,
    pub inner_radius: f64,
    pub inner_radius_auto: bool,
    pub thickness: f64,
    /// Inner tubes only.
    pub cluster: Option<ClusterData>,
    /// Inner tubes only.
    pub mount: Option<MotorMount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassComponentData {
    pub mass: f64,
    pub mass_type: MassComponentType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShockCordData {
    pub cord_length: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParachuteData {
    pub diameter: f64,
    pub line_count: u32,
    pub line_length: f64,
    pub line_material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamerData {
    pub strip_length: f64,
    pub strip_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryShape {
    Parachute(ParachuteData),
    Streamer(StreamerData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryData {
    pub cd: f64,
    pub cd_auto: bool,
    pub deployment: ConfigurableSet<DeploymentConfiguration>,
    pub shape: RecoveryShape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MassDetail {
    Mass(MassComponentData),
    ShockCord(ShockCordData),
    Recovery(RecoveryData),
}

/// Mass components, shock cords, parachutes and streamers.
#[derive(Debug, Clone, PartialEq)]
pub struct MassObjectData {
    pub packed_length: f64,
    pub packed_radius: f64,
    pub detail: MassDetail,
}

/// Fields specific to a component variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentData {
    Rocket(RocketData),
    Stage(StageData),
    PodSet(PodData),
    BodyTube(BodyTubeData),
    Transition(TransitionData),
    FinSet(FinSetData),
    TubeFinSet(TubeFinSetData),
    LaunchLug(LaunchLugData),
    RailButton(RailButtonData),
    Ring(RingData),
    MassObject(MassObjectData),
}

impl ComponentData {
    fn for_kind(kind: ComponentKind) -> Self {
        use ComponentKind::*;
        let shell = |length: f64| SymmetricShell {
            length,
            thickness: 0.002,
            filled: false,
        };
        match kind {
            Rocket => Self::Rocket(RocketData {
                designer: String::new(),
                revision: String::new(),
                reference_type: ReferenceType::default(),
                custom_reference_length: 0.01,
            }),
            AxialStage => Self::Stage(StageData {
                separation: ConfigurableSet::new(StageSeparationConfiguration::default()),
                pods: None,
            }),
            ParallelStage => Self::Stage(StageData {
                separation: ConfigurableSet::new(StageSeparationConfiguration::default()),
                pods: Some(PodData { instance_count: 2 }),
            }),
            PodSet => Self::PodSet(PodData { instance_count: 2 }),
            BodyTube => Self::BodyTube(BodyTubeData {
                shell: shell(0.3),
                outer_radius: 0.0125,
                outer_radius_auto: false,
                mount: MotorMount::default(),
            }),
            Transition | NoseCone => {
                let nose = kind == NoseCone;
                Self::Transition(TransitionData {
                    shell: shell(if nose { 0.15 } else { 0.1 }),
                    shape: if nose {
                        TransitionShape::Ogive
                    } else {
                        TransitionShape::Conical
                    },
                    clipped: true,
                    shape_parameter: if nose { 1.0 } else { 0.0 },
                    fore_radius: if nose { 0.0 } else { 0.025 },
                    fore_radius_auto: !nose,
                    aft_radius: 0.0125,
                    aft_radius_auto: true,
                    fore_shoulder: Shoulder::default(),
                    aft_shoulder: Shoulder::default(),
                })
            }
            TrapezoidFinSet | EllipticalFinSet | FreeformFinSet => {
                let shape = match kind {
                    TrapezoidFinSet => FinShape::Trapezoid(TrapezoidShape {
                        root_chord: 0.05,
                        tip_chord: 0.05,
                        sweep: 0.025,
                        height: 0.05,
                    }),
                    EllipticalFinSet => FinShape::Elliptical(EllipticalShape {
                        root_chord: 0.05,
                        height: 0.05,
                    }),
                    _ => FinShape::Freeform(vec![
                        FinPoint { x: 0.0, y: 0.0 },
                        FinPoint { x: 0.025, y: 0.05 },
                        FinPoint { x: 0.075, y: 0.03 },
                        FinPoint { x: 0.05, y: 0.0 },
                    ]),
                };
                Self::FinSet(FinSetData {
                    fin_count: 3,
                    base_rotation: 0.0,
                    thickness: 0.003,
                    cross_section: CrossSection::default(),
                    cant_angle: 0.0,
                    tab_height: 0.0,
                    tab_length: 0.0,
                    tab_offset: 0.0,
                    tab_relative_to: TabRelativePosition::default(),
                    fillet_radius: 0.0,
                    fillet_material: Material::default_bulk(),
                    shape,
                })
            }
            TubeFinSet => Self::TubeFinSet(TubeFinSetData {
                fin_count: 6,
                base_rotation: 0.0,
                thickness: 0.002,
                length: 0.08,
                outer_radius: 0.025,
                outer_radius_auto: true,
            }),
            LaunchLug => Self::LaunchLug(LaunchLugData {
                outer_radius: 0.01 / 2.0,
                length: 0.03,
                thickness: 0.001,
                instance_count: 1,
                instance_separation: 0.0,
            }),
            RailButton => Self::RailButton(RailButtonData {
                outer_diameter: 0.0097,
                inner_diameter: 0.008,
                height: 0.0097,
                base_height: 0.002,
                instance_count: 1,
                instance_separation: 0.5,
            }),
            EngineBlock | InnerTube | TubeCoupler | Bulkhead | CenteringRing => {
                let (length, thickness) = match kind {
                    InnerTube => (0.07, 0.0005),
                    TubeCoupler => (0.06, 0.0005),
                    EngineBlock => (0.005, 0.005),
                    _ => (0.002, 0.0),
                };
                Self::Ring(RingData {
                    length,
                    outer_radius: 0.025,
                    outer_radius_auto: kind != InnerTube,
                    inner_radius: 0.0,
                    inner_radius_auto: kind == CenteringRing,
                    thickness,
                    cluster: (kind == InnerTube).then(|| ClusterData {
                        configuration: ClusterConfiguration::Single,
                        scale: 1.0,
                        rotation: 0.0,
                    }),
                    mount: (kind == InnerTube).then(MotorMount::default),
                })
            }
            MassComponent => Self::MassObject(MassObjectData {
                packed_length: 0.025,
                packed_radius: 0.0125,
                detail: MassDetail::Mass(MassComponentData {
                    mass: 0.025,
                    mass_type: MassComponentType::default(),
                }),
            }),
            ShockCord => Self::MassObject(MassObjectData {
                packed_length: 0.05,
                packed_radius: 0.0125,
                detail: MassDetail::ShockCord(ShockCordData { cord_length: 0.4 }),
            }),
            Parachute | Streamer => {
                let shape = if kind == Parachute {
                    RecoveryShape::Parachute(ParachuteData {
                        diameter: 0.3,
                        line_count: 6,
                        line_length: 0.3,
                        line_material: Material::default_line(),
                    })
                } else {
                    RecoveryShape::Streamer(StreamerData {
                        strip_length: 0.5,
                        strip_width: 0.05,
                    })
                };
                Self::MassObject(MassObjectData {
                    packed_length: 0.025,
                    packed_radius: 0.0125,
                    detail: MassDetail::Recovery(RecoveryData {
                        cd: if kind == Parachute { 0.8 } else { 0.6 },
                        cd_auto: true,
                        deployment: ConfigurableSet::new(DeploymentConfiguration::default()),
                        shape,
                    }),
                })
            }
            // abstract kinds fall back to an empty assembly
            _ => Self::PodSet(PodData { instance_count: 1 }),
        }
    }
}

/// A node of the design tree.
///
/// Fields that only some kinds have are `Option`s; `None` means the kind
/// lacks the capability. Geometry reached through the `*_mut` accessors
/// counts as an edit and clears a loaded preset unless auto-clearing is
/// switched off.
#[derive(Debug, Clone, PartialEq)]
pub struct RocketComponent {
    kind: ComponentKind,
    pub id: ComponentId,
    pub name: String,
    pub comment: String,
    pub color: Option<Color>,
    pub line_style: Option<LineStyle>,
    pub appearance: Option<Appearance>,
    inside_appearance: Option<InsideAppearance>,
    axial: Option<AxialOffset>,
    radial: Option<RadialOffset>,
    angular: Option<AngularOffset>,
    pub overrides: MassOverrides,
    /// `None` for kinds without a surface finish.
    pub finish: Option<Finish>,
    material: Option<Material>,
    preset: Option<ComponentPreset>,
    auto_clear_preset: bool,
    data: ComponentData,
}

impl RocketComponent {
    /// A component of a concrete kind with default values.
    pub fn new(kind: ComponentKind) -> Self {
        debug_assert!(!kind.is_abstract(), "cannot construct abstract kind {kind:?}");
        Self {
            kind,
            id: ComponentId::new(),
            name: kind.display_name().to_string(),
            comment: String::new(),
            color: None,
            line_style: None,
            appearance: None,
            inside_appearance: None,
            axial: kind.has_axial_offset().then(AxialOffset::default),
            radial: kind.has_radial_offset().then(RadialOffset::default),
            angular: kind.has_angular_offset().then(AngularOffset::default),
            overrides: MassOverrides::default(),
            finish: kind.is_a(ComponentKind::ExternalComponent).then(Finish::default),
            material: kind.default_material(),
            preset: None,
            auto_clear_preset: true,
            data: ComponentData::for_kind(kind),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn data(&self) -> &ComponentData {
        &self.data
    }

    /// Mutable access to the variant data; counts as a geometry edit.
    pub fn data_mut(&mut self) -> &mut ComponentData {
        self.edited();
        &mut self.data
    }

    fn edited(&mut self) {
        if self.auto_clear_preset && self.preset.take().is_some() {
            log::trace!("{}: preset cleared by edit", self.name);
        }
    }

    pub fn auto_clear_preset(&self) -> bool {
        self.auto_clear_preset
    }

    pub fn set_auto_clear_preset(&mut self, enabled: bool) {
        self.auto_clear_preset = enabled;
    }

    pub fn preset(&self) -> Option<&ComponentPreset> {
        self.preset.as_ref()
    }

    pub fn clear_preset(&mut self) {
        self.preset = None;
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Returns `None` if the kind has no material.
    pub fn set_material(&mut self, material: Material) -> Option<()> {
        self.material.as_ref()?;
        self.edited();
        self.material = Some(material);
        Some(())
    }

    pub fn inside_appearance(&self) -> Option<&InsideAppearance> {
        self.inside_appearance.as_ref()
    }

    /// Returns `None` if the kind has no inner surface.
    pub fn set_inside_appearance(&mut self, appearance: InsideAppearance) -> Option<()> {
        if !self.kind.has_inside_surface() {
            return None;
        }
        self.inside_appearance = Some(appearance);
        Some(())
    }

    pub fn axial(&self) -> Option<&AxialOffset> {
        self.axial.as_ref()
    }

    pub fn axial_mut(&mut self) -> Option<&mut AxialOffset> {
        self.axial.as_mut()
    }

    pub fn radial(&self) -> Option<&RadialOffset> {
        self.radial.as_ref()
    }

    pub fn radial_mut(&mut self) -> Option<&mut RadialOffset> {
        self.radial.as_mut()
    }

    pub fn angular(&self) -> Option<&AngularOffset> {
        self.angular.as_ref()
    }

    pub fn angular_mut(&mut self) -> Option<&mut AngularOffset> {
        self.angular.as_mut()
    }

    pub fn motor_mount(&self) -> Option<&MotorMount> {
        match &self.data {
            ComponentData::BodyTube(tube) => Some(&tube.mount),
            ComponentData::Ring(ring) => ring.mount.as_ref(),
            _ => None,
        }
    }

    pub fn motor_mount_mut(&mut self) -> Option<&mut MotorMount> {
        match &mut self.data {
            ComponentData::BodyTube(tube) => Some(&mut tube.mount),
            ComponentData::Ring(ring) => ring.mount.as_mut(),
            _ => None,
        }
    }

    pub fn deployment(&self) -> Option<&ConfigurableSet<DeploymentConfiguration>> {
        match &self.data {
            ComponentData::MassObject(MassObjectData {
                detail: MassDetail::Recovery(recovery),
                ..
            }) => Some(&recovery.deployment),
            _ => None,
        }
    }

    pub fn deployment_mut(&mut self) -> Option<&mut ConfigurableSet<DeploymentConfiguration>> {
        match &mut self.data {
            ComponentData::MassObject(MassObjectData {
                detail: MassDetail::Recovery(recovery),
                ..
            }) => Some(&mut recovery.deployment),
            _ => None,
        }
    }

    pub fn separation(&self) -> Option<&ConfigurableSet<StageSeparationConfiguration>> {
        match &self.data {
            ComponentData::Stage(stage) => Some(&stage.separation),
            _ => None,
        }
    }

    pub fn separation_mut(&mut self) -> Option<&mut ConfigurableSet<StageSeparationConfiguration>> {
        match &mut self.data {
            ComponentData::Stage(stage) => Some(&mut stage.separation),
            _ => None,
        }
    }

    pub fn rocket_mut(&mut self) -> Option<&mut RocketData> {
        match &mut self.data {
            ComponentData::Rocket(rocket) => Some(rocket),
            _ => None,
        }
    }

    /// Pod instance data of pod sets and parallel stages.
    pub fn pods_mut(&mut self) -> Option<&mut PodData> {
        self.edited();
        match &mut self.data {
            ComponentData::PodSet(pods) => Some(pods),
            ComponentData::Stage(stage) => stage.pods.as_mut(),
            _ => None,
        }
    }

    pub fn shell_mut(&mut self) -> Option<&mut SymmetricShell> {
        self.edited();
        match &mut self.data {
            ComponentData::BodyTube(tube) => Some(&mut tube.shell),
            ComponentData::Transition(transition) => Some(&mut transition.shell),
            _ => None,
        }
    }

    pub fn body_tube_mut(&mut self) -> Option<&mut BodyTubeData> {
        self.edited();
        match &mut self.data {
            ComponentData::BodyTube(tube) => Some(tube),
            _ => None,
        }
    }

    pub fn transition_mut(&mut self) -> Option<&mut TransitionData> {
        self.edited();
        match &mut self.data {
            ComponentData::Transition(transition) => Some(transition),
            _ => None,
        }
    }

    pub fn fin_set_mut(&mut self) -> Option<&mut FinSetData> {
        self.edited();
        match &mut self.data {
            ComponentData::FinSet(fins) => Some(fins),
            _ => None,
        }
    }

    pub fn trapezoid_mut(&mut self) -> Option<&mut TrapezoidShape> {
        match &mut self.fin_set_mut()?.shape {
            FinShape::Trapezoid(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn elliptical_mut(&mut self) -> Option<&mut EllipticalShape> {
        match &mut self.fin_set_mut()?.shape {
            FinShape::Elliptical(shape) => Some(shape),
            _ => None,
        }
    }

    /// Replace the planform of a freeform fin set.
    pub fn set_fin_points(&mut self, points: Vec<FinPoint>) -> Option<()> {
        match &mut self.fin_set_mut()?.shape {
            FinShape::Freeform(existing) => {
                *existing = points;
                Some(())
            }
            _ => None,
        }
    }

    pub fn tube_fin_set_mut(&mut self) -> Option<&mut TubeFinSetData> {
        self.edited();
        match &mut self.data {
            ComponentData::TubeFinSet(fins) => Some(fins),
            _ => None,
        }
    }

    pub fn launch_lug_mut(&mut self) -> Option<&mut LaunchLugData> {
        self.edited();
        match &mut self.data {
            ComponentData::LaunchLug(lug) => Some(lug),
            _ => None,
        }
    }

    pub fn rail_button_mut(&mut self) -> Option<&mut RailButtonData> {
        self.edited();
        match &mut self.data {
            ComponentData::RailButton(button) => Some(button),
            _ => None,
        }
    }

    pub fn ring_mut(&mut self) -> Option<&mut RingData> {
        self.edited();
        match &mut self.data {
            ComponentData::Ring(ring) => Some(ring),
            _ => None,
        }
    }

    pub fn cluster_mut(&mut self) -> Option<&mut ClusterData> {
        self.ring_mut()?.cluster.as_mut()
    }

    pub fn mass_object_mut(&mut self) -> Option<&mut MassObjectData> {
        self.edited();
        match &mut self.data {
            ComponentData::MassObject(mass) => Some(mass),
            _ => None,
        }
    }

    pub fn mass_component_mut(&mut self) -> Option<&mut MassComponentData> {
        match &mut self.mass_object_mut()?.detail {
            MassDetail::Mass(mass) => Some(mass),
            _ => None,
        }
    }

    pub fn shock_cord_mut(&mut self) -> Option<&mut ShockCordData> {
        match &mut self.mass_object_mut()?.detail {
            MassDetail::ShockCord(cord) => Some(cord),
            _ => None,
        }
    }

    pub fn recovery_mut(&mut self) -> Option<&mut RecoveryData> {
        match &mut self.mass_object_mut()?.detail {
            MassDetail::Recovery(recovery) => Some(recovery),
            _ => None,
        }
    }

    pub fn parachute_mut(&mut self) -> Option<&mut ParachuteData> {
        match &mut self.recovery_mut()?.shape {
            RecoveryShape::Parachute(chute) => Some(chute),
            _ => None,
        }
    }

    pub fn streamer_mut(&mut self) -> Option<&mut StreamerData> {
        match &mut self.recovery_mut()?.shape {
            RecoveryShape::Streamer(streamer) => Some(streamer),
            _ => None,
        }
    }

    /// Load the geometry, mass and material a preset carries.
    ///
    /// The preset becomes the component's current preset and its description
    /// becomes the component name. Returns `false` without changes if the
    /// preset is for a different kind.
    pub fn load_preset(&mut self, preset: &ComponentPreset) -> bool {
        if preset.kind.component_kind() != self.kind {
            return false;
        }
        let props = &preset.properties;
        let radius = |diameter: Option<f64>| diameter.map(|d| d / 2.0);

        match &mut self.data {
            ComponentData::BodyTube(tube) => {
                set_opt(&mut tube.shell.length, props.length);
                if let Some(r) = radius(props.outer_diameter) {
                    tube.outer_radius = r;
                    tube.outer_radius_auto = false;
                }
                if let (Some(od), Some(id)) = (props.outer_diameter, props.inner_diameter) {
                    tube.shell.thickness = (od - id) / 2.0;
                }
            }
            ComponentData::Transition(transition) => {
                set_opt(&mut transition.shell.length, props.length);
                set_opt(&mut transition.shell.thickness, props.thickness);
                if let Some(shape) = props.shape {
                    transition.shape = shape;
                }
                if let Some(r) = radius(props.fore_outer_diameter) {
                    transition.fore_radius = r;
                    transition.fore_radius_auto = false;
                }
                if let Some(r) = radius(props.aft_outer_diameter.or(props.outer_diameter)) {
                    transition.aft_radius = r;
                    transition.aft_radius_auto = false;
                }
            }
            ComponentData::Ring(ring) => {
                set_opt(&mut ring.length, props.length);
                if let Some(r) = radius(props.outer_diameter) {
                    ring.outer_radius = r;
                    ring.outer_radius_auto = false;
                }
                if let Some(r) = radius(props.inner_diameter) {
                    ring.inner_radius = r;
                    ring.inner_radius_auto = false;
                    ring.thickness = (ring.outer_radius - r).max(0.0);
                }
            }
            ComponentData::LaunchLug(lug) => {
                set_opt(&mut lug.length, props.length);
                set_opt(&mut lug.outer_radius, radius(props.outer_diameter));
                if let (Some(od), Some(id)) = (props.outer_diameter, props.inner_diameter) {
                    lug.thickness = (od - id) / 2.0;
                }
            }
            ComponentData::RailButton(button) => {
                set_opt(&mut button.outer_diameter, props.outer_diameter);
                set_opt(&mut button.inner_diameter, props.inner_diameter);
                set_opt(&mut button.height, props.length);
            }
            ComponentData::MassObject(MassObjectData {
                detail: MassDetail::Recovery(recovery),
                ..
            }) => match &mut recovery.shape {
                RecoveryShape::Parachute(chute) => {
                    set_opt(&mut chute.diameter, props.diameter);
                    set_opt(&mut chute.line_length, props.line_length);
                    if let Some(count) = props.line_count {
                        chute.line_count = count;
                    }
                }
                RecoveryShape::Streamer(streamer) => {
                    set_opt(&mut streamer.strip_length, props.strip_length);
                    set_opt(&mut streamer.strip_width, props.strip_width);
                }
            },
            _ => {}
        }

        if let Some(mass) = props.mass {
            self.overrides.mass = Override {
                value: mass,
                enabled: true,
            };
        }
        if let Some(material) = &props.material
            && self.material.is_some()
        {
            self.material = Some(material.clone());
        }
        self.name = preset
            .description
            .clone()
            .unwrap_or_else(|| format!("{} {}", preset.manufacturer, preset.part_no));
        self.preset = Some(preset.clone());
        true
    }
}

fn set_opt(field: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PresetProperties, PresetType};

    #[test]
    fn hierarchy_is_rooted() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.ancestry().last(), Some(ComponentKind::RocketComponent));
        }
        assert!(ComponentKind::NoseCone.is_a(ComponentKind::Transition));
        assert!(ComponentKind::ParallelStage.is_stage());
        assert!(!ComponentKind::PodSet.is_stage());
    }

    #[test]
    fn capabilities_follow_kind() {
        let tube = RocketComponent::new(ComponentKind::BodyTube);
        assert!(tube.axial().is_some());
        assert!(tube.radial().is_none());
        assert!(tube.motor_mount().is_some());
        assert!(tube.finish.is_some());

        let ring = RocketComponent::new(ComponentKind::CenteringRing);
        assert!(ring.axial().is_some());
        assert!(ring.radial().is_some());
        assert!(ring.motor_mount().is_none());

        let stage = RocketComponent::new(ComponentKind::AxialStage);
        assert!(stage.axial().is_none());

        let fins = RocketComponent::new(ComponentKind::TrapezoidFinSet);
        assert!(fins.angular().is_some());
        assert!(fins.radial().is_none());
    }

    fn tube_preset() -> ComponentPreset {
        ComponentPreset::new(
            PresetType::BodyTube,
            "Estes",
            "BT-50",
            Some("BT-50 body tube".into()),
            PresetProperties {
                length: Some(0.457),
                outer_diameter: Some(0.0248),
                inner_diameter: Some(0.0241),
                ..Default::default()
            },
        )
    }

    #[test]
    fn edit_clears_preset_unless_disabled() {
        let mut tube = RocketComponent::new(ComponentKind::BodyTube);
        assert!(tube.load_preset(&tube_preset()));
        assert_eq!(tube.name, "BT-50 body tube");

        tube.set_auto_clear_preset(false);
        tube.shell_mut().unwrap().length = 0.5;
        assert!(tube.preset().is_some());

        tube.set_auto_clear_preset(true);
        tube.shell_mut().unwrap().length = 0.6;
        assert!(tube.preset().is_none());
    }

    #[test]
    fn preset_of_other_kind_is_rejected() {
        let mut ring = RocketComponent::new(ComponentKind::CenteringRing);
        assert!(!ring.load_preset(&tube_preset()));
        assert!(ring.preset().is_none());
    }

    #[test]
    fn configuration_maps_do_not_clear_preset() {
        let mut tube = RocketComponent::new(ComponentKind::BodyTube);
        tube.load_preset(&tube_preset());
        tube.motor_mount_mut().unwrap().active = true;
        assert!(tube.preset().is_some());
    }
}
