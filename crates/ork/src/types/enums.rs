/// An enumeration whose values appear in design files by name.
///
/// The file format writes enum values as their lower-cased names with
/// underscores removed (`REGULAR_PAINT` becomes `regularpaint`). Reading is
/// lenient: case, underscores, dashes and spaces are all ignored when
/// matching.
pub trait XmlEnum: Sized + Copy + 'static {
    /// Every value, in declaration order.
    const ALL: &'static [Self];

    /// Canonical upper-case name, e.g. `REGULAR_PAINT`.
    fn name(self) -> &'static str;

    /// The form written to design files, e.g. `regularpaint`.
    fn xml_name(self) -> String {
        normalize(self.name())
    }

    /// Look up a value from its file representation.
    fn from_xml(value: &str) -> Option<Self> {
        let wanted = normalize(value);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| normalize(candidate.name()) == wanted)
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! xml_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::types::XmlEnum for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }
    };
}

xml_enum! {
    #[derive(Default)]
    pub enum LineStyle {
        #[default]
        Solid = "SOLID",
        Dashed = "DASHED",
        Dotted = "DOTTED",
        DashDotted = "DASHDOTTED",
    }
}

xml_enum! {
    /// Surface finish of external components.
    #[derive(Default)]
    pub enum Finish {
        Rough = "ROUGH",
        Unfinished = "UNFINISHED",
        #[default]
        Normal = "NORMAL",
        RegularPaint = "REGULAR_PAINT",
        SmoothPaint = "SMOOTH_PAINT",
        Polished = "POLISHED",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum TransitionShape {
        #[default]
        Conical = "CONICAL",
        Ogive = "OGIVE",
        Ellipsoid = "ELLIPSOID",
        Power = "POWER",
        Parabolic = "PARABOLIC",
        Haack = "HAACK",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum CrossSection {
        Square = "SQUARE",
        #[default]
        Rounded = "ROUNDED",
        Airfoil = "AIRFOIL",
    }
}

xml_enum! {
    /// Reference point of the fin tab offset.
    #[derive(Default)]
    pub enum TabRelativePosition {
        Front = "FRONT",
        #[default]
        Center = "CENTER",
        End = "END",
    }
}

impl TabRelativePosition {
    /// Accepts the current names and the axial-method spellings newer files use.
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_xml(value).or_else(|| match AxialMethod::from_xml(value)? {
            AxialMethod::Top => Some(Self::Front),
            AxialMethod::Middle => Some(Self::Center),
            AxialMethod::Bottom => Some(Self::End),
            _ => None,
        })
    }
}

xml_enum! {
    /// Reference frame of an axial offset.
    #[derive(Default)]
    pub enum AxialMethod {
        Absolute = "ABSOLUTE",
        After = "AFTER",
        #[default]
        Top = "TOP",
        Middle = "MIDDLE",
        Bottom = "BOTTOM",
    }
}

xml_enum! {
    /// Reference frame of a radial offset.
    #[derive(Default)]
    pub enum RadiusMethod {
        Free = "FREE",
        Coaxial = "COAXIAL",
        #[default]
        Surface = "SURFACE",
        Relative = "RELATIVE",
    }
}

xml_enum! {
    /// Reference frame of an angular offset.
    #[derive(Default)]
    pub enum AngleMethod {
        #[default]
        Relative = "RELATIVE",
        Fixed = "FIXED",
        Mirror = "MIRROR",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum ReferenceType {
        Nosecone = "NOSECONE",
        #[default]
        Maximum = "MAXIMUM",
        Custom = "CUSTOM",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum MassComponentType {
        #[default]
        MassComponent = "MASSCOMPONENT",
        Altimeter = "ALTIMETER",
        FlightComputer = "FLIGHTCOMPUTER",
        DeploymentCharge = "DEPLOYMENTCHARGE",
        Tracker = "TRACKER",
        Payload = "PAYLOAD",
        RecoveryHardware = "RECOVERYHARDWARE",
        Battery = "BATTERY",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum DeployEvent {
        Launch = "LAUNCH",
        #[default]
        Ejection = "EJECTION",
        Apogee = "APOGEE",
        Altitude = "ALTITUDE",
        CurrentStage = "CURRENT_STAGE",
        LowerStage = "LOWER_STAGE",
        Never = "NEVER",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum SeparationEvent {
        #[default]
        UpperIgnition = "UPPER_IGNITION",
        Ignition = "IGNITION",
        Burnout = "BURNOUT",
        Ejection = "EJECTION",
        Launch = "LAUNCH",
        Never = "NEVER",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum IgnitionEvent {
        #[default]
        Automatic = "AUTOMATIC",
        Launch = "LAUNCH",
        EjectionCharge = "EJECTION_CHARGE",
        Burnout = "BURNOUT",
        Never = "NEVER",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum MotorType {
        Single = "SINGLE",
        Reload = "RELOAD",
        Hybrid = "HYBRID",
        #[default]
        Unknown = "UNKNOWN",
    }
}

xml_enum! {
    /// How a decal image is extended past its edges.
    #[derive(Default)]
    pub enum EdgeMode {
        Repeat = "REPEAT",
        Mirror = "MIRROR",
        Clamp = "CLAMP",
        #[default]
        Sticker = "STICKER",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum SimulationStatus {
        #[default]
        NotSimulated = "NOT_SIMULATED",
        UpToDate = "UPTODATE",
        Loaded = "LOADED",
        Outdated = "OUTDATED",
        External = "EXTERNAL",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum GeodeticMethod {
        #[default]
        Flat = "FLAT",
        Spherical = "SPHERICAL",
        Wgs84 = "WGS84",
    }
}

xml_enum! {
    #[derive(Default)]
    pub enum WindModelType {
        #[default]
        Average = "AVERAGE",
        Multilevel = "MULTI_LEVEL",
    }
}

xml_enum! {
    /// Altitude datum of multi-level wind data.
    #[derive(Default)]
    pub enum AltitudeReference {
        #[default]
        Msl = "MSL",
        Agl = "AGL",
    }
}

xml_enum! {
    pub enum FlightEventType {
        Launch = "LAUNCH",
        Ignition = "IGNITION",
        Liftoff = "LIFTOFF",
        LaunchRod = "LAUNCHROD",
        Burnout = "BURNOUT",
        EjectionCharge = "EJECTION_CHARGE",
        StageSeparation = "STAGE_SEPARATION",
        Apogee = "APOGEE",
        RecoveryDeviceDeployment = "RECOVERY_DEVICE_DEPLOYMENT",
        GroundHit = "GROUND_HIT",
        SimulationEnd = "SIMULATION_END",
        Altitude = "ALTITUDE",
        Tumble = "TUMBLE",
        SimWarn = "SIM_WARN",
        SimAbort = "SIM_ABORT",
        Exception = "EXCEPTION",
    }
}

xml_enum! {
    /// Reason a simulation stopped early.
    pub enum AbortCause {
        NoMotorsDefined = "NO_MOTORS_DEFINED",
        NoConfiguredMotors = "NO_CONFIGURED_MOTORS",
        NoWarmupIgnition = "NO_WARMUP_IGNITION",
        NoLiftoff = "NO_LIFTOFF",
        NoActiveStage = "NO_ACTIVE_STAGE",
        ActiveMassZero = "ACTIVE_MASS_ZERO",
        ActiveLengthZero = "ACTIVE_LENGTH_ZERO",
        TumbleUnderThrust = "TUMBLE_UNDER_THRUST",
        NoCdAtZeroMach = "NO_CD_AT_ZERO_MACH",
    }
}

xml_enum! {
    #[derive(Default, PartialOrd, Ord)]
    pub enum Priority {
        Low = "LOW",
        #[default]
        Normal = "NORMAL",
        High = "HIGH",
    }
}

xml_enum! {
    /// Which material database a material belongs to.
    pub enum MaterialType {
        Bulk = "BULK",
        Surface = "SURFACE",
        Line = "LINE",
    }
}

xml_enum! {
    /// Component family a preset describes.
    pub enum PresetType {
        BodyTube = "BODY_TUBE",
        NoseCone = "NOSE_CONE",
        Transition = "TRANSITION",
        TubeCoupler = "TUBE_COUPLER",
        Bulkhead = "BULK_HEAD",
        CenteringRing = "CENTERING_RING",
        EngineBlock = "ENGINE_BLOCK",
        LaunchLug = "LAUNCH_LUG",
        RailButton = "RAIL_BUTTON",
        Streamer = "STREAMER",
        Parachute = "PARACHUTE",
    }
}

/// Arrangement of motor tubes in a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClusterConfiguration {
    #[default]
    Single,
    Double,
    ThreeRow,
    ThreeRing,
    FourLine,
    FourRing,
    FiveRing,
    SixRing,
    SixRow,
    SevenRing,
    EightRing,
    NineRing,
    NineSquare,
    TwelveRing,
}

impl ClusterConfiguration {
    const XML_NAMES: &'static [(Self, &'static str)] = &[
        (Self::Single, "single"),
        (Self::Double, "double"),
        (Self::ThreeRow, "3-row"),
        (Self::ThreeRing, "3-ring"),
        (Self::FourLine, "4-line"),
        (Self::FourRing, "4-ring"),
        (Self::FiveRing, "5-ring"),
        (Self::SixRing, "6-ring"),
        (Self::SixRow, "6-row"),
        (Self::SevenRing, "7-ring"),
        (Self::EightRing, "8-ring"),
        (Self::NineRing, "9-ring"),
        (Self::NineSquare, "9-square"),
        (Self::TwelveRing, "12-ring"),
    ];

    pub fn from_xml_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::XML_NAMES
            .iter()
            .find(|(_, xml)| *xml == name)
            .map(|(config, _)| *config)
    }

    pub fn xml_name(self) -> &'static str {
        Self::XML_NAMES
            .iter()
            .find(|(config, _)| *config == self)
            .map(|(_, xml)| *xml)
            .unwrap_or("single")
    }

    /// Number of motor tubes in the cluster.
    pub fn count(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::ThreeRow | Self::ThreeRing => 3,
            Self::FourLine | Self::FourRing => 4,
            Self::FiveRing => 5,
            Self::SixRing | Self::SixRow => 6,
            Self::SevenRing => 7,
            Self::EightRing => 8,
            Self::NineRing | Self::NineSquare => 9,
            Self::TwelveRing => 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_file_spelling() {
        assert_eq!(Finish::from_xml("regularpaint"), Some(Finish::RegularPaint));
        assert_eq!(Finish::from_xml("  Smooth_Paint "), Some(Finish::SmoothPaint));
        assert_eq!(Finish::from_xml("glossy"), None);
        assert_eq!(Finish::from_xml(""), None);
    }

    #[test]
    fn xml_name_strips_underscores() {
        assert_eq!(DeployEvent::LowerStage.xml_name(), "lowerstage");
        assert_eq!(
            FlightEventType::from_xml("recoverydevicedeployment"),
            Some(FlightEventType::RecoveryDeviceDeployment)
        );
    }

    #[test]
    fn tab_position_accepts_axial_spellings() {
        assert_eq!(
            TabRelativePosition::parse("front"),
            Some(TabRelativePosition::Front)
        );
        assert_eq!(
            TabRelativePosition::parse("bottom"),
            Some(TabRelativePosition::End)
        );
        assert_eq!(TabRelativePosition::parse("after"), None);
    }

    #[test]
    fn cluster_names() {
        assert_eq!(
            ClusterConfiguration::from_xml_name("9-square"),
            Some(ClusterConfiguration::NineSquare)
        );
        assert_eq!(ClusterConfiguration::NineSquare.count(), 9);
        assert_eq!(ClusterConfiguration::from_xml_name("10-ring"), None);
    }
}
