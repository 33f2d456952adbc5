use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::{ComponentKind, RocketComponent};

static CONSTRUCTORS: Lazy<HashMap<&'static str, ComponentKind>> = Lazy::new(|| {
    use ComponentKind::*;
    HashMap::from([
        ("stage", AxialStage),
        ("boosterset", ParallelStage),
        ("parallelstage", ParallelStage),
        ("podset", PodSet),
        ("bodytube", BodyTube),
        ("transition", Transition),
        ("nosecone", NoseCone),
        ("trapezoidfinset", TrapezoidFinSet),
        ("ellipticalfinset", EllipticalFinSet),
        ("freeformfinset", FreeformFinSet),
        ("tubefinset", TubeFinSet),
        ("launchlug", LaunchLug),
        ("railbutton", RailButton),
        ("engineblock", EngineBlock),
        ("innertube", InnerTube),
        ("tubecoupler", TubeCoupler),
        ("bulkhead", Bulkhead),
        ("centeringring", CenteringRing),
        ("masscomponent", MassComponent),
        ("shockcord", ShockCord),
        ("parachute", Parachute),
        ("streamer", Streamer),
    ])
});

/// A fresh component for a `<subcomponents>` child element.
///
/// The rocket itself is only created by the document, never from a
/// subcomponent element.
pub(crate) fn construct(element: &str) -> Option<RocketComponent> {
    CONSTRUCTORS
        .get(element)
        .map(|kind| RocketComponent::new(*kind))
}
