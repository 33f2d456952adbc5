//! Cross references settled after the single streaming pass.

use crate::types::{ComponentKind, FlightConfigurationId};

use super::LoadContext;

pub(crate) fn reconcile(cx: &mut LoadContext<'_>) {
    drop_unknown_configurations(cx);

    let stage_count = cx.doc.rocket.stage_count();
    for configuration in cx.doc.rocket.configurations_mut().iter_mut() {
        configuration.apply_stage_activeness(stage_count);
    }

    let storage = &mut cx.doc.storage;
    storage.save_simulation_data = cx
        .doc
        .simulations
        .iter()
        .any(|sim| sim.flight_data.as_ref().is_some_and(|data| data.has_samples()));
    storage.explicitly_set = false;

    let configurations = cx.doc.rocket.configurations();
    let default_mod_id = configurations.default_configuration().map(|c| c.mod_id());
    for simulation in &mut cx.doc.simulations {
        let mut mod_id = default_mod_id;
        if let Some(id) = &simulation.options.configuration_id {
            match configurations.get(id) {
                Some(configuration) => mod_id = Some(configuration.mod_id()),
                None => {
                    cx.warnings.add_str(format!(
                        "Simulation '{}' refers to unknown flight configuration '{id}', using default.",
                        simulation.name
                    ));
                    simulation.options.configuration_id = None;
                }
            }
        }
        if let Some(mod_id) = mod_id {
            simulation.sync_mod_id(mod_id);
        }
    }

    // Extensions see the whole document, so they are lent out while called.
    let mut extensions: Vec<_> = cx
        .doc
        .simulations
        .iter_mut()
        .map(|sim| std::mem::take(&mut sim.extensions))
        .collect();
    for extension in extensions.iter_mut().flatten() {
        extension.document_loaded(&cx.doc, &mut cx.warnings);
    }
    for (simulation, extensions) in cx.doc.simulations.iter_mut().zip(extensions) {
        simulation.extensions = extensions;
    }

    cx.doc.freeze();
    log::debug!(
        "reconciled {} flight configurations over {stage_count} stages",
        cx.doc.rocket.configurations().len()
    );
}

/// Per-component overrides may only refer to declared configurations.
fn drop_unknown_configurations(cx: &mut LoadContext<'_>) {
    let known: Vec<FlightConfigurationId> = cx
        .doc
        .rocket
        .configurations()
        .iter()
        .map(|c| c.id().clone())
        .collect();
    let keep = |id: &FlightConfigurationId| known.contains(id);

    let mut dropped: Vec<(ComponentKind, String, FlightConfigurationId)> = Vec::new();
    for component in cx.doc.rocket.components_mut() {
        let kind = component.kind();
        let name = component.name.clone();
        let mut ids = Vec::new();
        if let Some(mount) = component.motor_mount_mut() {
            ids.extend(mount.motors.retain_ids(keep));
        }
        if let Some(deployment) = component.deployment_mut() {
            ids.extend(deployment.retain_ids(keep));
        }
        if let Some(separation) = component.separation_mut() {
            ids.extend(separation.retain_ids(keep));
        }
        dropped.extend(ids.into_iter().map(|id| (kind, name.clone(), id)));
    }

    for (kind, name, id) in dropped {
        cx.warn(format!(
            "{} '{name}' refers to unknown flight configuration '{id}', ignoring.",
            kind.display_name()
        ));
    }
}
