//! Streaming import of `.ork` design files.
//!
//! The XML token stream drives a stack of [`handler::ElementHandler`]s, one
//! per open element. Handlers build the [`DesignDocument`] in place on the
//! shared [`LoadContext`]; cross references that cannot be resolved during
//! the single pass are settled by [`reconcile`] afterwards.
//!
//! [`DesignDocument`]: crate::types::DesignDocument

mod context;
mod factory;
mod handler;
mod handlers;
mod reconcile;
mod setters;
mod values;
mod xml;

pub(crate) use context::LoadContext;
pub(crate) use handler::Attributes;

use crate::{ImportContext, LoadedDocument, Result};

pub(crate) fn load(xml: &str, env: &ImportContext) -> Result<LoadedDocument> {
    log::info!("loading design document ({} bytes)", xml.len());
    let mut cx = LoadContext::new(env);
    let mut root = handlers::root::DocumentHandler::default();
    xml::TokenSource::new(xml).run(&mut root, &mut cx)?;
    root.finish()?;

    reconcile::reconcile(&mut cx);

    let LoadContext { doc, warnings, .. } = cx;
    log::info!(
        "loaded {} components, {} simulations, {} warnings",
        doc.rocket.len(),
        doc.simulations.len(),
        warnings.len()
    );
    Ok(LoadedDocument {
        document: doc,
        warnings,
    })
}
