//! Element handlers, one module per section of the file format.

pub(crate) mod appearance;
pub(crate) mod component;
pub(crate) mod conditions;
pub(crate) mod configuration;
pub(crate) mod datatypes;
pub(crate) mod entries;
pub(crate) mod flight_data;
pub(crate) mod motor;
pub(crate) mod root;
pub(crate) mod simulation;

use crate::types::{Warning, XmlEnum};

use super::LoadContext;
use super::values::{parse_bool, parse_double, parse_enum};

/// Parse a number from element text, warning about bad input.
pub(crate) fn number(cx: &mut LoadContext<'_>, content: &str) -> Option<f64> {
    let value = parse_double(content);
    if value.is_none() {
        cx.warnings.add(Warning::invalid_parameter());
    }
    value
}

pub(crate) fn boolean(cx: &mut LoadContext<'_>, content: &str) -> Option<bool> {
    let value = parse_bool(content);
    if value.is_none() {
        cx.warnings.add(Warning::invalid_parameter());
    }
    value
}

pub(crate) fn enumeration<E: XmlEnum>(cx: &mut LoadContext<'_>, content: &str) -> Option<E> {
    let value = parse_enum::<E>(content);
    if value.is_none() {
        cx.warnings.add(Warning::invalid_parameter());
    }
    value
}
